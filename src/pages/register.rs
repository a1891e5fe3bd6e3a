use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{
    api::FinanceApi,
    app::use_app,
    components::{auth_card, bind_input, error_text},
    models::RegisterRequest,
    request::use_request_tracker,
    route::{DashboardTab, Route},
    session::SessionContext,
};

const REGISTRATION_FAILED: &str = "Erreur lors de l'inscription";

#[derive(Debug, PartialEq)]
pub enum Registration {
    /// The server returned a token and the user; the session is stored.
    SignedIn,
    /// The account exists but the user still has to log in.
    LoginRequired,
}

impl Registration {
    pub fn next_route(&self) -> Route {
        match self {
            Registration::SignedIn => Route::Dashboard(DashboardTab::Home),
            Registration::LoginRequired => Route::Login,
        }
    }
}

pub async fn register<A: FinanceApi>(
    api: &A,
    session: &SessionContext,
    request: RegisterRequest,
) -> Result<Registration, String> {
    let response = api
        .register(&request)
        .await
        .map_err(|error| error.user_message(REGISTRATION_FAILED))?;

    match (response.access_token, response.user) {
        (Some(token), Some(user)) => {
            session.save(&token, &user).map_err(|error| {
                tracing::error!("Could not store the session: {error}");
                REGISTRATION_FAILED.to_string()
            })?;
            Ok(Registration::SignedIn)
        }
        _ => Ok(Registration::LoginRequired),
    }
}

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let app = use_app();
    let tracker = use_request_tracker();
    let name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let app = app.clone();
        let name = name.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let loading = loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            error.set(None);
            loading.set(true);

            let request = RegisterRequest {
                name: (*name).clone(),
                email: (*email).clone(),
                password: (*password).clone(),
            };
            let app = app.clone();
            let error = error.clone();
            let loading = loading.clone();
            let ticket = tracker.begin();
            spawn_local(async move {
                let result = register(app.api.as_ref(), &app.session, request).await;
                if !ticket.is_current() {
                    return;
                }
                loading.set(false);
                match result {
                    Ok(registration) => app.navigate.emit(registration.next_route()),
                    Err(message) => error.set(Some(message)),
                }
            });
        })
    };

    let to_login = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        app.navigate.emit(Route::Login)
    });

    auth_card(
        "Inscription",
        html! {
            <>
                <form onsubmit={on_submit} class="space-y-4">
                    <input type="text" placeholder="Nom" class="input input-bordered w-full"
                        value={(*name).clone()} oninput={bind_input(&name)} required=true />
                    <input type="email" placeholder="Email" class="input input-bordered w-full"
                        value={(*email).clone()} oninput={bind_input(&email)} required=true />
                    <input type="password" placeholder="Mot de passe" class="input input-bordered w-full"
                        value={(*password).clone()} oninput={bind_input(&password)} required=true />
                    <button type="submit" class="btn btn-primary w-full" disabled={*loading}>
                        { if *loading { "Inscription..." } else { "S'inscrire" } }
                    </button>
                </form>

                { error_text(&error) }

                <div class="mt-6 text-center text-sm sm:text-base">
                    <a href={Route::Login.path()} onclick={to_login} class="text-blue-500 hover:underline">
                        {"← Retour à la connexion"}
                    </a>
                </div>
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        models::RegisterRequest,
        route::{DashboardTab, Route},
        test_utils::{signed_out, user, FakeApi},
    };

    use super::{register, Registration};

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Moussa".to_string(),
            email: email.to_string(),
            password: "s3cret-pass".to_string(),
        }
    }

    #[tokio::test]
    async fn registration_with_token_and_user_signs_in() {
        let api = FakeApi::default();
        let session = signed_out();

        let result = register(&api, &session, request("moussa@example.com")).await;

        assert_eq!(result, Ok(Registration::SignedIn));
        assert_eq!(session.load().unwrap().user.name, "Moussa");
        assert_eq!(
            Registration::SignedIn.next_route(),
            Route::Dashboard(DashboardTab::Home)
        );
    }

    #[tokio::test]
    async fn registration_without_user_sends_to_login() {
        let api = FakeApi::default();
        api.registration_returns_user.set(false);
        let session = signed_out();

        let result = register(&api, &session, request("moussa@example.com")).await;

        assert_eq!(result, Ok(Registration::LoginRequired));
        assert_eq!(session.load(), None);
        assert_eq!(Registration::LoginRequired.next_route(), Route::Login);
    }

    #[tokio::test]
    async fn duplicate_email_shows_server_message() {
        let api = FakeApi::default();
        let session = signed_out();

        let result = register(&api, &session, request(&user().email)).await;

        assert_eq!(result, Err("Cet email est déjà utilisé".to_string()));
        assert_eq!(session.load(), None);
    }
}
