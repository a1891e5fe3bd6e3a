use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{
    api::FinanceApi,
    app::use_app,
    components::{auth_card, bind_input, error_text},
    models::LoginRequest,
    request::use_request_tracker,
    route::{DashboardTab, Route},
    session::SessionContext,
};

const LOGIN_FAILED: &str = "Erreur de connexion";

/// Exchange credentials for a token and store the session.
///
/// Nothing is written to storage unless the server returned both a token and
/// a user. The error is the text to show under the form.
pub async fn sign_in<A: FinanceApi>(
    api: &A,
    session: &SessionContext,
    request: LoginRequest,
) -> Result<(), String> {
    let response = api
        .login(&request)
        .await
        .map_err(|error| error.user_message(LOGIN_FAILED))?;

    let (Some(token), Some(user)) = (response.access_token, response.user) else {
        tracing::warn!("Login response is missing the token or the user");
        return Err(LOGIN_FAILED.to_string());
    };

    session.save(&token, &user).map_err(|error| {
        tracing::error!("Could not store the session: {error}");
        LOGIN_FAILED.to_string()
    })
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let app = use_app();
    let tracker = use_request_tracker();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let navigate = app.navigate.clone();

    let on_submit = {
        let app = app.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let loading = loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            error.set(None);
            loading.set(true);

            let request = LoginRequest {
                email: (*email).clone(),
                password: (*password).clone(),
            };
            let app = app.clone();
            let error = error.clone();
            let loading = loading.clone();
            let ticket = tracker.begin();
            spawn_local(async move {
                let result = sign_in(app.api.as_ref(), &app.session, request).await;
                if !ticket.is_current() {
                    return;
                }
                loading.set(false);
                match result {
                    Ok(()) => app.navigate.emit(Route::Dashboard(DashboardTab::Home)),
                    Err(message) => error.set(Some(message)),
                }
            });
        })
    };

    let to_register = {
        let navigate = navigate.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            navigate.emit(Route::Register)
        })
    };
    let to_forgot_password = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        navigate.emit(Route::ForgotPassword)
    });

    auth_card(
        "Connexion",
        html! {
            <>
                <form onsubmit={on_submit} class="space-y-4">
                    <input type="email" placeholder="Email" class="input input-bordered w-full"
                        value={(*email).clone()} oninput={bind_input(&email)} required=true />
                    <input type="password" placeholder="Mot de passe" class="input input-bordered w-full"
                        value={(*password).clone()} oninput={bind_input(&password)} required=true />
                    <button type="submit" class="btn btn-primary w-full" disabled={*loading}>
                        { if *loading { "Connexion..." } else { "Se connecter" } }
                    </button>
                </form>

                { error_text(&error) }

                <div class="mt-6 text-center space-y-2 text-sm sm:text-base">
                    <a href={Route::Register.path()} onclick={to_register} class="text-blue-500 hover:underline block">
                        {"Créer un compte"}
                    </a>
                    <a href={Route::ForgotPassword.path()} onclick={to_forgot_password} class="text-blue-500 hover:underline block">
                        {"← Mot de passe oublié ?"}
                    </a>
                </div>
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        config::{TOKEN_KEY, USER_KEY},
        models::LoginRequest,
        session::{KeyValueStore, MemoryStore, SessionContext},
        test_utils::{user, FakeApi, PASSWORD},
    };
    use std::rc::Rc;

    use super::sign_in;

    fn request(password: &str) -> LoginRequest {
        LoginRequest {
            email: user().email,
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn successful_login_stores_the_session() {
        let api = FakeApi::default();
        let session = SessionContext::new(Rc::new(MemoryStore::default()));

        sign_in(&api, &session, request(PASSWORD)).await.unwrap();

        let stored = session.load().unwrap();
        assert_eq!(stored.token, "token-1");
        assert_eq!(stored.user, user());
    }

    #[tokio::test]
    async fn failed_login_writes_nothing_and_shows_server_message() {
        let api = FakeApi::default();
        let store = Rc::new(MemoryStore::default());
        let session = SessionContext::new(store.clone());

        let result = sign_in(&api, &session, request("wrong")).await;

        assert_eq!(result, Err("Identifiants invalides".to_string()));
        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.get(USER_KEY), None);
    }

    #[tokio::test]
    async fn unreachable_server_shows_fallback() {
        let api = FakeApi::default();
        api.fail("login");
        let session = SessionContext::new(Rc::new(MemoryStore::default()));

        let result = sign_in(&api, &session, request(PASSWORD)).await;

        assert_eq!(result, Err("Erreur de connexion".to_string()));
        assert_eq!(session.load(), None);
    }
}
