use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{
    api::FinanceApi,
    app::use_app,
    browser,
    components::{auth_card, bind_input, error_text, success_text},
    config::FORGOT_PASSWORD_REDIRECT_MS,
    models::ForgotPasswordRequest,
    request::use_request_tracker,
    route::Route,
};

const SEND_FAILED: &str = "Erreur lors de l'envoi de l'email";
const SENT: &str = "Email envoyé avec succès !";

/// Ask the server to mail a reset link. A response without `success: true`
/// counts as a failure.
pub async fn request_reset<A: FinanceApi>(api: &A, email: String) -> Result<(), String> {
    let response = api
        .forgot_password(&ForgotPasswordRequest { email })
        .await
        .map_err(|error| error.user_message(SEND_FAILED))?;

    if response.success {
        Ok(())
    } else {
        Err(SEND_FAILED.to_string())
    }
}

#[function_component(ForgotPasswordPage)]
pub fn forgot_password_page() -> Html {
    let app = use_app();
    let tracker = use_request_tracker();
    let email = use_state(String::new);
    let error = use_state(|| None::<String>);
    let message = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let app = app.clone();
        let email = email.clone();
        let error = error.clone();
        let message = message.clone();
        let loading = loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            error.set(None);
            message.set(None);
            loading.set(true);

            let email = (*email).clone();
            let app = app.clone();
            let error = error.clone();
            let message = message.clone();
            let loading = loading.clone();
            let tracker = tracker.clone();
            let ticket = tracker.begin();
            spawn_local(async move {
                let result = request_reset(app.api.as_ref(), email).await;
                if !ticket.is_current() {
                    return;
                }
                loading.set(false);
                match result {
                    Ok(()) => {
                        message.set(Some(SENT.to_string()));
                        browser::set_timeout(FORGOT_PASSWORD_REDIRECT_MS, move || {
                            // The user may have navigated away in the meantime.
                            if tracker.is_mounted() {
                                app.navigate.emit(Route::Login);
                            }
                        });
                    }
                    Err(text) => error.set(Some(text)),
                }
            });
        })
    };

    let to_login = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        app.navigate.emit(Route::Login)
    });

    auth_card(
        "Mot de passe oublié",
        html! {
            <>
                <form onsubmit={on_submit} class="space-y-4">
                    <input type="email" placeholder="Email" class="input input-bordered w-full"
                        value={(*email).clone()} oninput={bind_input(&email)} required=true />
                    <button type="submit" class="btn btn-primary w-full" disabled={*loading}>
                        { if *loading { "Envoi..." } else { "Envoyer" } }
                    </button>
                </form>

                { success_text(&message) }
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
    use crate::test_utils::{user, FakeApi};

    use super::request_reset;

    #[tokio::test]
    async fn known_email_succeeds() {
        let api = FakeApi::default();

        assert_eq!(request_reset(&api, user().email).await, Ok(()));
    }

    #[tokio::test]
    async fn unsuccessful_response_shows_fallback() {
        let api = FakeApi::default();

        let result = request_reset(&api, "nobody@example.com".to_string()).await;

        assert_eq!(result, Err("Erreur lors de l'envoi de l'email".to_string()));
    }

    #[tokio::test]
    async fn server_error_shows_fallback() {
        let api = FakeApi::default();
        api.fail("forgot_password");

        let result = request_reset(&api, user().email).await;

        assert_eq!(result, Err("Erreur lors de l'envoi de l'email".to_string()));
    }
}
