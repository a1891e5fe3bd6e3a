pub mod dashboard;
pub mod forgot_password;
pub mod login;
pub mod profile;
pub mod register;
pub mod statistics;
pub mod transactions;

use yew::{Callback, UseStateHandle};

use crate::{error::ApiError, route::Route};

/// Show a failed request to the user. A missing session is not an error: it
/// sends the user back to the login screen.
pub(crate) fn report_failure(
    error: ApiError,
    fallback: &str,
    message: &UseStateHandle<Option<String>>,
    navigate: &Callback<Route>,
) {
    match error {
        ApiError::MissingSession => navigate.emit(Route::Login),
        error => {
            tracing::warn!("{fallback} ({error})");
            message.set(Some(error.user_message(fallback)));
        }
    }
}
