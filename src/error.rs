//! Error types shared by the API client, the session store and the views.

/// The errors that may occur while talking to the MoneyWise API.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ApiError {
    /// There is no stored session. Views redirect to the login screen instead
    /// of showing this to the user.
    #[error("no session is stored")]
    MissingSession,

    /// The request never produced a response (offline, CORS, DNS...).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    ///
    /// `message` holds the `message` field of the JSON body when the server
    /// sent one.
    #[error("server responded with status {status}")]
    Server { status: u16, message: Option<String> },

    /// The response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// A browser API (form data, storage...) failed.
    #[error("browser API failure: {0}")]
    Browser(String),
}

impl ApiError {
    /// The text to show the user: the server-provided message when present,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(error: gloo_net::Error) -> Self {
        match error {
            gloo_net::Error::SerdeError(error) => ApiError::Decode(error.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        ApiError::Browser(error.to_string())
    }
}

/// The errors that may occur while persisting the session.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    /// `window.localStorage` is missing or blocked (private mode, sandboxed iframe).
    #[error("local storage is not available")]
    Unavailable,

    /// The browser refused the write, usually because the quota is exhausted.
    #[error("could not write \"{0}\" to local storage")]
    Write(String),

    #[error("could not serialize the user record: {0}")]
    Serialize(String),
}

/// A form the user filled in that cannot be sent as is. The text is shown
/// inline under the form.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormError {
    #[error("Montant invalide : « {0} »")]
    InvalidAmount(String),
}
