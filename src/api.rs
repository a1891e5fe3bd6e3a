//! Client for the MoneyWise REST API.
//!
//! [FinanceApi] is the seam the views and services are written against;
//! [HttpApi] is the `fetch`-backed implementation used in the browser.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config,
    error::ApiError,
    models::{
        AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, ProfileUpdate,
        RegisterRequest, StatsTable, Summary, Transaction, TransactionDraft, User,
    },
};

/// Every call the client makes to the remote API.
///
/// Protected calls take the bearer token of the current session.
#[allow(async_fn_in_trait)]
pub trait FinanceApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;
    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<ForgotPasswordResponse, ApiError>;

    async fn me(&self, token: &str) -> Result<User, ApiError>;
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError>;

    async fn list_transactions(
        &self,
        token: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ApiError>;
    async fn create_transaction(&self, token: &str, draft: &TransactionDraft)
        -> Result<(), ApiError>;
    async fn update_transaction(
        &self,
        token: &str,
        id: i64,
        draft: &TransactionDraft,
    ) -> Result<(), ApiError>;
    async fn delete_transaction(&self, token: &str, id: i64) -> Result<(), ApiError>;

    async fn category_stats(&self, token: &str) -> Result<StatsTable, ApiError>;
    async fn monthly_stats(&self, token: &str) -> Result<StatsTable, ApiError>;
    async fn summary(&self, token: &str) -> Result<Option<Summary>, ApiError>;
}

/// Decode a payload that the server sends either wrapped under `field` or bare.
///
/// `{"transactions": [...]}` and `[...]` both decode to the list. A `null`
/// payload decodes to `None`.
pub fn unwrap_envelope<T: DeserializeOwned>(body: Value, field: &str) -> Result<Option<T>, ApiError> {
    let payload = match body {
        Value::Object(mut object) if object.contains_key(field) => object
            .remove(field)
            .unwrap_or(Value::Null),
        other => other,
    };

    if payload.is_null() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_value(payload)?))
}

/// Pull the `message` field out of an error body, if it has one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpApi {
    base_url: String,
}

impl Default for HttpApi {
    fn default() -> Self {
        Self::new(config::api_base_url())
    }
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", &format!("Bearer {}", token))
    }

    /// Issue the request. Only transport failures are errors here.
    async fn dispatch(request: Request) -> Result<Response, ApiError> {
        let method = request.method();
        let url = request.url();
        tracing::debug!("{method:?} {url}");

        let response = request.send().await.map_err(|error| {
            tracing::warn!("{method:?} {url} failed: {error}");
            ApiError::from(error)
        })?;
        tracing::debug!("{method:?} {url} -> {}", response.status());
        Ok(response)
    }

    async fn send(request: Request) -> Result<Response, ApiError> {
        let response = Self::dispatch(request).await?;
        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    /// Send a write whose response body is not needed.
    async fn send_write(request: Request) -> Result<(), ApiError> {
        let response = Self::dispatch(request).await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        write_outcome(status, &body)
    }

    async fn send_json(builder: RequestBuilder, body: &impl Serialize) -> Result<Value, ApiError> {
        let response = Self::send(builder.json(body)?).await?;
        Self::read_body(response).await
    }

    async fn get(&self, path: &str, token: &str) -> Result<Value, ApiError> {
        let request = Self::authorized(Request::get(&self.url(path)), token).build()?;
        let response = Self::send(request).await?;
        Self::read_body(response).await
    }

    async fn read_body(response: Response) -> Result<Value, ApiError> {
        parse_body(&response.text().await?)
    }
}

/// A response body as JSON. Empty bodies (204, bare `200 OK`) read as `null`.
fn parse_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}

fn status_error(status: u16, body: &str) -> ApiError {
    tracing::warn!("Request failed with status {status}");
    ApiError::Server {
        status,
        message: error_message(body),
    }
}

/// Any 2xx status means the write went through, whatever the body holds.
fn write_outcome(status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(status_error(status, body))
    }
}

impl FinanceApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let body = Self::send_json(Request::post(&self.url("/login")), request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let body = Self::send_json(Request::post(&self.url("/register")), request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<ForgotPasswordResponse, ApiError> {
        let body = Self::send_json(Request::post(&self.url("/forgot-password")), request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        let body = self.get("/me", token).await?;
        unwrap_envelope(body, "user")?
            .ok_or_else(|| ApiError::Decode("the profile response has no user".to_string()))
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        let browser_error = |_| ApiError::Browser("could not build the profile form".to_string());
        let form = web_sys::FormData::new().map_err(browser_error)?;
        form.append_with_str("name", &update.name)
            .map_err(browser_error)?;
        if let Some(image) = &update.image {
            form.append_with_blob_and_filename("profile_image", image, &image.name())
                .map_err(browser_error)?;
        }

        // The browser sets the multipart boundary itself, so no Content-Type here.
        let request =
            Self::authorized(Request::post(&self.url("/update-profile")), token).body(form)?;
        let response = Self::send(request).await?;
        let body = Self::read_body(response).await?;
        unwrap_envelope(body, "user")?
            .ok_or_else(|| ApiError::Decode("the profile response has no user".to_string()))
    }

    async fn list_transactions(
        &self,
        token: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ApiError> {
        let path = match limit {
            Some(limit) => format!("/transactions?limit={limit}"),
            None => "/transactions".to_string(),
        };
        let body = self.get(&path, token).await?;
        Ok(unwrap_envelope(body, "transactions")?.unwrap_or_default())
    }

    async fn create_transaction(
        &self,
        token: &str,
        draft: &TransactionDraft,
    ) -> Result<(), ApiError> {
        let builder = Self::authorized(Request::post(&self.url("/transactions")), token);
        Self::send_write(builder.json(draft)?).await
    }

    async fn update_transaction(
        &self,
        token: &str,
        id: i64,
        draft: &TransactionDraft,
    ) -> Result<(), ApiError> {
        let builder = Self::authorized(
            Request::put(&self.url(&format!("/transactions/{id}"))),
            token,
        );
        Self::send_write(builder.json(draft)?).await
    }

    async fn delete_transaction(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let request = Self::authorized(
            Request::delete(&self.url(&format!("/transactions/{id}"))),
            token,
        )
        .build()?;
        Self::send_write(request).await
    }

    async fn category_stats(&self, token: &str) -> Result<StatsTable, ApiError> {
        let body = self.get("/stats/categories", token).await?;
        Ok(unwrap_envelope(body, "stats_by_category")?.unwrap_or_default())
    }

    async fn monthly_stats(&self, token: &str) -> Result<StatsTable, ApiError> {
        let body = self.get("/stats/monthly", token).await?;
        Ok(unwrap_envelope(body, "stats_by_month")?.unwrap_or_default())
    }

    async fn summary(&self, token: &str) -> Result<Option<Summary>, ApiError> {
        let body = self.get("/stats/summary", token).await?;
        unwrap_envelope(body, "summary")
    }
}
