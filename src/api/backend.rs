use std::future::Future;

use http::StatusCode;
use reqwest::multipart::Form;

use crate::error::{AppError, Result};

/// Form fields of a backend request, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    /// Returns the first value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn into_multipart(self) -> Form {
        self.0
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
    }
}

/// The remote REST backend.
///
/// Every call is a `POST` of multipart form fields answered with a JSON
/// envelope. Implementations map HTTP statuses onto `AppError` with
/// [`check_status`] and return the raw body otherwise.
pub trait Backend {
    fn post_form(
        &self,
        endpoint: &str,
        fields: FormFields,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Maps an HTTP status to the error taxonomy.
///
/// * 401 - the session is no longer accepted; callers log out.
/// * 403 - permission denied; shown inline, never logs out.
/// * 5xx - transient server error.
/// * other non-2xx - treated as a failed request.
///
/// # Arguments
///
/// * `status` - The response status.
/// * `body` - The response body, used for the error message.
pub fn check_status(status: StatusCode, body: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    let message = server_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });

    if status == StatusCode::UNAUTHORIZED {
        return Err(AppError::SessionExpired);
    }

    if status == StatusCode::FORBIDDEN {
        return Err(AppError::Forbidden(message));
    }

    if status.is_server_error() {
        return Err(AppError::Server {
            status: status.as_u16(),
            message,
        });
    }

    Err(AppError::Network(format!("Unexpected status {}: {}", status.as_u16(), message)))
}

/// Pulls `message` out of an error body, if it is an envelope.
fn server_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    sonic_rs::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// The production `Backend`, backed by `reqwest`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a new `HttpBackend`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The backend base URL, e.g. `Config::api_base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

impl Backend for HttpBackend {
    async fn post_form(&self, endpoint: &str, fields: FormFields) -> Result<String> {
        let url = self.url(endpoint);
        tracing::debug!("📡 POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .multipart(fields.into_multipart())
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request to {} failed: {}", endpoint, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Reading response from {} failed: {}", endpoint, e)))?;

        check_status(status, &body)?;
        Ok(body)
    }
}
