use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// The JSON wrapper every backend response comes in.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Decodes an envelope and unwraps its `data`.
///
/// `success: false` becomes `AppError::Backend` carrying the server message.
/// A successful envelope without `data` yields `T::default()`.
///
/// # Arguments
///
/// * `body` - The raw response body.
pub fn decode<T: DeserializeOwned + Default>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = sonic_rs::from_str(body)?;

    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Request failed".to_string());
        return Err(AppError::Backend(message));
    }

    Ok(envelope.data.unwrap_or_default())
}

/// Decodes an envelope whose `data` is irrelevant (submit endpoints).
pub fn decode_ack(body: &str) -> Result<()> {
    decode::<serde::de::IgnoredAny>(body).map(|_| ())
}
