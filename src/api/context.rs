use crate::api::backend::FormFields;
use crate::error::{AppError, Result};
use crate::models::permissions::Permissions;
use crate::models::session::Session;

/// The identity a screen controller acts as.
///
/// Handed to each controller at construction instead of being read from
/// shared state. The backend authenticates by the `user_id` form field, so
/// every authenticated request starts from [`AuthContext::form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user_id: String,
    permissions: Permissions,
}

impl AuthContext {
    pub fn new(user_id: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            user_id: user_id.into(),
            permissions,
        }
    }

    /// Snapshot of the identity in `session`.
    pub fn from_session(session: &Session) -> Self {
        Self::new(session.user_id.clone(), session.permissions.clone())
    }

    /// Fails fast when there is no identity to act as.
    pub fn require(context: Option<&AuthContext>) -> Result<&AuthContext> {
        match context {
            Some(ctx) if !ctx.user_id.is_empty() => Ok(ctx),
            _ => Err(AppError::MissingIdentity),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    /// Form fields pre-populated with `user_id`.
    pub fn form(&self) -> FormFields {
        FormFields::new().text("user_id", self.user_id.clone())
    }

    /// Rejects the action locally when `flag` was not granted.
    pub fn ensure_allowed(&self, flag: &str) -> Result<()> {
        if self.permissions.allows(flag) {
            Ok(())
        } else {
            tracing::warn!("❌ User {} lacks permission: {}", self.user_id, flag);
            Err(AppError::Forbidden(format!("missing permission '{}'", flag)))
        }
    }
}
