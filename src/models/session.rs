use serde::{Deserialize, Serialize};

use crate::api::lenient;
use crate::models::permissions::Permissions;
use crate::notice::Route;

/// Days before expiry during which the renewal warning is shown.
pub const SUBSCRIPTION_WARNING_DAYS: i64 = 15;

/// The organisation's subscription state as reported at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SubscriptionStatus {
    None,
    Active,
    Expired,
}

impl From<i64> for SubscriptionStatus {
    fn from(value: i64) -> Self {
        match value {
            1 => SubscriptionStatus::Active,
            2 => SubscriptionStatus::Expired,
            _ => SubscriptionStatus::None,
        }
    }
}

impl From<SubscriptionStatus> for i64 {
    fn from(status: SubscriptionStatus) -> Self {
        match status {
            SubscriptionStatus::None => 0,
            SubscriptionStatus::Active => 1,
            SubscriptionStatus::Expired => 2,
        }
    }
}

/// Outcome of the subscription check performed on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionGate {
    /// Subscription expired: the whole console is replaced by the paywall.
    Blocked,
    /// Subscription active but ending within the warning window.
    WarningWindow(i64),
    Clear,
}

impl SubscriptionGate {
    /// The full-page replacement this gate demands, if any.
    pub fn route(self) -> Option<Route> {
        match self {
            SubscriptionGate::Blocked => Some(Route::Paywall),
            _ => None,
        }
    }
}

/// The authenticated user as held by the client.
///
/// Only `SessionGuard` creates or mutates this; everything else gets clones
/// or an `AuthContext` derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub account_type: String,
    pub role_id: i64,
    pub subscription_status: SubscriptionStatus,
    /// May be zero or negative once the subscription has lapsed.
    pub subscription_days_remaining: i64,
    /// Epoch milliseconds.
    pub login_timestamp: i64,
    pub session_id: String,
    /// Epoch milliseconds of the last profile change.
    pub last_updated_timestamp: i64,
    #[serde(default)]
    pub permissions: Permissions,
}

impl Session {
    /// Builds a session from the login response, stamping it at `now_ms`.
    pub fn from_login(profile: LoginProfile, session_id: String, now_ms: i64) -> Self {
        Self {
            user_id: profile.user_id,
            full_name: profile.full_name,
            username: profile.username,
            email: profile.email,
            phone_number: profile.phone_number,
            account_type: profile.account_type,
            role_id: profile.role_id,
            subscription_status: SubscriptionStatus::from(profile.subscription_status),
            subscription_days_remaining: profile.subscription_days_remaining,
            login_timestamp: now_ms,
            session_id,
            last_updated_timestamp: now_ms,
            permissions: Permissions::new(profile.permissions),
        }
    }

    /// Decides whether the console may be used under the current subscription.
    pub fn subscription_gate(&self) -> SubscriptionGate {
        match self.subscription_status {
            SubscriptionStatus::Expired => SubscriptionGate::Blocked,
            SubscriptionStatus::Active
                if self.subscription_days_remaining > 0
                    && self.subscription_days_remaining <= SUBSCRIPTION_WARNING_DAYS =>
            {
                SubscriptionGate::WarningWindow(self.subscription_days_remaining)
            }
            _ => SubscriptionGate::Clear,
        }
    }
}

/// The `data` object of a successful login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginProfile {
    #[serde(default, alias = "id", deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(default, alias = "name", deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, alias = "phone", deserialize_with = "lenient::string")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub account_type: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub role_id: i64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub subscription_status: i64,
    #[serde(default, alias = "days_remaining", deserialize_with = "lenient::integer")]
    pub subscription_days_remaining: i64,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub permissions: Vec<String>,
}

/// A partial profile change merged into the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub account_type: Option<String>,
    pub subscription_status: Option<SubscriptionStatus>,
    pub subscription_days_remaining: Option<i64>,
}

impl SessionUpdate {
    /// Overwrites the fields that are set; re-stamps `last_updated_timestamp`.
    pub fn apply(self, session: &mut Session, now_ms: i64) {
        if let Some(full_name) = self.full_name {
            session.full_name = full_name;
        }
        if let Some(email) = self.email {
            session.email = email;
        }
        if let Some(phone_number) = self.phone_number {
            session.phone_number = phone_number;
        }
        if let Some(account_type) = self.account_type {
            session.account_type = account_type;
        }
        if let Some(status) = self.subscription_status {
            session.subscription_status = status;
        }
        if let Some(days) = self.subscription_days_remaining {
            session.subscription_days_remaining = days;
        }
        session.last_updated_timestamp = now_ms;
    }
}
