#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use hr_console::api::backend::{Backend, FormFields};
use hr_console::error::{AppError, Result};
use hr_console::session::clock::ManualClock;
use hr_console::session::guard::{DEFAULT_SESSION_TIMEOUT_MS, SessionGuard};
use hr_console::session::storage::MemoryStorage;
use hr_console::session::store::EncryptedSessionStore;
use serde_json::{Value, json};

pub const SECRET: &str = "test-session-secret";
/// 2024-03-01T09:00:00Z
pub const START_MS: i64 = 1_709_283_600_000;
pub const HOUR_MS: i64 = 60 * 60 * 1000;

#[derive(Default)]
struct Inner {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(String, FormFields)>>,
}

/// Scripted backend: answers queued responses in order and records calls.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Inner>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, body: Value) {
        self.push(Ok(body.to_string()));
    }

    pub fn fail(&self, error: AppError) {
        self.push(Err(error));
    }

    pub fn calls(&self) -> Vec<(String, FormFields)> {
        self.inner.calls.lock().unwrap().clone()
    }

    fn push(&self, response: Result<String>) {
        self.inner.responses.lock().unwrap().push_back(response);
    }
}

impl Backend for FakeBackend {
    async fn post_form(&self, endpoint: &str, fields: FormFields) -> Result<String> {
        self.inner
            .calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), fields));

        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Network("no response queued".to_string())))
    }
}

pub type TestGuard = SessionGuard<FakeBackend, EncryptedSessionStore<MemoryStorage>, ManualClock>;

/// Shared test context: one backend, one tab storage, one clock.
pub struct TestContext {
    pub backend: FakeBackend,
    pub storage: MemoryStorage,
    pub clock: ManualClock,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            backend: FakeBackend::new(),
            storage: MemoryStorage::new(),
            clock: ManualClock::new(START_MS),
        }
    }

    /// A guard over the shared storage, as after a page reload.
    pub fn guard(&self) -> TestGuard {
        SessionGuard::new(
            self.backend.clone(),
            self.store(),
            self.clock.clone(),
            DEFAULT_SESSION_TIMEOUT_MS,
        )
    }

    pub fn store(&self) -> EncryptedSessionStore<MemoryStorage> {
        EncryptedSessionStore::new(self.storage.clone(), SECRET)
    }
}

pub fn login_body(status: i64, days_remaining: i64) -> Value {
    json!({
        "success": true,
        "data": {
            "user_id": 42,
            "full_name": "Asha Rao",
            "username": "asha",
            "email": "asha@example.com",
            "phone_number": "9876543210",
            "account_type": "admin",
            "role_id": "1",
            "subscription_status": status,
            "subscription_days_remaining": days_remaining,
            "permissions": ["approve_leave", "manage_loans"]
        }
    })
}

pub fn list_body(rows: Value) -> Value {
    json!({ "success": true, "data": rows })
}
