//! Core of the HR administration console: the session guard and the
//! tabular report pipeline shared by every list screen.
//!
//! Typical wiring:
//!
//! ```no_run
//! use hr_console::{config::Config, api::backend::HttpBackend};
//! use hr_console::session::{clock::SystemClock, guard::SessionGuard};
//! use hr_console::session::{storage::MemoryStorage, store::EncryptedSessionStore};
//!
//! hr_console::telemetry::init();
//! let config = Config::from_env().expect("configuration");
//! let store = EncryptedSessionStore::new(MemoryStorage::new(), &config.session_secret);
//! let mut guard = SessionGuard::new(
//!     HttpBackend::new(config.api_base_url.clone()),
//!     store,
//!     SystemClock,
//!     config.session_timeout_ms(),
//! );
//! let _restored = guard.restore_session();
//! ```

pub mod config;
pub mod error;
pub mod notice;
pub mod telemetry;

pub mod crypto {
    pub mod aes;
    pub mod token;
}

pub mod models {
    pub mod permissions;
    pub mod session;
}

pub mod api {
    pub mod backend;
    pub mod context;
    pub mod envelope;
    pub mod lenient;
}

pub mod session {
    pub mod clock;
    pub mod guard;
    pub mod storage;
    pub mod store;
}

pub mod report {
    pub mod pipeline;
    pub mod record;
    pub mod value;
    pub mod view_state;
}

pub mod screens {
    pub mod attendance;
    pub mod controller;
    pub mod debounce;
    pub mod leaves;
    pub mod loans;
    pub mod salary;
}

pub mod validation {
    pub mod forms;
}

pub use error::{AppError, Result};
