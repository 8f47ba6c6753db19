mod common;

use common::*;
use hr_console::error::AppError;
use hr_console::models::session::{SessionUpdate, SubscriptionGate};
use hr_console::notice::Route;
use hr_console::session::store::{LAST_REFRESHED_KEY, SessionStore, USER_KEY};
use hr_console::session::storage::KeyValueStorage;
use hr_console::validation::forms::LoginForm;
use serde_json::json;

fn credentials() -> LoginForm {
    LoginForm::new("asha", "SecurePass123!")
}

async fn logged_in(context: &TestContext) -> TestGuard {
    context.backend.respond(login_body(1, 30));
    let mut guard = context.guard();
    guard.login(&credentials()).await.unwrap();
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_authenticates_until_timeout() {
        let context = TestContext::new();
        context.backend.respond(login_body(1, 30));
        let mut guard = context.guard();

        let session = guard.login(&credentials()).await.unwrap();

        assert_eq!(session.user_id, "42");
        assert_eq!(session.full_name, "Asha Rao");
        assert_eq!(session.role_id, 1);
        assert_eq!(session.login_timestamp, START_MS);
        assert_eq!(session.last_updated_timestamp, START_MS);
        assert!(!session.session_id.is_empty());
        assert!(guard.is_authenticated());

        context.clock.advance(8 * HOUR_MS);
        assert!(guard.is_authenticated(), "exactly at the timeout is still valid");

        context.clock.advance(1);
        assert!(!guard.is_authenticated());
        assert!(guard.current().is_none());
        assert!(context.storage.is_empty(), "expired session must be cleared");
    }

    #[tokio::test]
    async fn test_login_sends_credentials_as_form_fields() {
        let context = TestContext::new();
        let _guard = logged_in(&context).await;

        let calls = context.backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "login");
        assert_eq!(calls[0].1.get("username"), Some("asha"));
        assert_eq!(calls[0].1.get("password"), Some("SecurePass123!"));
    }

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let context = TestContext::new();
        context.backend.respond(login_body(1, 30));
        context.backend.respond(login_body(1, 30));
        let mut guard = context.guard();

        let first = guard.login(&credentials()).await.unwrap();
        let second = guard.login(&credentials()).await.unwrap();

        assert_ne!(first.session_id, second.session_id);
    }

    #[tokio::test]
    async fn test_login_rejects_empty_credentials_without_calling_backend() {
        let context = TestContext::new();
        let mut guard = context.guard();

        let err = guard.login(&LoginForm::new("asha", "  ")).await.unwrap_err();

        match err {
            AppError::Validation(msg) => assert!(msg.starts_with("password"), "got {}", msg),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(context.backend.calls().is_empty());
        assert!(!guard.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_error_mapping() {
        let context = TestContext::new();
        let mut guard = context.guard();

        context.backend.fail(AppError::SessionExpired);
        assert!(matches!(
            guard.login(&credentials()).await,
            Err(AppError::InvalidCredentials)
        ));

        context.backend.respond(json!({ "success": false, "message": "Wrong password" }));
        assert!(matches!(
            guard.login(&credentials()).await,
            Err(AppError::InvalidCredentials)
        ));

        context.backend.fail(AppError::Server { status: 502, message: "Bad Gateway".into() });
        assert!(matches!(
            guard.login(&credentials()).await,
            Err(AppError::Server { status: 502, .. })
        ));

        context.backend.fail(AppError::Forbidden("blocked".into()));
        assert!(matches!(guard.login(&credentials()).await, Err(AppError::Network(_))));

        context.backend.fail(AppError::Network("connection refused".into()));
        assert!(matches!(guard.login(&credentials()).await, Err(AppError::Network(_))));

        assert!(!guard.is_authenticated());
        assert!(context.storage.is_empty());
    }

    #[tokio::test]
    async fn test_session_is_persisted_encrypted() {
        let context = TestContext::new();
        let _guard = logged_in(&context).await;

        let sealed_user = context.storage.get(USER_KEY).expect("user key written");
        let sealed_refresh = context.storage.get(LAST_REFRESHED_KEY).expect("timestamp key written");

        assert!(!sealed_user.contains("asha"));
        assert!(!sealed_user.contains("Asha Rao"));
        assert!(!sealed_refresh.contains(&START_MS.to_string()));
    }

    #[tokio::test]
    async fn test_restore_session_after_reload() {
        let context = TestContext::new();
        let original = logged_in(&context).await.current().cloned().unwrap();

        context.clock.advance(2 * HOUR_MS);
        let mut reloaded = context.guard();
        let restored = reloaded.restore_session().expect("session restored");

        assert_eq!(restored, original);
        assert!(reloaded.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_session_without_state_is_logged_out() {
        let context = TestContext::new();
        let mut guard = context.guard();

        assert!(guard.restore_session().is_none());
        assert!(!guard.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_session_requires_both_keys() {
        let context = TestContext::new();
        let _guard = logged_in(&context).await;
        context.storage.remove_many(&[LAST_REFRESHED_KEY]);

        let mut reloaded = context.guard();
        assert!(reloaded.restore_session().is_none());
        assert!(context.storage.is_empty());
    }

    #[tokio::test]
    async fn test_restore_expired_session_clears_state() {
        let context = TestContext::new();
        let _guard = logged_in(&context).await;

        context.clock.advance(8 * HOUR_MS + 1);
        let mut reloaded = context.guard();

        assert!(reloaded.restore_session().is_none());
        assert!(context.storage.is_empty());
    }

    #[tokio::test]
    async fn test_tampered_session_falls_back_to_logged_out() {
        let context = TestContext::new();
        let _guard = logged_in(&context).await;

        let sealed = context.storage.get(USER_KEY).unwrap();
        let mut bytes = sealed.into_bytes();
        let idx = bytes.len() / 2;
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        context
            .storage
            .set_many(&[(USER_KEY, String::from_utf8(bytes).unwrap())]);

        let mut reloaded = context.guard();
        assert!(reloaded.restore_session().is_none());
        assert!(!reloaded.is_authenticated());
        assert!(context.storage.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_session_falls_back_to_logged_out() {
        let context = TestContext::new();
        context.storage.set_many(&[
            (USER_KEY, "not encrypted at all".to_string()),
            (LAST_REFRESHED_KEY, "%%%".to_string()),
        ]);

        let mut guard = context.guard();
        assert!(guard.restore_session().is_none());
        assert!(context.storage.is_empty());
    }

    #[tokio::test]
    async fn test_restore_session_is_idempotent_and_does_not_slide() {
        let context = TestContext::new();
        let _guard = logged_in(&context).await;
        context.clock.advance(HOUR_MS);

        let mut reloaded = context.guard();
        let first = reloaded.restore_session();
        context.clock.advance(1_000);
        let second = reloaded.restore_session();

        assert!(first.is_some());
        assert_eq!(first, second);

        let stored = context.store().load().unwrap().unwrap();
        assert_eq!(stored.refreshed_at, START_MS, "probing must not move the deadline");
    }

    #[tokio::test]
    async fn test_current_slides_expiry() {
        let context = TestContext::new();
        let mut guard = logged_in(&context).await;

        context.clock.advance(7 * HOUR_MS);
        assert!(guard.current().is_some());

        context.clock.advance(7 * HOUR_MS);
        assert!(guard.is_authenticated(), "deadline moved by the read 7h ago");

        let stored = context.store().load().unwrap().unwrap();
        assert_eq!(stored.refreshed_at, START_MS + 7 * HOUR_MS);
    }

    #[tokio::test]
    async fn test_update_user_merges_and_persists() {
        let context = TestContext::new();
        let mut guard = logged_in(&context).await;
        context.clock.advance(HOUR_MS);

        let updated = guard.update_user(SessionUpdate {
            full_name: Some("Asha R.".to_string()),
            phone_number: Some("9123456780".to_string()),
            ..SessionUpdate::default()
        });
        assert!(updated);

        let stored = context.store().load().unwrap().unwrap();
        assert_eq!(stored.session.full_name, "Asha R.");
        assert_eq!(stored.session.phone_number, "9123456780");
        assert_eq!(stored.session.email, "asha@example.com");
        assert_eq!(stored.session.last_updated_timestamp, START_MS + HOUR_MS);
        assert_eq!(stored.session.login_timestamp, START_MS);
        assert_eq!(stored.refreshed_at, START_MS + HOUR_MS);
    }

    #[tokio::test]
    async fn test_update_user_without_session_returns_false() {
        let context = TestContext::new();
        let mut guard = context.guard();

        assert!(!guard.update_user(SessionUpdate::default()));
        assert!(context.storage.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let context = TestContext::new();
        let mut guard = logged_in(&context).await;
        assert!(guard.permissions().allows("approve_leave"));

        let route = guard.logout();

        assert_eq!(route, Route::Login);
        assert!(!guard.is_authenticated());
        assert!(guard.context().is_none());
        assert!(guard.permissions().is_empty());
        assert!(context.storage.is_empty());
    }

    #[tokio::test]
    async fn test_handle_error_logs_out_only_on_expired_session() {
        let context = TestContext::new();
        let mut guard = logged_in(&context).await;

        assert_eq!(guard.handle_error(&AppError::Forbidden("payroll".into())), None);
        assert!(guard.is_authenticated());

        assert_eq!(guard.handle_error(&AppError::SessionExpired), Some(Route::Login));
        assert!(!guard.is_authenticated());
    }

    #[tokio::test]
    async fn test_context_carries_identity_and_permissions() {
        let context = TestContext::new();
        let mut guard = logged_in(&context).await;

        let ctx = guard.context().expect("logged in");
        assert_eq!(ctx.user_id(), "42");
        assert!(ctx.permissions().allows("manage_loans"));
        assert!(!ctx.permissions().allows("view_payroll"));
        assert_eq!(ctx.form().get("user_id"), Some("42"));
    }

    #[tokio::test]
    async fn test_subscription_gate_scenarios() {
        let cases = [
            (1, 10, SubscriptionGate::WarningWindow(10)),
            (1, 15, SubscriptionGate::WarningWindow(15)),
            (1, 20, SubscriptionGate::Clear),
            (1, 0, SubscriptionGate::Clear),
            (1, -3, SubscriptionGate::Clear),
            (2, 10, SubscriptionGate::Blocked),
            (2, 400, SubscriptionGate::Blocked),
            (0, 5, SubscriptionGate::Clear),
        ];

        for (status, days, expected) in cases {
            let context = TestContext::new();
            context.backend.respond(login_body(status, days));
            let mut guard = context.guard();
            let session = guard.login(&credentials()).await.unwrap();

            assert_eq!(
                TestGuard::check_subscription_gate(&session),
                expected,
                "status {} days {}",
                status,
                days
            );
            assert_eq!(guard.subscription_gate(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_blocked_subscription_routes_to_paywall() {
        let context = TestContext::new();
        context.backend.respond(login_body(2, 0));
        let mut guard = context.guard();
        guard.login(&credentials()).await.unwrap();

        let gate = guard.subscription_gate().unwrap();
        assert_eq!(gate.route(), Some(Route::Paywall));
        assert_eq!(SubscriptionGate::Clear.route(), None);
    }
}
