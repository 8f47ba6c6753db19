/// A full-page destination the UI shell navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The entry route (login screen).
    Login,
    /// The subscription-expired paywall, shown regardless of the current route.
    Paywall,
}

/// How an error is presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A message rendered inside the current screen.
    Inline(String),
    /// A dismissible notification. `retry` exposes a manual retry action.
    Toast { message: String, retry: bool },
    /// The whole page is replaced.
    Redirect { route: Route, message: String },
}

impl Notice {
    /// The text shown to the user.
    pub fn message(&self) -> &str {
        match self {
            Notice::Inline(message) => message,
            Notice::Toast { message, .. } => message,
            Notice::Redirect { message, .. } => message,
        }
    }

    /// Whether the affected screen should offer a retry action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Notice::Toast { retry: true, .. })
    }
}
