use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

/// Permission flag required to approve or reject leave requests.
pub const APPROVE_LEAVE: &str = "approve_leave";
/// Permission flag required to submit loan applications on behalf of employees.
pub const MANAGE_LOANS: &str = "manage_loans";
/// Permission flag required to see payroll summaries.
pub const VIEW_PAYROLL: &str = "view_payroll";

/// Permission flags granted at login.
///
/// Set once after login, read-only afterwards, cleared on logout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeSet<String>);

impl Permissions {
    /// Creates a permission set from the flags the backend returned.
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(flags.into_iter().map(Into::into).collect())
    }

    /// Whether `flag` was granted.
    pub fn allows(&self, flag: &str) -> bool {
        self.0.contains(flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
