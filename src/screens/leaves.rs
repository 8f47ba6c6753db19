use std::borrow::Cow;

use serde::Deserialize;

use crate::api::backend::Backend;
use crate::api::context::AuthContext;
use crate::api::envelope;
use crate::api::lenient;
use crate::error::Result;
use crate::models::permissions::APPROVE_LEAVE;
use crate::report::record::{Column, Tabular};
use crate::report::value::{SortKind, number_text};
use crate::validation::forms::{LeaveApplicationForm, validate_form};

pub const LEAVE_LIST_ENDPOINT: &str = "leave/list";
pub const LEAVE_STATUS_ENDPOINT: &str = "leave/update_status";
pub const LEAVE_APPLY_ENDPOINT: &str = "leave/apply";

/// A leave request as listed for the selected month.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeaveRecord {
    #[serde(default, alias = "leave_id", deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, alias = "name", deserialize_with = "lenient::string")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub leave_type: String,
    /// `DD-MM-YYYY`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub from_date: String,
    /// `DD-MM-YYYY`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub to_date: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub days: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub reason: String,
    /// `Pending`, `Approved` or `Rejected`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveColumn {
    Employee,
    LeaveType,
    From,
    To,
    Days,
    Reason,
    Status,
}

impl Column for LeaveColumn {
    fn all() -> &'static [Self] {
        &[
            LeaveColumn::Employee,
            LeaveColumn::LeaveType,
            LeaveColumn::From,
            LeaveColumn::To,
            LeaveColumn::Days,
            LeaveColumn::Reason,
            LeaveColumn::Status,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            LeaveColumn::Employee => "Employee Name",
            LeaveColumn::LeaveType => "Leave Type",
            LeaveColumn::From => "From",
            LeaveColumn::To => "To",
            LeaveColumn::Days => "Days",
            LeaveColumn::Reason => "Reason",
            LeaveColumn::Status => "Status",
        }
    }

    fn kind(self) -> SortKind {
        match self {
            LeaveColumn::From | LeaveColumn::To => SortKind::Date,
            LeaveColumn::Days => SortKind::Numeric,
            _ => SortKind::Text,
        }
    }
}

impl Tabular for LeaveRecord {
    type Column = LeaveColumn;

    fn value(&self, column: LeaveColumn) -> Cow<'_, str> {
        match column {
            LeaveColumn::Employee => Cow::Borrowed(self.employee_name.as_str()),
            LeaveColumn::LeaveType => Cow::Borrowed(self.leave_type.as_str()),
            LeaveColumn::From => Cow::Borrowed(self.from_date.as_str()),
            LeaveColumn::To => Cow::Borrowed(self.to_date.as_str()),
            LeaveColumn::Days => Cow::Owned(number_text(self.days)),
            LeaveColumn::Reason => Cow::Borrowed(self.reason.as_str()),
            LeaveColumn::Status => Cow::Borrowed(self.status.as_str()),
        }
    }

    fn status(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.status.as_str()))
    }

    fn search_values(&self) -> Vec<Cow<'_, str>> {
        let mut values: Vec<Cow<'_, str>> = LeaveColumn::all().iter().map(|&c| self.value(c)).collect();
        values.push(Cow::Borrowed(self.id.as_str()));
        values
    }
}

/// An approver's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Approve,
    Reject,
}

impl LeaveDecision {
    /// The status value the backend stores.
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveDecision::Approve => "Approved",
            LeaveDecision::Reject => "Rejected",
        }
    }
}

/// Loads the leave requests of `month` (`YYYY-MM`).
pub async fn fetch_leaves<B: Backend>(backend: &B, ctx: &AuthContext, month: &str) -> Result<Vec<LeaveRecord>> {
    let fields = ctx.form().text("month", month);
    let body = backend.post_form(LEAVE_LIST_ENDPOINT, fields).await?;
    envelope::decode(&body)
}

/// Approves or rejects a leave request.
///
/// Requires the `approve_leave` permission; without it the call is
/// refused locally with `Forbidden`.
pub async fn decide_leave<B: Backend>(
    backend: &B,
    ctx: &AuthContext,
    leave_id: &str,
    decision: LeaveDecision,
) -> Result<()> {
    ctx.ensure_allowed(APPROVE_LEAVE)?;

    let fields = ctx
        .form()
        .text("leave_id", leave_id)
        .text("status", decision.as_str());
    let body = backend.post_form(LEAVE_STATUS_ENDPOINT, fields).await?;
    envelope::decode_ack(&body)?;

    tracing::info!("✅ Leave {} marked {}", leave_id, decision.as_str());
    Ok(())
}

/// Submits a leave request after local validation.
pub async fn apply_leave<B: Backend>(backend: &B, ctx: &AuthContext, form: &LeaveApplicationForm) -> Result<()> {
    validate_form(form)?;

    let fields = ctx
        .form()
        .text("employee_id", form.employee_id.trim())
        .text("leave_type", form.leave_type.trim())
        .text("from_date", form.from_date.trim())
        .text("to_date", form.to_date.trim())
        .text("days", number_text(form.days))
        .text("reason", form.reason.trim());
    let body = backend.post_form(LEAVE_APPLY_ENDPOINT, fields).await?;
    envelope::decode_ack(&body)?;

    tracing::info!("📝 Leave request submitted for employee {}", form.employee_id);
    Ok(())
}
