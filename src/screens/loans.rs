use std::borrow::Cow;

use serde::Deserialize;

use crate::api::backend::Backend;
use crate::api::context::AuthContext;
use crate::api::envelope;
use crate::api::lenient;
use crate::error::Result;
use crate::models::permissions::MANAGE_LOANS;
use crate::report::record::{Column, Tabular};
use crate::report::value::{SortKind, number_text};
use crate::validation::forms::{LoanApplicationForm, validate_form};

pub const LOAN_LIST_ENDPOINT: &str = "loan/list";
pub const LOAN_INSTALLMENTS_ENDPOINT: &str = "loan/installments";
pub const LOAN_APPLY_ENDPOINT: &str = "loan/apply";

/// A loan or salary advance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoanRecord {
    #[serde(default, alias = "loan_id", deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, alias = "name", deserialize_with = "lenient::string")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub loan_type: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
    /// Interest rate in percent.
    #[serde(default, deserialize_with = "lenient::number")]
    pub rate: f64,
    /// Months.
    #[serde(default, deserialize_with = "lenient::number")]
    pub tenure: f64,
    /// `DD-MM-YYYY`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanColumn {
    Employee,
    LoanType,
    Amount,
    Rate,
    Tenure,
    StartDate,
    Status,
}

impl Column for LoanColumn {
    fn all() -> &'static [Self] {
        &[
            LoanColumn::Employee,
            LoanColumn::LoanType,
            LoanColumn::Amount,
            LoanColumn::Rate,
            LoanColumn::Tenure,
            LoanColumn::StartDate,
            LoanColumn::Status,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            LoanColumn::Employee => "Employee Name",
            LoanColumn::LoanType => "Loan Type",
            LoanColumn::Amount => "Amount",
            LoanColumn::Rate => "Interest Rate",
            LoanColumn::Tenure => "Tenure",
            LoanColumn::StartDate => "Start Date",
            LoanColumn::Status => "Status",
        }
    }

    fn kind(self) -> SortKind {
        match self {
            LoanColumn::Amount | LoanColumn::Rate | LoanColumn::Tenure => SortKind::Numeric,
            LoanColumn::StartDate => SortKind::Date,
            _ => SortKind::Text,
        }
    }
}

impl Tabular for LoanRecord {
    type Column = LoanColumn;

    fn value(&self, column: LoanColumn) -> Cow<'_, str> {
        match column {
            LoanColumn::Employee => Cow::Borrowed(self.employee_name.as_str()),
            LoanColumn::LoanType => Cow::Borrowed(self.loan_type.as_str()),
            LoanColumn::Amount => Cow::Owned(number_text(self.amount)),
            LoanColumn::Rate => Cow::Owned(number_text(self.rate)),
            LoanColumn::Tenure => Cow::Owned(number_text(self.tenure)),
            LoanColumn::StartDate => Cow::Borrowed(self.start_date.as_str()),
            LoanColumn::Status => Cow::Borrowed(self.status.as_str()),
        }
    }

    fn status(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.status.as_str()))
    }

    fn search_values(&self) -> Vec<Cow<'_, str>> {
        let mut values: Vec<Cow<'_, str>> = LoanColumn::all().iter().map(|&c| self.value(c)).collect();
        values.push(Cow::Borrowed(self.id.as_str()));
        values
    }
}

/// One scheduled repayment of a loan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoanInstallment {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub installment_no: i64,
    /// `DD-MM-YYYY`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub due_date: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
    /// `Paid` or `Due`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentColumn {
    Number,
    DueDate,
    Amount,
    Status,
}

impl Column for InstallmentColumn {
    fn all() -> &'static [Self] {
        &[
            InstallmentColumn::Number,
            InstallmentColumn::DueDate,
            InstallmentColumn::Amount,
            InstallmentColumn::Status,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            InstallmentColumn::Number => "#",
            InstallmentColumn::DueDate => "Due Date",
            InstallmentColumn::Amount => "Amount",
            InstallmentColumn::Status => "Status",
        }
    }

    fn kind(self) -> SortKind {
        match self {
            InstallmentColumn::Number | InstallmentColumn::Amount => SortKind::Numeric,
            InstallmentColumn::DueDate => SortKind::Date,
            InstallmentColumn::Status => SortKind::Text,
        }
    }
}

impl Tabular for LoanInstallment {
    type Column = InstallmentColumn;

    fn value(&self, column: InstallmentColumn) -> Cow<'_, str> {
        match column {
            InstallmentColumn::Number => Cow::Owned(self.installment_no.to_string()),
            InstallmentColumn::DueDate => Cow::Borrowed(self.due_date.as_str()),
            InstallmentColumn::Amount => Cow::Owned(number_text(self.amount)),
            InstallmentColumn::Status => Cow::Borrowed(self.status.as_str()),
        }
    }

    fn status(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.status.as_str()))
    }
}

/// Loads every loan visible to the acting user.
pub async fn fetch_loans<B: Backend>(backend: &B, ctx: &AuthContext) -> Result<Vec<LoanRecord>> {
    let body = backend.post_form(LOAN_LIST_ENDPOINT, ctx.form()).await?;
    envelope::decode(&body)
}

/// Loads the repayment schedule of one loan, on demand.
pub async fn fetch_installments<B: Backend>(
    backend: &B,
    ctx: &AuthContext,
    loan_id: &str,
) -> Result<Vec<LoanInstallment>> {
    let fields = ctx.form().text("loan_id", loan_id);
    let body = backend.post_form(LOAN_INSTALLMENTS_ENDPOINT, fields).await?;
    envelope::decode(&body)
}

/// Submits a loan application after local validation.
///
/// Requires the `manage_loans` permission.
pub async fn apply_loan<B: Backend>(backend: &B, ctx: &AuthContext, form: &LoanApplicationForm) -> Result<()> {
    validate_form(form)?;
    ctx.ensure_allowed(MANAGE_LOANS)?;

    let fields = ctx
        .form()
        .text("employee_id", form.employee_id.trim())
        .text("loan_type", form.loan_type.trim())
        .text("amount", number_text(form.amount))
        .text("rate", number_text(form.rate))
        .text("tenure", form.tenure.to_string())
        .text("start_date", form.start_date.trim());
    let body = backend.post_form(LOAN_APPLY_ENDPOINT, fields).await?;
    envelope::decode_ack(&body)?;

    tracing::info!("💰 Loan application submitted for employee {}", form.employee_id);
    Ok(())
}
