use std::borrow::Cow;

use serde::Deserialize;

use crate::api::backend::Backend;
use crate::api::context::AuthContext;
use crate::api::envelope;
use crate::api::lenient;
use crate::error::Result;
use crate::models::permissions::VIEW_PAYROLL;
use crate::report::record::{Column, Tabular};
use crate::report::value::{SortKind, number_text};

pub const SALARY_SUMMARY_ENDPOINT: &str = "salary/summary";

/// One employee's payroll line. Every amount is computed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SalaryRecord {
    #[serde(default, alias = "name", deserialize_with = "lenient::string")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub employee_code: String,
    #[serde(default, alias = "basic_salary", deserialize_with = "lenient::number")]
    pub basic: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub allowances: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub deductions: f64,
    #[serde(default, alias = "net_salary", deserialize_with = "lenient::number")]
    pub net_pay: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryColumn {
    Employee,
    Code,
    Basic,
    Allowances,
    Deductions,
    NetPay,
}

impl Column for SalaryColumn {
    fn all() -> &'static [Self] {
        &[
            SalaryColumn::Employee,
            SalaryColumn::Code,
            SalaryColumn::Basic,
            SalaryColumn::Allowances,
            SalaryColumn::Deductions,
            SalaryColumn::NetPay,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            SalaryColumn::Employee => "Employee Name",
            SalaryColumn::Code => "Employee Code",
            SalaryColumn::Basic => "Basic",
            SalaryColumn::Allowances => "Allowances",
            SalaryColumn::Deductions => "Deductions",
            SalaryColumn::NetPay => "Net Pay",
        }
    }

    fn kind(self) -> SortKind {
        match self {
            SalaryColumn::Employee | SalaryColumn::Code => SortKind::Text,
            _ => SortKind::Numeric,
        }
    }
}

impl Tabular for SalaryRecord {
    type Column = SalaryColumn;

    fn value(&self, column: SalaryColumn) -> Cow<'_, str> {
        match column {
            SalaryColumn::Employee => Cow::Borrowed(self.employee_name.as_str()),
            SalaryColumn::Code => Cow::Borrowed(self.employee_code.as_str()),
            SalaryColumn::Basic => Cow::Owned(number_text(self.basic)),
            SalaryColumn::Allowances => Cow::Owned(number_text(self.allowances)),
            SalaryColumn::Deductions => Cow::Owned(number_text(self.deductions)),
            SalaryColumn::NetPay => Cow::Owned(number_text(self.net_pay)),
        }
    }
}

/// Column sums shown in the table footer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayrollTotals {
    pub employees: usize,
    pub basic: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub net_pay: f64,
}

/// Adds up the server-computed columns.
pub fn payroll_totals(records: &[SalaryRecord]) -> PayrollTotals {
    records.iter().fold(
        PayrollTotals {
            employees: records.len(),
            ..PayrollTotals::default()
        },
        |mut totals, record| {
            totals.basic += record.basic;
            totals.allowances += record.allowances;
            totals.deductions += record.deductions;
            totals.net_pay += record.net_pay;
            totals
        },
    )
}

/// Loads the payroll summary of `month` (`YYYY-MM`).
///
/// Requires the `view_payroll` permission.
pub async fn fetch_salary_summary<B: Backend>(
    backend: &B,
    ctx: &AuthContext,
    month: &str,
) -> Result<Vec<SalaryRecord>> {
    ctx.ensure_allowed(VIEW_PAYROLL)?;

    let fields = ctx.form().text("month", month);
    let body = backend.post_form(SALARY_SUMMARY_ENDPOINT, fields).await?;
    envelope::decode(&body)
}
