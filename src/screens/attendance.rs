use std::borrow::Cow;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::backend::Backend;
use crate::api::context::AuthContext;
use crate::api::envelope;
use crate::api::lenient;
use crate::error::Result;
use crate::report::record::{Column, Tabular};
use crate::report::value::{SortKind, number_text};

/// Backend endpoint listing one day's attendance.
pub const ATTENDANCE_ENDPOINT: &str = "attendance/list";

/// Attendance status as coded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
    WeekOff,
    Unknown,
}

impl AttendanceStatus {
    /// Maps `status_id`: 1 present, 2 absent, 3 week off.
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => AttendanceStatus::Present,
            2 => AttendanceStatus::Absent,
            3 => AttendanceStatus::WeekOff,
            _ => AttendanceStatus::Unknown,
        }
    }

    /// The display string the status filter matches against.
    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::WeekOff => "Week Off",
            AttendanceStatus::Unknown => "Unknown",
        }
    }
}

/// One employee's attendance for the selected day.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, alias = "name", deserialize_with = "lenient::string")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub employee_code: String,
    /// `DD-MM-YYYY`.
    #[serde(default, alias = "attendance_date", deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub check_in: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub check_out: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub status_id: i64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub working_hours: f64,
}

impl AttendanceRecord {
    pub fn attendance_status(&self) -> AttendanceStatus {
        AttendanceStatus::from_id(self.status_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceColumn {
    Employee,
    Code,
    Date,
    CheckIn,
    CheckOut,
    Status,
    Hours,
}

impl Column for AttendanceColumn {
    fn all() -> &'static [Self] {
        &[
            AttendanceColumn::Employee,
            AttendanceColumn::Code,
            AttendanceColumn::Date,
            AttendanceColumn::CheckIn,
            AttendanceColumn::CheckOut,
            AttendanceColumn::Status,
            AttendanceColumn::Hours,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            AttendanceColumn::Employee => "Employee Name",
            AttendanceColumn::Code => "Employee Code",
            AttendanceColumn::Date => "Date",
            AttendanceColumn::CheckIn => "Check In",
            AttendanceColumn::CheckOut => "Check Out",
            AttendanceColumn::Status => "Status",
            AttendanceColumn::Hours => "Working Hours",
        }
    }

    fn kind(self) -> SortKind {
        match self {
            AttendanceColumn::Date => SortKind::Date,
            AttendanceColumn::Hours => SortKind::Numeric,
            _ => SortKind::Text,
        }
    }
}

impl Tabular for AttendanceRecord {
    type Column = AttendanceColumn;

    fn value(&self, column: AttendanceColumn) -> Cow<'_, str> {
        match column {
            AttendanceColumn::Employee => Cow::Borrowed(self.employee_name.as_str()),
            AttendanceColumn::Code => Cow::Borrowed(self.employee_code.as_str()),
            AttendanceColumn::Date => Cow::Borrowed(self.date.as_str()),
            AttendanceColumn::CheckIn => Cow::Borrowed(self.check_in.as_str()),
            AttendanceColumn::CheckOut => Cow::Borrowed(self.check_out.as_str()),
            AttendanceColumn::Status => Cow::Borrowed(self.attendance_status().label()),
            AttendanceColumn::Hours => Cow::Owned(number_text(self.working_hours)),
        }
    }

    fn status(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.attendance_status().label()))
    }

    fn search_values(&self) -> Vec<Cow<'_, str>> {
        let mut values: Vec<Cow<'_, str>> = AttendanceColumn::all().iter().map(|&c| self.value(c)).collect();
        values.push(Cow::Owned(self.status_id.to_string()));
        values
    }
}

/// Headline counters above the attendance table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceStats {
    pub total_employees: usize,
    pub present: usize,
    pub absent: usize,
    pub week_off: usize,
}

/// Counts statuses over the full day's collection (not the filtered page).
pub fn calculate_stats(records: &[AttendanceRecord]) -> AttendanceStats {
    records.iter().fold(
        AttendanceStats {
            total_employees: records.len(),
            ..AttendanceStats::default()
        },
        |mut stats, record| {
            match record.attendance_status() {
                AttendanceStatus::Present => stats.present += 1,
                AttendanceStatus::Absent => stats.absent += 1,
                AttendanceStatus::WeekOff => stats.week_off += 1,
                AttendanceStatus::Unknown => {}
            }
            stats
        },
    )
}

/// Loads the attendance sheet of `date`.
///
/// # Arguments
///
/// * `backend` - The REST backend.
/// * `ctx` - The acting user.
/// * `date` - The day to load.
pub async fn fetch_attendance<B: Backend>(
    backend: &B,
    ctx: &AuthContext,
    date: NaiveDate,
) -> Result<Vec<AttendanceRecord>> {
    let fields = ctx.form().text("date", date.format("%Y-%m-%d").to_string());
    let body = backend.post_form(ATTENDANCE_ENDPOINT, fields).await?;
    let records: Vec<AttendanceRecord> = envelope::decode(&body)?;

    tracing::debug!("📋 Loaded {} attendance rows for {}", records.len(), date);
    Ok(records)
}
