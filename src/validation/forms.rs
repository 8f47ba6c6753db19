use chrono::NaiveDate;
use garde::Validate;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AppError, Result};

/// Runs the form's rules and reports the first one violated.
///
/// # Arguments
///
/// * `form` - Any garde-validated form.
///
/// # Returns
///
/// `AppError::Validation("field: message")` for the first failing field,
/// in declaration order.
pub fn validate_form<T>(form: &T) -> Result<()>
where
    T: Validate,
    T::Context: Default,
{
    form.validate().map_err(|report| {
        let message = report
            .iter()
            .next()
            .map(|(path, error)| format!("{}: {}", path, error))
            .unwrap_or_else(|| "Invalid input".to_string());
        tracing::debug!("Form rejected: {}", message);
        AppError::Validation(message)
    })
}

fn required(value: &str, _: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("is required"));
    }
    Ok(())
}

fn calendar_date(value: &str, _: &()) -> garde::Result {
    required(value, &())?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| garde::Error::new("must be a date (YYYY-MM-DD)"))
}

fn positive(value: &f64, _: &()) -> garde::Result {
    if *value > 0.0 {
        Ok(())
    } else {
        Err(garde::Error::new("must be greater than 0"))
    }
}

/// Ten digits, or `+` followed by a 1-3 digit country code and ten digits.
fn phone_number(value: &str, _: &()) -> garde::Result {
    let value = value.trim();
    let (digits, min, max) = match value.strip_prefix('+') {
        Some(rest) => (rest, 11, 13),
        None => (value, 10, 10),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(garde::Error::new("must contain only digits"));
    }

    if digits.len() < min || digits.len() > max {
        return Err(garde::Error::new("must be a 10 digit number"));
    }

    Ok(())
}

/// Login credentials. Wiped from memory on drop.
#[derive(Clone, Validate, Zeroize, ZeroizeOnDrop)]
pub struct LoginForm {
    #[garde(custom(required), length(max = 255))]
    pub username: String,
    #[garde(custom(required), length(max = 128))]
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A leave request submitted on behalf of an employee.
#[derive(Debug, Clone, Validate)]
pub struct LeaveApplicationForm {
    #[garde(custom(required))]
    pub employee_id: String,
    #[garde(custom(required))]
    pub leave_type: String,
    #[garde(custom(calendar_date))]
    pub from_date: String,
    #[garde(custom(calendar_date))]
    pub to_date: String,
    #[garde(range(min = 0.5, max = 60.0))]
    pub days: f64,
    #[garde(custom(required), length(max = 500))]
    pub reason: String,
}

/// A loan or salary advance application.
#[derive(Debug, Clone, Validate)]
pub struct LoanApplicationForm {
    #[garde(custom(required))]
    pub employee_id: String,
    #[garde(custom(required))]
    pub loan_type: String,
    #[garde(custom(positive))]
    pub amount: f64,
    #[garde(range(min = 0.0, max = 100.0))]
    pub rate: f64,
    /// Months.
    #[garde(range(min = 1, max = 360))]
    pub tenure: u32,
    #[garde(custom(calendar_date))]
    pub start_date: String,
}

/// Employee contact details edited from the profile screen.
#[derive(Debug, Clone, Validate)]
pub struct EmployeeContactForm {
    #[garde(custom(required))]
    pub full_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(custom(self::phone_number))]
    pub phone_number: String,
}
