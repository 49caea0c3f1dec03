use std::sync::OnceLock;

use error_stack::Report;
use regex::Regex;
use rust_decimal::Decimal;
use url::Url;

use kernel::{FieldViolation, KernelError};

/// Prices are stored as `NUMERIC(12, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 10_000_000_000;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
}

/// Collects every rejected field of an input before failing, so callers see all
/// problems at once.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(
        &mut self,
        field: &'static str,
        condition: bool,
        message: impl Into<String>,
    ) -> &mut Self {
        if !condition {
            self.violations.push(FieldViolation::new(field, message));
        }
        self
    }

    pub fn not_blank(
        &mut self,
        field: &'static str,
        value: &str,
        message: impl Into<String>,
    ) -> &mut Self {
        self.require(field, !value.trim().is_empty(), message)
    }

    pub fn max_chars(
        &mut self,
        field: &'static str,
        value: &str,
        max: usize,
        message: impl Into<String>,
    ) -> &mut Self {
        self.require(field, value.chars().count() <= max, message)
    }

    pub fn email(
        &mut self,
        field: &'static str,
        value: &str,
        message: impl Into<String>,
    ) -> &mut Self {
        let valid = email_pattern().is_some_and(|pattern| pattern.is_match(value.trim()));
        self.require(field, valid, message)
    }

    pub fn url(&mut self, field: &'static str, value: &str, message: impl Into<String>) -> &mut Self {
        let valid = Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
        self.require(field, valid, message)
    }

    /// Positive, at most two fraction digits and below `10^10`, so every store keeps
    /// the value exactly as given.
    pub fn price(&mut self, field: &'static str, value: &Decimal) -> &mut Self {
        self.require(field, *value > Decimal::ZERO, "Price must be greater than 0")
            .require(
                field,
                value.normalize().scale() <= PRICE_SCALE,
                "Price must have at most 2 decimal places",
            )
            .require(
                field,
                *value < Decimal::from(PRICE_LIMIT),
                "Price must be less than 10000000000",
            )
    }

    pub fn finish(&mut self) -> error_stack::Result<(), KernelError> {
        let violations = std::mem::take(&mut self.violations);
        if violations.is_empty() {
            return Ok(());
        }
        Err(violations
            .into_iter()
            .fold(Report::new(KernelError::Validation), |report, violation| {
                report.attach_printable(violation)
            }))
    }
}
