use std::fmt::{Display, Formatter};

use error_stack::{Context, Report};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    NotFound,
    Validation,
    BusinessRule,
    Conflict,
    Unauthorized,
    Forbidden,
    Configuration,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Entity not found"),
            KernelError::Validation => write!(f, "Validation failed"),
            KernelError::BusinessRule => write!(f, "Business rule violated"),
            KernelError::Conflict => write!(f, "Entity already exists"),
            KernelError::Unauthorized => write!(f, "Authentication required"),
            KernelError::Forbidden => write!(f, "Access denied"),
            KernelError::Configuration => write!(f, "Server configuration error"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

impl KernelError {
    /// Starts a report carrying a caller-facing message.
    pub fn with_message(self, message: impl Into<String>) -> Report<KernelError> {
        Report::new(self).attach_printable(ErrorMessage::new(message))
    }
}

/// Message meant for the caller. Attached to reports with `attach_printable`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ErrorMessage(String);

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl AsRef<str> for ErrorMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single rejected input field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FieldViolation {
    field: &'static str,
    message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub trait ReportExt {
    /// Caller-facing messages attached to this report, oldest first.
    fn messages(&self) -> Vec<String>;
}

impl ReportExt for error_stack::Report<KernelError> {
    fn messages(&self) -> Vec<String> {
        let mut messages = self
            .frames()
            .filter_map(|frame| {
                frame
                    .downcast_ref::<FieldViolation>()
                    .map(ToString::to_string)
                    .or_else(|| frame.downcast_ref::<ErrorMessage>().map(ToString::to_string))
            })
            .collect::<Vec<_>>();
        messages.reverse();
        messages
    }
}

#[cfg(test)]
mod test {
    use error_stack::Report;

    use super::{FieldViolation, KernelError, ReportExt};

    #[test]
    fn collects_attached_messages_in_order() {
        let report = Report::new(KernelError::Validation)
            .attach_printable(FieldViolation::new("title", "must not be blank"))
            .attach_printable(FieldViolation::new("price", "must be greater than 0"))
            .attach_printable("internal detail");
        assert_eq!(
            report.messages(),
            vec![
                "title: must not be blank".to_string(),
                "price: must be greater than 0".to_string()
            ]
        );

        let report = KernelError::NotFound.with_message("Can't find book");
        assert_eq!(report.messages(), vec!["Can't find book".to_string()]);
    }
}
