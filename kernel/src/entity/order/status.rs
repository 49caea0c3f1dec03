use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::{ErrorMessage, FieldViolation, KernelError};

/// Any status may follow any other; there is no enforced workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Pending,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [OrderStatus::New, OrderStatus::Pending, OrderStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let allowed = OrderStatus::ALL.map(|status| status.as_str()).join(", ");
                Report::new(KernelError::Validation)
                    .attach_printable(FieldViolation::new(
                        "status",
                        format!("Invalid status value. Allowed values: {allowed}"),
                    ))
                    .attach_printable(ErrorMessage::new(format!("Unknown order status: {s}")))
            })
    }
}

#[cfg(test)]
mod test {
    use super::OrderStatus;
    use crate::KernelError;

    #[test]
    fn parses_only_enumerated_values() {
        assert_eq!("PENDING".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        let error = "SHIPPED".parse::<OrderStatus>().unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
        assert!("pending".parse::<OrderStatus>().is_err());
    }
}
