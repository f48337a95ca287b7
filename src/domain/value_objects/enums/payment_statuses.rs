use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Canceled,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Canceled => "canceled",
        };
        write!(f, "{}", status)
    }
}

impl PaymentStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "pending" => PaymentStatus::Pending,
            "canceled" => PaymentStatus::Canceled,
            _ => PaymentStatus::Paid,
        }
    }
}
