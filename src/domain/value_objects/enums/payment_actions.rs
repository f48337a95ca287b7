use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentAction {
    Purchase,
    Renewal,
}

impl Display for PaymentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            PaymentAction::Purchase => "purchase",
            PaymentAction::Renewal => "renewal",
        };
        write!(f, "{}", action)
    }
}

impl PaymentAction {
    pub fn from_str(value: &str) -> Self {
        match value {
            "renewal" => PaymentAction::Renewal,
            _ => PaymentAction::Purchase,
        }
    }
}
