use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The only payment channel the system records. Payments are marked paid at
/// creation time; there is no asynchronous confirmation step.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    Pix,
}

impl Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let payment_type = match self {
            PaymentType::Pix => "pix",
        };
        write!(f, "{}", payment_type)
    }
}
