use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    #[default]
    Active,
    Inactive,
}

impl Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            ContractStatus::Active => "active",
            ContractStatus::Inactive => "inactive",
        };
        write!(f, "{}", status)
    }
}

impl ContractStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "active" => ContractStatus::Active,
            _ => ContractStatus::Inactive,
        }
    }
}
