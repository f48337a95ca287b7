use serde::{Deserialize, Serialize};

use crate::domain::entities::plans::PlanEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDto {
    pub id: i64,
    pub description: String,
    pub client_limit: i32,
    pub storage_gb: i32,
    pub price_minor: i64,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            description: value.description,
            client_limit: value.client_limit,
            storage_gb: value.storage_gb,
            price_minor: value.price_minor,
        }
    }
}
