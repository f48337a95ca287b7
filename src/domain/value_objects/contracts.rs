use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{contracts::ContractEntity, plans::PlanEntity};
use crate::domain::value_objects::enums::contract_statuses::ContractStatus;
use crate::domain::value_objects::payments::PaymentDto;
use crate::domain::value_objects::plans::PlanDto;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractDto {
    pub id: i64,
    pub user_id: Uuid,
    pub plan: PlanDto,
    pub started_at: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub next_renewal_available_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: ContractStatus,
}

impl ContractDto {
    pub fn from_entities(contract: ContractEntity, plan: PlanEntity) -> Self {
        Self {
            id: contract.id,
            user_id: contract.user_id,
            plan: plan.into(),
            started_at: contract.started_at,
            expiration_date: contract.expiration_date,
            next_renewal_available_at: contract.next_renewal_available_at,
            ended_at: contract.ended_at,
            status: ContractStatus::from_str(&contract.status),
        }
    }
}

/// Result of a state-changing contract operation: the contract as it now
/// stands (plan resolved) plus the payment recorded for the transition.
#[derive(Debug, Clone, Serialize)]
pub struct ContractTransactionDto {
    pub contract: ContractDto,
    pub payment: PaymentDto,
}

/// Calendar interval during which a renewal request is accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RenewalWindow {
    pub available_from: NaiveDate,
    pub expiration_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub plan_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePlanRequest {
    pub new_plan_id: i64,
}
