use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::payments::{InsertPaymentEntity, PaymentEntity};
use crate::domain::value_objects::enums::{
    payment_actions::PaymentAction, payment_statuses::PaymentStatus, payment_types::PaymentType,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentDto {
    pub id: i64,
    pub contract_id: i64,
    pub action: PaymentAction,
    pub payment_type: String,
    pub plan_value_minor: i64,
    pub price_minor: i64,
    pub credit_minor: i64,
    pub payment_at: DateTime<Utc>,
    pub status: PaymentStatus,
}

impl From<PaymentEntity> for PaymentDto {
    fn from(value: PaymentEntity) -> Self {
        Self {
            id: value.id,
            contract_id: value.contract_id,
            action: PaymentAction::from_str(&value.action),
            payment_type: value.payment_type,
            plan_value_minor: value.plan_value_minor,
            price_minor: value.price_minor,
            credit_minor: value.credit_minor,
            payment_at: value.payment_at,
            status: PaymentStatus::from_str(&value.status),
        }
    }
}

/// Payment to record alongside a contract write. The owning contract id is
/// assigned by the store once the contract row exists; payments always land
/// with status=paid.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub action: PaymentAction,
    pub payment_type: PaymentType,
    pub plan_value_minor: i64,
    pub price_minor: i64,
    pub credit_minor: i64,
    pub payment_at: DateTime<Utc>,
}

impl PaymentDraft {
    pub fn into_insert(self, contract_id: i64) -> InsertPaymentEntity {
        InsertPaymentEntity {
            contract_id,
            action: self.action.to_string(),
            payment_type: self.payment_type.to_string(),
            plan_value_minor: self.plan_value_minor,
            price_minor: self.price_minor,
            credit_minor: self.credit_minor,
            payment_at: self.payment_at,
            status: PaymentStatus::Paid.to_string(),
        }
    }
}

/// One row of the payment history report, most-recent-first.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentHistoryDto {
    pub payment_at: NaiveDate,
    pub plan: String,
    pub action: PaymentAction,
    pub payment_type: String,
    pub plan_value_minor: i64,
    pub credit_minor: i64,
    pub price_minor: i64,
}
