use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: i64,
    pub contract_id: i64,
    pub action: String,
    pub payment_type: String,
    pub plan_value_minor: i64,
    pub price_minor: i64,
    pub credit_minor: i64,
    pub payment_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub contract_id: i64,
    pub action: String,
    pub payment_type: String,
    pub plan_value_minor: i64,
    pub price_minor: i64,
    pub credit_minor: i64,
    pub payment_at: DateTime<Utc>,
    pub status: String,
}
