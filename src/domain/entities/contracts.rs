use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::contracts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = contracts)]
pub struct ContractEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub plan_id: i64,
    pub started_at: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub next_renewal_available_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contracts)]
pub struct InsertContractEntity {
    pub user_id: Uuid,
    pub plan_id: i64,
    pub started_at: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub next_renewal_available_at: Option<DateTime<Utc>>,
    pub status: String,
}
