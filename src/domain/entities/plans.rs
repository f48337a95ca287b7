use diesel::prelude::*;

use crate::infrastructure::postgres::schema::plans;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: i64,
    pub description: String,
    pub client_limit: i32,
    pub storage_gb: i32,
    pub price_minor: i64,
    pub is_active: bool,
}
