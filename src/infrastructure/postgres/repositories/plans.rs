use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::domain::{entities::plans::PlanEntity, repositories::plans::PlanRepository};
use crate::infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::plans};

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = plans::table
            .filter(plans::id.eq(plan_id))
            .select(PlanEntity::as_select())
            .first::<PlanEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn find_active_plan_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = plans::table
            .filter(plans::id.eq(plan_id))
            .filter(plans::is_active.eq(true))
            .select(PlanEntity::as_select())
            .first::<PlanEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = plans::table
            .filter(plans::is_active.eq(true))
            .order(plans::price_minor.asc())
            .select(PlanEntity::as_select())
            .load::<PlanEntity>(&mut conn)?;

        Ok(rows)
    }
}
