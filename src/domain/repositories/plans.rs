use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::plans::PlanEntity;

#[async_trait]
#[automock]
pub trait PlanRepository {
    /// Resolves a plan regardless of its catalog flag. A contract must keep
    /// renewing even after its plan is retired from sale.
    async fn find_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>>;

    /// Purchase and change targets must be active catalog entries.
    async fn find_active_plan_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>>;

    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>>;
}
