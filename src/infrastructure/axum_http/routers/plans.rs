use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{
    application::usecases::{contracts::ContractError, plans::PlanUseCase},
    domain::repositories::plans::PlanRepository,
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, repositories::plans::PlanPostgres,
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(db_pool);
    let plan_usecase = PlanUseCase::new(Arc::new(plan_repository));

    Router::new()
        .route("/", get(list_plans))
        .with_state(Arc::new(plan_usecase))
}

pub async fn list_plans<P>(State(plan_usecase): State<Arc<PlanUseCase<P>>>) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    match plan_usecase.list_plans().await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => ContractError::Internal(err).into_response(),
    }
}
