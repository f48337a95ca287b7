use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    application::usecases::{contracts::ContractUseCase, preview::PreviewUseCase},
    domain::{
        repositories::{contracts::ContractRepository, plans::PlanRepository},
        value_objects::{
            contracts::{ChangePlanRequest, SubscribeRequest},
            preview::PreviewParams,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{contracts::ContractPostgres, plans::PlanPostgres},
    },
};

pub struct ContractsRouterState<C, P>
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    contract_usecase: ContractUseCase<C, P>,
    preview_usecase: PreviewUseCase<C, P>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, demo_user_id: Uuid) -> Router {
    let contract_repository = Arc::new(ContractPostgres::new(Arc::clone(&db_pool)));
    let plan_repository = Arc::new(PlanPostgres::new(db_pool));

    let state = ContractsRouterState {
        contract_usecase: ContractUseCase::new(
            Arc::clone(&contract_repository),
            Arc::clone(&plan_repository),
        ),
        preview_usecase: PreviewUseCase::new(contract_repository, plan_repository),
    };

    Router::new()
        .route("/current", get(current))
        .route("/preview", get(preview))
        .route("/subscribe", post(subscribe))
        .route("/renew", post(renew))
        .route("/change-plan", post(change_plan))
        .layer(Extension(demo_user_id))
        .with_state(Arc::new(state))
}

pub async fn current<C, P>(
    State(state): State<Arc<ContractsRouterState<C, P>>>,
    Extension(user_id): Extension<Uuid>,
) -> impl IntoResponse
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match state
        .contract_usecase
        .get_active_plan(user_id, Utc::now())
        .await
    {
        Ok(contract) => Json(contract).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn preview<C, P>(
    State(state): State<Arc<ContractsRouterState<C, P>>>,
    Extension(user_id): Extension<Uuid>,
    Query(params): Query<PreviewParams>,
) -> impl IntoResponse
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match state
        .preview_usecase
        .preview(user_id, params.plan_id, Utc::now())
        .await
    {
        Ok(quote) => Json(quote).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn subscribe<C, P>(
    State(state): State<Arc<ContractsRouterState<C, P>>>,
    Extension(user_id): Extension<Uuid>,
    Json(body): Json<SubscribeRequest>,
) -> impl IntoResponse
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match state
        .contract_usecase
        .subscribe(user_id, body.plan_id, Utc::now())
        .await
    {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn renew<C, P>(
    State(state): State<Arc<ContractsRouterState<C, P>>>,
    Extension(user_id): Extension<Uuid>,
) -> impl IntoResponse
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match state.contract_usecase.renew(user_id, Utc::now()).await {
        Ok(transaction) => Json(transaction).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn change_plan<C, P>(
    State(state): State<Arc<ContractsRouterState<C, P>>>,
    Extension(user_id): Extension<Uuid>,
    Json(body): Json<ChangePlanRequest>,
) -> impl IntoResponse
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match state
        .contract_usecase
        .change_plan(user_id, body.new_plan_id, Utc::now())
        .await
    {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(err) => err.into_response(),
    }
}
