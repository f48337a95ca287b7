use std::sync::Arc;

use axum::{
    Extension, Json, Router, extract::State, response::IntoResponse, routing::get,
};
use uuid::Uuid;

use crate::{
    application::usecases::{contracts::ContractError, payments::PaymentHistoryUseCase},
    domain::repositories::contracts::ContractRepository,
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, repositories::contracts::ContractPostgres,
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, demo_user_id: Uuid) -> Router {
    let contract_repository = ContractPostgres::new(db_pool);
    let payment_history_usecase = PaymentHistoryUseCase::new(Arc::new(contract_repository));

    Router::new()
        .route("/history", get(history))
        .layer(Extension(demo_user_id))
        .with_state(Arc::new(payment_history_usecase))
}

pub async fn history<C>(
    State(payment_history_usecase): State<Arc<PaymentHistoryUseCase<C>>>,
    Extension(user_id): Extension<Uuid>,
) -> impl IntoResponse
where
    C: ContractRepository + Send + Sync + 'static,
{
    match payment_history_usecase.history(user_id).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => ContractError::Internal(err).into_response(),
    }
}
