use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{
    repositories::contracts::ContractRepository,
    value_objects::{enums::payment_actions::PaymentAction, payments::PaymentHistoryDto},
};

/// Payment history report for one user, most-recent-first. Plan description
/// and contract expiration are joined in by the store up front; nothing is
/// lazily fetched while building rows.
pub struct PaymentHistoryUseCase<C>
where
    C: ContractRepository + Send + Sync + 'static,
{
    contract_repo: Arc<C>,
}

impl<C> PaymentHistoryUseCase<C>
where
    C: ContractRepository + Send + Sync + 'static,
{
    pub fn new(contract_repo: Arc<C>) -> Self {
        Self { contract_repo }
    }

    pub async fn history(&self, user_id: Uuid) -> Result<Vec<PaymentHistoryDto>> {
        let rows = self
            .contract_repo
            .list_payments_for_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load history");
                err
            })?;

        info!(%user_id, row_count = rows.len(), "payments: history loaded");

        Ok(rows
            .into_iter()
            .map(|(payment, plan_description, _contract_expiration)| PaymentHistoryDto {
                payment_at: payment.payment_at.date_naive(),
                plan: plan_description,
                action: PaymentAction::from_str(&payment.action),
                payment_type: payment.payment_type,
                plan_value_minor: payment.plan_value_minor,
                credit_minor: payment.credit_minor,
                price_minor: payment.price_minor,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use crate::domain::entities::payments::PaymentEntity;
    use crate::domain::repositories::contracts::MockContractRepository;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn payment(id: i64, action: &str, price_minor: i64, credit_minor: i64, at: DateTime<Utc>) -> PaymentEntity {
        PaymentEntity {
            id,
            contract_id: 7,
            action: action.to_string(),
            payment_type: "pix".to_string(),
            plan_value_minor: price_minor + credit_minor,
            price_minor,
            credit_minor,
            payment_at: at,
            status: "paid".to_string(),
            created_at: at,
        }
    }

    #[tokio::test]
    async fn maps_rows_most_recent_first() {
        let user_id = Uuid::new_v4();

        let mut contract_repo = MockContractRepository::new();
        contract_repo.expect_list_payments_for_user().returning(|_| {
            Box::pin(async {
                Ok(vec![
                    (
                        payment(2, "purchase", 12_000, 3_000, utc(2024, 4, 25, 12)),
                        "Up to 25 inspections".to_string(),
                        utc(2024, 5, 25, 12),
                    ),
                    (
                        payment(1, "renewal", 9_000, 0, utc(2024, 4, 5, 12)),
                        "Up to 10 inspections".to_string(),
                        utc(2024, 5, 5, 12),
                    ),
                ])
            })
        });

        let usecase = PaymentHistoryUseCase::new(Arc::new(contract_repo));
        let history = usecase.history(user_id).await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(
            history[0].payment_at,
            NaiveDate::from_ymd_opt(2024, 4, 25).unwrap()
        );
        assert_eq!(history[0].action, PaymentAction::Purchase);
        assert_eq!(history[0].credit_minor, 3_000);
        assert_eq!(history[1].action, PaymentAction::Renewal);
        assert_eq!(history[1].plan, "Up to 10 inspections");
    }
}
