use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::application::usecases::contracts::{ContractError, ContractResult};
use crate::domain::{
    entities::plans::PlanEntity,
    policies::{proration, renewal},
    repositories::{contracts::ContractRepository, plans::PlanRepository},
    value_objects::preview::{PreviewAction, PreviewDto},
};

/// Read-only classification of what confirming `plan_id` would do for the
/// user: a first purchase, a renewal of the same plan, or a mid-cycle plan
/// change. The quoted numbers come from the same policy functions the
/// contract use case commits with, so a preview always matches the charge.
pub struct PreviewUseCase<C, P>
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    contract_repo: Arc<C>,
    plan_repo: Arc<P>,
}

impl<C, P> PreviewUseCase<C, P>
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(contract_repo: Arc<C>, plan_repo: Arc<P>) -> Self {
        Self {
            contract_repo,
            plan_repo,
        }
    }

    pub async fn preview(
        &self,
        user_id: Uuid,
        plan_id: i64,
        now: DateTime<Utc>,
    ) -> ContractResult<PreviewDto> {
        info!(%user_id, plan_id, "preview: requested");

        let active = self
            .contract_repo
            .find_active_contract(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "preview: failed to look up active contract");
                ContractError::Internal(err)
            })?;

        let active = match active {
            Some(active) => active,
            None => {
                let plan = self.require_active_plan(plan_id).await?;
                debug!(%user_id, plan_id, "preview: no active contract, purchase");
                return Ok(PreviewDto {
                    plan: plan.into(),
                    action: PreviewAction::Purchase,
                    renewal_window: None,
                    credit_minor: None,
                    price_minor: None,
                });
            }
        };

        // Renewing the contract's own plan keeps working after the plan is
        // retired from the catalog, same as the renewal path; only purchase
        // and change targets are gated on the catalog flag.
        if active.plan_id == plan_id {
            let plan = self.resolve_owning_plan(active.plan_id).await?;
            debug!(%user_id, plan_id, "preview: same plan, renew");
            return Ok(PreviewDto {
                renewal_window: Some(renewal::renewal_window(&active)),
                plan: plan.into(),
                action: PreviewAction::Renew,
                credit_minor: None,
                price_minor: None,
            });
        }

        let plan = self.require_active_plan(plan_id).await?;
        let old_plan = self.resolve_owning_plan(active.plan_id).await?;

        let quote = proration::change_plan_quote(
            old_plan.price_minor,
            plan.price_minor,
            active.expiration_date,
            now,
        )?;

        debug!(
            %user_id,
            plan_id,
            credit_minor = quote.credit_minor,
            price_minor = quote.price_minor,
            "preview: plan change quoted"
        );

        Ok(PreviewDto {
            plan: plan.into(),
            action: PreviewAction::ChangePlan,
            renewal_window: None,
            credit_minor: Some(quote.credit_minor),
            price_minor: Some(quote.price_minor),
        })
    }

    async fn require_active_plan(&self, plan_id: i64) -> ContractResult<PlanEntity> {
        self.plan_repo
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(plan_id, db_error = ?err, "preview: failed to load plan");
                ContractError::Internal(err)
            })?
            .ok_or(ContractError::PlanNotFound)
    }

    async fn resolve_owning_plan(&self, plan_id: i64) -> ContractResult<PlanEntity> {
        self.plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(plan_id, db_error = ?err, "preview: failed to load plan");
                ContractError::Internal(err)
            })?
            .ok_or_else(|| {
                error!(plan_id, "preview: contract references a missing plan");
                ContractError::Internal(anyhow::anyhow!(
                    "contract references missing plan {plan_id}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    use crate::domain::entities::{contracts::ContractEntity, plans::PlanEntity};
    use crate::domain::repositories::{
        contracts::MockContractRepository, plans::MockPlanRepository,
    };
    use mockall::predicate::eq;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn sample_plan(id: i64, price_minor: i64) -> PlanEntity {
        PlanEntity {
            id,
            description: format!("Plan {id}"),
            client_limit: 10,
            storage_gb: 10,
            price_minor,
            is_active: true,
        }
    }

    fn active_contract(
        user_id: Uuid,
        plan_id: i64,
        expiration: DateTime<Utc>,
    ) -> ContractEntity {
        ContractEntity {
            id: 7,
            user_id,
            plan_id,
            started_at: expiration - chrono::Duration::days(30),
            expiration_date: expiration,
            next_renewal_available_at: Some(renewal::next_renewal_available_at(expiration)),
            ended_at: None,
            status: "active".to_string(),
            created_at: expiration - chrono::Duration::days(30),
        }
    }

    #[tokio::test]
    async fn no_active_contract_previews_as_purchase() {
        let user_id = Uuid::new_v4();

        let mut contract_repo = MockContractRepository::new();
        let mut plan_repo = MockPlanRepository::new();

        plan_repo
            .expect_find_active_plan_by_id()
            .with(eq(3))
            .returning(|_| Box::pin(async { Ok(Some(sample_plan(3, 10_000))) }));
        contract_repo
            .expect_find_active_contract()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = PreviewUseCase::new(Arc::new(contract_repo), Arc::new(plan_repo));
        let preview = usecase
            .preview(user_id, 3, utc(2024, 1, 10, 12))
            .await
            .unwrap();

        assert_eq!(preview.action, PreviewAction::Purchase);
        assert!(preview.renewal_window.is_none());
        assert!(preview.credit_minor.is_none());
        assert!(preview.price_minor.is_none());
    }

    #[tokio::test]
    async fn same_plan_previews_as_renew_with_window() {
        let user_id = Uuid::new_v4();
        let active = active_contract(user_id, 3, utc(2024, 3, 10, 12));

        let mut contract_repo = MockContractRepository::new();
        let mut plan_repo = MockPlanRepository::new();

        plan_repo
            .expect_find_by_id()
            .with(eq(3))
            .returning(|_| Box::pin(async { Ok(Some(sample_plan(3, 12_000))) }));
        contract_repo
            .expect_find_active_contract()
            .returning(move |_, _| {
                let active = active.clone();
                Box::pin(async move { Ok(Some(active)) })
            });

        let usecase = PreviewUseCase::new(Arc::new(contract_repo), Arc::new(plan_repo));
        let preview = usecase
            .preview(user_id, 3, utc(2024, 3, 6, 12))
            .await
            .unwrap();

        assert_eq!(preview.action, PreviewAction::Renew);
        let window = preview.renewal_window.unwrap();
        assert_eq!(
            window.available_from,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(
            window.expiration_date,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert!(preview.credit_minor.is_none());
        assert!(preview.price_minor.is_none());
    }

    #[tokio::test]
    async fn different_plan_previews_as_change_with_quote() {
        let user_id = Uuid::new_v4();
        // Same inputs as the contract use case test: credit 30.00, price 120.00.
        let active = active_contract(user_id, 3, utc(2024, 5, 5, 12));

        let mut contract_repo = MockContractRepository::new();
        let mut plan_repo = MockPlanRepository::new();

        plan_repo
            .expect_find_active_plan_by_id()
            .with(eq(4))
            .returning(|_| Box::pin(async { Ok(Some(sample_plan(4, 15_000))) }));
        plan_repo
            .expect_find_by_id()
            .with(eq(3))
            .returning(|_| Box::pin(async { Ok(Some(sample_plan(3, 9_000))) }));
        contract_repo
            .expect_find_active_contract()
            .returning(move |_, _| {
                let active = active.clone();
                Box::pin(async move { Ok(Some(active)) })
            });

        let usecase = PreviewUseCase::new(Arc::new(contract_repo), Arc::new(plan_repo));
        let preview = usecase
            .preview(user_id, 4, utc(2024, 4, 25, 12))
            .await
            .unwrap();

        assert_eq!(preview.action, PreviewAction::ChangePlan);
        assert!(preview.renewal_window.is_none());
        assert_eq!(preview.credit_minor, Some(3_000));
        assert_eq!(preview.price_minor, Some(12_000));
    }

    #[tokio::test]
    async fn preview_quote_matches_the_committed_charge() {
        // The preview numbers must equal what change_plan would charge for
        // the same inputs: both read the same proration policy.
        let quote = crate::domain::policies::proration::change_plan_quote(
            9_000,
            15_000,
            utc(2024, 5, 5, 12),
            utc(2024, 4, 25, 12),
        )
        .unwrap();

        assert_eq!(quote.credit_minor, 3_000);
        assert_eq!(quote.price_minor, 12_000);
    }

    #[tokio::test]
    async fn retired_plan_previews_as_renew_for_its_own_contract() {
        // The owning plan resolves unfiltered, exactly as the renewal path
        // does: retiring a plan from the catalog must not break previews
        // for contracts already on it.
        let user_id = Uuid::new_v4();
        let active = active_contract(user_id, 3, utc(2024, 3, 10, 12));

        let mut contract_repo = MockContractRepository::new();
        let mut plan_repo = MockPlanRepository::new();

        plan_repo.expect_find_by_id().with(eq(3)).returning(|_| {
            let retired = PlanEntity {
                is_active: false,
                ..sample_plan(3, 12_000)
            };
            Box::pin(async move { Ok(Some(retired)) })
        });
        contract_repo
            .expect_find_active_contract()
            .returning(move |_, _| {
                let active = active.clone();
                Box::pin(async move { Ok(Some(active)) })
            });

        let usecase = PreviewUseCase::new(Arc::new(contract_repo), Arc::new(plan_repo));
        let preview = usecase
            .preview(user_id, 3, utc(2024, 3, 6, 12))
            .await
            .unwrap();

        assert_eq!(preview.action, PreviewAction::Renew);
        assert_eq!(preview.plan.id, 3);
        assert!(preview.renewal_window.is_some());
    }

    #[tokio::test]
    async fn unknown_plan_fails_preview() {
        let user_id = Uuid::new_v4();

        let mut contract_repo = MockContractRepository::new();
        let mut plan_repo = MockPlanRepository::new();

        contract_repo
            .expect_find_active_contract()
            .returning(|_, _| Box::pin(async { Ok(None) }));
        plan_repo
            .expect_find_active_plan_by_id()
            .with(eq(99))
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = PreviewUseCase::new(Arc::new(contract_repo), Arc::new(plan_repo));
        let err = usecase
            .preview(user_id, 99, utc(2024, 1, 10, 12))
            .await
            .unwrap_err();

        assert!(matches!(err, ContractError::PlanNotFound));
    }
}
