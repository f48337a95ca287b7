use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{contracts::InsertContractEntity, plans::PlanEntity},
    policies::{proration, renewal},
    repositories::{contracts::ContractRepository, plans::PlanRepository},
    value_objects::{
        contracts::{ContractDto, ContractTransactionDto},
        enums::{
            contract_statuses::ContractStatus, payment_actions::PaymentAction,
            payment_types::PaymentType,
        },
        payments::PaymentDraft,
    },
};

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("user already has an active contract")]
    AlreadySubscribed,
    #[error("user has no active contract")]
    NoActiveContract,
    #[error("plan not found")]
    PlanNotFound,
    #[error("renewal not allowed: {0}")]
    RenewalNotAllowed(renewal::RenewalDenied),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ContractResult<T> = std::result::Result<T, ContractError>;

/// Orchestrates the three state-changing subscription operations. Policy
/// computations live in `domain::policies`; every write goes through one
/// transactional `ContractRepository` call, so an operation either lands
/// completely or not at all.
pub struct ContractUseCase<C, P>
where
    C: ContractRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    contract_repo: Arc<C>,
    plan_repo: Arc<P>,
}

impl<C, P> ContractUseCase<C, P>
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

    pub async fn subscribe(
        &self,
        user_id: Uuid,
        plan_id: i64,
        now: DateTime<Utc>,
    ) -> ContractResult<ContractTransactionDto> {
        info!(%user_id, plan_id, "contracts: subscribe requested");

        let plan = self.require_active_plan(plan_id).await?;

        if self
            .contract_repo
            .find_active_contract(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "contracts: failed to look up active contract");
                ContractError::Internal(err)
            })?
            .is_some()
        {
            let err = ContractError::AlreadySubscribed;
            warn!(
                %user_id,
                plan_id,
                "contracts: subscribe refused, active contract exists"
            );
            return Err(err);
        }

        let expiration = renewal::next_cycle_end(now)?;
        let new_contract = InsertContractEntity {
            user_id,
            plan_id: plan.id,
            started_at: now,
            expiration_date: expiration,
            next_renewal_available_at: Some(renewal::next_renewal_available_at(expiration)),
            status: ContractStatus::Active.to_string(),
        };
        let payment = PaymentDraft {
            action: PaymentAction::Purchase,
            payment_type: PaymentType::Pix,
            plan_value_minor: plan.price_minor,
            price_minor: plan.price_minor,
            credit_minor: 0,
            payment_at: now,
        };

        let (contract, payment) = self
            .contract_repo
            .create_contract_with_payment(user_id, now, new_contract, payment)
            .await
            .map_err(|err| {
                error!(%user_id, plan_id, db_error = ?err, "contracts: subscribe write failed");
                ContractError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = ContractError::AlreadySubscribed;
                warn!(
                    %user_id,
                    plan_id,
                    "contracts: concurrent subscribe won, nothing written"
                );
                err
            })?;

        info!(
            %user_id,
            contract_id = contract.id,
            expiration = %contract.expiration_date,
            "contracts: subscription created"
        );

        Ok(ContractTransactionDto {
            contract: ContractDto::from_entities(contract, plan),
            payment: payment.into(),
        })
    }

    pub async fn renew(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ContractResult<ContractTransactionDto> {
        info!(%user_id, "contracts: renew requested");

        let active = self.require_active_contract(user_id, now).await?;

        if let Some(denied) = renewal::renewal_denied(&active, now) {
            let err = ContractError::RenewalNotAllowed(denied);
            warn!(
                %user_id,
                contract_id = active.id,
                reason = %denied,
                "contracts: renewal refused"
            );
            return Err(err);
        }

        let plan = self.resolve_owning_plan(&active.plan_id).await?;

        let new_expiration = renewal::next_cycle_end(active.expiration_date)?;
        let payment = PaymentDraft {
            action: PaymentAction::Renewal,
            payment_type: PaymentType::Pix,
            plan_value_minor: plan.price_minor,
            price_minor: plan.price_minor,
            credit_minor: 0,
            payment_at: now,
        };

        let (contract, payment) = self
            .contract_repo
            .renew_contract(
                user_id,
                active.id,
                active.expiration_date,
                new_expiration,
                renewal::next_renewal_available_at(new_expiration),
                payment,
            )
            .await
            .map_err(|err| {
                error!(%user_id, contract_id = active.id, db_error = ?err, "contracts: renewal write failed");
                ContractError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = ContractError::NoActiveContract;
                warn!(
                    %user_id,
                    contract_id = active.id,
                    "contracts: contract no longer active, renewal rolled back"
                );
                err
            })?;

        info!(
            %user_id,
            contract_id = contract.id,
            new_expiration = %contract.expiration_date,
            "contracts: renewal completed"
        );

        Ok(ContractTransactionDto {
            contract: ContractDto::from_entities(contract, plan),
            payment: payment.into(),
        })
    }

    pub async fn change_plan(
        &self,
        user_id: Uuid,
        new_plan_id: i64,
        now: DateTime<Utc>,
    ) -> ContractResult<ContractTransactionDto> {
        info!(%user_id, new_plan_id, "contracts: plan change requested");

        let active = self.require_active_contract(user_id, now).await?;
        let new_plan = self.require_active_plan(new_plan_id).await?;
        let old_plan = self.resolve_owning_plan(&active.plan_id).await?;

        let quote = proration::change_plan_quote(
            old_plan.price_minor,
            new_plan.price_minor,
            active.expiration_date,
            now,
        )?;

        let expiration = renewal::next_cycle_end(now)?;
        let new_contract = InsertContractEntity {
            user_id,
            plan_id: new_plan.id,
            started_at: now,
            expiration_date: expiration,
            next_renewal_available_at: Some(renewal::next_renewal_available_at(expiration)),
            status: ContractStatus::Active.to_string(),
        };
        let payment = PaymentDraft {
            action: PaymentAction::Purchase,
            payment_type: PaymentType::Pix,
            plan_value_minor: new_plan.price_minor,
            price_minor: quote.price_minor,
            credit_minor: quote.credit_minor,
            payment_at: now,
        };

        let (contract, payment) = self
            .contract_repo
            .replace_active_contract(user_id, active.id, now, new_contract, payment)
            .await
            .map_err(|err| {
                error!(%user_id, contract_id = active.id, db_error = ?err, "contracts: plan change write failed");
                ContractError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = ContractError::NoActiveContract;
                warn!(
                    %user_id,
                    contract_id = active.id,
                    "contracts: contract no longer active, plan change rolled back"
                );
                err
            })?;

        info!(
            %user_id,
            old_contract_id = active.id,
            contract_id = contract.id,
            credit_minor = quote.credit_minor,
            price_minor = quote.price_minor,
            "contracts: plan change completed"
        );

        Ok(ContractTransactionDto {
            contract: ContractDto::from_entities(contract, new_plan),
            payment: payment.into(),
        })
    }

    pub async fn get_active_plan(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ContractResult<Option<ContractDto>> {
        let active = match self
            .contract_repo
            .find_active_contract(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "contracts: failed to look up active contract");
                ContractError::Internal(err)
            })? {
            Some(contract) => contract,
            None => return Ok(None),
        };

        let plan = self.resolve_owning_plan(&active.plan_id).await?;
        Ok(Some(ContractDto::from_entities(active, plan)))
    }

    async fn require_active_contract(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ContractResult<crate::domain::entities::contracts::ContractEntity> {
        self.contract_repo
            .find_active_contract(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "contracts: failed to look up active contract");
                ContractError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = ContractError::NoActiveContract;
                warn!(
                    %user_id,
                    "contracts: no active contract"
                );
                err
            })
    }

    async fn require_active_plan(&self, plan_id: i64) -> ContractResult<PlanEntity> {
        self.plan_repo
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(plan_id, db_error = ?err, "contracts: failed to load plan");
                ContractError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = ContractError::PlanNotFound;
                warn!(
                    plan_id,
                    "contracts: plan not found"
                );
                err
            })
    }

    /// A contract's own plan must resolve even when retired from the
    /// catalog; a missing row here is a data fault, not a business refusal.
    async fn resolve_owning_plan(&self, plan_id: &i64) -> ContractResult<PlanEntity> {
        self.plan_repo
            .find_by_id(*plan_id)
            .await
            .map_err(|err| {
                error!(plan_id, db_error = ?err, "contracts: failed to load plan");
                ContractError::Internal(err)
            })?
            .ok_or_else(|| {
                error!(plan_id, "contracts: contract references a missing plan");
                ContractError::Internal(anyhow!("contract references missing plan {plan_id}"))
            })
    }
}
