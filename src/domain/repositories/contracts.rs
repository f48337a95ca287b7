use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::contracts::{ContractEntity, InsertContractEntity};
use crate::domain::entities::payments::PaymentEntity;
use crate::domain::value_objects::payments::PaymentDraft;

/// Payment row joined with its plan description and the owning contract's
/// expiration date, as the history report needs them.
pub type PaymentHistoryRow = (PaymentEntity, String, DateTime<Utc>);

/// Store for contracts and their payments. The three write methods are each
/// a single transaction serialized per user, and re-validate their
/// precondition inside it; `Ok(None)` means the precondition no longer held
/// (a concurrent operation for the same user won the race), with nothing
/// written.
#[async_trait]
#[automock]
pub trait ContractRepository {
    /// The unique contract with status=active and expiration_date >= now.
    async fn find_active_contract(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<ContractEntity>>;

    /// Inserts a contract and its purchase payment, provided the user still
    /// has no active contract as of `now`.
    async fn create_contract_with_payment(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        new_contract: InsertContractEntity,
        payment: PaymentDraft,
    ) -> Result<Option<(ContractEntity, PaymentEntity)>>;

    /// Pushes the expiration and renewal window of a still-active contract
    /// forward and records the renewal payment. The row is reused; renewal
    /// never creates a new contract. The update only matches while the row
    /// still carries `prior_expiration`, so a renewal that already landed
    /// for the same cycle makes this one return `None` instead of charging
    /// twice.
    async fn renew_contract(
        &self,
        user_id: Uuid,
        contract_id: i64,
        prior_expiration: DateTime<Utc>,
        new_expiration: DateTime<Utc>,
        next_renewal_available_at: DateTime<Utc>,
        payment: PaymentDraft,
    ) -> Result<Option<(ContractEntity, PaymentEntity)>>;

    /// Deactivates the old contract (status=inactive, ended_at set) and
    /// inserts the replacement contract plus its payment. Contract history
    /// is append-only; the old row is kept.
    async fn replace_active_contract(
        &self,
        user_id: Uuid,
        old_contract_id: i64,
        ended_at: DateTime<Utc>,
        new_contract: InsertContractEntity,
        payment: PaymentDraft,
    ) -> Result<Option<(ContractEntity, PaymentEntity)>>;

    /// Every payment across the user's contracts, most-recent-first.
    async fn list_payments_for_user(&self, user_id: Uuid) -> Result<Vec<PaymentHistoryRow>>;
}
