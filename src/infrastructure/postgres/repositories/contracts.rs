use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, PgConnection, QueryResult, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::{
        contracts::{ContractEntity, InsertContractEntity},
        payments::PaymentEntity,
    },
    repositories::contracts::{ContractRepository, PaymentHistoryRow},
    value_objects::{enums::contract_statuses::ContractStatus, payments::PaymentDraft},
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{contracts, payments, plans},
};

pub struct ContractPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ContractPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Serializes state-changing operations per user for the rest of the
/// transaction. Different users hash to different keys and proceed in
/// parallel.
fn lock_user(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<usize> {
    diesel::sql_query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind::<diesel::sql_types::Text, _>(user_id.to_string())
        .execute(conn)
}

fn find_active_contract_id(
    conn: &mut PgConnection,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> QueryResult<Option<i64>> {
    contracts::table
        .filter(contracts::user_id.eq(user_id))
        .filter(contracts::status.eq(ContractStatus::Active.to_string()))
        .filter(contracts::expiration_date.ge(now))
        .select(contracts::id)
        .first::<i64>(conn)
        .optional()
}

#[async_trait]
impl ContractRepository for ContractPostgres {
    async fn find_active_contract(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<ContractEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = contracts::table
            .filter(contracts::user_id.eq(user_id))
            .filter(contracts::status.eq(ContractStatus::Active.to_string()))
            .filter(contracts::expiration_date.ge(now))
            .order(contracts::started_at.desc())
            .select(ContractEntity::as_select())
            .first::<ContractEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create_contract_with_payment(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        new_contract: InsertContractEntity,
        payment: PaymentDraft,
    ) -> Result<Option<(ContractEntity, PaymentEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<_, anyhow::Error, _>(|conn| {
            lock_user(conn, user_id)?;

            if find_active_contract_id(conn, user_id, now)?.is_some() {
                return Ok(None);
            }

            let contract = insert_into(contracts::table)
                .values(&new_contract)
                .returning(ContractEntity::as_returning())
                .get_result::<ContractEntity>(conn)?;

            let payment = insert_into(payments::table)
                .values(&payment.into_insert(contract.id))
                .returning(PaymentEntity::as_returning())
                .get_result::<PaymentEntity>(conn)?;

            Ok(Some((contract, payment)))
        })?;

        Ok(result)
    }

    async fn renew_contract(
        &self,
        user_id: Uuid,
        contract_id: i64,
        prior_expiration: DateTime<Utc>,
        new_expiration: DateTime<Utc>,
        next_renewal_available_at: DateTime<Utc>,
        payment: PaymentDraft,
    ) -> Result<Option<(ContractEntity, PaymentEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<_, anyhow::Error, _>(|conn| {
            lock_user(conn, user_id)?;

            // The expiration filter is the precondition re-check: a renewal
            // that already moved the cycle boundary leaves nothing for this
            // update to match.
            let renewed = update(
                contracts::table
                    .filter(contracts::id.eq(contract_id))
                    .filter(contracts::status.eq(ContractStatus::Active.to_string()))
                    .filter(contracts::expiration_date.eq(prior_expiration)),
            )
            .set((
                contracts::expiration_date.eq(new_expiration),
                contracts::next_renewal_available_at.eq(Some(next_renewal_available_at)),
            ))
            .returning(ContractEntity::as_returning())
            .get_result::<ContractEntity>(conn)
            .optional()?;

            let renewed = match renewed {
                Some(contract) => contract,
                None => return Ok(None),
            };

            let payment = insert_into(payments::table)
                .values(&payment.into_insert(renewed.id))
                .returning(PaymentEntity::as_returning())
                .get_result::<PaymentEntity>(conn)?;

            Ok(Some((renewed, payment)))
        })?;

        Ok(result)
    }

    async fn replace_active_contract(
        &self,
        user_id: Uuid,
        old_contract_id: i64,
        ended_at: DateTime<Utc>,
        new_contract: InsertContractEntity,
        payment: PaymentDraft,
    ) -> Result<Option<(ContractEntity, PaymentEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<_, anyhow::Error, _>(|conn| {
            lock_user(conn, user_id)?;

            let deactivated = update(
                contracts::table
                    .filter(contracts::id.eq(old_contract_id))
                    .filter(contracts::status.eq(ContractStatus::Active.to_string())),
            )
            .set((
                contracts::status.eq(ContractStatus::Inactive.to_string()),
                contracts::ended_at.eq(Some(ended_at)),
            ))
            .execute(conn)?;

            if deactivated == 0 {
                return Ok(None);
            }

            let contract = insert_into(contracts::table)
                .values(&new_contract)
                .returning(ContractEntity::as_returning())
                .get_result::<ContractEntity>(conn)?;

            let payment = insert_into(payments::table)
                .values(&payment.into_insert(contract.id))
                .returning(PaymentEntity::as_returning())
                .get_result::<PaymentEntity>(conn)?;

            Ok(Some((contract, payment)))
        })?;

        Ok(result)
    }

    async fn list_payments_for_user(&self, user_id: Uuid) -> Result<Vec<PaymentHistoryRow>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = payments::table
            .inner_join(contracts::table.inner_join(plans::table))
            .filter(contracts::user_id.eq(user_id))
            .order(payments::payment_at.desc())
            .select((
                PaymentEntity::as_select(),
                plans::description,
                contracts::expiration_date,
            ))
            .load::<PaymentHistoryRow>(&mut conn)?;

        Ok(rows)
    }
}
