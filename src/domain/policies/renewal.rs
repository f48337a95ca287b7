use std::fmt::Display;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Months, Utc};

use crate::domain::entities::contracts::ContractEntity;
use crate::domain::value_objects::contracts::RenewalWindow;

/// Days before expiration at which the renewal window opens.
pub const RENEWAL_WINDOW_DAYS: i64 = 5;

/// Why a renewal request was refused. The two cases are evaluated
/// independently and must stay distinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenewalDenied {
    TooEarly { available_from: DateTime<Utc> },
    Expired { expired_on: DateTime<Utc> },
}

impl Display for RenewalDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenewalDenied::TooEarly { available_from } => {
                write!(f, "renewal opens on {}", available_from.date_naive())
            }
            RenewalDenied::Expired { expired_on } => {
                write!(f, "contract expired on {}", expired_on.date_naive())
            }
        }
    }
}

/// Calendar "add one month" with end-of-month clamping: Jan 31 + 1 month is
/// the last day of February, never an overflow into March. Applied uniformly
/// wherever the system moves a cycle boundary.
pub fn next_cycle_end(from: DateTime<Utc>) -> Result<DateTime<Utc>> {
    from.checked_add_months(Months::new(1))
        .context("failed to compute next cycle end")
}

pub fn next_renewal_available_at(expiration: DateTime<Utc>) -> DateTime<Utc> {
    expiration - Duration::days(RENEWAL_WINDOW_DAYS)
}

/// Interval during which the contract may be renewed. Falls back to the
/// policy constant when the stored window timestamp is not populated.
pub fn renewal_window(contract: &ContractEntity) -> RenewalWindow {
    let available_from = contract
        .next_renewal_available_at
        .unwrap_or_else(|| next_renewal_available_at(contract.expiration_date));

    RenewalWindow {
        available_from: available_from.date_naive(),
        expiration_date: contract.expiration_date.date_naive(),
    }
}

/// Returns the refusal reason when `now` falls outside the renewal window,
/// or `None` when the renewal is allowed. A request after expiration is
/// `Expired` even though it is also past `available_from`.
pub fn renewal_denied(contract: &ContractEntity, now: DateTime<Utc>) -> Option<RenewalDenied> {
    if now > contract.expiration_date {
        return Some(RenewalDenied::Expired {
            expired_on: contract.expiration_date,
        });
    }

    let available_from = contract
        .next_renewal_available_at
        .unwrap_or_else(|| next_renewal_available_at(contract.expiration_date));

    if now < available_from {
        return Some(RenewalDenied::TooEarly { available_from });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use uuid::Uuid;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn contract(
        expiration: DateTime<Utc>,
        next_renewal_available_at: Option<DateTime<Utc>>,
    ) -> ContractEntity {
        ContractEntity {
            id: 1,
            user_id: Uuid::new_v4(),
            plan_id: 1,
            started_at: expiration - Duration::days(30),
            expiration_date: expiration,
            next_renewal_available_at,
            ended_at: None,
            status: "active".to_string(),
            created_at: expiration - Duration::days(30),
        }
    }

    #[test]
    fn next_cycle_end_keeps_day_of_month() {
        let end = next_cycle_end(utc(2024, 1, 10, 12)).unwrap();
        assert_eq!(end, utc(2024, 2, 10, 12));
    }

    #[test]
    fn next_cycle_end_clamps_at_month_end() {
        let end = next_cycle_end(utc(2024, 1, 31, 12)).unwrap();
        assert_eq!(end, utc(2024, 2, 29, 12));

        let end = next_cycle_end(utc(2023, 1, 31, 12)).unwrap();
        assert_eq!(end, utc(2023, 2, 28, 12));
    }

    #[test]
    fn renewal_becomes_available_five_days_before_expiration() {
        let expiration = utc(2024, 2, 10, 12);
        assert_eq!(next_renewal_available_at(expiration), utc(2024, 2, 5, 12));
    }

    #[test]
    fn window_uses_stored_timestamp_when_populated() {
        let contract = contract(utc(2024, 3, 10, 12), Some(utc(2024, 3, 5, 12)));
        let window = renewal_window(&contract);

        assert_eq!(
            window.available_from,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(
            window.expiration_date,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
    }

    #[test]
    fn window_falls_back_to_policy_constant() {
        let contract = contract(utc(2024, 3, 10, 12), None);
        let window = renewal_window(&contract);

        assert_eq!(
            window.available_from,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn renewal_allowed_inside_window() {
        let contract = contract(utc(2024, 2, 10, 12), Some(utc(2024, 2, 5, 12)));
        assert_eq!(renewal_denied(&contract, utc(2024, 2, 6, 12)), None);
        assert_eq!(renewal_denied(&contract, utc(2024, 2, 10, 12)), None);
    }

    #[test]
    fn renewal_too_early_before_window_opens() {
        let contract = contract(utc(2024, 2, 10, 12), Some(utc(2024, 2, 5, 12)));
        let denied = renewal_denied(&contract, utc(2024, 2, 1, 12)).unwrap();

        assert_eq!(
            denied,
            RenewalDenied::TooEarly {
                available_from: utc(2024, 2, 5, 12)
            }
        );
        assert_eq!(denied.to_string(), "renewal opens on 2024-02-05");
    }

    #[test]
    fn renewal_after_expiration_is_expired_not_too_early() {
        let contract = contract(utc(2024, 2, 10, 12), Some(utc(2024, 2, 5, 12)));
        let denied = renewal_denied(&contract, utc(2024, 2, 12, 12)).unwrap();

        assert_eq!(
            denied,
            RenewalDenied::Expired {
                expired_on: utc(2024, 2, 10, 12)
            }
        );
        assert_eq!(denied.to_string(), "contract expired on 2024-02-10");
    }
}
