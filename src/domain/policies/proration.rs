use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

/// Numbers behind a mid-cycle plan change. `credit_minor` is the value of the
/// unused days on the old plan; `price_minor` is what the new plan costs
/// after the credit is applied. Both PreviewUseCase and ContractUseCase read
/// from here — they must never diverge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangePlanQuote {
    pub credit_minor: i64,
    pub price_minor: i64,
    pub days_remaining: i64,
    pub days_in_cycle: i64,
}

/// Prorates the old plan over the actual calendar cycle ending at
/// `expiration`. The daily rate is never truncated: the credit is one
/// integer division, rounded half-up to whole cents at the end.
/// `days_remaining` is capped at the cycle length so the credit can never
/// exceed the old plan's monthly price.
pub fn change_plan_quote(
    old_price_minor: i64,
    new_price_minor: i64,
    expiration: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<ChangePlanQuote> {
    let cycle_start = expiration
        .checked_sub_months(Months::new(1))
        .context("failed to compute cycle start")?;
    let days_in_cycle = days_in_month(cycle_start.year(), cycle_start.month())
        .context("failed to compute days in billing cycle")?;

    let days_remaining = (expiration - now).num_days().clamp(0, days_in_cycle);

    let credit_minor = div_round_half_up(old_price_minor * days_remaining, days_in_cycle);
    let price_minor = (new_price_minor - credit_minor).max(0);

    Ok(ChangePlanQuote {
        credit_minor,
        price_minor,
        days_remaining,
        days_in_cycle,
    })
}

fn days_in_month(year: i32, month: u32) -> Option<i64> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days())
}

fn div_round_half_up(numerator: i64, denominator: i64) -> i64 {
    (numerator * 2 + denominator) / (denominator * 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn ten_unused_days_on_a_thirty_day_cycle() {
        // 90.00/month plan, 10 of 30 days left, changing to 150.00/month.
        let quote =
            change_plan_quote(9_000, 15_000, utc(2024, 5, 5, 12), utc(2024, 4, 25, 12)).unwrap();

        assert_eq!(quote.days_in_cycle, 30);
        assert_eq!(quote.days_remaining, 10);
        assert_eq!(quote.credit_minor, 3_000);
        assert_eq!(quote.price_minor, 12_000);
    }

    #[test]
    fn daily_rate_is_not_truncated_before_rounding() {
        // 100.00 over a 31-day cycle, 30 days left: 100/31*30 = 96.774...,
        // rounded once to 96.77. A truncated daily rate would give 96.70.
        let quote =
            change_plan_quote(10_000, 15_000, utc(2024, 4, 1, 12), utc(2024, 3, 2, 12)).unwrap();

        assert_eq!(quote.days_in_cycle, 31);
        assert_eq!(quote.days_remaining, 30);
        assert_eq!(quote.credit_minor, 9_677);
        assert_eq!(quote.price_minor, 5_323);
    }

    #[test]
    fn half_cents_round_up() {
        // 0.15 over 30 days, one day left: 0.005 rounds to 0.01.
        let quote = change_plan_quote(15, 10_000, utc(2024, 5, 5, 12), utc(2024, 5, 4, 12)).unwrap();
        assert_eq!(quote.credit_minor, 1);
    }

    #[test]
    fn fractional_days_truncate_to_whole_days() {
        // 10 days and 12 hours remaining still counts as 10 days.
        let quote =
            change_plan_quote(9_000, 15_000, utc(2024, 5, 5, 12), utc(2024, 4, 25, 0)).unwrap();
        assert_eq!(quote.days_remaining, 10);
        assert_eq!(quote.credit_minor, 3_000);
    }

    #[test]
    fn expired_contract_yields_no_credit() {
        let quote =
            change_plan_quote(9_000, 15_000, utc(2024, 5, 5, 12), utc(2024, 5, 7, 12)).unwrap();
        assert_eq!(quote.days_remaining, 0);
        assert_eq!(quote.credit_minor, 0);
        assert_eq!(quote.price_minor, 15_000);
    }

    #[test]
    fn price_never_goes_negative() {
        // Credit larger than the new plan's price clamps to zero owed.
        let quote =
            change_plan_quote(15_000, 3_000, utc(2024, 5, 5, 12), utc(2024, 4, 25, 12)).unwrap();
        assert_eq!(quote.credit_minor, 5_000);
        assert_eq!(quote.price_minor, 0);
    }

    #[test]
    fn credit_is_capped_at_the_old_plan_price() {
        // Hand-seeded contract whose remaining span exceeds the clamped
        // cycle (Mar 31 expiration, cycle start clamps to Feb 29): the cap
        // keeps credit within the old monthly price.
        let quote =
            change_plan_quote(10_000, 15_000, utc(2024, 3, 31, 12), utc(2024, 3, 1, 12)).unwrap();

        assert_eq!(quote.days_in_cycle, 29);
        assert_eq!(quote.days_remaining, 29);
        assert_eq!(quote.credit_minor, 10_000);
        assert_eq!(quote.price_minor, 5_000);
    }

    #[test]
    fn leap_february_cycle_has_twenty_nine_days() {
        let quote =
            change_plan_quote(2_900, 5_000, utc(2024, 3, 29, 12), utc(2024, 3, 1, 12)).unwrap();
        assert_eq!(quote.days_in_cycle, 29);
        assert_eq!(quote.days_remaining, 28);
        assert_eq!(quote.credit_minor, 2_800);
    }
}
