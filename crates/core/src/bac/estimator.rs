//! Widmark-style BAC estimator.
//!
//! Alcohol is added per drink and burned linearly between drinks. The
//! amount in the body never goes below zero. The result is in permille,
//! rounded to two decimals with banker's rounding.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::types::{BacProfile, Drink};
use crate::ledger::Transaction;

/// Kilograms of alcohol in one standard unit.
pub const ALCOHOL_PER_UNIT_KG: Decimal = dec!(0.012);

/// Kilograms of alcohol burned per second.
pub const BURN_RATE_KG_PER_SECOND: Decimal = dec!(0.000001667);

/// Body mass used when the account has none set.
pub const DEFAULT_BODY_MASS_KG: i32 = 70;

/// Streques older than this are ignored.
pub const LOOKBACK_DAYS: i64 = 7;

/// Rounds a permille value to two decimals, half to even.
#[must_use]
pub fn round_permille(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Maps a permille value to the emoji shown next to the member.
#[must_use]
pub fn bac_emoji(bac: Decimal) -> Option<&'static str> {
    const SCALE: [(Decimal, &str); 9] = [
        (dec!(0.3), "🍺"),
        (dec!(0.5), "🍻"),
        (dec!(1), "👌"),
        (dec!(1.5), "🕺"),
        (dec!(2), "😟"),
        (dec!(2.5), "🤢"),
        (dec!(3), "😵"),
        (dec!(3.5), "💀"),
        (dec!(4), "🇷🇺"),
    ];

    if bac < dec!(0.1) {
        return None;
    }
    let emoji = SCALE
        .iter()
        .find(|(limit, _)| bac < *limit)
        .map_or("🇫🇮", |(_, emoji)| *emoji);
    Some(emoji)
}

fn seconds(elapsed: Duration) -> Decimal {
    elapsed.num_microseconds().map_or_else(
        || Decimal::from(elapsed.num_seconds()),
        |us| Decimal::new(us, 6),
    )
}

fn burn(alcohol: Decimal, elapsed: Duration) -> Decimal {
    let remaining = alcohol - BURN_RATE_KG_PER_SECOND * seconds(elapsed);
    remaining.max(Decimal::ZERO)
}

/// BAC estimator over an account's purchase history.
pub struct BacEstimator;

impl BacEstimator {
    /// Selects the drinks that count towards the estimate.
    ///
    /// Keeps non-voided streques with positive units bought within the
    /// lookback window, oldest first.
    #[must_use]
    pub fn qualifying_drinks(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<Drink> {
        let cutoff = now - Duration::days(LOOKBACK_DAYS);
        let mut drinks: Vec<Drink> = transactions
            .iter()
            .filter(|tx| tx.is_streque() && !tx.voided && tx.timestamp >= cutoff)
            .filter(|tx| tx.alcohol_units() > Decimal::ZERO)
            .map(|tx| Drink {
                timestamp: tx.timestamp,
                standard_units: tx.alcohol_units(),
            })
            .collect();
        drinks.sort_by_key(|drink| drink.timestamp);
        drinks
    }

    /// Estimates BAC in permille at `now`.
    ///
    /// `drinks` must be sorted by timestamp, oldest first.
    #[must_use]
    pub fn estimate(drinks: &[Drink], profile: BacProfile, now: DateTime<Utc>) -> Decimal {
        let Some(last) = drinks.last() else {
            return Decimal::ZERO;
        };

        let mut alcohol = Decimal::ZERO;
        let mut previous: Option<DateTime<Utc>> = None;
        for drink in drinks {
            if let Some(previous) = previous {
                alcohol = burn(alcohol, drink.timestamp - previous);
            }
            alcohol += drink.standard_units * ALCOHOL_PER_UNIT_KG;
            previous = Some(drink.timestamp);
        }

        alcohol = burn(alcohol, now - last.timestamp);
        if alcohol.is_zero() {
            return Decimal::ZERO;
        }

        let body_mass = profile
            .body_mass_kg
            .filter(|mass| *mass > 0)
            .unwrap_or(DEFAULT_BODY_MASS_KG);
        let distribution = Decimal::from(body_mass) * profile.sex.coefficient();

        round_permille(dec!(1000) * alcohol / distribution)
    }

    /// Convenience wrapper: filter the history, then estimate.
    #[must_use]
    pub fn estimate_from_history(
        transactions: &[Transaction],
        profile: BacProfile,
        now: DateTime<Utc>,
    ) -> Decimal {
        Self::estimate(&Self::qualifying_drinks(transactions, now), profile, now)
    }
}
