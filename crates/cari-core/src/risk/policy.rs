use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{CariError, CariResult};

/// Scores are clamped to this ceiling regardless of the configured weights.
pub const MAX_SCORE: Decimal = dec!(100);

/// "Strictly above `over` earns `points`".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepBracket {
    pub over: Decimal,
    pub points: Decimal,
}

impl StepBracket {
    pub fn new(over: Decimal, points: Decimal) -> Self {
        Self { over, points }
    }
}

/// Points from the single highest bracket `value` exceeds. Brackets never
/// stack: 95 days against (120, 90, 60, 30) scores the 90 bracket only.
pub fn stepped_points(brackets: &[StepBracket], value: Decimal) -> Decimal {
    brackets
        .iter()
        .filter(|b| value > b.over)
        .max_by(|a, b| a.over.cmp(&b.over))
        .map_or(Decimal::ZERO, |b| b.points)
}

/// Inclusive lower bounds of each tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub critical: Decimal,
    pub high: Decimal,
    pub medium: Decimal,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            critical: dec!(70),
            high: dec!(50),
            medium: dec!(30),
        }
    }
}

/// Factor weights for customer risk scoring.
///
/// Defaults reproduce the long-standing report behaviour: 20 + 30 + 20 + 20
/// + 10 = 100. Returned and protested checks are weighted separately so a
/// stricter stance on protests can be configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Points at balance / credit limit >= 1.
    pub balance_ratio_points: Decimal,
    /// Points at overdue / balance >= 1.
    pub overdue_ratio_points: Decimal,
    /// Oldest overdue item, in days.
    pub age_brackets: Vec<StepBracket>,
    pub returned_check_points: Decimal,
    pub protested_check_points: Decimal,
    pub dishonored_cap: Decimal,
    /// Average payment delay, in days.
    pub delay_brackets: Vec<StepBracket>,
    pub tiers: TierThresholds,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            balance_ratio_points: dec!(20),
            overdue_ratio_points: dec!(30),
            age_brackets: vec![
                StepBracket::new(dec!(120), dec!(20)),
                StepBracket::new(dec!(90), dec!(15)),
                StepBracket::new(dec!(60), dec!(10)),
                StepBracket::new(dec!(30), dec!(5)),
            ],
            returned_check_points: dec!(10),
            protested_check_points: dec!(10),
            dishonored_cap: dec!(20),
            delay_brackets: vec![
                StepBracket::new(dec!(30), dec!(10)),
                StepBracket::new(dec!(15), dec!(5)),
            ],
            tiers: TierThresholds::default(),
        }
    }
}

impl RiskPolicy {
    /// Largest score the factors can produce before the final clamp.
    pub fn max_factor_points(&self) -> Decimal {
        let top = |brackets: &[StepBracket]| {
            brackets
                .iter()
                .map(|b| b.points)
                .max()
                .unwrap_or(Decimal::ZERO)
        };
        [
            self.overdue_ratio_points,
            top(&self.age_brackets),
            self.dishonored_cap,
            top(&self.delay_brackets),
        ]
        .into_iter()
        .fold(self.balance_ratio_points, Decimal::saturating_add)
    }

    /// Reject policies that would break score monotonicity or tier ordering.
    /// Returns non-fatal warnings.
    pub fn validate(&self) -> CariResult<Vec<String>> {
        let weights = [
            ("balance_ratio_points", self.balance_ratio_points),
            ("overdue_ratio_points", self.overdue_ratio_points),
            ("returned_check_points", self.returned_check_points),
            ("protested_check_points", self.protested_check_points),
            ("dishonored_cap", self.dishonored_cap),
        ];
        for (field, value) in weights {
            if value < Decimal::ZERO {
                return Err(CariError::InvalidInput {
                    field: field.into(),
                    reason: "Weights cannot be negative.".into(),
                });
            }
        }

        validate_brackets("age_brackets", &self.age_brackets)?;
        validate_brackets("delay_brackets", &self.delay_brackets)?;

        let t = &self.tiers;
        if !(t.critical >= t.high && t.high >= t.medium && t.medium >= Decimal::ZERO) {
            return Err(CariError::InvalidInput {
                field: "tiers".into(),
                reason: format!(
                    "Tier thresholds must satisfy critical >= high >= medium >= 0 (got {} / {} / {}).",
                    t.critical, t.high, t.medium
                ),
            });
        }

        let mut warnings = Vec::new();
        let max = self.max_factor_points();
        if max > MAX_SCORE {
            warnings.push(format!(
                "Factor caps sum to {max}; scores above {MAX_SCORE} are clamped."
            ));
        }
        Ok(warnings)
    }
}

/// Higher thresholds must never award fewer points.
fn validate_brackets(field: &str, brackets: &[StepBracket]) -> CariResult<()> {
    let mut sorted: Vec<&StepBracket> = brackets.iter().collect();
    sorted.sort_by(|a, b| a.over.cmp(&b.over));

    for b in &sorted {
        if b.points < Decimal::ZERO {
            return Err(CariError::InvalidInput {
                field: field.into(),
                reason: format!("Bracket over {} has negative points.", b.over),
            });
        }
    }
    for pair in sorted.windows(2) {
        if pair[0].over == pair[1].over {
            return Err(CariError::InvalidInput {
                field: field.into(),
                reason: format!("Duplicate bracket threshold {}.", pair[0].over),
            });
        }
        if pair[1].points < pair[0].points {
            return Err(CariError::InvalidInput {
                field: field.into(),
                reason: format!(
                    "Bracket over {} awards fewer points than bracket over {}.",
                    pair[1].over, pair[0].over
                ),
            });
        }
    }
    Ok(())
}
