use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::policy::{stepped_points, RiskPolicy, TierThresholds, MAX_SCORE};
use crate::types::{Days, Money, Ratio};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Raw per-customer inputs to the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskFactors {
    pub credit_limit: Money,
    pub balance: Money,
    pub overdue_amount: Money,
    pub overdue_days: Days,
    pub returned_check_count: u32,
    pub protested_check_count: u32,
    pub dishonored_check_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_payment_delay: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Thresholds are inclusive: a score equal to a bound belongs to the
    /// higher tier.
    pub fn from_score(score: Decimal, tiers: &TierThresholds) -> Self {
        if score >= tiers.critical {
            RiskLevel::Critical
        } else if score >= tiers.high {
            RiskLevel::High
        } else if score >= tiers.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Points contributed by each factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    /// balance / credit limit, uncapped. None without a positive limit.
    pub credit_ratio: Option<Ratio>,
    /// overdue / balance, uncapped. None without a positive balance.
    pub overdue_ratio: Option<Ratio>,
    pub balance_points: Decimal,
    pub overdue_points: Decimal,
    pub age_points: Decimal,
    pub dishonored_points: Decimal,
    pub delay_points: Decimal,
}

impl FactorBreakdown {
    pub fn total(&self) -> Decimal {
        [
            self.overdue_points,
            self.age_points,
            self.dishonored_points,
            self.delay_points,
        ]
        .into_iter()
        .fold(self.balance_points, Decimal::saturating_add)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub breakdown: FactorBreakdown,
    /// Whole points in [0, 100].
    pub score: Decimal,
    pub level: RiskLevel,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Weighted 0-100 risk score.
///
/// 1. Balance / credit limit, linear up to ratio 1.
/// 2. Overdue / balance, linear up to ratio 1.
/// 3. Oldest overdue item, stepped (single bracket).
/// 4. Returned and protested checks, per-check points up to a cap.
/// 5. Average payment delay, stepped.
pub fn score_risk(factors: &RiskFactors, policy: &RiskPolicy) -> RiskScore {
    let mut warnings = Vec::new();

    let credit_ratio = ratio(factors.balance, factors.credit_limit);
    let balance_points = linear_points(credit_ratio, policy.balance_ratio_points);
    match credit_ratio {
        Some(r) if r > Decimal::ONE => warnings.push(format!(
            "Balance is {}x the credit limit.",
            r.round_dp(2).normalize()
        )),
        None if factors.balance > Decimal::ZERO => {
            warnings.push("No credit limit defined; balance factor scored as zero.".into())
        }
        _ => {}
    }

    let overdue_ratio = ratio(factors.overdue_amount, factors.balance);
    let overdue_points = linear_points(overdue_ratio, policy.overdue_ratio_points);

    let age_points = stepped_points(&policy.age_brackets, Decimal::from(factors.overdue_days));

    let dishonored_points = Decimal::from(factors.returned_check_count)
        .saturating_mul(policy.returned_check_points)
        .saturating_add(
            Decimal::from(factors.protested_check_count).saturating_mul(policy.protested_check_points),
        )
        .min(policy.dishonored_cap);

    let delay_points = factors
        .average_payment_delay
        .map_or(Decimal::ZERO, |delay| stepped_points(&policy.delay_brackets, delay));

    let breakdown = FactorBreakdown {
        credit_ratio,
        overdue_ratio,
        balance_points,
        overdue_points,
        age_points,
        dishonored_points,
        delay_points,
    };

    let raw = breakdown.total();
    if raw > MAX_SCORE {
        warnings.push(format!("Raw score {} clamped to {MAX_SCORE}.", raw.normalize()));
    }
    // Tiers compare the unrounded score: 69.5 is still high.
    let clamped = raw.clamp(Decimal::ZERO, MAX_SCORE);
    let level = RiskLevel::from_score(clamped, &policy.tiers);
    let score = clamped.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    RiskScore {
        breakdown,
        score,
        level,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `numerator / denominator` for a positive denominator. A quotient beyond
/// Decimal range saturates, which still lands above 1 and scores the full cap.
fn ratio(numerator: Money, denominator: Money) -> Option<Ratio> {
    if denominator <= Decimal::ZERO {
        return None;
    }
    Some(numerator.checked_div(denominator).unwrap_or(
        if numerator.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        },
    ))
}

/// Scale `max_points` by a ratio clamped to [0, 1].
fn linear_points(ratio: Option<Ratio>, max_points: Decimal) -> Decimal {
    ratio.map_or(Decimal::ZERO, |r| {
        r.clamp(Decimal::ZERO, Decimal::ONE) * max_points
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
