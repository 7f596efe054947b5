use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::scorer::{RiskFactors, RiskLevel};
use crate::types::Days;

const LEGAL_FOLLOW_UP_DAYS: Days = 90;
const REMINDER_DAYS: Days = 30;
const SLOW_PAYER_DAYS: Decimal = dec!(15);

pub fn headline(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "Critical risk: no new transactions; start collection.",
        RiskLevel::High => "High risk: require collateral or switch to cash sales.",
        RiskLevel::Medium => "Medium risk: monitor the account closely.",
        RiskLevel::Low => "Low risk: normal payment terms.",
    }
}

/// Advisory lines for a scored customer: the tier headline, then one note
/// per contributing factor in a fixed order (credit limit, overdue amount,
/// aging, dishonored checks, payment delay).
pub fn recommendations(factors: &RiskFactors, level: RiskLevel) -> Vec<String> {
    let mut out = vec![headline(level).to_string()];

    if factors.credit_limit > Decimal::ZERO && factors.balance > factors.credit_limit {
        let excess = factors.balance - factors.credit_limit;
        let pct = excess
            .checked_div(factors.credit_limit)
            .and_then(|r| r.checked_mul(dec!(100)))
            .map(|p| format!(" ({}%)", p.round_dp(1).normalize()))
            .unwrap_or_default();
        out.push(format!(
            "Credit limit exceeded by {}{}; suspend further credit until the limit is reviewed.",
            money(excess),
            pct
        ));
    }

    if factors.overdue_amount > Decimal::ZERO {
        out.push(format!(
            "{} is overdue; request payment.",
            money(factors.overdue_amount)
        ));
    }

    if factors.overdue_days > LEGAL_FOLLOW_UP_DAYS {
        out.push(format!(
            "Oldest overdue item is {} days past due; consider legal follow-up.",
            factors.overdue_days
        ));
    } else if factors.overdue_days > REMINDER_DAYS {
        out.push(format!(
            "Oldest overdue item is {} days past due; send a payment reminder.",
            factors.overdue_days
        ));
    }

    let dishonored = factors.returned_check_count + factors.protested_check_count;
    if dishonored > 0 {
        out.push(format!(
            "{} returned and {} protested check(s) totalling {}; accept only cash or guaranteed instruments.",
            factors.returned_check_count,
            factors.protested_check_count,
            money(factors.dishonored_check_amount)
        ));
    }

    if let Some(delay) = factors.average_payment_delay {
        if delay > SLOW_PAYER_DAYS {
            out.push(format!(
                "Pays {} days late on average; shorten payment terms.",
                delay.round_dp(1).normalize()
            ));
        }
    }

    out
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
