use serde::{Deserialize, Serialize};

use super::{Check, CheckStatus};
use crate::types::Money;

/// Bounced and protested checks for one customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DishonoredChecks {
    pub returned_count: u32,
    pub protested_count: u32,
    /// returned_count + protested_count
    pub count: u32,
    pub amount: Money,
}

/// Count and sum checks whose status is returned or protested. Other
/// statuses are ignored, so callers may pass a customer's full check list.
pub fn count_dishonored<'a, I>(checks: I) -> DishonoredChecks
where
    I: IntoIterator<Item = &'a Check>,
{
    let mut out = DishonoredChecks::default();
    for check in checks {
        match check.status {
            CheckStatus::Returned => out.returned_count += 1,
            CheckStatus::Protested => out.protested_count += 1,
            _ => continue,
        }
        out.amount += check.amount;
    }
    out.count = out.returned_count + out.protested_count;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_counts_returned_and_protested_separately() {
        let checks = vec![
            Check::received("c1", dec!(500), CheckStatus::Returned),
            Check::received("c1", dec!(750), CheckStatus::Protested),
            Check::received("c1", dec!(1_000), CheckStatus::Returned),
            Check::received("c1", dec!(9_999), CheckStatus::Collected),
            Check::received("c1", dec!(9_999), CheckStatus::Portfolio),
        ];
        let d = count_dishonored(&checks);
        assert_eq!(d.returned_count, 2);
        assert_eq!(d.protested_count, 1);
        assert_eq!(d.count, 3);
        assert_eq!(d.amount, dec!(2_250));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(count_dishonored(&Vec::<Check>::new()), DishonoredChecks::default());
    }
}
