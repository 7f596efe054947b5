use serde::{Deserialize, Serialize};

use super::CheckType;
use crate::{CariError, CariResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Held by the business, not yet presented.
    Portfolio,
    /// Deposited for collection.
    InBank,
    /// Passed on to a third party.
    Endorsed,
    Collected,
    /// Bounced.
    Returned,
    /// Formally protested after bouncing.
    Protested,
}

impl CheckStatus {
    pub fn is_dishonored(self) -> bool {
        matches!(self, CheckStatus::Returned | CheckStatus::Protested)
    }

    pub fn is_terminal(self) -> bool {
        self == CheckStatus::Collected
    }

    /// Resolve `event` against the lifecycle table.
    pub fn transition(self, kind: CheckType, event: CheckEvent) -> CariResult<CheckStatus> {
        use CheckEvent::*;
        use CheckStatus::*;

        let next = match (self, event) {
            (Portfolio, DepositToBank) if kind == CheckType::Received => Some(InBank),
            (InBank, WithdrawFromBank) => Some(Portfolio),
            (Portfolio, Endorse) if kind == CheckType::Received => Some(Endorsed),
            (Portfolio | InBank | Endorsed | Returned | Protested, Collect) => Some(Collected),
            (Portfolio | InBank | Endorsed, Return) => Some(Returned),
            (Returned, Protest) => Some(Protested),
            _ => None,
        };

        next.ok_or(CariError::InvalidTransition { from: self, event })
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CheckStatus::Portfolio => "portfolio",
            CheckStatus::InBank => "in_bank",
            CheckStatus::Endorsed => "endorsed",
            CheckStatus::Collected => "collected",
            CheckStatus::Returned => "returned",
            CheckStatus::Protested => "protested",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckEvent {
    DepositToBank,
    WithdrawFromBank,
    Endorse,
    Collect,
    Return,
    Protest,
}

impl std::fmt::Display for CheckEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CheckEvent::DepositToBank => "deposit_to_bank",
            CheckEvent::WithdrawFromBank => "withdraw_from_bank",
            CheckEvent::Endorse => "endorse",
            CheckEvent::Collect => "collect",
            CheckEvent::Return => "return",
            CheckEvent::Protest => "protest",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Check;
    use rust_decimal_macros::dec;

    const ALL_STATUSES: [CheckStatus; 6] = [
        CheckStatus::Portfolio,
        CheckStatus::InBank,
        CheckStatus::Endorsed,
        CheckStatus::Collected,
        CheckStatus::Returned,
        CheckStatus::Protested,
    ];

    const ALL_EVENTS: [CheckEvent; 6] = [
        CheckEvent::DepositToBank,
        CheckEvent::WithdrawFromBank,
        CheckEvent::Endorse,
        CheckEvent::Collect,
        CheckEvent::Return,
        CheckEvent::Protest,
    ];

    #[test]
    fn test_happy_path_received_check() {
        let kind = CheckType::Received;
        let s = CheckStatus::Portfolio
            .transition(kind, CheckEvent::DepositToBank)
            .unwrap();
        assert_eq!(s, CheckStatus::InBank);
        let s = s.transition(kind, CheckEvent::Collect).unwrap();
        assert_eq!(s, CheckStatus::Collected);
    }

    #[test]
    fn test_bounce_then_protest() {
        let kind = CheckType::Received;
        let s = CheckStatus::InBank.transition(kind, CheckEvent::Return).unwrap();
        let s = s.transition(kind, CheckEvent::Protest).unwrap();
        assert_eq!(s, CheckStatus::Protested);
        assert!(s.is_dishonored());
    }

    #[test]
    fn test_collected_is_terminal() {
        for event in ALL_EVENTS {
            for kind in [CheckType::Received, CheckType::Issued] {
                let err = CheckStatus::Collected.transition(kind, event).unwrap_err();
                assert!(matches!(
                    err,
                    CariError::InvalidTransition { from: CheckStatus::Collected, .. }
                ));
            }
        }
    }

    #[test]
    fn test_issued_checks_cannot_be_deposited_or_endorsed() {
        let kind = CheckType::Issued;
        assert!(CheckStatus::Portfolio.transition(kind, CheckEvent::DepositToBank).is_err());
        assert!(CheckStatus::Portfolio.transition(kind, CheckEvent::Endorse).is_err());
        assert_eq!(
            CheckStatus::Portfolio.transition(kind, CheckEvent::Collect).unwrap(),
            CheckStatus::Collected
        );
    }

    #[test]
    fn test_protest_requires_returned() {
        for from in ALL_STATUSES {
            let result = from.transition(CheckType::Received, CheckEvent::Protest);
            assert_eq!(result.is_ok(), from == CheckStatus::Returned, "from {from}");
        }
    }

    #[test]
    fn test_apply_leaves_check_untouched_on_error() {
        let mut check = Check::received("c1", dec!(500), CheckStatus::Collected);
        assert!(check.apply(CheckEvent::WithdrawFromBank).is_err());
        assert_eq!(check.status, CheckStatus::Collected);

        let mut check = Check::received("c1", dec!(500), CheckStatus::Portfolio);
        assert_eq!(check.apply(CheckEvent::Endorse).unwrap(), CheckStatus::Endorsed);
        assert_eq!(check.status, CheckStatus::Endorsed);
    }

    #[test]
    fn test_error_message_names_status_and_event() {
        let err = CheckStatus::Collected
            .transition(CheckType::Received, CheckEvent::WithdrawFromBank)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("collected"));
        assert!(msg.contains("withdraw_from_bank"));
    }
}
