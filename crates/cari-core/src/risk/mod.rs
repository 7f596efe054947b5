//! Customer financial-risk scoring.
//!
//! Ledger rows feed the aging aggregator and the overdue detector, checks
//! feed the dishonored counter; the scorer combines them under a
//! [`policy::RiskPolicy`] and the recommendation generator turns the result
//! into advisory text.

pub mod analysis;
pub mod cache;
pub mod policy;
pub mod recommend;
pub mod scorer;

pub use analysis::{analyze_customer, build_risk_report, RiskAnalysis, RiskReport, RiskReportInput};
pub use policy::RiskPolicy;
pub use scorer::{score_risk, RiskFactors, RiskLevel, RiskScore};
