use cari_core::risk::RiskPolicy;
use chrono::NaiveDate;

use crate::input::file::read_text;

/// Environment variable naming a default policy file.
pub const POLICY_ENV: &str = "CARI_POLICY";

/// Settings shared by every report command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub as_of: NaiveDate,
    pub policy: RiskPolicy,
    /// Where the policy came from, for display.
    pub policy_source: String,
}

impl Settings {
    pub fn load(
        as_of: Option<&str>,
        policy_path: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let as_of = match as_of {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| format!("Invalid --as-of '{}': {}", raw, e))?,
            None => chrono::Local::now().date_naive(),
        };

        let env_path = std::env::var(POLICY_ENV).ok().filter(|p| !p.trim().is_empty());
        let (policy, policy_source) = match policy_path.map(str::to_string).or(env_path) {
            Some(path) => (read_policy(&path)?, path),
            None => (RiskPolicy::default(), "built-in".to_string()),
        };

        for warning in policy.validate()? {
            tracing::warn!("{}", warning);
        }
        tracing::debug!(%as_of, policy = %policy_source, "settings loaded");

        Ok(Self {
            as_of,
            policy,
            policy_source,
        })
    }
}

/// YAML is a superset of JSON, so one parser covers both file types.
fn read_policy(path: &str) -> Result<RiskPolicy, Box<dyn std::error::Error>> {
    let (located, contents) = read_text(path)?;
    let policy: RiskPolicy = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse policy '{}': {}", located.display(), e))?;
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    #[test]
    fn test_explicit_as_of() {
        let s = Settings::load(Some("2024-06-30"), None).unwrap();
        assert_eq!(s.as_of, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }

    #[test]
    fn test_bad_as_of_rejected() {
        assert!(Settings::load(Some("30/06/2024"), None).is_err());
    }

    #[test]
    fn test_policy_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("cari-policy-{}.yaml", std::process::id()));
        fs::write(&path, "protested_check_points: 15\ntiers:\n  critical: 80\n").unwrap();
        let s = Settings::load(Some("2024-06-30"), path.to_str()).unwrap();
        assert_eq!(s.policy.protested_check_points, dec!(15));
        assert_eq!(s.policy.tiers.critical, dec!(80));
        assert_eq!(s.policy.tiers.high, dec!(50));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_policy_file_rejected() {
        assert!(Settings::load(None, Some("/definitely/not/here.yaml")).is_err());
    }
}
