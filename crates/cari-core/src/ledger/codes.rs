use crate::{CariError, CariResult};

/// Width of the numeric part of generated codes (`CR-0001`).
const CODE_WIDTH: usize = 4;

/// Next sequential code for `prefix`, one past the highest numeric suffix
/// already in use. Codes that carry a different prefix or a non-numeric
/// suffix are ignored.
pub fn next_customer_code<'a, I>(prefix: &str, existing: I) -> CariResult<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(CariError::InvalidInput {
            field: "prefix".into(),
            reason: "Code prefix cannot be empty.".into(),
        });
    }

    let stem = format!("{prefix}-");
    let highest = existing
        .into_iter()
        .filter_map(|code| code.trim().strip_prefix(stem.as_str()))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    let next = highest.checked_add(1).ok_or_else(|| CariError::InvalidInput {
        field: "existing".into(),
        reason: "Code sequence exhausted.".into(),
    })?;

    Ok(format!("{stem}{next:0width$}", width = CODE_WIDTH))
}
