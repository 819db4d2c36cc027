//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. Column limits mirror
//! the schema so every backend rejects the same inputs.

use crate::{EngineError, ResultEngine};

pub(crate) const USERNAME_MAX_LEN: usize = 80;
pub(crate) const CATEGORY_NAME_MAX_LEN: usize = 120;
pub(crate) const ITEM_TITLE_MAX_LEN: usize = 120;
pub(crate) const ITEM_KIND_MAX_LEN: usize = 20;

/// Trim `value` and ensure it is non-empty and within `max_len` characters.
pub(crate) fn normalize_required_text(
    value: &str,
    label: &str,
    max_len: usize,
) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    if trimmed.chars().count() > max_len {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Reject NaN and infinities, which the lenient payload parser lets through.
pub(crate) fn require_finite(value: f64, label: &str) -> ResultEngine<f64> {
    if !value.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be a finite number"
        )));
    }
    Ok(value)
}
