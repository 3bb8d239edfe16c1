//! Structural validation of properties and lookup tables.
//!
//! Validation never fails with an error: problems are collected into a
//! [`ValidationResult`] keyed by field so an editor can show them next to
//! the offending input.

mod config;
mod result;
mod rules;

pub use config::ValidationConfig;
pub use result::{FieldErrors, ValidationResult};
pub use rules::{PropertyRule, RuleSet};

pub(crate) use rules::check_text_len;

/// Key for property name errors.
pub const NAME: &str = "Name";
/// Key for property display name errors.
pub const DISPLAY_NAME: &str = "DisplayName";
/// Key for description errors.
pub const DESCRIPTION: &str = "Description";
/// Key for property value errors.
pub const VALUE: &str = "Value";
/// Key for lookup display value errors.
pub const DISPLAY_VALUE: &str = "DisplayValue";
/// Key for errors about the property sequence as a whole.
pub const PROPERTIES: &str = "Properties";
/// Key for table action name errors.
pub const ACTION_NAME: &str = "ActionName";

/// Returns true if `value` is empty or whitespace only.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
