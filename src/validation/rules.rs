//! Ordered property rule sets.
//!
//! Each call site decides which structural rules apply to a property
//! sequence by picking (or building) a [`RuleSet`]. The list validator and
//! the table validator differ only in which rules they carry and in whether
//! per-item keys are prefixed with the item's position.

use std::collections::HashMap;

use regex::Regex;

use super::result::ValidationResult;
use super::{is_blank, DESCRIPTION, DISPLAY_NAME, DISPLAY_VALUE, NAME, PROPERTIES, VALUE};
use crate::property::Property;

/// A single structural rule over a property sequence.
#[derive(Debug, Clone)]
pub enum PropertyRule {
    /// At least one property is required. An empty sequence stops evaluation
    /// of the remaining rules.
    NonEmpty,
    /// No two properties may share a non-blank name.
    UniqueNames,
    /// Every property's own [`Property::validate`] errors.
    PerItem,
    /// Every non-blank property name must match the pattern.
    NamePattern(Regex),
    /// Text fields must not exceed this many characters.
    MaxTextLen(usize),
}

/// Ordered list of [`PropertyRule`]s applied in one call.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PropertyRule>,
    indexed_keys: bool,
}

impl RuleSet {
    /// Creates an empty rule set.
    ///
    /// With `indexed_keys`, per-item errors are reported as
    /// `Properties[<i>].<Key>`; otherwise under the property's own key.
    #[must_use]
    pub fn new(indexed_keys: bool) -> Self {
        Self {
            rules: Vec::new(),
            indexed_keys,
        }
    }

    /// Rules of the static list validator: non-empty, unique names, indexed
    /// per-item errors.
    #[must_use]
    pub fn list() -> Self {
        Self::new(true)
            .with(PropertyRule::NonEmpty)
            .with(PropertyRule::UniqueNames)
            .with(PropertyRule::PerItem)
    }

    /// Rules of table validation: non-empty and per-item errors under the
    /// properties' own keys. No duplicate-name check.
    #[must_use]
    pub fn table() -> Self {
        Self::new(false)
            .with(PropertyRule::NonEmpty)
            .with(PropertyRule::PerItem)
    }

    /// Appends a rule.
    #[must_use]
    pub fn with(mut self, rule: PropertyRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[PropertyRule] {
        &self.rules
    }

    #[must_use]
    pub fn contains_unique_names(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, PropertyRule::UniqueNames))
    }

    /// Limit of the first [`PropertyRule::MaxTextLen`] rule, if any.
    #[must_use]
    pub fn max_text_len(&self) -> Option<usize> {
        self.rules.iter().find_map(|rule| match rule {
            PropertyRule::MaxTextLen(max) => Some(*max),
            _ => None,
        })
    }

    #[must_use]
    pub const fn indexed_keys(&self) -> bool {
        self.indexed_keys
    }

    /// Applies every rule in order.
    #[must_use]
    pub fn apply(&self, properties: &[Property]) -> ValidationResult {
        let mut result = ValidationResult::new();
        for rule in &self.rules {
            match rule {
                PropertyRule::NonEmpty => {
                    if properties.is_empty() {
                        result.add_error(PROPERTIES, "At least one property is required");
                        return result;
                    }
                }
                PropertyRule::UniqueNames => check_unique_names(properties, &mut result),
                PropertyRule::PerItem => {
                    for (index, property) in properties.iter().enumerate() {
                        let own = property.validate();
                        if self.indexed_keys {
                            result.append_rekeyed(own, |key| item_key(index, key));
                        } else {
                            result.append(own);
                        }
                    }
                }
                PropertyRule::NamePattern(pattern) => {
                    for (index, property) in properties.iter().enumerate() {
                        let name = property.name();
                        if !is_blank(name) && !pattern.is_match(name) {
                            result.add_error(
                                self.key(index, NAME),
                                format!("Name '{name}' does not match pattern '{}'", pattern.as_str()),
                            );
                        }
                    }
                }
                PropertyRule::MaxTextLen(max) => {
                    for (index, property) in properties.iter().enumerate() {
                        for (field, text) in [
                            (NAME, property.name()),
                            (DISPLAY_NAME, property.display_name()),
                            (DESCRIPTION, property.description()),
                            (VALUE, property.value()),
                            (DISPLAY_VALUE, property.display_value()),
                        ] {
                            check_text_len(&mut result, self.key(index, field), text, *max);
                        }
                    }
                }
            }
        }
        result
    }

    fn key(&self, index: usize, field: &str) -> String {
        if self.indexed_keys {
            item_key(index, field)
        } else {
            field.to_string()
        }
    }
}

fn item_key(index: usize, field: &str) -> String {
    format!("{PROPERTIES}[{index}].{field}")
}

/// Reports `field` when `text` is longer than `max` characters.
pub(crate) fn check_text_len(result: &mut ValidationResult, field: impl Into<String>, text: &str, max: usize) {
    let len = text.chars().count();
    if len > max {
        let field = field.into();
        result.add_error(field, format!("Text is {len} characters long, maximum is {max}"));
    }
}

fn check_unique_names(properties: &[Property], result: &mut ValidationResult) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for property in properties {
        let name = property.name();
        if is_blank(name) {
            continue;
        }
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            first_seen.push(name);
        }
        *count += 1;
    }

    for name in first_seen {
        if counts[name] > 1 {
            result.add_error(NAME, format!("Duplicate property name '{name}'"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyKind;

    fn valid(name: &str) -> Property {
        Property::builder()
            .name(name)
            .display_name(name)
            .value("1")
            .build()
    }

    #[test]
    fn test_empty_short_circuits() {
        let result = RuleSet::list().apply(&[]);
        assert_eq!(result.error_count(), 1);
        assert!(result.has_errors_for(PROPERTIES));
    }

    #[test]
    fn test_unique_names_one_error_per_distinct_name() {
        let props = vec![valid("A"), valid("A"), valid("A"), valid("B"), valid("B"), valid("C")];
        let result = RuleSet::list().apply(&props);
        assert_eq!(
            result.errors_for(NAME),
            ["Duplicate property name 'A'", "Duplicate property name 'B'"]
        );
    }

    #[test]
    fn test_unique_names_ignores_blank() {
        let props = vec![
            Property::builder().display_name("x").value("1").build(),
            Property::builder().display_name("y").value("1").build(),
        ];
        let result = RuleSet::new(true).with(PropertyRule::UniqueNames).apply(&props);
        assert!(result.is_valid());
    }

    #[test]
    fn test_table_rules_keep_own_keys() {
        let props = vec![Property::builder().name("Size").display_name("Size").build()];
        let result = RuleSet::table().apply(&props);
        assert!(result.has_errors_for(VALUE));
        assert!(!result.has_errors_for("Properties[0].Value"));
    }

    #[test]
    fn test_name_pattern() {
        let pattern = Regex::new("^[A-Za-z][A-Za-z0-9_]*$").unwrap();
        let props = vec![valid("Size"), valid("9lives")];
        let result = RuleSet::new(true)
            .with(PropertyRule::NamePattern(pattern))
            .apply(&props);
        assert_eq!(result.error_count(), 1);
        assert!(result.has_errors_for("Properties[1].Name"));
    }

    #[test]
    fn test_max_text_len() {
        let mut prop = valid("Size");
        prop.set_description("a rather long description");
        let result = RuleSet::new(false)
            .with(PropertyRule::MaxTextLen(10))
            .apply(&[prop]);
        assert_eq!(result.error_count(), 1);
        assert!(result.has_errors_for(DESCRIPTION));
    }

    #[test]
    fn test_lookup_display_value_reported_per_item() {
        let prop = Property::builder()
            .name("Color")
            .display_name("Color")
            .value("c1")
            .kind(PropertyKind::Lookup)
            .build();
        let result = RuleSet::list().apply(&[prop]);
        assert!(result.has_errors_for("Properties[0].DisplayValue"));
    }
}
