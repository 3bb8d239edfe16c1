//! Validation configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rules::{PropertyRule, RuleSet};
use crate::error::{LookupError, LookupResult};

/// Opt-in validation behaviour.
///
/// The defaults reproduce the plain table and list validators exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Also reject duplicate property names when validating a whole table.
    pub table_duplicate_names: bool,
    /// Regex every non-blank property name must match.
    pub name_pattern: Option<String>,
    /// Maximum length, in characters, of any text field.
    pub max_text_len: Option<usize>,
}

impl ValidationConfig {
    /// Loads a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(s: &str) -> LookupResult<Self> {
        serde_json::from_str(s).map_err(|e| LookupError::InvalidConfig {
            field: "json".to_string(),
            reason: e.to_string(),
        })
    }

    /// Rule set used by table validation.
    pub fn rule_set_for_table(&self) -> LookupResult<RuleSet> {
        let mut rules = RuleSet::table();
        if self.table_duplicate_names {
            rules = rules.with(PropertyRule::UniqueNames);
        }
        self.with_extras(rules)
    }

    /// Rule set used by the static list validator.
    pub fn rule_set_for_list(&self) -> LookupResult<RuleSet> {
        self.with_extras(RuleSet::list())
    }

    fn with_extras(&self, mut rules: RuleSet) -> LookupResult<RuleSet> {
        if let Some(pattern) = &self.name_pattern {
            let regex = Regex::new(pattern).map_err(|e| LookupError::InvalidConfig {
                field: "name_pattern".to_string(),
                reason: e.to_string(),
            })?;
            rules = rules.with(PropertyRule::NamePattern(regex));
        }
        if let Some(max) = self.max_text_len {
            if max == 0 {
                return Err(LookupError::InvalidConfig {
                    field: "max_text_len".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            rules = rules.with(PropertyRule::MaxTextLen(max));
        }
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_rules_skip_duplicates() {
        let rules = ValidationConfig::default().rule_set_for_table().unwrap();
        assert!(!rules.contains_unique_names());
        assert!(!rules.indexed_keys());
    }

    #[test]
    fn test_flag_adds_duplicate_check() {
        let cfg = ValidationConfig {
            table_duplicate_names: true,
            ..ValidationConfig::default()
        };
        assert!(cfg.rule_set_for_table().unwrap().contains_unique_names());
    }

    #[test]
    fn test_list_rules_always_check_duplicates() {
        let rules = ValidationConfig::default().rule_set_for_list().unwrap();
        assert!(rules.contains_unique_names());
        assert!(rules.indexed_keys());
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = ValidationConfig::from_json(r#"{"max_text_len": 64}"#).unwrap();
        assert_eq!(cfg.max_text_len, Some(64));
        assert!(!cfg.table_duplicate_names);
        assert!(cfg.name_pattern.is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ValidationConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, LookupError::InvalidConfig { .. }));
    }

    #[test]
    fn test_bad_pattern_fails_fast() {
        let cfg = ValidationConfig {
            name_pattern: Some("([".to_string()),
            ..ValidationConfig::default()
        };
        let err = cfg.rule_set_for_table().unwrap_err();
        assert!(matches!(err, LookupError::InvalidConfig { ref field, .. } if field == "name_pattern"));
    }

    #[test]
    fn test_zero_max_len_rejected() {
        let cfg = ValidationConfig {
            max_text_len: Some(0),
            ..ValidationConfig::default()
        };
        assert!(cfg.rule_set_for_list().is_err());
    }
}
