//! Field-keyed accumulator of validation messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Messages recorded against one field key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub field: String,
    pub messages: Vec<String>,
}

/// Outcome of a validation call.
///
/// Keys keep the order in which they were first reported and each key's
/// messages keep call order, so [`all_messages`](Self::all_messages) is stable
/// for a given sequence of [`add_error`](Self::add_error) and
/// [`append`](Self::append) calls.
///
/// # Examples
///
/// ```
/// use blocklookup::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid());
///
/// result.add_error("Name", "Name is required");
/// assert!(!result.is_valid());
/// assert_eq!(result.all_messages(), vec!["Name: Name is required".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: Vec<FieldErrors>,
}

impl ValidationResult {
    /// Creates an empty (valid) result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors were recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends `message` to the list for `field`, creating the list if absent.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.errors.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => entry.messages.push(message),
            None => self.errors.push(FieldErrors {
                field,
                messages: vec![message],
            }),
        }
    }

    /// Merges every (field, message) pair of `other` into `self`.
    pub fn append(&mut self, other: ValidationResult) {
        for entry in other.errors {
            for message in entry.messages {
                self.add_error(entry.field.clone(), message);
            }
        }
    }

    /// Merges `other`, rewriting each key through `rekey`.
    pub(crate) fn append_rekeyed(&mut self, other: ValidationResult, rekey: impl Fn(&str) -> String) {
        for entry in other.errors {
            let field = rekey(&entry.field);
            for message in entry.messages {
                self.add_error(field.clone(), message);
            }
        }
    }

    /// Flattens to `"field: message"` strings.
    #[must_use]
    pub fn all_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|entry| {
                entry
                    .messages
                    .iter()
                    .map(move |message| format!("{}: {message}", entry.field))
            })
            .collect()
    }

    /// Messages recorded for `field` (empty if none).
    #[must_use]
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors
            .iter()
            .find(|entry| entry.field == field)
            .map_or(&[], |entry| entry.messages.as_slice())
    }

    /// Field keys in first-reported order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|entry| entry.field.as_str())
    }

    #[must_use]
    pub fn has_errors_for(&self, field: &str) -> bool {
        !self.errors_for(field).is_empty()
    }

    /// Total number of messages across all keys.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.iter().map(|entry| entry.messages.len()).sum()
    }

    /// Converts into `Ok(())` when valid, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.all_messages().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}
