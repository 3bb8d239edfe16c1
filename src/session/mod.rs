//! Editing sessions.
//!
//! An [`EditSession`] owns one lookup table for the lifetime of an editing
//! context (a dialog, a command invocation). All mutations go through the
//! session so observers learn about them synchronously, and the session
//! remembers what the table looked like when it was last saved.

mod observer;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::LookupResult;
use crate::host::HostRef;
use crate::property::{Property, PropertyField};
use crate::table::LookupTable;
use crate::validation::{RuleSet, ValidationConfig, ValidationResult};

pub use observer::{ChangeEvent, ChangeObserver, ChannelObserver, TableField};

/// Single-writer editing context around a [`LookupTable`].
pub struct EditSession {
    table: LookupTable,
    config: ValidationConfig,
    rules: RuleSet,
    observers: Vec<Box<dyn ChangeObserver>>,
    saved_fingerprint: String,
    last_saved_at: Option<DateTime<Utc>>,
}

impl EditSession {
    /// Opens a session with the default validation rules.
    ///
    /// The table's current content counts as saved.
    #[must_use]
    pub fn new(table: LookupTable) -> Self {
        Self::open(table, ValidationConfig::default(), RuleSet::table())
    }

    /// Opens a session with custom validation rules.
    ///
    /// Fails if `config` cannot be compiled into a rule set.
    pub fn with_config(table: LookupTable, config: ValidationConfig) -> LookupResult<Self> {
        let rules = config.rule_set_for_table()?;
        Ok(Self::open(table, config, rules))
    }

    fn open(table: LookupTable, config: ValidationConfig, rules: RuleSet) -> Self {
        let saved_fingerprint = table.fingerprint();
        tracing::debug!(action = %table.action_name(), "opened edit session");
        Self {
            table,
            config,
            rules,
            observers: Vec::new(),
            saved_fingerprint,
            last_saved_at: None,
        }
    }

    #[must_use]
    pub const fn table(&self) -> &LookupTable {
        &self.table
    }

    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Closes the session and hands the table back.
    #[must_use]
    pub fn into_table(self) -> LookupTable {
        self.table
    }

    /// Registers an observer for subsequent mutations.
    pub fn subscribe(&mut self, observer: Box<dyn ChangeObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn emit(&self, event: ChangeEvent) {
        tracing::debug!(action = %self.table.action_name(), event = ?event, "table changed");
        for observer in &self.observers {
            observer.on_change(&event);
        }
    }

    // Mutations

    pub fn set_action_name(&mut self, action_name: impl Into<String>) -> bool {
        let changed = self.table.set_action_name(action_name);
        if changed {
            self.emit(ChangeEvent::TableFieldChanged {
                field: TableField::ActionName,
                value: self.table.action_name().to_string(),
            });
        }
        changed
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        let changed = self.table.set_description(description);
        if changed {
            self.emit(ChangeEvent::TableFieldChanged {
                field: TableField::Description,
                value: self.table.description().to_string(),
            });
        }
        changed
    }

    /// Sets one field of the property at `index` from text.
    pub fn set_property_field(
        &mut self,
        index: usize,
        field: PropertyField,
        text: impl Into<String>,
    ) -> LookupResult<bool> {
        let property = self.table.property_mut(index)?;
        let changed = property.set(field, text)?;
        if changed {
            let value = property.get(field).to_string();
            self.emit(ChangeEvent::PropertyFieldChanged { index, field, value });
        }
        Ok(changed)
    }

    /// Appends a property and returns its index.
    pub fn add_property(&mut self, property: Property) -> usize {
        let name = property.name().to_string();
        self.table.add_property(property);
        let index = self.table.property_count() - 1;
        self.emit(ChangeEvent::PropertyAdded { index, name });
        index
    }

    pub fn remove_property(&mut self, index: usize) -> LookupResult<Property> {
        let removed = self.table.remove_property(index)?;
        self.emit(ChangeEvent::PropertyRemoved {
            index,
            name: removed.name().to_string(),
        });
        Ok(removed)
    }

    pub fn add_selection(&mut self, handle: HostRef) {
        self.table.add_to_selection(handle);
        self.emit(ChangeEvent::SelectionChanged {
            size: self.table.selection_size(),
        });
    }

    pub fn clear_selection(&mut self) {
        if self.table.selection_size() == 0 {
            return;
        }
        self.table.clear_selection();
        self.emit(ChangeEvent::SelectionChanged { size: 0 });
    }

    /// Records host handles issued for the parameter and action objects.
    pub fn set_refs(&mut self, parameter_ref: Option<HostRef>, action_ref: Option<HostRef>) {
        if self.table.parameter_ref() == parameter_ref && self.table.action_ref() == action_ref {
            return;
        }
        self.table.set_refs(parameter_ref, action_ref);
        self.emit(ChangeEvent::RefsChanged);
    }

    // Lifecycle

    /// Validates the table with the session's rules.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        self.table.validate_with_rules(&self.rules)
    }

    /// Returns true if any dirty flag in the table is set.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.table.is_modified()
    }

    /// Returns true if the content differs from the last save, including
    /// structural edits the dirty flags do not cover.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.table.fingerprint() != self.saved_fingerprint
    }

    #[must_use]
    pub const fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// Clears every dirty flag without recording a save.
    pub fn reset_modified(&mut self) {
        self.table.reset_modified();
    }

    /// Records the current content as saved and clears every dirty flag.
    ///
    /// The save is recorded even when the table is invalid; the returned
    /// result lets the caller decide what to do about it.
    pub fn mark_saved(&mut self) -> ValidationResult {
        let result = self.validate();
        if !result.is_valid() {
            tracing::warn!(
                action = %self.table.action_name(),
                errors = result.error_count(),
                "saving lookup table with validation errors"
            );
        }

        self.table.reset_modified();
        self.saved_fingerprint = self.table.fingerprint();
        self.last_saved_at = Some(Utc::now());
        self.emit(ChangeEvent::Saved {
            fingerprint: self.saved_fingerprint.clone(),
        });
        result
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("table", &self.table)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .field("saved_fingerprint", &self.saved_fingerprint)
            .field("last_saved_at", &self.last_saved_at)
            .finish()
    }
}
