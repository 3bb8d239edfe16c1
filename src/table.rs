//! Lookup tables: one parametric rule set attached to a block definition.
//!
//! A table owns an ordered sequence of [`Property`] values plus the metadata
//! that ties it to the host: the action name, opaque handles for the
//! parameter and action objects, and the selected geometry.
//!
//! Change tracking is local. The table's own flag covers only
//! `action_name` and `description`; each property tracks itself. Use
//! [`LookupTable::is_modified`] when both matter.

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, LookupResult};
use crate::host::HostRef;
use crate::property::{replace_if_changed, Property, PropertyKind};
use crate::validation::{
    check_text_len, is_blank, RuleSet, ValidationConfig, ValidationResult, ACTION_NAME,
    DESCRIPTION,
};

/// A named collection of properties plus host metadata.
///
/// # Examples
///
/// ```
/// use blocklookup::{LookupTable, Property, PropertyKind};
///
/// let table = LookupTable::builder()
///     .action_name("A1")
///     .property(
///         Property::builder()
///             .name("Size")
///             .display_name("Size")
///             .value("10")
///             .build(),
///     )
///     .build();
///
/// assert!(table.validate().is_valid());
/// assert_eq!(table.property_count(), 1);
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LookupTable {
    action_name: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameter_ref: Option<HostRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action_ref: Option<HostRef>,
    #[serde(default)]
    selection: Vec<HostRef>,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(skip)]
    dirty: bool,
}

impl LookupTable {
    /// Creates an empty, clean table for the given action.
    #[must_use]
    pub fn new(action_name: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            ..Self::default()
        }
    }

    pub fn builder() -> LookupTableBuilder {
        LookupTableBuilder::new()
    }

    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn parameter_ref(&self) -> Option<HostRef> {
        self.parameter_ref
    }

    #[must_use]
    pub const fn action_ref(&self) -> Option<HostRef> {
        self.action_ref
    }

    pub fn set_action_name(&mut self, action_name: impl Into<String>) -> bool {
        replace_if_changed(&mut self.action_name, action_name.into(), &mut self.dirty)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        replace_if_changed(&mut self.description, description.into(), &mut self.dirty)
    }

    /// Records the host handles. Host bookkeeping does not mark the table dirty.
    pub fn set_refs(&mut self, parameter_ref: Option<HostRef>, action_ref: Option<HostRef>) {
        self.parameter_ref = parameter_ref;
        self.action_ref = action_ref;
    }

    // Properties

    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, index: usize) -> Option<&Property> {
        self.properties.get(index)
    }

    /// Mutable access to one property; edits mark that property dirty.
    pub fn property_mut(&mut self, index: usize) -> LookupResult<&mut Property> {
        let len = self.properties.len();
        self.properties
            .get_mut(index)
            .ok_or(LookupError::PropertyIndexOutOfRange { index, len })
    }

    /// First property with the given name.
    #[must_use]
    pub fn property_by_name(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Inserts at `index`, shifting later properties. `index == len` appends.
    pub fn insert_property(&mut self, index: usize, property: Property) -> LookupResult<()> {
        let len = self.properties.len();
        if index > len {
            return Err(LookupError::PropertyIndexOutOfRange { index, len });
        }
        self.properties.insert(index, property);
        Ok(())
    }

    pub fn remove_property(&mut self, index: usize) -> LookupResult<Property> {
        let len = self.properties.len();
        if index >= len {
            return Err(LookupError::PropertyIndexOutOfRange { index, len });
        }
        Ok(self.properties.remove(index))
    }

    /// Replaces the whole property sequence.
    pub fn set_properties(&mut self, properties: Vec<Property>) {
        self.properties = properties;
    }

    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Properties supplied by the caller, in table order.
    pub fn input_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties_of(PropertyKind::Input)
    }

    /// Properties produced by the lookup, in table order.
    pub fn lookup_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties_of(PropertyKind::Lookup)
    }

    fn properties_of(&self, kind: PropertyKind) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(move |p| p.kind() == kind)
    }

    /// Name/value pairs written to host storage, in table order.
    #[must_use]
    pub fn persisted_pairs(&self) -> Vec<(&str, &str)> {
        self.properties
            .iter()
            .map(|p| (p.name(), p.value()))
            .collect()
    }

    // Selection

    #[must_use]
    pub fn selection(&self) -> &[HostRef] {
        &self.selection
    }

    /// Appends a handle. Duplicates are kept.
    pub fn add_to_selection(&mut self, handle: HostRef) {
        self.selection.push(handle);
    }

    pub fn set_selection(&mut self, selection: Vec<HostRef>) {
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn selection_size(&self) -> usize {
        self.selection.len()
    }

    // Change tracking

    /// Returns true if `action_name` or `description` changed. Property
    /// edits are not reflected here.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns true if any owned property is dirty.
    #[must_use]
    pub fn any_property_dirty(&self) -> bool {
        self.properties.iter().any(Property::is_dirty)
    }

    /// Table flag or any property flag.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.dirty || self.any_property_dirty()
    }

    /// Clears the table flag and every property's flag.
    pub fn reset_modified(&mut self) {
        self.dirty = false;
        for property in &mut self.properties {
            property.reset();
        }
    }

    // Validation

    /// Validates the table: action name present, at least one property, and
    /// each property's own errors under the property's field keys.
    ///
    /// Duplicate property names are not checked here; see
    /// [`ValidationConfig::table_duplicate_names`].
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        self.validate_with_rules(&RuleSet::table())
    }

    /// Validates with the rules enabled in `config`.
    pub fn validate_with(&self, config: &ValidationConfig) -> LookupResult<ValidationResult> {
        Ok(self.validate_with_rules(&config.rule_set_for_table()?))
    }

    /// Validates the table metadata, then applies `rules` to the properties.
    #[must_use]
    pub fn validate_with_rules(&self, rules: &RuleSet) -> ValidationResult {
        let mut result = ValidationResult::new();
        if is_blank(&self.action_name) {
            result.add_error(ACTION_NAME, "Action name is required");
        }
        if let Some(max) = rules.max_text_len() {
            check_text_len(&mut result, ACTION_NAME, &self.action_name, max);
            check_text_len(&mut result, DESCRIPTION, &self.description, max);
        }
        result.append(rules.apply(&self.properties));

        tracing::debug!(
            action = %self.action_name,
            errors = result.error_count(),
            duplicate_check = rules.contains_unique_names(),
            "validated lookup table"
        );
        result
    }

    /// Stable digest of the table content.
    ///
    /// Covers every field except the dirty flags, so two tables with equal
    /// content share a fingerprint regardless of their edit history.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut h = Hasher::new();
        feed_str(&mut h, &self.action_name);
        feed_str(&mut h, &self.description);
        feed_ref(&mut h, self.parameter_ref);
        feed_ref(&mut h, self.action_ref);

        h.update(&(self.selection.len() as u64).to_le_bytes());
        for handle in &self.selection {
            h.update(handle.as_uuid().as_bytes());
        }

        h.update(&(self.properties.len() as u64).to_le_bytes());
        for p in &self.properties {
            feed_str(&mut h, p.name());
            feed_str(&mut h, p.display_name());
            feed_str(&mut h, p.description());
            feed_str(&mut h, p.value());
            feed_str(&mut h, p.display_value());
            h.update(&[match p.kind() {
                PropertyKind::Input => 0,
                PropertyKind::Lookup => 1,
            }]);
        }
        h.finalize().to_hex().to_string()
    }
}

fn feed_str(h: &mut Hasher, s: &str) {
    h.update(&(s.len() as u64).to_le_bytes());
    h.update(s.as_bytes());
}

fn feed_ref(h: &mut Hasher, handle: Option<HostRef>) {
    match handle {
        Some(handle) => {
            h.update(&[1]);
            h.update(handle.as_uuid().as_bytes());
        }
        None => {
            h.update(&[0]);
        }
    }
}

/// Deep copy. The copy and every property in it start clean.
impl Clone for LookupTable {
    fn clone(&self) -> Self {
        Self {
            action_name: self.action_name.clone(),
            description: self.description.clone(),
            parameter_ref: self.parameter_ref,
            action_ref: self.action_ref,
            selection: self.selection.clone(),
            properties: self.properties.to_vec(),
            dirty: false,
        }
    }
}

/// Content equality; dirty flags are ignored.
impl PartialEq for LookupTable {
    fn eq(&self, other: &Self) -> bool {
        self.action_name == other.action_name
            && self.description == other.description
            && self.parameter_ref == other.parameter_ref
            && self.action_ref == other.action_ref
            && self.selection == other.selection
            && self.properties == other.properties
    }
}

impl Eq for LookupTable {}

/// Builder for [`LookupTable`].
#[derive(Debug, Default)]
pub struct LookupTableBuilder {
    action_name: Option<String>,
    description: Option<String>,
    parameter_ref: Option<HostRef>,
    action_ref: Option<HostRef>,
    selection: Vec<HostRef>,
    properties: Vec<Property>,
}

impl LookupTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn action_name(mut self, action_name: impl Into<String>) -> Self {
        self.action_name = Some(action_name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn parameter_ref(mut self, handle: HostRef) -> Self {
        self.parameter_ref = Some(handle);
        self
    }

    #[must_use]
    pub fn action_ref(mut self, handle: HostRef) -> Self {
        self.action_ref = Some(handle);
        self
    }

    /// Appends one selected entity.
    #[must_use]
    pub fn select(mut self, handle: HostRef) -> Self {
        self.selection.push(handle);
        self
    }

    /// Appends one property.
    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Appends several properties, keeping their order.
    #[must_use]
    pub fn properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Builds a clean table.
    #[must_use]
    pub fn build(self) -> LookupTable {
        LookupTable {
            action_name: self.action_name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            parameter_ref: self.parameter_ref,
            action_ref: self.action_ref,
            selection: self.selection,
            properties: self.properties,
            dirty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{NAME, PROPERTIES, VALUE};

    fn size() -> Property {
        Property::builder()
            .name("Size")
            .display_name("Size")
            .value("10")
            .build()
    }

    fn color() -> Property {
        Property::builder()
            .name("Color")
            .display_name("Color")
            .value("c1")
            .display_value("Red")
            .kind(PropertyKind::Lookup)
            .build()
    }

    fn make_table() -> LookupTable {
        LookupTable::builder()
            .action_name("A1")
            .property(size())
            .property(color())
            .build()
    }

    #[test]
    fn test_builder_is_clean() {
        let table = make_table();
        assert!(!table.is_dirty());
        assert!(!table.is_modified());
        assert_eq!(table.property_count(), 2);
        assert_eq!(table.selection_size(), 0);
    }

    #[test]
    fn test_default_counts_are_zero() {
        let table = LookupTable::default();
        assert_eq!(table.property_count(), 0);
        assert_eq!(table.selection_size(), 0);
    }

    #[test]
    fn test_setter_noop_and_change() {
        let mut table = make_table();
        assert!(!table.set_action_name("A1"));
        assert!(!table.is_dirty());

        assert!(table.set_description("slot sizes"));
        assert!(table.is_dirty());
    }

    #[test]
    fn test_property_edit_does_not_dirty_table() {
        let mut table = make_table();
        table.property_mut(0).unwrap().set_value("12");
        assert!(!table.is_dirty());
        assert!(table.any_property_dirty());
        assert!(table.is_modified());
    }

    #[test]
    fn test_refs_do_not_dirty_table() {
        let mut table = make_table();
        table.set_refs(Some(HostRef::new()), Some(HostRef::new()));
        assert!(!table.is_dirty());
        assert!(table.parameter_ref().is_some());
    }

    #[test]
    fn test_reset_modified_cascades() {
        let mut table = make_table();
        table.set_action_name("A2");
        table.property_mut(0).unwrap().set_value("12");
        table.property_mut(1).unwrap().set_display_value("Blue");

        table.reset_modified();
        assert!(!table.is_dirty());
        assert!(table.properties().iter().all(|p| !p.is_dirty()));
        assert_eq!(table.action_name(), "A2");
        assert_eq!(table.properties()[0].value(), "12");
    }

    #[test]
    fn test_clone_is_clean_and_independent() {
        let mut table = make_table();
        table.set_action_name("A2");
        table.property_mut(0).unwrap().set_value("12");
        table.add_to_selection(HostRef::new());

        let mut copy = table.clone();
        assert!(!copy.is_dirty());
        assert!(!copy.any_property_dirty());
        assert_eq!(copy, table);

        copy.remove_property(0).unwrap();
        copy.property_mut(0).unwrap().set_value("c2");
        copy.clear_selection();
        assert_eq!(table.property_count(), 2);
        assert_eq!(table.properties()[1].value(), "c1");
        assert_eq!(table.selection_size(), 1);
    }

    #[test]
    fn test_validate_valid_table() {
        assert!(make_table().validate().is_valid());
    }

    #[test]
    fn test_validate_missing_action_name_adds_one_error() {
        let mut table = make_table();
        table.set_action_name("");
        let result = table.validate();
        assert_eq!(result.error_count(), 1);
        assert!(result.has_errors_for(ACTION_NAME));
    }

    #[test]
    fn test_validate_empty_properties() {
        let table = LookupTable::new("A1");
        let result = table.validate();
        assert_eq!(result.fields().collect::<Vec<_>>(), vec![PROPERTIES]);
    }

    #[test]
    fn test_validate_property_errors_not_indexed() {
        let table = LookupTable::builder()
            .action_name("A1")
            .property(Property::builder().name("Size").display_name("Size").build())
            .build();
        let result = table.validate();
        assert!(result.has_errors_for(VALUE));
        assert!(!result.has_errors_for("Properties[0].Value"));
    }

    #[test]
    fn test_duplicates_allowed_by_default() {
        let table = LookupTable::builder()
            .action_name("A1")
            .property(size())
            .property(size())
            .build();
        assert!(table.validate().is_valid());

        let strict = ValidationConfig {
            table_duplicate_names: true,
            ..ValidationConfig::default()
        };
        let result = table.validate_with(&strict).unwrap();
        assert_eq!(result.errors_for(NAME), ["Duplicate property name 'Size'"]);
    }

    #[test]
    fn test_validate_with_max_text_len() {
        let mut table = make_table();
        table.set_description("a very long description of the table");
        let cfg = ValidationConfig {
            max_text_len: Some(16),
            ..ValidationConfig::default()
        };
        let result = table.validate_with(&cfg).unwrap();
        assert!(result.has_errors_for(DESCRIPTION));
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_index_errors() {
        let mut table = make_table();
        assert!(matches!(
            table.remove_property(5),
            Err(LookupError::PropertyIndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(table.property_mut(2).is_err());
        assert!(table.insert_property(3, size()).is_err());
        assert!(table.insert_property(2, size()).is_ok());
        assert_eq!(table.property_count(), 3);
    }

    #[test]
    fn test_kind_partition_and_pairs() {
        let table = make_table();
        assert_eq!(table.input_properties().count(), 1);
        assert_eq!(table.lookup_properties().next().unwrap().name(), "Color");
        assert_eq!(table.persisted_pairs(), vec![("Size", "10"), ("Color", "c1")]);
        assert!(table.property_by_name("Color").is_some());
        assert!(table.property_by_name("Missing").is_none());
    }

    #[test]
    fn test_fingerprint_tracks_content_not_flags() {
        let mut table = make_table();
        let original = table.fingerprint();
        assert_eq!(table.clone().fingerprint(), original);

        table.property_mut(0).unwrap().set_value("12");
        assert_ne!(table.fingerprint(), original);

        table.property_mut(0).unwrap().set_value("10");
        assert!(table.is_modified());
        assert_eq!(table.fingerprint(), original);
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        let a = make_table();
        let b = LookupTable::builder()
            .action_name("A1")
            .property(color())
            .property(size())
            .build();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_serialization_preserves_order() {
        let mut table = make_table();
        table.set_refs(Some(HostRef::new()), None);
        table.set_description("changed");
        let json = serde_json::to_string(&table).unwrap();
        let decoded: LookupTable = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, table);
        assert!(!decoded.is_dirty());
        assert_eq!(decoded.properties()[0].name(), "Size");
        assert!(decoded.action_ref().is_none());
    }
}
