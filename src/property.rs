//! Properties: the named inputs and lookup outputs of a table.
//!
//! A property is either an independent input supplied by the caller or a
//! dependent lookup value produced by a rule row. Every property carries its
//! own dirty flag so an editor knows what must be saved again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LookupError, LookupResult};
use crate::validation::{
    is_blank, RuleSet, ValidationConfig, ValidationResult, DESCRIPTION, DISPLAY_NAME,
    DISPLAY_VALUE, NAME, VALUE,
};

/// Role of a property in a lookup table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Independent variable supplied by the caller.
    #[default]
    Input,
    /// Dependent output side of a rule row.
    Lookup,
}

impl PropertyKind {
    /// Canonical name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Lookup => "Lookup",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKind {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Input" => Ok(Self::Input),
            "Lookup" => Ok(Self::Lookup),
            other => Err(LookupError::UnknownPropertyKind {
                value: other.to_string(),
            }),
        }
    }
}

/// Addressable fields of a [`Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyField {
    Name,
    DisplayName,
    Description,
    Value,
    DisplayValue,
    Kind,
}

impl PropertyField {
    /// All fields, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::DisplayName,
        Self::Description,
        Self::Value,
        Self::DisplayValue,
        Self::Kind,
    ];

    /// Validation key used for this field.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Name => NAME,
            Self::DisplayName => DISPLAY_NAME,
            Self::Description => DESCRIPTION,
            Self::Value => VALUE,
            Self::DisplayValue => DISPLAY_VALUE,
            Self::Kind => "Kind",
        }
    }
}

impl fmt::Display for PropertyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Stores `new` in `slot` and raises `dirty` when it differs from the
/// current value. Returns whether anything changed.
pub(crate) fn replace_if_changed<T: PartialEq>(slot: &mut T, new: T, dirty: &mut bool) -> bool {
    if *slot == new {
        return false;
    }
    *slot = new;
    *dirty = true;
    true
}

/// A single named attribute of a lookup table.
///
/// Setters are no-ops when the new value equals the stored one; otherwise
/// they store it, mark the property dirty and return `true`.
///
/// # Examples
///
/// ```
/// use blocklookup::{Property, PropertyKind};
///
/// let mut color = Property::builder()
///     .name("Color")
///     .display_name("Color")
///     .value("c1")
///     .display_value("Red")
///     .kind(PropertyKind::Lookup)
///     .build();
///
/// assert!(color.validate().is_valid());
/// assert!(!color.is_dirty());
///
/// assert!(color.set_display_value("Blue"));
/// assert!(color.is_dirty());
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Property {
    name: String,
    display_name: String,
    #[serde(default)]
    description: String,
    value: String,
    #[serde(default)]
    display_value: String,
    #[serde(default)]
    kind: PropertyKind,
    #[serde(skip)]
    dirty: bool,
}

impl Property {
    /// Creates an empty, clean property of the given kind.
    #[must_use]
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn builder() -> PropertyBuilder {
        PropertyBuilder::new()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Returns true if any field changed since construction or the last reset.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        replace_if_changed(&mut self.name, name.into(), &mut self.dirty)
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) -> bool {
        replace_if_changed(&mut self.display_name, display_name.into(), &mut self.dirty)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        replace_if_changed(&mut self.description, description.into(), &mut self.dirty)
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        replace_if_changed(&mut self.value, value.into(), &mut self.dirty)
    }

    pub fn set_display_value(&mut self, display_value: impl Into<String>) -> bool {
        replace_if_changed(&mut self.display_value, display_value.into(), &mut self.dirty)
    }

    pub fn set_kind(&mut self, kind: PropertyKind) -> bool {
        replace_if_changed(&mut self.kind, kind, &mut self.dirty)
    }

    /// Reads a field as text. `Kind` renders as `"Input"` or `"Lookup"`.
    #[must_use]
    pub fn get(&self, field: PropertyField) -> &str {
        match field {
            PropertyField::Name => &self.name,
            PropertyField::DisplayName => &self.display_name,
            PropertyField::Description => &self.description,
            PropertyField::Value => &self.value,
            PropertyField::DisplayValue => &self.display_value,
            PropertyField::Kind => self.kind.as_str(),
        }
    }

    /// Sets a field from text.
    ///
    /// Returns whether the stored value changed. Setting `Kind` to anything
    /// other than `"Input"` or `"Lookup"` fails without touching the property.
    pub fn set(&mut self, field: PropertyField, text: impl Into<String>) -> LookupResult<bool> {
        let text = text.into();
        let changed = match field {
            PropertyField::Name => self.set_name(text),
            PropertyField::DisplayName => self.set_display_name(text),
            PropertyField::Description => self.set_description(text),
            PropertyField::Value => self.set_value(text),
            PropertyField::DisplayValue => self.set_display_value(text),
            PropertyField::Kind => self.set_kind(text.parse()?),
        };
        Ok(changed)
    }

    /// Clears the dirty flag. No other field changes.
    pub fn reset(&mut self) {
        self.dirty = false;
    }

    /// Checks this property on its own.
    ///
    /// Every check runs, so one call may report several fields.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if is_blank(&self.name) {
            result.add_error(NAME, "Name is required");
        }
        if is_blank(&self.display_name) {
            result.add_error(DISPLAY_NAME, "Display name is required");
        }
        if is_blank(&self.value) {
            result.add_error(VALUE, "Value is required");
        }
        if self.kind == PropertyKind::Lookup && is_blank(&self.display_value) {
            result.add_error(DISPLAY_VALUE, "Display value is required for lookup properties");
        }
        result
    }

    /// Creates one property per non-blank name, using the name as display
    /// name and value. Blank names are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocklookup::{Property, PropertyKind};
    ///
    /// let props = Property::create_from_names(["Width", " ", "Height"], PropertyKind::Input);
    /// assert_eq!(props.len(), 2);
    /// assert_eq!(props[1].value(), "Height");
    /// ```
    #[must_use]
    pub fn create_from_names<I, S>(names: I, kind: PropertyKind) -> Vec<Property>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| !is_blank(name.as_ref()))
            .map(|name| {
                let name = name.as_ref();
                Property::builder()
                    .name(name)
                    .display_name(name)
                    .value(name)
                    .kind(kind)
                    .build()
            })
            .collect()
    }

    /// Validates a property sequence: non-empty, unique names, and each
    /// item's own errors keyed `Properties[<i>].<Key>`.
    #[must_use]
    pub fn validate_list(properties: &[Property]) -> ValidationResult {
        RuleSet::list().apply(properties)
    }

    /// Like [`validate_list`](Self::validate_list) with the extra rules
    /// enabled in `config`.
    pub fn validate_list_with(
        properties: &[Property],
        config: &ValidationConfig,
    ) -> LookupResult<ValidationResult> {
        Ok(config.rule_set_for_list()?.apply(properties))
    }
}

/// Clones always start clean.
impl Clone for Property {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            value: self.value.clone(),
            display_value: self.display_value.clone(),
            kind: self.kind,
            dirty: false,
        }
    }
}

/// Content equality; the dirty flag is ignored.
impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.display_name == other.display_name
            && self.description == other.description
            && self.value == other.value
            && self.display_value == other.display_value
            && self.kind == other.kind
    }
}

impl Eq for Property {}

/// Builder for [`Property`]. Unset text fields are empty.
#[derive(Debug, Default)]
pub struct PropertyBuilder {
    name: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
    value: Option<String>,
    display_value: Option<String>,
    kind: Option<PropertyKind>,
}

impl PropertyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn display_value(mut self, display_value: impl Into<String>) -> Self {
        self.display_value = Some(display_value.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: PropertyKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Builds a clean property. Completeness is checked by
    /// [`Property::validate`], not here.
    #[must_use]
    pub fn build(self) -> Property {
        Property {
            name: self.name.unwrap_or_default(),
            display_name: self.display_name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            value: self.value.unwrap_or_default(),
            display_value: self.display_value.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            dirty: false,
        }
    }
}
