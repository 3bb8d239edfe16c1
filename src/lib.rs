//! # blocklookup - Lookup tables for dynamic block parameters
//!
//! blocklookup is the data model behind a dynamic block lookup editor: the
//! named input and lookup properties of a block, the tables that map input
//! combinations to output values, the rules that keep those tables
//! consistent, and the dirty/clean lifecycle that tells an editor what must
//! be saved again.
//!
//! ## Core Concepts
//!
//! - **Property**: a named attribute, either an `Input` or a `Lookup` output
//! - **LookupTable**: an ordered set of properties plus host metadata
//! - **ValidationResult**: field-keyed validation messages, never an error
//! - **EditSession**: one editing context that owns a table and notifies observers
//!
//! ## Usage
//!
//! ```rust
//! use blocklookup::{LookupTable, Property, PropertyKind};
//!
//! let table = LookupTable::builder()
//!     .action_name("A1")
//!     .property(
//!         Property::builder()
//!             .name("Size")
//!             .display_name("Size")
//!             .value("10")
//!             .build(),
//!     )
//!     .property(
//!         Property::builder()
//!             .name("Color")
//!             .display_name("Color")
//!             .value("c1")
//!             .display_value("Red")
//!             .kind(PropertyKind::Lookup)
//!             .build(),
//!     )
//!     .build();
//!
//! assert!(table.validate().is_valid());
//! assert!(!table.clone().is_dirty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod error;
pub mod host;
pub mod property;
pub mod serialization;
pub mod session;
pub mod table;
pub mod validation;

// Re-export primary types at crate root for convenience
pub use command::{Command, CommandRegistry};
pub use error::{LookupError, LookupResult};
pub use host::HostRef;
pub use property::{Property, PropertyBuilder, PropertyField, PropertyKind};
pub use serialization::{from_json, to_json_pretty};
pub use session::{ChangeEvent, ChangeObserver, ChannelObserver, EditSession, TableField};
pub use table::{LookupTable, LookupTableBuilder};
pub use validation::{PropertyRule, RuleSet, ValidationConfig, ValidationResult};
