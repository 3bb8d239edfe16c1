//! JSON helpers for lookup tables.
//!
//! Serde already derives the encoding. These helpers keep formatting stable
//! and map failures onto [`LookupError`]. Dirty flags are not part of the
//! encoding, so a decoded table is always clean.

use crate::error::{LookupError, LookupResult};
use crate::table::LookupTable;

/// Serialize a table to pretty JSON.
pub fn to_json_pretty(table: &LookupTable) -> LookupResult<String> {
    serde_json::to_string_pretty(table)
        .map_err(|e| LookupError::serialization(format!("serialize table: {e}")))
}

/// Deserialize a table from JSON.
///
/// Callers should then invoke `table.validate()` before using it.
pub fn from_json(s: &str) -> LookupResult<LookupTable> {
    serde_json::from_str::<LookupTable>(s)
        .map_err(|e| LookupError::serialization(format!("deserialize table: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostRef;
    use crate::property::{Property, PropertyKind};

    #[test]
    fn test_json_roundtrip_keeps_order_and_refs() {
        let table = LookupTable::builder()
            .action_name("A1")
            .parameter_ref(HostRef::new())
            .select(HostRef::new())
            .select(HostRef::new())
            .properties(Property::create_from_names(["W", "H", "D"], PropertyKind::Input))
            .build();

        let json = to_json_pretty(&table).unwrap();
        let decoded = from_json(&json).unwrap();
        assert_eq!(decoded, table);
        let names: Vec<&str> = decoded.properties().iter().map(Property::name).collect();
        assert_eq!(names, vec!["W", "H", "D"]);
        assert_eq!(decoded.selection(), table.selection());
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let decoded = from_json(
            r#"{"action_name":"A1","properties":[{"name":"S","display_name":"S","value":"1"}]}"#,
        )
        .unwrap();
        assert!(decoded.validate().is_valid());
        assert_eq!(decoded.properties()[0].kind(), PropertyKind::Input);
        assert!(decoded.parameter_ref().is_none());
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let err = from_json("{").unwrap_err();
        assert!(matches!(err, LookupError::Serialization { .. }));
    }
}
