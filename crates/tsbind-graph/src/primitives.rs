//! Primitive type classification.
//!
//! A primitive is any name that maps onto a target scalar: the TypeScript
//! keyword types, their boxed counterparts, and the host scalars the DOM
//! declarations use for timestamps. Primitive names never resolve to a
//! declaration, so the dependency builder short-circuits on them.

use serde::{Deserialize, Serialize};

/// Target-agnostic scalar representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    BigInt,
    /// Milliseconds since the Unix epoch (`DOMTimeStamp`, `EpochTimeStamp`).
    Timestamp,
    Date,
    Void,
    Any,
    Object,
    Unknown,
}

impl ScalarKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
            ScalarKind::BigInt => "bigint",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Date => "date",
            ScalarKind::Void => "void",
            ScalarKind::Any => "any",
            ScalarKind::Object => "object",
            ScalarKind::Unknown => "unknown",
        }
    }
}

pub struct Primitives;

impl Primitives {
    pub fn is_primitive_type(name: &str) -> bool {
        Self::map_primitive_type(name).is_some()
    }

    /// Scalar for a primitive type name. Array suffixes are not stripped here;
    /// `string[]` is not a primitive name.
    pub fn map_primitive_type(name: &str) -> Option<ScalarKind> {
        let scalar = match name.trim() {
            "string" | "String" | "DOMString" | "USVString" | "ByteString" => ScalarKind::String,
            "number" | "Number" | "DOMHighResTimeStamp" => ScalarKind::Number,
            "boolean" | "Boolean" | "true" | "false" => ScalarKind::Boolean,
            "bigint" | "BigInt" => ScalarKind::BigInt,
            "DOMTimeStamp" | "EpochTimeStamp" => ScalarKind::Timestamp,
            "Date" => ScalarKind::Date,
            "void" | "undefined" | "null" | "never" => ScalarKind::Void,
            "any" | "Function" | "symbol" | "Symbol" => ScalarKind::Any,
            "object" | "Object" | "{}" => ScalarKind::Object,
            "unknown" => ScalarKind::Unknown,
            _ => return None,
        };
        Some(scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_types_are_primitive() {
        for name in ["string", "number", "boolean", "bigint", "void", "any", "unknown", "object"] {
            assert!(Primitives::is_primitive_type(name), "{name} should be primitive");
        }
    }

    #[test]
    fn host_timestamps_map_to_timestamp() {
        assert_eq!(
            Primitives::map_primitive_type("EpochTimeStamp"),
            Some(ScalarKind::Timestamp)
        );
        assert_eq!(
            Primitives::map_primitive_type("DOMTimeStamp"),
            Some(ScalarKind::Timestamp)
        );
        assert_eq!(
            Primitives::map_primitive_type("DOMHighResTimeStamp"),
            Some(ScalarKind::Number)
        );
    }

    #[test]
    fn declared_names_are_not_primitive() {
        assert!(!Primitives::is_primitive_type("Geolocation"));
        assert!(!Primitives::is_primitive_type("string[]"));
        assert!(!Primitives::is_primitive_type("Promise<void>"));
    }
}
