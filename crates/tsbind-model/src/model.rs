//! Target-agnostic semantic object model.
//!
//! Everything here is plain data: no arena indices or parser back-references
//! survive reduction, so a model can be serialized, cached or handed to a code
//! generator for any target language.

use crate::member_map::{MemberMap, MemberName};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tsbind_graph::{DeclarationKind, ScalarKind};

/// How a declared type maps onto a target: a host scalar, or a named type the
/// generator emits itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum MappedType {
    Scalar(ScalarKind),
    Named(String),
}

impl MappedType {
    pub fn is_scalar(&self) -> bool {
        matches!(self, MappedType::Scalar(_))
    }

    pub fn name(&self) -> &str {
        match self {
            MappedType::Scalar(kind) => kind.as_str(),
            MappedType::Named(name) => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyModel {
    pub name: String,
    /// Declared type text with `null` / `undefined` members removed.
    pub raw_type: String,
    pub mapped_type: MappedType,
    pub is_nullable: bool,
    pub is_array: bool,
    pub is_readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl MemberName for PropertyModel {
    fn member_name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterModel {
    pub name: String,
    pub raw_type: String,
    pub mapped_type: MappedType,
    pub is_nullable: bool,
    pub is_array: bool,
    pub is_rest: bool,
    /// Set when the parameter is a callback whose type has a single call signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodModel {
    pub name: String,
    pub raw_return_type: String,
    pub mapped_return_type: MappedType,
    pub is_async: bool,
    pub is_void: bool,
    pub is_return_nullable: bool,
    pub parameters: Vec<ParameterModel>,
    /// At least one parameter is a callback the target must be able to invoke.
    pub is_bidirectional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl MemberName for MethodModel {
    fn member_name(&self) -> &str {
        &self.name
    }
}

impl MethodModel {
    pub fn parameter(&self, name: &str) -> Option<&ParameterModel> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// The single call signature of a callable interface or function type alias.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSignatureModel {
    pub parameters: Vec<ParameterModel>,
    pub raw_return_type: String,
    pub mapped_return_type: MappedType,
    pub is_async: bool,
    pub is_void: bool,
    pub is_return_nullable: bool,
}

/// A callback parameter's type reduced to its call signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub identifier: String,
    pub parameters: Vec<ParameterModel>,
    pub return_type: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependent_types: IndexMap<String, ObjectModel>,
}

/// One member of a string-literal union.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    /// Symbolic name (`"landscape-primary"` -> `LandscapePrimary`).
    pub name: String,
    pub raw_value: String,
}

/// Symbolic names for the literal members of a string union, keyed by raw
/// value in declaration order. Repeated values are kept once; names that
/// collide get a `_2`, `_3`, ... suffix.
pub fn enum_values<'a>(values: impl IntoIterator<Item = &'a str>) -> IndexMap<String, EnumValue> {
    let mut out: IndexMap<String, EnumValue> = IndexMap::new();
    let mut used: IndexSet<String> = IndexSet::new();
    for (position, raw_value) in values.into_iter().enumerate() {
        if out.contains_key(raw_value) {
            continue;
        }
        let base = enum_symbol_name(raw_value, position + 1);
        let mut name = base.clone();
        let mut suffix = 2;
        while used.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        used.insert(name.clone());
        out.insert(
            raw_value.to_string(),
            EnumValue {
                name,
                raw_value: raw_value.to_string(),
            },
        );
    }
    out
}

/// PascalCase of the alphanumeric segments of `value`, prefixed with `_` when
/// it would start with a digit. The empty string becomes `Empty`; any other
/// value without alphanumerics becomes `Value<position>`.
pub fn enum_symbol_name(value: &str, position: usize) -> String {
    if value.is_empty() {
        return "Empty".to_string();
    }
    let mut name = String::with_capacity(value.len());
    for segment in value.split(|c: char| !c.is_alphanumeric()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    if name.is_empty() {
        return format!("Value{position}");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// A reduced interface or type alias and the types it depends on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectModel {
    pub type_name: String,
    pub kind: DeclarationKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "MemberMap::is_empty")]
    pub properties: MemberMap<PropertyModel>,
    #[serde(default, skip_serializing_if = "MemberMap::is_empty")]
    pub methods: MemberMap<MethodModel>,
    /// Keyed by raw literal value.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub enum_values: IndexMap<String, EnumValue>,
    /// Named members of a union / intersection alias.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub composed_of: Vec<String>,
    /// Element of an array alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_signature: Option<CallSignatureModel>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependent_types: IndexMap<String, ObjectModel>,
}

impl ObjectModel {
    pub fn new(type_name: impl Into<String>, kind: DeclarationKind) -> ObjectModel {
        ObjectModel {
            type_name: type_name.into(),
            kind,
            extends: Vec::new(),
            documentation: None,
            properties: MemberMap::new(),
            methods: MemberMap::new(),
            enum_values: IndexMap::new(),
            composed_of: Vec::new(),
            element_type: None,
            call_signature: None,
            dependent_types: IndexMap::new(),
        }
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    pub fn is_action(&self) -> bool {
        self.call_signature.is_some()
    }

    /// This type's name followed by every type it transitively depends on,
    /// including the types reachable through callback actions.
    pub fn all_dependent_types(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        self.collect_dependent_types(&mut out);
        out
    }

    // Models are owned trees, so the walk terminates without a visited set.
    fn collect_dependent_types(&self, out: &mut IndexSet<String>) {
        out.insert(self.type_name.clone());
        for method in self.methods.iter() {
            collect_action_types(&method.parameters, out);
        }
        if let Some(signature) = &self.call_signature {
            collect_action_types(&signature.parameters, out);
        }
        for dependent in self.dependent_types.values() {
            dependent.collect_dependent_types(out);
        }
    }
}

fn collect_action_types(parameters: &[ParameterModel], out: &mut IndexSet<String>) {
    for action in parameters.iter().filter_map(|p| p.action.as_ref()) {
        out.insert(action.identifier.clone());
        for dependent in action.dependent_types.values() {
            dependent.collect_dependent_types(out);
        }
    }
}

/// The root of a reduction: members in declaration order, duplicates kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelObject {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub methods: Vec<MethodModel>,
    pub properties: Vec<PropertyModel>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependent_types: IndexMap<String, ObjectModel>,
}

impl TopLevelObject {
    pub fn new(type_name: impl Into<String>) -> TopLevelObject {
        TopLevelObject {
            type_name: type_name.into(),
            documentation: None,
            methods: Vec::new(),
            properties: Vec::new(),
            dependent_types: IndexMap::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodModel> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Every type name reachable from the root, starting with the root itself.
    pub fn all_dependent_types(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        out.insert(self.type_name.clone());
        for method in &self.methods {
            collect_action_types(&method.parameters, &mut out);
        }
        for dependent in self.dependent_types.values() {
            dependent.collect_dependent_types(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{enum_symbol_name, enum_values};

    #[test]
    fn enum_symbols_are_pascal_case() {
        assert_eq!(enum_symbol_name("up", 1), "Up");
        assert_eq!(enum_symbol_name("landscape-primary", 1), "LandscapePrimary");
        assert_eq!(enum_symbol_name("no cors", 1), "NoCors");
        assert_eq!(enum_symbol_name("webgl2", 1), "Webgl2");
    }

    #[test]
    fn enum_symbols_handle_digits_and_empty() {
        assert_eq!(enum_symbol_name("2d", 1), "_2d");
        assert_eq!(enum_symbol_name("", 3), "Empty");
        assert_eq!(enum_symbol_name("--", 3), "Value3");
    }

    #[test]
    fn colliding_symbols_get_numeric_suffixes() {
        let values = enum_values(["a-b", "a_b", "aB", "a-b"]);
        let names: Vec<&str> = values.values().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["AB", "AB_2", "AB_3"]);
        assert_eq!(values["a_b"].name, "AB_2");
    }
}
