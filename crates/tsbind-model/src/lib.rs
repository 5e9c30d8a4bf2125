//! Semantic object model for tsbind.
//!
//! This crate provides:
//! - `ObjectModel` / `TopLevelObject` - target-agnostic reduced declarations
//! - `MemberMap` - case-insensitive, insertion-ordered member collections
//! - `Reducer` - dependency graph to object model reduction
//! - `TypeDeclarationParser` - build + reduce in one call, reporting a `ParserResult`

pub mod member_map;
pub use member_map::{MemberMap, MemberName};

pub mod model;
pub use model::{
    ActionDescriptor, CallSignatureModel, EnumValue, MappedType, MethodModel, ObjectModel,
    ParameterModel, PropertyModel, TopLevelObject, enum_symbol_name, enum_values,
};

mod shape;

pub mod reducer;
pub use reducer::{ReduceError, Reducer, ReducerOptions, reduce, reduce_top_level};

pub mod declaration_parser;
pub use declaration_parser::{ParserResult, ParserResultStatus, TypeDeclarationParser};

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod reducer_tests;

#[cfg(test)]
#[path = "../tests/declaration_parser_tests.rs"]
mod declaration_parser_tests;
