//! Parsing rule helpers
//!
//! Small token-level predicates shared by the statement and type parsers.
//! Parsing itself lives on `ParserState` (see `state_statements.rs` and
//! `state_types.rs`); these helpers only answer "what comes next" questions
//! without consuming input.

mod utils;

pub use utils::{is_type_member_name_start, look_ahead_is, look_ahead_is_declaration_start};
