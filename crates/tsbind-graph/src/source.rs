//! Resolved declarations and the lookup trait the builder consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tsbind_common::Diagnostic;
use tsbind_parser::{NodeArena, NodeIndex, syntax_kind_ext};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
}

impl DeclarationKind {
    /// Kind of a parsed declaration node, if it is an interface or type alias.
    pub fn of_node(kind: u16) -> Option<DeclarationKind> {
        match kind {
            syntax_kind_ext::INTERFACE_DECLARATION => Some(DeclarationKind::Interface),
            syntax_kind_ext::TYPE_ALIAS_DECLARATION => Some(DeclarationKind::TypeAlias),
            _ => None,
        }
    }
}

/// One parsed block of a declaration. Interfaces may be declared in several
/// blocks (`interface Foo {}` repeated), each parsed into its own arena.
pub struct DeclarationPart {
    file_name: String,
    source: Arc<str>,
    arena: NodeArena,
    node: NodeIndex,
}

impl DeclarationPart {
    pub fn new(
        file_name: impl Into<String>,
        source: Arc<str>,
        arena: NodeArena,
        node: NodeIndex,
    ) -> DeclarationPart {
        DeclarationPart {
            file_name: file_name.into(),
            source,
            arena,
            node,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// The interface or type-alias node.
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    /// Trimmed source text of a node in this part.
    pub fn text(&self, index: NodeIndex) -> &str {
        self.arena.node_text(index, &self.source).trim()
    }
}

struct DeclarationData {
    name: String,
    kind: DeclarationKind,
    parts: Vec<DeclarationPart>,
    diagnostics: Vec<Diagnostic>,
}

/// A named interface or type alias resolved from the corpus.
///
/// Cheap to clone; clones share the parsed parts. Two declarations are equal
/// only when they are the same resolved instance.
#[derive(Clone)]
pub struct Declaration {
    data: Arc<DeclarationData>,
}

impl Declaration {
    pub fn new(
        name: impl Into<String>,
        kind: DeclarationKind,
        parts: Vec<DeclarationPart>,
        diagnostics: Vec<Diagnostic>,
    ) -> Declaration {
        Declaration {
            data: Arc::new(DeclarationData {
                name: name.into(),
                kind,
                parts,
                diagnostics,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.data.kind
    }

    /// Parsed blocks in corpus order.
    pub fn parts(&self) -> &[DeclarationPart] {
        &self.data.parts
    }

    pub fn primary(&self) -> Option<&DeclarationPart> {
        self.data.parts.first()
    }

    /// Parse diagnostics for every block of this declaration.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.data.diagnostics
    }

    pub fn ptr_eq(&self, other: &Declaration) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Declaration) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Declaration {}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declaration")
            .field("name", &self.data.name)
            .field("kind", &self.data.kind)
            .field("parts", &self.data.parts.len())
            .field("diagnostics", &self.data.diagnostics.len())
            .finish()
    }
}

/// Lookup of declarations by name.
///
/// Implementations must return the same declaration (or none) for a given
/// name across calls.
pub trait DeclarationSource: Send + Sync {
    fn try_get_interface(&self, name: &str) -> Option<Declaration>;

    fn try_get_type_alias(&self, name: &str) -> Option<Declaration>;
}

impl<S: DeclarationSource + ?Sized> DeclarationSource for &S {
    fn try_get_interface(&self, name: &str) -> Option<Declaration> {
        (**self).try_get_interface(name)
    }

    fn try_get_type_alias(&self, name: &str) -> Option<Declaration> {
        (**self).try_get_type_alias(name)
    }
}

impl<S: DeclarationSource + ?Sized> DeclarationSource for Arc<S> {
    fn try_get_interface(&self, name: &str) -> Option<Declaration> {
        (**self).try_get_interface(name)
    }

    fn try_get_type_alias(&self, name: &str) -> Option<Declaration> {
        (**self).try_get_type_alias(name)
    }
}
