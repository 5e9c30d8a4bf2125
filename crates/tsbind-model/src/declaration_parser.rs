//! One-call entry point: build a type's dependency graph and reduce it.

use crate::model::{ObjectModel, TopLevelObject};
use crate::reducer::{ReduceError, Reducer, ReducerOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use tsbind_common::Diagnostic;
use tsbind_graph::{
    BuilderOptions, DeclarationSource, Dependency, DependencyCache, DependencyMapBuilder,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParserResultStatus {
    #[default]
    Unknown,
    SuccessfullyParsed,
    TargetTypeNotFound,
    ErrorParsing,
}

/// Outcome of parsing one target type. Never an `Err`: failures are reported
/// through `status` and `error`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserResult<T> {
    pub status: ParserResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Parse diagnostics of every declaration in the graph.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for ParserResult<T> {
    fn default() -> Self {
        ParserResult {
            status: ParserResultStatus::Unknown,
            value: None,
            error: None,
            diagnostics: Vec::new(),
        }
    }
}

impl<T> ParserResult<T> {
    pub fn not_found() -> ParserResult<T> {
        ParserResult {
            status: ParserResultStatus::TargetTypeNotFound,
            ..ParserResult::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ParserResultStatus::SuccessfullyParsed
    }
}

/// Resolves target types against a declaration source and reduces them.
///
/// The dependency cache is shared through an `Arc` so several parsers over the
/// same corpus can reuse each other's builds.
pub struct TypeDeclarationParser<S> {
    source: S,
    cache: Arc<DependencyCache>,
    builder_options: BuilderOptions,
    reducer: Reducer,
}

impl<S: DeclarationSource> TypeDeclarationParser<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, Arc::new(DependencyCache::new()))
    }

    pub fn with_cache(source: S, cache: Arc<DependencyCache>) -> Self {
        TypeDeclarationParser {
            source,
            cache,
            builder_options: BuilderOptions::default(),
            reducer: Reducer::default(),
        }
    }

    pub fn with_builder_options(mut self, options: BuilderOptions) -> Self {
        self.builder_options = options;
        self
    }

    pub fn with_reducer_options(mut self, options: ReducerOptions) -> Self {
        self.reducer = Reducer::new(options);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &Arc<DependencyCache> {
        &self.cache
    }

    /// Dependency graph of `type_name`, built or taken from the cache.
    pub fn build(&self, type_name: &str) -> Option<Arc<Dependency>> {
        DependencyMapBuilder::new(&self.source, &self.cache)
            .with_options(self.builder_options.clone())
            .build(type_name)
    }

    /// Reduce `type_name` into a top-level object: members in declaration
    /// order plus every dependent type.
    pub fn parse_target_type(&self, type_name: &str) -> ParserResult<TopLevelObject> {
        self.parse_with(type_name, |reducer, root| reducer.reduce_top_level(root))
    }

    /// Reduce `type_name` into an object model.
    pub fn parse_object(&self, type_name: &str) -> ParserResult<ObjectModel> {
        self.parse_with(type_name, |reducer, root| reducer.reduce(root))
    }

    fn parse_with<T>(
        &self,
        type_name: &str,
        reduce: impl FnOnce(&Reducer, &Dependency) -> Result<T, ReduceError>,
    ) -> ParserResult<T> {
        let Some(root) = self.build(type_name) else {
            debug!(type_name, "target type not found");
            return ParserResult::not_found();
        };

        let diagnostics: Vec<Diagnostic> = root
            .flatten()
            .values()
            .flat_map(|declaration| declaration.diagnostics().iter().cloned())
            .collect();

        match reduce(&self.reducer, &root) {
            Ok(value) => ParserResult {
                status: ParserResultStatus::SuccessfullyParsed,
                value: Some(value),
                error: None,
                diagnostics,
            },
            Err(err) => {
                warn!(type_name, error = %err, "failed to reduce target type");
                ParserResult {
                    status: ParserResultStatus::ErrorParsing,
                    value: None,
                    error: Some(err.to_string()),
                    diagnostics,
                }
            }
        }
    }
}
