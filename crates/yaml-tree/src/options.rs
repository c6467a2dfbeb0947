//! Loader and emitter configuration.
//!
//! Both option structs deserialize with defaults for every missing field, so
//! host applications can embed them in their own configuration files.

use serde::{Deserialize, Serialize};

/// Which aliases may see an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorScope {
    /// Anchors are forgotten at the end of each document.
    #[default]
    Document,

    /// Completed anchors stay visible to later documents of the same stream.
    ///
    /// This is an extension: standard YAML scopes anchors to one document.
    Stream,
}

/// Options for loading YAML text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoadOptions {
    /// Anchor visibility across documents.
    pub anchor_scope: AnchorScope,

    /// Filename reported in error locations.
    pub filename: Option<String>,
}

impl LoadOptions {
    pub fn with_anchor_scope(mut self, scope: AnchorScope) -> Self {
        self.anchor_scope = scope;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Options for writing YAML text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EmitOptions {
    /// Spaces per nesting level. Values below 1 are treated as 1.
    pub indent: usize,

    /// Write `---` before every document, not only between documents.
    pub explicit_document_start: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            explicit_document_start: false,
        }
    }
}

impl EmitOptions {
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_explicit_document_start(mut self, explicit: bool) -> Self {
        self.explicit_document_start = explicit;
        self
    }

    pub(crate) fn effective_indent(&self) -> usize {
        self.indent.max(1)
    }
}
