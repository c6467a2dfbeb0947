//! # yaml-tree
//!
//! Load YAML streams into plain document values and write them back out.
//!
//! Loading drives a `yaml-rust2` event parser into a [`DocumentBuilder`],
//! which resolves scalar types (integer, float, boolean, null, string),
//! copies aliased nodes, and collects one [`Value`] per document. Emitting
//! walks a [`Value`] with a [`DocumentEmitter`] and writes the resulting
//! events as block-style YAML.
//!
//! ## Design
//!
//! Values are owned trees with no shared nodes. An alias resolves to a copy
//! of its anchor's value at the point the alias appears, so a collection
//! that aliases itself is unrolled exactly once instead of forming a cycle.
//! Mapping keys keep their insertion order through load and emit.
//!
//! ## Example
//!
//! ```rust
//! use yaml_tree::{emit, load, Value};
//!
//! let content = r#"
//! bill-to: &address
//!   given: Chris
//!   family: Dumars
//! ship-to: *address
//! "#;
//!
//! let doc = load(content).unwrap();
//! assert_eq!(doc["bill-to"], doc["ship-to"]);
//! assert_eq!(doc["ship-to"]["given"].as_str(), Some("Chris"));
//!
//! let text = emit(&doc).unwrap();
//! assert_eq!(load(&text).unwrap(), doc);
//! ```

mod anchors;
mod builder;
mod emitter;
mod error;
mod options;
mod parser;
mod resolver;
mod source_info;
mod value;
mod writer;

pub use builder::{DocumentBuilder, Flow};
pub use emitter::{DocumentEmitter, Emitter, emit, emit_multiple};
pub use error::{Error, Result};
pub use options::{AnchorScope, EmitOptions, LoadOptions};
pub use parser::{Loader, load, load_file, load_multiple, load_reader, load_slice};
pub use resolver::{canonical_text, plain_is_faithful, resolve, resolve_bytes};
pub use source_info::SourceInfo;
pub use value::{Mapping, Value};
pub use writer::{BlockWriter, EventSink};
