//! Loading YAML text into document values.

use crate::builder::{DocumentBuilder, Flow};
use crate::{Error, LoadOptions, Result, SourceInfo, Value};
use std::io::Read;
use yaml_rust2::parser::Parser;

/// Load the first document of a YAML stream.
///
/// Returns `Value::Null` if the stream contains no document. Later documents
/// are still parsed, and an error in any of them fails the call.
///
/// # Example
///
/// ```rust
/// use yaml_tree::{load, Value};
///
/// let value = load("price: 9.99").unwrap();
/// assert_eq!(value["price"], Value::Double(9.99));
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or an alias cannot be resolved.
pub fn load(content: &str) -> Result<Value> {
    Loader::default().load(content)
}

/// Load every document of a YAML stream, in order.
///
/// # Example
///
/// ```rust
/// use yaml_tree::{load_multiple, Value};
///
/// let docs = load_multiple("--- 1\n--- two\n").unwrap();
/// assert_eq!(docs, vec![Value::Int(1), Value::from("two")]);
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or an alias cannot be resolved.
pub fn load_multiple(content: &str) -> Result<Vec<Value>> {
    Loader::default().load_multiple(content)
}

/// Load the first document, reporting `filename` in error locations.
///
/// # Errors
///
/// Returns an error if the YAML is invalid or an alias cannot be resolved.
pub fn load_file(content: &str, filename: &str) -> Result<Value> {
    Loader::new(LoadOptions::default().with_filename(filename)).load(content)
}

/// Load every document from raw bytes.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] if the bytes are not valid UTF-8, and
/// otherwise the same errors as [`load_multiple`].
pub fn load_slice(bytes: &[u8]) -> Result<Vec<Value>> {
    Loader::default().load_slice(bytes)
}

/// Load every document from a reader.
///
/// # Errors
///
/// Returns [`Error::EngineInitError`] if the input cannot be read, and
/// otherwise the same errors as [`load_slice`].
pub fn load_reader<R: Read>(reader: R) -> Result<Vec<Value>> {
    Loader::default().load_reader(reader)
}

/// Loads YAML with non-default [`LoadOptions`].
///
/// Each call builds its own event parser and document builder; nothing is
/// shared between calls.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load the first document. See [`load`].
    pub fn load(&self, content: &str) -> Result<Value> {
        let documents = self.load_multiple(content)?;
        Ok(documents.into_iter().next().unwrap_or(Value::Null))
    }

    /// Load every document. See [`load_multiple`].
    pub fn load_multiple(&self, content: &str) -> Result<Vec<Value>> {
        let result = self.load_impl(content);
        match &self.options.filename {
            Some(filename) => result.map_err(|err| err.with_file(filename)),
            None => result,
        }
    }

    /// Load every document from raw bytes. See [`load_slice`].
    pub fn load_slice(&self, bytes: &[u8]) -> Result<Vec<Value>> {
        let content = std::str::from_utf8(bytes)?;
        self.load_multiple(content)
    }

    /// Load every document from a reader. See [`load_reader`].
    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<Vec<Value>> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|err| Error::EngineInitError {
                message: format!("failed to read YAML input: {}", err),
            })?;
        self.load_slice(&bytes)
    }

    fn load_impl(&self, content: &str) -> Result<Vec<Value>> {
        let mut parser = Parser::new_from_str(content);
        let mut builder = DocumentBuilder::new(self.options.anchor_scope);

        loop {
            let (event, marker) = parser.next_token()?;
            let flow = builder
                .on_event(event)
                .map_err(|err| err.or_location(SourceInfo::from_marker(&marker)))?;
            if flow == Flow::Done {
                break;
            }
        }

        let documents = builder.into_documents()?;
        tracing::debug!(documents = documents.len(), "loaded YAML stream");
        Ok(documents)
    }
}
