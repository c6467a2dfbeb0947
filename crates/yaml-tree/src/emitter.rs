//! Serializing document values back into events and text.

use crate::writer::{BlockWriter, EventSink, MAX_DEPTH};
use crate::{EmitOptions, Error, Result, Value, canonical_text, plain_is_faithful};
use yaml_rust2::parser::Event;
use yaml_rust2::scanner::TScalarStyle;

/// Serialize one document to block-style YAML text.
///
/// # Example
///
/// ```rust
/// use yaml_tree::{emit, Value};
///
/// let text = emit(&Value::from(vec!["foo", "bar"])).unwrap();
/// assert_eq!(text, "- foo\n- bar\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::EmitError`](crate::Error::EmitError) if the writer fails
/// or collections are nested deeper than 512 levels.
pub fn emit(value: &Value) -> Result<String> {
    Emitter::default().emit(value)
}

/// Serialize several documents into one stream.
///
/// # Errors
///
/// Returns [`Error::EmitError`](crate::Error::EmitError) if the writer fails
/// or collections are nested deeper than 512 levels.
pub fn emit_multiple(values: &[Value]) -> Result<String> {
    Emitter::default().emit_multiple(values)
}

/// Emits YAML text with non-default [`EmitOptions`].
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    options: EmitOptions,
}

impl Emitter {
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    /// Serialize one document. See [`emit`].
    pub fn emit(&self, value: &Value) -> Result<String> {
        self.emit_multiple(std::slice::from_ref(value))
    }

    /// Serialize several documents. See [`emit_multiple`].
    pub fn emit_multiple(&self, values: &[Value]) -> Result<String> {
        let mut output = String::new();
        self.emit_to(values, &mut output)?;
        Ok(output)
    }

    /// Serialize documents into any `fmt::Write` target.
    pub fn emit_to<W: std::fmt::Write>(&self, values: &[Value], out: W) -> Result<()> {
        let mut writer = BlockWriter::new(out, self.options.clone());
        DocumentEmitter::new(&mut writer).emit_documents(values)?;
        tracing::debug!(documents = values.len(), "emitted YAML stream");
        Ok(())
    }
}

/// Walks values depth-first and feeds the matching events to a sink.
///
/// The walk fails only on collections nested deeper than 512 levels;
/// every other error comes from the sink.
///
/// # Example
///
/// ```rust
/// use yaml_tree::{DocumentEmitter, Value};
/// use yaml_rust2::parser::Event;
/// use yaml_rust2::scanner::TScalarStyle;
///
/// let mut events: Vec<Event> = Vec::new();
/// DocumentEmitter::new(&mut events).emit_document(&Value::Null).unwrap();
/// assert_eq!(
///     events[2],
///     Event::Scalar("null".into(), TScalarStyle::Plain, 0, None)
/// );
/// ```
pub struct DocumentEmitter<'s, S: EventSink + ?Sized> {
    sink: &'s mut S,
}

impl<'s, S: EventSink + ?Sized> DocumentEmitter<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self { sink }
    }

    /// Emit a stream holding a single document.
    pub fn emit_document(&mut self, value: &Value) -> Result<()> {
        self.emit_documents(std::slice::from_ref(value))
    }

    /// Emit a stream holding one document per value.
    pub fn emit_documents(&mut self, values: &[Value]) -> Result<()> {
        self.sink.on_event(Event::StreamStart)?;
        for value in values {
            self.sink.on_event(Event::DocumentStart)?;
            self.emit_value(value, 0)?;
            self.sink.on_event(Event::DocumentEnd)?;
        }
        self.sink.on_event(Event::StreamEnd)
    }

    fn emit_value(&mut self, value: &Value, depth: usize) -> Result<()> {
        if depth >= MAX_DEPTH && matches!(value, Value::Array(_) | Value::Dictionary(_)) {
            return Err(Error::EmitError {
                message: format!("value nested deeper than {} levels", MAX_DEPTH),
            });
        }
        match value {
            Value::Array(items) => {
                self.sink.on_event(Event::SequenceStart(0, None))?;
                for item in items {
                    self.emit_value(item, depth + 1)?;
                }
                self.sink.on_event(Event::SequenceEnd)
            }
            Value::Dictionary(map) => {
                self.sink.on_event(Event::MappingStart(0, None))?;
                for (key, value) in map {
                    self.emit_value(key, depth + 1)?;
                    self.emit_value(value, depth + 1)?;
                }
                self.sink.on_event(Event::MappingEnd)
            }
            Value::String(text) => {
                // A string that reads back as another type must be quoted.
                let style = if plain_is_faithful(text) {
                    TScalarStyle::Plain
                } else {
                    TScalarStyle::DoubleQuoted
                };
                self.sink
                    .on_event(Event::Scalar(text.clone(), style, 0, None))
            }
            scalar => {
                let text = canonical_text(scalar).unwrap_or_default();
                self.sink
                    .on_event(Event::Scalar(text, TScalarStyle::Plain, 0, None))
            }
        }
    }
}
