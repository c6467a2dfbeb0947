//! Builder that turns a yaml-rust2 event stream into document values.
//!
//! Open collections live on an explicit frame stack. A finished node (a
//! scalar, an alias copy, or a collection whose end event arrived) is handed
//! to the frame on top of the stack, or becomes the document root when no
//! frame is open.

use crate::anchors::{AnchorId, AnchorRegistry, AnchorSlot};
use crate::{AnchorScope, Error, Mapping, Result, Value, resolve};
use yaml_rust2::parser::Event;

/// Whether the builder wants more events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// `StreamEnd` was seen; the documents are ready.
    Done,
}

/// A collection being constructed.
#[derive(Debug)]
enum Frame {
    Mapping {
        entries: Mapping,
        /// Key waiting for its value. `None` means the next node is a key.
        pending_key: Option<Value>,
        anchor: AnchorId,
    },
    Sequence {
        items: Vec<Value>,
        anchor: AnchorId,
    },
}

impl Frame {
    fn name(&self) -> &'static str {
        match self {
            Frame::Mapping { .. } => "mapping",
            Frame::Sequence { .. } => "sequence",
        }
    }

    /// Copy of the value accumulated so far. A key still waiting for its
    /// value is not part of it.
    fn snapshot(&self) -> Value {
        match self {
            Frame::Mapping { entries, .. } => Value::Dictionary(entries.clone()),
            Frame::Sequence { items, .. } => Value::Array(items.clone()),
        }
    }
}

/// Consumes events and collects one [`Value`] per document.
///
/// Any invalid transition is fatal: the builder reports it and the caller is
/// expected to drop the builder, discarding all partial work.
///
/// # Example
///
/// ```rust
/// use yaml_tree::{AnchorScope, DocumentBuilder, Flow, Value};
/// use yaml_rust2::parser::Event;
/// use yaml_rust2::scanner::TScalarStyle;
///
/// let mut builder = DocumentBuilder::new(AnchorScope::Document);
/// for event in [
///     Event::StreamStart,
///     Event::DocumentStart,
///     Event::Scalar("42".into(), TScalarStyle::Plain, 0, None),
///     Event::DocumentEnd,
/// ] {
///     assert_eq!(builder.on_event(event).unwrap(), Flow::Continue);
/// }
/// assert_eq!(builder.on_event(Event::StreamEnd).unwrap(), Flow::Done);
/// assert_eq!(builder.into_documents().unwrap(), vec![Value::Int(42)]);
/// ```
#[derive(Debug)]
pub struct DocumentBuilder {
    /// Collections opened and not yet closed, innermost last.
    stack: Vec<Frame>,

    anchors: AnchorRegistry,

    /// Root of the document in progress.
    root: Option<Value>,

    /// Finished documents, in stream order.
    documents: Vec<Value>,

    in_document: bool,
    finished: bool,
}

impl DocumentBuilder {
    pub fn new(anchor_scope: AnchorScope) -> Self {
        Self {
            stack: Vec::new(),
            anchors: AnchorRegistry::new(anchor_scope),
            root: None,
            documents: Vec::new(),
            in_document: false,
            finished: false,
        }
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// - [`Error::ParseError`] for a transition the current state does not allow
    /// - [`Error::AnchorNotFound`] for an alias whose anchor is not visible
    /// - [`Error::UnsupportedEvent`] for events with no transition at all
    pub fn on_event(&mut self, event: Event) -> Result<Flow> {
        tracing::trace!(?event, depth = self.stack.len(), "builder event");

        if self.finished {
            return Err(Error::parse("event after end of stream", None));
        }

        match event {
            Event::StreamStart => {}

            Event::StreamEnd => {
                if self.in_document {
                    return Err(Error::parse("stream ended inside a document", None));
                }
                self.finished = true;
                return Ok(Flow::Done);
            }

            Event::DocumentStart => {
                if self.in_document {
                    return Err(Error::parse("document started inside another document", None));
                }
                self.in_document = true;
            }

            Event::DocumentEnd => self.end_document()?,

            Event::MappingStart(anchor, _tag) => self.open(Frame::Mapping {
                entries: Mapping::new(),
                pending_key: None,
                anchor,
            })?,

            Event::SequenceStart(anchor, _tag) => self.open(Frame::Sequence {
                items: Vec::new(),
                anchor,
            })?,

            Event::MappingEnd => self.close("mapping")?,

            Event::SequenceEnd => self.close("sequence")?,

            Event::Scalar(text, style, anchor, tag) => {
                let value = resolve(&text, tag.as_ref(), style);
                self.anchors.register_complete(anchor, &value);
                self.push_complete(value)?;
            }

            Event::Alias(anchor) => {
                let value = self.resolve_alias(anchor)?;
                self.push_complete(value)?;
            }

            other => {
                return Err(Error::UnsupportedEvent {
                    event: format!("{:?}", other),
                });
            }
        }

        Ok(Flow::Continue)
    }

    /// Finished documents, in stream order.
    ///
    /// # Errors
    ///
    /// Returns an error if `StreamEnd` has not been seen yet.
    pub fn into_documents(self) -> Result<Vec<Value>> {
        if !self.finished {
            return Err(Error::parse("unexpected end of event stream", None));
        }
        Ok(self.documents)
    }

    fn open(&mut self, frame: Frame) -> Result<()> {
        self.require_document(frame.name())?;
        let anchor = match &frame {
            Frame::Mapping { anchor, .. } | Frame::Sequence { anchor, .. } => *anchor,
        };
        self.stack.push(frame);
        self.anchors.register_open(anchor, self.stack.len() - 1);
        Ok(())
    }

    fn close(&mut self, expected: &'static str) -> Result<()> {
        let frame = self.stack.pop().ok_or_else(|| {
            Error::parse(format!("end of {} without a matching start", expected), None)
        })?;

        let (value, anchor) = match frame {
            Frame::Mapping {
                entries,
                pending_key,
                anchor,
            } if expected == "mapping" => {
                if pending_key.is_some() {
                    return Err(Error::parse("mapping ended while a key awaited its value", None));
                }
                (Value::Dictionary(entries), anchor)
            }
            Frame::Sequence { items, anchor } if expected == "sequence" => {
                (Value::Array(items), anchor)
            }
            other => {
                return Err(Error::parse(
                    format!("end of {} while a {} is open", expected, other.name()),
                    None,
                ));
            }
        };

        self.anchors.register_complete(anchor, &value);
        self.push_complete(value)
    }

    /// Deliver a finished node to its container.
    fn push_complete(&mut self, value: Value) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Sequence { items, .. }) => items.push(value),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                None => *pending_key = Some(value),
                Some(key) => {
                    // Duplicate keys: the last value wins, at the first position.
                    entries.insert(key, value);
                }
            },
            None => {
                self.require_document("node")?;
                if self.root.is_some() {
                    return Err(Error::parse("more than one root node in a document", None));
                }
                self.root = Some(value);
            }
        }
        Ok(())
    }

    fn resolve_alias(&self, anchor: AnchorId) -> Result<Value> {
        let not_found = || Error::AnchorNotFound {
            anchor: format!("#{}", anchor),
            location: None,
        };
        match self.anchors.lookup(anchor) {
            Some(AnchorSlot::Complete(value)) => Ok(value),
            // Aliasing a collection from inside itself copies what has been
            // built so far, which unrolls the self-reference exactly once.
            Some(AnchorSlot::Open(index)) => self
                .stack
                .get(index)
                .map(Frame::snapshot)
                .ok_or_else(not_found),
            None => Err(not_found()),
        }
    }

    fn end_document(&mut self) -> Result<()> {
        if !self.in_document {
            return Err(Error::parse("end of document without a matching start", None));
        }
        if !self.stack.is_empty() {
            return Err(Error::parse(
                format!("document ended with {} unclosed collection(s)", self.stack.len()),
                None,
            ));
        }

        let root = self.root.take().unwrap_or(Value::Null);
        tracing::debug!(
            document = self.documents.len(),
            kind = root.type_name(),
            anchors = self.anchors.len(),
            "finished document"
        );
        self.documents.push(root);
        self.anchors.end_document();
        self.in_document = false;
        Ok(())
    }

    fn require_document(&self, what: &str) -> Result<()> {
        if self.in_document {
            Ok(())
        } else {
            Err(Error::parse(format!("{} outside of a document", what), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust2::scanner::TScalarStyle;

    fn plain(text: &str) -> Event {
        Event::Scalar(text.to_string(), TScalarStyle::Plain, 0, None)
    }

    fn anchored(text: &str, anchor: AnchorId) -> Event {
        Event::Scalar(text.to_string(), TScalarStyle::Plain, anchor, None)
    }

    fn build(events: Vec<Event>) -> Result<Vec<Value>> {
        build_with_scope(events, AnchorScope::Document)
    }

    fn build_with_scope(events: Vec<Event>, scope: AnchorScope) -> Result<Vec<Value>> {
        let mut builder = DocumentBuilder::new(scope);
        for event in events {
            if builder.on_event(event)? == Flow::Done {
                break;
            }
        }
        builder.into_documents()
    }

    fn document(body: Vec<Event>) -> Vec<Event> {
        let mut events = vec![Event::StreamStart, Event::DocumentStart];
        events.extend(body);
        events.push(Event::DocumentEnd);
        events.push(Event::StreamEnd);
        events
    }

    #[test]
    fn test_scalar_root() {
        let docs = build(document(vec![plain("foo")])).unwrap();
        assert_eq!(docs, vec![Value::from("foo")]);
    }

    #[test]
    fn test_empty_stream() {
        let docs = build(vec![Event::StreamStart, Event::StreamEnd]).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_mapping_with_nested_sequence() {
        let docs = build(document(vec![
            Event::MappingStart(0, None),
            plain("items"),
            Event::SequenceStart(0, None),
            plain("1"),
            plain("two"),
            Event::SequenceEnd,
            plain("done"),
            plain("true"),
            Event::MappingEnd,
        ]))
        .unwrap();

        let expected: Value = [
            ("items", Value::from(vec![Value::Int(1), Value::from("two")])),
            ("done", Value::Bool(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(docs, vec![expected]);
    }

    #[test]
    fn test_collection_as_key() {
        let docs = build(document(vec![
            Event::MappingStart(0, None),
            Event::SequenceStart(0, None),
            plain("a"),
            Event::SequenceEnd,
            plain("v"),
            Event::MappingEnd,
        ]))
        .unwrap();

        let map = docs[0].as_dictionary().unwrap();
        assert_eq!(map.get(&Value::from(vec!["a"])), Some(&Value::from("v")));
    }

    #[test]
    fn test_alias_copies_completed_anchor() {
        let docs = build(document(vec![
            Event::MappingStart(0, None),
            plain("a"),
            Event::SequenceStart(1, None),
            plain("x"),
            Event::SequenceEnd,
            plain("b"),
            Event::Alias(1),
            Event::MappingEnd,
        ]))
        .unwrap();
        assert_eq!(docs[0]["a"], docs[0]["b"]);
        assert_eq!(docs[0]["b"], Value::from(vec!["x"]));
    }

    #[test]
    fn test_alias_to_scalar_anchor() {
        let docs = build(document(vec![
            Event::SequenceStart(0, None),
            anchored("5", 1),
            Event::Alias(1),
            Event::SequenceEnd,
        ]))
        .unwrap();
        assert_eq!(docs[0], Value::from(vec![5, 5]));
    }

    #[test]
    fn test_alias_as_mapping_key() {
        let docs = build(document(vec![
            Event::MappingStart(0, None),
            anchored("k", 1),
            plain("first"),
            Event::Alias(1),
            plain("second"),
            Event::MappingEnd,
        ]))
        .unwrap();
        // Same key twice: the later value wins.
        assert_eq!(docs[0].len(), 1);
        assert_eq!(docs[0]["k"], Value::from("second"));
    }

    #[test]
    fn test_self_reference_unrolls_once() {
        let docs = build(document(vec![
            Event::MappingStart(0, None),
            plain("tree"),
            Event::MappingStart(1, None),
            plain("node"),
            plain("null"),
            plain("parent"),
            Event::Alias(1),
            Event::MappingEnd,
            Event::MappingEnd,
        ]))
        .unwrap();

        let inner: Value = [("node", Value::Null)].into_iter().collect();
        let tree: Value = [("node", Value::Null), ("parent", inner)].into_iter().collect();
        let expected: Value = [("tree", tree)].into_iter().collect();
        assert_eq!(docs[0], expected);
    }

    #[test]
    fn test_unknown_alias_fails() {
        let err = build(document(vec![
            Event::SequenceStart(0, None),
            Event::Alias(7),
            Event::SequenceEnd,
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            Error::AnchorNotFound {
                anchor: "#7".into(),
                location: None
            }
        );
    }

    #[test]
    fn test_anchor_scope_across_documents() {
        let events = vec![
            Event::StreamStart,
            Event::DocumentStart,
            anchored("shared", 1),
            Event::DocumentEnd,
            Event::DocumentStart,
            Event::Alias(1),
            Event::DocumentEnd,
            Event::StreamEnd,
        ];

        let err = build_with_scope(events.clone(), AnchorScope::Document).unwrap_err();
        assert!(matches!(err, Error::AnchorNotFound { .. }));

        let docs = build_with_scope(events, AnchorScope::Stream).unwrap();
        assert_eq!(docs, vec![Value::from("shared"), Value::from("shared")]);
    }

    #[test]
    fn test_end_without_start_fails() {
        let err = build(document(vec![Event::MappingEnd])).unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
    }

    #[test]
    fn test_mismatched_end_fails() {
        let err = build(document(vec![
            Event::SequenceStart(0, None),
            Event::MappingEnd,
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("end of mapping while a sequence is open"));
    }

    #[test]
    fn test_dangling_key_fails() {
        let err = build(document(vec![
            Event::MappingStart(0, None),
            plain("key"),
            Event::MappingEnd,
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
    }

    #[test]
    fn test_unclosed_collection_fails() {
        let err = build(document(vec![Event::SequenceStart(0, None)])).unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_second_root_fails() {
        let err = build(document(vec![plain("a"), plain("b")])).unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
    }

    #[test]
    fn test_content_outside_document_fails() {
        let err = build(vec![Event::StreamStart, plain("a"), Event::StreamEnd]).unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
    }

    #[test]
    fn test_nothing_event_is_unsupported() {
        let err = build(vec![Event::StreamStart, Event::Nothing]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEvent { .. }));
    }

    #[test]
    fn test_documents_require_stream_end() {
        let mut builder = DocumentBuilder::new(AnchorScope::Document);
        builder.on_event(Event::StreamStart).unwrap();
        assert!(builder.into_documents().is_err());
    }

    #[test]
    fn test_events_after_stream_end_fail() {
        let mut builder = DocumentBuilder::new(AnchorScope::Document);
        builder.on_event(Event::StreamStart).unwrap();
        builder.on_event(Event::StreamEnd).unwrap();
        assert!(builder.on_event(Event::StreamStart).is_err());
    }
}
