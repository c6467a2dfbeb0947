//! Event sinks, including the block-style text writer.

use crate::{EmitOptions, Error, Result};
use std::fmt::Write;
use yaml_rust2::parser::Event;
use yaml_rust2::scanner::TScalarStyle;

/// Consumer side of the event vocabulary.
pub trait EventSink {
    fn on_event(&mut self, event: Event) -> Result<()>;
}

/// Records events, mostly useful in tests.
impl EventSink for Vec<Event> {
    fn on_event(&mut self, event: Event) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

/// Longest key, in characters, that a reader accepts before the `:` of an
/// implicit `key: value` entry. Longer keys use the explicit `? key` form.
const MAX_IMPLICIT_KEY_LEN: usize = 1024;

/// Deepest collection nesting the writer accepts. Writing walks the
/// document recursively, so the limit keeps the walk within the stack.
pub(crate) const MAX_DEPTH: usize = 512;

/// A node of the document being written.
#[derive(Debug)]
enum Node {
    Scalar { text: String, style: TScalarStyle },
    Sequence(Vec<Node>),
    Mapping(Vec<(Node, Node)>),
}

impl Node {
    fn is_block_collection(&self) -> bool {
        match self {
            Node::Sequence(items) => !items.is_empty(),
            Node::Mapping(entries) => !entries.is_empty(),
            Node::Scalar { .. } => false,
        }
    }
}

/// A collection whose end event has not arrived yet.
#[derive(Debug)]
enum OpenNode {
    Sequence(Vec<Node>),
    Mapping {
        entries: Vec<(Node, Node)>,
        key: Option<Node>,
    },
}

/// Writes events as block-style YAML text.
///
/// Each document is collected until its `DocumentEnd` event and then written
/// in one go. Sequence items use `- `, mapping entries use `key: value`, and
/// collection keys use the explicit `? key` / `: value` form. Empty
/// collections are written in flow style (`[]`, `{}`).
///
/// Plain scalars are written verbatim unless the text cannot appear
/// unquoted, in which case they are double-quoted.
pub struct BlockWriter<W: Write> {
    out: W,
    options: EmitOptions,
    stack: Vec<OpenNode>,
    root: Option<Node>,
    documents: usize,
}

impl<W: Write> BlockWriter<W> {
    pub fn new(out: W, options: EmitOptions) -> Self {
        Self {
            out,
            options,
            stack: Vec::new(),
            root: None,
            documents: 0,
        }
    }

    /// Give back the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn add_node(&mut self, node: Node) -> Result<()> {
        match self.stack.last_mut() {
            Some(OpenNode::Sequence(items)) => items.push(node),
            Some(OpenNode::Mapping { entries, key }) => match key.take() {
                None => *key = Some(node),
                Some(k) => entries.push((k, node)),
            },
            None => {
                if self.root.is_some() {
                    return Err(emit_error("more than one root node in a document"));
                }
                self.root = Some(node);
            }
        }
        Ok(())
    }

    fn close(&mut self, expect_mapping: bool) -> Result<()> {
        let node = match self.stack.pop() {
            Some(OpenNode::Sequence(items)) if !expect_mapping => Node::Sequence(items),
            Some(OpenNode::Mapping { entries, key: None }) if expect_mapping => {
                Node::Mapping(entries)
            }
            _ => return Err(emit_error("collection end does not match an open collection")),
        };
        self.add_node(node)
    }

    fn check_depth(&self) -> Result<()> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(emit_error(&format!(
                "collections nested deeper than {} levels",
                MAX_DEPTH
            )));
        }
        Ok(())
    }

    fn write_document(&mut self) -> Result<()> {
        if !self.stack.is_empty() {
            return Err(emit_error("document ended with unclosed collections"));
        }
        let root = self
            .root
            .take()
            .ok_or_else(|| emit_error("document without content"))?;
        self.write_node(&root, 0)?;
        self.out.write_char('\n')?;
        self.documents += 1;
        Ok(())
    }

    /// Write `node` starting at the cursor, with continuation lines at `indent`.
    fn write_node(&mut self, node: &Node, indent: usize) -> Result<()> {
        match node {
            Node::Scalar { text, style } => self.write_scalar(text, *style),
            Node::Sequence(items) if items.is_empty() => Ok(self.out.write_str("[]")?),
            Node::Mapping(entries) if entries.is_empty() => Ok(self.out.write_str("{}")?),
            Node::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.newline(indent)?;
                    }
                    self.out.write_str("- ")?;
                    self.write_node(item, indent + 2)?;
                }
                Ok(())
            }
            Node::Mapping(entries) => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.newline(indent)?;
                    }
                    let implicit_key = match key {
                        Node::Scalar { text, style } => {
                            render_scalar(text, *style).chars().count() < MAX_IMPLICIT_KEY_LEN
                        }
                        _ => false,
                    };
                    if implicit_key {
                        self.write_node(key, indent)?;
                    } else {
                        self.out.write_str("? ")?;
                        self.write_node(key, indent + 2)?;
                        self.newline(indent)?;
                    }
                    self.out.write_char(':')?;
                    self.write_value(value, indent)?;
                }
                Ok(())
            }
        }
    }

    /// Write a mapping value after its `:`.
    fn write_value(&mut self, value: &Node, indent: usize) -> Result<()> {
        if value.is_block_collection() {
            let nested = indent + self.options.effective_indent();
            self.newline(nested)?;
            self.write_node(value, nested)
        } else {
            self.out.write_char(' ')?;
            self.write_node(value, indent)
        }
    }

    fn write_scalar(&mut self, text: &str, style: TScalarStyle) -> Result<()> {
        self.out.write_str(&render_scalar(text, style))?;
        Ok(())
    }

    fn newline(&mut self, indent: usize) -> Result<()> {
        self.out.write_char('\n')?;
        for _ in 0..indent {
            self.out.write_char(' ')?;
        }
        Ok(())
    }
}

impl<W: Write> EventSink for BlockWriter<W> {
    fn on_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::StreamStart | Event::StreamEnd => Ok(()),
            Event::DocumentStart => {
                if self.documents > 0 || self.options.explicit_document_start {
                    self.out.write_str("---\n")?;
                }
                Ok(())
            }
            Event::DocumentEnd => self.write_document(),
            Event::SequenceStart(..) => {
                self.check_depth()?;
                self.stack.push(OpenNode::Sequence(Vec::new()));
                Ok(())
            }
            Event::MappingStart(..) => {
                self.check_depth()?;
                self.stack.push(OpenNode::Mapping {
                    entries: Vec::new(),
                    key: None,
                });
                Ok(())
            }
            Event::SequenceEnd => self.close(false),
            Event::MappingEnd => self.close(true),
            Event::Scalar(text, style, _anchor, _tag) => self.add_node(Node::Scalar { text, style }),
            other => Err(emit_error(&format!("cannot write {:?} event", other))),
        }
    }
}

fn emit_error(message: &str) -> Error {
    Error::EmitError {
        message: message.to_string(),
    }
}

/// Scalar text as it appears in the output, quotes and escapes included.
fn render_scalar(text: &str, style: TScalarStyle) -> String {
    if style == TScalarStyle::Plain && can_be_plain(text) {
        text.to_string()
    } else if style == TScalarStyle::SingleQuoted && !text.chars().any(char::is_control) {
        format!("'{}'", text.replace('\'', "''"))
    } else {
        double_quoted(text)
    }
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whether `text` can be written as a plain block scalar unchanged.
fn can_be_plain(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if first.is_whitespace() || text.ends_with(char::is_whitespace) {
        return false;
    }
    if "[]{},#&*!|>'\"%@`".contains(first) {
        return false;
    }
    // `-`, `?` and `:` only start an indicator when followed by a space.
    if matches!(text, "-" | "?" | ":")
        || text.starts_with("- ")
        || text.starts_with("? ")
        || text.starts_with(": ")
    {
        return false;
    }
    if text.starts_with("---") || text.starts_with("...") {
        return false;
    }
    if text.contains(": ") || text.contains(" #") || text.ends_with(':') {
        return false;
    }
    !text.chars().any(char::is_control)
}
