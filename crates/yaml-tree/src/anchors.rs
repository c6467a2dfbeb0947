//! Anchor bookkeeping for alias resolution.

use crate::{AnchorScope, Value};
use std::collections::HashMap;

/// Anchor identifier assigned by the event engine. `0` means "no anchor".
pub(crate) type AnchorId = usize;

/// Where an anchored node currently lives.
#[derive(Debug, Clone)]
pub(crate) enum AnchorSlot {
    /// The anchored collection is still open at this index of the frame stack.
    Open(usize),

    /// The anchored node is finished.
    Complete(Value),
}

/// Associates anchor ids with the nodes they were declared on.
///
/// Resolution always yields a copy: later changes to the anchored node never
/// reach an alias that was already resolved.
#[derive(Debug, Default)]
pub(crate) struct AnchorRegistry {
    scope: AnchorScope,
    /// Anchors of the document being built.
    current: HashMap<AnchorId, AnchorSlot>,
    /// Completed anchors of earlier documents, only kept for stream scope.
    previous: HashMap<AnchorId, Value>,
}

impl AnchorRegistry {
    pub(crate) fn new(scope: AnchorScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    /// Record an anchor on a collection that was just opened at `frame_index`.
    pub(crate) fn register_open(&mut self, id: AnchorId, frame_index: usize) {
        if id != 0 {
            self.current.insert(id, AnchorSlot::Open(frame_index));
        }
    }

    /// Record an anchor on a finished node.
    ///
    /// Also used when an open collection closes, replacing its `Open` slot.
    pub(crate) fn register_complete(&mut self, id: AnchorId, value: &Value) {
        if id != 0 {
            self.current.insert(id, AnchorSlot::Complete(value.clone()));
        }
    }

    /// Look up an anchor visible at this point of the stream.
    pub(crate) fn lookup(&self, id: AnchorId) -> Option<AnchorSlot> {
        if let Some(slot) = self.current.get(&id) {
            return Some(slot.clone());
        }
        self.previous
            .get(&id)
            .map(|value| AnchorSlot::Complete(value.clone()))
    }

    /// Close the current document.
    pub(crate) fn end_document(&mut self) {
        let finished = std::mem::take(&mut self.current);
        if self.scope == AnchorScope::Stream {
            self.previous
                .extend(finished.into_iter().filter_map(|(id, slot)| match slot {
                    AnchorSlot::Complete(value) => Some((id, value)),
                    AnchorSlot::Open(_) => None,
                }));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.current.len() + self.previous.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_anchor_is_absent() {
        let registry = AnchorRegistry::new(AnchorScope::Document);
        assert!(registry.lookup(1).is_none());
    }

    #[test]
    fn test_zero_id_is_never_registered() {
        let mut registry = AnchorRegistry::new(AnchorScope::Document);
        registry.register_open(0, 0);
        registry.register_complete(0, &Value::Int(1));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_complete_replaces_open() {
        let mut registry = AnchorRegistry::new(AnchorScope::Document);
        registry.register_open(1, 0);
        assert!(matches!(registry.lookup(1), Some(AnchorSlot::Open(0))));

        registry.register_complete(1, &Value::from("done"));
        match registry.lookup(1) {
            Some(AnchorSlot::Complete(value)) => assert_eq!(value, Value::from("done")),
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_document_scope_forgets_anchors() {
        let mut registry = AnchorRegistry::new(AnchorScope::Document);
        registry.register_complete(1, &Value::Int(1));
        registry.end_document();
        assert!(registry.lookup(1).is_none());
    }

    #[test]
    fn test_stream_scope_keeps_completed_anchors() {
        let mut registry = AnchorRegistry::new(AnchorScope::Stream);
        registry.register_complete(1, &Value::Int(1));
        registry.register_open(2, 0);
        registry.end_document();
        assert!(matches!(
            registry.lookup(1),
            Some(AnchorSlot::Complete(Value::Int(1)))
        ));
        assert!(registry.lookup(2).is_none());
    }
}
