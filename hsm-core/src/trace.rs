use crate::{EventId, VertexId};

/// Optional side-channel observation hooks, supplied at machine
/// construction and defaulting to no-ops.
///
/// None of these hooks may influence dispatch; they exist purely for
/// observability (logging, tracing spans, test assertions) and are called
/// synchronously, in the order described on each field.
pub struct TraceHooks<C> {
    /// Fires immediately before a state's user `entry` runs.
    pub on_entry: Option<fn(VertexId)>,
    /// Fires immediately before a state's user `exit` runs.
    pub on_exit: Option<fn(VertexId)>,
    /// Fires when `match` returned a descriptor, before the transition
    /// is executed. Fires for every matched transition kind, including
    /// `Internal`.
    pub on_match: Option<fn(event: EventId, source: VertexId)>,
    /// Fires when bubble-up found no match for `event`.
    pub on_ignored: Option<fn(event: EventId)>,
    /// Fires with a human-readable reason whenever the dispatcher detects
    /// a topology or re-entrancy violation and is about to transition to
    /// `Fatal`. Purely informational: this crate always transitions to
    /// `Fatal` on such a violation rather than aborting the process.
    pub on_assert_failure: Option<fn(reason: &str)>,
    _marker: std::marker::PhantomData<fn(&mut C)>,
}

impl<C> Default for TraceHooks<C> {
    fn default() -> Self {
        Self {
            on_entry: None,
            on_exit: None,
            on_match: None,
            on_ignored: None,
            on_assert_failure: None,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<C> TraceHooks<C> {
    /// Build a fully-specified set of hooks. Prefer
    /// [`TraceHooks::default`] plus direct field assignment when only a
    /// few hooks are needed; this constructor exists for callers (such as
    /// the `hsm` facade's `tracing` integration) assembling all five at
    /// once from outside this crate.
    pub fn new(
        on_entry: Option<fn(VertexId)>,
        on_exit: Option<fn(VertexId)>,
        on_match: Option<fn(event: EventId, source: VertexId)>,
        on_ignored: Option<fn(event: EventId)>,
        on_assert_failure: Option<fn(reason: &str)>,
    ) -> Self {
        Self {
            on_entry,
            on_exit,
            on_match,
            on_ignored,
            on_assert_failure,
            _marker: std::marker::PhantomData,
        }
    }

    pub(crate) fn entry(&self, id: VertexId) {
        if let Some(f) = self.on_entry {
            f(id);
        }
    }

    pub(crate) fn exit(&self, id: VertexId) {
        if let Some(f) = self.on_exit {
            f(id);
        }
    }

    pub(crate) fn matched(&self, event: EventId, source: VertexId) {
        if let Some(f) = self.on_match {
            f(event, source);
        }
    }

    pub(crate) fn ignored(&self, event: EventId) {
        if let Some(f) = self.on_ignored {
            f(event);
        }
    }

    pub(crate) fn assert_failure(&self, reason: &str) {
        if let Some(f) = self.on_assert_failure {
            f(reason);
        }
    }
}
