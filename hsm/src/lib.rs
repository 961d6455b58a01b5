//! Facade over [`hsm_core`]: re-exports the dispatcher's public surface and,
//! behind the `tracing` feature, wires its four trace hook points to
//! `tracing` events so a host application that already depends on `tracing`
//! gets dispatch observability without writing its own hook functions.
//!
//! This crate carries no macro, no code generation, and no additional
//! runtime semantics over [`hsm_core`] — see that crate for the dispatcher,
//! the builder, and the full set of UML transition/history semantics. A
//! host application can depend on `hsm-core` directly and get the identical
//! behavior; this crate exists purely for the `tracing` convenience and as
//! the stable, documented entry point for the workspace.

pub use hsm_core::{
    DispatchError, DispatchResult, EventId, HistoryFlavor, Machine, MachineBuilder, MatchBuilder,
    StateBuilder, StateInfo, TopologyError, TraceHooks, TransitionDescriptor, TransitionKind,
    VertexId, VertexKind, ANONYMOUS_EVENT, DEFAULT_ANONYMOUS_CHAIN_LIMIT,
};

/// Re-exports the core crate under its own name, mirroring the workspace's
/// `core`-plus-facade layering for callers that prefer to name it
/// explicitly (`hsm::core::Machine` rather than `hsm::Machine`).
pub mod core {
    pub use hsm_core::*;
}

#[cfg(feature = "tracing")]
mod tracing_hooks {
    use hsm_core::{EventId, TraceHooks, VertexId};

    fn on_entry(id: VertexId) {
        tracing::trace!(vertex = id, "enter");
    }

    fn on_exit(id: VertexId) {
        tracing::trace!(vertex = id, "exit");
    }

    fn on_match(event: EventId, source: VertexId) {
        tracing::debug!(event, source, "matched");
    }

    fn on_ignored(event: EventId) {
        tracing::debug!(event, "ignored");
    }

    fn on_assert_failure(reason: &str) {
        tracing::error!(reason, "hsm dispatcher assertion failed");
    }

    /// Build a [`TraceHooks`] that forwards every hook to a `tracing` event
    /// at a level appropriate to its frequency and severity: `trace` for
    /// entry/exit (one per state per transition), `debug` for match/ignore
    /// (one per dispatched event), `error` for assertion failures (should
    /// never fire against a well-formed machine).
    pub fn tracing_hooks<C>() -> TraceHooks<C> {
        TraceHooks::new(
            Some(on_entry),
            Some(on_exit),
            Some(on_match),
            Some(on_ignored),
            Some(on_assert_failure),
        )
    }
}

#[cfg(feature = "tracing")]
pub use tracing_hooks::tracing_hooks;

/// Extension trait adding the `tracing`-wired constructor directly onto
/// [`MachineBuilder`]'s chain, so a host application opts in with one call:
///
/// ```rust
/// # use hsm::{MachineBuilder, MachineBuilderExt, ANONYMOUS_EVENT};
/// let machine = MachineBuilder::<()>::new()
///     .with_tracing()
///     .state(0)
///     .build(0, ANONYMOUS_EVENT)
///     .unwrap();
/// # let _ = machine;
/// ```
#[cfg(feature = "tracing")]
pub trait MachineBuilderExt<C> {
    /// Install the `tracing`-backed hooks from [`tracing_hooks`].
    fn with_tracing(self) -> Self;
}

#[cfg(feature = "tracing")]
impl<C> MachineBuilderExt<C> for MachineBuilder<C> {
    fn with_tracing(self) -> Self {
        self.trace_hooks(tracing_hooks())
    }
}
