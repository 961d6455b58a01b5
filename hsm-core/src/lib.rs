//! Runtime core of a UML-conformant hierarchical state machine.
//!
//! This crate is the dispatcher and transition engine described by the
//! surrounding workspace: given a current active leaf state and an incoming
//! event, it walks the state hierarchy, selects a transition, computes the
//! exit/effect/entry sequence against the least-common-ancestor rule, and
//! maintains shallow and deep history. It implements UML State Machine
//! semantics (v2.5.1) for composite states, external/local/internal
//! transitions, history pseudostates, initial pseudostates, and the
//! anonymous (completion) event run-to-completion loop.
//!
//! Orthogonal regions, choice/junction/fork/join pseudostates, entry/exit
//! points, deferred and time events, and submachine states are out of
//! scope; see the workspace-level design notes for the full rationale.
//!
//! A [`Machine`] is assembled once, through [`MachineBuilder`], and is then
//! immutable in topology for its whole lifetime: only the active leaf and
//! the `remembered` slot of history pseudostates change afterwards.

mod builder;
mod error;
mod history;
mod machine;
mod state;
mod trace;
mod transition;
mod vertex;

pub use builder::{MachineBuilder, StateBuilder};
pub use error::{DispatchError, TopologyError};
pub use history::HistoryFlavor;
pub use machine::{DispatchResult, Machine};
pub use state::StateInfo;
pub use trace::TraceHooks;
pub use transition::{MatchBuilder, TransitionDescriptor, TransitionKind};
pub use vertex::VertexKind;

/// Identity of a vertex (state or history pseudostate) within a machine.
///
/// Caller-assigned, non-negative, and unique within the machine that owns
/// it. Ids are never reused and never renumbered after
/// [`MachineBuilder::build`] succeeds.
pub type VertexId = u32;

/// Identity of an event understood by a machine's `match` functions.
pub type EventId = u32;

/// The reserved event id that drives completion (anonymous) transitions.
///
/// A state's `match` function is invoked with this id once after every
/// successful external or local transition, and chained until no state in
/// the active ancestor chain matches it (run-to-completion quiescence).
pub const ANONYMOUS_EVENT: EventId = 0;

/// Default cap on the number of chained anonymous transitions a single
/// [`Machine::dispatch`] call will execute before reporting
/// [`DispatchError::AnonymousLivelock`].
///
/// Well-formed machines (no anonymous-transition cycles) never approach
/// this bound; it exists only so a caller's event loop cannot hang forever
/// on a malformed one.
pub const DEFAULT_ANONYMOUS_CHAIN_LIMIT: u32 = 1_000;
