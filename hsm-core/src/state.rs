use crate::transition::{MatchBuilder, TransitionDescriptor};
use crate::{EventId, VertexId};

/// A state's transition-matching predicate.
///
/// Must be a pure function of `(event, ctx, self)`: it inspects guards via
/// `ctx` and returns either no transition (the bubble-up continues to the
/// parent) or a descriptor built via `builder`. Must never call
/// [`crate::Machine::dispatch`] on the same machine.
pub type MatchFn<C> = fn(builder: MatchBuilder, event: EventId, ctx: &mut C) -> Option<TransitionDescriptor<C>>;

/// A state's entry or exit behavior. Must never call
/// [`crate::Machine::dispatch`] on the same machine.
pub type EntryExitFn<C> = fn(ctx: &mut C);

/// A state's one-shot initialization hook, invoked once per
/// [`crate::Machine::init`] call, before any `entry` runs.
pub type InitFn<C> = fn(ctx: &mut C);

/// Internal, arena-resident representation of a state vertex.
///
/// A state is a plain record of topology plus three behavior slots, not a
/// trait object or a node in a class hierarchy: see the crate's design
/// notes on representation strategy.
pub(crate) struct StateRecord<C> {
    pub(crate) id: VertexId,
    pub(crate) parent: Option<VertexId>,
    pub(crate) initial: Option<VertexId>,
    pub(crate) depth: u32,
    pub(crate) shallow_history: Option<VertexId>,
    pub(crate) deep_history: Option<VertexId>,
    pub(crate) match_fn: Option<MatchFn<C>>,
    pub(crate) entry_fn: Option<EntryExitFn<C>>,
    pub(crate) exit_fn: Option<EntryExitFn<C>>,
    pub(crate) init_fn: Option<InitFn<C>>,
}

impl<C> StateRecord<C> {
    pub(crate) fn is_composite(&self) -> bool {
        self.initial.is_some()
    }
}

/// Read-only snapshot of a state's topology, returned by
/// [`crate::Machine::state_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub id: VertexId,
    pub parent: Option<VertexId>,
    pub initial: Option<VertexId>,
    pub depth: u32,
    pub shallow_history: Option<VertexId>,
    pub deep_history: Option<VertexId>,
    pub is_composite: bool,
}
