use crate::VertexId;

/// Construction-time violations of the topology invariants (I1-I5, H1),
/// returned by [`crate::MachineBuilder::build`].
///
/// Every variant carries the offending vertex id(s) so a caller can locate
/// the mistake in their own state table without re-deriving the walk that
/// found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// I1: a state declared itself as its own parent.
    #[error("state {0} is its own parent")]
    SelfParent(VertexId),

    /// I1: a state declared itself as its own initial substate.
    #[error("state {0} is its own initial substate")]
    SelfInitial(VertexId),

    /// I2: `initial` is set but is not a strict descendant of `state`.
    #[error("state {state}'s initial substate {initial} is not a descendant of it")]
    InitialNotDescendant { state: VertexId, initial: VertexId },

    /// I3: some other state names `id` as its parent, but `id` has no
    /// `initial` substate.
    #[error("state {0} has children but no initial substate")]
    CompositeWithoutInitial(VertexId),

    /// I4: the parent graph is not a forest; `0` is the first vertex
    /// found on the cycle.
    #[error("state {0} is part of a parent cycle")]
    Cycle(VertexId),

    /// I5: `from` references `to` (as parent, initial, or history
    /// default target) but `to` has no registered vertex.
    #[error("vertex {from} references non-existent vertex {to}")]
    DanglingReference { from: VertexId, to: VertexId },

    /// H1: a history pseudostate's default target escapes the owning
    /// composite's subtree.
    #[error("history {history}'s default target is not a descendant of its owner {owner}")]
    HistoryDefaultNotDescendant { history: VertexId, owner: VertexId },

    /// Two vertices (state or history) were registered under the same id.
    #[error("vertex id {0} is registered more than once")]
    DuplicateId(VertexId),

    /// The id passed to `build` as the top-level initial state has no
    /// registered state.
    #[error("declared top-level initial state {0} does not exist")]
    MissingTopLevelInitial(VertexId),
}

/// Runtime, Fatal-only causes surfaced by [`crate::DispatchResult::Fatal`].
///
/// These are structural bugs in the caller's machine definition or in the
/// caller's use of the dispatcher; unlike [`TopologyError`] they can only
/// manifest after a machine that passed construction-time validation is
/// driven into a state its builder did not anticipate (or is called
/// re-entrantly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The matched transition's source was not an ancestor of (or equal
    /// to) the active leaf during the exit-down-to-source walk.
    #[error("transition source {0} is not on the active ancestor chain")]
    UnreachableSource(VertexId),

    /// The least-common-ancestor walk between source and target reached
    /// the root on one side without meeting the other.
    #[error("no common ancestor between source {source} and target {target}")]
    MissingLca { source: VertexId, target: VertexId },

    /// The enter-walk could not construct a path from the LCA down to the
    /// target.
    #[error("no entry path from the common ancestor down to target {0}")]
    UnreachableTarget(VertexId),

    /// `dispatch` was called from within a hook (`match`, `entry`,
    /// `exit`, `effect`, or `init`) of the same machine instance.
    #[error("dispatch called re-entrantly")]
    ReentrantDispatch,

    /// The anonymous-transition chain exceeded its configured bound
    /// without reaching quiescence.
    #[error("anonymous transition chain exceeded {0} iterations")]
    AnonymousLivelock(u32),
}
