use crate::VertexId;

/// The UML transition kind a [`TransitionDescriptor`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// The source is always exited, and re-entered if the transition
    /// targets itself.
    External,
    /// The source is composite and the target is a strict descendant of
    /// it; the source is not exited.
    Local,
    /// A self-transition that invokes neither entry nor exit of the
    /// source.
    Internal,
}

/// A zero-argument action invoked once during a transition, between the
/// exit phase and the entry phase.
pub type Effect<C> = fn(&mut C);

/// The outcome of a successful `match`: which transition to take.
///
/// Built exclusively through [`MatchBuilder`]'s `external`/`local`/
/// `internal` helpers so that `source` always reflects the state whose
/// `match` function produced it.
#[derive(Clone, Copy)]
pub struct TransitionDescriptor<C> {
    pub(crate) source: VertexId,
    pub(crate) target: VertexId,
    pub(crate) kind: TransitionKind,
    pub(crate) effect: Option<Effect<C>>,
}

impl<C> std::fmt::Debug for TransitionDescriptor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionDescriptor")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("has_effect", &self.effect.is_some())
            .finish()
    }
}

/// Handle passed into a state's `match` function, identifying which state
/// is currently being asked to match.
///
/// `match` functions build their result exclusively through this handle's
/// methods rather than constructing a [`TransitionDescriptor`] directly, so
/// `source` can never be forged to a vertex other than the one actually
/// being matched.
#[derive(Clone, Copy)]
pub struct MatchBuilder {
    source: VertexId,
}

impl MatchBuilder {
    pub(crate) fn new(source: VertexId) -> Self {
        Self { source }
    }

    /// The id of the state this handle was issued for.
    pub fn source(&self) -> VertexId {
        self.source
    }

    /// Build an external transition to `target`, with no effect.
    pub fn external<C>(&self, target: VertexId) -> TransitionDescriptor<C> {
        self.external_with_effect(target, None)
    }

    /// Build an external transition to `target`, running `effect` between
    /// the exit and entry phases.
    pub fn external_with_effect<C>(&self, target: VertexId, effect: Effect<C>) -> TransitionDescriptor<C> {
        self.external_with(target, Some(effect))
    }

    fn external_with<C>(&self, target: VertexId, effect: Option<Effect<C>>) -> TransitionDescriptor<C> {
        TransitionDescriptor {
            source: self.source,
            target,
            kind: TransitionKind::External,
            effect,
        }
    }

    /// Build a local transition to `target`, with no effect.
    ///
    /// `target` must be a strict descendant of `self` and `self` must be
    /// composite; a descriptor that violates this is not rejected here
    /// (construction never panics) but is rejected by the dispatcher at
    /// transition time, identically to an unmatched event.
    pub fn local<C>(&self, target: VertexId) -> TransitionDescriptor<C> {
        self.local_with_effect_opt(target, None)
    }

    /// Build a local transition to `target`, running `effect` between the
    /// exit and entry phases. Same validity caveat as [`Self::local`].
    pub fn local_with_effect<C>(&self, target: VertexId, effect: Effect<C>) -> TransitionDescriptor<C> {
        self.local_with_effect_opt(target, Some(effect))
    }

    fn local_with_effect_opt<C>(&self, target: VertexId, effect: Option<Effect<C>>) -> TransitionDescriptor<C> {
        TransitionDescriptor {
            source: self.source,
            target,
            kind: TransitionKind::Local,
            effect,
        }
    }

    /// Build an internal transition, with no effect. The target is always
    /// the source itself.
    pub fn internal<C>(&self) -> TransitionDescriptor<C> {
        self.internal_with_effect_opt(None)
    }

    /// Build an internal transition that runs `effect`.
    pub fn internal_with_effect<C>(&self, effect: Effect<C>) -> TransitionDescriptor<C> {
        self.internal_with_effect_opt(Some(effect))
    }

    fn internal_with_effect_opt<C>(&self, effect: Option<Effect<C>>) -> TransitionDescriptor<C> {
        TransitionDescriptor {
            source: self.source,
            target: self.source,
            kind: TransitionKind::Internal,
            effect,
        }
    }
}
