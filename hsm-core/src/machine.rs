use crate::history::HistoryRecord;
use crate::state::{StateInfo, StateRecord};
use crate::trace::TraceHooks;
use crate::transition::{MatchBuilder, TransitionDescriptor, TransitionKind};
use crate::vertex::VertexKind;
use crate::{DispatchError, EventId, VertexId};

/// Arena slot: every vertex id resolves to exactly one of these, or to
/// `Empty` if the id was never registered.
pub(crate) enum VertexSlot<C> {
    Empty,
    State(StateRecord<C>),
    History(HistoryRecord),
}

/// The dispatcher's own lifecycle, mirrored internally to enforce the
/// legal call sequence (`init` once, then `dispatch` only while `Idle`)
/// and to detect re-entrancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Idle,
    Dispatching,
    Fatal,
}

/// Outcome of a single [`Machine::dispatch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// A transition fired, possibly followed by a chain of anonymous
    /// transitions run to quiescence.
    Consumed,
    /// No state in the active ancestor chain matched the event.
    Ignored,
    /// An invariant was violated while executing the transition walk; the
    /// machine is now in its terminal `Fatal` state and every subsequent
    /// `dispatch` call returns the same cause without doing further work.
    Fatal(DispatchError),
}

/// The event dispatcher: owns the active leaf, the vertex arena, and the
/// history slots, and implements the exit/enter walk around the least
/// common ancestor.
///
/// Constructed exclusively through [`crate::MachineBuilder::build`].
/// Topology is immutable after construction; only `active` and each
/// history pseudostate's `remembered` slot change, and only as a result of
/// [`Machine::init`] or [`Machine::dispatch`].
pub struct Machine<C> {
    arena: Vec<VertexSlot<C>>,
    top_level_initial: VertexId,
    anonymous_event: EventId,
    active: VertexId,
    phase: Phase,
    last_fatal: Option<DispatchError>,
    trace: TraceHooks<C>,
    anonymous_chain_limit: u32,
    /// Scratch "next-child" slot used only within a single enter-walk; see
    /// the crate's design notes on transient scratch. Cleared before each
    /// use; never observable outside that call.
    next_child: Vec<Option<VertexId>>,
}

impl<C> Machine<C> {
    pub(crate) fn new(
        arena: Vec<VertexSlot<C>>,
        top_level_initial: VertexId,
        anonymous_event: EventId,
        trace: TraceHooks<C>,
        anonymous_chain_limit: u32,
    ) -> Self {
        let len = arena.len();
        Self {
            arena,
            top_level_initial,
            anonymous_event,
            active: top_level_initial,
            phase: Phase::Uninitialized,
            last_fatal: None,
            trace,
            anonymous_chain_limit,
            next_child: vec![None; len],
        }
    }

    // ---- arena accessors -------------------------------------------------

    fn state(&self, id: VertexId) -> Option<&StateRecord<C>> {
        match self.arena.get(id as usize) {
            Some(VertexSlot::State(s)) => Some(s),
            _ => None,
        }
    }

    fn history(&self, id: VertexId) -> Option<&HistoryRecord> {
        match self.arena.get(id as usize) {
            Some(VertexSlot::History(h)) => Some(h),
            _ => None,
        }
    }

    fn history_mut(&mut self, id: VertexId) -> Option<&mut HistoryRecord> {
        match self.arena.get_mut(id as usize) {
            Some(VertexSlot::History(h)) => Some(h),
            _ => None,
        }
    }

    /// The kind of vertex registered under `id`, if any.
    pub fn vertex_kind(&self, id: VertexId) -> Option<VertexKind> {
        match self.arena.get(id as usize) {
            Some(VertexSlot::State(_)) => Some(VertexKind::State),
            Some(VertexSlot::History(h)) => Some(match h.flavor {
                crate::HistoryFlavor::Shallow => VertexKind::ShallowHistory,
                crate::HistoryFlavor::Deep => VertexKind::DeepHistory,
            }),
            _ => None,
        }
    }

    /// Read-only snapshot of a state's topology.
    pub fn state_info(&self, id: VertexId) -> Option<StateInfo> {
        self.state(id).map(|s| StateInfo {
            id: s.id,
            parent: s.parent,
            initial: s.initial,
            depth: s.depth,
            shallow_history: s.shallow_history,
            deep_history: s.deep_history,
            is_composite: s.is_composite(),
        })
    }

    /// The state a history pseudostate currently remembers, if the
    /// machine has been initialized.
    pub fn history_remembered(&self, id: VertexId) -> Option<VertexId> {
        self.history(id).and_then(|h| h.remembered)
    }

    /// `true` once the machine has recorded a `Fatal` dispatch outcome.
    /// No further `dispatch` call will do any work once this is `true`.
    pub fn is_fatal(&self) -> bool {
        self.phase == Phase::Fatal
    }

    // ---- topology walks ----------------------------------------------------

    fn is_ancestor_or_self(&self, ancestor: VertexId, of: VertexId) -> bool {
        let mut cursor = Some(of);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.state(id).and_then(|s| s.parent);
        }
        false
    }

    fn is_strict_descendant(&self, descendant: VertexId, ancestor: VertexId) -> bool {
        descendant != ancestor && self.is_ancestor_or_self(ancestor, descendant)
    }

    /// Deepest common ancestor of `a` and `b`. `None` means the two
    /// vertices belong to disjoint top-level trees; the walk then treats
    /// the implicit forest root as the LCA (exit/enter all the way to
    /// each side's top-level boundary, with no LCA state to bracket).
    fn find_lca(&self, a: VertexId, b: VertexId) -> Option<VertexId> {
        let mut ancestors_a = Vec::new();
        let mut cursor = Some(a);
        while let Some(id) = cursor {
            ancestors_a.push(id);
            cursor = self.state(id).and_then(|s| s.parent);
        }

        let mut cursor = Some(b);
        while let Some(id) = cursor {
            if ancestors_a.contains(&id) {
                return Some(id);
            }
            cursor = self.state(id).and_then(|s| s.parent);
        }
        None
    }

    /// Resolve a transition target id to a concrete state id, following a
    /// history pseudostate's `remembered` slot if the id names one.
    fn effective_target(&self, id: VertexId) -> Option<VertexId> {
        match self.arena.get(id as usize)? {
            VertexSlot::State(_) => Some(id),
            VertexSlot::History(h) => h.remembered,
            VertexSlot::Empty => None,
        }
    }

    fn local_transition_is_well_formed(&self, t: &TransitionDescriptor<C>) -> bool {
        match self.state(t.source) {
            Some(source) if source.is_composite() => match self.effective_target(t.target) {
                Some(resolved) => self.is_strict_descendant(resolved, t.source),
                None => false,
            },
            _ => false,
        }
    }

    // ---- entry/exit/trace plumbing -----------------------------------------

    fn exit_vertex(&self, id: VertexId, ctx: &mut C) {
        self.trace.exit(id);
        if let Some(f) = self.state(id).and_then(|s| s.exit_fn) {
            f(ctx);
        }
    }

    fn enter_vertex(&self, id: VertexId, ctx: &mut C) {
        self.trace.entry(id);
        if let Some(f) = self.state(id).and_then(|s| s.entry_fn) {
            f(ctx);
        }
    }

    /// History update policy (see the crate's history design notes): walk
    /// from the new leaf upward, updating every composite ancestor's
    /// attached history pseudostates along the way.
    fn update_histories(&mut self, leaf: VertexId) {
        let mut child = leaf;
        let mut cursor = self.state(leaf).and_then(|s| s.parent);
        while let Some(ancestor) = cursor {
            let (shallow, deep) = match self.state(ancestor) {
                Some(s) => (s.shallow_history, s.deep_history),
                None => break,
            };
            if let Some(h) = shallow {
                if let Some(hist) = self.history_mut(h) {
                    hist.remembered = Some(child);
                }
            }
            if let Some(h) = deep {
                if let Some(hist) = self.history_mut(h) {
                    hist.remembered = Some(leaf);
                }
            }
            child = ancestor;
            cursor = self.state(ancestor).and_then(|s| s.parent);
        }
    }

    fn init_history_if_owned(&mut self, id: VertexId) {
        let (shallow, deep, initial) = match self.state(id) {
            Some(s) => (s.shallow_history, s.deep_history, s.initial),
            None => return,
        };
        if let Some(h) = shallow {
            let default = self.history(h).and_then(|hr| hr.default_target).or(initial);
            if let Some(d) = default {
                if let Some(hr) = self.history_mut(h) {
                    hr.remembered = Some(d);
                }
            }
        }
        if let Some(h) = deep {
            let default = self.history(h).and_then(|hr| hr.default_target).or(initial);
            if let Some(mut d) = default {
                while let Some(next) = self.state(d).and_then(|s| s.initial) {
                    d = next;
                }
                if let Some(hr) = self.history_mut(h) {
                    hr.remembered = Some(d);
                }
            }
        }
    }

    // ---- public lifecycle ---------------------------------------------------

    /// Initialize every registered history pseudostate, then enter the
    /// declared top-level initial state and descend through `initial`
    /// links to a leaf, then drain anonymous transitions to quiescence.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn init(&mut self, ctx: &mut C) -> DispatchResult {
        assert_eq!(self.phase, Phase::Uninitialized, "Machine::init called more than once");
        self.phase = Phase::Dispatching;

        let max_id = self.arena.len() as VertexId;
        for id in 0..max_id {
            if let Some(f) = self.state(id).and_then(|s| s.init_fn) {
                f(ctx);
            }
            self.init_history_if_owned(id);
        }

        let mut cursor = self.top_level_initial;
        self.enter_vertex(cursor, ctx);
        self.active = cursor;
        while let Some(initial) = self.state(cursor).and_then(|s| s.initial) {
            self.enter_vertex(initial, ctx);
            self.active = initial;
            cursor = initial;
        }
        self.update_histories(self.active);

        match self.drain_anonymous(ctx) {
            Ok(()) => {
                self.phase = Phase::Idle;
                DispatchResult::Consumed
            }
            Err(e) => self.go_fatal(e),
        }
    }

    /// Dispatch `event` against the current active leaf, bubbling through
    /// ancestors for a match, executing the selected transition, and
    /// draining chained anonymous transitions to quiescence.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Machine::init`].
    pub fn dispatch(&mut self, event: EventId, ctx: &mut C) -> DispatchResult {
        match self.phase {
            Phase::Uninitialized => panic!("Machine::dispatch called before Machine::init"),
            Phase::Fatal => {
                return DispatchResult::Fatal(self.last_fatal.expect("Fatal phase always carries a cause"))
            }
            Phase::Dispatching => {
                self.trace.assert_failure("dispatch called re-entrantly");
                return self.go_fatal(DispatchError::ReentrantDispatch);
            }
            Phase::Idle => {}
        }

        self.phase = Phase::Dispatching;
        let outcome = self.run_rtc(event, ctx);
        match outcome {
            Ok(true) => {
                self.phase = Phase::Idle;
                DispatchResult::Consumed
            }
            Ok(false) => {
                self.phase = Phase::Idle;
                DispatchResult::Ignored
            }
            Err(e) => self.go_fatal(e),
        }
    }

    fn go_fatal(&mut self, e: DispatchError) -> DispatchResult {
        self.trace.assert_failure(&e.to_string());
        self.last_fatal = Some(e);
        self.phase = Phase::Fatal;
        DispatchResult::Fatal(e)
    }

    /// The current active leaf. Only meaningful once [`Machine::init`]
    /// has run.
    pub fn current_state(&self) -> VertexId {
        self.active
    }

    /// `true` iff `id` is the active leaf or one of its ancestors.
    pub fn in_state(&self, id: VertexId) -> bool {
        self.is_ancestor_or_self(id, self.active)
    }

    // ---- dispatch internals --------------------------------------------------

    fn run_rtc(&mut self, event: EventId, ctx: &mut C) -> Result<bool, DispatchError> {
        let consumed = self.dispatch_one(event, ctx)?;
        if consumed {
            self.drain_anonymous(ctx)?;
        }
        Ok(consumed)
    }

    fn drain_anonymous(&mut self, ctx: &mut C) -> Result<(), DispatchError> {
        let mut iterations = 0u32;
        loop {
            iterations += 1;
            if iterations > self.anonymous_chain_limit {
                return Err(DispatchError::AnonymousLivelock(self.anonymous_chain_limit));
            }
            let matched = self.dispatch_one(self.anonymous_event, ctx)?;
            if !matched {
                return Ok(());
            }
        }
    }

    fn match_from_active(&self, event: EventId, ctx: &mut C) -> Option<TransitionDescriptor<C>> {
        let mut cursor = Some(self.active);
        while let Some(id) = cursor {
            let state = self.state(id)?;
            if let Some(match_fn) = state.match_fn {
                if let Some(t) = match_fn(MatchBuilder::new(id), event, ctx) {
                    return Some(t);
                }
            }
            cursor = state.parent;
        }
        None
    }

    fn dispatch_one(&mut self, event: EventId, ctx: &mut C) -> Result<bool, DispatchError> {
        let t = match self.match_from_active(event, ctx) {
            Some(t) => t,
            None => {
                self.trace.ignored(event);
                return Ok(false);
            }
        };

        if t.kind == TransitionKind::Local && !self.local_transition_is_well_formed(&t) {
            self.trace.ignored(event);
            return Ok(false);
        }

        self.trace.matched(event, t.source);
        self.execute_transition(t, ctx)?;
        Ok(true)
    }

    /// Implements the ordered exit/effect/entry algorithm for External and
    /// Local transitions, and the trivial Internal case.
    fn execute_transition(&mut self, t: TransitionDescriptor<C>, ctx: &mut C) -> Result<(), DispatchError> {
        if t.kind == TransitionKind::Internal {
            if let Some(effect) = t.effect {
                effect(ctx);
            }
            return Ok(());
        }

        let source = t.source;
        let target = self.effective_target(t.target).ok_or(DispatchError::UnreachableTarget(t.target))?;

        if !self.is_ancestor_or_self(source, self.active) {
            return Err(DispatchError::UnreachableSource(source));
        }

        // b. exit down to source.
        let mut w = Some(self.active);
        while w != Some(source) {
            let id = w.ok_or(DispatchError::UnreachableSource(source))?;
            self.exit_vertex(id, ctx);
            w = self.state(id).and_then(|s| s.parent);
        }

        // c. find LCA(source, target).
        let lca = self.find_lca(source, target);

        // d. exit up to LCA (None LCA means exit all the way to the forest root).
        while w != lca {
            let id = w.ok_or(DispatchError::MissingLca { source, target })?;
            self.exit_vertex(id, ctx);
            w = self.state(id).and_then(|s| s.parent);
        }

        // e. self-transition on the LCA.
        let self_external = t.kind == TransitionKind::External && lca == Some(source);
        if self_external {
            self.exit_vertex(source, ctx);
        }

        // f. effect, between any self-exit and self-entry at the LCA.
        if let Some(effect) = t.effect {
            effect(ctx);
        }

        // g. enter from LCA to target. Thread a "next-child" scratch slot
        // from each visited parent to the child on the path, then walk it
        // outermost-first; see the crate's design notes on transient scratch.
        for slot in self.next_child.iter_mut() {
            *slot = None;
        }
        let mut cursor = target;
        while Some(cursor) != lca {
            match self.state(cursor).and_then(|s| s.parent) {
                Some(parent) => {
                    self.next_child[parent as usize] = Some(cursor);
                    cursor = parent;
                }
                None => break,
            }
        }
        // `cursor` now equals the LCA (if one exists) or the top-level
        // ancestor of target (if source and target share no common state).

        if self_external {
            self.enter_vertex(source, ctx);
        } else if lca.is_none() {
            self.enter_vertex(cursor, ctx);
        }
        let mut w = cursor;
        while let Some(child) = self.next_child.get(w as usize).copied().flatten() {
            self.enter_vertex(child, ctx);
            w = child;
        }

        // h. descend initial pseudostates.
        let mut leaf = target;
        while let Some(initial) = self.state(leaf).and_then(|s| s.initial) {
            self.enter_vertex(initial, ctx);
            leaf = initial;
        }

        // i. commit.
        self.active = leaf;
        self.update_histories(leaf);

        Ok(())
    }
}
