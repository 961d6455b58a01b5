use std::collections::BTreeMap;

use crate::history::{HistoryFlavor, HistoryRecord};
use crate::machine::{Machine, VertexSlot};
use crate::state::{EntryExitFn, InitFn, MatchFn, StateRecord};
use crate::trace::TraceHooks;
use crate::{EventId, TopologyError, VertexId, DEFAULT_ANONYMOUS_CHAIN_LIMIT};

/// Accumulates vertex definitions and assembles a [`Machine`].
///
/// This is the only supported way to construct a `Machine`: a builder is
/// filled in with one [`StateBuilder`] per state (plus any attached
/// history pseudostates), then [`MachineBuilder::build`] validates the
/// topology invariants once, before any vertex becomes reachable through
/// the resulting machine.
pub struct MachineBuilder<C> {
    states: BTreeMap<VertexId, StateRecord<C>>,
    histories: BTreeMap<VertexId, HistoryRecord>,
    trace: TraceHooks<C>,
    anonymous_chain_limit: u32,
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> MachineBuilder<C> {
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
            histories: BTreeMap::new(),
            trace: TraceHooks::default(),
            anonymous_chain_limit: DEFAULT_ANONYMOUS_CHAIN_LIMIT,
        }
    }

    /// Begin (or resume) configuring the state with id `id`.
    pub fn state(&mut self, id: VertexId) -> StateBuilder<'_, C> {
        self.states.entry(id).or_insert_with(|| StateRecord {
            id,
            parent: None,
            initial: None,
            depth: 0,
            shallow_history: None,
            deep_history: None,
            match_fn: None,
            entry_fn: None,
            exit_fn: None,
            init_fn: None,
        });
        StateBuilder { id, builder: self }
    }

    /// Install the trace hooks the built machine will call. Defaults to
    /// all no-ops.
    pub fn trace_hooks(mut self, hooks: TraceHooks<C>) -> Self {
        self.trace = hooks;
        self
    }

    /// Override the default anonymous-transition chain bound (see
    /// [`crate::DEFAULT_ANONYMOUS_CHAIN_LIMIT`]).
    pub fn anonymous_chain_limit(mut self, limit: u32) -> Self {
        self.anonymous_chain_limit = limit;
        self
    }

    /// Validate the accumulated topology and, if it is well-formed,
    /// produce a [`Machine`] ready for [`Machine::init`].
    ///
    /// `top_level_initial` is the id of the state [`Machine::init`] enters
    /// first. `anonymous_event` is the event id that drives completion
    /// transitions; by convention this is [`crate::ANONYMOUS_EVENT`], but
    /// a caller may choose a different reserved id.
    pub fn build(mut self, top_level_initial: VertexId, anonymous_event: EventId) -> Result<Machine<C>, TopologyError> {
        self.validate(top_level_initial)?;
        self.compute_depths();

        let max_id = self
            .states
            .keys()
            .chain(self.histories.keys())
            .copied()
            .max()
            .map(|m| m + 1)
            .unwrap_or(0);

        let mut arena: Vec<VertexSlot<C>> = Vec::with_capacity(max_id as usize);
        for _ in 0..max_id {
            arena.push(VertexSlot::Empty);
        }
        for (id, state) in self.states {
            arena[id as usize] = VertexSlot::State(state);
        }
        for (id, history) in self.histories {
            arena[id as usize] = VertexSlot::History(history);
        }

        Ok(Machine::new(
            arena,
            top_level_initial,
            anonymous_event,
            self.trace,
            self.anonymous_chain_limit,
        ))
    }

    /// Same as [`Self::build`], but takes the builder by mutable reference
    /// so a chain ending in [`StateBuilder::done`] can finish without a
    /// separate local binding. Leaves `self` reset to an empty builder
    /// afterwards; callers that need both the result and a reusable
    /// builder should use [`Self::build`] instead.
    pub fn finish(&mut self, top_level_initial: VertexId, anonymous_event: EventId) -> Result<Machine<C>, TopologyError> {
        std::mem::take(self).build(top_level_initial, anonymous_event)
    }

    fn validate(&self, top_level_initial: VertexId) -> Result<(), TopologyError> {
        if !self.states.contains_key(&top_level_initial) {
            return Err(TopologyError::MissingTopLevelInitial(top_level_initial));
        }

        for id in self.histories.keys() {
            if self.states.contains_key(id) {
                return Err(TopologyError::DuplicateId(*id));
            }
        }

        let mut has_children: BTreeMap<VertexId, bool> = BTreeMap::new();

        for state in self.states.values() {
            if let Some(parent) = state.parent {
                if parent == state.id {
                    return Err(TopologyError::SelfParent(state.id));
                }
                if !self.states.contains_key(&parent) {
                    return Err(TopologyError::DanglingReference {
                        from: state.id,
                        to: parent,
                    });
                }
                has_children.insert(parent, true);
            }
            if let Some(initial) = state.initial {
                if initial == state.id {
                    return Err(TopologyError::SelfInitial(state.id));
                }
                if !self.states.contains_key(&initial) {
                    return Err(TopologyError::DanglingReference {
                        from: state.id,
                        to: initial,
                    });
                }
                if !self.is_descendant_unchecked(initial, state.id) {
                    return Err(TopologyError::InitialNotDescendant {
                        state: state.id,
                        initial,
                    });
                }
            }
            if let Some(history_id) = state.shallow_history {
                self.validate_history(history_id, state.id)?;
            }
            if let Some(history_id) = state.deep_history {
                self.validate_history(history_id, state.id)?;
            }
        }

        for id in self.states.keys() {
            if *has_children.get(id).unwrap_or(&false) {
                let initial_set = self.states.get(id).map(|s| s.initial.is_some()).unwrap_or(false);
                if !initial_set {
                    return Err(TopologyError::CompositeWithoutInitial(*id));
                }
            }
        }

        for state in self.states.values() {
            self.check_acyclic(state.id)?;
        }

        Ok(())
    }

    fn validate_history(&self, history_id: VertexId, owner: VertexId) -> Result<(), TopologyError> {
        let history = match self.histories.get(&history_id) {
            Some(h) => h,
            None => {
                return Err(TopologyError::DanglingReference {
                    from: owner,
                    to: history_id,
                })
            }
        };
        if let Some(default_target) = history.default_target {
            if !self.states.contains_key(&default_target) {
                return Err(TopologyError::DanglingReference {
                    from: history_id,
                    to: default_target,
                });
            }
            if !self.is_descendant_unchecked(default_target, owner) {
                return Err(TopologyError::HistoryDefaultNotDescendant {
                    history: history_id,
                    owner,
                });
            }
        }
        Ok(())
    }

    /// `descendant` walks its `parent` chain up to `ancestor`. Assumes the
    /// parent graph is acyclic; cycle detection happens separately in
    /// [`Self::check_acyclic`], so a malformed input can only make this
    /// return `false` (never loop forever) because it is bounded by the
    /// number of registered states.
    fn is_descendant_unchecked(&self, descendant: VertexId, ancestor: VertexId) -> bool {
        let mut cursor = descendant;
        for _ in 0..=self.states.len() {
            if cursor == ancestor {
                return true;
            }
            match self.states.get(&cursor).and_then(|s| s.parent) {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
        false
    }

    fn check_acyclic(&self, start: VertexId) -> Result<(), TopologyError> {
        let mut cursor = start;
        let mut steps = 0usize;
        let bound = self.states.len() + 1;
        loop {
            match self.states.get(&cursor).and_then(|s| s.parent) {
                Some(parent) => {
                    cursor = parent;
                    steps += 1;
                    if steps > bound {
                        return Err(TopologyError::Cycle(start));
                    }
                }
                None => return Ok(()),
            }
        }
    }

    fn compute_depths(&mut self) {
        let ids: Vec<VertexId> = self.states.keys().copied().collect();
        for id in ids {
            let mut depth = 0u32;
            let mut cursor = self.states.get(&id).and_then(|s| s.parent);
            while let Some(parent) = cursor {
                depth += 1;
                cursor = self.states.get(&parent).and_then(|s| s.parent);
            }
            if let Some(state) = self.states.get_mut(&id) {
                state.depth = depth;
            }
        }
    }
}

/// Configures the single state identified at [`MachineBuilder::state`].
///
/// Every method consumes and returns `self` so calls chain; all of them
/// write directly into the owning builder's arena-in-progress.
pub struct StateBuilder<'a, C> {
    id: VertexId,
    builder: &'a mut MachineBuilder<C>,
}

impl<'a, C> StateBuilder<'a, C> {
    fn record(&mut self) -> &mut StateRecord<C> {
        self.builder.states.get_mut(&self.id).expect("state registered in MachineBuilder::state")
    }

    /// Set this state's parent. Leave unset for a top-level state.
    pub fn parent(mut self, parent: VertexId) -> Self {
        self.record().parent = Some(parent);
        self
    }

    /// Set this state's initial substate, marking it composite.
    pub fn initial(mut self, initial: VertexId) -> Self {
        self.record().initial = Some(initial);
        self
    }

    /// Attach a shallow-history pseudostate under `history_id`, owned by
    /// this state. `default_target`, if set, must be a descendant of this
    /// state; if unset the owner's `initial` is used.
    pub fn shallow_history(mut self, history_id: VertexId, default_target: Option<VertexId>) -> Self {
        let owner = self.id;
        self.builder
            .histories
            .insert(history_id, HistoryRecord::new(owner, HistoryFlavor::Shallow, default_target));
        self.record().shallow_history = Some(history_id);
        self
    }

    /// Attach a deep-history pseudostate under `history_id`, owned by this
    /// state. Same default-target rule as [`Self::shallow_history`].
    pub fn deep_history(mut self, history_id: VertexId, default_target: Option<VertexId>) -> Self {
        let owner = self.id;
        self.builder
            .histories
            .insert(history_id, HistoryRecord::new(owner, HistoryFlavor::Deep, default_target));
        self.record().deep_history = Some(history_id);
        self
    }

    /// Set the transition-matching predicate.
    pub fn on_match(mut self, f: MatchFn<C>) -> Self {
        self.record().match_fn = Some(f);
        self
    }

    /// Set the entry behavior.
    pub fn on_entry(mut self, f: EntryExitFn<C>) -> Self {
        self.record().entry_fn = Some(f);
        self
    }

    /// Set the exit behavior.
    pub fn on_exit(mut self, f: EntryExitFn<C>) -> Self {
        self.record().exit_fn = Some(f);
        self
    }

    /// Set the one-shot initialization hook.
    pub fn on_init(mut self, f: InitFn<C>) -> Self {
        self.record().init_fn = Some(f);
        self
    }

    /// Return to the owning [`MachineBuilder`] to configure another state,
    /// without binding the builder to a local variable:
    ///
    /// ```
    /// # use hsm_core::{MachineBuilder, ANONYMOUS_EVENT};
    /// let machine = MachineBuilder::<()>::new()
    ///     .state(0).initial(1).done()
    ///     .state(1).parent(0).done()
    ///     .finish(0, ANONYMOUS_EVENT)
    ///     .unwrap();
    /// # let _ = machine;
    /// ```
    pub fn done(self) -> &'a mut MachineBuilder<C> {
        self.builder
    }

    /// Forwards to [`MachineBuilder::build`], so a machine whose last
    /// configured state is the last one needed can be assembled without a
    /// separate binding for the builder.
    pub fn build(self, top_level_initial: VertexId, anonymous_event: EventId) -> Result<Machine<C>, TopologyError> {
        std::mem::take(self.builder).build(top_level_initial, anonymous_event)
    }
}
