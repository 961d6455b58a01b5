use crate::VertexId;

/// The two flavors of history pseudostate.
///
/// Both remember a descendant of the owning composite; they differ only in
/// which descendant they remember and how it is computed at machine
/// initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryFlavor {
    /// Remembers the direct child of the owning composite that was most
    /// recently on the active path.
    Shallow,
    /// Remembers the deepest leaf that was most recently active beneath
    /// the owning composite.
    Deep,
}

/// Internal storage for a history pseudostate.
///
/// `remembered` is the only field the dispatcher ever mutates after
/// construction, and only via [`crate::machine::Machine`]'s post-commit
/// history update (see the crate-level design notes on history).
#[derive(Debug, Clone, Copy)]
pub(crate) struct HistoryRecord {
    pub(crate) owner: VertexId,
    pub(crate) flavor: HistoryFlavor,
    pub(crate) default_target: Option<VertexId>,
    pub(crate) remembered: Option<VertexId>,
}

impl HistoryRecord {
    pub(crate) fn new(owner: VertexId, flavor: HistoryFlavor, default_target: Option<VertexId>) -> Self {
        Self {
            owner,
            flavor,
            default_target,
            remembered: None,
        }
    }
}
