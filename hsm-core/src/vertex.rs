/// The kind of a graph node in the state topology.
///
/// Every vertex is either a concrete [`State`](crate::StateInfo) or one of
/// the two history pseudostate flavors. Kind is fixed at construction and
/// never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// A concrete UML state, leaf or composite.
    State,
    /// A shallow-history pseudostate, see [`HistoryFlavor::Shallow`](crate::HistoryFlavor::Shallow).
    ShallowHistory,
    /// A deep-history pseudostate, see [`HistoryFlavor::Deep`](crate::HistoryFlavor::Deep).
    DeepHistory,
}
