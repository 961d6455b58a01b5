//! `MachineBuilder::build`/`finish` must reject every malformed topology
//! with the matching [`TopologyError`] variant, and never panic on
//! well-typed but ill-formed input.

use hsm::{MachineBuilder, TopologyError, ANONYMOUS_EVENT};

#[test]
fn self_parent_is_rejected() {
    let err = MachineBuilder::<()>::new()
        .state(0)
        .parent(0)
        .finish(0, ANONYMOUS_EVENT)
        .unwrap_err();
    assert_eq!(err, TopologyError::SelfParent(0));
}

#[test]
fn self_initial_is_rejected() {
    let err = MachineBuilder::<()>::new()
        .state(0)
        .initial(0)
        .finish(0, ANONYMOUS_EVENT)
        .unwrap_err();
    assert_eq!(err, TopologyError::SelfInitial(0));
}

#[test]
fn initial_not_descendant_is_rejected() {
    let err = MachineBuilder::<()>::new()
        .state(0)
        .initial(1)
        .done()
        .state(1)
        .done()
        .finish(0, ANONYMOUS_EVENT)
        .unwrap_err();
    assert_eq!(
        err,
        TopologyError::InitialNotDescendant {
            state: 0,
            initial: 1
        }
    );
}

#[test]
fn composite_without_initial_is_rejected() {
    let err = MachineBuilder::<()>::new()
        .state(0)
        .done()
        .state(1)
        .parent(0)
        .finish(0, ANONYMOUS_EVENT)
        .unwrap_err();
    assert_eq!(err, TopologyError::CompositeWithoutInitial(0));
}

#[test]
fn parent_cycle_is_rejected() {
    let err = MachineBuilder::<()>::new()
        .state(0)
        .parent(1)
        .initial(1)
        .done()
        .state(1)
        .parent(0)
        .initial(0)
        .finish(0, ANONYMOUS_EVENT)
        .unwrap_err();
    assert!(matches!(err, TopologyError::Cycle(_) | TopologyError::SelfParent(_)));
}

#[test]
fn dangling_parent_reference_is_rejected() {
    let err = MachineBuilder::<()>::new()
        .state(0)
        .parent(99)
        .finish(0, ANONYMOUS_EVENT)
        .unwrap_err();
    assert_eq!(err, TopologyError::DanglingReference { from: 0, to: 99 });
}

#[test]
fn dangling_initial_reference_is_rejected() {
    let err = MachineBuilder::<()>::new()
        .state(0)
        .initial(99)
        .finish(0, ANONYMOUS_EVENT)
        .unwrap_err();
    assert_eq!(err, TopologyError::DanglingReference { from: 0, to: 99 });
}

#[test]
fn history_default_not_descendant_is_rejected() {
    let err = MachineBuilder::<()>::new()
        .state(0)
        .initial(1)
        .shallow_history(10, Some(2))
        .done()
        .state(1)
        .parent(0)
        .done()
        .state(2)
        .finish(0, ANONYMOUS_EVENT)
        .unwrap_err();
    assert_eq!(
        err,
        TopologyError::HistoryDefaultNotDescendant { history: 10, owner: 0 }
    );
}

#[test]
fn missing_top_level_initial_is_rejected() {
    let err = MachineBuilder::<()>::new().state(0).finish(7, ANONYMOUS_EVENT).unwrap_err();
    assert_eq!(err, TopologyError::MissingTopLevelInitial(7));
}

#[test]
fn well_formed_topology_builds_successfully() {
    let result = MachineBuilder::<()>::new()
        .state(0)
        .initial(1)
        .done()
        .state(1)
        .parent(0)
        .finish(0, ANONYMOUS_EVENT);
    assert!(result.is_ok());
}
