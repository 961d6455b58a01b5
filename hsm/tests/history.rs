//! Shallow vs. deep history, following the design notes' composite `H`:
//!
//! ```text
//! H  ⊃ { H1, H2 }
//! H1 ⊃ { H11, H12 }
//! H2 ⊃ { H21, H22 }
//! I  is a sibling top-level state
//! ```

use hsm::{HistoryFlavor, Machine, MachineBuilder, ANONYMOUS_EVENT};

const H: u32 = 0;
const H1: u32 = 1;
const H11: u32 = 2;
const H12: u32 = 3;
const H2: u32 = 4;
const H21: u32 = 5;
const H22: u32 = 6;
const I: u32 = 7;
const HIST: u32 = 20;

const EVENT_TO_H12: u32 = 1;
const EVENT_TO_I: u32 = 2;
const EVENT_TO_HISTORY: u32 = 3;

fn build(flavor: HistoryFlavor) -> Machine<()> {
    let mut b = MachineBuilder::<()>::new();
    b.state(H).initial(H1);
    match flavor {
        HistoryFlavor::Shallow => {
            b.state(H).shallow_history(HIST, None);
        }
        HistoryFlavor::Deep => {
            b.state(H).deep_history(HIST, None);
        }
    }
    b.state(H)
        .on_match(|builder, event, _ctx| (event == EVENT_TO_I).then(|| builder.external(I)));
    b.state(H1)
        .parent(H)
        .initial(H11)
        .on_match(|builder, event, _ctx| (event == EVENT_TO_H12).then(|| builder.external(H12)));
    b.state(H11).parent(H1);
    b.state(H12).parent(H1);
    b.state(H2).parent(H).initial(H21);
    b.state(H21).parent(H2);
    b.state(H22).parent(H2);
    b.state(I)
        .on_match(|builder, event, _ctx| (event == EVENT_TO_HISTORY).then(|| builder.external(HIST)));
    b.finish(H, ANONYMOUS_EVENT).expect("well-formed topology")
}

#[test]
fn shallow_history_defaults_to_owners_initial_before_any_activation() {
    let mut m = build(HistoryFlavor::Shallow);
    m.init(&mut ());
    assert_eq!(m.history_remembered(HIST), Some(H1));
}

#[test]
fn deep_history_defaults_to_the_deepest_leaf_before_any_activation() {
    let mut m = build(HistoryFlavor::Deep);
    m.init(&mut ());
    assert_eq!(m.history_remembered(HIST), Some(H11));
}

#[test]
fn shallow_history_resolves_to_the_remembered_direct_child() {
    let mut m = build(HistoryFlavor::Shallow);
    m.init(&mut ()); // -> H11
    assert_eq!(m.current_state(), H11);

    m.dispatch(EVENT_TO_H12, &mut ()); // -> H12
    assert_eq!(m.current_state(), H12);
    assert_eq!(m.history_remembered(HIST), Some(H1));

    m.dispatch(EVENT_TO_I, &mut ()); // -> I (leaves H entirely)
    assert_eq!(m.current_state(), I);

    m.dispatch(EVENT_TO_HISTORY, &mut ()); // -> H.history resolves to H1, descends to H11
    assert_eq!(m.current_state(), H11);
}

#[test]
fn deep_history_resolves_to_the_remembered_leaf() {
    let mut m = build(HistoryFlavor::Deep);
    m.init(&mut ()); // -> H11
    assert_eq!(m.current_state(), H11);

    m.dispatch(EVENT_TO_H12, &mut ()); // -> H12
    assert_eq!(m.current_state(), H12);
    assert_eq!(m.history_remembered(HIST), Some(H12));

    m.dispatch(EVENT_TO_I, &mut ()); // -> I
    assert_eq!(m.current_state(), I);

    m.dispatch(EVENT_TO_HISTORY, &mut ()); // -> H.history resolves straight to H12
    assert_eq!(m.current_state(), H12);
}
