use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hsm::{Machine, MachineBuilder, ANONYMOUS_EVENT};

// ============================================================================
// Hierarchy shared by these benchmarks:
//   S ⊃ { S1, S2 }, S2 ⊃ { S21, S22 }; initial: S -> S1
// ============================================================================

const S: u32 = 0;
const S1: u32 = 1;
const S2: u32 = 2;
const S21: u32 = 3;
const S22: u32 = 4;

const EVENT_SELF: u32 = 1;
const EVENT_LOCAL: u32 = 2;
const EVENT_EXTERNAL: u32 = 3;
const EVENT_INTERNAL: u32 = 4;

fn no_effect(_ctx: &mut ()) {}

fn build_machine() -> Machine<()> {
    MachineBuilder::<()>::new()
        .state(S)
        .initial(S1)
        .on_match(|b, event, _ctx| match event {
            EVENT_EXTERNAL => Some(b.external_with_effect(S22, no_effect)),
            EVENT_INTERNAL => Some(b.internal_with_effect(no_effect)),
            _ => None,
        })
        .done()
        .state(S1)
        .parent(S)
        .on_match(|b, event, _ctx| (event == EVENT_SELF).then(|| b.external_with_effect(S1, no_effect)))
        .done()
        .state(S2)
        .parent(S)
        .initial(S21)
        .on_match(|b, event, _ctx| (event == EVENT_LOCAL).then(|| b.local_with_effect(S21, no_effect)))
        .done()
        .state(S21)
        .parent(S2)
        .done()
        .state(S22)
        .parent(S2)
        .done()
        .finish(S, ANONYMOUS_EVENT)
        .expect("well-formed topology")
}

fn benchmark_construction(c: &mut Criterion) {
    c.bench_function("build_machine", |b| {
        b.iter(|| black_box(build_machine()));
    });
}

fn benchmark_init(c: &mut Criterion) {
    c.bench_function("init", |b| {
        b.iter(|| {
            let mut m = build_machine();
            black_box(m.init(&mut ()));
            black_box(m)
        });
    });
}

fn benchmark_self_external_transition(c: &mut Criterion) {
    let mut m = build_machine();
    m.init(&mut ());
    c.bench_function("self_external_transition", |b| {
        b.iter(|| black_box(m.dispatch(black_box(EVENT_SELF), &mut ())));
    });
}

fn benchmark_local_transition(c: &mut Criterion) {
    c.bench_function("local_transition", |b| {
        b.iter_batched(
            || {
                let mut m = build_machine();
                m.init(&mut ());
                m
            },
            |mut m| black_box(m.dispatch(black_box(EVENT_LOCAL), &mut ())),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn benchmark_external_transition_crossing_lca(c: &mut Criterion) {
    c.bench_function("external_transition_crossing_lca", |b| {
        b.iter_batched(
            || {
                let mut m = build_machine();
                m.init(&mut ());
                m
            },
            |mut m| black_box(m.dispatch(black_box(EVENT_EXTERNAL), &mut ())),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn benchmark_internal_transition(c: &mut Criterion) {
    let mut m = build_machine();
    m.init(&mut ());
    c.bench_function("internal_transition", |b| {
        b.iter(|| black_box(m.dispatch(black_box(EVENT_INTERNAL), &mut ())));
    });
}

fn benchmark_ignored_event(c: &mut Criterion) {
    let mut m = build_machine();
    m.init(&mut ());
    c.bench_function("ignored_event", |b| {
        b.iter(|| black_box(m.dispatch(black_box(999), &mut ())));
    });
}

criterion_group!(
    benches,
    benchmark_construction,
    benchmark_init,
    benchmark_self_external_transition,
    benchmark_local_transition,
    benchmark_external_transition_crossing_lca,
    benchmark_internal_transition,
    benchmark_ignored_event,
);
criterion_main!(benches);
