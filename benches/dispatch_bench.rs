//! Benchmark for the dispatch protocol.
//!
//! Measures the cost of pure interpretation, sequencing, single-effect
//! dispatch, delegation through a carrier layer, and scoped operations.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use algeff::Signatures;
use algeff::algebra::{Algebra, Eff};
use algeff::effects::{
    Choose, ChooseCarrier, Error, ErrorCarrier, Lift, LiftCarrier, State, StateLayer, catch,
    choose, get, modify, throw,
};

fn benchmark_pure(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("pure");

    group.bench_function("pure_i32", |bencher| {
        bencher.iter(|| {
            let program: Eff<Lift, i32> = Eff::pure(black_box(42));
            black_box(LiftCarrier.run(program))
        });
    });

    group.finish();
}

fn benchmark_flat_map_chain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("flat_map_chain");

    for chain_length in [1, 10, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chain_length),
            &chain_length,
            |bencher, &length| {
                bencher.iter(|| {
                    let mut program: Eff<Lift, i32> = Eff::pure(1);
                    for _ in 0..length {
                        program = program.flat_map(|value| Eff::pure(value + 1));
                    }
                    black_box(LiftCarrier.run(program))
                });
            },
        );
    }

    group.finish();
}

fn benchmark_state_dispatch(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("state_dispatch");
    type Sig = Signatures![State<i64>, Lift];

    for operations in [10, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(operations),
            &operations,
            |bencher, &count| {
                bencher.iter(|| {
                    let mut program: Eff<Sig, ()> = Eff::pure(());
                    for _ in 0..count {
                        program = program.then(modify(|state: i64| state + 1));
                    }
                    let carrier = StateLayer::<i64, _>::new(LiftCarrier);
                    black_box(carrier.run_state(0, program.then(get())))
                });
            },
        );
    }

    group.finish();
}

fn benchmark_error_dispatch(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("error_dispatch");
    type Sig = Error<String>;

    group.bench_function("throw_short_circuit", |bencher| {
        bencher.iter(|| {
            let program: Eff<Sig, i32> =
                throw::<_, String, i32, _>(black_box("boom".to_string()))
                    .fmap(|value| value + 1);
            black_box(ErrorCarrier::<String>::new().run(program))
        });
    });

    group.bench_function("catch_recover", |bencher| {
        bencher.iter(|| {
            let program: Eff<Sig, i32> = catch(
                || throw(black_box("boom".to_string())),
                |error: String| Eff::pure(i32::try_from(error.len()).unwrap_or(0)),
            );
            black_box(ErrorCarrier::<String>::new().run(program))
        });
    });

    group.finish();
}

fn benchmark_choice_fanout(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("choice_fanout");

    for depth in [2, 6, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |bencher, &depth| {
            bencher.iter(|| {
                let mut program: Eff<Choose, u32> = Eff::pure(0);
                for _ in 0..depth {
                    program = program.flat_map(|count| {
                        choose().fmap(move |first| if first { count + 1 } else { count })
                    });
                }
                black_box(ChooseCarrier.run(program))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_pure,
    benchmark_flat_map_chain,
    benchmark_state_dispatch,
    benchmark_error_dispatch,
    benchmark_choice_fanout
);
criterion_main!(benches);
