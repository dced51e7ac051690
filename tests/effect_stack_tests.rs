//! Multi-effect stacks: carriers layered in different orders and the
//! behavior that falls out of context threading.

use algeff::Signatures;
use algeff::algebra::{Algebra, Eff};
use algeff::effects::{
    Choose, ChooseCarrier, Empty, Error, ErrorCarrier, ErrorLayer, Lift, LiftCarrier, NonDet,
    NonDetCarrier, Reader, ReaderLayer, RwsLayer, State, StateLayer, Writer, WriterLayer, ask,
    catch, choose, empty, get, lift, local, modify, put, tell, throw,
};
use rstest::rstest;

type Log = Vec<&'static str>;

#[rstest]
fn state_outside_error_discards_failed_branch_state() {
    type Sig = Signatures![State<i32>, Error<String>];
    let program: Eff<Sig, i32> = modify(|count: i32| count + 1)
        .then(catch(
            || modify(|count: i32| count + 10).then(throw("undo".to_string())),
            |_: String| Eff::pure(()),
        ))
        .then(get());

    let carrier = StateLayer::<i32, _>::new(ErrorCarrier::new());
    // Failure discards the scoped branch's context, and the state rides in
    // the context, so recovery resumes from the state at catch entry.
    assert_eq!(carrier.run_state(0, program), Ok((1, 1)));
}

#[rstest]
fn error_outside_state_keeps_failed_branch_state() {
    type Sig = Signatures![Error<String>, State<i32>, Lift];
    let program: Eff<Sig, i32> = modify(|count: i32| count + 1)
        .then(catch(
            || modify(|count: i32| count + 10).then(throw("undo".to_string())),
            |_: String| Eff::pure(()),
        ))
        .then(get());

    let carrier = ErrorLayer::<String, _>::new(StateLayer::new(LiftCarrier));
    assert_eq!(carrier.run(program).run(0), (11, Ok(11)));
}

#[rstest]
fn uncaught_throw_reaches_the_outer_result() {
    type Sig = Signatures![State<i32>, Error<String>];
    let program: Eff<Sig, i32> = put(9).then(throw("fatal".to_string()));
    let carrier = StateLayer::<i32, _>::new(ErrorCarrier::new());
    assert_eq!(carrier.run_state(0, program), Err("fatal".to_string()));
}

#[rstest]
fn writer_outside_error_keeps_log_from_failed_branch() {
    type Sig = Signatures![Writer<Log>, Error<String>];
    let program: Eff<Sig, i32> = tell(vec!["start"])
        .then(catch(
            || tell(vec!["doomed"]).then(throw("boom".to_string())),
            |_: String| tell(vec!["recovered"]).then(Eff::pure(5)),
        ))
        .flat_map(|value| tell(vec!["end"]).fmap(move |()| value));

    let carrier = WriterLayer::<Log, _>::new(ErrorCarrier::new());
    // The log travels in the context; the failed branch's entries vanish
    // with its context, the recovery branch's entries survive.
    assert_eq!(
        carrier.run(program),
        Ok((vec!["start", "recovered", "end"], 5))
    );
}

#[rstest]
fn state_forks_with_the_branches() {
    type Sig = Signatures![State<i32>, Choose];
    let carrier = StateLayer::<i32, _>::new(ChooseCarrier);
    let program: Eff<Sig, i32> = modify(|count: i32| count + 1).then(choose().flat_map(|first| {
        let increment = if first { 100 } else { 200 };
        modify(move |count: i32| count + increment).then(get())
    }));
    assert_eq!(
        carrier.run_state(0, program),
        vec![(101, 101), (201, 201)]
    );
}

#[rstest]
fn error_layer_over_nondet_records_failure_per_branch() {
    type Sig = Signatures![Error<String>, Empty, Choose];
    let carrier = ErrorLayer::<String, _>::new(NonDetCarrier);
    let failing: Eff<Sig, i32> = choose().flat_map(|first| {
        if first {
            throw("bad branch".to_string())
        } else {
            Eff::pure(2)
        }
    });
    // Failure lands inside the inner carrier's value, so each branch keeps
    // its own verdict.
    assert_eq!(
        carrier.run(failing),
        vec![Err("bad branch".to_string()), Ok(2)]
    );
}

#[rstest]
fn empty_prunes_branches_under_a_state_layer() {
    type Sig = Signatures![State<i32>, Empty, Choose];
    let carrier = StateLayer::<i32, _>::new(NonDetCarrier);
    let program: Eff<Sig, i32> = choose().flat_map(|keep| {
        if keep {
            put(1).then(get())
        } else {
            empty()
        }
    });
    assert_eq!(carrier.run_state(0, program), vec![(1, 1)]);
}

#[rstest]
fn rws_layer_matches_manually_nested_layers() {
    type Sig = Signatures![Reader<i32>, Writer<Log>, State<i32>, Lift];

    fn program() -> Eff<Sig, i32> {
        ask().flat_map(|environment: i32| {
            tell(vec!["saw env"])
                .then(modify(move |count: i32| count + environment))
                .then(local(
                    |environment: i32| environment * 2,
                    || ask().flat_map(|doubled: i32| tell(vec!["scoped"]).fmap(move |()| doubled)),
                ))
                .flat_map(|doubled| get().fmap(move |state: i32| state + doubled))
        })
    }

    let fused = RwsLayer::<i32, Log, i32, _>::new(LiftCarrier);
    let nested = ReaderLayer::<i32, _>::new(WriterLayer::<Log, _>::new(StateLayer::new(
        LiftCarrier,
    )));

    let fused_result = fused.run_rws(3, 10, program());
    let nested_result = nested.run_with(3, program()).run(10);
    assert_eq!(fused_result, (13, (vec!["saw env", "scoped"], 19)));
    assert_eq!(nested_result, (13, (vec!["saw env", "scoped"], 19)));
}

#[rstest]
fn lift_reaches_the_bottom_of_a_three_layer_stack() {
    type Sig = Signatures![Error<String>, State<i32>, Lift];
    let carrier = ErrorLayer::<String, _>::new(StateLayer::new(LiftCarrier));
    let program: Eff<Sig, i32> = put(2)
        .then(lift(|| 30))
        .flat_map(|lifted| get().fmap(move |state: i32| state + lifted));
    assert_eq!(carrier.run(program).run(0), (2, Ok(32)));
}

#[rstest]
fn nondet_alias_is_the_empty_choose_sum() {
    let program: Eff<NonDet, i32> = choose().flat_map(|first| {
        if first {
            Eff::pure(1)
        } else {
            choose().fmap(|second| if second { 2 } else { 3 })
        }
    });
    assert_eq!(NonDetCarrier.run(program), vec![1, 2, 3]);
}
