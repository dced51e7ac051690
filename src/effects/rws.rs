//! A combined reader/writer/state layer.
//!
//! [`RwsLayer`] owns `Reader<R>`, `Writer<W>` and `State<S>` at the head of
//! its sum in one carrier, with the action shape
//! `(R, S) -> Inner::Output<(S, (W, A))>`. Owning all three in one layer
//! avoids two levels of delegation for the common environment-log-state
//! stack; the observable behavior matches `ReaderLayer` over `WriterLayer`
//! over `StateLayer`.

use std::marker::PhantomData;

use crate::algebra::{
    Algebra, Carrier, Composed, Context, Eff, Erased, Handler, PairContext, Runner, Signature,
    Sum, SumOp, thread,
};
use crate::effects::reader::{Reader, ReaderOp};
use crate::effects::state::{State, StateOp};
use crate::effects::writer::{Writer, WriterOp};
use crate::typeclass::Monoid;

/// A combined reader/writer/state computation over the inner carrier.
pub struct RwsAction<R: 'static, W: 'static, S: 'static, C: Carrier, A: 'static> {
    run_function: Box<dyn FnOnce(R, S) -> C::Output<(S, (W, A))>>,
}

impl<R: 'static, W: 'static, S: 'static, C: Carrier, A: 'static> RwsAction<R, W, S, C, A> {
    /// Wraps an environment-and-state-threading function.
    #[must_use]
    pub fn new(run_function: impl FnOnce(R, S) -> C::Output<(S, (W, A))> + 'static) -> Self {
        Self {
            run_function: Box::new(run_function),
        }
    }

    /// Supplies the environment and the initial state.
    #[must_use]
    pub fn run(self, environment: R, state: S) -> C::Output<(S, (W, A))> {
        (self.run_function)(environment, state)
    }
}

/// Layers reader, writer and state over an inner carrier in one step.
///
/// # Examples
///
/// ```rust
/// use algeff::effects::{LiftCarrier, RwsLayer, ask, get, put, tell};
///
/// let carrier = RwsLayer::<i32, Vec<&str>, i32, _>::new(LiftCarrier);
/// let program = ask().flat_map(|environment: i32| {
///     tell(vec!["seen"]).then(put(environment * 2)).then(get())
/// });
/// assert_eq!(carrier.run_rws(21, 0, program), (42, (vec!["seen"], 42)));
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct RwsLayer<R: 'static, W: 'static, S: 'static, C> {
    inner: C,
    _marker: PhantomData<(R, W, S)>,
}

impl<R: 'static, W: 'static, S: 'static, C> RwsLayer<R, W, S, C> {
    /// Layers the combined effects over `inner`.
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<R: 'static, W: 'static, S: 'static, C: Clone> Clone for RwsLayer<R, W, S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R, W, S, C> RwsLayer<R, W, S, C>
where
    R: Clone + 'static,
    W: Monoid + Clone + 'static,
    S: Clone + 'static,
    C: Algebra,
{
    /// Runs a whole program under an environment and initial state,
    /// returning the final state, the log, and the result.
    #[must_use]
    pub fn run_rws<A: 'static>(
        &self,
        environment: R,
        initial: S,
        program: Eff<<Self as Algebra>::Sig, A>,
    ) -> C::Output<(S, (W, A))> {
        self.run(program).run(environment, initial)
    }
}

impl<R, W, S, C> Carrier for RwsLayer<R, W, S, C>
where
    R: Clone + 'static,
    W: Monoid + Clone + 'static,
    S: Clone + 'static,
    C: Carrier,
{
    type Output<A: 'static> = RwsAction<R, W, S, C, A>;

    fn pure<A: 'static>(&self, value: A) -> RwsAction<R, W, S, C, A> {
        let inner = self.inner.clone();
        RwsAction::new(move |_, state| inner.pure((state, (W::empty(), value))))
    }

    fn bind<A: 'static, B: 'static, F>(
        &self,
        action: RwsAction<R, W, S, C, A>,
        function: F,
    ) -> RwsAction<R, W, S, C, B>
    where
        F: Fn(A) -> RwsAction<R, W, S, C, B> + 'static,
    {
        let inner = self.inner.clone();
        RwsAction::new(move |environment: R, state: S| {
            let inner_map = inner.clone();
            inner.bind(
                action.run(environment.clone(), state),
                move |(next_state, (log, value)): (S, (W, A))| {
                    let log = log.clone();
                    inner_map.map(
                        function(value).run(environment.clone(), next_state),
                        move |(final_state, (more, result)): (S, (W, B))| {
                            (final_state, (log.clone().combine(more), result))
                        },
                    )
                },
            )
        })
    }
}

/// The delegation runner for [`RwsLayer`]: supplies the captured environment
/// and re-threads state and log around forwarded actions.
pub struct RwsRunner<R: 'static, W: 'static, S: 'static, C> {
    environment: R,
    inner: C,
    _marker: PhantomData<(W, S)>,
}

impl<R: Clone + 'static, W: 'static, S: 'static, C: Clone> Clone for RwsRunner<R, W, S, C> {
    fn clone(&self) -> Self {
        Self {
            environment: self.environment.clone(),
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R, W, S, C> Runner for RwsRunner<R, W, S, C>
where
    R: Clone + 'static,
    W: Monoid + Clone + 'static,
    S: Clone + 'static,
    C: Algebra,
{
    type Outer = RwsLayer<R, W, S, C>;
    type Inner = C;
    type LayerCtx = Composed<PairContext<S>, PairContext<W>>;

    fn inner(&self) -> &C {
        &self.inner
    }

    fn resume<T: 'static>(
        &self,
        wrapped: (S, (W, RwsAction<R, W, S, C, T>)),
    ) -> C::Output<(S, (W, T))> {
        let (state, (log, action)) = wrapped;
        self.inner.map(
            action.run(self.environment.clone(), state),
            move |(next_state, (more, value)): (S, (W, T))| {
                (next_state, (log.clone().combine(more), value))
            },
        )
    }
}

impl<R, W, S, C> Algebra for RwsLayer<R, W, S, C>
where
    R: Clone + 'static,
    W: Monoid + Clone + 'static,
    S: Clone + 'static,
    C: Algebra,
{
    type Sig = Sum<Reader<R>, Sum<Writer<W>, Sum<State<S>, C::Sig>>>;

    #[allow(clippy::too_many_lines)]
    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: <Self::Sig as Signature>::Op<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> RwsAction<R, W, S, C, <H::Ctx as Context>::Apply<A>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            SumOp::Left(ReaderOp::Ask { continue_with }) => {
                let handler = handler.clone();
                RwsAction::new(move |environment: R, state: S| {
                    handler
                        .handle(<H::Ctx as Context>::map(context, |()| {
                            continue_with(environment.clone())
                        }))
                        .run(environment, state)
                })
            }
            SumOp::Left(ReaderOp::Local {
                modify,
                scoped,
                continue_with,
            }) => {
                let handler = handler.clone();
                let inner = self.inner.clone();
                RwsAction::new(move |environment: R, state: S| {
                    let first = handler
                        .handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()))
                        .run(modify(environment.clone()), state);
                    let resume_handler = handler.clone();
                    let inner_map = inner.clone();
                    inner.bind(first, move |(mid_state, (log, ctx_scoped))| {
                        let continue_with = continue_with.clone();
                        let rest = resume_handler
                            .handle(<H::Ctx as Context>::map(ctx_scoped, move |value| {
                                continue_with(value)
                            }))
                            .run(environment.clone(), mid_state);
                        let log = log.clone();
                        inner_map.map(rest, move |(final_state, (more, ctx_value))| {
                            (final_state, (log.clone().combine(more), ctx_value))
                        })
                    })
                })
            }
            SumOp::Right(SumOp::Left(WriterOp::Tell {
                output,
                continue_with,
            })) => {
                let handler = handler.clone();
                let inner = self.inner.clone();
                RwsAction::new(move |environment: R, state: S| {
                    let rest = handler
                        .handle(<H::Ctx as Context>::map(context, |()| continue_with(())))
                        .run(environment, state);
                    inner.map(rest, move |(final_state, (log, ctx_value))| {
                        (final_state, (output.clone().combine(log), ctx_value))
                    })
                })
            }
            SumOp::Right(SumOp::Left(WriterOp::Listen {
                scoped,
                continue_with,
            })) => {
                let handler = handler.clone();
                let inner = self.inner.clone();
                RwsAction::new(move |environment: R, state: S| {
                    let first = handler
                        .handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()))
                        .run(environment.clone(), state);
                    let resume_handler = handler.clone();
                    let inner_map = inner.clone();
                    inner.bind(first, move |(mid_state, (log, ctx_scoped))| {
                        let continue_with = continue_with.clone();
                        let observed = log.clone();
                        let rest = resume_handler
                            .handle(<H::Ctx as Context>::map(ctx_scoped, move |value| {
                                continue_with((observed, value))
                            }))
                            .run(environment.clone(), mid_state);
                        let log = log.clone();
                        inner_map.map(rest, move |(final_state, (more, ctx_value))| {
                            (final_state, (log.clone().combine(more), ctx_value))
                        })
                    })
                })
            }
            SumOp::Right(SumOp::Left(WriterOp::Censor {
                transform,
                scoped,
                continue_with,
            })) => {
                let handler = handler.clone();
                let inner = self.inner.clone();
                RwsAction::new(move |environment: R, state: S| {
                    let first = handler
                        .handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()))
                        .run(environment.clone(), state);
                    let resume_handler = handler.clone();
                    let inner_map = inner.clone();
                    inner.bind(first, move |(mid_state, (log, ctx_scoped))| {
                        let continue_with = continue_with.clone();
                        let rest = resume_handler
                            .handle(<H::Ctx as Context>::map(ctx_scoped, move |value| {
                                continue_with(value)
                            }))
                            .run(environment.clone(), mid_state);
                        let transform = transform.clone();
                        let log = log.clone();
                        inner_map.map(rest, move |(final_state, (more, ctx_value))| {
                            (final_state, (transform(log.clone()).combine(more), ctx_value))
                        })
                    })
                })
            }
            SumOp::Right(SumOp::Right(SumOp::Left(StateOp::Get {
                continue_with,
                _nested,
            }))) => {
                let handler = handler.clone();
                RwsAction::new(move |environment: R, state: S| {
                    handler
                        .handle(<H::Ctx as Context>::map(context, |()| {
                            continue_with(state.clone())
                        }))
                        .run(environment, state)
                })
            }
            SumOp::Right(SumOp::Right(SumOp::Left(StateOp::Put {
                state: new_state,
                continue_with,
            }))) => {
                let handler = handler.clone();
                RwsAction::new(move |environment: R, _: S| {
                    handler
                        .handle(<H::Ctx as Context>::map(context, |()| continue_with(())))
                        .run(environment, new_state)
                })
            }
            SumOp::Right(SumOp::Right(SumOp::Right(forwarded))) => {
                let handler = handler.clone();
                let inner = self.inner.clone();
                RwsAction::new(move |environment: R, state: S| {
                    let runner = RwsRunner {
                        environment,
                        inner: inner.clone(),
                        _marker: PhantomData,
                    };
                    thread(&runner, &handler, forwarded, (state, (W::empty(), context)))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::Signatures;
    use crate::effects::lift::{Lift, LiftCarrier, lift};
    use crate::effects::reader::{ask, local};
    use crate::effects::state::{get, modify, put};
    use crate::effects::writer::{listen, tell};

    type Log = Vec<&'static str>;
    type Stack = Signatures![Reader<i32>, Writer<Log>, State<i32>, Lift];

    fn carrier() -> RwsLayer<i32, Log, i32, LiftCarrier> {
        RwsLayer::new(LiftCarrier)
    }

    #[rstest]
    fn all_three_effects_cooperate() {
        let program: Eff<Stack, i32> = ask().flat_map(|environment: i32| {
            tell(vec!["env"])
                .then(modify(move |count: i32| count + environment))
                .then(get())
        });
        assert_eq!(
            carrier().run_rws(5, 1, program),
            (6, (vec!["env"], 6))
        );
    }

    #[rstest]
    fn local_keeps_state_and_log_flowing() {
        let program: Eff<Stack, (i32, i32)> = local(
            |environment: i32| environment * 10,
            || {
                ask().flat_map(|scoped_env: i32| {
                    tell(vec!["scoped"]).then(put(scoped_env)).fmap(move |()| scoped_env)
                })
            },
        )
        .flat_map(|scoped_env| get().fmap(move |state: i32| (scoped_env, state)));
        assert_eq!(
            carrier().run_rws(2, 0, program),
            (20, (vec!["scoped"], (20, 20)))
        );
    }

    #[rstest]
    fn listen_observes_scoped_log_only() {
        let program: Eff<Stack, ((), Log)> = tell(vec!["outside"])
            .then(listen(|| tell(vec!["inside"])));
        let (state, (log, (_, observed))) = carrier().run_rws(0, 9, program);
        assert_eq!(state, 9);
        assert_eq!(log, vec!["outside", "inside"]);
        assert_eq!(observed, vec!["inside"]);
    }

    #[rstest]
    fn forwarded_lift_runs_under_the_stack() {
        let program: Eff<Stack, i32> = put(3)
            .then(lift(|| 4))
            .flat_map(|lifted| get().fmap(move |state: i32| state * 10 + lifted));
        assert_eq!(carrier().run_rws(0, 0, program), (3, (Vec::new(), 34)));
    }
}
