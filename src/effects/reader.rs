//! The reader effect: an immutable environment with scoped modification.
//!
//! `ask` reads the ambient environment; `local` runs a scoped body under a
//! modified environment and restores the original afterwards.
//! [`ReaderCarrier`] interprets into a function from the environment;
//! [`ReaderLayer`] stacks the same shape over an inner carrier, delegating
//! tail operations with an environment-capturing runner.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::algebra::{
    Algebra, Carrier, Context, Eff, EndoFn, Erased, Handler, IdContext, Kont, Member, Runner,
    Signature, Sum, SumOp, Thunk, compose_continuation, downcast_continuation, thread,
};

/// The reader signature over environments of type `R`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reader<R: 'static> {
    _environment: PhantomData<R>,
}

/// Operations of [`Reader`].
pub enum ReaderOp<R: 'static, M: 'static, K: 'static> {
    /// Read the environment.
    Ask {
        /// The rest of the program.
        continue_with: Kont<R, K>,
    },
    /// Run `scoped` under `modify(environment)`, then restore.
    Local {
        /// The environment modification, scoped to the body.
        modify: EndoFn<R>,
        /// The body run under the modified environment.
        scoped: Thunk<M>,
        /// The rest of the program, run under the original environment.
        continue_with: Kont<Erased, K>,
    },
}

impl<R: 'static, M: 'static, K: 'static> Clone for ReaderOp<R, M, K> {
    fn clone(&self) -> Self {
        match self {
            Self::Ask { continue_with } => Self::Ask {
                continue_with: continue_with.clone(),
            },
            Self::Local {
                modify,
                scoped,
                continue_with,
            } => Self::Local {
                modify: modify.clone(),
                scoped: scoped.clone(),
                continue_with: continue_with.clone(),
            },
        }
    }
}

impl<R: 'static> Signature for Reader<R> {
    type Op<M: 'static, K: 'static> = ReaderOp<R, M, K>;

    fn map_continuation<M: 'static, K: 'static, L: 'static>(
        operation: ReaderOp<R, M, K>,
        function: Rc<dyn Fn(K) -> L>,
    ) -> ReaderOp<R, M, L> {
        match operation {
            ReaderOp::Ask { continue_with } => ReaderOp::Ask {
                continue_with: compose_continuation(continue_with, function),
            },
            ReaderOp::Local {
                modify,
                scoped,
                continue_with,
            } => ReaderOp::Local {
                modify,
                scoped,
                continue_with: compose_continuation(continue_with, function),
            },
        }
    }

    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        operation: ReaderOp<R, M1, K>,
        function: Rc<dyn Fn(M1) -> M2>,
    ) -> ReaderOp<R, M2, K> {
        match operation {
            ReaderOp::Ask { continue_with } => ReaderOp::Ask { continue_with },
            ReaderOp::Local {
                modify,
                scoped,
                continue_with,
            } => ReaderOp::Local {
                modify,
                scoped: Rc::new(move || function(scoped())),
                continue_with,
            },
        }
    }

    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        operation: ReaderOp<R, M1, K>,
        context: C::Apply<()>,
        function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> ReaderOp<R, M2, K>
    where
        C::Apply<()>: Clone,
    {
        match operation {
            ReaderOp::Ask { continue_with } => ReaderOp::Ask { continue_with },
            ReaderOp::Local {
                modify,
                scoped,
                continue_with,
            } => ReaderOp::Local {
                modify,
                scoped: Rc::new(move || function(C::map(context.clone(), |()| scoped()))),
                continue_with,
            },
        }
    }
}

/// Reads the ambient environment.
#[must_use]
pub fn ask<Sig, R, Index>() -> Eff<Sig, R>
where
    Sig: Member<Reader<R>, Index>,
    R: 'static,
{
    Eff::send(ReaderOp::Ask {
        continue_with: Rc::new(Eff::Pure),
    })
}

/// Reads a projection of the environment.
#[must_use]
pub fn asks<Sig, R, A, Index, F>(projection: F) -> Eff<Sig, A>
where
    Sig: Member<Reader<R>, Index>,
    R: 'static,
    A: 'static,
    F: Fn(R) -> A + 'static,
{
    ask().fmap(projection)
}

/// Runs `scoped` under a modified environment, restoring the original for
/// the rest of the program.
///
/// # Examples
///
/// ```rust
/// use algeff::effects::{Reader, ReaderCarrier, ask, local};
///
/// let program = local(|e: i32| e * 10, || ask()).flat_map(|inner| {
///     ask().fmap(move |outer: i32| (inner, outer))
/// });
/// assert_eq!(ReaderCarrier::new().run_with(4, program), (40, 4));
/// ```
#[must_use]
pub fn local<Sig, R, A, Index, F, P>(modify: F, scoped: P) -> Eff<Sig, A>
where
    Sig: Member<Reader<R>, Index>,
    R: 'static,
    A: 'static,
    F: Fn(R) -> R + 'static,
    P: Fn() -> Eff<Sig, A> + 'static,
{
    Eff::send(ReaderOp::Local {
        modify: Rc::new(modify),
        scoped: Rc::new(move || scoped().erase()),
        continue_with: downcast_continuation::<Sig, A>(),
    })
}

/// A carried reader computation: a function awaiting the environment.
pub struct EnvReader<R: 'static, A: 'static> {
    run_function: Box<dyn FnOnce(R) -> A>,
}

impl<R: 'static, A: 'static> EnvReader<R, A> {
    /// Wraps a function from the environment.
    #[must_use]
    pub fn new(run_function: impl FnOnce(R) -> A + 'static) -> Self {
        Self {
            run_function: Box::new(run_function),
        }
    }

    /// Supplies the environment and extracts the result.
    #[must_use]
    pub fn run(self, environment: R) -> A {
        (self.run_function)(environment)
    }
}

/// Interprets [`Reader`] into a function from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderCarrier<R: 'static> {
    _environment: PhantomData<R>,
}

impl<R: Clone + 'static> ReaderCarrier<R> {
    /// Creates the carrier.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _environment: PhantomData,
        }
    }

    /// Runs a whole program under the given environment.
    #[must_use]
    pub fn run_with<A: 'static>(&self, environment: R, program: Eff<Reader<R>, A>) -> A {
        self.run(program).run(environment)
    }
}

impl<R: Clone + 'static> Carrier for ReaderCarrier<R> {
    type Output<A: 'static> = EnvReader<R, A>;

    fn pure<A: 'static>(&self, value: A) -> EnvReader<R, A> {
        EnvReader::new(move |_| value)
    }

    fn bind<A: 'static, B: 'static, F>(&self, action: EnvReader<R, A>, function: F) -> EnvReader<R, B>
    where
        F: Fn(A) -> EnvReader<R, B> + 'static,
    {
        EnvReader::new(move |environment: R| {
            function(action.run(environment.clone())).run(environment)
        })
    }
}

impl<R: Clone + 'static> Algebra for ReaderCarrier<R> {
    type Sig = Reader<R>;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: ReaderOp<R, Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> EnvReader<R, <H::Ctx as Context>::Apply<A>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            ReaderOp::Ask { continue_with } => {
                let handler = handler.clone();
                EnvReader::new(move |environment: R| {
                    let resumed = <H::Ctx as Context>::map(context, |()| {
                        continue_with(environment.clone())
                    });
                    handler.handle(resumed).run(environment)
                })
            }
            ReaderOp::Local {
                modify,
                scoped,
                continue_with,
            } => {
                let handler = handler.clone();
                EnvReader::new(move |environment: R| {
                    let ctx_scoped = handler
                        .handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()))
                        .run(modify(environment.clone()));
                    handler
                        .handle(<H::Ctx as Context>::map(ctx_scoped, move |value| {
                            continue_with(value)
                        }))
                        .run(environment)
                })
            }
        }
    }
}

/// A layered reader computation: a function from the environment into the
/// inner carrier.
pub struct ReaderAction<R: 'static, C: Carrier, A: 'static> {
    run_function: Box<dyn FnOnce(R) -> C::Output<A>>,
}

impl<R: 'static, C: Carrier, A: 'static> ReaderAction<R, C, A> {
    /// Wraps a function from the environment.
    #[must_use]
    pub fn new(run_function: impl FnOnce(R) -> C::Output<A> + 'static) -> Self {
        Self {
            run_function: Box::new(run_function),
        }
    }

    /// Supplies the environment.
    #[must_use]
    pub fn run(self, environment: R) -> C::Output<A> {
        (self.run_function)(environment)
    }
}

/// Layers a reader over an inner carrier.
#[derive(Debug, PartialEq, Eq)]
pub struct ReaderLayer<R: 'static, C> {
    inner: C,
    _environment: PhantomData<R>,
}

impl<R: 'static, C> ReaderLayer<R, C> {
    /// Layers a reader over `inner`.
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self {
            inner,
            _environment: PhantomData,
        }
    }
}

impl<R: 'static, C: Clone> Clone for ReaderLayer<R, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _environment: PhantomData,
        }
    }
}

impl<R: Clone + 'static, C: Algebra> ReaderLayer<R, C> {
    /// Runs a whole program under the given environment.
    #[must_use]
    pub fn run_with<A: 'static>(
        &self,
        environment: R,
        program: Eff<<Self as Algebra>::Sig, A>,
    ) -> C::Output<A> {
        self.run(program).run(environment)
    }
}

impl<R: Clone + 'static, C: Carrier> Carrier for ReaderLayer<R, C> {
    type Output<A: 'static> = ReaderAction<R, C, A>;

    fn pure<A: 'static>(&self, value: A) -> ReaderAction<R, C, A> {
        let inner = self.inner.clone();
        ReaderAction::new(move |_| inner.pure(value))
    }

    fn bind<A: 'static, B: 'static, F>(
        &self,
        action: ReaderAction<R, C, A>,
        function: F,
    ) -> ReaderAction<R, C, B>
    where
        F: Fn(A) -> ReaderAction<R, C, B> + 'static,
    {
        let inner = self.inner.clone();
        ReaderAction::new(move |environment: R| {
            inner.bind(action.run(environment.clone()), move |value| {
                function(value).run(environment.clone())
            })
        })
    }
}

/// The delegation runner for [`ReaderLayer`]: supplies the captured
/// environment when resuming forwarded actions.
pub struct ReaderRunner<R: 'static, C> {
    environment: R,
    inner: C,
}

impl<R: Clone + 'static, C: Clone> Clone for ReaderRunner<R, C> {
    fn clone(&self) -> Self {
        Self {
            environment: self.environment.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<R: Clone + 'static, C: Algebra> Runner for ReaderRunner<R, C> {
    type Outer = ReaderLayer<R, C>;
    type Inner = C;
    type LayerCtx = IdContext;

    fn inner(&self) -> &C {
        &self.inner
    }

    fn resume<T: 'static>(&self, wrapped: ReaderAction<R, C, T>) -> C::Output<T> {
        wrapped.run(self.environment.clone())
    }
}

impl<R: Clone + 'static, C: Algebra> Algebra for ReaderLayer<R, C> {
    type Sig = Sum<Reader<R>, C::Sig>;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: <Self::Sig as Signature>::Op<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> ReaderAction<R, C, <H::Ctx as Context>::Apply<A>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            SumOp::Left(ReaderOp::Ask { continue_with }) => {
                let handler = handler.clone();
                ReaderAction::new(move |environment: R| {
                    handler
                        .handle(<H::Ctx as Context>::map(context, |()| {
                            continue_with(environment.clone())
                        }))
                        .run(environment)
                })
            }
            SumOp::Left(ReaderOp::Local {
                modify,
                scoped,
                continue_with,
            }) => {
                let handler = handler.clone();
                let inner = self.inner.clone();
                ReaderAction::new(move |environment: R| {
                    let first = handler
                        .handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()))
                        .run(modify(environment.clone()));
                    let resume_handler = handler.clone();
                    inner.bind(first, move |ctx_scoped| {
                        let continue_with = continue_with.clone();
                        resume_handler
                            .handle(<H::Ctx as Context>::map(ctx_scoped, move |value| {
                                continue_with(value)
                            }))
                            .run(environment.clone())
                    })
                })
            }
            SumOp::Right(forwarded) => {
                let handler = handler.clone();
                let inner = self.inner.clone();
                ReaderAction::new(move |environment: R| {
                    let runner = ReaderRunner {
                        environment,
                        inner: inner.clone(),
                    };
                    thread(&runner, &handler, forwarded, context)
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

    #[rstest]
    fn ask_reads_the_environment() {
        let program: Eff<Reader<i32>, i32> = ask().fmap(|environment: i32| environment + 1);
        assert_eq!(ReaderCarrier::new().run_with(41, program), 42);
    }

    #[rstest]
    fn asks_projects_the_environment() {
        let program: Eff<Reader<String>, usize> = asks(|environment: String| environment.len());
        assert_eq!(ReaderCarrier::new().run_with("four".to_string(), program), 4);
    }

    #[rstest]
    fn local_restores_the_environment() {
        let program: Eff<Reader<i32>, (i32, i32)> =
            local(|environment: i32| environment * 10, || ask())
                .flat_map(|scoped| ask().fmap(move |outer: i32| (scoped, outer)));
        assert_eq!(ReaderCarrier::new().run_with(4, program), (40, 4));
    }

    #[rstest]
    fn nested_local_compose() {
        let program: Eff<Reader<i32>, i32> =
            local(|environment: i32| environment + 1, || {
                local(|environment: i32| environment * 2, || ask())
            });
        assert_eq!(ReaderCarrier::new().run_with(3, program), 8);
    }

    #[rstest]
    fn layer_forwards_and_supplies_environment() {
        type Stack = Signatures![Reader<i32>, Lift];
        let carrier = ReaderLayer::<i32, _>::new(LiftCarrier);
        let program: Eff<Stack, i32> =
            ask().flat_map(|environment: i32| lift(move || environment * 2));
        assert_eq!(carrier.run_with(21, program), 42);
    }

    #[rstest]
    fn layered_local_scopes_forwarded_reads() {
        type Stack = Signatures![Reader<i32>, Lift];
        let carrier = ReaderLayer::<i32, _>::new(LiftCarrier);
        let program: Eff<Stack, (i32, i32)> =
            local(|environment: i32| environment + 5, || ask())
                .flat_map(|scoped| ask().fmap(move |outer: i32| (scoped, outer)));
        assert_eq!(carrier.run_with(1, program), (6, 1));
    }

    mod nested_functor_laws {
        use super::*;

        fn local_operation() -> ReaderOp<i32, i32, i32> {
            ReaderOp::Local {
                modify: Rc::new(|environment: i32| environment + 1),
                scoped: Rc::new(|| 10),
                continue_with: Rc::new(|_: Erased| 0),
            }
        }

        fn observe_scope(operation: ReaderOp<i32, i32, i32>) -> i32 {
            match operation {
                ReaderOp::Local { scoped, .. } => scoped(),
                ReaderOp::Ask { .. } => panic!("expected a local operation"),
            }
        }

        #[rstest]
        fn map_nested_obeys_identity_and_composition() {
            let identity =
                Reader::<i32>::map_nested(local_operation(), Rc::new(|nested: i32| nested));
            assert_eq!(observe_scope(identity), observe_scope(local_operation()));

            let staged = Reader::<i32>::map_nested(
                Reader::<i32>::map_nested(local_operation(), Rc::new(|nested: i32| nested + 1)),
                Rc::new(|nested: i32| nested * 2),
            );
            let fused = Reader::<i32>::map_nested(
                local_operation(),
                Rc::new(|nested: i32| (nested + 1) * 2),
            );
            assert_eq!(observe_scope(staged), observe_scope(fused));
        }

        #[rstest]
        fn thread_nested_with_identity_context_matches_map_nested() {
            let double: Rc<dyn Fn(i32) -> i32> = Rc::new(|nested| nested * 2);
            let mapped = Reader::<i32>::map_nested(local_operation(), double.clone());
            let threaded = Reader::<i32>::thread_nested::<IdContext, i32, i32, i32>(
                local_operation(),
                (),
                double,
            );
            assert_eq!(observe_scope(mapped), observe_scope(threaded));
        }
    }
}
