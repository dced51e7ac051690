//! The writer effect: accumulated output over a [`Monoid`].
//!
//! `tell` appends to the log; `listen` additionally exposes the log of a
//! scoped body to the program; `censor` rewrites the log of a scoped body on
//! the way out. Logs combine accumulated-then-new, so output appears in
//! program order. [`WriterCarrier`] interprets into `(W, A)`;
//! [`WriterLayer`] stacks the same shape over an inner carrier with a
//! [`PairContext`] of the log.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::algebra::{
    Algebra, Carrier, Context, Eff, EndoFn, Erased, Handler, Kont, Member, PairContext, Runner,
    Signature, Sum, SumOp, Thunk, compose_continuation, downcast_continuation, thread,
};
use crate::typeclass::Monoid;

/// The writer signature over logs of type `W`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Writer<W: 'static> {
    _log: PhantomData<W>,
}

/// Operations of [`Writer`].
pub enum WriterOp<W: 'static, M: 'static, K: 'static> {
    /// Append to the log.
    Tell {
        /// The appended output.
        output: W,
        /// The rest of the program.
        continue_with: Kont<(), K>,
    },
    /// Run `scoped`, exposing its log alongside its result.
    Listen {
        /// The observed body.
        scoped: Thunk<M>,
        /// The rest of the program, fed the body's log and result.
        continue_with: Kont<(W, Erased), K>,
    },
    /// Run `scoped`, rewriting its log on the way out.
    Censor {
        /// The log rewrite, applied to the body's output only.
        transform: EndoFn<W>,
        /// The censored body.
        scoped: Thunk<M>,
        /// The rest of the program.
        continue_with: Kont<Erased, K>,
    },
}

impl<W: Clone + 'static, M: 'static, K: 'static> Clone for WriterOp<W, M, K> {
    fn clone(&self) -> Self {
        match self {
            Self::Tell {
                output,
                continue_with,
            } => Self::Tell {
                output: output.clone(),
                continue_with: continue_with.clone(),
            },
            Self::Listen {
                scoped,
                continue_with,
            } => Self::Listen {
                scoped: scoped.clone(),
                continue_with: continue_with.clone(),
            },
            Self::Censor {
                transform,
                scoped,
                continue_with,
            } => Self::Censor {
                transform: transform.clone(),
                scoped: scoped.clone(),
                continue_with: continue_with.clone(),
            },
        }
    }
}

impl<W: 'static> Signature for Writer<W> {
    type Op<M: 'static, K: 'static> = WriterOp<W, M, K>;

    fn map_continuation<M: 'static, K: 'static, L: 'static>(
        operation: WriterOp<W, M, K>,
        function: Rc<dyn Fn(K) -> L>,
    ) -> WriterOp<W, M, L> {
        match operation {
            WriterOp::Tell {
                output,
                continue_with,
            } => WriterOp::Tell {
                output,
                continue_with: compose_continuation(continue_with, function),
            },
            WriterOp::Listen {
                scoped,
                continue_with,
            } => WriterOp::Listen {
                scoped,
                continue_with: compose_continuation(continue_with, function),
            },
            WriterOp::Censor {
                transform,
                scoped,
                continue_with,
            } => WriterOp::Censor {
                transform,
                scoped,
                continue_with: compose_continuation(continue_with, function),
            },
        }
    }

    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        operation: WriterOp<W, M1, K>,
        function: Rc<dyn Fn(M1) -> M2>,
    ) -> WriterOp<W, M2, K> {
        match operation {
            WriterOp::Tell {
                output,
                continue_with,
            } => WriterOp::Tell {
                output,
                continue_with,
            },
            WriterOp::Listen {
                scoped,
                continue_with,
            } => WriterOp::Listen {
                scoped: Rc::new(move || function(scoped())),
                continue_with,
            },
            WriterOp::Censor {
                transform,
                scoped,
                continue_with,
            } => WriterOp::Censor {
                transform,
                scoped: Rc::new(move || function(scoped())),
                continue_with,
            },
        }
    }

    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        operation: WriterOp<W, M1, K>,
        context: C::Apply<()>,
        function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> WriterOp<W, M2, K>
    where
        C::Apply<()>: Clone,
    {
        match operation {
            WriterOp::Tell {
                output,
                continue_with,
            } => WriterOp::Tell {
                output,
                continue_with,
            },
            WriterOp::Listen {
                scoped,
                continue_with,
            } => WriterOp::Listen {
                scoped: Rc::new(move || function(C::map(context.clone(), |()| scoped()))),
                continue_with,
            },
            WriterOp::Censor {
                transform,
                scoped,
                continue_with,
            } => WriterOp::Censor {
                transform,
                scoped: Rc::new(move || function(C::map(context.clone(), |()| scoped()))),
                continue_with,
            },
        }
    }
}

/// Appends output to the log.
#[must_use]
pub fn tell<Sig, W, Index>(output: W) -> Eff<Sig, ()>
where
    Sig: Member<Writer<W>, Index>,
    W: 'static,
{
    Eff::send(WriterOp::Tell {
        output,
        continue_with: Rc::new(Eff::Pure),
    })
}

/// Runs `scoped`, returning its result paired with the log it produced.
///
/// The listened log still reaches the surrounding computation's log.
#[must_use]
pub fn listen<Sig, W, A, Index, P>(scoped: P) -> Eff<Sig, (A, W)>
where
    Sig: Member<Writer<W>, Index>,
    W: 'static,
    A: 'static,
    P: Fn() -> Eff<Sig, A> + 'static,
{
    Eff::send(WriterOp::Listen {
        scoped: Rc::new(move || scoped().erase()),
        continue_with: Rc::new(|(log, erased): (W, Erased)| {
            Eff::Pure((
                *erased
                    .downcast::<A>()
                    .expect("Type mismatch in effect continuation"),
                log,
            ))
        }),
    })
}

/// Runs `scoped`, rewriting the log it produced.
#[must_use]
pub fn censor<Sig, W, A, Index, F, P>(transform: F, scoped: P) -> Eff<Sig, A>
where
    Sig: Member<Writer<W>, Index>,
    W: 'static,
    A: 'static,
    F: Fn(W) -> W + 'static,
    P: Fn() -> Eff<Sig, A> + 'static,
{
    Eff::send(WriterOp::Censor {
        transform: Rc::new(transform),
        scoped: Rc::new(move || scoped().erase()),
        continue_with: downcast_continuation::<Sig, A>(),
    })
}

/// Interprets [`Writer`] into `(W, A)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterCarrier<W: 'static> {
    _log: PhantomData<W>,
}

impl<W: Monoid + Clone + 'static> WriterCarrier<W> {
    /// Creates the carrier.
    #[must_use]
    pub const fn new() -> Self {
        Self { _log: PhantomData }
    }
}

impl<W: Monoid + Clone + 'static> Carrier for WriterCarrier<W> {
    type Output<A: 'static> = (W, A);

    fn pure<A: 'static>(&self, value: A) -> (W, A) {
        (W::empty(), value)
    }

    fn bind<A: 'static, B: 'static, F>(&self, action: (W, A), function: F) -> (W, B)
    where
        F: Fn(A) -> (W, B) + 'static,
    {
        let (accumulated, value) = action;
        let (new, result) = function(value);
        (accumulated.combine(new), result)
    }
}

impl<W: Monoid + Clone + 'static> Algebra for WriterCarrier<W> {
    type Sig = Writer<W>;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: WriterOp<W, Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> (W, <H::Ctx as Context>::Apply<A>)
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            WriterOp::Tell {
                output,
                continue_with,
            } => {
                let (log, ctx_value) =
                    handler.handle(<H::Ctx as Context>::map(context, |()| continue_with(())));
                (output.combine(log), ctx_value)
            }
            WriterOp::Listen {
                scoped,
                continue_with,
            } => {
                let (log, ctx_scoped) =
                    handler.handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()));
                let observed = log.clone();
                let (more, ctx_value) =
                    handler.handle(<H::Ctx as Context>::map(ctx_scoped, move |value| {
                        continue_with((observed, value))
                    }));
                (log.combine(more), ctx_value)
            }
            WriterOp::Censor {
                transform,
                scoped,
                continue_with,
            } => {
                let (log, ctx_scoped) =
                    handler.handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()));
                let (more, ctx_value) =
                    handler.handle(<H::Ctx as Context>::map(ctx_scoped, move |value| {
                        continue_with(value)
                    }));
                (transform(log).combine(more), ctx_value)
            }
        }
    }
}

/// Layers a writer over an inner carrier.
///
/// `Output<A>` is `Inner::Output<(W, A)>`; the log rides through the inner
/// carrier paired with every result.
#[derive(Debug, PartialEq, Eq)]
pub struct WriterLayer<W: 'static, C> {
    inner: C,
    _log: PhantomData<W>,
}

impl<W: 'static, C> WriterLayer<W, C> {
    /// Layers a writer over `inner`.
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self {
            inner,
            _log: PhantomData,
        }
    }
}

impl<W: 'static, C: Clone> Clone for WriterLayer<W, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _log: PhantomData,
        }
    }
}

impl<W: Monoid + Clone + 'static, C: Algebra> WriterLayer<W, C> {
    /// Runs a whole program, returning the accumulated log with the result.
    #[must_use]
    pub fn run_writer<A: 'static>(
        &self,
        program: Eff<<Self as Algebra>::Sig, A>,
    ) -> C::Output<(W, A)> {
        self.run(program)
    }
}

impl<W: Monoid + Clone + 'static, C: Carrier> Carrier for WriterLayer<W, C> {
    type Output<A: 'static> = C::Output<(W, A)>;

    fn pure<A: 'static>(&self, value: A) -> C::Output<(W, A)> {
        self.inner.pure((W::empty(), value))
    }

    fn bind<A: 'static, B: 'static, F>(
        &self,
        action: C::Output<(W, A)>,
        function: F,
    ) -> C::Output<(W, B)>
    where
        F: Fn(A) -> C::Output<(W, B)> + 'static,
    {
        let inner = self.inner.clone();
        self.inner.bind(action, move |(accumulated, value): (W, A)| {
            inner.map(function(value), move |(new, result): (W, B)| {
                (accumulated.clone().combine(new), result)
            })
        })
    }
}

impl<W: Monoid + Clone + 'static, C: Algebra> Runner for WriterLayer<W, C> {
    type Outer = Self;
    type Inner = C;
    type LayerCtx = PairContext<W>;

    fn inner(&self) -> &C {
        &self.inner
    }

    fn resume<T: 'static>(&self, wrapped: (W, C::Output<(W, T)>)) -> C::Output<(W, T)> {
        let (accumulated, action) = wrapped;
        self.inner.map(action, move |(new, value): (W, T)| {
            (accumulated.clone().combine(new), value)
        })
    }
}

impl<W: Monoid + Clone + 'static, C: Algebra> Algebra for WriterLayer<W, C> {
    type Sig = Sum<Writer<W>, C::Sig>;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: <Self::Sig as Signature>::Op<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> C::Output<(W, <H::Ctx as Context>::Apply<A>)>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            SumOp::Left(WriterOp::Tell {
                output,
                continue_with,
            }) => {
                let rest =
                    handler.handle(<H::Ctx as Context>::map(context, |()| continue_with(())));
                self.inner.map(rest, move |(log, ctx_value)| {
                    (output.clone().combine(log), ctx_value)
                })
            }
            SumOp::Left(WriterOp::Listen {
                scoped,
                continue_with,
            }) => {
                let first =
                    handler.handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()));
                let inner = self.inner.clone();
                let resume_handler = handler.clone();
                self.inner.bind(first, move |(log, ctx_scoped)| {
                    let continue_with = continue_with.clone();
                    let observed = log.clone();
                    let rest = resume_handler.handle(<H::Ctx as Context>::map(
                        ctx_scoped,
                        move |value| continue_with((observed, value)),
                    ));
                    let log = log.clone();
                    inner.map(rest, move |(more, ctx_value)| {
                        (log.clone().combine(more), ctx_value)
                    })
                })
            }
            SumOp::Left(WriterOp::Censor {
                transform,
                scoped,
                continue_with,
            }) => {
                let first =
                    handler.handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()));
                let inner = self.inner.clone();
                let resume_handler = handler.clone();
                self.inner.bind(first, move |(log, ctx_scoped)| {
                    let continue_with = continue_with.clone();
                    let rest = resume_handler.handle(<H::Ctx as Context>::map(
                        ctx_scoped,
                        move |value| continue_with(value),
                    ));
                    let transform = transform.clone();
                    let log = log.clone();
                    inner.map(rest, move |(more, ctx_value)| {
                        (transform(log.clone()).combine(more), ctx_value)
                    })
                })
            }
            SumOp::Right(forwarded) => thread(self, handler, forwarded, (W::empty(), context)),
        }
    }
}
