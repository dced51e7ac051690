//! The error effect: `throw` and recoverable `catch`.
//!
//! `catch` is a scoped operation: its body and recovery branch are nested
//! sub-computations, so interpreting it under layered carriers exercises the
//! full context-threading machinery. [`ErrorCarrier`] interprets into
//! `Result` directly; [`ErrorLayer`] wraps any inner carrier, forwarding
//! non-error operations inward with a [`FailContext`].

use std::marker::PhantomData;
use std::rc::Rc;

use crate::algebra::{
    Algebra, Carrier, Context, Eff, Erased, FailContext, Handler, Kont, Member, Runner, Signature,
    Sum, SumOp, Thunk, compose_continuation, downcast_continuation, thread,
};

/// The error signature, throwing and catching values of type `E`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Error<E: 'static> {
    _error: PhantomData<E>,
}

/// Operations of [`Error`].
pub enum ErrorOp<E: 'static, M: 'static, K: 'static> {
    /// Abort with an error; the continuation is never entered.
    Throw(E),
    /// Run `scoped`; on failure run `recover` with the error; feed the
    /// surviving result to the continuation.
    Catch {
        /// The protected body.
        scoped: Thunk<M>,
        /// The recovery branch.
        recover: Rc<dyn Fn(E) -> M>,
        /// The rest of the program.
        continue_with: Kont<Erased, K>,
    },
}

impl<E: Clone + 'static, M: 'static, K: 'static> Clone for ErrorOp<E, M, K> {
    fn clone(&self) -> Self {
        match self {
            Self::Throw(error) => Self::Throw(error.clone()),
            Self::Catch {
                scoped,
                recover,
                continue_with,
            } => Self::Catch {
                scoped: scoped.clone(),
                recover: recover.clone(),
                continue_with: continue_with.clone(),
            },
        }
    }
}

impl<E: 'static> Signature for Error<E> {
    type Op<M: 'static, K: 'static> = ErrorOp<E, M, K>;

    fn map_continuation<M: 'static, K: 'static, L: 'static>(
        operation: ErrorOp<E, M, K>,
        function: Rc<dyn Fn(K) -> L>,
    ) -> ErrorOp<E, M, L> {
        match operation {
            ErrorOp::Throw(error) => ErrorOp::Throw(error),
            ErrorOp::Catch {
                scoped,
                recover,
                continue_with,
            } => ErrorOp::Catch {
                scoped,
                recover,
                continue_with: compose_continuation(continue_with, function),
            },
        }
    }

    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        operation: ErrorOp<E, M1, K>,
        function: Rc<dyn Fn(M1) -> M2>,
    ) -> ErrorOp<E, M2, K> {
        match operation {
            ErrorOp::Throw(error) => ErrorOp::Throw(error),
            ErrorOp::Catch {
                scoped,
                recover,
                continue_with,
            } => {
                let scope_function = function.clone();
                ErrorOp::Catch {
                    scoped: Rc::new(move || scope_function(scoped())),
                    recover: Rc::new(move |error| function(recover(error))),
                    continue_with,
                }
            }
        }
    }

    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        operation: ErrorOp<E, M1, K>,
        context: C::Apply<()>,
        function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> ErrorOp<E, M2, K>
    where
        C::Apply<()>: Clone,
    {
        match operation {
            ErrorOp::Throw(error) => ErrorOp::Throw(error),
            ErrorOp::Catch {
                scoped,
                recover,
                continue_with,
            } => {
                let threaded_scope: Thunk<M2> = {
                    let function = function.clone();
                    let context = context.clone();
                    Rc::new(move || function(C::map(context.clone(), |()| scoped())))
                };
                let threaded_recover: Rc<dyn Fn(E) -> M2> =
                    Rc::new(move |error| function(C::map(context.clone(), |()| recover(error))));
                ErrorOp::Catch {
                    scoped: threaded_scope,
                    recover: threaded_recover,
                    continue_with,
                }
            }
        }
    }
}

/// Aborts the computation with an error.
///
/// # Examples
///
/// ```rust
/// use algeff::algebra::Algebra;
/// use algeff::effects::{Error, ErrorCarrier, throw};
///
/// let program: algeff::algebra::Eff<Error<String>, i32> = throw("boom".to_string());
/// assert_eq!(ErrorCarrier::default().run(program), Err("boom".to_string()));
/// ```
#[must_use]
pub fn throw<Sig, E, A, Index>(error: E) -> Eff<Sig, A>
where
    Sig: Member<Error<E>, Index>,
    E: 'static,
    A: 'static,
{
    Eff::send(ErrorOp::Throw(error))
}

/// Runs `scoped`, handing any thrown error to `recover`.
///
/// Both branches are closures so interpreters may re-enter them (per
/// non-deterministic branch, for instance) without consuming them.
///
/// # Examples
///
/// ```rust
/// use algeff::algebra::{Algebra, Eff};
/// use algeff::effects::{Error, ErrorCarrier, catch, throw};
///
/// let program: Eff<Error<String>, i32> = catch(
///     || throw("boom".to_string()),
///     |error: String| Eff::pure(error.len() as i32),
/// );
/// assert_eq!(ErrorCarrier::default().run(program), Ok(4));
/// ```
#[must_use]
pub fn catch<Sig, E, A, Index, P, R>(scoped: P, recover: R) -> Eff<Sig, A>
where
    Sig: Member<Error<E>, Index>,
    E: 'static,
    A: 'static,
    P: Fn() -> Eff<Sig, A> + 'static,
    R: Fn(E) -> Eff<Sig, A> + 'static,
{
    Eff::send(ErrorOp::Catch {
        scoped: Rc::new(move || scoped().erase()),
        recover: Rc::new(move |error| recover(error).erase()),
        continue_with: downcast_continuation::<Sig, A>(),
    })
}

/// Interprets [`Error`] into `Result`: `throw` short-circuits.
#[derive(Debug, PartialEq, Eq)]
pub struct ErrorCarrier<E: 'static> {
    _error: PhantomData<E>,
}

impl<E: 'static> Clone for ErrorCarrier<E> {
    fn clone(&self) -> Self {
        Self {
            _error: PhantomData,
        }
    }
}

impl<E: 'static> Copy for ErrorCarrier<E> {}

impl<E: 'static> Default for ErrorCarrier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> ErrorCarrier<E> {
    /// Creates the carrier.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _error: PhantomData,
        }
    }
}

impl<E: 'static> Carrier for ErrorCarrier<E> {
    type Output<A: 'static> = Result<A, E>;

    fn pure<A: 'static>(&self, value: A) -> Result<A, E> {
        Ok(value)
    }

    fn bind<A: 'static, B: 'static, F>(&self, action: Result<A, E>, function: F) -> Result<B, E>
    where
        F: Fn(A) -> Result<B, E> + 'static,
    {
        action.and_then(function)
    }
}

impl<E: 'static> Algebra for ErrorCarrier<E> {
    type Sig = Error<E>;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: ErrorOp<E, Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> Result<<H::Ctx as Context>::Apply<A>, E>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            ErrorOp::Throw(error) => Err(error),
            ErrorOp::Catch {
                scoped,
                recover,
                continue_with,
            } => {
                let attempted =
                    handler.handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()));
                let survived = match attempted {
                    Ok(ctx_scoped) => Ok(ctx_scoped),
                    Err(error) => {
                        handler.handle(<H::Ctx as Context>::map(context, |()| recover(error)))
                    }
                };
                survived.and_then(|ctx_scoped| {
                    handler.handle(<H::Ctx as Context>::map(ctx_scoped, move |value| {
                        continue_with(value)
                    }))
                })
            }
        }
    }
}

/// Layers error handling over an inner carrier.
///
/// `Output<A>` is `Inner::Output<Result<A, E>>`: failure is recorded inside
/// the inner carrier's result, so effects owned by the inner carrier (state,
/// output) survive a `throw`.
#[derive(Debug, PartialEq, Eq)]
pub struct ErrorLayer<E: 'static, C> {
    inner: C,
    _error: PhantomData<E>,
}

impl<E: 'static, C> ErrorLayer<E, C> {
    /// Layers error handling over `inner`.
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self {
            inner,
            _error: PhantomData,
        }
    }
}

impl<E: 'static, C: Clone> Clone for ErrorLayer<E, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _error: PhantomData,
        }
    }
}

impl<E: 'static, C: Carrier> Carrier for ErrorLayer<E, C> {
    type Output<A: 'static> = C::Output<Result<A, E>>;

    fn pure<A: 'static>(&self, value: A) -> C::Output<Result<A, E>> {
        self.inner.pure(Ok(value))
    }

    fn bind<A: 'static, B: 'static, F>(
        &self,
        action: C::Output<Result<A, E>>,
        function: F,
    ) -> C::Output<Result<B, E>>
    where
        F: Fn(A) -> C::Output<Result<B, E>> + 'static,
    {
        let inner = self.inner.clone();
        self.inner.bind(action, move |attempted| match attempted {
            Ok(value) => function(value),
            Err(error) => inner.pure(Err(error)),
        })
    }
}

impl<E: Clone + 'static, C: Algebra> Runner for ErrorLayer<E, C> {
    type Outer = Self;
    type Inner = C;
    type LayerCtx = FailContext<E>;

    fn inner(&self) -> &C {
        &self.inner
    }

    fn resume<T: 'static>(
        &self,
        wrapped: Result<C::Output<Result<T, E>>, E>,
    ) -> C::Output<Result<T, E>> {
        match wrapped {
            Ok(action) => action,
            Err(error) => self.inner.pure(Err(error)),
        }
    }
}

impl<E: Clone + 'static, C: Algebra> Algebra for ErrorLayer<E, C> {
    type Sig = Sum<Error<E>, C::Sig>;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: <Self::Sig as Signature>::Op<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> C::Output<Result<<H::Ctx as Context>::Apply<A>, E>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            SumOp::Left(ErrorOp::Throw(error)) => self.inner.pure(Err(error)),
            SumOp::Left(ErrorOp::Catch {
                scoped,
                recover,
                continue_with,
            }) => {
                let attempted =
                    handler.handle(<H::Ctx as Context>::map(context.clone(), |()| scoped()));
                let inner = self.inner.clone();
                let resume_handler = handler.clone();
                self.inner.bind(attempted, move |first| match first {
                    Ok(ctx_scoped) => {
                        let continue_with = continue_with.clone();
                        resume_handler.handle(<H::Ctx as Context>::map(
                            ctx_scoped,
                            move |value| continue_with(value),
                        ))
                    }
                    Err(error) => {
                        let recovered = {
                            let recover = recover.clone();
                            resume_handler.handle(<H::Ctx as Context>::map(
                                context.clone(),
                                move |()| recover(error),
                            ))
                        };
                        let rethrow = inner.clone();
                        let resume_again = resume_handler.clone();
                        let continue_with = continue_with.clone();
                        inner.bind(recovered, move |second| match second {
                            Ok(ctx_scoped) => {
                                let continue_with = continue_with.clone();
                                resume_again.handle(<H::Ctx as Context>::map(
                                    ctx_scoped,
                                    move |value| continue_with(value),
                                ))
                            }
                            Err(error) => rethrow.pure(Err(error)),
                        })
                    }
                })
            }
            SumOp::Right(forwarded) => thread(self, handler, forwarded, Ok(context)),
        }
    }
}
