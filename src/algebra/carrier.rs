//! The [`Carrier`] monad family and the [`Algebra`] dispatch protocol.
//!
//! A carrier is the monad a program is interpreted into; an algebra is a
//! carrier that owns a signature sum and can interpret one pending operation
//! of it. Dispatch is single-step: the algebra resolves exactly one
//! operation, resuming the rest of the program through the supplied handler.
//! Carriers that own only the head of their sum forward tail operations to
//! an inner algebra with [`thread`](crate::algebra::thread), which is where
//! the context functor machinery earns its keep.

use crate::algebra::context::Context;
use crate::algebra::eff::Eff;
use crate::algebra::handler::{Handler, RootHandler};
use crate::algebra::signature::{Erased, Signature};

/// A monad family a program can be interpreted into.
///
/// One implementation per type: the carrier value itself holds whatever the
/// interpretation needs (an inner carrier for layered carriers, nothing for
/// base carriers).
pub trait Carrier: Clone + 'static {
    /// The carrier applied to a result type.
    type Output<A: 'static>: 'static;

    /// Lifts a value into the carrier.
    #[must_use]
    fn pure<A: 'static>(&self, value: A) -> Self::Output<A>;

    /// Monadic sequencing in the carrier.
    #[must_use]
    fn bind<A: 'static, B: 'static, F>(&self, action: Self::Output<A>, function: F) -> Self::Output<B>
    where
        F: Fn(A) -> Self::Output<B> + 'static;

    /// Maps the carried value.
    #[must_use]
    fn map<A: 'static, B: 'static, F>(&self, action: Self::Output<A>, function: F) -> Self::Output<B>
    where
        F: Fn(A) -> B + 'static,
    {
        let carrier = self.clone();
        self.bind(action, move |value| carrier.pure(function(value)))
    }
}

/// A carrier that owns a signature sum and interprets its operations.
pub trait Algebra: Carrier {
    /// The signature sum this carrier interprets.
    type Sig: Signature;

    /// Interprets exactly one pending operation.
    ///
    /// `operation` is one operation of [`Algebra::Sig`] drawn from a program
    /// over some ambient signature `N`; `handler` resumes scoped bodies and
    /// continuations of that program back into this carrier; `context` is
    /// the handler's context applied to `()`, i.e. the accumulated state of
    /// every carrier layer threaded so far.
    ///
    /// Operations with only a continuation resolve immediately and resume
    /// through `handler`. Scoped operations run their bodies through
    /// `handler` first, then feed the result to the continuation. Operations
    /// belonging to the tail of the sum are forwarded to the inner algebra
    /// via [`thread`](crate::algebra::thread).
    #[must_use]
    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: <Self::Sig as Signature>::Op<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> Self::Output<<H::Ctx as Context>::Apply<A>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone;

    /// Runs a whole program through a root handler with the identity
    /// context.
    #[must_use]
    fn run<A: 'static>(&self, program: Eff<Self::Sig, A>) -> Self::Output<A> {
        RootHandler::new(self.clone()).handle(program)
    }
}
