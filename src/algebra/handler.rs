//! Handlers, the root handler, and the [`thread`] delegation combinator.
//!
//! A handler is the distributive law connecting a program's ambient
//! signature `N` to a carrier: it turns a context-wrapped computation into a
//! carrier action producing a context-wrapped result. The root handler
//! closes the loop for a whole program run; [`Threaded`] composes an outer
//! handler with one more carrier layer so tail operations can be forwarded
//! inward without the layer losing its private state.
//!
//! # Laws
//!
//! For any handler `h` with context `Ctx`:
//!
//! ```text
//! h.handle(ctx.map(pure))       == carrier.pure(ctx)          (purity)
//! h.handle(ctx.map(|p| p >>= k)) == h.handle(ctx.map(p))
//!                                     `bind` (h . map k)      (distributivity)
//! ```

use crate::algebra::carrier::{Algebra, Carrier};
use crate::algebra::context::{Composed, Context, IdContext};
use crate::algebra::eff::Eff;
use crate::algebra::signature::{Erased, Signature};

/// A distributive law from context-wrapped computations over `N` into the
/// carrier `C`.
pub trait Handler<N: Signature, C: Carrier>: Clone + 'static {
    /// The context functor accumulated by the carrier layers above `C`.
    type Ctx: Context;

    /// Resumes a context-wrapped computation into the carrier.
    #[must_use]
    fn handle<X: 'static>(
        &self,
        scoped: <Self::Ctx as Context>::Apply<Eff<N, X>>,
    ) -> C::Output<<Self::Ctx as Context>::Apply<X>>;
}

/// The identity-context handler driving [`Algebra::run`].
#[derive(Debug)]
pub struct RootHandler<C: Algebra> {
    carrier: C,
}

impl<C: Algebra> RootHandler<C> {
    /// Creates a root handler over the given carrier.
    #[must_use]
    pub const fn new(carrier: C) -> Self {
        Self { carrier }
    }
}

impl<C: Algebra> Clone for RootHandler<C> {
    fn clone(&self) -> Self {
        Self {
            carrier: self.carrier.clone(),
        }
    }
}

impl<C: Algebra> Handler<C::Sig, C> for RootHandler<C> {
    type Ctx = IdContext;

    fn handle<X: 'static>(&self, scoped: Eff<C::Sig, X>) -> C::Output<X> {
        match scoped {
            Eff::Pure(value) => self.carrier.pure(value),
            Eff::Op(operation) => self.carrier.dispatch(self, *operation, ()),
        }
    }
}

/// The layer half of delegation: how a carrier layer re-enters its own run
/// procedure on a forwarded action and re-attaches its private state.
pub trait Runner: Clone + 'static {
    /// The layered (outer) carrier whose actions get resumed.
    type Outer: Carrier;
    /// The inner carrier the forwarded operation is dispatched to.
    type Inner: Carrier;
    /// The context functor this layer contributes.
    type LayerCtx: Context;

    /// The inner carrier.
    fn inner(&self) -> &Self::Inner;

    /// Runs an outer-carrier action found under this layer's context,
    /// producing an inner action whose result keeps the context attached.
    #[must_use]
    fn resume<T: 'static>(
        &self,
        wrapped: <Self::LayerCtx as Context>::Apply<<Self::Outer as Carrier>::Output<T>>,
    ) -> <Self::Inner as Carrier>::Output<<Self::LayerCtx as Context>::Apply<T>>;
}

/// The handler obtained by composing an outer handler with one carrier
/// layer; its context is the layer's context composed with the outer one.
#[derive(Debug)]
pub struct Threaded<H, Rn> {
    outer: H,
    runner: Rn,
}

impl<H, Rn> Threaded<H, Rn> {
    /// Composes an outer handler with a layer runner.
    #[must_use]
    pub const fn new(outer: H, runner: Rn) -> Self {
        Self { outer, runner }
    }
}

impl<H: Clone, Rn: Clone> Clone for Threaded<H, Rn> {
    fn clone(&self) -> Self {
        Self {
            outer: self.outer.clone(),
            runner: self.runner.clone(),
        }
    }
}

impl<N, H, Rn> Handler<N, Rn::Inner> for Threaded<H, Rn>
where
    N: Signature,
    Rn: Runner,
    H: Handler<N, Rn::Outer>,
{
    type Ctx = Composed<Rn::LayerCtx, H::Ctx>;

    fn handle<X: 'static>(
        &self,
        scoped: <Self::Ctx as Context>::Apply<Eff<N, X>>,
    ) -> <Rn::Inner as Carrier>::Output<<Self::Ctx as Context>::Apply<X>> {
        let outer = self.outer.clone();
        self.runner.resume(<Rn::LayerCtx as Context>::map(
            scoped,
            move |inner_scoped| outer.handle(inner_scoped),
        ))
    }
}

/// Forwards an operation owned by an inner algebra through one carrier
/// layer.
///
/// The layer's context (applied to the handler's context) is passed in as
/// `combined`; the inner algebra dispatches the operation against the
/// composed handler, and the layer's state rides along in the outer layer of
/// the context. Equivalent to manually nesting the two carriers' run
/// procedures and unwrapping outer-context-first.
#[must_use]
pub fn thread<N, A, H, Rn>(
    runner: &Rn,
    handler: &H,
    operation: <<Rn::Inner as Algebra>::Sig as Signature>::Op<Eff<N, Erased>, Eff<N, A>>,
    combined: <Rn::LayerCtx as Context>::Apply<<H::Ctx as Context>::Apply<()>>,
) -> <Rn::Inner as Carrier>::Output<
    <Rn::LayerCtx as Context>::Apply<<H::Ctx as Context>::Apply<A>>,
>
where
    N: Signature,
    A: 'static,
    Rn: Runner,
    Rn::Inner: Algebra,
    H: Handler<N, Rn::Outer>,
    <H::Ctx as Context>::Apply<()>: Clone,
    <Rn::LayerCtx as Context>::Apply<<H::Ctx as Context>::Apply<()>>: Clone,
{
    let threaded = Threaded::new(handler.clone(), runner.clone());
    runner.inner().dispatch(&threaded, operation, combined)
}
