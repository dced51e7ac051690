//! The [`Signature`] trait: the syntax of one effect.
//!
//! A signature describes the operations an effect offers, independent of any
//! interpretation. Each operation shape is a value of the GAT
//! [`Signature::Op`], parameterised by two slots:
//!
//! - `M` - the type of nested (scoped) sub-computations, such as the body of
//!   a `catch` or a `local`;
//! - `K` - the type of the continuation result, i.e. the rest of the program
//!   after the operation resolves.
//!
//! Both slots are functorial, and signatures must provide the corresponding
//! mapping operations. [`Signature::map_continuation`] drives monadic
//! sequencing of [`Eff`](crate::algebra::Eff); [`Signature::map_nested`] and
//! [`Signature::thread_nested`] let interpreters rewrite scoped
//! sub-computations, the latter keeping a context functor attached so results
//! of earlier interpretation stages stay paired with their context.
//!
//! # Laws
//!
//! Each mapping operation is a functor action:
//!
//! ```text
//! map_continuation(op, identity) == op
//! map_continuation(map_continuation(op, f), g) == map_continuation(op, g . f)
//! ```
//!
//! and likewise for `map_nested`. `thread_nested` with the identity context
//! coincides with `map_nested`.

use std::any::Any;
use std::rc::Rc;

use crate::algebra::context::Context;

/// A type-erased operation result, recovered by downcast in the continuation.
pub type Erased = Box<dyn Any>;

/// A shared continuation from an operation result to the rest of the program.
///
/// Continuations are `Rc<dyn Fn>` rather than single-shot closures because
/// non-deterministic carriers resume them once per branch.
pub type Kont<A, K> = Rc<dyn Fn(A) -> K>;

/// A shared zero-argument thunk producing a scoped sub-computation.
///
/// Scoped bodies are rebuilt fresh on every entry, so carriers that re-enter
/// a scope (per non-deterministic branch, or to retry after recovery) never
/// observe a consumed computation.
pub type Thunk<M> = Rc<dyn Fn() -> M>;

/// A shared endofunction, used for `local` and `censor` payloads.
pub type EndoFn<T> = Rc<dyn Fn(T) -> T>;

/// The syntax of one effect: its operation shapes and their functorial
/// structure.
pub trait Signature: 'static {
    /// The operations of this effect, with nested sub-computations of type
    /// `M` and continuation results of type `K`.
    type Op<M: 'static, K: 'static>: 'static;

    /// Maps the continuation slot, leaving nested sub-computations alone.
    #[must_use]
    fn map_continuation<M: 'static, K: 'static, L: 'static>(
        operation: Self::Op<M, K>,
        function: Rc<dyn Fn(K) -> L>,
    ) -> Self::Op<M, L>;

    /// Maps the nested sub-computation slot, leaving the continuation alone.
    #[must_use]
    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        operation: Self::Op<M1, K>,
        function: Rc<dyn Fn(M1) -> M2>,
    ) -> Self::Op<M2, K>;

    /// Maps the nested sub-computation slot while threading a context value
    /// through it.
    ///
    /// Every nested sub-computation is first wrapped in a copy of `context`
    /// (via [`Context::map`] over the unit payload) and then passed to
    /// `function`, so whatever `function` produces stays attached to the
    /// context it was produced under.
    #[must_use]
    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        operation: Self::Op<M1, K>,
        context: C::Apply<()>,
        function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> Self::Op<M2, K>
    where
        C::Apply<()>: Clone;
}

/// Composes a continuation with a post-processing function.
///
/// Shared helper for `map_continuation` implementations.
#[must_use]
pub fn compose_continuation<A: 'static, K: 'static, L: 'static>(
    continue_with: Kont<A, K>,
    function: Rc<dyn Fn(K) -> L>,
) -> Kont<A, L> {
    Rc::new(move |value| function(continue_with(value)))
}
