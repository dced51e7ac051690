//! Context functors threaded through handler composition.
//!
//! When carriers are layered, each layer contributes a functor describing the
//! state it weaves around values: a state layer contributes pairing with the
//! state, an error layer contributes `Result`, and composing layers composes
//! the functors. Handlers receive scoped computations already wrapped in the
//! accumulated context and must return results in the same context, which is
//! how an inner carrier's private state survives a trip through an outer
//! carrier's scoped operation.
//!
//! Contexts are created fresh at each root dispatch and only ever transformed
//! with [`Context::map`]; they are never mutated in place.

use std::marker::PhantomData;

/// A functor threaded through handler composition, emulated with a GAT.
pub trait Context: 'static {
    /// The context applied to a payload type.
    type Apply<A: 'static>: 'static;

    /// Maps the payload, preserving the surrounding context.
    fn map<A: 'static, B: 'static, F: FnOnce(A) -> B>(
        wrapped: Self::Apply<A>,
        function: F,
    ) -> Self::Apply<B>;
}

/// The identity context: no information is threaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdContext;

impl Context for IdContext {
    type Apply<A: 'static> = A;

    fn map<A: 'static, B: 'static, F: FnOnce(A) -> B>(wrapped: A, function: F) -> B {
        function(wrapped)
    }
}

/// Pairing with a threaded value, used by state and writer layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairContext<S: 'static> {
    _threaded: PhantomData<S>,
}

impl<S: 'static> Context for PairContext<S> {
    type Apply<A: 'static> = (S, A);

    fn map<A: 'static, B: 'static, F: FnOnce(A) -> B>(
        (threaded, value): (S, A),
        function: F,
    ) -> (S, B) {
        (threaded, function(value))
    }
}

/// Possible failure, used by error layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailContext<E: 'static> {
    _error: PhantomData<E>,
}

impl<E: 'static> Context for FailContext<E> {
    type Apply<A: 'static> = Result<A, E>;

    fn map<A: 'static, B: 'static, F: FnOnce(A) -> B>(
        wrapped: Result<A, E>,
        function: F,
    ) -> Result<B, E> {
        wrapped.map(function)
    }
}

/// Composition of two contexts, outer first.
///
/// `Composed<F, G>::Apply<A>` is `F::Apply<G::Apply<A>>`; this is what
/// accumulates as handlers are threaded through successive carrier layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Composed<F: Context, G: Context> {
    _outer: PhantomData<F>,
    _inner: PhantomData<G>,
}

impl<F: Context, G: Context> Context for Composed<F, G> {
    type Apply<A: 'static> = F::Apply<G::Apply<A>>;

    fn map<A: 'static, B: 'static, Fun: FnOnce(A) -> B>(
        wrapped: Self::Apply<A>,
        function: Fun,
    ) -> Self::Apply<B> {
        F::map(wrapped, move |inner| G::map(inner, function))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn id_context_applies_directly() {
        assert_eq!(IdContext::map(3, |value| value + 1), 4);
    }

    #[rstest]
    fn pair_context_preserves_threaded_value() {
        let mapped = PairContext::<&str>::map(("state", 3), |value| value * 2);
        assert_eq!(mapped, ("state", 6));
    }

    #[rstest]
    fn fail_context_maps_ok_and_keeps_err() {
        assert_eq!(FailContext::<String>::map(Ok(3), |value| value + 1), Ok(4));
        let failed: Result<i32, String> = Err("boom".to_string());
        assert_eq!(
            FailContext::<String>::map(failed, |value| value + 1),
            Err("boom".to_string())
        );
    }

    #[rstest]
    fn composed_context_maps_innermost_payload() {
        type StateThenFail = Composed<PairContext<i32>, FailContext<String>>;
        let wrapped: (i32, Result<&str, String>) = (7, Ok("value"));
        let mapped = StateThenFail::map(wrapped, str::len);
        assert_eq!(mapped, (7, Ok(5)));
    }
}
