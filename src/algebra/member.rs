//! Type-level membership of a signature in a sum.
//!
//! [`Member`] witnesses that one signature occurs inside a (possibly nested)
//! sum, and provides the injection of its operations into the sum's operation
//! type plus the partial projection back out. The `Index` parameter is a
//! type-level path ([`Here`], [`There`], [`This`]) that keeps the search
//! deterministic; it is inferred at every `send` site and never written by
//! hand in ordinary code.

use std::marker::PhantomData;

use crate::algebra::signature::Signature;
use crate::algebra::sum::{Sum, SumOp};

/// Index: the signature is the head of the sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Here;

/// Index: the signature occurs in the tail of the sum, at path `I`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct There<I> {
    _rest: PhantomData<I>,
}

/// Index: the ambient signature is the signature itself, with no sum around
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct This;

/// Witnesses that signature `E` occurs in `Self` at position `Index`.
pub trait Member<E: Signature, Index>: Signature {
    /// Injects an operation of `E` into the sum's operation type.
    #[must_use]
    fn inject<M: 'static, K: 'static>(operation: E::Op<M, K>) -> Self::Op<M, K>;

    /// Projects an operation of `E` back out, if this operation is one.
    #[must_use]
    fn project<M: 'static, K: 'static>(operation: Self::Op<M, K>) -> Option<E::Op<M, K>>;
}

impl<E: Signature> Member<E, This> for E {
    fn inject<M: 'static, K: 'static>(operation: E::Op<M, K>) -> E::Op<M, K> {
        operation
    }

    fn project<M: 'static, K: 'static>(operation: E::Op<M, K>) -> Option<E::Op<M, K>> {
        Some(operation)
    }
}

impl<E: Signature, Tail: Signature> Member<E, Here> for Sum<E, Tail> {
    fn inject<M: 'static, K: 'static>(operation: E::Op<M, K>) -> Self::Op<M, K> {
        SumOp::Left(operation)
    }

    fn project<M: 'static, K: 'static>(operation: Self::Op<M, K>) -> Option<E::Op<M, K>> {
        match operation {
            SumOp::Left(found) => Some(found),
            SumOp::Right(_) => None,
        }
    }
}

impl<E: Signature, Head: Signature, Tail: Member<E, I>, I: 'static> Member<E, There<I>>
    for Sum<Head, Tail>
{
    fn inject<M: 'static, K: 'static>(operation: E::Op<M, K>) -> Self::Op<M, K> {
        SumOp::Right(Tail::inject(operation))
    }

    fn project<M: 'static, K: 'static>(operation: Self::Op<M, K>) -> Option<E::Op<M, K>> {
        match operation {
            SumOp::Left(_) => None,
            SumOp::Right(rest) => Tail::project(rest),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::Signatures;
    use crate::effects::error::{Error, ErrorOp};
    use crate::effects::lift::Lift;
    use crate::effects::state::{State, StateOp};

    type Stack = Signatures![State<i32>, Error<String>, Lift];

    assert_impl_all!(Stack: Member<State<i32>, Here>);
    assert_impl_all!(Stack: Member<Error<String>, There<Here>>);
    assert_impl_all!(Stack: Member<Lift, There<There<This>>>);
    assert_impl_all!(State<i32>: Member<State<i32>, This>);

    #[rstest]
    fn project_recovers_an_injected_operation() {
        let injected: <Stack as Signature>::Op<(), ()> =
            <Stack as Member<Error<String>, _>>::inject(ErrorOp::Throw("boom".to_string()));
        let projected = <Stack as Member<Error<String>, There<Here>>>::project(injected);
        assert!(matches!(projected, Some(ErrorOp::Throw(error)) if error == "boom"));
    }

    #[rstest]
    fn project_rejects_a_foreign_operation() {
        let injected: <Stack as Signature>::Op<(), ()> =
            <Stack as Member<Error<String>, _>>::inject(ErrorOp::Throw("boom".to_string()));
        let projected = <Stack as Member<State<i32>, Here>>::project(injected);
        assert!(projected.is_none());
    }

    #[rstest]
    fn head_injection_tags_left() {
        let injected: <Stack as Signature>::Op<(), ()> =
            <Stack as Member<State<i32>, Here>>::inject(StateOp::Put {
                state: 3,
                continue_with: std::rc::Rc::new(|()| ()),
            });
        assert!(matches!(injected, SumOp::Left(_)));
    }
}
