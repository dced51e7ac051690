//! Binary sums of signatures.
//!
//! Effect rows are built as right-nested binary sums: `Sum<A, Sum<B, C>>`
//! offers every operation of `A`, `B` and `C`. The [`Signatures!`] macro
//! builds the nesting. The head-position signature is the one the outermost
//! carrier layer interprets; everything to the right is forwarded inward.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::algebra::context::Context;
use crate::algebra::signature::Signature;

/// The sum of two signatures: offers the operations of both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sum<L: Signature, R: Signature> {
    _left: PhantomData<L>,
    _right: PhantomData<R>,
}

/// An operation drawn from one side of a [`Sum`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SumOp<L, R> {
    /// An operation of the left summand.
    Left(L),
    /// An operation of the right summand.
    Right(R),
}

impl<L: Signature, R: Signature> Signature for Sum<L, R> {
    type Op<M: 'static, K: 'static> = SumOp<L::Op<M, K>, R::Op<M, K>>;

    fn map_continuation<M: 'static, K: 'static, J: 'static>(
        operation: Self::Op<M, K>,
        function: Rc<dyn Fn(K) -> J>,
    ) -> Self::Op<M, J> {
        match operation {
            SumOp::Left(left) => SumOp::Left(L::map_continuation(left, function)),
            SumOp::Right(right) => SumOp::Right(R::map_continuation(right, function)),
        }
    }

    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        operation: Self::Op<M1, K>,
        function: Rc<dyn Fn(M1) -> M2>,
    ) -> Self::Op<M2, K> {
        match operation {
            SumOp::Left(left) => SumOp::Left(L::map_nested(left, function)),
            SumOp::Right(right) => SumOp::Right(R::map_nested(right, function)),
        }
    }

    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        operation: Self::Op<M1, K>,
        context: C::Apply<()>,
        function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> Self::Op<M2, K>
    where
        C::Apply<()>: Clone,
    {
        match operation {
            SumOp::Left(left) => SumOp::Left(L::thread_nested::<C, M1, M2, K>(
                left, context, function,
            )),
            SumOp::Right(right) => SumOp::Right(R::thread_nested::<C, M1, M2, K>(
                right, context, function,
            )),
        }
    }
}

/// Builds a right-nested [`Sum`] from a list of signatures.
///
/// # Examples
///
/// ```rust
/// use algeff::Signatures;
/// use algeff::effects::{Error, State};
///
/// type Sig = Signatures![State<i32>, Error<String>];
/// ```
#[macro_export]
macro_rules! Signatures {
    ($single:ty $(,)?) => { $single };
    ($head:ty, $($tail:ty),+ $(,)?) => {
        $crate::algebra::Sum<$head, $crate::Signatures![$($tail),+]>
    };
}
