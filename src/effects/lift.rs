//! The lifted-action effect: an opaque external computation as an effect.
//!
//! [`lift`] wraps a plain closure as an operation so impure or external work
//! can live inside an effectful program and be sequenced like any other
//! operation. [`LiftCarrier`] interprets it by just running the closure.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::algebra::{
    Algebra, Carrier, Context, Eff, Erased, Handler, Kont, Member, Signature, Thunk,
    compose_continuation, downcast_continuation,
};

/// The lifted-action signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lift;

/// Operations of [`Lift`].
pub enum LiftOp<M: 'static, K: 'static> {
    /// Run an opaque external action and continue with its result.
    Lift {
        /// The external action, result erased.
        action: Thunk<Erased>,
        /// The rest of the program.
        continue_with: Kont<Erased, K>,
        /// No nested sub-computations.
        _nested: PhantomData<M>,
    },
}

impl<M: 'static, K: 'static> Clone for LiftOp<M, K> {
    fn clone(&self) -> Self {
        match self {
            Self::Lift {
                action,
                continue_with,
                _nested,
            } => Self::Lift {
                action: action.clone(),
                continue_with: continue_with.clone(),
                _nested: PhantomData,
            },
        }
    }
}

impl Signature for Lift {
    type Op<M: 'static, K: 'static> = LiftOp<M, K>;

    fn map_continuation<M: 'static, K: 'static, L: 'static>(
        operation: LiftOp<M, K>,
        function: Rc<dyn Fn(K) -> L>,
    ) -> LiftOp<M, L> {
        match operation {
            LiftOp::Lift {
                action,
                continue_with,
                _nested,
            } => LiftOp::Lift {
                action,
                continue_with: compose_continuation(continue_with, function),
                _nested: PhantomData,
            },
        }
    }

    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        operation: LiftOp<M1, K>,
        _function: Rc<dyn Fn(M1) -> M2>,
    ) -> LiftOp<M2, K> {
        match operation {
            LiftOp::Lift {
                action,
                continue_with,
                _nested,
            } => LiftOp::Lift {
                action,
                continue_with,
                _nested: PhantomData,
            },
        }
    }

    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        operation: LiftOp<M1, K>,
        _context: C::Apply<()>,
        _function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> LiftOp<M2, K>
    where
        C::Apply<()>: Clone,
    {
        match operation {
            LiftOp::Lift {
                action,
                continue_with,
                _nested,
            } => LiftOp::Lift {
                action,
                continue_with,
                _nested: PhantomData,
            },
        }
    }
}

/// Wraps an external action as an effect operation.
///
/// The action runs each time the operation is interpreted, which under a
/// non-deterministic carrier can be once per branch.
///
/// # Examples
///
/// ```rust
/// use algeff::algebra::Algebra;
/// use algeff::effects::{LiftCarrier, lift};
///
/// let program = lift(|| 40).fmap(|value| value + 2);
/// assert_eq!(LiftCarrier.run(program), 42);
/// ```
#[must_use]
pub fn lift<Sig, A, Index, F>(action: F) -> Eff<Sig, A>
where
    Sig: Member<Lift, Index>,
    A: 'static,
    F: Fn() -> A + 'static,
{
    Eff::send(LiftOp::Lift {
        action: Rc::new(move || Box::new(action()) as Erased),
        continue_with: downcast_continuation::<Sig, A>(),
        _nested: PhantomData,
    })
}

/// The identity carrier: interprets [`Lift`] by running the action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiftCarrier;

impl Carrier for LiftCarrier {
    type Output<A: 'static> = A;

    fn pure<A: 'static>(&self, value: A) -> A {
        value
    }

    fn bind<A: 'static, B: 'static, F>(&self, action: A, function: F) -> B
    where
        F: Fn(A) -> B + 'static,
    {
        function(action)
    }
}

impl Algebra for LiftCarrier {
    type Sig = Lift;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: LiftOp<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> <H::Ctx as Context>::Apply<A>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            LiftOp::Lift {
                action,
                continue_with,
                _nested,
            } => handler.handle(<H::Ctx as Context>::map(context, move |()| {
                continue_with(action())
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn lift_runs_the_action() {
        let program: Eff<Lift, i32> = lift(|| 21).fmap(|value| value * 2);
        assert_eq!(LiftCarrier.run(program), 42);
    }

    #[rstest]
    fn lift_defers_until_run() {
        let counter = Rc::new(Cell::new(0));
        let observed = counter.clone();
        let program: Eff<Lift, i32> = lift(move || {
            observed.set(observed.get() + 1);
            7
        });
        assert_eq!(counter.get(), 0);
        assert_eq!(LiftCarrier.run(program), 7);
        assert_eq!(counter.get(), 1);
    }

    #[rstest]
    fn pure_program_needs_no_operations() {
        let program: Eff<Lift, &str> = Eff::pure("done");
        assert!(program.is_pure());
        assert_eq!(LiftCarrier.run(program), "done");
    }
}
