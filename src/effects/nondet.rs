//! Non-determinism: binary choice and failure.
//!
//! [`Choose`] forks the rest of the program on a boolean; [`Empty`] aborts a
//! branch with no result. [`ChooseCarrier`] collects every branch into a
//! `Vec` in left-then-right order, [`EmptyCarrier`] interprets failure into
//! `Option`, and [`NonDetCarrier`] interprets the combined [`NonDet`] sum as
//! the union of answers, with `empty` contributing none.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::algebra::{
    Algebra, Carrier, Context, Eff, Erased, Handler, Kont, Member, Signature, Sum, SumOp,
    compose_continuation,
};

/// The binary-choice signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Choose;

/// Operations of [`Choose`].
pub enum ChooseOp<M: 'static, K: 'static> {
    /// Fork on a boolean; the continuation is entered once per branch.
    Choose {
        /// The rest of the program, fed `true` then `false`.
        continue_with: Kont<bool, K>,
        /// No nested sub-computations.
        _nested: PhantomData<M>,
    },
}

impl<M: 'static, K: 'static> Clone for ChooseOp<M, K> {
    fn clone(&self) -> Self {
        match self {
            Self::Choose {
                continue_with,
                _nested,
            } => Self::Choose {
                continue_with: continue_with.clone(),
                _nested: PhantomData,
            },
        }
    }
}

impl Signature for Choose {
    type Op<M: 'static, K: 'static> = ChooseOp<M, K>;

    fn map_continuation<M: 'static, K: 'static, L: 'static>(
        operation: ChooseOp<M, K>,
        function: Rc<dyn Fn(K) -> L>,
    ) -> ChooseOp<M, L> {
        match operation {
            ChooseOp::Choose {
                continue_with,
                _nested,
            } => ChooseOp::Choose {
                continue_with: compose_continuation(continue_with, function),
                _nested: PhantomData,
            },
        }
    }

    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        operation: ChooseOp<M1, K>,
        _function: Rc<dyn Fn(M1) -> M2>,
    ) -> ChooseOp<M2, K> {
        match operation {
            ChooseOp::Choose {
                continue_with,
                _nested,
            } => ChooseOp::Choose {
                continue_with,
                _nested: PhantomData,
            },
        }
    }

    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        operation: ChooseOp<M1, K>,
        _context: C::Apply<()>,
        _function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> ChooseOp<M2, K>
    where
        C::Apply<()>: Clone,
    {
        match operation {
            ChooseOp::Choose {
                continue_with,
                _nested,
            } => ChooseOp::Choose {
                continue_with,
                _nested: PhantomData,
            },
        }
    }
}

/// The failure signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

/// Operations of [`Empty`].
pub enum EmptyOp<M: 'static, K: 'static> {
    /// Abort this branch; the continuation is never entered.
    Empty {
        /// No payload, no continuation.
        _marker: PhantomData<(M, K)>,
    },
}

impl<M: 'static, K: 'static> Clone for EmptyOp<M, K> {
    fn clone(&self) -> Self {
        Self::Empty {
            _marker: PhantomData,
        }
    }
}

impl Signature for Empty {
    type Op<M: 'static, K: 'static> = EmptyOp<M, K>;

    fn map_continuation<M: 'static, K: 'static, L: 'static>(
        _operation: EmptyOp<M, K>,
        _function: Rc<dyn Fn(K) -> L>,
    ) -> EmptyOp<M, L> {
        EmptyOp::Empty {
            _marker: PhantomData,
        }
    }

    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        _operation: EmptyOp<M1, K>,
        _function: Rc<dyn Fn(M1) -> M2>,
    ) -> EmptyOp<M2, K> {
        EmptyOp::Empty {
            _marker: PhantomData,
        }
    }

    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        _operation: EmptyOp<M1, K>,
        _context: C::Apply<()>,
        _function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> EmptyOp<M2, K>
    where
        C::Apply<()>: Clone,
    {
        EmptyOp::Empty {
            _marker: PhantomData,
        }
    }
}

/// The combined non-determinism signature: failure plus binary choice.
pub type NonDet = Sum<Empty, Choose>;

/// Forks the rest of the program on a boolean.
///
/// Under [`ChooseCarrier`], the `true` branch is enumerated before the
/// `false` branch.
///
/// # Examples
///
/// ```rust
/// use algeff::algebra::Algebra;
/// use algeff::effects::{Choose, ChooseCarrier, choose};
///
/// let program = choose().fmap(|first| if first { 1 } else { 2 });
/// assert_eq!(ChooseCarrier.run(program), vec![1, 2]);
/// ```
#[must_use]
pub fn choose<Sig, Index>() -> Eff<Sig, bool>
where
    Sig: Member<Choose, Index>,
{
    Eff::send(ChooseOp::Choose {
        continue_with: Rc::new(Eff::Pure),
        _nested: PhantomData,
    })
}

/// Aborts the current branch with no result.
#[must_use]
pub fn empty<Sig, A, Index>() -> Eff<Sig, A>
where
    Sig: Member<Empty, Index>,
    A: 'static,
{
    Eff::send(EmptyOp::Empty {
        _marker: PhantomData,
    })
}

/// Collects every branch of a [`Choose`] program, left-then-right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChooseCarrier;

impl Carrier for ChooseCarrier {
    type Output<A: 'static> = Vec<A>;

    fn pure<A: 'static>(&self, value: A) -> Vec<A> {
        vec![value]
    }

    fn bind<A: 'static, B: 'static, F>(&self, action: Vec<A>, function: F) -> Vec<B>
    where
        F: Fn(A) -> Vec<B> + 'static,
    {
        action.into_iter().flat_map(function).collect()
    }
}

impl Algebra for ChooseCarrier {
    type Sig = Choose;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: ChooseOp<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> Vec<<H::Ctx as Context>::Apply<A>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            ChooseOp::Choose {
                continue_with,
                _nested,
            } => {
                let first = continue_with.clone();
                let mut branches = handler.handle(<H::Ctx as Context>::map(
                    context.clone(),
                    move |()| first(true),
                ));
                branches.extend(handler.handle(<H::Ctx as Context>::map(context, move |()| {
                    continue_with(false)
                })));
                branches
            }
        }
    }
}

/// Interprets failure into `Option`: `empty` yields `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyCarrier;

impl Carrier for EmptyCarrier {
    type Output<A: 'static> = Option<A>;

    fn pure<A: 'static>(&self, value: A) -> Option<A> {
        Some(value)
    }

    fn bind<A: 'static, B: 'static, F>(&self, action: Option<A>, function: F) -> Option<B>
    where
        F: Fn(A) -> Option<B> + 'static,
    {
        action.and_then(function)
    }
}

impl Algebra for EmptyCarrier {
    type Sig = Empty;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        _handler: &H,
        operation: EmptyOp<Eff<N, Erased>, Eff<N, A>>,
        _context: <H::Ctx as Context>::Apply<()>,
    ) -> Option<<H::Ctx as Context>::Apply<A>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            EmptyOp::Empty { _marker } => None,
        }
    }
}

/// Interprets [`NonDet`] as the union of branch answers; `empty` contributes
/// none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonDetCarrier;

impl Carrier for NonDetCarrier {
    type Output<A: 'static> = Vec<A>;

    fn pure<A: 'static>(&self, value: A) -> Vec<A> {
        vec![value]
    }

    fn bind<A: 'static, B: 'static, F>(&self, action: Vec<A>, function: F) -> Vec<B>
    where
        F: Fn(A) -> Vec<B> + 'static,
    {
        action.into_iter().flat_map(function).collect()
    }
}

impl Algebra for NonDetCarrier {
    type Sig = NonDet;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: <NonDet as Signature>::Op<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> Vec<<H::Ctx as Context>::Apply<A>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            SumOp::Left(EmptyOp::Empty { _marker }) => Vec::new(),
            SumOp::Right(ChooseOp::Choose {
                continue_with,
                _nested,
            }) => {
                let first = continue_with.clone();
                let mut branches = handler.handle(<H::Ctx as Context>::map(
                    context.clone(),
                    move |()| first(true),
                ));
                branches.extend(handler.handle(<H::Ctx as Context>::map(context, move |()| {
                    continue_with(false)
                })));
                branches
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn two_choices_enumerate_in_order() {
        let program: Eff<Choose, (bool, bool)> =
            choose().flat_map(|first| choose().fmap(move |second| (first, second)));
        assert_eq!(
            ChooseCarrier.run(program),
            vec![(true, true), (true, false), (false, true), (false, false)]
        );
    }

    #[rstest]
    fn empty_yields_no_answer() {
        let program: Eff<Empty, i32> = empty();
        assert_eq!(EmptyCarrier.run(program), None);
    }

    #[rstest]
    fn empty_prunes_one_branch() {
        let program: Eff<NonDet, i32> = choose().flat_map(|keep| {
            if keep {
                Eff::pure(1)
            } else {
                empty()
            }
        });
        assert_eq!(NonDetCarrier.run(program), vec![1]);
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn choice_count_doubles_per_fork(depth in 1usize..5) {
                let mut program: Eff<Choose, Vec<bool>> = Eff::pure(Vec::new());
                for _ in 0..depth {
                    program = program.flat_map(|picks: Vec<bool>| {
                        choose().fmap(move |pick| {
                            let mut extended = picks.clone();
                            extended.push(pick);
                            extended
                        })
                    });
                }
                let answers = ChooseCarrier.run(program);
                prop_assert_eq!(answers.len(), 1 << depth);
            }
        }
    }
}
