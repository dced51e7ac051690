//! The state effect: a single threaded mutable cell.
//!
//! There is no base state carrier: [`StateLayer`] over
//! [`LiftCarrier`](crate::effects::LiftCarrier) is the canonical plain
//! interpretation. The layer's action shape is a function from the incoming
//! state to the inner carrier's output of `(new_state, result)`, and state
//! flows through delegated operations inside a [`PairContext`].

use std::marker::PhantomData;
use std::rc::Rc;

use crate::algebra::{
    Algebra, Carrier, Context, Eff, Erased, Handler, Kont, Member, PairContext, Runner, Signature,
    Sum, SumOp, compose_continuation, thread,
};

/// The state signature over states of type `S`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct State<S: 'static> {
    _state: PhantomData<S>,
}

/// Operations of [`State`].
pub enum StateOp<S: 'static, M: 'static, K: 'static> {
    /// Read the current state.
    Get {
        /// The rest of the program.
        continue_with: Kont<S, K>,
        /// No nested sub-computations.
        _nested: PhantomData<M>,
    },
    /// Replace the current state.
    Put {
        /// The new state.
        state: S,
        /// The rest of the program.
        continue_with: Kont<(), K>,
    },
}

impl<S: Clone + 'static, M: 'static, K: 'static> Clone for StateOp<S, M, K> {
    fn clone(&self) -> Self {
        match self {
            Self::Get {
                continue_with,
                _nested,
            } => Self::Get {
                continue_with: continue_with.clone(),
                _nested: PhantomData,
            },
            Self::Put {
                state,
                continue_with,
            } => Self::Put {
                state: state.clone(),
                continue_with: continue_with.clone(),
            },
        }
    }
}

impl<S: 'static> Signature for State<S> {
    type Op<M: 'static, K: 'static> = StateOp<S, M, K>;

    fn map_continuation<M: 'static, K: 'static, L: 'static>(
        operation: StateOp<S, M, K>,
        function: Rc<dyn Fn(K) -> L>,
    ) -> StateOp<S, M, L> {
        match operation {
            StateOp::Get {
                continue_with,
                _nested,
            } => StateOp::Get {
                continue_with: compose_continuation(continue_with, function),
                _nested: PhantomData,
            },
            StateOp::Put {
                state,
                continue_with,
            } => StateOp::Put {
                state,
                continue_with: compose_continuation(continue_with, function),
            },
        }
    }

    fn map_nested<M1: 'static, M2: 'static, K: 'static>(
        operation: StateOp<S, M1, K>,
        _function: Rc<dyn Fn(M1) -> M2>,
    ) -> StateOp<S, M2, K> {
        match operation {
            StateOp::Get {
                continue_with,
                _nested,
            } => StateOp::Get {
                continue_with,
                _nested: PhantomData,
            },
            StateOp::Put {
                state,
                continue_with,
            } => StateOp::Put {
                state,
                continue_with,
            },
        }
    }

    fn thread_nested<C: Context, M1: 'static, M2: 'static, K: 'static>(
        operation: StateOp<S, M1, K>,
        _context: C::Apply<()>,
        _function: Rc<dyn Fn(C::Apply<M1>) -> M2>,
    ) -> StateOp<S, M2, K>
    where
        C::Apply<()>: Clone,
    {
        match operation {
            StateOp::Get {
                continue_with,
                _nested,
            } => StateOp::Get {
                continue_with,
                _nested: PhantomData,
            },
            StateOp::Put {
                state,
                continue_with,
            } => StateOp::Put {
                state,
                continue_with,
            },
        }
    }
}

/// Reads the current state.
#[must_use]
pub fn get<Sig, S, Index>() -> Eff<Sig, S>
where
    Sig: Member<State<S>, Index>,
    S: 'static,
{
    Eff::send(StateOp::Get {
        continue_with: Rc::new(Eff::Pure),
        _nested: PhantomData,
    })
}

/// Replaces the current state.
#[must_use]
pub fn put<Sig, S, Index>(state: S) -> Eff<Sig, ()>
where
    Sig: Member<State<S>, Index>,
    S: 'static,
{
    Eff::send(StateOp::Put {
        state,
        continue_with: Rc::new(Eff::Pure),
    })
}

/// Applies a function to the current state.
#[must_use]
pub fn modify<Sig, S, Index, F>(function: F) -> Eff<Sig, ()>
where
    Sig: Member<State<S>, Index>,
    S: 'static,
    F: Fn(S) -> S + 'static,
{
    get().flat_map(move |state| put(function(state)))
}

/// A layered state computation: a function from the incoming state into the
/// inner carrier.
pub struct StateAction<S: 'static, C: Carrier, A: 'static> {
    run_function: Box<dyn FnOnce(S) -> C::Output<(S, A)>>,
}

impl<S: 'static, C: Carrier, A: 'static> StateAction<S, C, A> {
    /// Wraps a state-threading function.
    #[must_use]
    pub fn new(run_function: impl FnOnce(S) -> C::Output<(S, A)> + 'static) -> Self {
        Self {
            run_function: Box::new(run_function),
        }
    }

    /// Supplies the initial state.
    #[must_use]
    pub fn run(self, state: S) -> C::Output<(S, A)> {
        (self.run_function)(state)
    }
}

/// Layers state over an inner carrier.
///
/// # Examples
///
/// ```rust
/// use algeff::effects::{LiftCarrier, State, StateLayer, get, modify};
///
/// let carrier = StateLayer::<i32, _>::new(LiftCarrier);
/// let program = modify(|count: i32| count + 1).then(get());
/// assert_eq!(carrier.run_state(41, program), (42, 42));
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct StateLayer<S: 'static, C> {
    inner: C,
    _state: PhantomData<S>,
}

impl<S: 'static, C> StateLayer<S, C> {
    /// Layers state over `inner`.
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self {
            inner,
            _state: PhantomData,
        }
    }
}

impl<S: 'static, C: Clone> Clone for StateLayer<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _state: PhantomData,
        }
    }
}

impl<S: Clone + 'static, C: Algebra> StateLayer<S, C> {
    /// Runs a whole program from an initial state, returning the final
    /// state with the result.
    #[must_use]
    pub fn run_state<A: 'static>(
        &self,
        initial: S,
        program: Eff<<Self as Algebra>::Sig, A>,
    ) -> C::Output<(S, A)> {
        self.run(program).run(initial)
    }
}

impl<S: Clone + 'static, C: Carrier> Carrier for StateLayer<S, C> {
    type Output<A: 'static> = StateAction<S, C, A>;

    fn pure<A: 'static>(&self, value: A) -> StateAction<S, C, A> {
        let inner = self.inner.clone();
        StateAction::new(move |state| inner.pure((state, value)))
    }

    fn bind<A: 'static, B: 'static, F>(
        &self,
        action: StateAction<S, C, A>,
        function: F,
    ) -> StateAction<S, C, B>
    where
        F: Fn(A) -> StateAction<S, C, B> + 'static,
    {
        let inner = self.inner.clone();
        StateAction::new(move |state: S| {
            inner.bind(action.run(state), move |(next_state, value)| {
                function(value).run(next_state)
            })
        })
    }
}

impl<S: Clone + 'static, C: Algebra> Runner for StateLayer<S, C> {
    type Outer = Self;
    type Inner = C;
    type LayerCtx = PairContext<S>;

    fn inner(&self) -> &C {
        &self.inner
    }

    fn resume<T: 'static>(&self, wrapped: (S, StateAction<S, C, T>)) -> C::Output<(S, T)> {
        let (state, action) = wrapped;
        action.run(state)
    }
}

impl<S: Clone + 'static, C: Algebra> Algebra for StateLayer<S, C> {
    type Sig = Sum<State<S>, C::Sig>;

    fn dispatch<N: Signature, A: 'static, H>(
        &self,
        handler: &H,
        operation: <Self::Sig as Signature>::Op<Eff<N, Erased>, Eff<N, A>>,
        context: <H::Ctx as Context>::Apply<()>,
    ) -> StateAction<S, C, <H::Ctx as Context>::Apply<A>>
    where
        H: Handler<N, Self>,
        <H::Ctx as Context>::Apply<()>: Clone,
    {
        match operation {
            SumOp::Left(StateOp::Get {
                continue_with,
                _nested,
            }) => {
                let handler = handler.clone();
                StateAction::new(move |state: S| {
                    let resumed = <H::Ctx as Context>::map(context, |()| {
                        continue_with(state.clone())
                    });
                    handler.handle(resumed).run(state)
                })
            }
            SumOp::Left(StateOp::Put {
                state,
                continue_with,
            }) => {
                let handler = handler.clone();
                StateAction::new(move |_: S| {
                    let resumed =
                        <H::Ctx as Context>::map(context, |()| continue_with(()));
                    handler.handle(resumed).run(state)
                })
            }
            SumOp::Right(forwarded) => {
                let layer = self.clone();
                let handler = handler.clone();
                StateAction::new(move |state: S| {
                    thread(&layer, &handler, forwarded, (state, context))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::Signatures;
    use crate::effects::lift::{Lift, LiftCarrier, lift};
    use crate::effects::nondet::{Choose, ChooseCarrier, choose};

    type PlainState = Signatures![State<i32>, Lift];

    fn plain_carrier() -> StateLayer<i32, LiftCarrier> {
        StateLayer::new(LiftCarrier)
    }

    #[rstest]
    fn get_returns_the_initial_state() {
        let program: Eff<PlainState, i32> = get();
        assert_eq!(plain_carrier().run_state(7, program), (7, 7));
    }

    #[rstest]
    fn put_replaces_the_state() {
        let program: Eff<PlainState, i32> = put(10).then(get());
        assert_eq!(plain_carrier().run_state(0, program), (10, 10));
    }

    #[rstest]
    fn modify_threads_through_sequencing() {
        let program: Eff<PlainState, i32> = modify(|count: i32| count + 1)
            .then(modify(|count: i32| count * 2))
            .then(get());
        assert_eq!(plain_carrier().run_state(3, program), (8, 8));
    }

    #[rstest]
    fn forwarded_lift_observes_threaded_state() {
        let program: Eff<PlainState, i32> = put(5)
            .then(lift(|| 100))
            .flat_map(|lifted| get().fmap(move |state: i32| state + lifted));
        assert_eq!(plain_carrier().run_state(0, program), (5, 105));
    }

    #[rstest]
    fn state_is_branch_local_under_choice() {
        type Branching = Signatures![State<i32>, Choose];
        let carrier = StateLayer::<i32, _>::new(ChooseCarrier);
        let program: Eff<Branching, i32> = choose().flat_map(|first| {
            let increment = if first { 1 } else { 10 };
            modify(move |count: i32| count + increment).then(get())
        });
        assert_eq!(carrier.run_state(0, program), vec![(1, 1), (10, 10)]);
    }
}
