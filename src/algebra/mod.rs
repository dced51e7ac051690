//! The algebra/carrier dispatch core.
//!
//! The pieces, from syntax to interpretation:
//!
//! - [`Signature`]: the operations an effect offers, with functorial
//!   continuation and nested-computation slots;
//! - [`Sum`] / [`Member`]: combining signatures and locating one inside the
//!   combination;
//! - [`Eff`]: a program over a signature sum, built with [`Eff::send`];
//! - [`Context`]: the functor of layer-private state threaded through
//!   handler composition;
//! - [`Carrier`] / [`Algebra`]: the interpreting monad and its single-step
//!   dispatch operation;
//! - [`Handler`] / [`thread`]: resuming programs into carriers, and
//!   forwarding operations through carrier layers.

mod carrier;
mod context;
mod eff;
mod member;
mod signature;
mod sum;

pub mod handler;

pub use carrier::{Algebra, Carrier};
pub use context::{Composed, Context, FailContext, IdContext, PairContext};
pub use eff::{Eff, downcast_continuation};
pub use handler::{Handler, RootHandler, Runner, Threaded, thread};
pub use member::{Here, Member, There, This};
pub use signature::{EndoFn, Erased, Kont, Signature, Thunk, compose_continuation};
pub use sum::{Sum, SumOp};
