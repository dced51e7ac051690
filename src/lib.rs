//! # algeff
//!
//! An extensible-effects library built on an algebra/carrier dispatch
//! protocol.
//!
//! ## Overview
//!
//! Effect signatures are declared independently, combined with a binary
//! sum-of-signatures construction, and interpreted by monadic carriers
//! chosen where the program runs:
//!
//! - **Signatures** ([`algebra::Signature`], [`algebra::Sum`],
//!   [`algebra::Member`]): the syntax of effects and their combination;
//! - **Programs** ([`algebra::Eff`]): trees of pending operations built with
//!   smart constructors like [`effects::get`] and [`effects::throw`];
//! - **Carriers** ([`algebra::Carrier`], [`algebra::Algebra`]): the monads
//!   programs are interpreted into, each owning a prefix of the signature
//!   sum and forwarding the rest inward;
//! - **Handlers** ([`algebra::Handler`], [`algebra::thread`]): the
//!   distributive laws that keep every layer's private state attached while
//!   scoped operations (`catch`, `local`, `listen`, `censor`) re-enter the
//!   interpreter.
//!
//! ## Example
//!
//! ```rust
//! use algeff::Signatures;
//! use algeff::algebra::{Algebra, Eff};
//! use algeff::effects::{
//!     Error, ErrorLayer, Lift, LiftCarrier, State, StateLayer, catch, get, modify, throw,
//! };
//!
//! type Sig = Signatures![Error<String>, State<i32>, Lift];
//!
//! let program: Eff<Sig, i32> = modify(|count: i32| count + 1)
//!     .then(catch(
//!         || modify(|count: i32| count + 10).then(throw("undo".to_string())),
//!         |_: String| Eff::pure(()),
//!     ))
//!     .then(get());
//!
//! let carrier = ErrorLayer::<String, _>::new(StateLayer::new(LiftCarrier));
//! // The error layer records failure inside the state layer's action, so
//! // state written before the throw is visible to the recovery branch.
//! assert_eq!(carrier.run(program).run(0), (11, Ok(11)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use algeff::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algebra::{
        Algebra, Carrier, Context, Eff, Handler, Member, Signature, Sum, SumOp,
    };
    pub use crate::effects::*;
    pub use crate::typeclass::{Monoid, Semigroup};
}

pub mod algebra;
pub mod effects;
pub mod typeclass;
