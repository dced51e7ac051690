//! Built-in effect signatures and their carriers.
//!
//! Each submodule declares one effect: its signature, the smart constructors
//! that build [`Eff`](crate::algebra::Eff) programs, and the carriers that
//! interpret it. Base carriers (`ErrorCarrier`, `ReaderCarrier`,
//! `WriterCarrier`, the non-determinism carriers, `LiftCarrier`) terminate a
//! stack; layers (`ErrorLayer`, `ReaderLayer`, `WriterLayer`, `StateLayer`,
//! `RwsLayer`) own the head of their sum and forward the rest inward.

pub mod error;
pub mod lift;
pub mod nondet;
pub mod reader;
pub mod rws;
pub mod state;
pub mod writer;

pub use error::{Error, ErrorCarrier, ErrorLayer, ErrorOp, catch, throw};
pub use lift::{Lift, LiftCarrier, LiftOp, lift};
pub use nondet::{
    Choose, ChooseCarrier, ChooseOp, Empty, EmptyCarrier, EmptyOp, NonDet, NonDetCarrier, choose,
    empty,
};
pub use reader::{
    EnvReader, Reader, ReaderAction, ReaderCarrier, ReaderLayer, ReaderOp, ReaderRunner, ask,
    asks, local,
};
pub use rws::{RwsAction, RwsLayer, RwsRunner};
pub use state::{State, StateAction, StateLayer, StateOp, get, modify, put};
pub use writer::{Writer, WriterCarrier, WriterLayer, WriterOp, censor, listen, tell};
