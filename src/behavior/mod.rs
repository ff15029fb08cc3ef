pub mod controller;
pub mod policy;
pub mod state;

pub use policy::{react, BehaviorEvent};
pub use state::{BehaviorState, StateKind, Transition};
