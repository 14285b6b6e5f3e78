//! Debugger state: readiness, frames, breakpoints and variables.

pub mod breakpoints;
pub mod controller;
pub mod frame;
pub mod variables;

pub use breakpoints::BreakpointRegistry;
pub use controller::{Effect, Phase, SessionState, TracerController, TracerInput};
pub use frame::Frame;
pub use variables::{Scope, VariableRow, VariableTable};
