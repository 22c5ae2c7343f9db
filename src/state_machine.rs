//! Call-session state machine
//!
//! Pure transitions: given a call's state, the menu graph and one event,
//! compute the next state, the reply for the caller and any effects the
//! engine must carry out. No clocks, no storage, no I/O.

mod effect;
pub mod event;
mod outcome;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{Event, Reservation};
pub use outcome::{CallDirective, Outcome};
pub use state::{CallPhase, CallState, Disposition};
pub use transition::{transition, TransitionError};
