//! Sign-up logic for a capacity-bounded roster with an overflow waitlist.
//!
//! Nothing in this crate performs I/O: inbound text is parsed into a
//! [`Command`], [`Roster::apply`] mutates the state and hands back the
//! [`Reply`] messages the caller is expected to deliver.

pub mod command;
pub mod roster;

pub use command::Command;
pub use roster::{InvariantViolation, Player, Reply, Roster, DEFAULT_DISPLAY_NAME, MAX_PLAYERS};
