//! Appointment scheduling: the daily slot grid, availability, and the
//! booking ledger that enforces one appointment per doctor and per
//! patient at any slot.

pub mod agenda;
pub mod availability;
pub mod ledger;
pub mod slots;

pub use agenda::*;
pub use availability::*;
pub use ledger::*;
pub use slots::*;
