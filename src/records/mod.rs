//! Clinical records written against appointments, and the patient's
//! read-only view of them.

pub mod history;
pub mod linker;
pub mod prescription;

pub use history::*;
pub use linker::*;
pub use prescription::*;
