pub mod enums;
mod ids;
mod patient;
mod doctor;
mod appointment;
mod lab;
mod medical_record;
mod prescription;

pub use ids::*;
pub use patient::*;
pub use doctor::*;
pub use appointment::*;
pub use lab::*;
pub use medical_record::*;
pub use prescription::*;
