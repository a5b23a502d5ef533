//! Terminal rendering. Every renderer returns a `String`; the commands
//! decide where it is printed.

pub mod alert;
pub mod cards;
pub mod chart;
pub mod icons;
pub mod spinner;
pub mod table;

pub use spinner::Spinner;
