//! Domain models for treatment plans.

mod analysis;
mod interaction;
mod medication;
mod recommendation;
mod schedule;

pub use analysis::*;
pub use interaction::*;
pub use medication::*;
pub use recommendation::*;
pub use schedule::*;
