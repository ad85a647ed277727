//! Record shapes for the two collections.

pub mod coerce;
pub mod dealership;
pub mod review;

pub use dealership::Dealership;
pub use review::{Review, ReviewDraft};
