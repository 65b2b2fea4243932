//! Type definitions for contribgraph

mod calendar;
mod error;

pub use calendar::*;
pub use error::*;
