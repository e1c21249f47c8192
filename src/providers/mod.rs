pub mod juchats;

pub use juchats::*;
