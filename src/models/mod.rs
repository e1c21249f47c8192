pub mod juchats;
pub mod openai;

pub use juchats::*;
pub use openai::*;
