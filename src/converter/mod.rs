pub mod openai_to_juchats;

pub use openai_to_juchats::*;
