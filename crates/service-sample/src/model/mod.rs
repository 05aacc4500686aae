pub mod font;

pub use font::*;
