pub mod font_client;

pub use font_client::*;
