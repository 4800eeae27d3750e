#[macro_use] extern crate hex_literal;

mod error;
mod stats;
mod util;
mod crypto;

pub use error::*;
pub use stats::*;
pub use util::*;
pub use crypto::*;
