//! Encoders: manuscripts to transport containers and STF source text

mod container;
mod stf;

pub use container::encode;
pub use stf::write_stf;
