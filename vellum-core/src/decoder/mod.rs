//! Decoders: STF source text and transport containers to manuscripts

mod container;
mod stf;

pub use container::ContainerSession;
pub use stf::scan;
