//! CLI command implementations

mod info;
mod pack;
mod unpack;
mod validate;

pub use info::info;
pub use pack::pack;
pub use unpack::unpack;
pub use validate::validate;

use anyhow::{bail, Result};
use std::path::Path;

/// What kind of input a path points at, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputKind {
    Source,
    Container,
}

pub(crate) fn input_kind(path: &Path) -> Result<InputKind> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("stf") => Ok(InputKind::Source),
        Some("stfpack") => Ok(InputKind::Container),
        Some(other) => bail!("Unrecognized input extension .{other} (expected .stf or .stfpack)"),
        None => bail!("Could not determine input file extension"),
    }
}
