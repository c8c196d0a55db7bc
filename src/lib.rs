//! hextris-infra - checks for the Hextris AWS deployment
//!
//! Loads the Terraform definition in `infra/` into a typed configuration tree
//! and verifies it against fixed expectations using partial structural
//! matching.

pub mod matcher;
pub mod output;
pub mod record;
pub mod scenario;
pub mod terraform;
pub mod value;

mod error;

use std::path::Path;

pub use error::Error;
pub use matcher::{MatchError, find_by_path, matches, matches_list};
pub use record::{Metadata, Record};
pub use scenario::{Report, Scenario, Selector};
pub use terraform::{ConfigTree, LoadError, load_from_path};
pub use value::{Reference, Scalar, Value};

/// Loads the configuration at `path` and runs the Hextris scenarios on it.
pub fn verify(path: impl AsRef<Path>) -> Result<Report, Error> {
    let tree = load_from_path(path)?;
    Ok(scenario::run(&tree, &scenario::hextris::scenarios()))
}
