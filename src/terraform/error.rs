use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a Terraform configuration from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File or directory could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid HCL
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    /// Directory exists but holds no `.tf` file
    #[error("no terraform files found in {}", path.display())]
    NoConfiguration { path: PathBuf },
}
