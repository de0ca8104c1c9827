pub mod cities;
pub mod monthly;
pub mod pies;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub use cities::cities;
pub use monthly::monthly;
pub use pies::pies;

/// Deletes and recreates one chart output folder under the output root.
/// Assumes at most one process writes to a given folder at a time.
pub fn prepare_output_dir(root: &Path, folder: &str) -> Result<PathBuf> {
    let dir = root.join(folder);
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;

    Ok(dir)
}

// -- Tests -------------------------------------------------------------------
