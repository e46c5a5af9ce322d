//! Unpack the point cloud archive next to it in the data directory.

use anyhow::{Context, Result};
use svd_compression::config::ArchiveLayout;
use svd_compression::extract_archive;

pub fn main() -> Result<()> {
    env_logger::init();

    let layout = ArchiveLayout::default();
    extract_archive(&layout.archive, &layout.destination)
        .with_context(|| format!("Could not extract {}", layout.archive.display()))?;

    Ok(())
}
