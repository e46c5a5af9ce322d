//! Extraction of zip archives.

use crate::types::Result;
use log::{debug, info};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use zip::ZipArchive;

/// Extract every entry of the zip file `archive` into `destination`.
///
/// The destination directory and its parents are created if absent. Returns the
/// number of entries in the archive. Entries whose path would leave `destination`
/// make the extraction fail.
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(archive: P, destination: Q) -> Result<usize> {
    let (archive, destination) = (archive.as_ref(), destination.as_ref());

    fs::create_dir_all(destination)?;

    let mut zip = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    debug!("{} contains {} entries", archive.display(), zip.len());

    zip.extract(destination)?;
    info!(
        "Extracted {} entries from {} into {}",
        zip.len(),
        archive.display(),
        destination.display()
    );

    Ok(zip.len())
}
