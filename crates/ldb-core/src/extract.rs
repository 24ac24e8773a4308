//! Archive extraction
//!
//! Thin wrapper around the zip crate. Entries that would escape the
//! destination directory are rejected by the extractor.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Extract `archive` into `dest`, creating the destination if needed.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;

    fs::create_dir_all(dest)?;
    zip.extract(dest)?;

    tracing::info!(
        archive = %archive.display(),
        dest = %dest.display(),
        entries = zip.len(),
        "archive extracted"
    );

    Ok(())
}
