//! Archive unpacking for the extraction pass.
//!
//! The format is picked from the file extension. ZIP archives go through the
//! `zip` crate, TAR through `tar`, and GZ through `flate2`. Every member of a
//! gzip stream is decoded; a payload that turns out to be a tarball is unpacked
//! as one, anything else is written out as a single file.

use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::normalize::split_extension;

/// Errors raised while unpacking an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The extension names no format this module can unpack.
    #[error("unsupported archive format: {}", .0.display())]
    Unsupported(PathBuf),
    /// Reading the archive or writing its contents failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The ZIP container is invalid or corrupt.
    #[error("invalid or corrupt zip: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    Gz,
}

impl ArchiveFormat {
    /// Detects the format from the extension after the last `.`, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        let (_, ext) = split_extension(&name);
        match ext.trim_start_matches('.').to_uppercase().as_str() {
            "ZIP" => Some(ArchiveFormat::Zip),
            "TAR" => Some(ArchiveFormat::Tar),
            "GZ" => Some(ArchiveFormat::Gz),
            _ => None,
        }
    }
}

/// Returns the extraction folder name for an archive.
///
/// This is the file name without its extension. A name made only of an
/// extension (`.zip`) falls back to the extension text without the dot.
pub fn archive_stem(file_name: &str) -> String {
    let (base, ext) = split_extension(file_name);
    if base.is_empty() {
        ext.trim_start_matches('.').to_string()
    } else {
        base.to_string()
    }
}

/// Unpacks `archive_path` into `destination`, creating it if needed.
///
/// Existing files in `destination` are overwritten. Returns the number of
/// files written.
pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<usize, ArchiveError> {
    let format = ArchiveFormat::from_path(archive_path)
        .ok_or_else(|| ArchiveError::Unsupported(archive_path.to_path_buf()))?;

    fs::create_dir_all(destination)?;

    let count = match format {
        ArchiveFormat::Zip => extract_zip(archive_path, destination)?,
        ArchiveFormat::Tar => extract_tar(File::open(archive_path)?, destination)?,
        ArchiveFormat::Gz => extract_gz(archive_path, destination)?,
    };

    log::debug!(
        "Extracted {} file(s) from {} into {}",
        count,
        archive_path.display(),
        destination.display()
    );
    Ok(count)
}

fn extract_zip(archive_path: &Path, destination: &Path) -> Result<usize, ArchiveError> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let entry_path = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                log::warn!("Skipping unsafe zip entry path: {}", entry.name());
                continue;
            }
        };

        let output_path = destination.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&output_path)?;
            io::copy(&mut entry, &mut outfile)?;
            count += 1;
        }
    }
    Ok(count)
}

fn extract_tar<R: Read>(reader: R, destination: &Path) -> Result<usize, ArchiveError> {
    let mut archive = tar::Archive::new(reader);

    let mut count = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_file = entry.header().entry_type().is_file();
        // `unpack_in` refuses paths escaping the destination and reports them as false.
        if entry.unpack_in(destination)? && is_file {
            count += 1;
        }
    }
    Ok(count)
}

fn extract_gz(archive_path: &Path, destination: &Path) -> Result<usize, ArchiveError> {
    // Concatenated gzip members form one payload.
    let mut decoder = MultiGzDecoder::new(File::open(archive_path)?);
    let mut payload = Vec::new();
    decoder.read_to_end(&mut payload)?;

    if infer::archive::is_tar(&payload) {
        return extract_tar(Cursor::new(payload), destination);
    }

    let original_name = decoder
        .header()
        .and_then(|header| header.filename())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .and_then(|name| {
            Path::new(&name)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        });
    let file_name = match original_name {
        Some(name) => name,
        None => {
            let archive_name = archive_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            archive_stem(&archive_name)
        }
    };

    fs::write(destination.join(file_name), payload)?;
    Ok(1)
}
