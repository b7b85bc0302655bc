//! JSON document persistence
//!
//! Each run writes a new file. The first free name out of `<base>.<ext>`,
//! `<base>_1.<ext>`, `<base>_2.<ext>`, ... is taken; files are created with
//! exclusive-create, so an earlier run's output is never overwritten.

use crate::config::OutputConfig;
use crate::models::ArticleRecord;
use crate::output::OutputResult;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Returns the file path for the given suffix number (0 means no suffix)
pub fn candidate_path(dir: &Path, base_name: &str, extension: &str, suffix: u32) -> PathBuf {
    if suffix == 0 {
        dir.join(format!("{}.{}", base_name, extension))
    } else {
        dir.join(format!("{}_{}.{}", base_name, suffix, extension))
    }
}

/// Creates the first free output file
fn create_unique_file(config: &OutputConfig) -> OutputResult<(File, PathBuf)> {
    let dir = Path::new(&config.directory);
    std::fs::create_dir_all(dir)?;

    let mut suffix = 0;
    loop {
        let path = candidate_path(dir, &config.base_name, &config.extension, suffix);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Writes all records to a new JSON document
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written document
/// * `Err(OutputError)` - The file could not be created or written
pub fn write_results(records: &[ArticleRecord], config: &OutputConfig) -> OutputResult<PathBuf> {
    let (file, path) = create_unique_file(config)?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(path)
}

/// Persists the crawl results, logging instead of failing
///
/// The crawl has already done its work by the time this runs, so a write
/// failure is reported and `None` returned.
pub fn save_results(records: &[ArticleRecord], config: &OutputConfig) -> Option<PathBuf> {
    match write_results(records, config) {
        Ok(path) => {
            tracing::info!("Saved {} articles to {}", records.len(), path.display());
            Some(path)
        }
        Err(e) => {
            tracing::error!(
                "Error writing {} articles to {}: {}",
                records.len(),
                config.directory,
                e
            );
            None
        }
    }
}

/// Reads a document written by [`write_results`]
pub fn load_results(path: &Path) -> OutputResult<Vec<ArticleRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
