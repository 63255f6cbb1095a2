//! JSON export of finished scan indices

use crate::core::types::{AddressEntry, ClassNameEntry, MemoryResult};
use crate::scanner::{AddressIndex, ClassNameIndex, ScanReport};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct AddressDocument<'a> {
    complete: bool,
    removed_duplicates: usize,
    entries: Vec<&'a AddressEntry>,
}

#[derive(Serialize)]
struct ClassNameDocument<'a> {
    complete: bool,
    classes: BTreeMap<&'a str, &'a [ClassNameEntry]>,
}

/// Where `write_json` put the two documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub addresses: PathBuf,
    pub class_names: PathBuf,
}

/// Prefix `name` with `at` as `yyyyMMdd-HHmmss-`
pub fn stamped_file_name(name: &str, at: NaiveDateTime) -> String {
    format!("{}-{}", at.format("%Y%m%d-%H%M%S"), name)
}

/// Serialize the address index
pub fn addresses_to_json(
    index: &AddressIndex,
    complete: bool,
    removed_duplicates: usize,
) -> MemoryResult<String> {
    let document = AddressDocument {
        complete,
        removed_duplicates,
        entries: index.iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Serialize the class name index
pub fn class_names_to_json(index: &ClassNameIndex, complete: bool) -> MemoryResult<String> {
    let document = ClassNameDocument {
        complete,
        classes: index.iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write both indices of a report into `directory`
pub fn write_json(
    report: &ScanReport,
    directory: &Path,
    addresses_file: &str,
    class_names_file: &str,
) -> MemoryResult<ExportPaths> {
    fs::create_dir_all(directory)?;
    let complete = report.is_complete();

    let paths = ExportPaths {
        addresses: directory.join(addresses_file),
        class_names: directory.join(class_names_file),
    };

    write_document(
        &paths.addresses,
        &addresses_to_json(&report.addresses, complete, report.removed_duplicates)?,
    )?;
    write_document(
        &paths.class_names,
        &class_names_to_json(&report.class_names, complete)?,
    )?;

    info!(
        addresses = %paths.addresses.display(),
        class_names = %paths.class_names.display(),
        "Wrote scan results"
    );
    Ok(paths)
}

fn write_document(path: &Path, contents: &str) -> MemoryResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    Ok(())
}
