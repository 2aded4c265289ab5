use chrono::NaiveDateTime;
use exiftool::ExifTool;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Fields requested for every file, in filename order
pub const DEFAULT_FIELDS: &[&str] = &["DateTimeOriginal", "Model"];

/// The field reformatted as a compact timestamp rather than space-stripped
pub const TIMESTAMP_FIELD: &str = "DateTimeOriginal";

/// ExifTool date format: "YYYY:MM:DD HH:MM:SS"
const EXIF_TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Output format: "YYMMDD_HHMM_SS"
const FILENAME_TIMESTAMP_FORMAT: &str = "%y%m%d_%H%M_%S";

pub const DEFAULT_DEVICE_MARKER: &str = "gopro";

/// Tags describing where the file lives rather than what recorded it
const LOCATION_TAGS: &[&str] = &["SourceFile", "FileName", "Directory"];

/// One file's metadata as reported by exiftool, keyed by tag name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    tags: HashMap<String, Value>,
}

impl MetadataRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.tags.get(field)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.tags.iter()
    }
}

impl FromIterator<(String, Value)> for MetadataRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        MetadataRecord {
            tags: iter.into_iter().collect(),
        }
    }
}

/// Anything able to produce a metadata record for a file.
///
/// An empty `fields` slice asks for every tag the source knows about.
pub trait MetadataSource {
    fn read(&mut self, path: &Path, fields: &[&str]) -> Result<MetadataRecord>;
}

/// Reads metadata through a long-running exiftool process
pub struct ExifToolSource {
    exiftool: ExifTool,
}

impl ExifToolSource {
    pub fn new() -> Result<Self> {
        let exiftool = ExifTool::new().map_err(Error::StartTool)?;
        Ok(ExifToolSource { exiftool })
    }
}

impl MetadataSource for ExifToolSource {
    fn read(&mut self, path: &Path, fields: &[&str]) -> Result<MetadataRecord> {
        let file_path_str = path.to_string_lossy();

        let tag_args: Vec<String> = fields.iter().map(|field| format!("-{}", field)).collect();
        let mut args: Vec<&str> = tag_args.iter().map(String::as_str).collect();
        args.push(&file_path_str);

        log::trace!("exiftool -json {}", args.join(" "));

        let output = self
            .exiftool
            .json_execute(&args)
            .map_err(|e| Error::ExternalTool {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        first_record(path, output)
    }
}

/// exiftool answers with an array holding one object per file
fn first_record(path: &Path, output: Value) -> Result<MetadataRecord> {
    let records: Vec<MetadataRecord> =
        serde_json::from_value(output).map_err(|source| Error::MalformedMetadata {
            path: path.to_path_buf(),
            source,
        })?;

    records
        .into_iter()
        .next()
        .ok_or_else(|| Error::EmptyMetadata(path.to_path_buf()))
}

/// Read `fields` for one file and normalize them for use in a filename
pub fn extract_exif_fields<S: MetadataSource + ?Sized>(
    source: &mut S,
    path: &Path,
    fields: &[&str],
) -> Result<Vec<String>> {
    let record = source.read(path, fields)?;
    find_metadata_fields(&record, fields)
}

/// Project `fields` out of `record`, in order, normalizing each value
pub fn find_metadata_fields(record: &MetadataRecord, fields: &[&str]) -> Result<Vec<String>> {
    fields
        .iter()
        .map(|field| {
            let raw = record
                .get(field)
                .ok_or_else(|| Error::MissingField(field.to_string()))?;
            normalize_field(field, raw)
        })
        .collect()
}

fn normalize_field(field: &str, raw: &Value) -> Result<String> {
    let value = value_text(raw);

    if field == TIMESTAMP_FIELD {
        format_timestamp(field, &value)
    } else {
        Ok(value.replace(' ', ""))
    }
}

fn format_timestamp(field: &str, value: &str) -> Result<String> {
    let parsed = NaiveDateTime::parse_from_str(value, EXIF_TIMESTAMP_FORMAT).map_err(|source| {
        Error::TimestampFormat {
            field: field.to_string(),
            value: value.to_string(),
            source,
        }
    })?;

    Ok(parsed.format(FILENAME_TIMESTAMP_FORMAT).to_string())
}

/// JSON strings as-is, anything else in its JSON text form
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether any tag name or value mentions `marker`, ignoring case.
/// Path tags are left out so a folder named after the device does not count.
pub fn is_device(record: &MetadataRecord, marker: &str) -> bool {
    let marker = marker.to_lowercase();

    record
        .iter()
        .filter(|(key, _)| !LOCATION_TAGS.contains(&key.as_str()))
        .any(|(key, value)| {
            key.to_lowercase().contains(&marker)
                || value_text(value).to_lowercase().contains(&marker)
        })
}

/// Read every tag for `path` and check it for `marker`; unreadable files are
/// treated as not matching.
pub fn detect_device<S: MetadataSource + ?Sized>(
    source: &mut S,
    path: &Path,
    marker: &str,
) -> bool {
    match source.read(path, &[]) {
        Ok(record) => is_device(&record, marker),
        Err(e) => {
            log::debug!("Device detection skipped for {}: {}", path.display(), e);
            false
        }
    }
}

/// In-memory source keyed by path, used where exiftool is not available
#[cfg(test)]
#[derive(Debug, Default)]
pub struct StaticSource {
    records: HashMap<PathBuf, MetadataRecord>,
    pub requests: Vec<(PathBuf, Vec<String>)>,
}

#[cfg(test)]
impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, record: MetadataRecord) {
        self.records.insert(path.into(), record);
    }
}

#[cfg(test)]
impl MetadataSource for StaticSource {
    fn read(&mut self, path: &Path, fields: &[&str]) -> Result<MetadataRecord> {
        self.requests.push((
            path.to_path_buf(),
            fields.iter().map(|f| f.to_string()).collect(),
        ));

        let record = self.records.get(path).ok_or_else(|| Error::ExternalTool {
            path: path.to_path_buf(),
            message: "Error: File not found".to_string(),
        })?;

        if fields.is_empty() {
            return Ok(record.clone());
        }

        Ok(record
            .iter()
            .filter(|(key, _)| fields.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
