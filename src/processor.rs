use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::filename::{build_filename, extract_extension};
use crate::metadata::{
    detect_device, extract_exif_fields, MetadataSource, DEFAULT_DEVICE_MARKER, DEFAULT_FIELDS,
};

#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    pub fields: Vec<String>,
    pub device_marker: String,
    pub tag: Option<String>,
    pub json: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        ProcessorOptions {
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            device_marker: DEFAULT_DEVICE_MARKER.to_string(),
            tag: None,
            json: false,
        }
    }
}

/// One line of the rename plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRename {
    pub source: PathBuf,
    pub new_name: String,
    pub values: Vec<String>,
    pub device_detected: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub planned: usize,
    pub skipped: usize,
}

pub struct Processor<S: MetadataSource> {
    source: S,
    options: ProcessorOptions,
    stats: ProcessingStats,
}

impl<S: MetadataSource> Processor<S> {
    pub fn new(source: S, options: ProcessorOptions) -> Self {
        Processor {
            source,
            options,
            stats: ProcessingStats::default(),
        }
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Build the rename plan for `files`, stopping at the first file whose
    /// metadata cannot be read or normalized.
    pub fn process(&mut self, files: &[PathBuf]) -> Result<Vec<PlannedRename>> {
        self.stats.total_files = files.len();
        log::info!("Found {} paths to process", files.len());

        let mut plan = Vec::with_capacity(files.len());

        for path in files {
            // Subdirectories show up in directory listings; they have no EXIF
            if path.is_dir() {
                log::warn!("Skipping directory {}", path.display());
                self.stats.skipped += 1;
                continue;
            }

            let entry = self.plan_file(path)?;
            self.report(&entry);
            self.stats.planned += 1;
            plan.push(entry);
        }

        if !self.options.json {
            self.print_summary();
        }

        Ok(plan)
    }

    fn plan_file(&mut self, path: &Path) -> Result<PlannedRename> {
        let fields: Vec<&str> = self.options.fields.iter().map(String::as_str).collect();
        let values = extract_exif_fields(&mut self.source, path, &fields)?;

        let device_detected = detect_device(&mut self.source, path, &self.options.device_marker);
        if device_detected {
            log::debug!("{} recorded by a {} device", path.display(), self.options.device_marker);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let new_name = build_filename(
            &values,
            self.options.tag.as_deref(),
            extract_extension(&file_name),
        );

        log::debug!("{} -> {}", path.display(), new_name);

        Ok(PlannedRename {
            source: path.to_path_buf(),
            new_name,
            values,
            device_detected,
        })
    }

    fn report(&self, entry: &PlannedRename) {
        if self.options.json {
            match serde_json::to_string(entry) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!(
                    "Failed to serialize plan entry for {}: {}",
                    entry.source.display(),
                    e
                ),
            }
        } else {
            let marker = if entry.device_detected {
                format!(" [{}]", self.options.device_marker)
            } else {
                String::new()
            };
            println!("{} -> {}{}", entry.source.display(), entry.new_name, marker);
        }
    }

    fn print_summary(&self) {
        println!();
        println!("=== PLAN COMPLETE ===");
        println!("Total paths: {}", self.stats.total_files);
        println!("Planned renames: {}", self.stats.planned);
        if self.stats.skipped > 0 {
            println!("Skipped (directories): {}", self.stats.skipped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::metadata::{MetadataRecord, StaticSource};
    use serde_json::json;
    use std::fs;

    fn record(value: serde_json::Value) -> MetadataRecord {
        serde_json::from_value(value).unwrap()
    }

    fn hero_clip() -> MetadataRecord {
        record(json!({
            "DateTimeOriginal": "2023:07:04 15:30:45",
            "Model": "Hero 10 Black",
            "Make": "GoPro"
        }))
    }

    #[test]
    fn test_plan_for_single_file() {
        let mut source = StaticSource::new();
        source.insert("GX010001.MP4", hero_clip());

        let mut processor = Processor::new(source, ProcessorOptions::default());
        let plan = processor.process(&[PathBuf::from("GX010001.MP4")]).unwrap();

        assert_eq!(
            plan,
            vec![PlannedRename {
                source: PathBuf::from("GX010001.MP4"),
                new_name: "230704_1530_45_Hero10Black.MP4".to_string(),
                values: vec!["230704_1530_45".to_string(), "Hero10Black".to_string()],
                device_detected: true,
            }]
        );
        assert_eq!(processor.stats().planned, 1);
    }

    #[test]
    fn test_plan_appends_tag() {
        let mut source = StaticSource::new();
        source.insert(
            "IMG_0001.jpeg",
            record(json!({ "DateTimeOriginal": "2019:12:31 23:59:59", "Model": "iPhone X" })),
        );

        let options = ProcessorOptions {
            tag: Some("party".to_string()),
            ..ProcessorOptions::default()
        };
        let mut processor = Processor::new(source, options);
        let plan = processor.process(&[PathBuf::from("IMG_0001.jpeg")]).unwrap();

        assert_eq!(plan[0].new_name, "191231_2359_59_iPhoneX_party.JPG");
        assert!(!plan[0].device_detected);
    }

    #[test]
    fn test_first_failure_aborts_run() {
        let mut source = StaticSource::new();
        source.insert("good.MP4", hero_clip());
        source.insert("bad.MP4", record(json!({ "Model": "Hero 10 Black" })));

        let mut processor = Processor::new(source, ProcessorOptions::default());
        let err = processor
            .process(&[
                PathBuf::from("good.MP4"),
                PathBuf::from("bad.MP4"),
                PathBuf::from("never.MP4"),
            ])
            .unwrap_err();

        assert!(matches!(err, Error::MissingField(ref f) if f == "DateTimeOriginal"));
        assert_eq!(processor.stats().planned, 1);
    }

    #[test]
    fn test_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();

        let mut processor = Processor::new(StaticSource::new(), ProcessorOptions::default());
        let plan = processor.process(&[nested]).unwrap();

        assert!(plan.is_empty());
        assert_eq!(
            processor.stats(),
            &ProcessingStats {
                total_files: 1,
                planned: 0,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_plan_entry_serializes() {
        let entry = PlannedRename {
            source: PathBuf::from("a.mov"),
            new_name: "230704_1530_45_X.MOV".to_string(),
            values: vec!["230704_1530_45".to_string(), "X".to_string()],
            device_detected: false,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["new_name"], "230704_1530_45_X.MOV");
        assert_eq!(value["device_detected"], false);
    }
}
