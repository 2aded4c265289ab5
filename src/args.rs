use clap::Parser;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::metadata::DEFAULT_DEVICE_MARKER;

/// Propose camera-timestamp based names for media files.
#[derive(Parser, Debug)]
#[command(name = "exif_rename", version, about, long_about = None)]
pub struct Args {
    /// Increase verbosity (-v=INFO, -vv=DEBUG, -vvv=TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit the rename plan as JSON lines instead of `old -> new`
    #[arg(long)]
    pub json: bool,

    /// Case-insensitive marker identifying the recording device family
    #[arg(long, default_value = DEFAULT_DEVICE_MARKER)]
    pub device_marker: String,

    /// A file or directory, or several files followed by a trailing tag
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

impl Args {
    /// Positional arguments in `argv` shape, with the command name first
    pub fn positional(&self) -> Vec<String> {
        let mut raw = Vec::with_capacity(self.paths.len() + 1);
        raw.push(env!("CARGO_PKG_NAME").to_string());
        raw.extend(self.paths.iter().cloned());
        raw
    }
}

/// Turn `argv`-shaped arguments into the list of files to process.
///
/// With more than one argument every argument but the last is taken as an
/// explicit file; the last one is the trailing tag. A single argument may be
/// a directory (its immediate entries are listed) or a regular file.
pub fn resolve_files(args: &[String]) -> Result<Vec<PathBuf>> {
    let arg = args.get(1).ok_or(Error::MissingArgument)?;

    if args.len() > 2 {
        return Ok(args[1..args.len() - 1].iter().map(PathBuf::from).collect());
    }

    let path = Path::new(arg);
    if path.is_dir() {
        list_directory(path)
    } else if path.is_file() {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(Error::NotFileOrDirectory(path.to_path_buf()))
    }
}

/// The trailing argument of the explicit-list form, if that form is in use
pub fn trailing_argument(args: &[String]) -> Option<&str> {
    if args.len() > 2 {
        args.last().map(String::as_str)
    } else {
        None
    }
}

fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| Error::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        entries.push(entry.into_path());
    }

    log::debug!("Listed {} entries in {}", entries.len(), dir.display());
    Ok(entries)
}
