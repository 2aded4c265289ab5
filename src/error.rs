use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing argument: expected a file or a directory")]
    MissingArgument,

    #[error("argument is neither a file or a directory: {}", .0.display())]
    NotFileOrDirectory(PathBuf),

    #[error("failed to list directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to start exiftool")]
    StartTool(#[source] exiftool::ExifToolError),

    #[error("could not get metadata for file `{}`\n{message}", path.display())]
    ExternalTool { path: PathBuf, message: String },

    #[error("no metadata returned for file `{}`", .0.display())]
    EmptyMetadata(PathBuf),

    #[error("failed to parse metadata for file `{}`", path.display())]
    MalformedMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("field {field} has value '{value}', expected YYYY:MM:DD HH:MM:SS")]
    TimestampFormat {
        field: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("field {0} not present in metadata")]
    MissingField(String),
}
