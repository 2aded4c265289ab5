//! Propose filenames for photos and videos from their camera metadata.
//!
//! Metadata comes from `exiftool`; the capture timestamp and camera model are
//! normalized and joined into a name such as `230704_1530_45_Hero10Black.MP4`.

pub mod args;
pub mod error;
pub mod filename;
pub mod metadata;
pub mod processor;

pub use error::{Error, Result};
