/// Everything after the last `.`, or the whole name when there is none
pub fn extract_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[idx + 1..],
        None => filename,
    }
}

/// Normalize file extension: uppercase, JPEG -> JPG
pub fn normalize_extension(ext: &str) -> String {
    let upper = ext.to_uppercase();
    if upper == "JPEG" {
        "JPG".to_string()
    } else {
        upper
    }
}

/// Join normalized metadata values into a filename.
///
/// Values are separated by `_`, the optional tag goes last, and empty parts
/// are dropped so the name never carries doubled separators.
pub fn build_filename(values: &[String], tag: Option<&str>, extension: &str) -> String {
    let stem = values
        .iter()
        .map(String::as_str)
        .chain(tag)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    format!("{}.{}", stem, normalize_extension(extension))
}
