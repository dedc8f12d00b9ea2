use regex::Regex;

// Allowed image file types
lazy_static::lazy_static! {
    static ref FILE_TYPES: Regex =
        Regex::new("jpeg|jpg|png|gif|svg").expect("file type pattern is valid");
}

/// Why a file was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("file extension is not an image type")]
    Extension,
    #[error("declared mime type is not an image type")]
    MimeType,
}

/// Check both the extension of `file_name` and the declared `mime_type`
/// against the accepted image types.
pub fn is_acceptable_file(file_name: &str, mime_type: &str) -> Result<(), Rejection> {
    if !FILE_TYPES.is_match(&extension(file_name).to_lowercase()) {
        return Err(Rejection::Extension);
    }
    if !FILE_TYPES.is_match(mime_type) {
        return Err(Rejection::MimeType);
    }
    Ok(())
}

/// Extension of the last path segment, dot included. Dotfiles have none.
fn extension(file_name: &str) -> &str {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(index) => &base[index..],
    }
}
