use super::error::FormError;
use super::models::{DownloadRequest, Format, Quality};

/// What the user typed into the download form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadForm {
    pub url: String,
    pub format: Format,
    pub quality: Option<Quality>,
}

/// Checks the form and builds the creation request.
///
/// Quality is required for mp4 and dropped for every other format.
pub fn validate_form(form: &DownloadForm) -> Result<DownloadRequest, FormError> {
    let url = form.url.trim();
    if url.is_empty() {
        return Err(FormError::MissingUrl);
    }

    let quality = match form.format {
        Format::Mp4 => Some(form.quality.ok_or(FormError::MissingQuality)?),
        Format::Mp3 => None,
    };

    Ok(DownloadRequest {
        url: url.to_string(),
        format: form.format,
        quality,
    })
}

/// Only YouTube links get a preview lookup
pub fn is_previewable(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && (url.contains("youtube.com") || url.contains("youtu.be"))
}
