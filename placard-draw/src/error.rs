use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, DrawError>;

/// Everything a draw call can fail with.
///
/// Degenerate text (empty after sanitization, or zero measured width) is not an error;
/// those calls return `Ok` without touching the canvas.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    /// A local image or font path does not exist; aborts the current draw call.
    #[error("no such file: {}", path.display())]
    NotFound { path: PathBuf },

    /// The loaded bytes are not an image we can decode.
    #[error("failed to decode image")]
    Decode(#[source] image::ImageError),

    /// Remote fetch failed, or network support was compiled out
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// fontdue hands back `&'static str` errors, so we only keep the message
    #[error("font error: {0}")]
    Font(String),

    #[error("invalid hex color {0:?}")]
    InvalidColor(String),

    #[error("failed to encode canvas")]
    Encode(#[source] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DrawError {
    /// `true` when the caller may skip the element and keep composing.
    /// Only a bad image payload qualifies; a missing file is fatal for the call.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_decode_failures_are_recoverable() {
        let decode = DrawError::Decode(image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::Format(image::error::ImageFormatHint::Unknown),
            ),
        ));
        assert!(decode.is_recoverable());

        let missing = DrawError::NotFound {
            path: PathBuf::from("/nope.png"),
        };
        assert!(!missing.is_recoverable());
        assert_eq!(missing.to_string(), "no such file: /nope.png");
    }
}
