/// Recognized media categories for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Resolves a caller-declared kind string. Returns `None` for anything
    /// outside the two recognized categories; rejection happens before any
    /// decoding work is attempted.
    pub fn resolve(declared: &str) -> Option<Self> {
        match declared.trim().to_lowercase().as_str() {
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Maps a MIME type from an upload to a media kind, e.g. `video/mp4`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let top_level = mime.split('/').next()?;
        Self::resolve(top_level)
    }
}

/// One uploaded media file plus the kind the caller declared for it.
///
/// The declared kind is kept as the raw string so that an unrecognized value
/// can be reported back verbatim in the rejection.
#[derive(Debug, Clone)]
pub struct MediaInput {
    pub declared_kind: String,
    pub data: Vec<u8>,
}

impl MediaInput {
    pub fn new(declared_kind: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            declared_kind: declared_kind.into(),
            data,
        }
    }
}
