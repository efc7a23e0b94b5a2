use std::sync::LazyLock;

use regex::Regex;

use crate::MediaFile;

/// Media types accepted for upload.
pub const ACCEPTED_MEDIA_TYPES: [&str; 2] = ["audio/mpeg", "video/mp4"];

static YOUTUBE_WATCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?youtube\.com/watch\?v=.+").expect("valid regex")
});

static DRIVE_SHARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://drive\.google\.com/file/d/.+/view\?usp=sharing").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "Invalid URL. Please enter a valid YouTube or Google Drive link. \
         If Google Drive link, check if it is shared publicly."
    )]
    InvalidUrl,
    #[error("Invalid file type. Only upload *.mp4 or *.mp3 files.")]
    InvalidFileType,
}

/// Accepts YouTube watch URLs and publicly shared Google Drive file URLs only.
pub fn validate_url(url: &str) -> bool {
    YOUTUBE_WATCH_RE.is_match(url) || DRIVE_SHARE_RE.is_match(url)
}

/// Accepts files whose declared media type is exactly `audio/mpeg` or `video/mp4`.
pub fn validate_file(file: &MediaFile) -> bool {
    ACCEPTED_MEDIA_TYPES.contains(&file.media_type.as_str())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{validate_file, validate_url};
    use crate::MediaFile;

    fn file_of_type(media_type: &str) -> MediaFile {
        MediaFile {
            name: "clip".to_string(),
            media_type: media_type.to_string(),
            path: PathBuf::from("clip"),
        }
    }

    #[test]
    fn youtube_watch_urls() {
        assert!(validate_url("https://www.youtube.com/watch?v=abc123"));
        assert!(validate_url("http://youtube.com/watch?v=abc123"));
        assert!(!validate_url("https://youtu.be/abc123"));
        assert!(!validate_url("https://www.youtube.com/watch?v="));
        assert!(!validate_url("https://m.youtube.com/watch?v=abc123"));
        assert!(!validate_url("ftp://www.youtube.com/watch?v=abc123"));
    }

    #[test]
    fn drive_share_urls() {
        assert!(validate_url(
            "https://drive.google.com/file/d/XYZ/view?usp=sharing"
        ));
        assert!(!validate_url("https://drive.google.com/file/d/XYZ/view"));
        assert!(!validate_url("https://drive.google.com/open?id=XYZ"));
    }

    #[test]
    fn other_hosts_rejected() {
        assert!(!validate_url(""));
        assert!(!validate_url("https://vimeo.com/123456"));
        assert!(!validate_url("not a url"));
    }

    #[test]
    fn media_types() {
        assert!(validate_file(&file_of_type("video/mp4")));
        assert!(validate_file(&file_of_type("audio/mpeg")));
        assert!(!validate_file(&file_of_type("video/avi")));
        assert!(!validate_file(&file_of_type("audio/mp3")));
        assert!(!validate_file(&file_of_type("VIDEO/MP4")));
        assert!(!validate_file(&file_of_type("")));
    }
}
