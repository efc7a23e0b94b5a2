use std::fmt;
use std::path::PathBuf;

use crate::envelope::DecodeError;

pub type RequestId = u64;

/// Wire shape of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationPayload {
    /// `{"url": ..., "scope": n}` as `application/json`.
    Json { url: String, scope: u8 },
    /// `multipart/form-data` with the file under `video` and the scope under `scope`.
    Multipart {
        file_name: String,
        media_type: String,
        path: PathBuf,
        scope: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClip {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClips {
    pub is_video: bool,
    pub clips: Vec<GeneratedClip>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedClip {
    pub object_key: String,
    pub path: PathBuf,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    GenerationCompleted {
        request_id: RequestId,
        result: Result<GeneratedClips, SubmissionError>,
    },
    DownloadCompleted {
        title: String,
        result: Result<SavedClip, DownloadError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    HttpStatus(u16),
    Timeout,
    Network,
    /// The local media file could not be read.
    Io,
    InvalidPayload,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::InvalidPayload => write!(f, "invalid payload"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("{kind}: {message}")]
    Transport { kind: FailureKind, message: String },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl SubmissionError {
    pub(crate) fn transport(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    #[error("{kind}: {message}")]
    Fetch { kind: FailureKind, message: String },
    #[error("could not save clip: {0}")]
    Persist(String),
}

impl DownloadError {
    pub(crate) fn fetch(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Fetch {
            kind,
            message: message.into(),
        }
    }
}

pub(crate) fn failure_kind_of(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Network
    }
}
