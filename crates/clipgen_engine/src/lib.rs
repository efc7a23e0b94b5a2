//! Clipgen engine: HTTP submission, response decoding and clip downloads.
mod download;
mod engine;
mod envelope;
mod filename;
mod persist;
mod submit;
mod types;

pub use download::{
    object_key, ClipDownloader, ReqwestClipDownloader, StorageSettings, DEFAULT_STORAGE_BASE,
};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use envelope::{decode_generation_response, DecodeError};
pub use filename::{saved_clip_filename, SAVED_CLIP_EXTENSION};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use submit::{GenerationClient, ReqwestGenerationClient, SubmitSettings};
pub use types::{
    DownloadError, EngineEvent, FailureKind, GeneratedClip, GeneratedClips, GenerationPayload,
    RequestId, SavedClip, SubmissionError,
};
