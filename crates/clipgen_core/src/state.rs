use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;
use crate::view_model::{AppViewModel, ClipRowView};
use crate::Scope;

/// Identifies one submission. Issued in increasing order, starting at 1.
pub type RequestId = u64;

/// A picked or dropped media file. Contents are read only when submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub name: String,
    /// Declared media type, e.g. `video/mp4`.
    pub media_type: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionInput {
    pub url: String,
    pub file: Option<MediaFile>,
    pub scope: Scope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Idle,
    Waiting,
    Received,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorState {
    #[default]
    None,
    InvalidUrl,
    InvalidFileType,
}

impl From<ValidationError> for ErrorState {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidUrl => ErrorState::InvalidUrl,
            ValidationError::InvalidFileType => ErrorState::InvalidFileType,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipResult {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Clips returned by one successful submission. `is_video` applies to all of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClipResultSet {
    pub is_video: bool,
    pub clips: Vec<ClipResult>,
}

impl ClipResultSet {
    pub fn new(is_video: bool, clips: Vec<ClipResult>) -> Self {
        Self { is_video, clips }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Why a submission ended in `Failed`. Both kinds are shown the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionFailure {
    Transport(String),
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppState {
    input: SubmissionInput,
    status: RequestStatus,
    error: ErrorState,
    results: Option<ClipResultSet>,
    last_request_id: RequestId,
    #[serde(skip)]
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SubmissionInput {
        self.input.clone()
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn error(&self) -> ErrorState {
        self.error
    }

    pub fn results(&self) -> Option<&ClipResultSet> {
        self.results.as_ref()
    }

    /// The id of the most recent submission, if any was made.
    pub fn latest_request_id(&self) -> Option<RequestId> {
        (self.last_request_id > 0).then_some(self.last_request_id)
    }

    pub fn view(&self) -> AppViewModel {
        let clips = self
            .results
            .iter()
            .flat_map(|set| set.clips.iter())
            .enumerate()
            .map(|(index, clip)| ClipRowView {
                index,
                title: clip.title.clone(),
                description: clip.description.clone(),
                tags: clip.tags.iter().map(|tag| tag.to_lowercase()).collect(),
            })
            .collect();

        AppViewModel {
            status: self.status,
            error: self.error,
            url: self.input.url.clone(),
            file_name: self.input.file.as_ref().map(|file| file.name.clone()),
            scope: self.input.scope,
            scope_label: self.input.scope.label(),
            is_video: self.results.as_ref().map(|set| set.is_video),
            clips,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_url(&mut self, url: String) {
        if self.input.url != url {
            self.input.url = url;
            self.dirty = true;
        }
    }

    pub(crate) fn retain_file(&mut self, file: MediaFile) {
        self.input.file = Some(file);
        self.dirty = true;
    }

    pub(crate) fn set_scope(&mut self, scope: Scope) {
        if self.input.scope != scope {
            self.input.scope = scope;
            self.dirty = true;
        }
    }

    pub(crate) fn set_error(&mut self, error: ErrorState) {
        if self.error != error {
            self.error = error;
            self.dirty = true;
        }
    }

    /// Enter `Waiting` for a fresh submission and return its id.
    pub(crate) fn begin_submission(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.status = RequestStatus::Waiting;
        self.dirty = true;
        self.last_request_id
    }

    pub(crate) fn is_latest(&self, request_id: RequestId) -> bool {
        self.last_request_id != 0 && request_id == self.last_request_id
    }

    pub(crate) fn apply_received(&mut self, results: ClipResultSet) {
        self.results = Some(results);
        self.status = RequestStatus::Received;
        self.dirty = true;
    }

    /// Previously received results are kept as they are.
    pub(crate) fn apply_failed(&mut self) {
        self.status = RequestStatus::Failed;
        self.dirty = true;
    }

    pub(crate) fn clip_for_download(&self, index: usize) -> Option<(String, bool)> {
        let set = self.results.as_ref()?;
        let clip = set.clips.get(index)?;
        Some((clip.title.clone(), set.is_video))
    }
}
