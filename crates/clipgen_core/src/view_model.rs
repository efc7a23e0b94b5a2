use crate::{ErrorState, RequestStatus, Scope};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: RequestStatus,
    pub error: ErrorState,
    pub url: String,
    pub file_name: Option<String>,
    pub scope: Scope,
    pub scope_label: &'static str,
    /// `None` until a result set has been received.
    pub is_video: Option<bool>,
    pub clips: Vec<ClipRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRowView {
    pub index: usize,
    pub title: String,
    pub description: String,
    /// Lower-cased for display.
    pub tags: Vec<String>,
}
