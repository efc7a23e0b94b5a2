use crate::{ClipResultSet, MediaFile, RequestId, SubmissionFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    UrlEdited(String),
    /// User dropped or picked files. Only the first one is considered.
    FilesOffered(Vec<MediaFile>),
    /// User moved the scope slider. Values outside 1..=3 are ignored.
    ScopeChanged(u8),
    /// User asked for clips to be generated from the current input.
    SubmitClicked,
    /// Engine finished a generation request.
    GenerationFinished {
        request_id: RequestId,
        outcome: Result<ClipResultSet, SubmissionFailure>,
    },
    /// User asked to download the clip at `index` of the current results.
    DownloadClicked { index: usize },
}
