//! Clipgen core: pure state machine, validation and view-model helpers.
mod effect;
mod msg;
mod request;
mod scope;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use request::{build_request, FileRequest, GenerationRequest, UrlRequest};
pub use scope::{Scope, ScopeOutOfRange, SCOPE_LABELS};
pub use state::{
    AppState, ClipResult, ClipResultSet, ErrorState, MediaFile, RequestId, RequestStatus,
    SubmissionFailure, SubmissionInput,
};
pub use update::update;
pub use validate::{validate_file, validate_url, ValidationError, ACCEPTED_MEDIA_TYPES};
pub use view_model::{AppViewModel, ClipRowView};
