use clipgen_logging::{clipgen_debug, clipgen_info};

use crate::request::build_request;
use crate::validate::validate_file;
use crate::{AppState, Effect, ErrorState, Msg, Scope};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlEdited(url) => {
            state.set_url(url);
            Vec::new()
        }
        Msg::FilesOffered(files) => {
            let Some(file) = files.into_iter().next() else {
                return (state, Vec::new());
            };
            if validate_file(&file) {
                if state.error() == ErrorState::InvalidFileType {
                    state.set_error(ErrorState::None);
                }
                state.retain_file(file);
            } else {
                clipgen_debug!(
                    "Rejected dropped file {} with media type {:?}",
                    file.name,
                    file.media_type
                );
                state.set_error(ErrorState::InvalidFileType);
            }
            Vec::new()
        }
        Msg::ScopeChanged(value) => {
            match Scope::new(value) {
                Some(scope) => state.set_scope(scope),
                None => clipgen_debug!("Ignoring out-of-range scope {}", value),
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            state.set_error(ErrorState::None);
            match build_request(&state.snapshot()) {
                Ok(request) => {
                    let request_id = state.begin_submission();
                    vec![Effect::SubmitGeneration {
                        request_id,
                        request,
                    }]
                }
                Err(err) => {
                    clipgen_debug!("Submission blocked: {:?}", err);
                    state.set_error(err.into());
                    Vec::new()
                }
            }
        }
        Msg::GenerationFinished {
            request_id,
            outcome,
        } => {
            if !state.is_latest(request_id) {
                clipgen_debug!(
                    "Discarding stale generation result {} (latest is {:?})",
                    request_id,
                    state.latest_request_id()
                );
                return (state, Vec::new());
            }
            match outcome {
                Ok(results) => {
                    clipgen_info!("Request {} received {} clip(s)", request_id, results.len());
                    state.apply_received(results);
                }
                Err(failure) => {
                    clipgen_info!("Request {} failed: {:?}", request_id, failure);
                    state.apply_failed();
                }
            }
            Vec::new()
        }
        Msg::DownloadClicked { index } => match state.clip_for_download(index) {
            Some((title, is_video)) => vec![Effect::DownloadClip { title, is_video }],
            None => Vec::new(),
        },
    };

    (state, effects)
}
