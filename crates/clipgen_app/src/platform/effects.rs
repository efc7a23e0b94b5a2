use std::sync::{mpsc, Arc};
use std::thread;

use clipgen_core::{ClipResult, ClipResultSet, Effect, GenerationRequest, Msg, SubmissionFailure};
use clipgen_engine::{
    ChannelEventSink, EngineError, EngineEvent, EngineHandle, GeneratedClips, GenerationPayload,
    StorageSettings, SubmissionError, SubmitSettings,
};
use clipgen_logging::{clipgen_error, clipgen_info, clipgen_warn};

use super::app::LoopEvent;
use super::config::AppConfig;

/// Hands effects to the engine and counts the commands it has not answered yet.
pub struct EffectRunner {
    engine: EngineHandle,
    outstanding: usize,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, loop_tx: mpsc::Sender<LoopEvent>) -> Result<Self, EngineError> {
        let mut storage =
            StorageSettings::new(config.gcs_bucket.clone(), config.download_dir.clone());
        storage.storage_base = config.storage_base.clone();

        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::from_settings(
            SubmitSettings::new(config.api_endpoint.clone()),
            storage,
            Arc::new(ChannelEventSink::new(event_tx)),
        )?;

        Ok(Self::start(engine, event_rx, loop_tx))
    }

    /// Every event from `event_rx` comes back as one `LoopEvent::Completed`.
    pub(crate) fn start(
        engine: EngineHandle,
        event_rx: mpsc::Receiver<EngineEvent>,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Self {
        spawn_event_loop(event_rx, loop_tx);
        Self {
            engine,
            outstanding: 0,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitGeneration {
                    request_id,
                    request,
                } => {
                    let payload = to_payload(request);
                    clipgen_info!(
                        "SubmitGeneration request_id={} mode={}",
                        request_id,
                        payload_mode(&payload)
                    );
                    self.engine.generate(request_id, payload);
                }
                Effect::DownloadClip { title, is_video } => {
                    clipgen_info!("DownloadClip title={:?} is_video={}", title, is_video);
                    self.engine.download(title, is_video);
                }
            }
            self.outstanding += 1;
        }
    }

    /// Record that one engine command has reported back.
    pub fn complete(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            if loop_tx.send(LoopEvent::Completed(to_msg(event))).is_err() {
                break;
            }
        }
    });
}

/// Map an engine completion to a core message. Download outcomes are only logged.
pub(crate) fn to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::GenerationCompleted { request_id, result } => {
            let outcome = match result {
                Ok(clips) => Ok(to_result_set(clips)),
                Err(err) => {
                    clipgen_warn!("Generation request {} failed: {}", request_id, err);
                    Err(to_failure(err))
                }
            };
            Some(Msg::GenerationFinished {
                request_id,
                outcome,
            })
        }
        EngineEvent::DownloadCompleted { title, result } => {
            match result {
                Ok(saved) => clipgen_info!(
                    "Saved {:?} ({} bytes) from {} to {}",
                    title,
                    saved.byte_len,
                    saved.object_key,
                    saved.path.display()
                ),
                Err(err) => clipgen_error!("Download of {:?} failed: {}", title, err),
            }
            None
        }
    }
}

pub(crate) fn to_payload(request: GenerationRequest) -> GenerationPayload {
    match request {
        GenerationRequest::Url(req) => GenerationPayload::Json {
            url: req.url,
            scope: req.scope.value(),
        },
        GenerationRequest::File(req) => GenerationPayload::Multipart {
            file_name: req.file.name,
            media_type: req.file.media_type,
            path: req.file.path,
            scope: req.scope.value(),
        },
    }
}

fn payload_mode(payload: &GenerationPayload) -> &'static str {
    match payload {
        GenerationPayload::Json { .. } => "json",
        GenerationPayload::Multipart { .. } => "multipart",
    }
}

fn to_result_set(generated: GeneratedClips) -> ClipResultSet {
    let clips = generated
        .clips
        .into_iter()
        .map(|clip| ClipResult {
            title: clip.title,
            description: clip.description,
            tags: clip.tags,
        })
        .collect();
    ClipResultSet::new(generated.is_video, clips)
}

fn to_failure(err: SubmissionError) -> SubmissionFailure {
    match err {
        SubmissionError::Transport { .. } => SubmissionFailure::Transport(err.to_string()),
        SubmissionError::Decode(decode) => SubmissionFailure::Decode(decode.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clipgen_core::{
        ClipResult, FileRequest, GenerationRequest, MediaFile, Msg, Scope, SubmissionFailure,
        UrlRequest,
    };
    use clipgen_engine::{
        DecodeError, DownloadError, EngineEvent, FailureKind, GeneratedClip, GeneratedClips,
        GenerationPayload, SubmissionError,
    };
    use pretty_assertions::assert_eq;

    use super::{to_msg, to_payload};

    #[test]
    fn url_request_becomes_json_payload() {
        let payload = to_payload(GenerationRequest::Url(UrlRequest {
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            scope: Scope::LOW,
        }));
        assert_eq!(
            payload,
            GenerationPayload::Json {
                url: "https://www.youtube.com/watch?v=abc".to_string(),
                scope: 1,
            }
        );
    }

    #[test]
    fn file_request_becomes_multipart_payload() {
        let payload = to_payload(GenerationRequest::File(FileRequest {
            file: MediaFile {
                name: "song.mp3".to_string(),
                media_type: "audio/mpeg".to_string(),
                path: PathBuf::from("/music/song.mp3"),
            },
            scope: Scope::HIGH,
        }));
        assert_eq!(
            payload,
            GenerationPayload::Multipart {
                file_name: "song.mp3".to_string(),
                media_type: "audio/mpeg".to_string(),
                path: PathBuf::from("/music/song.mp3"),
                scope: 3,
            }
        );
    }

    #[test]
    fn generation_events_map_to_messages() {
        let msg = to_msg(EngineEvent::GenerationCompleted {
            request_id: 4,
            result: Ok(GeneratedClips {
                is_video: false,
                clips: vec![GeneratedClip {
                    title: "T".to_string(),
                    description: "D".to_string(),
                    tags: vec!["X".to_string()],
                }],
            }),
        });
        match msg {
            Some(Msg::GenerationFinished {
                request_id: 4,
                outcome: Ok(set),
            }) => {
                assert!(!set.is_video);
                assert_eq!(
                    set.clips,
                    vec![ClipResult {
                        title: "T".to_string(),
                        description: "D".to_string(),
                        tags: vec!["X".to_string()],
                    }]
                );
            }
            other => panic!("unexpected {other:?}"),
        }

        let msg = to_msg(EngineEvent::GenerationCompleted {
            request_id: 5,
            result: Err(SubmissionError::Decode(DecodeError::Envelope(
                "eof".to_string(),
            ))),
        });
        assert!(matches!(
            msg,
            Some(Msg::GenerationFinished {
                request_id: 5,
                outcome: Err(SubmissionFailure::Decode(_)),
            })
        ));

        let msg = to_msg(EngineEvent::GenerationCompleted {
            request_id: 6,
            result: Err(SubmissionError::Transport {
                kind: FailureKind::HttpStatus(503),
                message: "unavailable".to_string(),
            }),
        });
        assert!(matches!(
            msg,
            Some(Msg::GenerationFinished {
                outcome: Err(SubmissionFailure::Transport(_)),
                ..
            })
        ));
    }

    #[test]
    fn download_events_never_reach_the_state_machine() {
        let failed = to_msg(EngineEvent::DownloadCompleted {
            title: "Clip".to_string(),
            result: Err(DownloadError::Fetch {
                kind: FailureKind::HttpStatus(404),
                message: "not found".to_string(),
            }),
        });
        assert_eq!(failed, None);
    }
}
