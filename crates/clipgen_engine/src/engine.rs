use std::sync::{mpsc, Arc};
use std::thread;

use clipgen_logging::clipgen_debug;
use tokio::sync::mpsc as async_mpsc;

use crate::download::{ClipDownloader, ReqwestClipDownloader, StorageSettings};
use crate::submit::{GenerationClient, ReqwestGenerationClient, SubmitSettings};
use crate::{DownloadError, EngineEvent, GenerationPayload, RequestId, SubmissionError};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build generation client: {0}")]
    Generation(#[from] SubmissionError),
    #[error("failed to build download client: {0}")]
    Download(#[from] DownloadError),
}

enum EngineCommand {
    Generate {
        request_id: RequestId,
        payload: GenerationPayload,
    },
    Download {
        title: String,
        is_video: bool,
    },
}

/// Handle to the IO side. Every command runs as its own task on a
/// single-threaded runtime; completions are reported through the sink.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    pub fn from_settings(
        submit: SubmitSettings,
        storage: StorageSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let generator = Arc::new(ReqwestGenerationClient::new(submit)?);
        let downloader = Arc::new(ReqwestClipDownloader::new(storage)?);
        Self::new(generator, downloader, sink)
    }

    pub fn new(
        generator: Arc<dyn GenerationClient>,
        downloader: Arc<dyn ClipDownloader>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            runtime.block_on(async move {
                while let Some(command) = cmd_rx.recv().await {
                    let generator = generator.clone();
                    let downloader = downloader.clone();
                    let sink = sink.clone();
                    tokio::spawn(async move {
                        handle_command(
                            generator.as_ref(),
                            downloader.as_ref(),
                            command,
                            sink.as_ref(),
                        )
                        .await;
                    });
                }
                clipgen_debug!("Engine command channel closed");
            });
        });

        Ok(Self { cmd_tx })
    }

    pub fn generate(&self, request_id: RequestId, payload: GenerationPayload) {
        let _ = self.cmd_tx.send(EngineCommand::Generate {
            request_id,
            payload,
        });
    }

    pub fn download(&self, title: impl Into<String>, is_video: bool) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            title: title.into(),
            is_video,
        });
    }
}

async fn handle_command(
    generator: &dyn GenerationClient,
    downloader: &dyn ClipDownloader,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Generate {
            request_id,
            payload,
        } => {
            let result = generator.generate(&payload).await;
            sink.emit(EngineEvent::GenerationCompleted { request_id, result });
        }
        EngineCommand::Download { title, is_video } => {
            let result = downloader.download(&title, is_video).await;
            sink.emit(EngineEvent::DownloadCompleted { title, result });
        }
    }
}
