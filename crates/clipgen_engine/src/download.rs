use std::path::PathBuf;
use std::time::Duration;

use futures_util::StreamExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::filename::saved_clip_filename;
use crate::persist::AtomicFileWriter;
use crate::types::failure_kind_of;
use crate::{DownloadError, FailureKind, SavedClip};

pub const DEFAULT_STORAGE_BASE: &str = "https://storage.googleapis.com";

/// Characters left unescaped by a URI-component encoder.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Scheme and host of the object store, without a trailing bucket.
    pub storage_base: String,
    pub bucket: String,
    pub download_dir: PathBuf,
    pub connect_timeout: Duration,
}

impl StorageSettings {
    pub fn new(bucket: impl Into<String>, download_dir: PathBuf) -> Self {
        Self {
            storage_base: DEFAULT_STORAGE_BASE.to_string(),
            bucket: bucket.into(),
            download_dir,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn object_url(&self, title: &str, is_video: bool) -> String {
        format!(
            "{}/{}/{}",
            self.storage_base.trim_end_matches('/'),
            self.bucket,
            object_key(title, is_video)
        )
    }
}

/// Storage key of a clip: the URI-encoded title plus `mp4` for video or `mp3` for audio.
pub fn object_key(title: &str, is_video: bool) -> String {
    let extension = if is_video { "mp4" } else { "mp3" };
    format!("{}.{extension}", utf8_percent_encode(title, URI_COMPONENT))
}

#[async_trait::async_trait]
pub trait ClipDownloader: Send + Sync {
    async fn download(&self, title: &str, is_video: bool) -> Result<SavedClip, DownloadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClipDownloader {
    settings: StorageSettings,
    client: reqwest::Client,
}

impl ReqwestClipDownloader {
    pub fn new(settings: StorageSettings) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| DownloadError::fetch(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl ClipDownloader for ReqwestClipDownloader {
    async fn download(&self, title: &str, is_video: bool) -> Result<SavedClip, DownloadError> {
        let url = self.settings.object_url(title, is_video);
        let response = self.client.get(&url).send().await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::fetch(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{status} for {url}"),
            ));
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk.map_err(fetch_error)?);
        }

        let writer = AtomicFileWriter::new(self.settings.download_dir.clone());
        let filename = saved_clip_filename(title);
        let byte_len = bytes.len() as u64;
        let path = tokio::task::spawn_blocking(move || writer.write(&filename, &bytes))
            .await
            .map_err(|err| DownloadError::Persist(err.to_string()))?
            .map_err(|err| DownloadError::Persist(err.to_string()))?;

        Ok(SavedClip {
            object_key: object_key(title, is_video),
            path,
            byte_len,
        })
    }
}

fn fetch_error(err: reqwest::Error) -> DownloadError {
    DownloadError::fetch(failure_kind_of(&err), err.to_string())
}
