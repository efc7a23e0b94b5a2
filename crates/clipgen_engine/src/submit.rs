use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use url::Url;

use crate::envelope::decode_generation_response;
use crate::types::failure_kind_of;
use crate::{FailureKind, GeneratedClips, GenerationPayload, SubmissionError};

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: Url,
    /// Only connecting is bounded; the generator may take as long as it needs.
    pub connect_timeout: Duration,
}

impl SubmitSettings {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, payload: &GenerationPayload)
        -> Result<GeneratedClips, SubmissionError>;
}

#[derive(Serialize)]
struct JsonBody<'a> {
    url: &'a str,
    scope: u8,
}

#[derive(Debug, Clone)]
pub struct ReqwestGenerationClient {
    settings: SubmitSettings,
    client: reqwest::Client,
}

impl ReqwestGenerationClient {
    pub fn new(settings: SubmitSettings) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| SubmissionError::transport(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn build_request(
        &self,
        payload: &GenerationPayload,
    ) -> Result<reqwest::RequestBuilder, SubmissionError> {
        let request = self.client.post(self.settings.endpoint.clone());
        match payload {
            GenerationPayload::Json { url, scope } => Ok(request.json(&JsonBody {
                url,
                scope: *scope,
            })),
            GenerationPayload::Multipart {
                file_name,
                media_type,
                path,
                scope,
            } => {
                let bytes = tokio::fs::read(path).await.map_err(|err| {
                    SubmissionError::transport(
                        FailureKind::Io,
                        format!("{}: {err}", path.display()),
                    )
                })?;
                let part = Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str(media_type)
                    .map_err(|err| {
                        SubmissionError::transport(FailureKind::InvalidPayload, err.to_string())
                    })?;
                let form = Form::new()
                    .part("video", part)
                    .text("scope", scope.to_string());
                Ok(request.multipart(form))
            }
        }
    }
}

#[async_trait::async_trait]
impl GenerationClient for ReqwestGenerationClient {
    async fn generate(
        &self,
        payload: &GenerationPayload,
    ) -> Result<GeneratedClips, SubmissionError> {
        let request = self.build_request(payload).await?;

        let response = request
            .send()
            .await
            .map_err(|err| SubmissionError::transport(failure_kind_of(&err), err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::transport(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| SubmissionError::transport(failure_kind_of(&err), err.to_string()))?;

        Ok(decode_generation_response(&body)?)
    }
}
