use crate::{GenerationRequest, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitGeneration {
        request_id: RequestId,
        request: GenerationRequest,
    },
    /// Fire-and-forget; the outcome never comes back as a message.
    DownloadClip { title: String, is_video: bool },
}
