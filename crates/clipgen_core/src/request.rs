use serde::{Deserialize, Serialize};

use crate::validate::{validate_file, validate_url, ValidationError};
use crate::{MediaFile, Scope, SubmissionInput};

/// One logical "generate clips" request, resolved to exactly one payload shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// Sent as a JSON body.
    Url(UrlRequest),
    /// Sent as a multipart form with the binary under `video`.
    File(FileRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRequest {
    pub url: String,
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub file: MediaFile,
    pub scope: Scope,
}

/// Validate the input and pick the payload shape.
///
/// A retained file always selects file mode; the URL text is then ignored.
pub fn build_request(input: &SubmissionInput) -> Result<GenerationRequest, ValidationError> {
    if let Some(file) = &input.file {
        if !validate_file(file) {
            return Err(ValidationError::InvalidFileType);
        }
        return Ok(GenerationRequest::File(FileRequest {
            file: file.clone(),
            scope: input.scope,
        }));
    }

    if !validate_url(&input.url) {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(GenerationRequest::Url(UrlRequest {
        url: input.url.clone(),
        scope: input.scope,
    }))
}
