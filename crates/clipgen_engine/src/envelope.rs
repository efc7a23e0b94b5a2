use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{GeneratedClip, GeneratedClips};

/// Outer response object. Every field carries a JSON document encoded as a string.
#[derive(Debug, Deserialize)]
struct Envelope {
    is_video: String,
    titles: String,
    descriptions: String,
    tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed response envelope: {0}")]
    Envelope(String),
    #[error("malformed `{field}` field: {message}")]
    Field {
        field: &'static str,
        message: String,
    },
    #[error("unequal result arrays: titles {titles}, descriptions {descriptions}, tags {tags}")]
    LengthMismatch {
        titles: usize,
        descriptions: usize,
        tags: usize,
    },
}

/// Decode a generation response in two passes: the envelope first, then each field.
///
/// The title, description and tag arrays must be index-aligned; any length
/// difference fails the whole response.
pub fn decode_generation_response(body: &[u8]) -> Result<GeneratedClips, DecodeError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|err| DecodeError::Envelope(err.to_string()))?;

    let is_video: bool = decode_field("is_video", &envelope.is_video)?;
    let titles: Vec<String> = decode_field("titles", &envelope.titles)?;
    let descriptions: Vec<String> = decode_field("descriptions", &envelope.descriptions)?;
    let tags: Vec<Vec<String>> = decode_field("tags", &envelope.tags)?;

    if titles.len() != descriptions.len() || titles.len() != tags.len() {
        return Err(DecodeError::LengthMismatch {
            titles: titles.len(),
            descriptions: descriptions.len(),
            tags: tags.len(),
        });
    }

    let clips = titles
        .into_iter()
        .zip(descriptions)
        .zip(tags)
        .map(|((title, description), tags)| GeneratedClip {
            title,
            description,
            tags,
        })
        .collect();

    Ok(GeneratedClips { is_video, clips })
}

fn decode_field<T: DeserializeOwned>(field: &'static str, raw: &str) -> Result<T, DecodeError> {
    serde_json::from_str(raw).map_err(|err| DecodeError::Field {
        field,
        message: err.to_string(),
    })
}
