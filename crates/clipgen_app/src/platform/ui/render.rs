use clipgen_core::{AppViewModel, ClipRowView, ErrorState, RequestStatus, ValidationError};

const FAILED_TEXT: &str = "Internal Server Error. Check if link is correct and resubmit.";
const WAITING_TEXT: &str = "Generating clips...";

pub fn help_lines() -> Vec<String> {
    [
        "Commands:",
        "  url <link>          set the video URL",
        "  file <path>         use a local .mp4 or .mp3 file; overrides the URL, spaces allowed",
        "  scope <1|2|3>       how much of the source each clip considers (Low, Medium, High)",
        "  submit              generate clips",
        "  download <n>        save clip n into the download directory",
        "  help                show this text",
        "  quit                leave",
        "Supported URL formats:",
        "  YouTube:      https://www.youtube.com/watch?v={VIDEO_ID}",
        "  Google Drive: https://drive.google.com/file/d/{FILE_ID}/view?usp=sharing",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let source = match (&view.file_name, view.url.is_empty()) {
        (Some(name), _) => format!("file {name}"),
        (None, false) => format!("url {}", view.url),
        (None, true) => "none".to_string(),
    };
    lines.push(format!(
        "Input: {source} | scope {} ({})",
        view.scope.value(),
        view.scope_label
    ));

    if let Some(message) = error_text(view.error) {
        lines.push(format!("! {message}"));
    }

    match view.status {
        RequestStatus::Idle => {}
        RequestStatus::Waiting => lines.push(WAITING_TEXT.to_string()),
        RequestStatus::Failed => lines.push(format!("! {FAILED_TEXT}")),
        RequestStatus::Received => {
            let media = match view.is_video {
                Some(false) => "audio",
                _ => "video",
            };
            lines.push(format!("Received {} {media} clip(s)", view.clips.len()));
        }
    }

    lines.extend(view.clips.iter().flat_map(format_clip));
    lines
}

fn error_text(error: ErrorState) -> Option<String> {
    match error {
        ErrorState::None => None,
        ErrorState::InvalidUrl => Some(ValidationError::InvalidUrl.to_string()),
        ErrorState::InvalidFileType => Some(ValidationError::InvalidFileType.to_string()),
    }
}

fn format_clip(clip: &ClipRowView) -> Vec<String> {
    let mut lines = vec![format!("[{}] {}", clip.index + 1, clip.title)];
    if !clip.description.is_empty() {
        lines.push(format!("    {}", clip.description));
    }
    if !clip.tags.is_empty() {
        let tags: Vec<String> = clip.tags.iter().map(|tag| format!("#{tag}")).collect();
        lines.push(format!("    {}", tags.join(" ")));
    }
    lines
}
