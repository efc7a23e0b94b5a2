use std::path::Path;

use clipgen_core::{MediaFile, Msg};

/// One line typed into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Msg(Msg),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help` for the list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("scope must be a number between 1 and 3 (got `{0}`)")]
    InvalidScope(String),
    #[error("clip number must be 1 or greater (got `{0}`)")]
    InvalidClipNumber(String),
}

pub fn parse_command(line: &str) -> Result<ShellCommand, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Ok(ShellCommand::Empty),
        "url" => Ok(ShellCommand::Msg(Msg::UrlEdited(rest.to_string()))),
        "file" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("file"));
            }
            let file = media_file_from_path(Path::new(unquote(rest)));
            Ok(ShellCommand::Msg(Msg::FilesOffered(vec![file])))
        }
        "scope" => {
            let value = rest
                .parse::<u8>()
                .ok()
                .filter(|value| (1..=3).contains(value))
                .ok_or_else(|| CommandError::InvalidScope(rest.to_string()))?;
            Ok(ShellCommand::Msg(Msg::ScopeChanged(value)))
        }
        "submit" | "generate" => Ok(ShellCommand::Msg(Msg::SubmitClicked)),
        "download" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("download"));
            }
            let number = rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| CommandError::InvalidClipNumber(rest.to_string()))?;
            Ok(ShellCommand::Msg(Msg::DownloadClicked { index: number - 1 }))
        }
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// The rest of a `file` line is one path; matching outer quotes are dropped.
fn unquote(arg: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| {
            arg.strip_prefix(*quote)
                .and_then(|inner| inner.strip_suffix(*quote))
        })
        .unwrap_or(arg)
}

/// Describe a local file the way a browser would, deriving the declared type from its extension.
pub fn media_file_from_path(path: &Path) -> MediaFile {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let media_type = match extension.as_str() {
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    };

    MediaFile {
        name,
        media_type: media_type.to_string(),
        path: path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clipgen_core::{MediaFile, Msg};
    use pretty_assertions::assert_eq;

    use super::{media_file_from_path, parse_command, CommandError, ShellCommand};

    #[test]
    fn url_keeps_the_rest_of_the_line() {
        assert_eq!(
            parse_command("  url https://www.youtube.com/watch?v=abc  "),
            Ok(ShellCommand::Msg(Msg::UrlEdited(
                "https://www.youtube.com/watch?v=abc".to_string()
            )))
        );
        assert_eq!(
            parse_command("url"),
            Ok(ShellCommand::Msg(Msg::UrlEdited(String::new())))
        );
    }

    fn offered_file(line: &str) -> MediaFile {
        match parse_command(line).unwrap() {
            ShellCommand::Msg(Msg::FilesOffered(mut files)) => {
                assert_eq!(files.len(), 1);
                files.remove(0)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn file_takes_the_rest_of_the_line_as_one_path() {
        let file = offered_file("file /m/a.MP4");
        assert_eq!(file.name, "a.MP4");
        assert_eq!(file.media_type, "video/mp4");
        assert_eq!(file.path, PathBuf::from("/m/a.MP4"));

        let file = offered_file("file /music/My Song.mp3");
        assert_eq!(file.name, "My Song.mp3");
        assert_eq!(file.media_type, "audio/mpeg");
        assert_eq!(file.path, PathBuf::from("/music/My Song.mp3"));
    }

    #[test]
    fn quoted_paths_lose_their_quotes() {
        let file = offered_file("file \"/m/Live Set.mp4\"");
        assert_eq!(file.path, PathBuf::from("/m/Live Set.mp4"));

        let file = offered_file("file '/m/Live Set.mp4'");
        assert_eq!(file.name, "Live Set.mp4");

        let file = offered_file("file \"/m/half.mp4");
        assert_eq!(file.path, PathBuf::from("\"/m/half.mp4"));
    }

    #[test]
    fn file_needs_a_path() {
        assert_eq!(
            parse_command("file"),
            Err(CommandError::MissingArgument("file"))
        );
    }

    #[test]
    fn scope_must_be_one_to_three() {
        assert_eq!(
            parse_command("scope 3"),
            Ok(ShellCommand::Msg(Msg::ScopeChanged(3)))
        );
        assert_eq!(
            parse_command("scope 4"),
            Err(CommandError::InvalidScope("4".to_string()))
        );
        assert_eq!(
            parse_command("scope high"),
            Err(CommandError::InvalidScope("high".to_string()))
        );
    }

    #[test]
    fn download_numbers_are_one_based() {
        assert_eq!(
            parse_command("download 1"),
            Ok(ShellCommand::Msg(Msg::DownloadClicked { index: 0 }))
        );
        assert_eq!(
            parse_command("download 0"),
            Err(CommandError::InvalidClipNumber("0".to_string()))
        );
        assert_eq!(
            parse_command("download"),
            Err(CommandError::MissingArgument("download"))
        );
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse_command(""), Ok(ShellCommand::Empty));
        assert_eq!(
            parse_command("SUBMIT"),
            Ok(ShellCommand::Msg(Msg::SubmitClicked))
        );
        assert_eq!(parse_command("help"), Ok(ShellCommand::Help));
        assert_eq!(parse_command("exit"), Ok(ShellCommand::Quit));
        assert_eq!(
            parse_command("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn unknown_extensions_get_a_generic_type() {
        let file = media_file_from_path(Path::new("notes.txt"));
        assert_eq!(file.media_type, "application/octet-stream");
        let file = media_file_from_path(Path::new("movie.avi"));
        assert_eq!(file.media_type, "video/x-msvideo");
    }
}
