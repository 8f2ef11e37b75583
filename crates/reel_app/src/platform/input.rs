use reel_core::{Msg, ToastKind, VideoInfo};
use thiserror::Error;

pub const USAGE: &str = "\
commands:
  search <query>          run a search and remember it
  chip <text>             click a recent-search chip
  clear-search            clear search history
  play <json>             report playback, e.g. {\"url\":\"u\",\"title\":\"T\",\"episodeIndex\":0}
  history                 toggle the viewing history panel
  resume <row>            reopen a history row
  delete <url>            delete history entries with this url
  clear-history           clear viewing history
  settings                toggle the settings panel
  outside                 click outside the panels
  theme                   toggle light/dark
  loading [message]       show the loading indicator
  loaded                  hide the loading indicator
  status up|down          set site availability
  modal <markup>          open the modal
  close-modal             close the modal
  toast <kind> <message>  show a toast (error, success, info, warning)
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Msg(Msg),
    Quit,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid playback report: {0}")]
    InvalidVideo(#[from] serde_json::Error),
    #[error("unknown toast kind {0:?}")]
    InvalidKind(String),
    #[error("invalid row number {0:?}")]
    InvalidRow(String),
    #[error("status must be up or down, got {0:?}")]
    InvalidStatus(String),
}

/// Parses one line of host input. Blank lines parse to `Msg::NoOp`.
pub fn parse_line(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let msg = match command {
        "" => Msg::NoOp,
        "quit" | "exit" => return Ok(Input::Quit),
        "search" => Msg::SearchSubmitted(required(rest, "search")?.to_string()),
        "chip" => Msg::SearchChipClicked(required(rest, "chip")?.to_string()),
        "clear-search" => Msg::SearchHistoryClearRequested,
        "play" => {
            let info: VideoInfo = serde_json::from_str(required(rest, "play")?)?;
            Msg::VideoPlayed(info)
        }
        "history" => Msg::HistoryToggled,
        "resume" => {
            let raw = required(rest, "resume")?;
            let index = raw
                .parse::<usize>()
                .map_err(|_| InputError::InvalidRow(raw.to_string()))?;
            Msg::HistoryItemActivated { index }
        }
        "delete" => Msg::HistoryItemDeleteRequested {
            url: required(rest, "delete")?.to_string(),
        },
        "clear-history" => Msg::ViewingHistoryClearRequested,
        "settings" => Msg::SettingsToggled,
        "outside" => Msg::OutsideClicked,
        "theme" => Msg::ThemeToggled,
        "loading" => Msg::LoadingShown((!rest.is_empty()).then(|| rest.to_string())),
        "loaded" => Msg::LoadingHidden,
        "status" => match rest {
            "up" => Msg::SiteStatusChanged { available: true },
            "down" => Msg::SiteStatusChanged { available: false },
            other => return Err(InputError::InvalidStatus(other.to_string())),
        },
        "modal" => Msg::ModalOpened(required(rest, "modal")?.to_string()),
        "close-modal" => Msg::ModalClosed,
        "toast" => {
            let (kind, message) = required(rest, "toast")?
                .split_once(char::is_whitespace)
                .ok_or(InputError::MissingArgument("toast"))?;
            let kind =
                ToastKind::parse(kind).ok_or_else(|| InputError::InvalidKind(kind.to_string()))?;
            Msg::ToastRequested {
                message: message.trim().to_string(),
                kind,
            }
        }
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Input::Msg(msg))
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, InputError> {
    if rest.is_empty() {
        Err(InputError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}
