use crate::events::AppEvent;
use async_channel::Sender;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/pieview.sock";

/// One line of the control protocol: `select N`, `deselect N` or `reload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Select(usize),
    Deselect(usize),
    Reload,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs a slice index")]
    MissingIndex(String),
    #[error("invalid slice index '{0}'")]
    InvalidIndex(String),
}

impl FromStr for ControlCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let name = parts.next().ok_or(CommandParseError::Empty)?;

        let index = |parts: &mut std::str::SplitWhitespace<'_>| {
            let raw = parts
                .next()
                .ok_or_else(|| CommandParseError::MissingIndex(name.to_string()))?;
            raw.parse::<usize>()
                .map_err(|_| CommandParseError::InvalidIndex(raw.to_string()))
        };

        match name.to_ascii_lowercase().as_str() {
            "select" => Ok(Self::Select(index(&mut parts)?)),
            "deselect" => Ok(Self::Deselect(index(&mut parts)?)),
            "reload" => Ok(Self::Reload),
            _ => Err(CommandParseError::Unknown(name.to_string())),
        }
    }
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select(i) => write!(f, "select {i}"),
            Self::Deselect(i) => write!(f, "deselect {i}"),
            Self::Reload => write!(f, "reload"),
        }
    }
}

impl From<ControlCommand> for AppEvent {
    fn from(command: ControlCommand) -> Self {
        match command {
            ControlCommand::Select(i) => AppEvent::Select(i),
            ControlCommand::Deselect(i) => AppEvent::Deselect(i),
            ControlCommand::Reload => AppEvent::Reload,
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match line.parse::<ControlCommand>() {
                            Ok(command) => {
                                let _ = tx.send(command.into()).await;
                            }
                            Err(e) => log::warn!("Ignoring control command: {}", e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
