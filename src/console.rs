use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    alarm::{AlarmId, SNOOZE_ACTION_ID},
    controller::{AlarmController, ToggleOutcome},
    notification::{LocalNotificationCenter, NotificationResponse},
};

const USAGE: &str = "Commands: set <rfc3339 date>, remove, snooze <alarm id>, status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(DateTime<Utc>),
    Remove,
    Snooze(AlarmId),
    Status,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command `{0}`")]
    Unknown(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Invalid date `{0}`, expected RFC 3339 like 2026-10-19T06:45:00+02:00")]
    InvalidDate(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let argument = words.next();

        match name {
            "set" => {
                let date = argument.ok_or(CommandError::MissingArgument("alarm date"))?;
                DateTime::parse_from_rfc3339(date)
                    .map(|date| Command::Set(date.with_timezone(&Utc)))
                    .map_err(|_| CommandError::InvalidDate(date.to_owned()))
            }
            "remove" => Ok(Command::Remove),
            "snooze" => {
                let id = argument.ok_or(CommandError::MissingArgument("alarm id"))?;
                Ok(Command::Snooze(AlarmId::from(id.to_owned())))
            }
            "status" => Ok(Command::Status),
            other => Err(CommandError::Unknown(other.to_owned())),
        }
    }
}

/// Reads commands line by line until `input` ends, writing replies to `out`.
/// Snoozing goes through the center, so its event loop has to be running.
pub async fn run_commands<R, W>(
    input: R,
    mut out: W,
    controller: &AlarmController,
    center: &LocalNotificationCenter,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match line.parse::<Command>() {
            Ok(command) => execute(command, controller, center).await?,
            Err(e) => format!("{e}. {USAGE}"),
        };

        out.write_all(reply.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
    }

    Ok(())
}

async fn execute(
    command: Command,
    controller: &AlarmController,
    center: &LocalNotificationCenter,
) -> anyhow::Result<String> {
    let reply = match command {
        Command::Set(date) => {
            if controller.scheduled_alarm().await.is_some() {
                return Ok("An alarm is already scheduled. Remove it first.".to_owned());
            }

            match controller.toggle(date).await {
                ToggleOutcome::Scheduled(alarm) => {
                    let view = controller.view_state().await;
                    format!("{} [id = {}]", view.label, alarm.id)
                }
                ToggleOutcome::AuthorizationNeeded(alert) => {
                    format!("{}: {}", alert.title, alert.message)
                }
                ToggleOutcome::Failed => "The alarm could not be scheduled.".to_owned(),
                ToggleOutcome::Removed(_) => "The previous alarm was removed.".to_owned(),
            }
        }
        Command::Remove => {
            if controller.scheduled_alarm().await.is_none() {
                return Ok("No alarm is scheduled.".to_owned());
            }

            controller.toggle(Utc::now()).await;
            controller.view_state().await.label
        }
        Command::Snooze(request_id) => {
            let done = center
                .respond(NotificationResponse {
                    request_id,
                    action_id: SNOOZE_ACTION_ID.to_owned(),
                })
                .await?;
            done.await?;
            controller.view_state().await.label
        }
        Command::Status => controller.view_state().await.label,
    };

    Ok(reply)
}
