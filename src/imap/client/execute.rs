use std::io;

use futures::StreamExt as _;
use imap_proto::{Response, Status};
use log::trace;
use thiserror::Error;

use crate::imap::{codec::ResponseData, connection::SendCommand};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("server answered NO: {0}")]
    No(String),
    #[error("server answered BAD: {0}")]
    Bad(String),
    #[error("connection failed: {0}")]
    Io(#[from] io::Error),
}

/// Runs one command to completion and returns the untagged responses it
/// produced. Anything but a tagged `OK` is an error.
pub async fn execute<T: SendCommand>(
    connection: &mut T,
    command: &str,
) -> Result<Vec<ResponseData>, CommandError> {
    let mut responses = connection.send(command);
    let mut untagged = Vec::new();
    while let Some(response) = responses.next().await {
        let response = response?;
        if let Response::Done {
            status,
            information,
            ..
        } = response.parsed()
        {
            let information = information.map(|i| i.to_string()).unwrap_or_default();
            trace!("{status:?} {information}");
            return match status {
                Status::Ok => Ok(untagged),
                Status::No => Err(CommandError::No(information)),
                _ => Err(CommandError::Bad(information)),
            };
        }
        untagged.push(response);
    }

    Err(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "response stream ended without tagged response",
    )
    .into())
}
