use log::debug;
use thiserror::Error;

use crate::imap::{
    client::{
        Session,
        execute::{CommandError, execute},
    },
    command::{self, Unquotable},
    connection::{Connection, ConnectionError, SendCommand},
};

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("username or password rejected: {0}")]
    Rejected(String),
    #[error("connection failed during login: {0}")]
    Io(std::io::Error),
    #[error("cannot send credentials: {0}")]
    Unquotable(#[from] Unquotable),
}

impl From<CommandError> for LoginError {
    fn from(value: CommandError) -> Self {
        match value {
            CommandError::No(reason) | CommandError::Bad(reason) => Self::Rejected(reason),
            CommandError::Io(e) => Self::Io(e),
        }
    }
}

pub struct Client<T: SendCommand> {
    connection: T,
}

impl Client<Connection> {
    pub async fn connect(host: &str, port: u16) -> Result<Self, ConnectionError> {
        let (connection, _greeting) = Connection::connect_to(host, port).await?;
        Ok(Self::new(connection))
    }
}

impl<T: SendCommand> Client<T> {
    pub fn new(connection: T) -> Self {
        Self { connection }
    }

    pub async fn login(mut self, username: &str, password: &str) -> Result<Session<T>, LoginError> {
        debug!("LOGIN <user> <password>");
        let command = command::login(username, password)?;
        execute(&mut self.connection, &command).await?;
        debug!("logged in as {username}");

        Ok(Session::new(self.connection))
    }
}
