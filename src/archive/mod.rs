mod destination;
mod timestamp;

use std::{error::Error as StdError, fmt::Display, io};

use derive_getters::Getters;
use jiff::Timestamp;
use log::{debug, info, warn};
use thiserror::Error;

pub use destination::Destination;

use crate::{
    config::Config,
    imap::{
        Client, ConnectionError, FetchError, ListError, LoginError, RemoteMail, SelectError,
        SendCommand, Session, Uid,
    },
};

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("cannot connect to {host}: {source}")]
    Connection {
        host: String,
        source: ConnectionError,
    },
    #[error("cannot log in to {host} as {user}: {source}")]
    Authentication {
        host: String,
        user: String,
        source: LoginError,
    },
    #[error("cannot enumerate mailboxes on {host}: {source}")]
    MailboxList { host: String, source: ListError },
    #[error("lost connection to {host} while {stage}: {source}")]
    ConnectionLost {
        host: String,
        stage: String,
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Why a single mailbox or message was skipped.
#[derive(Debug, Error)]
pub enum FailureReason {
    #[error(transparent)]
    Select(SelectError),
    #[error("cannot list messages: {0}")]
    List(FetchError),
    #[error(transparent)]
    Fetch(FetchError),
    #[error("cannot write archive file: {0}")]
    Io(io::Error),
}

#[derive(Debug, Getters)]
pub struct Failure {
    mailbox: String,
    #[getter(skip)]
    uid: Option<Uid>,
    reason: FailureReason,
}

impl Failure {
    pub fn uid(&self) -> Option<Uid> {
        self.uid
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(uid) = self.uid {
            write!(f, "{} {uid}: {}", self.mailbox, self.reason)
        } else {
            write!(f, "{}: {}", self.mailbox, self.reason)
        }
    }
}

#[derive(Debug, Default, Getters)]
pub struct Summary {
    archived: usize,
    skipped_mailboxes: usize,
    failures: Vec<Failure>,
}

impl Summary {
    pub fn report(&self) {
        if self.failures.is_empty() {
            info!(
                "archived {} messages, skipped {} mailboxes",
                self.archived, self.skipped_mailboxes
            );
        } else {
            warn!(
                "archived {} messages, skipped {} mailboxes, {} failures",
                self.archived,
                self.skipped_mailboxes,
                self.failures.len()
            );
            for failure in &self.failures {
                warn!("{failure}");
            }
        }
    }
}

/// Downloads every message of one account into a [`Destination`].
pub struct Archiver<'a> {
    config: &'a Config,
    password: &'a str,
    destination: Destination,
}

impl<'a> Archiver<'a> {
    pub fn new(config: &'a Config, password: &'a str) -> Self {
        Self {
            config,
            password,
            destination: Destination::new(config.destination().clone()),
        }
    }

    pub async fn run(&self) -> Result<Summary, ArchiveError> {
        let client = Client::connect(self.config.host(), self.config.port())
            .await
            .map_err(|source| ArchiveError::Connection {
                host: self.config.host().clone(),
                source,
            })?;
        self.archive(client).await
    }

    pub async fn archive<T: SendCommand>(&self, client: Client<T>) -> Result<Summary, ArchiveError> {
        let host = self.config.host();
        let mut session = client
            .login(self.config.user(), self.password)
            .await
            .map_err(|source| ArchiveError::Authentication {
                host: host.clone(),
                user: self.config.user().clone(),
                source,
            })?;
        let mailboxes = session
            .list_mailboxes()
            .await
            .map_err(|source| ArchiveError::MailboxList {
                host: host.clone(),
                source,
            })?;
        info!("found {} mailboxes on {host}", mailboxes.len());

        let mut summary = Summary::default();
        for entry in &mailboxes {
            let name = entry.name();
            if !entry.selectable() {
                debug!("skipping {name}, it cannot hold messages");
                summary.skipped_mailboxes += 1;
            } else if self.config.exclude().contains(name) {
                info!("skipping excluded mailbox {name}");
                summary.skipped_mailboxes += 1;
            } else {
                self.archive_mailbox(&mut session, name, &mut summary)
                    .await?;
            }
        }

        if let Err(e) = session.logout().await {
            warn!("logout from {host} failed: {e}");
        }

        Ok(summary)
    }

    async fn archive_mailbox<T: SendCommand>(
        &self,
        session: &mut Session<T>,
        mailbox: &str,
        summary: &mut Summary,
    ) -> Result<(), ArchiveError> {
        let selected = match session.examine(mailbox).await {
            Ok(selected) => selected,
            Err(e) if e.is_transport() => {
                return Err(self.connection_lost(format!("opening {mailbox}"), e));
            }
            Err(e) => {
                warn!("{e}");
                summary.failures.push(Failure {
                    mailbox: mailbox.to_string(),
                    uid: None,
                    reason: FailureReason::Select(e),
                });
                return Ok(());
            }
        };
        debug!(
            "{mailbox} has uidvalidity {:?}, uidnext {:?}",
            selected.uid_validity(),
            selected.uid_next()
        );

        let uids = match session.list_uids().await {
            Ok(uids) => uids,
            Err(e) if e.is_transport() => {
                return Err(self.connection_lost(format!("listing {mailbox}"), e));
            }
            Err(e) => {
                warn!("cannot list messages of {mailbox}: {e}");
                summary.failures.push(Failure {
                    mailbox: mailbox.to_string(),
                    uid: None,
                    reason: FailureReason::List(e),
                });
                return Ok(());
            }
        };
        info!("{mailbox}: {} messages", uids.len());

        let total = uids.len();
        for (index, uid) in uids.into_iter().enumerate() {
            debug!("{mailbox} {}/{total}", index + 1);
            let mail = match session.fetch(uid).await {
                Ok(mail) => mail,
                Err(e) if e.is_transport() => {
                    return Err(self.connection_lost(format!("fetching {mailbox} {uid}"), e));
                }
                Err(e) => {
                    warn!("skipping {mailbox} {uid}: {e}");
                    summary.failures.push(Failure {
                        mailbox: mailbox.to_string(),
                        uid: Some(uid),
                        reason: FailureReason::Fetch(e),
                    });
                    continue;
                }
            };
            let timestamp = message_timestamp(mailbox, &mail);
            match self
                .destination
                .store(mailbox, uid, mail.content(), timestamp)
            {
                Ok(path) => {
                    debug!("wrote {}", path.display());
                    summary.archived += 1;
                }
                Err(e) => {
                    warn!("cannot write {mailbox} {uid}: {e}");
                    summary.failures.push(Failure {
                        mailbox: mailbox.to_string(),
                        uid: Some(uid),
                        reason: FailureReason::Io(e),
                    });
                }
            }
        }

        Ok(())
    }

    fn connection_lost(
        &self,
        stage: String,
        source: impl StdError + Send + Sync + 'static,
    ) -> ArchiveError {
        ArchiveError::ConnectionLost {
            host: self.config.host().clone(),
            stage,
            source: Box::new(source),
        }
    }
}

/// The `Date` header, else the server's internal date, else now.
fn message_timestamp(mailbox: &str, mail: &RemoteMail) -> Timestamp {
    if let Some(timestamp) = timestamp::date_header(mail.content()) {
        return timestamp;
    }
    warn!(
        "{mailbox} {} has no usable Date, using INTERNALDATE",
        mail.uid()
    );
    if let Some(timestamp) = mail.internal_date().and_then(timestamp::internal_date) {
        return timestamp;
    }
    warn!(
        "{mailbox} {} has no usable INTERNALDATE either, using current time",
        mail.uid()
    );
    Timestamp::now()
}
