use imap_proto::{AttributeValue, MailboxDatum, NameAttribute, Response, ResponseCode, Status};
use log::{debug, trace, warn};
use thiserror::Error;

use crate::imap::{
    client::execute::{CommandError, execute},
    command::{self, Unquotable},
    connection::SendCommand,
    mailbox::{ListEntry, Mailbox, MailboxBuilder, RemoteMail, Uid},
};

#[derive(Debug, Error)]
#[error("cannot list mailboxes: {0}")]
pub struct ListError(#[from] CommandError);

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("cannot open mailbox {mailbox}: {source}")]
    Command {
        mailbox: String,
        source: CommandError,
    },
    #[error("cannot open mailbox {mailbox}: {source}")]
    Unquotable {
        mailbox: String,
        source: Unquotable,
    },
    #[error("incomplete answer when opening mailbox {mailbox}: {reason}")]
    Incomplete {
        mailbox: String,
        reason: &'static str,
    },
}

impl SelectError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Command {
                source: CommandError::Io(_),
                ..
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no mailbox selected")]
    NoMailboxSelected,
    #[error("server refused fetch: {0}")]
    Command(#[from] CommandError),
    #[error("message {0} is gone from the server")]
    Missing(Uid),
}

impl FetchError {
    /// Whether the session itself is broken, as opposed to just this message.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Command(CommandError::Io(_)))
    }
}

#[derive(Debug)]
pub struct Session<T: SendCommand> {
    connection: T,
    selected: Option<Mailbox>,
}

impl<T: SendCommand> Session<T> {
    pub(super) fn new(connection: T) -> Self {
        Self {
            connection,
            selected: None,
        }
    }

    pub async fn list_mailboxes(&mut self) -> Result<Vec<ListEntry>, ListError> {
        debug!("{}", command::LIST_ALL);
        let responses = execute(&mut self.connection, command::LIST_ALL).await?;
        let mut mailboxes = Vec::with_capacity(responses.len());
        for response in &responses {
            match response.parsed() {
                Response::MailboxData(MailboxDatum::List {
                    name_attributes,
                    delimiter,
                    name,
                }) => {
                    let selectable = !name_attributes
                        .iter()
                        .any(|attribute| matches!(attribute, NameAttribute::NoSelect));
                    mailboxes.push(ListEntry::new(
                        command::unescape(&name),
                        delimiter.map(|d| d.to_string()),
                        selectable,
                    ));
                }
                parsed => trace!("ignoring response to LIST {parsed:?}"),
            }
        }

        Ok(mailboxes)
    }

    /// Opens `mailbox` read-only so that archiving leaves flags untouched.
    pub async fn examine(&mut self, mailbox: &str) -> Result<&Mailbox, SelectError> {
        self.selected = None;
        let command = command::examine(mailbox).map_err(|source| SelectError::Unquotable {
            mailbox: mailbox.to_string(),
            source,
        })?;
        debug!("{command}");
        let responses = execute(&mut self.connection, &command)
            .await
            .map_err(|source| SelectError::Command {
                mailbox: mailbox.to_string(),
                source,
            })?;

        let mut new_mailbox = MailboxBuilder::default();
        new_mailbox.name(mailbox.to_string());
        new_mailbox.readonly(true);
        for response in &responses {
            match response.parsed() {
                Response::MailboxData(MailboxDatum::Exists(exists)) => {
                    new_mailbox.exists(exists);
                }
                Response::Data {
                    status: Status::Ok,
                    code: Some(ResponseCode::UidValidity(validity)),
                    ..
                } => {
                    new_mailbox.uid_validity(validity);
                }
                Response::Data {
                    status: Status::Ok,
                    code: Some(ResponseCode::UidNext(next)),
                    ..
                } => {
                    if let Ok(next) = Uid::try_from(next) {
                        new_mailbox.uid_next(next);
                    }
                }
                parsed => trace!("ignoring response to EXAMINE {parsed:?}"),
            }
        }

        let selected = new_mailbox
            .build()
            .map_err(|reason| SelectError::Incomplete {
                mailbox: mailbox.to_string(),
                reason,
            })?;
        trace!("selected mailbox {selected:?}");

        Ok(self.selected.insert(selected))
    }

    /// Lists the UIDs of all messages in the selected mailbox in server order.
    pub async fn list_uids(&mut self) -> Result<Vec<Uid>, FetchError> {
        let selected = self.selected.as_ref().ok_or(FetchError::NoMailboxSelected)?;
        if selected.exists() == 0 {
            return Ok(Vec::new());
        }
        debug!("{}", command::FETCH_ALL_UIDS);
        let responses = execute(&mut self.connection, command::FETCH_ALL_UIDS).await?;
        let mut uids = Vec::with_capacity(responses.len());
        for response in &responses {
            if let Response::Fetch(_, attributes) = response.parsed() {
                for attribute in attributes {
                    if let AttributeValue::Uid(uid) = attribute {
                        match Uid::try_from(uid) {
                            Ok(uid) => uids.push(uid),
                            Err(e) => warn!("ignoring invalid uid: {e}"),
                        }
                    }
                }
            } else {
                trace!("ignoring response to UID FETCH {:?}", response.parsed());
            }
        }

        Ok(uids)
    }

    /// Downloads the full message `uid` from the selected mailbox without
    /// setting `\Seen`.
    pub async fn fetch(&mut self, uid: Uid) -> Result<RemoteMail, FetchError> {
        if self.selected.is_none() {
            return Err(FetchError::NoMailboxSelected);
        }
        let command = command::fetch_message(uid);
        debug!("{command}");
        let responses = execute(&mut self.connection, &command).await?;
        for response in &responses {
            let Response::Fetch(_, attributes) = response.parsed() else {
                trace!("ignoring response to UID FETCH {:?}", response.parsed());
                continue;
            };
            let mut fetched_uid = None;
            let mut internal_date = None;
            let mut content = None;
            for attribute in attributes {
                match attribute {
                    AttributeValue::Uid(value) => fetched_uid = Some(value),
                    AttributeValue::InternalDate(date) => internal_date = Some(date.to_string()),
                    AttributeValue::BodySection {
                        section: None,
                        data: Some(data),
                        ..
                    }
                    | AttributeValue::Rfc822(Some(data)) => content = Some(data.into_owned()),
                    _ => {}
                }
            }
            // unsolicited flag updates for other messages may be interleaved
            if fetched_uid != Some(u32::from(uid)) {
                continue;
            }
            if let Some(content) = content {
                return Ok(RemoteMail::new(uid, internal_date, content));
            }
        }

        Err(FetchError::Missing(uid))
    }

    pub async fn logout(mut self) -> Result<(), CommandError> {
        debug!("{}", command::LOGOUT);
        execute(&mut self.connection, command::LOGOUT).await?;
        Ok(())
    }
}
