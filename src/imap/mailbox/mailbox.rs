use derive_getters::Getters;

use crate::imap::Uid;

/// State of a mailbox as reported by the server when it was opened.
#[derive(Debug, Getters)]
pub struct Mailbox {
    name: String,
    readonly: bool,
    exists: u32,
    #[getter(skip)]
    uid_validity: Option<u32>,
    #[getter(skip)]
    uid_next: Option<Uid>,
}

impl Mailbox {
    pub fn uid_validity(&self) -> Option<u32> {
        self.uid_validity
    }

    pub fn uid_next(&self) -> Option<Uid> {
        self.uid_next
    }
}

#[derive(Default, Debug)]
pub struct MailboxBuilder {
    name: Option<String>,
    readonly: Option<bool>,
    exists: Option<u32>,
    uid_validity: Option<u32>,
    uid_next: Option<Uid>,
}

impl MailboxBuilder {
    pub fn build(self) -> Result<Mailbox, &'static str> {
        match (self.name, self.exists) {
            (Some(name), Some(exists)) => Ok(Mailbox {
                name,
                readonly: self.readonly.unwrap_or(false),
                exists,
                uid_validity: self.uid_validity,
                uid_next: self.uid_next,
            }),
            _ => Err("server did not report name and message count"),
        }
    }

    pub fn name(&mut self, name: String) {
        self.name = Some(name);
    }

    pub fn readonly(&mut self, readonly: bool) {
        self.readonly = Some(readonly);
    }

    pub fn exists(&mut self, exists: u32) {
        self.exists = Some(exists);
    }

    pub fn uid_validity(&mut self, uid_validity: u32) {
        self.uid_validity = Some(uid_validity);
    }

    pub fn uid_next(&mut self, uid_next: Uid) {
        self.uid_next = Some(uid_next);
    }
}
