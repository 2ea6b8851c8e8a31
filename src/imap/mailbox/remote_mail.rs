use std::fmt::Debug;

use crate::imap::Uid;

/// A message as downloaded from the server.
pub struct RemoteMail {
    uid: Uid,
    internal_date: Option<String>,
    content: Vec<u8>,
}

impl RemoteMail {
    pub fn new(uid: Uid, internal_date: Option<String>, content: Vec<u8>) -> Self {
        Self {
            uid,
            internal_date,
            content,
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// The raw `INTERNALDATE` string, e.g. `17-Jul-1996 02:44:25 -0700`.
    pub fn internal_date(&self) -> Option<&str> {
        self.internal_date.as_deref()
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl Debug for RemoteMail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteMail")
            .field("uid", &self.uid)
            .field("internal_date", &self.internal_date)
            .field("size", &self.content.len())
            .finish_non_exhaustive()
    }
}
