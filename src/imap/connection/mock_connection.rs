use std::{cell::RefCell, collections::VecDeque, io, rc::Rc};

use bytes::BytesMut;
use futures::stream;
use tokio_util::codec::Decoder as _;

use crate::imap::{
    codec::{ImapCodec, ResponseData},
    connection::SendCommand,
};

/// Replays scripted server responses, one script per command, and records
/// every command it was asked to send.
#[derive(Debug, Default)]
pub struct MockConnection {
    scripts: VecDeque<Vec<io::Result<ResponseData>>>,
    sent: Rc<RefCell<Vec<String>>>,
}

impl MockConnection {
    pub fn new<'a>(scripts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut this = Self::default();
        for script in scripts {
            this.push(script);
        }
        this
    }

    /// Queues the raw server lines answering the next command. Tagged lines
    /// use the tags a fresh client generates, starting at `0000`.
    pub fn push(&mut self, script: &str) {
        let mut buf = BytesMut::from(script.as_bytes());
        let mut responses = Vec::new();
        while let Some(response) = ImapCodec
            .decode(&mut buf)
            .expect("scripted response should parse")
        {
            responses.push(Ok(response));
        }
        assert!(buf.is_empty(), "scripted response should be complete");
        self.scripts.push_back(responses);
    }

    /// Queues a transport failure as the answer to the next command.
    pub fn push_error(&mut self, kind: io::ErrorKind) {
        self.scripts
            .push_back(vec![Err(io::Error::new(kind, "scripted failure"))]);
    }

    /// Handle to the commands sent so far. Stays usable after the
    /// connection was moved into a client.
    pub fn sent(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.sent)
    }
}

impl SendCommand for MockConnection {
    type Responses<'a> = stream::Iter<std::vec::IntoIter<io::Result<ResponseData>>>;

    fn send<'a>(&'a mut self, command: &'a str) -> Self::Responses<'a> {
        self.sent.borrow_mut().push(command.to_string());
        let responses = self
            .scripts
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted responses left for {command}"));
        stream::iter(responses)
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use futures::StreamExt as _;
    use rstest::*;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn test_mock_replays_scripts_in_order() {
        let mut connection = MockConnection::new([
            "* 2 EXISTS\r\n0000 OK done\r\n",
            "0001 NO nope\r\n",
        ]);

        let first: Vec<_> = connection.send("EXAMINE x").collect().await;
        assert_eq!(first.len(), 2);
        let second: Vec<_> = connection.send("LOGOUT").collect().await;
        assert_eq!(second.len(), 1);
        let done = assert_ok!(second.into_iter().next().expect("one response"));
        assert_eq!(assert_some!(done.request_id()).0, "0001");

        assert_eq!(*connection.sent().borrow(), ["EXAMINE x", "LOGOUT"]);
    }
}
