use std::io;

use futures::Stream;

use crate::imap::codec::ResponseData;

/// Sends one tagged command and yields every response up to and including the
/// tagged completion.
pub trait SendCommand {
    type Responses<'a>: Stream<Item = io::Result<ResponseData>> + Unpin
    where
        Self: 'a;

    fn send<'a>(&'a mut self, command: &'a str) -> Self::Responses<'a>;
}
