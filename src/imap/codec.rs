use std::{fmt::Debug, io};

use bytes::{BufMut as _, Bytes, BytesMut};
use imap_proto::{Request, RequestId, Response};
use tokio_util::codec::{Decoder, Encoder};

/// One complete response line from the server, including any literals.
///
/// The raw bytes are kept and parsed on access, so the parsed [`Response`] can
/// borrow from them.
#[derive(Clone)]
pub struct ResponseData {
    raw: Bytes,
}

impl ResponseData {
    pub fn parsed(&self) -> Response<'_> {
        let (_, response) = imap_proto::parser::parse_response(&self.raw)
            .expect("raw response was validated on construction");
        response
    }

    pub fn request_id(&self) -> Option<RequestId> {
        if let Response::Done { tag, .. } = self.parsed() {
            Some(tag)
        } else {
            None
        }
    }
}

impl Debug for ResponseData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ResponseData").field(&self.parsed()).finish()
    }
}

#[derive(Default)]
pub struct ImapCodec;

impl Decoder for ImapCodec {
    type Item = ResponseData;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if buf.is_empty() {
            return Ok(None);
        }
        let consumed = match imap_proto::parser::parse_response(&buf[..]) {
            Ok((rest, _)) => buf.len() - rest.len(),
            Err(nom::Err::Incomplete(_)) => return Ok(None),
            Err(e) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unparsable response: {e:?}"),
                ));
            }
        };
        let raw = buf.split_to(consumed).freeze();

        Ok(Some(ResponseData { raw }))
    }
}

impl<'a> Encoder<&'a Request<'a>> for ImapCodec {
    type Error = io::Error;

    fn encode(&mut self, request: &'a Request<'a>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let Request(tag, command) = request;
        dst.reserve(tag.len() + command.len() + 3);
        if !tag.is_empty() {
            dst.put_slice(tag);
            dst.put_u8(b' ');
        }
        dst.put_slice(command);
        dst.put_slice(b"\r\n");

        Ok(())
    }
}
