use std::io;

use futures::StreamExt as _;
use log::{debug, trace};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_native_tls::{TlsConnector, TlsStream, native_tls};
use tokio_util::codec::Framed;

use crate::imap::{
    codec::{ImapCodec, ResponseData},
    connection::{SendCommand, response_stream::ResponseStream, tag_generator::TagGenerator},
};

pub type ImapStream = Framed<TlsStream<TcpStream>, ImapCodec>;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("cannot reach {host}:{port}: {source}")]
    Tcp {
        host: String,
        port: u16,
        source: io::Error,
    },
    #[error("tls setup with {host} failed: {source}")]
    Tls {
        host: String,
        source: native_tls::Error,
    },
    #[error("server closed the connection before greeting")]
    NoGreeting,
    #[error("server refused the connection: {0}")]
    Refused(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Connection {
    stream: ImapStream,
    tag_generator: TagGenerator,
}

impl Connection {
    /// Opens a TLS connection and reads the server greeting.
    pub async fn connect_to(
        host: &str,
        port: u16,
    ) -> Result<(Self, ResponseData), ConnectionError> {
        debug!("connecting to {host}:{port}");
        let tls = native_tls::TlsConnector::new().map_err(|source| ConnectionError::Tls {
            host: host.to_string(),
            source,
        })?;
        let tls = TlsConnector::from(tls);
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| ConnectionError::Tcp {
                host: host.to_string(),
                port,
                source,
            })?;
        let stream = tls
            .connect(host, stream)
            .await
            .map_err(|source| ConnectionError::Tls {
                host: host.to_string(),
                source,
            })?;

        let mut stream = Framed::new(stream, ImapCodec);

        let greeting = stream.next().await.ok_or(ConnectionError::NoGreeting)??;
        trace!("greeting = {greeting:?}");
        if let imap_proto::Response::Data {
            status: imap_proto::Status::Bye | imap_proto::Status::Bad | imap_proto::Status::No,
            information,
            ..
        } = greeting.parsed()
        {
            return Err(ConnectionError::Refused(
                information.map(|i| i.to_string()).unwrap_or_default(),
            ));
        }

        Ok((
            Self {
                stream,
                tag_generator: TagGenerator::default(),
            },
            greeting,
        ))
    }
}

impl SendCommand for Connection {
    type Responses<'a> = ResponseStream<'a>;

    fn send<'a>(&'a mut self, command: &'a str) -> Self::Responses<'a> {
        ResponseStream::new(&mut self.stream, &mut self.tag_generator, command)
    }
}
