mod client;
mod codec;
mod command;
mod connection;
mod mailbox;

pub use client::Client;
pub use client::FetchError;
pub use client::ListError;
pub use client::LoginError;
pub use client::SelectError;
pub use client::Session;
pub use connection::ConnectionError;
pub use connection::SendCommand;
#[cfg(test)]
pub use connection::mock_connection::MockConnection;
pub use mailbox::RemoteMail;
pub use mailbox::Uid;
