mod list_entry;
#[expect(clippy::module_inception)]
mod mailbox;
mod remote_mail;
mod uid;

pub use list_entry::ListEntry;
pub use mailbox::Mailbox;
pub use mailbox::MailboxBuilder;
pub use remote_mail::RemoteMail;
pub use uid::Uid;
