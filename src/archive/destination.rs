use std::{
    fmt::Write as _,
    fs::{self, DirBuilder, File, OpenOptions},
    io::{self, Write as _},
    os::unix::fs::DirBuilderExt as _,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use log::trace;
use rustix::fs::{Timespec, Timestamps};

use crate::imap::Uid;

/// The directory tree archive files are written to.
///
/// Every message lands at `<root>/<encoded mailbox>/<uid>.eml`.
#[derive(Debug, Clone)]
pub struct Destination {
    root: PathBuf,
}

impl Destination {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn mailbox_dir(&self, mailbox: &str) -> PathBuf {
        self.root.join(encode_mailbox(mailbox))
    }

    pub fn path_for(&self, mailbox: &str, uid: Uid) -> PathBuf {
        self.mailbox_dir(mailbox).join(format!("{uid}.eml"))
    }

    // Content is written to a hidden sibling, synced and timestamped, then
    // renamed over the final path. An interrupted run never leaves a partial
    // file at an archive path.
    pub fn store(
        &self,
        mailbox: &str,
        uid: Uid,
        content: &[u8],
        timestamp: Timestamp,
    ) -> io::Result<PathBuf> {
        let dir = self.mailbox_dir(mailbox);
        DirBuilder::new().recursive(true).mode(0o700).create(&dir)?;

        let file_path = dir.join(format!("{uid}.eml"));
        let tmp_path = dir.join(format!(".{uid}.eml.tmp"));
        trace!("writing to {}", tmp_path.display());
        let result = write_timestamped(&tmp_path, content, timestamp)
            .and_then(|()| fs::rename(&tmp_path, &file_path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        Ok(file_path)
    }
}

fn write_timestamped(path: &Path, content: &[u8], timestamp: Timestamp) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(content)?;
    file.sync_all()?;
    set_times(&file, timestamp)
}

/// Sets both access and modification time of `file`.
fn set_times(file: &File, timestamp: Timestamp) -> io::Result<()> {
    // jiff rounds toward zero, timespec wants non-negative nanoseconds
    let (mut seconds, mut nanos) = (timestamp.as_second(), timestamp.subsec_nanosecond());
    if nanos < 0 {
        seconds -= 1;
        nanos += 1_000_000_000;
    }
    let time = Timespec {
        tv_sec: seconds,
        tv_nsec: nanos.into(),
    };
    let times = Timestamps {
        last_access: time,
        last_modification: time,
    };
    rustix::fs::futimens(file, &times)?;

    Ok(())
}

/// Turns a mailbox name into a single path component.
///
/// Path separators, characters that are special on common filesystems and
/// `%` itself are percent encoded, as is a leading dot, so distinct names
/// always give distinct components. Case is kept as is, so `INBOX` and
/// `Inbox` only stay apart on a case-sensitive filesystem.
pub fn encode_mailbox(mailbox: &str) -> String {
    if mailbox.is_empty() {
        return "%".to_string();
    }
    let mut encoded = String::with_capacity(mailbox.len());
    for (index, c) in mailbox.chars().enumerate() {
        let special = matches!(
            c,
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%'
        ) || c.is_control()
            || (index == 0 && c == '.');
        if special {
            let mut buf = [0; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                write!(encoded, "%{byte:02X}").expect("writing to String should not fail");
            }
        } else {
            encoded.push(c);
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, time::SystemTime};

    use assertables::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    #[fixture]
    fn root() -> TempDir {
        assert_ok!(tempfile::tempdir())
    }

    #[fixture]
    fn uid() -> Uid {
        assert_ok!(Uid::try_from(7))
    }

    #[fixture]
    fn timestamp() -> Timestamp {
        assert_ok!("2023-01-01T10:00:00Z".parse())
    }

    #[rstest]
    #[case("INBOX", "INBOX")]
    #[case("Sent Items", "Sent Items")]
    #[case("Archive/2023", "Archive%2F2023")]
    #[case("100%", "100%25")]
    #[case("..", "%2E.")]
    #[case(".hidden", "%2Ehidden")]
    #[case("a.b", "a.b")]
    #[case("Entw&APw-rfe", "Entw&APw-rfe")]
    #[case("", "%")]
    fn test_encode_mailbox(#[case] mailbox: &str, #[case] expected: &str) {
        assert_eq!(encode_mailbox(mailbox), expected);
    }

    #[rstest]
    fn test_encoding_is_injective() {
        let names = [
            "INBOX",
            "INBOX/sub",
            "INBOX%2Fsub",
            "INBOX.sub",
            ".INBOX",
            "%2EINBOX",
            "INBOX:sub",
            "Inbox",
            "",
            "%",
        ];
        let encoded: HashSet<String> = names.iter().map(|name| encode_mailbox(name)).collect();
        assert_eq!(encoded.len(), names.len());
    }

    #[rstest]
    fn test_path_is_pure_function_of_mailbox_and_uid(root: TempDir, uid: Uid) {
        let destination = Destination::new(root.path().to_path_buf());
        let path = destination.path_for("Archive/2023", uid);
        assert_eq!(path, root.path().join("Archive%2F2023").join("7.eml"));
        assert_eq!(path, destination.path_for("Archive/2023", uid));
        assert_ne!(
            path,
            destination.path_for("Archive/2023", assert_ok!(Uid::try_from(8)))
        );
    }

    #[rstest]
    fn test_store_writes_content_and_times(root: TempDir, uid: Uid, timestamp: Timestamp) {
        let destination = Destination::new(root.path().join("out"));

        let path = assert_ok!(destination.store("INBOX", uid, b"hello", timestamp));

        assert_eq!(path, destination.path_for("INBOX", uid));
        let metadata = assert_ok!(fs::metadata(&path));
        let expected = SystemTime::from(timestamp);
        assert_eq!(assert_ok!(metadata.modified()), expected);
        assert_eq!(assert_ok!(metadata.accessed()), expected);
        assert_eq!(assert_ok!(fs::read(&path)), b"hello");
    }

    #[rstest]
    fn test_store_handles_dates_before_epoch(root: TempDir, uid: Uid) {
        let destination = Destination::new(root.path().to_path_buf());
        let timestamp: Timestamp = assert_ok!("1969-12-31T23:59:59.5Z".parse());

        let path = assert_ok!(destination.store("INBOX", uid, b"hello", timestamp));

        let metadata = assert_ok!(fs::metadata(&path));
        assert_eq!(assert_ok!(metadata.modified()), SystemTime::from(timestamp));
    }

    #[rstest]
    fn test_store_leaves_no_temporary_files(root: TempDir, uid: Uid, timestamp: Timestamp) {
        let destination = Destination::new(root.path().to_path_buf());

        assert_ok!(destination.store("INBOX", uid, b"hello", timestamp));

        let entries: Vec<_> = assert_ok!(fs::read_dir(destination.mailbox_dir("INBOX")))
            .map(|entry| {
                assert_ok!(entry)
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(entries, ["7.eml"]);
    }

    #[rstest]
    fn test_store_overwrites_on_rerun(root: TempDir, uid: Uid, timestamp: Timestamp) {
        let destination = Destination::new(root.path().to_path_buf());
        let first = assert_ok!(destination.store("INBOX", uid, b"old", timestamp));

        let second = assert_ok!(destination.store("INBOX", uid, b"new", timestamp));

        assert_eq!(first, second);
        assert_eq!(assert_ok!(fs::read(&second)), b"new");
    }

    #[rstest]
    fn test_store_fails_when_root_is_a_file(root: TempDir, uid: Uid, timestamp: Timestamp) {
        let file = root.path().join("file");
        assert_ok!(fs::write(&file, b""));
        let destination = Destination::new(file);

        assert_err!(destination.store("INBOX", uid, b"hello", timestamp));
    }
}
