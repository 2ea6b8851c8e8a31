use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0} contains a line break, NUL or non-ASCII character")]
pub struct Unquotable(pub &'static str);

/// Renders `value` as an IMAP quoted string, or `None` if a quoted string
/// cannot carry it.
pub fn quote(value: &str) -> Option<String> {
    if value
        .bytes()
        .any(|b| !b.is_ascii() || matches!(b, b'\0' | b'\r' | b'\n'))
    {
        return None;
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Some(quoted)
}

/// Drops the backslash escapes the server left in a quoted string.
pub fn unescape(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        let c = if c == '\\' { chars.next().unwrap_or(c) } else { c };
        unescaped.push(c);
    }
    unescaped
}

pub fn login(username: &str, password: &str) -> Result<String, Unquotable> {
    let username = quote(username).ok_or(Unquotable("user name"))?;
    let password = quote(password).ok_or(Unquotable("password"))?;
    Ok(format!("LOGIN {username} {password}"))
}

pub fn examine(mailbox: &str) -> Result<String, Unquotable> {
    let mailbox = quote(mailbox).ok_or(Unquotable("mailbox name"))?;
    Ok(format!("EXAMINE {mailbox}"))
}

pub const LIST_ALL: &str = "LIST \"\" \"*\"";
pub const FETCH_ALL_UIDS: &str = "UID FETCH 1:* (UID)";
pub const LOGOUT: &str = "LOGOUT";

pub fn fetch_message(uid: impl std::fmt::Display) -> String {
    format!("UID FETCH {uid} (UID INTERNALDATE BODY.PEEK[])")
}
