use jiff::Timestamp;
use log::trace;
use mailparse::MailHeaderMap as _;

const INTERNAL_DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S %z";

/// Reads the `Date` header of a raw message.
///
/// Strict RFC 2822 parsing is tried first, then the more lenient parser used
/// for mail in the wild. Returns `None` if the header is missing or neither
/// parser accepts it.
pub fn date_header(content: &[u8]) -> Option<Timestamp> {
    let (headers, _) = mailparse::parse_headers(content).ok()?;
    let date = headers.get_first_value("Date")?;
    let date = date.trim();
    match jiff::fmt::rfc2822::parse(date) {
        Ok(zoned) => Some(zoned.timestamp()),
        Err(e) => {
            trace!("strict parsing of date {date:?} failed: {e}");
            lenient(date)
        }
    }
}

// dateparse answers 0 instead of failing when it finds nothing it
// recognizes, and the epoch itself is left to the strict parser.
fn lenient(date: &str) -> Option<Timestamp> {
    let seconds = mailparse::dateparse(date).ok().filter(|&seconds| seconds != 0)?;
    Timestamp::from_second(seconds).ok()
}

/// Parses an IMAP `INTERNALDATE` such as ` 2-Feb-2023 00:00:00 +0000`.
pub fn internal_date(value: &str) -> Option<Timestamp> {
    // day may be space padded
    let normalized = if let Some(rest) = value.strip_prefix(' ') {
        format!("0{rest}")
    } else {
        value.to_string()
    };
    Timestamp::strptime(INTERNAL_DATE_FORMAT, normalized.trim_end()).ok()
}
