//! Line-oriented vault file codec.
//!
//! Each record occupies one line, `site,username,secret_hex`. Blank lines are ignored and
//! line numbers are 1-based positions in the original file so diagnostics point at the
//! right place. Lines keep their original bytes so an undecodable line can be written back
//! exactly as it was read.
use alloc::{string::String, vec::Vec};
use thiserror::Error;

/// Separator between the three fields of a vault line.
pub const FIELD_DELIMITER: char = ',';

const FIELD_COUNT: usize = 3;

/// A non-blank line as read from storage, without its `\n` terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub bytes: Vec<u8>,
}

impl RawLine {
    /// The line as text with surrounding whitespace removed.
    pub fn text(&self) -> Result<&str, LineError> {
        core::str::from_utf8(&self.bytes)
            .map(str::trim)
            .map_err(|_| LineError::Encoding)
    }
}

/// Structured view of a vault line. The secret is still encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    pub site: String,
    pub username: String,
    pub secret_hex: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),
    #[error("field contains the delimiter or a line break")]
    Delimiter,
    #[error("line is not valid UTF-8")]
    Encoding,
}

/// Split file contents into non-blank lines, keeping each line's bytes untouched.
pub fn split_lines(contents: &[u8]) -> Vec<RawLine> {
    let body = contents.strip_suffix(b"\n").unwrap_or(contents);
    if body.is_empty() {
        return Vec::new();
    }

    body.split(|byte| *byte == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
        .map(|(index, line)| RawLine {
            number: index + 1,
            bytes: line.to_vec(),
        })
        .collect()
}

/// Parse a stored line. Surrounding whitespace, including a `\r` before the newline, is
/// ignored.
pub fn parse_raw(line: &RawLine) -> Result<EncryptedRecord, LineError> {
    parse_line(line.text()?)
}

pub fn parse_line(line: &str) -> Result<EncryptedRecord, LineError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(LineError::FieldCount(fields.len()));
    }

    Ok(EncryptedRecord {
        site: String::from(fields[0]),
        username: String::from(fields[1]),
        secret_hex: String::from(fields[2]),
    })
}

/// Render a record as a vault line without the trailing newline.
pub fn encode_line(record: &EncryptedRecord) -> Result<String, LineError> {
    let fields = [&record.site, &record.username, &record.secret_hex];
    if fields
        .iter()
        .any(|field| field.contains(FIELD_DELIMITER) || field.contains(['\n', '\r']))
    {
        return Err(LineError::Delimiter);
    }

    let mut line =
        String::with_capacity(fields.iter().map(|field| field.len()).sum::<usize>() + 2);
    line.push_str(&record.site);
    line.push(FIELD_DELIMITER);
    line.push_str(&record.username);
    line.push(FIELD_DELIMITER);
    line.push_str(&record.secret_hex);
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped_but_numbering_is_kept() {
        let lines = split_lines(b"a,b,c\n\n   \n d,e,f \r\n");

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[1].bytes, b" d,e,f \r");
        assert_eq!(lines[1].text(), Ok("d,e,f"));
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let lines = split_lines(b"a,b,c\nd,e,f");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].bytes, b"d,e,f");
        assert!(split_lines(b"").is_empty());
        assert!(split_lines(b"\n").is_empty());
    }

    #[test]
    fn invalid_utf8_is_kept_as_bytes_and_reported() {
        let lines = split_lines(b"a,b,c\nbad\xff\xfeline\n");

        assert_eq!(lines[1].bytes, b"bad\xff\xfeline");
        assert_eq!(lines[1].text(), Err(LineError::Encoding));
        assert_eq!(parse_raw(&lines[1]), Err(LineError::Encoding));
        assert!(parse_raw(&lines[0]).is_ok());
    }

    #[test]
    fn parses_three_fields() {
        let record = parse_line("example.com,alice,00ff").unwrap();
        assert_eq!(record.site, "example.com");
        assert_eq!(record.username, "alice");
        assert_eq!(record.secret_hex, "00ff");
    }

    #[test]
    fn empty_fields_are_allowed() {
        let record = parse_line(",,00").unwrap();
        assert!(record.site.is_empty());
        assert!(record.username.is_empty());
    }

    #[test]
    fn wrong_field_count_is_reported() {
        assert_eq!(parse_line("only,two"), Err(LineError::FieldCount(2)));
        assert_eq!(parse_line("a,b,c,d"), Err(LineError::FieldCount(4)));
        assert_eq!(parse_line("garbage"), Err(LineError::FieldCount(1)));
    }

    #[test]
    fn encoding_rejects_embedded_delimiters() {
        let record = EncryptedRecord {
            site: String::from("a,b"),
            username: String::from("alice"),
            secret_hex: String::from("00"),
        };
        assert_eq!(encode_line(&record), Err(LineError::Delimiter));

        let newline = EncryptedRecord {
            site: String::from("site"),
            username: String::from("al\nice"),
            secret_hex: String::from("00"),
        };
        assert_eq!(encode_line(&newline), Err(LineError::Delimiter));
    }

    #[test]
    fn encoded_line_parses_back() {
        let record = EncryptedRecord {
            site: String::from("example.com"),
            username: String::from("alice"),
            secret_hex: String::from("deadbeef"),
        };
        let line = encode_line(&record).unwrap();

        assert_eq!(line, "example.com,alice,deadbeef");
        assert_eq!(parse_line(&line).unwrap(), record);
    }
}
