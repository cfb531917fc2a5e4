use memchr::memchr;

use crate::error::LineError;
use crate::reading::Reading;

/// One decoded `<key>;<reading>` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub key: &'a [u8],
    pub reading: Reading,
    /// Bytes consumed, including the terminator when there is one.
    pub consumed: usize,
}

/// Returns the line starting at `bytes[0]`, without its terminator, and the
/// number of bytes up to and including that terminator.
#[inline]
pub fn split_line(bytes: &[u8]) -> (&[u8], usize) {
    match memchr(b'\n', bytes) {
        Some(nl) => (&bytes[..nl], nl + 1),
        None => (bytes, bytes.len()),
    }
}

/// Decodes the line at the start of `bytes`.
#[inline]
pub fn decode_line(bytes: &[u8]) -> Result<Line<'_>, LineError> {
    let (line, consumed) = split_line(bytes);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let semicolon = memchr(b';', line).ok_or(LineError::MissingSeparator)?;
    if semicolon == 0 {
        return Err(LineError::EmptyKey);
    }
    let reading = Reading::decode(&line[semicolon + 1..])?;

    Ok(Line {
        key: &line[..semicolon],
        reading,
        consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_line_with_terminator() {
        let line = decode_line(b"mycity;23.0\n").unwrap();
        assert_eq!(line.key, b"mycity");
        assert_eq!(line.reading.as_f64(), 23.0);
        assert_eq!(line.consumed, 12);
    }

    #[test]
    fn decodes_fractional_reading() {
        let line = decode_line(b"mycity;22.3\nnext;1.0\n").unwrap();
        assert_eq!(line.key, b"mycity");
        assert_eq!(line.reading.as_f64(), 22.3);
        assert_eq!(line.consumed, 12);
    }

    #[test]
    fn last_line_without_terminator() {
        let line = decode_line(b"Harbin;-10.1").unwrap();
        assert_eq!(line.key, b"Harbin");
        assert_eq!(line.reading.tenths(), -101);
        assert_eq!(line.consumed, 12);
    }

    #[test]
    fn tolerates_crlf() {
        let line = decode_line(b"Oslo;1.5\r\n").unwrap();
        assert_eq!(line.key, b"Oslo");
        assert_eq!(line.reading.tenths(), 15);
        assert_eq!(line.consumed, 10);
    }

    #[test]
    fn key_may_contain_spaces_and_unicode() {
        let line = decode_line("São Paulo;-0.5\n".as_bytes()).unwrap();
        assert_eq!(line.key, "São Paulo".as_bytes());
        assert_eq!(line.reading.tenths(), -5);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(decode_line(b"city;NaN\n"), Err(LineError::InvalidReading));
        assert_eq!(decode_line(b"no separator\n"), Err(LineError::MissingSeparator));
        assert_eq!(decode_line(b"\n"), Err(LineError::MissingSeparator));
        assert_eq!(decode_line(b";1.0\n"), Err(LineError::EmptyKey));
        assert_eq!(decode_line(b"a;b;1.0\n"), Err(LineError::InvalidReading));
        assert_eq!(decode_line(b"city;1.25\n"), Err(LineError::InvalidReading));
        assert_eq!(decode_line(b"city;\n"), Err(LineError::InvalidReading));
    }
}
