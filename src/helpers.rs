use crate::constants;
use http::header::{HeaderName, HeaderValue};
use std::convert::TryFrom;

/// Tokenizes one header line (without its line terminator) into a typed
/// header pair.
///
/// Returns `None` for lines that aren't well-formed `Name: value` headers.
pub(crate) fn parse_header_line(line: &[u8]) -> Option<(HeaderName, HeaderValue)> {
    // httparse only calls a header block complete once it sees the blank line.
    let mut block = Vec::with_capacity(line.len() + 2 * constants::CRLF.len());
    block.extend_from_slice(line);
    block.extend_from_slice(constants::CRLF.as_bytes());
    block.extend_from_slice(constants::CRLF.as_bytes());

    let mut headers = [httparse::EMPTY_HEADER; 1];
    let raw_header = match httparse::parse_headers(&block, &mut headers) {
        Ok(httparse::Status::Complete((_, [raw_header]))) => raw_header,
        _ => return None,
    };

    let name = HeaderName::try_from(raw_header.name).ok()?;
    let value = HeaderValue::from_bytes(raw_header.value).ok()?;

    Some((name, value))
}

/// Strips the line terminator from a header line read up to its `\n`.
pub(crate) fn trim_line_end(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(&constants::CR) => &line[..line.len() - 1],
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;

    #[test]
    fn test_parse_header_line() {
        let (name, value) = parse_header_line(b"Content-Type: text/plain").unwrap();
        assert_eq!(name, header::CONTENT_TYPE);
        assert_eq!(value, "text/plain");

        let (name, value) = parse_header_line(b"content-disposition:form-data; name=\"a\"").unwrap();
        assert_eq!(name, header::CONTENT_DISPOSITION);
        assert_eq!(value.as_bytes(), b"form-data; name=\"a\"");

        let (name, value) = parse_header_line("X-Note: caf\u{e9}".as_bytes()).unwrap();
        assert_eq!(name.as_str(), "x-note");
        assert_eq!(value.as_bytes(), "caf\u{e9}".as_bytes());
    }

    #[test]
    fn test_parse_header_line_rejects_garbage() {
        assert!(parse_header_line(b"no colon here").is_none());
        assert!(parse_header_line(b": empty name").is_none());
    }

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"abc\r"), b"abc");
        assert_eq!(trim_line_end(b"abc"), b"abc");
        assert_eq!(trim_line_end(b"\r"), b"");
        assert_eq!(trim_line_end(b""), b"");
    }
}
