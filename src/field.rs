use crate::content_disposition::ContentDisposition;
use crate::helpers;
use http::header::{self, HeaderMap, HeaderValue};

/// Describes a single part of a `multipart/form-data` body.
///
/// A `Field` is built once the whole header block of its part has been read
/// and is handed to [`Handler::on_field_start`](crate::Handler::on_field_start)
/// before any of its data.
///
/// # Examples
///
/// ```
/// use multipart_feed::{Callbacks, MultipartParser};
///
/// let data: &[u8] = b"--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\n\x89PNG\r\n--X-BOUNDARY--\r\n";
///
/// let mut names = Vec::new();
/// let handler = Callbacks::new(
///     |field: multipart_feed::Field| names.push((field.name().to_owned(), field.file_name().map(str::to_owned))),
///     |_data: &[u8]| {},
///     || {},
/// );
///
/// let mut parser = MultipartParser::new("X-BOUNDARY", handler).unwrap();
/// parser.feed(data).unwrap();
/// drop(parser);
///
/// assert_eq!(names, vec![("photo".to_owned(), Some("a.png".to_owned()))]);
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    file_name: Option<String>,
    content_type: Option<HeaderValue>,
    headers: HeaderMap,
    idx: usize,
}

impl Field {
    /// The field name found in the
    /// [`Content-Disposition`](https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Content-Disposition)
    /// header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file name found in the `Content-Disposition` header, present only
    /// for file fields.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// The `Content-Type` header value of the part, exactly as it was sent.
    ///
    /// Returns `None` as well when the value isn't valid UTF-8; use
    /// [`content_type_raw`](Field::content_type_raw) to get at its bytes.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type
            .as_ref()
            .and_then(|val| std::str::from_utf8(val.as_bytes()).ok())
    }

    /// The raw `Content-Type` header value of the part.
    pub fn content_type_raw(&self) -> Option<&HeaderValue> {
        self.content_type.as_ref()
    }

    /// Parses the `Content-Type` header value as a [`mime::Mime`].
    pub fn mime(&self) -> Option<mime::Mime> {
        self.content_type().and_then(|val| val.parse::<mime::Mime>().ok())
    }

    /// Returns `true` if the part carried a `filename` parameter.
    pub fn is_file(&self) -> bool {
        self.file_name.is_some()
    }

    /// All header lines of the part.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The zero-based position of the part in the body.
    pub fn index(&self) -> usize {
        self.idx
    }
}

/// Headers of the part currently being read.
#[derive(Debug, Default)]
pub(crate) struct FieldHeaders {
    headers: HeaderMap,
    disposition: Option<ContentDisposition>,
    content_type: Option<HeaderValue>,
    lines: usize,
}

impl FieldHeaders {
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Classifies one header line. Lines that aren't headers are skipped.
    pub fn push_line(&mut self, line: &[u8]) -> crate::Result<()> {
        self.lines += 1;

        let (name, value) = match helpers::parse_header_line(line) {
            Some(header) => header,
            None => {
                trace!("ignoring unparseable field header line: {:?}", String::from_utf8_lossy(line));
                return Ok(());
            }
        };

        if name == header::CONTENT_DISPOSITION {
            self.disposition = Some(ContentDisposition::parse(value.as_bytes())?);
        } else if name == header::CONTENT_TYPE {
            self.content_type = Some(value.clone());
        }

        self.headers.append(name, value);
        Ok(())
    }

    pub fn into_field(self, idx: usize) -> crate::Result<Field> {
        let disposition = self
            .disposition
            .ok_or_else(|| crate::Error::malformed("missing Content-Disposition header"))?;

        let name = disposition
            .field_name
            .ok_or_else(|| crate::Error::malformed("missing 'name' parameter in Content-Disposition"))?;

        Ok(Field {
            name,
            file_name: disposition.file_name,
            content_type: self.content_type,
            headers: self.headers,
            idx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_from(lines: &[&str]) -> crate::Result<Field> {
        let mut headers = FieldHeaders::default();
        for line in lines {
            headers.push_line(line.as_bytes())?;
        }
        headers.into_field(3)
    }

    #[test]
    fn test_file_field() {
        let field = field_from(&[
            "Content-Disposition: form-data; name=\"file1\"; filename=\"test.text\"",
            "Content-Type: text/plain",
            "X-Extra: 1",
        ])
        .unwrap();

        assert_eq!(field.name(), "file1");
        assert_eq!(field.file_name(), Some("test.text"));
        assert_eq!(field.content_type(), Some("text/plain"));
        assert_eq!(field.mime(), Some(mime::TEXT_PLAIN));
        assert!(field.is_file());
        assert_eq!(field.index(), 3);
        assert_eq!(field.headers().len(), 3);
        assert_eq!(field.headers()["x-extra"], "1");
    }

    #[test]
    fn test_content_type_kept_verbatim() {
        let field = field_from(&[
            "Content-Disposition: form-data; name=\"doc\"",
            "content-type: Text/HTML;Charset=\"latin1\"",
        ])
        .unwrap();

        assert_eq!(field.content_type(), Some("Text/HTML;Charset=\"latin1\""));
        assert!(!field.is_file());
    }

    #[test]
    fn test_content_type_not_utf8() {
        let mut headers = FieldHeaders::default();
        headers
            .push_line(b"Content-Disposition: form-data; name=\"a\"")
            .unwrap();
        headers.push_line(b"Content-Type: text/plain; x=\xff").unwrap();
        let field = headers.into_field(0).unwrap();

        assert_eq!(field.content_type(), None);
        assert_eq!(
            field.content_type_raw().map(|val| val.as_bytes()),
            Some(&b"text/plain; x=\xff"[..])
        );
        assert_eq!(field.mime(), None);
    }

    #[test]
    fn test_unknown_lines_ignored() {
        let field = field_from(&["garbage line", "Content-Disposition: form-data; name=\"a\""]).unwrap();
        assert_eq!(field.name(), "a");
        assert_eq!(field.headers().len(), 1);
    }

    #[test]
    fn test_missing_name() {
        let err = field_from(&["Content-Disposition: form-data; filename=\"a.txt\""]).unwrap_err();
        assert!(matches!(err, crate::Error::MalformedHeader { .. }));

        let err = field_from(&["Content-Type: text/plain"]).unwrap_err();
        assert!(matches!(err, crate::Error::MalformedHeader { .. }));
    }
}
