/// Parameters of a part's `Content-Disposition` header that identify the
/// field.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ContentDisposition {
    pub(crate) field_name: Option<String>,
    pub(crate) file_name: Option<String>,
}

impl ContentDisposition {
    /// Tokenizes a raw header value such as
    /// `form-data; name="field"; filename="a \"quoted\" name.txt"`.
    ///
    /// Parameter names are matched case-insensitively, values may be a token
    /// or a quoted-string with backslash escapes. Parameters other than `name`
    /// and `filename` are skipped.
    pub fn parse(value: &[u8]) -> crate::Result<ContentDisposition> {
        let mut cursor = Cursor { input: value, pos: 0 };
        let mut cd = ContentDisposition::default();

        cursor.skip_whitespace();
        let disposition = cursor.take_while(|b| b != b';');
        if trim(disposition).is_empty() {
            return Err(crate::Error::malformed("missing disposition type in Content-Disposition"));
        }

        while cursor.eat(b';') {
            cursor.skip_whitespace();
            if cursor.is_at_end() || cursor.peek() == Some(b';') {
                continue;
            }

            let key = trim(cursor.take_while(|b| b != b'=' && b != b';'));
            if !cursor.eat(b'=') {
                return Err(crate::Error::malformed(format!(
                    "parameter '{}' has no value in Content-Disposition",
                    String::from_utf8_lossy(key)
                )));
            }
            cursor.skip_whitespace();

            let raw = if cursor.peek() == Some(b'"') {
                let quoted = cursor.quoted_string()?;
                cursor.skip_whitespace();
                if !cursor.is_at_end() && cursor.peek() != Some(b';') {
                    return Err(crate::Error::malformed(
                        "unexpected bytes after quoted value in Content-Disposition",
                    ));
                }
                quoted
            } else {
                trim(cursor.take_while(|b| b != b';')).to_vec()
            };

            if key.eq_ignore_ascii_case(b"name") {
                cd.field_name = Some(into_utf8(raw, "name")?);
            } else if key.eq_ignore_ascii_case(b"filename") {
                cd.file_name = Some(into_utf8(raw, "filename")?);
            }
        }

        Ok(cd)
    }
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        self.take_while(|b| b == b' ' || b == b'\t');
    }

    fn take_while<P: Fn(u8) -> bool>(&mut self, pred: P) -> &'a [u8] {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn quoted_string(&mut self) -> crate::Result<Vec<u8>> {
        self.pos += 1;
        let mut out = Vec::new();

        loop {
            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(escaped) => {
                            out.push(escaped);
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                Some(b) => {
                    out.push(b);
                    self.pos += 1;
                }
                None => break,
            }
        }

        Err(crate::Error::malformed("unterminated quoted-string in Content-Disposition"))
    }
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |idx| idx + 1);
    &bytes[start..end]
}

fn into_utf8(raw: Vec<u8>, param: &str) -> crate::Result<String> {
    String::from_utf8(raw)
        .map_err(|_| crate::Error::malformed(format!("'{}' parameter is not valid UTF-8", param)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(val: &str) -> ContentDisposition {
        ContentDisposition::parse(val.as_bytes()).unwrap()
    }

    #[test]
    fn test_field_name() {
        assert_eq!(parse(r#"form-data; name="my_field""#).field_name.as_deref(), Some("my_field"));
        assert_eq!(parse(r#"form-data; name="my field""#).field_name.as_deref(), Some("my field"));

        let cd = parse(r#"form-data; name="my_field"; filename="file abc.txt""#);
        assert_eq!(cd.field_name.as_deref(), Some("my_field"));
        assert_eq!(cd.file_name.as_deref(), Some("file abc.txt"));

        let cd = parse("form-data; name=\"你好\"; filename=\"file abc.txt\"");
        assert_eq!(cd.field_name.as_deref(), Some("你好"));

        let cd = parse("form-data; name=\"কখগ\"; filename=\"你好.txt\"");
        assert_eq!(cd.field_name.as_deref(), Some("কখগ"));
        assert_eq!(cd.file_name.as_deref(), Some("你好.txt"));
    }

    #[test]
    fn test_filename_does_not_shadow_name() {
        let cd = parse(r#"form-data; filename="file-name.txt""#);
        assert_eq!(cd.field_name, None);
        assert_eq!(cd.file_name.as_deref(), Some("file-name.txt"));

        let cd = parse(r#"form-data; filename="a.txt"; name="upload""#);
        assert_eq!(cd.field_name.as_deref(), Some("upload"));
        assert_eq!(cd.file_name.as_deref(), Some("a.txt"));
    }

    #[test]
    fn test_escaped_quotes() {
        let cd = parse(r#"form-data; name="say \"hi\""; filename="c:\\dir\\a;b.txt""#);
        assert_eq!(cd.field_name.as_deref(), Some(r#"say "hi""#));
        assert_eq!(cd.file_name.as_deref(), Some(r"c:\dir\a;b.txt"));
    }

    #[test]
    fn test_tokens_and_case() {
        let cd = parse("form-data ;  NAME = plain ; FileName=report.pdf ; size=10;");
        assert_eq!(cd.field_name.as_deref(), Some("plain"));
        assert_eq!(cd.file_name.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_empty_values() {
        let cd = parse(r#"form-data; name=""; filename="""#);
        assert_eq!(cd.field_name.as_deref(), Some(""));
        assert_eq!(cd.file_name.as_deref(), Some(""));
    }

    #[test]
    fn test_malformed() {
        assert!(ContentDisposition::parse(b"").is_err());
        assert!(ContentDisposition::parse(b"; name=\"a\"").is_err());
        assert!(ContentDisposition::parse(b"form-data; name=\"open").is_err());
        assert!(ContentDisposition::parse(b"form-data; name").is_err());
        assert!(ContentDisposition::parse(b"form-data; name=\"a\"junk").is_err());
        assert!(ContentDisposition::parse(b"form-data; name=\"\xff\"").is_err());
    }
}
