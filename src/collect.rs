use crate::{Field, Handler};
use bytes::{Bytes, BytesMut};
use encoding_rs::{Encoding, UTF_8};
#[cfg(feature = "json")]
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// A [`Handler`] that buffers every completed field in memory.
///
/// A field shows up in the collector only after its closing boundary has been
/// seen, so a partially received field is never observable.
///
/// This is meant for small forms. Use
/// [`SizeLimit`](crate::SizeLimit) to bound what an attacker can make it hold,
/// or write a custom [`Handler`] to stream large uploads elsewhere.
#[derive(Debug, Default)]
pub struct FormCollector {
    fields: Vec<CollectedField>,
    current: Option<(Field, BytesMut)>,
}

impl FormCollector {
    /// Creates an empty collector.
    pub fn new() -> FormCollector {
        FormCollector::default()
    }

    /// The completed fields, in the order they appeared in the body.
    pub fn fields(&self) -> &[CollectedField] {
        &self.fields
    }

    /// The first completed field with the given name.
    pub fn get(&self, name: &str) -> Option<&CollectedField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Number of completed fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field has been completed yet.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the collector and returns the completed fields.
    pub fn into_fields(self) -> Vec<CollectedField> {
        self.fields
    }
}

impl Handler for FormCollector {
    fn on_field_start(&mut self, field: Field) {
        self.current = Some((field, BytesMut::new()));
    }

    fn on_field_data(&mut self, data: &[u8]) {
        if let Some((_, buf)) = self.current.as_mut() {
            buf.extend_from_slice(data);
        }
    }

    fn on_field_end(&mut self) {
        if let Some((field, buf)) = self.current.take() {
            self.fields.push(CollectedField {
                field,
                data: buf.freeze(),
            });
        }
    }
}

/// A field whose whole value has been received.
#[derive(Debug, Clone)]
pub struct CollectedField {
    field: Field,
    data: Bytes,
}

impl CollectedField {
    /// The part descriptor.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The field name.
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// The file name, present only for file fields.
    pub fn file_name(&self) -> Option<&str> {
        self.field.file_name()
    }

    /// The `Content-Type` of the part, exactly as it was sent.
    pub fn content_type(&self) -> Option<&str> {
        self.field.content_type()
    }

    /// The raw field value.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Consumes the field and returns its raw value.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Decodes the value as text, honouring the `charset` parameter of the
    /// part's `Content-Type` and defaulting to UTF-8.
    ///
    /// Malformed sequences are replaced with `U+FFFD`.
    pub fn text(&self) -> String {
        self.text_with_charset("utf-8")
    }

    /// Decodes the value as text with the `charset` of the part's
    /// `Content-Type`, or `default_encoding` if it has none.
    ///
    /// Unknown encoding labels fall back to UTF-8.
    pub fn text_with_charset(&self, default_encoding: &str) -> String {
        let mime = self.field.mime();

        let encoding_name = mime
            .as_ref()
            .and_then(|mime| mime.get_param(mime::CHARSET))
            .map(|charset| charset.as_str())
            .unwrap_or(default_encoding);

        let encoding = Encoding::for_label(encoding_name.as_bytes()).unwrap_or(UTF_8);

        let (text, _, _) = encoding.decode(&self.data);

        match text {
            Cow::Owned(s) => s,
            Cow::Borrowed(s) => String::from(s),
        }
    }

    /// Deserializes the value as JSON.
    ///
    /// # Optional
    ///
    /// This requires the optional `json` feature to be enabled.
    #[cfg(feature = "json")]
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_slice(&self.data).map_err(crate::Error::DecodeJson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MultipartParser;

    fn collect(data: &str) -> FormCollector {
        let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
        parser.feed(data.as_bytes()).unwrap();
        parser.finish().unwrap();
        parser.into_handler()
    }

    #[test]
    fn test_only_completed_fields_are_visible() {
        let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
        parser
            .feed(b"--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhalf")
            .unwrap();
        assert!(parser.handler().is_empty());

        parser.feed(b" done\r\n--X-BOUNDARY--").unwrap();
        assert_eq!(parser.handler().len(), 1);
        assert_eq!(parser.handler().get("a").unwrap().bytes(), &Bytes::from_static(b"half done"));
    }

    #[test]
    fn test_text_with_charset() {
        let form = collect(
            "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"latin\"\r\nContent-Type: text/plain; charset=iso-8859-1\r\n\r\ncaf\u{e9}\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"plain\"\r\n\r\ncaf\u{e9}\r\n--X-BOUNDARY--\r\n",
        );

        // The UTF-8 bytes of "é" read as latin-1 are two characters.
        assert_eq!(form.get("latin").unwrap().text(), "caf\u{c3}\u{a9}");
        assert_eq!(form.get("plain").unwrap().text(), "caf\u{e9}");
        assert_eq!(form.get("plain").unwrap().content_type(), None);
        assert!(form.get("missing").is_none());
    }

    #[test]
    fn test_into_fields_keeps_order() {
        let form = collect(
            "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"x\"\r\n\r\n1\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"x\"\r\n\r\n2\r\n--X-BOUNDARY--\r\n",
        );

        let values: Vec<_> = form.into_fields().into_iter().map(|f| f.into_bytes()).collect();
        assert_eq!(values, vec![Bytes::from_static(b"1"), Bytes::from_static(b"2")]);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Meta {
            id: u32,
        }

        let form = collect(
            "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"meta\"\r\nContent-Type: application/json\r\n\r\n{\"id\": 7}\r\n--X-BOUNDARY--\r\n",
        );

        assert_eq!(form.get("meta").unwrap().json::<Meta>().unwrap(), Meta { id: 7 });
        assert!(form.get("meta").unwrap().json::<Vec<u8>>().is_err());
    }
}
