use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while parsing a multipart stream and in
/// other operations.
///
/// Every error raised by [`MultipartParser::feed`](crate::MultipartParser::feed)
/// or [`MultipartParser::finish`](crate::MultipartParser::finish) is terminal:
/// the parser is closed afterwards and must be discarded.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// Data was fed after the terminal boundary was seen or after a previous
    /// error.
    #[display(fmt = "cannot receive new data, parser is already closed")]
    Closed,

    /// The boundary given at construction can't be used as a delimiter.
    #[display(fmt = "invalid multipart boundary: {}", _0)]
    InvalidBoundary(&'static str),

    /// The stream doesn't contain a valid boundary delimiter line where one is
    /// expected.
    #[display(fmt = "multipart stream doesn't match the boundary: {}", reason)]
    BoundaryMismatch { reason: &'static str },

    /// A part's header block lacks the `name` parameter or its
    /// `Content-Disposition` can't be tokenized.
    #[display(fmt = "malformed field headers: {}", reason)]
    MalformedHeader { reason: String },

    /// The input ended while a part was still being read.
    #[display(
        fmt = "field '{}' ended before its closing boundary",
        "field_name.as_deref().unwrap_or(\"<unknown>\")"
    )]
    UnterminatedPart { field_name: Option<String> },

    /// A single header line exceeded the maximum length.
    #[display(fmt = "field header line exceeded the maximum size limit: {} bytes", limit)]
    FieldHeadersTooLarge { limit: usize },

    /// A part carried more header lines than allowed.
    #[display(fmt = "field carried more than {} header lines", limit)]
    TooManyHeaders { limit: usize },

    /// An unknown field is detected when multipart
    /// [`constraints`](crate::Constraints::allowed_fields) are added.
    #[display(fmt = "unknown field received: {}", field_name)]
    UnknownField { field_name: String },

    /// The incoming field size exceeded the maximum limit.
    #[display(fmt = "field '{}' exceeded the maximum size limit: {} bytes", field_name, limit)]
    FieldSizeExceeded { limit: u64, field_name: String },

    /// The incoming stream size exceeded the maximum limit.
    #[display(fmt = "stream size exceeded the maximum limit: {} bytes", limit)]
    StreamSizeExceeded { limit: u64 },

    /// Stream read failed.
    #[display(fmt = "stream read failed: {}", _0)]
    StreamReadFailed(BoxError),

    /// The `Content-Type` header is not `multipart/form-data`.
    #[display(fmt = "Content-Type is not multipart/form-data")]
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    #[display(fmt = "Failed to convert Content-Type to `mime::Mime` type: {}", _0)]
    DecodeContentType(mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    #[display(fmt = "multipart boundary not found in Content-Type")]
    NoBoundary,

    /// Failed to decode the collected field data as `JSON` in
    /// [`CollectedField::json`](crate::CollectedField::json).
    #[cfg(feature = "json")]
    #[display(fmt = "failed to decode field data as JSON: {}", _0)]
    DecodeJson(serde_json::Error),
}

impl Error {
    pub(crate) fn malformed<R: Into<String>>(reason: R) -> Error {
        Error::MalformedHeader { reason: reason.into() }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::Closed.to_string(),
            "cannot receive new data, parser is already closed"
        );

        let err = Error::UnterminatedPart { field_name: None };
        assert_eq!(err.to_string(), "field '<unknown>' ended before its closing boundary");

        let err = Error::FieldSizeExceeded {
            limit: 10,
            field_name: "avatar".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "field 'avatar' exceeded the maximum size limit: 10 bytes"
        );
    }

    #[test]
    fn test_eq_by_message() {
        assert_eq!(Error::malformed("oops"), Error::MalformedHeader { reason: "oops".into() });
        assert_ne!(Error::Closed, Error::NoBoundary);
    }
}
