//! An incremental, push-based parser for `multipart/form-data` content.
//!
//! The body is handed to a [`MultipartParser`] in chunks of any size through
//! [`feed`](MultipartParser::feed). As a side effect the parser calls a
//! [`Handler`] for every part it finds: `on_field_start` with the part's
//! [`Field`] descriptor, `on_field_data` with its bytes and `on_field_end` once
//! its closing boundary has been seen. Nothing but a possible boundary prefix
//! and the header line being read is kept between calls, so memory use does
//! not depend on the payload size.
//!
//! # Examples
//!
//! ```
//! use multipart_feed::{Field, Handler, MultipartParser};
//!
//! #[derive(Default)]
//! struct Sizes(Vec<(String, usize)>);
//!
//! impl Handler for Sizes {
//!     fn on_field_start(&mut self, field: Field) {
//!         self.0.push((field.name().to_owned(), 0));
//!     }
//!
//!     fn on_field_data(&mut self, data: &[u8]) {
//!         if let Some((_, size)) = self.0.last_mut() {
//!             *size += data.len();
//!         }
//!     }
//!
//!     fn on_field_end(&mut self) {}
//! }
//!
//! # fn run() -> multipart_feed::Result<()> {
//! let content_type = "multipart/form-data; boundary=X-BOUNDARY";
//! let body = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";
//!
//! let boundary = multipart_feed::parse_boundary(content_type)?;
//! let mut parser = MultipartParser::new(boundary, Sizes::default())?;
//!
//! // Feed one byte at a time, as a slow client would deliver it.
//! for byte in body.as_bytes().chunks(1) {
//!     parser.feed(byte)?;
//! }
//! parser.finish()?;
//!
//! let sizes = parser.into_handler().0;
//! assert_eq!(sizes, vec![("My Field".to_owned(), 4), ("File Field".to_owned(), 30)]);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! # Optional features
//!
//! - `json`: adds `CollectedField::json`.
//! - `tokio-io`: adds `MultipartParser::feed_reader` for tokio readers.
//! - `log`: emits parser diagnostics through the [`log`](https://docs.rs/log) crate.

macro_rules! trace {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        {
            log::trace!($($arg)+);
        }
    };
}

macro_rules! debug {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        {
            log::debug!($($arg)+);
        }
    };
}

pub use bytes;

pub use collect::{CollectedField, FormCollector};
pub use constraints::Constraints;
pub use error::Error;
pub use field::Field;
pub use handler::{Callbacks, Handler};
pub use multipart::MultipartParser;
pub use size_limit::SizeLimit;
pub use state::Phase;

mod boundary;
mod buffer;
mod collect;
mod constants;
mod constraints;
mod content_disposition;
mod error;
mod field;
mod handler;
mod helpers;
mod multipart;
mod size_limit;
mod state;
mod stream;

/// A Result type often returned from methods that can have `multipart-feed`
/// errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses the `Content-Type` header to extract the boundary value.
///
/// # Examples
///
/// ```
/// let content_type = "multipart/form-data; boundary=ABCDEFG";
///
/// assert_eq!(multipart_feed::parse_boundary(content_type), Ok("ABCDEFG".to_owned()));
/// ```
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(Error::DecodeContentType)?;

    if !(m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA) {
        return Err(Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(Error::NoBoundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boundary() {
        let content_type = "multipart/form-data; boundary=ABCDEFG";
        assert_eq!(parse_boundary(content_type), Ok("ABCDEFG".to_owned()));

        let content_type = "multipart/form-data; boundary=------ABCDEFG";
        assert_eq!(parse_boundary(content_type), Ok("------ABCDEFG".to_owned()));

        let content_type = "boundary=------ABCDEFG";
        assert!(parse_boundary(content_type).is_err());

        let content_type = "text/plain";
        assert_eq!(parse_boundary(content_type), Err(Error::NoMultipart));

        let content_type = "text/plain; boundary=------ABCDEFG";
        assert_eq!(parse_boundary(content_type), Err(Error::NoMultipart));

        let content_type = "multipart/form-data";
        assert_eq!(parse_boundary(content_type), Err(Error::NoBoundary));
    }
}
