use crate::Field;

/// Receives the parts of a multipart body as the parser discovers them.
///
/// For every part the callbacks fire in the order `on_field_start`, zero or
/// more `on_field_data`, then `on_field_end`, and parts never interleave. All
/// callbacks run synchronously inside
/// [`MultipartParser::feed`](crate::MultipartParser::feed).
pub trait Handler {
    /// A part's header block was read completely.
    fn on_field_start(&mut self, field: Field);

    /// The next slice of the current part's data. Never empty.
    ///
    /// Concatenating every slice of a part yields its exact value.
    fn on_field_data(&mut self, data: &[u8]);

    /// The current part's closing boundary was found.
    fn on_field_end(&mut self);
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_field_start(&mut self, field: Field) {
        (**self).on_field_start(field)
    }

    fn on_field_data(&mut self, data: &[u8]) {
        (**self).on_field_data(data)
    }

    fn on_field_end(&mut self) {
        (**self).on_field_end()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn on_field_start(&mut self, field: Field) {
        (**self).on_field_start(field)
    }

    fn on_field_data(&mut self, data: &[u8]) {
        (**self).on_field_data(data)
    }

    fn on_field_end(&mut self) {
        (**self).on_field_end()
    }
}

/// A [`Handler`] made of three closures.
///
/// # Examples
///
/// ```
/// use multipart_feed::{Callbacks, Field, MultipartParser};
///
/// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
///
/// let mut value = Vec::new();
/// let mut ended = 0;
///
/// let handler = Callbacks::new(
///     |field: Field| assert_eq!(field.name(), "my_text_field"),
///     |data: &[u8]| value.extend_from_slice(data),
///     || ended += 1,
/// );
///
/// let mut parser = MultipartParser::new("X-BOUNDARY", handler).unwrap();
/// parser.feed(data.as_bytes()).unwrap();
/// drop(parser);
///
/// assert_eq!(value, b"abcd");
/// assert_eq!(ended, 1);
/// ```
pub struct Callbacks<S, D, E> {
    on_field_start: S,
    on_field_data: D,
    on_field_end: E,
}

impl<S, D, E> Callbacks<S, D, E>
where
    S: FnMut(Field),
    D: FnMut(&[u8]),
    E: FnMut(),
{
    /// Bundles the three callbacks into a [`Handler`].
    pub fn new(on_field_start: S, on_field_data: D, on_field_end: E) -> Self {
        Callbacks {
            on_field_start,
            on_field_data,
            on_field_end,
        }
    }
}

impl<S, D, E> Handler for Callbacks<S, D, E>
where
    S: FnMut(Field),
    D: FnMut(&[u8]),
    E: FnMut(),
{
    fn on_field_start(&mut self, field: Field) {
        (self.on_field_start)(field)
    }

    fn on_field_data(&mut self, data: &[u8]) {
        (self.on_field_data)(data)
    }

    fn on_field_end(&mut self) {
        (self.on_field_end)()
    }
}
