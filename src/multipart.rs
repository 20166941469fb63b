use crate::boundary::{BoundaryMatcher, Scan};
use crate::constants;
use crate::constraints::Constraints;
use crate::handler::Handler;
use crate::state::{Delimiter, ParserState, Phase, StreamingStage};
use memchr::memchr;

/// An incremental parser for `multipart/form-data` bodies.
///
/// The body is pushed in through [`feed`](MultipartParser::feed) in chunks of
/// any size, down to a single byte. As soon as enough bytes have arrived the
/// parser reports each part to its [`Handler`]. Only a bounded amount of data
/// is held between calls: a possible boundary prefix and the header line being
/// read.
///
/// # Examples
///
/// ```
/// use multipart_feed::{FormCollector, MultipartParser};
///
/// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
///
/// let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
///
/// for chunk in data.as_bytes().chunks(7) {
///     parser.feed(chunk).unwrap();
/// }
/// parser.finish().unwrap();
///
/// let form = parser.into_handler();
/// assert_eq!(form.get("my_text_field").unwrap().text(), "abcd");
/// ```
pub struct MultipartParser<H> {
    handler: H,
    matcher: BoundaryMatcher,
    state: ParserState,
    constraints: Constraints,
}

impl<H: Handler> MultipartParser<H> {
    /// Constructs a new parser for the given boundary, as found in the
    /// `boundary=` parameter of the `Content-Type` header (without the leading
    /// `--`).
    pub fn new<B: Into<Vec<u8>>>(boundary: B, handler: H) -> crate::Result<MultipartParser<H>> {
        MultipartParser::with_constraints(boundary, handler, Constraints::default())
    }

    /// Constructs a new parser that enforces the given
    /// [`Constraints`](crate::Constraints).
    pub fn with_constraints<B: Into<Vec<u8>>>(
        boundary: B,
        handler: H,
        constraints: Constraints,
    ) -> crate::Result<MultipartParser<H>> {
        let boundary = boundary.into();

        if boundary.is_empty() {
            return Err(crate::Error::InvalidBoundary("boundary is empty"));
        }

        if boundary.iter().any(|&b| b == constants::CR || b == constants::LF) {
            return Err(crate::Error::InvalidBoundary("boundary contains a line break"));
        }

        let mut matcher = BoundaryMatcher::new(&boundary);
        matcher.reset_at_line_start();

        Ok(MultipartParser {
            handler,
            matcher,
            state: ParserState::new(),
            constraints,
        })
    }

    /// Feeds the next chunk of the body.
    ///
    /// All callbacks the chunk makes possible fire before this returns. Data
    /// that might still turn out to be part of a boundary is held back until
    /// a later chunk decides it.
    ///
    /// Any error closes the parser. The line that carries the terminal
    /// boundary is still accepted, even when its line break arrives in a later
    /// chunk. Once that line is complete, or an error occurred, every call
    /// fails with [`Error::Closed`](crate::Error::Closed) without touching the
    /// chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> crate::Result<()> {
        match self.state.stage {
            StreamingStage::Closed => return Err(crate::Error::Closed),
            StreamingStage::Terminated => {
                self.state.stage = StreamingStage::Closed;
                return Err(crate::Error::Closed);
            }
            _ => {}
        }

        self.state.stream_size_counter += chunk.len() as u64;

        let limit = self.constraints.size_limit.whole_stream;
        if self.state.stream_size_counter > limit {
            return self.fail(crate::Error::StreamSizeExceeded { limit });
        }

        let mut rest = chunk;

        while !rest.is_empty() {
            let consumed = match self.step(rest) {
                Ok(consumed) => consumed,
                Err(err) => return self.fail(err),
            };

            rest = &rest[consumed..];

            if self.state.stage == StreamingStage::Terminated {
                if !rest.is_empty() {
                    trace!("discarding {} bytes of epilogue", rest.len());
                }
                break;
            }
        }

        Ok(())
    }

    /// Signals that the body has ended.
    ///
    /// Succeeds only if the terminal boundary has been seen. Otherwise the
    /// body was cut short and an error tells where: no boundary at all, or an
    /// unfinished part. The parser is closed afterwards.
    pub fn finish(&mut self) -> crate::Result<()> {
        let stage = std::mem::replace(&mut self.state.stage, StreamingStage::Closed);

        match stage {
            StreamingStage::Terminated => Ok(()),
            StreamingStage::Closed if self.state.completed => Ok(()),
            StreamingStage::Closed => Err(crate::Error::Closed),
            StreamingStage::FindingFirstBoundary => Err(crate::Error::BoundaryMismatch {
                reason: "no boundary found before end of input",
            }),
            StreamingStage::DeterminingBoundaryType(_) if self.state.completed => Ok(()),
            StreamingStage::DeterminingBoundaryType(_) if self.state.next_field_idx == 0 => {
                Err(crate::Error::BoundaryMismatch {
                    reason: "first boundary line is incomplete",
                })
            }
            StreamingStage::DeterminingBoundaryType(_)
            | StreamingStage::ReadingFieldHeaders
            | StreamingStage::ReadingFieldData => {
                debug!("input ended inside field #{}", self.state.next_field_idx);
                Err(crate::Error::UnterminatedPart {
                    field_name: self.state.curr_field_name.take(),
                })
            }
        }
    }

    /// The phase the parser is currently in.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Returns `true` once the terminal boundary has been seen.
    pub fn is_terminated(&self) -> bool {
        self.state.completed
    }

    /// A shared reference to the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// A mutable reference to the handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consumes the parser and returns its handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    pub(crate) fn close(&mut self) {
        self.state.stage = StreamingStage::Closed;
    }

    fn fail(&mut self, err: crate::Error) -> crate::Result<()> {
        debug!("closing multipart parser: {}", err);
        self.close();
        Err(err)
    }

    fn step(&mut self, chunk: &[u8]) -> crate::Result<usize> {
        match self.state.stage {
            StreamingStage::FindingFirstBoundary => self.read_preamble(chunk),
            StreamingStage::DeterminingBoundaryType(delimiter) => self.read_delimiter(delimiter, chunk),
            StreamingStage::ReadingFieldHeaders => self.read_headers(chunk),
            StreamingStage::ReadingFieldData => self.read_body(chunk),
            StreamingStage::Terminated | StreamingStage::Closed => Ok(chunk.len()),
        }
    }

    fn read_preamble(&mut self, chunk: &[u8]) -> crate::Result<usize> {
        match self.matcher.scan(chunk, |_preamble| Ok(()))? {
            Scan::Found { consumed } => {
                trace!("first boundary found");
                self.state.stage = StreamingStage::DeterminingBoundaryType(Delimiter::Start);
                Ok(consumed)
            }
            Scan::Pending => Ok(chunk.len()),
        }
    }

    fn read_delimiter(&mut self, mut delimiter: Delimiter, chunk: &[u8]) -> crate::Result<usize> {
        for (idx, &byte) in chunk.iter().enumerate() {
            delimiter = match (delimiter, byte) {
                (Delimiter::Start, constants::HYPHEN) => Delimiter::Hyphen,
                (Delimiter::Hyphen, constants::HYPHEN) => {
                    debug!("terminal boundary found after {} fields", self.state.next_field_idx);
                    self.state.completed = true;
                    Delimiter::Closing
                }
                (Delimiter::Closing, b' ') | (Delimiter::Closing, b'\t') => Delimiter::Closing,
                (Delimiter::Closing, constants::CR) => Delimiter::ClosingCarriageReturn,
                (Delimiter::ClosingCarriageReturn, constants::LF) => {
                    self.state.stage = StreamingStage::Terminated;
                    return Ok(idx + 1);
                }
                // No line break after the closing delimiter; the rest is epilogue.
                (Delimiter::Closing, _) | (Delimiter::ClosingCarriageReturn, _) => {
                    self.state.stage = StreamingStage::Terminated;
                    return Ok(idx);
                }
                (Delimiter::Start, b' ') | (Delimiter::Start, b'\t') => Delimiter::TransportPadding,
                (Delimiter::TransportPadding, b' ') | (Delimiter::TransportPadding, b'\t') => {
                    Delimiter::TransportPadding
                }
                (Delimiter::Start, constants::CR) | (Delimiter::TransportPadding, constants::CR) => {
                    Delimiter::CarriageReturn
                }
                (Delimiter::CarriageReturn, constants::LF) => {
                    self.begin_headers();
                    return Ok(idx + 1);
                }
                _ => {
                    let reason = if self.state.next_field_idx == 0 {
                        "first boundary line is malformed"
                    } else {
                        "boundary delimiter line is malformed"
                    };
                    return Err(crate::Error::BoundaryMismatch { reason });
                }
            };
        }

        self.state.stage = StreamingStage::DeterminingBoundaryType(delimiter);
        Ok(chunk.len())
    }

    fn begin_headers(&mut self) {
        debug!("reading headers of field #{}", self.state.next_field_idx);
        self.state.line.clear();
        self.state.headers = Default::default();
        self.state.stage = StreamingStage::ReadingFieldHeaders;
    }

    fn read_headers(&mut self, chunk: &[u8]) -> crate::Result<usize> {
        let limit = self.constraints.size_limit.header_line;

        let (taken, consumed) = match memchr(constants::LF, chunk) {
            Some(idx) => (idx, idx + 1),
            None => (chunk.len(), chunk.len()),
        };

        if self.state.line.len() + taken > limit {
            return Err(crate::Error::FieldHeadersTooLarge { limit });
        }

        self.state.line.extend_from_slice(&chunk[..taken]);

        if taken == consumed {
            return Ok(consumed);
        }

        let line = self.state.line.split().freeze();
        let line = crate::helpers::trim_line_end(&line);

        if line.is_empty() {
            self.start_field()?;
        } else {
            let limit = self.constraints.max_headers;
            if self.state.headers.lines() >= limit {
                return Err(crate::Error::TooManyHeaders { limit });
            }
            self.state.headers.push_line(line)?;
        }

        Ok(consumed)
    }

    fn start_field(&mut self) -> crate::Result<()> {
        let headers = std::mem::take(&mut self.state.headers);
        let field = headers.into_field(self.state.next_field_idx)?;

        if !self.constraints.is_it_allowed(field.name()) {
            return Err(crate::Error::UnknownField {
                field_name: field.name().to_owned(),
            });
        }

        debug!(
            "field #{} started: name={:?} file_name={:?}",
            field.index(),
            field.name(),
            field.file_name()
        );

        self.state.next_field_idx += 1;
        self.state.curr_field_name = Some(field.name().to_owned());
        self.state.curr_field_size_limit = self.constraints.size_limit.extract_size_limit_for(field.name());
        self.state.curr_field_size_counter = 0;
        self.state.stage = StreamingStage::ReadingFieldData;
        self.matcher.reset();

        self.handler.on_field_start(field);
        Ok(())
    }

    fn read_body(&mut self, chunk: &[u8]) -> crate::Result<usize> {
        let handler = &mut self.handler;
        let state = &mut self.state;

        let scan = self.matcher.scan(chunk, |data| {
            state.curr_field_size_counter += data.len() as u64;

            if state.curr_field_size_counter > state.curr_field_size_limit {
                return Err(crate::Error::FieldSizeExceeded {
                    limit: state.curr_field_size_limit,
                    field_name: state.curr_field_name.clone().unwrap_or_default(),
                });
            }

            handler.on_field_data(data);
            Ok(())
        })?;

        match scan {
            Scan::Found { consumed } => {
                trace!(
                    "field {:?} ended after {} bytes",
                    self.state.curr_field_name,
                    self.state.curr_field_size_counter
                );
                self.state.curr_field_name = None;
                self.state.stage = StreamingStage::DeterminingBoundaryType(Delimiter::Start);
                self.handler.on_field_end();
                Ok(consumed)
            }
            Scan::Pending => Ok(chunk.len()),
        }
    }
}
