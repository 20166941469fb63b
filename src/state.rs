use crate::field::FieldHeaders;
use bytes::BytesMut;

/// The externally visible phase of a [`MultipartParser`](crate::MultipartParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Discarding bytes until the first boundary.
    Preamble,
    /// Reading the boundary line after a part, or the header block of the
    /// next one.
    Headers,
    /// Streaming the data of a part.
    Body,
    /// The terminal boundary has been seen. Only the rest of its line is
    /// still accepted.
    Terminated,
    /// The parser finished or failed and must be discarded.
    Closed,
}

#[derive(Debug)]
pub(crate) struct ParserState {
    pub(crate) stage: StreamingStage,
    pub(crate) line: BytesMut,
    pub(crate) headers: FieldHeaders,
    pub(crate) completed: bool,
    pub(crate) next_field_idx: usize,
    pub(crate) curr_field_name: Option<String>,
    pub(crate) curr_field_size_limit: u64,
    pub(crate) curr_field_size_counter: u64,
    pub(crate) stream_size_counter: u64,
}

impl ParserState {
    pub(crate) fn new() -> Self {
        ParserState {
            stage: StreamingStage::FindingFirstBoundary,
            line: BytesMut::new(),
            headers: FieldHeaders::default(),
            completed: false,
            next_field_idx: 0,
            curr_field_name: None,
            curr_field_size_limit: 0,
            curr_field_size_counter: 0,
            stream_size_counter: 0,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        match self.stage {
            StreamingStage::FindingFirstBoundary => Phase::Preamble,
            StreamingStage::DeterminingBoundaryType(_) if self.completed => Phase::Terminated,
            StreamingStage::DeterminingBoundaryType(_) if self.next_field_idx == 0 => Phase::Preamble,
            // The previous part already ended with its marker.
            StreamingStage::DeterminingBoundaryType(_) => Phase::Headers,
            StreamingStage::ReadingFieldHeaders => Phase::Headers,
            StreamingStage::ReadingFieldData => Phase::Body,
            StreamingStage::Terminated => Phase::Terminated,
            StreamingStage::Closed => Phase::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreamingStage {
    FindingFirstBoundary,
    DeterminingBoundaryType(Delimiter),
    ReadingFieldHeaders,
    ReadingFieldData,
    Terminated,
    Closed,
}

/// Progress through the bytes that follow a matched boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Start,
    Hyphen,
    TransportPadding,
    CarriageReturn,
    /// After `--<boundary>--`, up to the end of that line.
    Closing,
    ClosingCarriageReturn,
}
