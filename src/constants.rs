pub(crate) const DEFAULT_WHOLE_STREAM_SIZE_LIMIT: u64 = std::u64::MAX;
pub(crate) const DEFAULT_PER_FIELD_SIZE_LIMIT: u64 = std::u64::MAX;
pub(crate) const DEFAULT_HEADER_LINE_SIZE_LIMIT: usize = 8 * 1024;

pub(crate) const MAX_HEADERS: usize = 32;
pub(crate) const BOUNDARY_EXT: &str = "--";
pub(crate) const CRLF: &str = "\r\n";

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
pub(crate) const HYPHEN: u8 = b'-';

/// Builds the marker scanned for in the stream: `\r\n--<boundary>`.
pub(crate) fn boundary_marker(boundary: &[u8]) -> Vec<u8> {
    let mut marker = Vec::with_capacity(CRLF.len() + BOUNDARY_EXT.len() + boundary.len());
    marker.extend_from_slice(CRLF.as_bytes());
    marker.extend_from_slice(BOUNDARY_EXT.as_bytes());
    marker.extend_from_slice(boundary);
    marker
}
