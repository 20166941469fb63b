use crate::buffer::Residual;
use crate::constants;
use memchr::memmem;

/// Outcome of scanning one chunk for the boundary marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    /// The whole marker was matched. `consumed` bytes of the chunk, up to and
    /// including the marker, were used.
    Found { consumed: usize },
    /// The chunk was used up without a complete match. A partial match may be
    /// held back for the next chunk.
    Pending,
}

/// Incremental matcher for the `\r\n--<boundary>` marker.
///
/// Bytes are handed to the `emit` callback only once they are proven not to
/// belong to a marker. A marker prefix at the tail of a chunk is kept in a
/// bounded [`Residual`] and rescanned together with the head of the next
/// chunk.
pub(crate) struct BoundaryMatcher {
    marker: Box<[u8]>,
    finder: memmem::Finder<'static>,
    residual: Residual,
    window: Vec<u8>,
}

impl BoundaryMatcher {
    pub fn new(boundary: &[u8]) -> Self {
        let marker = constants::boundary_marker(boundary).into_boxed_slice();
        let finder = memmem::Finder::new(&marker[..]).into_owned();
        let residual = Residual::with_capacity(marker.len() - 1);
        let window = Vec::with_capacity(2 * marker.len());

        BoundaryMatcher {
            marker,
            finder,
            residual,
            window,
        }
    }

    /// Drops any pending partial match.
    pub fn reset(&mut self) {
        self.residual.clear();
    }

    /// Acts as if a line break was just seen, so a boundary at the very start
    /// of the stream matches without a leading CRLF.
    pub fn reset_at_line_start(&mut self) {
        self.residual.set(constants::CRLF.as_bytes());
    }

    /// Bytes currently held back as a possible marker prefix.
    #[cfg(test)]
    pub fn held(&self) -> &[u8] {
        self.residual.as_slice()
    }

    /// Scans `chunk`, emitting every byte proven to precede the next marker.
    ///
    /// `emit` is never called with an empty slice.
    pub fn scan<F>(&mut self, chunk: &[u8], mut emit: F) -> crate::Result<Scan>
    where
        F: FnMut(&[u8]) -> crate::Result<()>,
    {
        let marker_len = self.marker.len();

        if !self.residual.is_empty() {
            let held = self.residual.len();
            let take = chunk.len().min(marker_len - 1);

            self.window.clear();
            self.window.extend_from_slice(self.residual.as_slice());
            self.window.extend_from_slice(&chunk[..take]);
            self.residual.clear();

            // Any marker starting inside the held bytes ends inside the window.
            if let Some(idx) = self.finder.find(&self.window) {
                emit_some(&mut emit, &self.window[..idx])?;
                return Ok(Scan::Found {
                    consumed: idx + marker_len - held,
                });
            }

            if take == chunk.len() {
                let keep = partial_suffix_len(&self.window, &self.marker);
                let split = self.window.len() - keep;
                emit_some(&mut emit, &self.window[..split])?;
                self.residual.set(&self.window[split..]);
                return Ok(Scan::Pending);
            }

            emit_some(&mut emit, &self.window[..held])?;
        }

        match self.finder.find(chunk) {
            Some(idx) => {
                emit_some(&mut emit, &chunk[..idx])?;
                Ok(Scan::Found {
                    consumed: idx + marker_len,
                })
            }
            None => {
                let keep = partial_suffix_len(chunk, &self.marker);
                let split = chunk.len() - keep;
                emit_some(&mut emit, &chunk[..split])?;
                self.residual.set(&chunk[split..]);
                Ok(Scan::Pending)
            }
        }
    }
}

fn emit_some<F>(emit: &mut F, data: &[u8]) -> crate::Result<()>
where
    F: FnMut(&[u8]) -> crate::Result<()>,
{
    if data.is_empty() {
        Ok(())
    } else {
        emit(data)
    }
}

/// Length of the longest suffix of `data` that is a proper prefix of `marker`.
fn partial_suffix_len(data: &[u8], marker: &[u8]) -> usize {
    let max = data.len().min(marker.len() - 1);
    let tail = &data[data.len() - max..];

    memchr::memchr_iter(marker[0], tail)
        .map(|idx| tail.len() - idx)
        .find(|&len| tail[tail.len() - len..] == marker[..len])
        .unwrap_or(0)
}
