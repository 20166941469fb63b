/// Fixed-capacity holding area for the bytes of a pending partial boundary
/// match.
///
/// The capacity is decided once, from the marker length, and never grows: a
/// partial match is always shorter than the marker itself.
#[derive(Debug)]
pub(crate) struct Residual {
    buf: Box<[u8]>,
    len: usize,
}

impl Residual {
    pub fn with_capacity(capacity: usize) -> Self {
        Residual {
            buf: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Replaces the held bytes. `bytes` must fit into the fixed capacity.
    pub fn set(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.capacity());
        self.buf[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
    }
}
