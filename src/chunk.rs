use memchr::memchr;

/// A line-aligned `[start, end)` byte range of the source region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lazily cuts `data` into chunks of roughly `size` bytes, each ending just
/// after a `\n` or at the end of `data`.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    data: &'a [u8],
    size: usize,
    pos: usize,
}

impl<'a> Chunks<'a> {
    pub fn with_size(data: &'a [u8], size: usize) -> Self {
        Chunks {
            data,
            size: size.max(1),
            pos: 0,
        }
    }

    /// At most `workers` chunks of about `len / workers` bytes each.
    pub fn per_worker(data: &'a [u8], workers: usize) -> Self {
        Self::with_size(data, data.len().div_ceil(workers.max(1)))
    }
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let len = self.data.len();
        if self.pos >= len {
            return None;
        }

        let start = self.pos;
        let tentative = start + self.size;
        let end = if tentative >= len {
            len
        } else {
            // Search from the byte before the tentative cut so a boundary that
            // already sits right after a terminator is kept as is.
            let from = tentative - 1;
            match memchr(b'\n', &self.data[from..]) {
                Some(off) => from + off + 1,
                None => len,
            }
        };

        self.pos = end;
        Some(Chunk { start, end })
    }
}
