use ahash::AHashMap;

use crate::chunk::Chunk;
use crate::error::{Error, LineError};
use crate::line::{decode_line, split_line};
use crate::stats::Statistic;

/// Keys borrow from the source region, so a partial map lives no longer than it.
pub type PartialMap<'a> = AHashMap<&'a [u8], Statistic>;

/// Distinct keys expected in a typical input; the map grows past it if needed.
const EXPECTED_KEYS: usize = 10_000;

/// Folds every line of the chunks it is given into a private map.
pub struct Worker<'a> {
    data: &'a [u8],
    stats: PartialMap<'a>,
    lines: u64,
}

impl<'a> Worker<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Worker {
            data,
            stats: AHashMap::with_capacity(EXPECTED_KEYS),
            lines: 0,
        }
    }

    pub fn process(&mut self, chunk: Chunk) -> Result<(), Error> {
        let data = self.data;
        let mut pos = chunk.start;
        while pos < chunk.end {
            let rest = &data[pos..chunk.end];
            let line = decode_line(rest).map_err(|reason| Self::malformed(pos, rest, reason))?;

            match self.stats.get_mut(line.key) {
                Some(stat) => stat.record(line.reading),
                None => {
                    if std::str::from_utf8(line.key).is_err() {
                        return Err(Self::malformed(pos, rest, LineError::InvalidKey));
                    }
                    self.stats.insert(line.key, Statistic::new(line.reading));
                }
            }

            self.lines += 1;
            pos += line.consumed;
        }
        Ok(())
    }

    /// Hands the private map over; the worker is done after this.
    pub fn finish(self) -> PartialMap<'a> {
        tracing::debug!(lines = self.lines, keys = self.stats.len(), "worker finished");
        self.stats
    }

    fn malformed(offset: usize, rest: &[u8], reason: LineError) -> Error {
        Error::malformed(offset, split_line(rest).0, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunks;

    fn whole(data: &[u8]) -> Chunk {
        Chunk {
            start: 0,
            end: data.len(),
        }
    }

    #[test]
    fn folds_readings_per_key() {
        let data = b"Banjul;25.0\nBoston;4.0\nBanjul;5.0\nBanjul;25.0\nBoston;4.0\nBoston;4.0\n";
        let mut worker = Worker::new(data);
        worker.process(whole(data)).unwrap();
        let stats = worker.finish();

        assert_eq!(stats.len(), 2);
        let banjul = stats[&b"Banjul"[..]];
        assert_eq!(banjul.min(), 5.0);
        assert_eq!(banjul.max(), 25.0);
        assert_eq!(banjul.sum(), 55.0);
        assert_eq!(banjul.count(), 3);
        let boston = stats[&b"Boston"[..]];
        assert_eq!(boston.sum_tenths(), 120);
        assert_eq!(boston.count(), 3);
    }

    #[test]
    fn one_worker_can_take_several_chunks() {
        let data = b"a;1.0\nb;2.0\na;-3.0\nc;4.0\n";
        let mut worker = Worker::new(data);
        for chunk in Chunks::with_size(data, 1) {
            worker.process(chunk).unwrap();
        }
        let stats = worker.finish();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[&b"a"[..]].min(), -3.0);
        assert_eq!(stats[&b"a"[..]].count(), 2);
    }

    #[test]
    fn reports_absolute_offset_of_bad_line() {
        let data = b"a;1.0\nb;2.0\ncity;NaN\nd;4.0\n";
        let mut worker = Worker::new(data);
        let err = worker
            .process(Chunk { start: 6, end: data.len() })
            .unwrap_err();
        match err {
            Error::MalformedLine { offset, line, reason } => {
                assert_eq!(offset, 12);
                assert_eq!(line, "city;NaN");
                assert_eq!(reason, LineError::InvalidReading);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_non_utf8_key() {
        let data = b"ok;1.0\n\xff\xfe;2.0\n";
        let mut worker = Worker::new(data);
        let err = worker.process(whole(data)).unwrap_err();
        assert_eq!(err.offset(), Some(7));
        assert!(matches!(
            err,
            Error::MalformedLine {
                reason: LineError::InvalidKey,
                ..
            }
        ));
    }
}
