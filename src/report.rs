//! Presentation of a finished [`Measurements`] map as
//! `{key=min/avg/max,...}`, sorted by key.

use std::io::{self, Write};

use crate::reading::Reading;
use crate::reduce::Measurements;

pub fn write_report<W: Write>(out: &mut W, measurements: &Measurements) -> io::Result<()> {
    let mut buf = [0u8; lexical_core::BUFFER_SIZE];

    out.write_all(b"{")?;
    for (idx, (key, stat)) in measurements.sorted().into_iter().enumerate() {
        if idx > 0 {
            out.write_all(b",")?;
        }
        out.write_all(key.as_bytes())?;
        out.write_all(b"=")?;
        write_reading(out, &mut buf, stat.min_reading())?;
        out.write_all(b"/")?;
        out.write_all(lexical_core::write(stat.average(), &mut buf))?;
        out.write_all(b"/")?;
        write_reading(out, &mut buf, stat.max_reading())?;
    }
    out.write_all(b"}\n")
}

fn write_reading<W: Write>(out: &mut W, buf: &mut [u8], reading: Reading) -> io::Result<()> {
    let tenths = reading.tenths();
    if tenths < 0 {
        out.write_all(b"-")?;
    }
    let abs = tenths.unsigned_abs();
    out.write_all(lexical_core::write(abs / 10, buf))?;
    out.write_all(&[b'.', b'0' + (abs % 10) as u8])
}
