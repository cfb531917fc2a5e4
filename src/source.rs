use std::fs::File;
use std::io;
use std::ops::Deref;

use memmap2::Mmap;

use crate::error::Error;

/// Read-only view over a whole file. The mapping is released on drop.
#[derive(Debug)]
pub struct SourceRegion {
    // `None` for empty files, which cannot be mapped.
    map: Option<Mmap>,
}

impl SourceRegion {
    pub fn map(file: &File) -> Result<Self, Error> {
        let metadata = file.metadata().map_err(Error::Mapping)?;
        if !metadata.is_file() {
            return Err(Error::Mapping(io::Error::new(
                io::ErrorKind::InvalidInput,
                "input is not a regular file",
            )));
        }
        if metadata.len() == 0 {
            return Ok(SourceRegion { map: None });
        }

        // SAFETY: the mapping is read-only and the file is assumed not to be
        // truncated or rewritten while it is being aggregated.
        let map = unsafe { Mmap::map(file) }.map_err(Error::Mapping)?;

        advise_sequential(&map);
        tracing::info!(bytes = map.len(), "mapped source region");
        Ok(SourceRegion { map: Some(map) })
    }

    pub fn bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}

#[cfg(unix)]
fn advise_sequential(map: &Mmap) {
    if let Err(err) = map.advise(memmap2::Advice::Sequential) {
        tracing::warn!(%err, "madvise(sequential) failed");
    }
}

#[cfg(not(unix))]
fn advise_sequential(_map: &Mmap) {}

impl Deref for SourceRegion {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes()
    }
}

impl Drop for SourceRegion {
    fn drop(&mut self) {
        if let Some(map) = &self.map {
            tracing::trace!(bytes = map.len(), "releasing source region");
        }
    }
}
