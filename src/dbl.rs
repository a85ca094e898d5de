//! Raw `.dbl` streams: headerless sequences of host-order IEEE-754 doubles.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::constants::DOUBLE_BYTES;
use crate::error::Result;

/// Append-only writer of raw doubles
pub struct DoubleWriter<W: Write> {
    writer: W,
    count: u64,
}

impl DoubleWriter<BufWriter<File>> {
    /// Create (or truncate) a file and write doubles to it
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> DoubleWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }

    pub fn write_sample(&mut self, value: f64) -> Result<()> {
        self.writer.write_all(&value.to_ne_bytes())?;
        self.count += 1;
        Ok(())
    }

    pub fn write_all(&mut self, values: &[f64]) -> Result<()> {
        for &value in values {
            self.write_sample(value)?;
        }
        Ok(())
    }

    /// Values written so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write `values` to `path` as a raw double stream
pub fn write_doubles<P: AsRef<Path>>(path: P, values: &[f64]) -> Result<()> {
    let mut writer = DoubleWriter::create(path)?;
    writer.write_all(values)?;
    writer.finish()?;
    Ok(())
}

/// Read a whole raw double stream
///
/// # Errors
/// Returns an `InvalidData` I/O error if the length is not a whole number
/// of doubles
pub fn read_doubles<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    decode_doubles(&bytes)
}

fn decode_doubles(bytes: &[u8]) -> Result<Vec<f64>> {
    if !bytes.len().is_multiple_of(DOUBLE_BYTES) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "stream length {} is not a multiple of {} bytes",
                bytes.len(),
                DOUBLE_BYTES
            ),
        )
        .into());
    }

    Ok(bytes
        .chunks_exact(DOUBLE_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; DOUBLE_BYTES];
            raw.copy_from_slice(chunk);
            f64::from_ne_bytes(raw)
        })
        .collect())
}
