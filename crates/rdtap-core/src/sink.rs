//! Output sinks for completed rounds.
//!
//! A sink only ever sees whole rounds: the scheduler forwards a round's
//! words in one [`WordSink::accept`] call, or not at all.
//!
//! # Binary format
//!
//! A flat sequence of 8-byte words in native byte order, appended in draw
//! order across all successful rounds. No header, no length prefix, no
//! checksum.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::error::TapError;

/// Destination for successfully drawn words.
pub trait WordSink {
    /// Accept one complete round.
    fn accept(&mut self, words: &[u64]) -> io::Result<()>;

    /// Flush anything buffered. Called once after the last round.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: WordSink + ?Sized> WordSink for &mut S {
    fn accept(&mut self, words: &[u64]) -> io::Result<()> {
        (**self).accept(words)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

impl<S: WordSink + ?Sized> WordSink for Box<S> {
    fn accept(&mut self, words: &[u64]) -> io::Result<()> {
        (**self).accept(words)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

/// In-memory sink.
impl WordSink for Vec<u64> {
    fn accept(&mut self, words: &[u64]) -> io::Result<()> {
        self.extend_from_slice(words);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Binary sink
// ---------------------------------------------------------------------------

/// Raw native-endian dump.
pub struct BinarySink<W: Write> {
    out: W,
    words_written: u64,
}

impl BinarySink<BufWriter<File>> {
    /// Create (or truncate) `path` for writing.
    pub fn create(path: &Path) -> Result<Self, TapError> {
        let file = File::create(path).map_err(|source| TapError::OpenOutput {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("opened binary output {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> BinarySink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            words_written: 0,
        }
    }

    pub fn words_written(&self) -> u64 {
        self.words_written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> WordSink for BinarySink<W> {
    fn accept(&mut self, words: &[u64]) -> io::Result<()> {
        for word in words {
            self.out.write_all(&word.to_ne_bytes())?;
        }
        self.words_written += words.len() as u64;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Read a binary dump back as native-endian words.
///
/// Fails with `InvalidData` if the file length is not a multiple of 8.
pub fn read_binary_words(path: &Path) -> io::Result<Vec<u64>> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    if bytes.len() % 8 != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} bytes is not a whole number of words", bytes.len()),
        ));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|c| u64::from_ne_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect())
}

// ---------------------------------------------------------------------------
// Console sink
// ---------------------------------------------------------------------------

/// Human-readable hex output.
///
/// Each round prints `{label} successful: {n}` followed by the words in
/// lowercase hex, one per line, without zero padding.
pub struct ConsoleSink<W: Write> {
    out: W,
    label: &'static str,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, label: &'static str) -> Self {
        Self { out, label }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> WordSink for ConsoleSink<W> {
    fn accept(&mut self, words: &[u64]) -> io::Result<()> {
        writeln!(self.out, "{} successful: {}", self.label, words.len())?;
        for word in words {
            writeln!(self.out, "{word:x}")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
