// Streaming record processor.
//
// Reads separator-terminated records, trims/filters them and writes each
// survivor as `<delim><content><delim>\n`. The loop keeps one record of
// lookahead so it can tell the final record apart from interior ones:
//   - interior records are dropped when empty only if `skip_empty` is set
//   - records still pending at end-of-stream, and an unterminated trailing
//     fragment, are always dropped when empty
// Memory use is bounded by the two longest adjacent records.

use std::io::{BufRead, Write};

use crate::delimiter;
use crate::error::WrapError;
use crate::record::{self, Separator};

/// Default wrap delimiter.
pub const DEFAULT_DELIMITER: &str = "\"";

/// Initial capacity of the reusable record and output buffers.
const INITIAL_RECORD_CAPACITY: usize = 1024;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for one wrapping run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapOptions {
    /// Resolved delimiter written on both sides of each record.
    pub delimiter: String,
    /// Trim leading/trailing whitespace before the emptiness check.
    pub strip: bool,
    /// Drop empty interior records.
    pub skip_empty: bool,
    /// Prefix delimiter occurrences inside a record with a backslash.
    pub escape: bool,
    /// Input record separator.
    pub separator: Separator,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            strip: false,
            skip_empty: false,
            escape: false,
            separator: Separator::Newline,
        }
    }
}

impl WrapOptions {
    /// Default options with the delimiter resolved from a raw token
    /// (see [`delimiter::resolve`]).
    pub fn from_token(token: &str) -> Result<Self, WrapError> {
        Ok(Self {
            delimiter: delimiter::resolve(token)?,
            ..Default::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Counters returned by [`wrap_stream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapStats {
    /// Records segmented from the input, including dropped ones.
    pub records_read: u64,
    /// Records written to the output.
    pub records_emitted: u64,
    /// Records dropped as empty.
    pub records_dropped: u64,
    /// Bytes written to the output.
    pub bytes_written: u64,
}

// ---------------------------------------------------------------------------
// RecordWriter
// ---------------------------------------------------------------------------

/// Where a record sits in the stream, which decides its drop policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Known to be followed by another record.
    Interior,
    /// Final content of the stream.
    Last,
}

/// Applies strip/drop/escape to single records and writes them out.
///
/// Each record is assembled in a reusable buffer and written with one
/// `write_all` call.
pub struct RecordWriter<'a, W: Write> {
    out: W,
    opts: &'a WrapOptions,
    buf: Vec<u8>,
    stats: WrapStats,
}

impl<'a, W: Write> RecordWriter<'a, W> {
    pub fn new(out: W, opts: &'a WrapOptions) -> Self {
        Self {
            out,
            opts,
            buf: Vec::with_capacity(INITIAL_RECORD_CAPACITY),
            stats: WrapStats::default(),
        }
    }

    /// Process one record. Returns `true` if it was written.
    pub fn emit(&mut self, record: &[u8], position: Position) -> Result<bool, WrapError> {
        self.stats.records_read += 1;

        let content = if self.opts.strip {
            record::trim_whitespace(record)
        } else {
            record
        };

        if content.is_empty() && (position == Position::Last || self.opts.skip_empty) {
            log::trace!("dropping empty {position:?} record");
            self.stats.records_dropped += 1;
            return Ok(false);
        }

        let delim = self.opts.delimiter.as_bytes();
        self.buf.clear();
        self.buf.extend_from_slice(delim);
        if self.opts.escape {
            record::escape_into(&mut self.buf, content, delim);
        } else {
            self.buf.extend_from_slice(content);
        }
        self.buf.extend_from_slice(delim);
        self.buf.push(b'\n');

        self.out.write_all(&self.buf)?;
        self.stats.records_emitted += 1;
        self.stats.bytes_written += self.buf.len() as u64;
        Ok(true)
    }

    pub fn stats(&self) -> WrapStats {
        self.stats
    }

    /// Flush the sink and return it with the final counters.
    pub fn finish(mut self) -> Result<(W, WrapStats), WrapError> {
        self.out.flush()?;
        Ok((self.out, self.stats))
    }
}

// ---------------------------------------------------------------------------
// wrap_stream
// ---------------------------------------------------------------------------

/// Wrap every record of `input` into `output`.
///
/// The output is flushed before returning. On error the run stops at once;
/// anything already written stays written.
pub fn wrap_stream<R: BufRead, W: Write>(
    mut input: R,
    output: W,
    opts: &WrapOptions,
) -> Result<WrapStats, WrapError> {
    log::debug!(
        "wrapping: delimiter={:?} strip={} skip_empty={} escape={} separator={:?}",
        opts.delimiter,
        opts.strip,
        opts.skip_empty,
        opts.escape,
        opts.separator
    );

    let sep = opts.separator.byte();
    let mut writer = RecordWriter::new(output, opts);

    let mut current = Vec::with_capacity(INITIAL_RECORD_CAPACITY);
    let mut pending = Vec::with_capacity(INITIAL_RECORD_CAPACITY);
    let mut has_pending = false;

    loop {
        current.clear();
        input.read_until(sep, &mut current)?;

        if current.last() != Some(&sep) {
            // End of stream. `current` is the unterminated tail, possibly empty.
            if has_pending {
                writer.emit(&pending, Position::Last)?;
            }
            if !current.is_empty() {
                writer.emit(&current, Position::Last)?;
            }
            break;
        }
        current.pop();

        if has_pending {
            writer.emit(&pending, Position::Interior)?;
        }
        std::mem::swap(&mut current, &mut pending);
        has_pending = true;
    }

    let (_, stats) = writer.finish()?;
    log::debug!(
        "wrapped {} records ({} dropped), {} bytes written",
        stats.records_emitted,
        stats.records_dropped,
        stats.bytes_written
    );
    Ok(stats)
}

/// Wrap an in-memory buffer.
pub fn wrap_bytes(input: &[u8], opts: &WrapOptions) -> Result<Vec<u8>, WrapError> {
    let mut out = Vec::with_capacity(input.len() + input.len() / 4 + 16);
    wrap_stream(input, &mut out, opts)?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
