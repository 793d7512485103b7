// File-level helpers around the streaming processor.
//
// `wrap_file()` opens an input/output pair with 64 KiB buffered I/O and
// runs `wrap_stream()` over it. The output file is created or truncated.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::WrapError;
use crate::wrap::{self, WrapOptions, WrapStats};

/// Buffer size for file readers and writers.
pub const BUF_SIZE: usize = 64 * 1024;

/// Wrap every record of `input_path` into `output_path`.
pub fn wrap_file(
    input_path: &Path,
    output_path: &Path,
    opts: &WrapOptions,
) -> Result<WrapStats, WrapError> {
    let input = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let output = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    wrap::wrap_stream(input, output, opts)
}
