#![no_main]
use libfuzzer_sys::fuzz_target;
use wrapline::record::Separator;
use wrapline::wrap::{WrapOptions, wrap_bytes};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte: option flags. Second byte: delimiter length.
    let flags = data[0];
    let delim_len = (data[1] as usize % 4).min(data.len() - 2);
    let delimiter = String::from_utf8_lossy(&data[2..2 + delim_len]).into_owned();
    let input = &data[2 + delim_len..];

    let opts = WrapOptions {
        delimiter,
        strip: flags & 1 != 0,
        skip_empty: flags & 2 != 0,
        escape: flags & 4 != 0,
        separator: if flags & 8 != 0 {
            Separator::Nul
        } else {
            Separator::Newline
        },
    };

    let out = wrap_bytes(input, &opts).unwrap();

    // Output is newline-terminated and bounded by input + framing + escapes.
    if !out.is_empty() {
        assert_eq!(out.last(), Some(&b'\n'));
    }
    let records = input.iter().filter(|&&b| b == opts.separator.byte()).count() + 1;
    let d = opts.delimiter.len();
    let escape_growth = if opts.escape { input.len() } else { 0 };
    assert!(out.len() <= input.len() + records * (2 * d + 1) + escape_growth);
});
