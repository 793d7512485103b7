#![no_main]
use libfuzzer_sys::fuzz_target;

// NUL-separated argv, so delimiter tokens may contain spaces.
fuzz_target!(|data: &[u8]| {
    let args: Vec<String> = data
        .split(|&b| b == 0)
        .take(16)
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect();
    wrapline::cli::fuzz_try_parse_args(&args);
});
