// Command-line front end for wrapline.
//
// Reads a file or STDIN, wraps each record and writes to STDOUT or a
// file given with `-o`. All record semantics live in `crate::wrap`.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueHint};

use crate::delimiter;
use crate::record::Separator;
use crate::wrap::{self, DEFAULT_DELIMITER, WrapOptions, WrapStats};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const PGM_NAME: &str = "wrapline";
const PGM_VERSION: &str = env!("CARGO_PKG_VERSION");
const PGM_URL: &str = env!("CARGO_PKG_REPOSITORY");

const BUF_SIZE: usize = crate::io::BUF_SIZE;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Wrap each line of a file or STDIN with a delimiter.
#[derive(Parser, Debug)]
#[command(name = "wrapline", disable_version_flag = true)]
struct Cli {
    /// Show version and exit.
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Delimiter to wrap lines with (or hex code point with 0x prefix).
    #[arg(short = 'd', long, default_value = DEFAULT_DELIMITER, allow_hyphen_values = true)]
    delimiter: String,

    /// Strip whitespace from lines before wrapping.
    #[arg(short = 's', long)]
    strip: bool,

    /// Do not emit empty lines.
    #[arg(short = 'e', long = "skip-empty")]
    skip_empty: bool,

    /// Escape delimiter characters within lines.
    #[arg(long)]
    escape: bool,

    /// Read null-terminated records instead of newlines.
    #[arg(short = '0', long = "null")]
    null_terminated: bool,

    /// Output file (default: STDOUT).
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Verbose logging to stderr (use multiple times for more detail).
    #[arg(long, action = ArgAction::Count)]
    verbose: u8,

    /// Output run statistics as JSON to stderr.
    #[arg(long = "json")]
    json_output: bool,

    /// Input file, or '-' for STDIN.
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSource {
    Stdin,
    File(PathBuf),
}

struct Options {
    show_version: bool,
    delimiter_token: String,
    strip: bool,
    skip_empty: bool,
    escape: bool,
    separator: Separator,
    input: Option<PathBuf>,
    output_file: Option<PathBuf>,
    verbose: u8,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    Options {
        show_version: cli.version,
        delimiter_token: cli.delimiter,
        strip: cli.strip,
        skip_empty: cli.skip_empty,
        escape: cli.escape,
        separator: if cli.null_terminated {
            Separator::Nul
        } else {
            Separator::Newline
        },
        input: cli.input,
        output_file: cli.output,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
    }
}

/// Pick the input: an explicit path (`-` meaning STDIN), or STDIN when
/// data is piped in.
fn select_input(arg: Option<PathBuf>, stdin_is_terminal: bool) -> Result<InputSource, String> {
    match arg {
        Some(path) if path.as_os_str() == "-" => Ok(InputSource::Stdin),
        Some(path) => Ok(InputSource::File(path)),
        None if !stdin_is_terminal => Ok(InputSource::Stdin),
        None => Err("exactly one filename (or '-' for STDIN) required".to_string()),
    }
}

/// Rewrite the single-dash `-escape` spelling to `--escape`.
///
/// Values of `-d`/`-o` (also at the end of a short-flag cluster such as
/// `-sd`) and everything after `--` pass through untouched, so `-d -escape`
/// still sets a literal delimiter.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut takes_value = false;
    let mut positional_only = false;

    for arg in args {
        let arg = arg.into();
        if positional_only || takes_value {
            takes_value = false;
            out.push(arg);
            continue;
        }
        match arg.to_str() {
            Some("--") => positional_only = true,
            Some("-escape") => {
                out.push(OsString::from("--escape"));
                continue;
            }
            Some("--delimiter" | "--output") => takes_value = true,
            Some(s) if s.starts_with('-') && !s.starts_with("--") => {
                // A cluster of boolean shorts ending in `d` or `o`.
                takes_value = match s[1..].split_at_checked(s.len().saturating_sub(2)) {
                    Some((flags, "d" | "o")) => flags.chars().all(|c| "se0v".contains(c)),
                    _ => false,
                };
            }
            _ => {}
        }
        out.push(arg);
    }
    out
}

fn version_banner(name: &str, version: &str, url: &str) -> String {
    format!("{name} v{version}\n{url}")
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once(PGM_NAME.to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(normalize_args(argv)) {
        let opts = resolve_options(cli);
        let _ = delimiter::resolve(&opts.delimiter_token);
    }
}

// ---------------------------------------------------------------------------
// Wrap command
// ---------------------------------------------------------------------------

fn cmd_wrap(opts: Options) -> i32 {
    let delimiter = match delimiter::resolve(&opts.delimiter_token) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{PGM_NAME}: invalid delimiter: {e}");
            return 1;
        }
    };

    let wrap_opts = WrapOptions {
        delimiter,
        strip: opts.strip,
        skip_empty: opts.skip_empty,
        escape: opts.escape,
        separator: opts.separator,
    };

    let source = match select_input(opts.input, io::stdin().is_terminal()) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{PGM_NAME}: {msg}");
            return 1;
        }
    };

    // Open input: file or stdin.
    let reader: Box<dyn Read> = match &source {
        InputSource::File(path) => match File::open(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!("{PGM_NAME}: failed to open file '{}': {e}", path.display());
                return 1;
            }
        },
        InputSource::Stdin => Box::new(io::stdin().lock()),
    };
    let reader = BufReader::with_capacity(BUF_SIZE, reader);

    // Open output: file or stdout.
    let writer: Box<dyn Write> = match &opts.output_file {
        None => Box::new(io::stdout().lock()),
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!(
                    "{PGM_NAME}: failed to create output file '{}': {e}",
                    path.display()
                );
                return 1;
            }
        },
    };
    let writer = BufWriter::with_capacity(BUF_SIZE, writer);

    let stats = match wrap::wrap_stream(reader, writer, &wrap_opts) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("{PGM_NAME}: {e}");
            return 1;
        }
    };

    log::info!(
        "records: {} read, {} emitted, {} dropped; {} bytes written",
        stats.records_read,
        stats.records_emitted,
        stats.records_dropped,
        stats.bytes_written
    );

    if opts.json_output {
        eprintln!("{}", stats_json(&stats));
    }

    0
}

fn stats_json(stats: &WrapStats) -> String {
    let json = serde_json::json!({
        "records_read": stats.records_read,
        "records_emitted": stats.records_emitted,
        "records_dropped": stats.records_dropped,
        "bytes_written": stats.bytes_written,
    });
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap and runs the wrapper.
pub fn run() -> ! {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    let opts = resolve_options(cli);

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match opts.verbose {
        0 => {}
        1 => {
            logger.filter_level(log::LevelFilter::Info);
        }
        _ => {
            logger.filter_level(log::LevelFilter::Debug);
        }
    }
    logger.format_timestamp(None).format_target(false).init();

    if opts.show_version {
        println!("{}", version_banner(PGM_NAME, PGM_VERSION, PGM_URL));
        process::exit(0);
    }

    process::exit(cmd_wrap(opts));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once(PGM_NAME.to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(normalize_args(argv)).expect("cli parse failed");
        resolve_options(cli)
    }

    #[test]
    fn defaults() {
        let opts = parse_opts(&[]);
        assert!(!opts.show_version);
        assert_eq!(opts.delimiter_token, "\"");
        assert!(!opts.strip && !opts.skip_empty && !opts.escape);
        assert_eq!(opts.separator, Separator::Newline);
        assert_eq!(opts.input, None);
        assert_eq!(opts.output_file, None);
    }

    #[test]
    fn short_flags_map_correctly() {
        let opts = parse_opts(&["-s", "-e", "-0", "-d", "0x27", "-o", "out.txt", "in.txt"]);
        assert!(opts.strip);
        assert!(opts.skip_empty);
        assert_eq!(opts.separator, Separator::Nul);
        assert_eq!(opts.delimiter_token, "0x27");
        assert_eq!(opts.output_file, Some(PathBuf::from("out.txt")));
        assert_eq!(opts.input, Some(PathBuf::from("in.txt")));
    }

    #[test]
    fn long_flags_map_correctly() {
        let opts = parse_opts(&[
            "--strip",
            "--skip-empty",
            "--escape",
            "--null",
            "--delimiter",
            "[]",
            "--json",
            "-",
        ]);
        assert!(opts.strip && opts.skip_empty && opts.escape && opts.json_output);
        assert_eq!(opts.separator, Separator::Nul);
        assert_eq!(opts.delimiter_token, "[]");
        assert_eq!(opts.input, Some(PathBuf::from("-")));
    }

    #[test]
    fn hyphen_delimiter_is_accepted() {
        let opts = parse_opts(&["-d", "-", "in.txt"]);
        assert_eq!(opts.delimiter_token, "-");
        assert_eq!(opts.input, Some(PathBuf::from("in.txt")));
    }

    #[test]
    fn single_dash_escape_is_accepted() {
        let opts = parse_opts(&["-escape", "-s", "-"]);
        assert!(opts.escape);
        assert!(opts.strip);
        assert!(!opts.skip_empty);

        let opts = parse_opts(&["-s", "-e", "-escape", "-d", "'", "-"]);
        assert!(opts.escape && opts.strip && opts.skip_empty);
        assert_eq!(opts.delimiter_token, "'");
    }

    #[test]
    fn escape_spelling_kept_as_option_value() {
        let opts = parse_opts(&["-d", "-escape", "in.txt"]);
        assert!(!opts.escape);
        assert_eq!(opts.delimiter_token, "-escape");

        let opts = parse_opts(&["-sd", "-escape", "in.txt"]);
        assert!(opts.strip && !opts.escape);
        assert_eq!(opts.delimiter_token, "-escape");
    }

    #[test]
    fn normalize_leaves_other_args_alone() {
        let argv = ["wrapline", "-s", "--escape", "-dfoo", "-escape", "--", "-escape"];
        let expected: Vec<OsString> = [
            "wrapline", "-s", "--escape", "-dfoo", "--escape", "--", "-escape",
        ]
        .map(OsString::from)
        .into();
        assert_eq!(normalize_args(argv), expected);
    }

    #[test]
    fn version_flag() {
        assert!(parse_opts(&["-v"]).show_version);
        assert!(parse_opts(&["--version"]).show_version);
    }

    #[test]
    fn verbose_is_capped() {
        let opts = parse_opts(&["--verbose", "--verbose", "--verbose"]);
        assert_eq!(opts.verbose, 2);
    }

    #[test]
    fn extra_positional_rejected() {
        let argv = ["wrapline", "file1.txt", "file2.txt"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn input_selection() {
        assert_eq!(
            select_input(Some(PathBuf::from("-")), true),
            Ok(InputSource::Stdin)
        );
        assert_eq!(
            select_input(Some(PathBuf::from("a.txt")), false),
            Ok(InputSource::File(PathBuf::from("a.txt")))
        );
        assert_eq!(select_input(None, false), Ok(InputSource::Stdin));
        assert!(select_input(None, true).is_err());
    }

    #[test]
    fn banner_contents() {
        let banner = version_banner("wrapline", "1.2.3", "https://example.com/wrapline");
        assert_eq!(banner, "wrapline v1.2.3\nhttps://example.com/wrapline");
    }

    #[test]
    fn stats_json_fields() {
        let stats = WrapStats {
            records_read: 3,
            records_emitted: 2,
            records_dropped: 1,
            bytes_written: 12,
        };
        let value: serde_json::Value = serde_json::from_str(&stats_json(&stats)).unwrap();
        assert_eq!(value["records_emitted"], 2);
        assert_eq!(value["records_dropped"], 1);
        assert_eq!(value["bytes_written"], 12);
    }

    #[test]
    fn fuzz_parse_does_not_panic() {
        fuzz_try_parse_args(&["-d".into(), "0xZZ".into()]);
        fuzz_try_parse_args(&["--nope".into()]);
    }
}
