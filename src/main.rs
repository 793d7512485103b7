fn main() {
    #[cfg(feature = "cli")]
    wrapline::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("wrapline: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
