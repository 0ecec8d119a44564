fn main() {
    // Delegate to CLI runner; errors are printed nicely here.
    if let Err(err) = tsc_trace::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
