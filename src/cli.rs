use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, ValueHint};
use log::{debug, info};

use crate::logging;
use crate::runner::{self, RunOptions, TSC_TRACE_RESOLUTION};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tsc-trace",
    version,
    about = "Run `tsc --traceResolution` in a project and print its output only if it fails",
    long_about = None
)]
pub struct Args {
    /// Project directory to compile
    #[arg(short = 'd', long = "dir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,
}

/// Runs the CLI application.
///
/// # Errors
/// Returns an error if the compiler cannot be started.
pub fn run() -> Result<()> {
    let args = Args::parse();
    logging::init();
    run_with_args(&args)
}

/// Output directory of the project. Nothing reads it; it is only logged.
pub fn build_directory(dir: &Path) -> PathBuf {
    dir.join("build")
}

/// # Errors
/// Returns an error if the compiler cannot be started or stdout is closed.
pub fn run_with_args(args: &Args) -> Result<()> {
    println!("dir is {}", args.dir.display());

    let build_dir = build_directory(&args.dir);
    debug!("build directory (unused): {}", build_dir.display());

    let invocation = runner::run_command(TSC_TRACE_RESOLUTION, &RunOptions::in_dir(&args.dir))?;
    // The wrapper exits 0 either way; the child's status is only logged.
    let dir = invocation.working_directory.as_deref().unwrap_or(args.dir.as_path());
    match invocation.exit_code {
        Some(0) => info!("`{}` succeeded in {}", invocation.command, dir.display()),
        Some(code) => info!(
            "`{}` exited with status {code} in {}",
            invocation.command,
            dir.display()
        ),
        None => info!(
            "`{}` was terminated by a signal in {}",
            invocation.command,
            dir.display()
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_is_required() {
        let err = Args::try_parse_from(["tsc-trace"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn short_and_long_dir_flags() {
        let short = Args::try_parse_from(["tsc-trace", "-d", "/tmp/proj"]).unwrap();
        let long = Args::try_parse_from(["tsc-trace", "--dir", "/tmp/proj"]).unwrap();
        assert_eq!(short.dir, PathBuf::from("/tmp/proj"));
        assert_eq!(long.dir, short.dir);
    }

    #[test]
    fn dir_is_the_only_flag() {
        for extra in ["-v", "--verbose", "--quiet"] {
            let err = Args::try_parse_from(["tsc-trace", extra, "-d", "x"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
        }
    }

    #[test]
    fn build_directory_is_under_dir() {
        assert_eq!(
            build_directory(Path::new("/tmp/proj")),
            PathBuf::from("/tmp/proj/build")
        );
    }

    #[test]
    fn command_does_not_mention_build_directory() {
        assert!(!TSC_TRACE_RESOLUTION.contains("build"));
    }
}
