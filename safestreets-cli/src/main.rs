//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use eyre::WrapErr;

#[expect(clippy::print_stderr, reason = "the binary reports fatal errors on stderr")]
fn main() {
    pretty_env_logger::init();
    if let Err(err) = run() {
        eprintln!("safestreets: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> eyre::Result<()> {
    safestreets_cli::run().wrap_err("safestreets command failed")
}
