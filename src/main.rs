//! Binary entry point for the `cdb` command-line tool.
//!
//! A thin wrapper over [`cdb::cli`]: parse argv, dispatch the selected
//! subcommand, and translate its result into a process exit code.

fn main() {
    let exit_code = cdb::cli::run();
    std::process::exit(exit_code);
}
