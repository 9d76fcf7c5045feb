//! CLI entry point.
//!
//! Delegates to the library's `cli::run`, keeping the same split as a
//! thin `main.rs` over a reusable `run()` entry point: the core engines
//! stay usable as a library, and this binary is a thin harness around
//! them.

fn main() {
    env_logger::init();

    if let Err(error) = seismic_core::cli::run() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}
