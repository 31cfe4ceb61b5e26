//! Initializes the process-wide logger. `RUST_LOG` controls verbosity, per
//! `pretty_env_logger`'s usual convention.

pub fn init() {
  pretty_env_logger::init();
}
