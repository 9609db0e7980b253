//! # Voxel World Application Entry Point
//!
//! This is the main entry point for the headless demo. It simply calls into
//! the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json]
//! ```

fn main() {
    if let Err(error) = voxel_world::run() {
        log::error!("{error}");
        std::process::exit(1);
    }
}
