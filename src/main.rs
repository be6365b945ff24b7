// What you SEE:
// • Live camera is the base image, with a green capture box and a gray floor.
// • C cuts whatever sits in the box out as a sprite; up to five at a time.
// • Right hand (hold left mouse) drags and tilts the selected sprite (A/D).
// • Left hand (hold right mouse) scales it by thumb-pinky spread (wheel);
//   P makes a peace sign, which duplicates the sprite.
// • Let go and it falls, bounces, and settles on the floor.
// • 1-5 select, R reset, Q/ESC quit.

mod app;
mod camera;
mod cli;
mod compositor;
mod config;
mod control;
mod draw;
mod error;
mod gesture;
mod hands;
mod hud;
mod physics;
mod session;
mod store;
mod types;
mod vision;

use clap::Parser;
use log::{debug, error, info};

use cli::Args;

fn main() {
    let args = Args::parse();

    // Console logging with specified verbosity level (respects RUST_LOG if set)
    let default_level = match args.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    info!("Hand sprites starting...");
    debug!("Command-line args: {:?}", args);

    if let Err(e) = app::run(args.engine_config()) {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
