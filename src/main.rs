//! Tessella - a policy-driven window-management shell
//!
//! Hosts the `tessella-core` engine over a headless in-memory scene:
//! opens a configurable number of demo sessions, gives each one a
//! surface, and logs the tile layout the selected policy produces.
//!
//! # Features
//! - Pluggable window-management policy (tiling or fullscreen)
//! - Deterministic per-session tiling of the display area
//! - TOML configuration
//! - Headless demo scene for exercising the engine without a
//!   compositor

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod scene;
mod shell;

use config::Config;
use scene::HeadlessScene;
use tessella_core::event::{Buttons, Modifiers, PointerAction, PointerEvent};
use tessella_core::geometry::{Point, Rect};
use tessella_core::{FocusController, SurfaceParams};

/// Tessella - a policy-driven window-management shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Run in debug mode with verbose logging
    #[arg(short, long)]
    debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,

    /// Print default configuration to stdout
    #[arg(long)]
    print_default_config: bool,

    /// Window manager to run: tiling or fullscreen
    #[arg(short, long)]
    window_manager: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Tessella v{} starting...", env!("CARGO_PKG_VERSION"));

    // Handle special commands
    if args.print_default_config {
        println!("{}", Config::default_config_string());
        return Ok(());
    }

    // Load configuration
    let config = match Config::load(args.config.as_deref()) {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        },
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        },
    };

    if args.validate {
        info!("Configuration is valid");
        return Ok(());
    }

    let policy_name = args
        .window_manager
        .unwrap_or_else(|| config.general.window_manager.clone());
    info!("Using the {} window manager", policy_name);

    run_demo(&config, &policy_name)
}

/// Drive the engine over the headless scene and log what the policy
/// does with it.
fn run_demo(config: &Config, policy_name: &str) -> Result<()> {
    let scene = Arc::new(HeadlessScene::new());
    let wm = shell::build_window_manager(policy_name, scene.clone())?;

    // Named `display_rect` rather than `display`: tracing's macros
    // fail to expand when a captured local is literally named
    // `display` (it collides with `tracing::field::display`).
    let display_rect = Rect::new(
        0,
        0,
        config.demo.display_width,
        config.demo.display_height,
    );
    wm.add_display(display_rect);
    info!(display = %display_rect, "display attached");

    let mut sessions = Vec::new();
    for n in 0..config.demo.sessions {
        let (session, handle) = scene.open_session();
        wm.add_session(session, handle);

        let params = SurfaceParams::new(640, 480).with_name(format!("demo-{n}"));
        let surface = wm.add_surface(session, params, |placed| {
            scene.realize_surface(session, placed)
        });
        sessions.push(session);

        if let Some(geometry) = scene.surface_geometry(surface) {
            info!(%session, %surface, %geometry, "surface placed");
        }
    }

    for &session in &sessions {
        if let Some(tile) = wm.tile_of(session) {
            info!(%session, %tile, surfaces = wm.surfaces_of(session).len(), "tile assigned");
        }
    }

    // Click in the middle of the display to exercise focus routing.
    let cursor = Point::new(display_rect.size.width / 2, display_rect.size.height / 2);
    wm.handle_pointer_event(&PointerEvent {
        action: PointerAction::ButtonDown,
        position: cursor,
        buttons: Buttons::PRIMARY,
        modifiers: Modifiers::empty(),
    });
    if let Some(focused) = scene.focused_session() {
        info!(%cursor, %focused, "click routed");
    }

    Ok(())
}
