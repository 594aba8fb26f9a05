//! Window-manager selection
//!
//! Maps the configured policy name to an engine wired to the scene.

use std::sync::Arc;

use thiserror::Error;

use tessella_core::{FullscreenPolicy, TilingPolicy, WindowManager};

use crate::scene::HeadlessScene;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("unknown window manager {name:?} (expected \"tiling\" or \"fullscreen\")")]
    UnknownWindowManager { name: String },
}

/// Build the engine for the named policy.
pub fn build_window_manager(
    name: &str,
    scene: Arc<HeadlessScene>,
) -> Result<WindowManager, StartupError> {
    match name {
        "tiling" => Ok(WindowManager::new(scene, Box::new(TilingPolicy::new()))),
        "fullscreen" => Ok(WindowManager::new(scene, Box::new(FullscreenPolicy::new()))),
        _ => Err(StartupError::UnknownWindowManager {
            name: name.to_owned(),
        }),
    }
}
