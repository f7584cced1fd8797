//! Desk Scene Client
//!
//! Window, input and wgpu rendering for the desk scene.

pub mod app;
pub mod input;
pub mod renderer;

use deskscene_core::{AppConfig, SceneDescription};

const DEFAULT_LOG_FILTER: &str = "deskscene=info";

/// Log filter from `RUST_LOG`, or [`DEFAULT_LOG_FILTER`] when it is unset or invalid.
pub fn log_filter() -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the tracing subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(log_filter())
        .try_init()?;
    Ok(())
}

/// Scene named by the config, or the built-in desk scene.
pub fn load_scene(config: &AppConfig) -> anyhow::Result<SceneDescription> {
    let mut scene = match &config.scene_file {
        Some(path) => SceneDescription::load(path)?,
        None => SceneDescription::desk(),
    };
    scene.lights.angular_speed = config.orbit_speed;
    scene.lights.orbiting |= config.orbit;
    Ok(scene)
}

/// Open the window and run until it is closed.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    use app::App;
    use winit::event_loop::EventLoop;

    config.validate()?;
    let scene = load_scene(&config)?;

    tracing::info!(
        "Starting {} ({}x{}, textures from {})",
        config.title,
        config.width,
        config.height,
        config.texture_dir.display()
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, scene);

    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_is_desk_with_config_orbit() {
        let config = AppConfig {
            orbit: true,
            orbit_speed: 90.0,
            ..Default::default()
        };
        let scene = load_scene(&config).unwrap();
        assert_eq!(scene.objects.len(), 7);
        assert!(scene.lights.orbiting);
        assert_eq!(scene.lights.angular_speed, 90.0);
    }

    #[test]
    fn log_filter_prefers_rust_log() {
        // Both cases live in one test since they share the process environment.
        std::env::set_var("RUST_LOG", "deskscene=debug");
        assert_eq!(log_filter().to_string(), "deskscene=debug");

        std::env::remove_var("RUST_LOG");
        assert_eq!(log_filter().to_string(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn missing_scene_file_is_an_error() {
        let config = AppConfig {
            scene_file: Some("no/such/scene.json".into()),
            ..Default::default()
        };
        assert!(load_scene(&config).is_err());
    }
}
