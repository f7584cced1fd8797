use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use deskscene_core::{AppConfig, ProjectionMode};

#[derive(Parser, Debug)]
#[command(name = "deskscene")]
#[command(about = "Textured, Phong-lit desk scene with a fly-through camera")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Directory containing the texture images
    #[arg(short, long)]
    textures: Option<PathBuf>,

    /// JSON scene file to render instead of the built-in desk
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Start with the orthographic projection
    #[arg(long)]
    ortho: bool,

    /// Start with the lights orbiting
    #[arg(long)]
    orbit: bool,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(dir) = self.textures {
            config.texture_dir = dir;
        }
        if self.scene.is_some() {
            config.scene_file = self.scene;
        }
        if self.ortho {
            config.projection = ProjectionMode::Orthographic;
        }
        config.orbit |= self.orbit;
        Ok(config)
    }
}

fn main() -> Result<()> {
    deskscene_client::init_tracing()?;
    let config = Cli::parse().into_config()?;
    deskscene_client::run(config)
}
