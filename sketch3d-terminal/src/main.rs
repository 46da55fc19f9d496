/// Sketch3D Terminal - interactive shape editor
///
/// Controls:
///   - Tab / Shift+Tab: Select next / previous shape
///   - 1-5: Add rectangle, triangle, circle, star, cube
///   - X / Delete: Delete the selected shape
///   - Arrows, PgUp/PgDn: Move the selected shape
///   - W/S, A/D, E/R: Rotate around x, y, z
///   - +/-: Scale, C: Cycle color, L: Toggle look-at camera
///   - Shift+W/S/A/D/E/R: Rotate the free camera
///   - Shift+Arrows, Shift+PgUp/PgDn: Move the camera
///   - Alt+Arrows, Alt+PgUp/PgDn: Move the look-at target
///   - U/O, I/K, Y/H: Light direction x, y, z
///   - [ / ]: Dolly camera, < / >: Field of view
///   - Q/ESC: Quit

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sketch3d_core::{PipelineConfig, ProjectionMode, Scene, SelectionPolicy, Viewport};
use sketch3d_terminal::logging::{init_logging, LoggingConfig};
use sketch3d_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal editor for 2D and 3D shape scenes")]
struct Args {
    /// Use the 2D pixel-space pipeline instead of the 3D camera pipeline
    #[arg(long)]
    planar: bool,

    /// Disable directional lighting in 3D
    #[arg(long)]
    no_lighting: bool,

    /// Use an orthographic instead of a perspective projection
    #[arg(long)]
    orthographic: bool,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 70.0)]
    fov: f32,

    /// Keep the selection on its shape when an earlier shape is deleted
    #[arg(long)]
    follow_selection: bool,

    /// Log filter, e.g. "sketch3d_core=debug"
    #[arg(long)]
    log_filter: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut config = if self.planar {
            PipelineConfig::planar(Viewport::default())
        } else {
            PipelineConfig::spatial(Viewport::default())
        };
        config.lighting = config.lighting && !self.no_lighting;
        config.field_of_view_degrees = self.fov;
        if self.orthographic {
            config.projection = ProjectionMode::Orthographic;
        }
        if self.follow_selection {
            config.selection_policy = SelectionPolicy::FollowShape;
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log_filter.clone(),
        file: args.log_file.clone(),
        ..LoggingConfig::default()
    })
    .context("failed to open log file")?;

    let config = args.pipeline_config();
    let scene = if args.planar {
        Scene::default_planar()
    } else {
        Scene::default_spatial()
    };
    log::info!("starting editor with {:?}", config);

    let mut app = TerminalApp::new(config, scene).context("failed to query terminal size")?;
    app.run().context("terminal editor failed")?;

    Ok(())
}
