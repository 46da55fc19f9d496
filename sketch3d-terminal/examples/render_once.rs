/// Example: Render one frame of the default scene to stdout
///
/// Usage: cargo run --example render_once -- [planar]

use std::env;
use std::io::{self, Write};
use sketch3d_core::{FrameRenderer, PipelineConfig, Scene, Viewport};
use sketch3d_terminal::renderer::{CELL_HEIGHT, CELL_WIDTH};
use sketch3d_terminal::AsciiRenderer;

fn main() -> anyhow::Result<()> {
    let planar = env::args().nth(1).as_deref() == Some("planar");
    let (columns, rows) = (100, 40);

    let (config, scene) = if planar {
        (PipelineConfig::planar(Viewport::default()), Scene::default_planar())
    } else {
        let viewport = Viewport::new(columns as f32 * CELL_WIDTH, rows as f32 * CELL_HEIGHT);
        (PipelineConfig::spatial(viewport), Scene::default_spatial())
    };

    let mut backend = AsciiRenderer::new(columns, rows);
    let stats = FrameRenderer::new(config).render(&scene, &mut backend)?;

    let mut stdout = io::stdout();
    backend.draw_to(&mut stdout)?;
    writeln!(stdout)?;
    writeln!(stdout, "{} draw calls, {} vertices", stats.draw_calls, stats.vertices)?;
    for entry in scene.list_entries() {
        writeln!(stdout, "[{}] {}", entry.index, entry)?;
    }
    Ok(())
}
