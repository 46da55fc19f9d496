/// Terminal shape editor built on the ASCII rasterizer backend
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use sketch3d_core::{
    Axis, Color as ShapeColor, Dimension, FrameRenderer, PipelineConfig, Scene, ShapeKind,
    ShapeListEntry, ShapeListView, Viewport,
};

pub mod logging;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// Colors cycled through with the `c` key.
const PALETTE: [&str; 6] = ["#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF"];

/// Degrees per rotation key press.
const ROTATION_STEP: f32 = 15.0;

/// Light direction change per key press.
const LIGHT_STEP: f32 = 0.1;

/// Rows reserved above the canvas for the status line.
const HEADER_ROWS: u16 = 1;

/// Shape list rows painted over the canvas.
#[derive(Debug, Default)]
pub struct ShapeListPanel {
    rows: Vec<String>,
}

impl ShapeListPanel {
    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

impl ShapeListView for ShapeListPanel {
    fn refresh(&mut self, entries: &[ShapeListEntry]) {
        self.rows = entries
            .iter()
            .map(|entry| {
                let marker = if entry.selected { '>' } else { ' ' };
                format!("{} [{}] {}", marker, entry.index, entry)
            })
            .collect();
    }
}

/// Outcome of one key press
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Redraw,
    Ignored,
    Quit,
}

/// Main application struct for the terminal editor
pub struct TerminalApp {
    scene: Scene,
    renderer: FrameRenderer,
    backend: AsciiRenderer,
    list: ShapeListPanel,
    palette_index: usize,
    status: String,
    running: bool,
}

impl TerminalApp {
    pub fn new(config: PipelineConfig, scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, scene, width as usize, height as usize))
    }

    /// Builds the editor for a canvas of `columns` x `rows` cells.
    pub fn with_size(mut config: PipelineConfig, scene: Scene, columns: usize, rows: usize) -> Self {
        let rows = rows.saturating_sub(HEADER_ROWS as usize).max(1);
        let columns = columns.max(1);
        if config.dimension == Dimension::Spatial {
            config.viewport = cell_viewport(columns, rows);
        }
        let scene = scene.with_selection_policy(config.selection_policy);
        Self {
            scene,
            renderer: FrameRenderer::new(config),
            backend: AsciiRenderer::new(columns, rows),
            list: ShapeListPanel::default(),
            palette_index: 0,
            status: String::from("ready"),
            running: true,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;
        while self.running {
            // Every handled event runs to completion, then the whole scene is redrawn.
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if self.handle_key(key) == Action::Redraw {
                        self.render()?;
                    }
                }
                Event::Resize(width, height) => {
                    self.resize(width as usize, height as usize);
                    self.render()?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn resize(&mut self, columns: usize, rows: usize) {
        let rows = rows.saturating_sub(HEADER_ROWS as usize).max(1);
        let columns = columns.max(1);
        self.backend.resize(columns, rows);
        let config = self.renderer.config_mut();
        if config.dimension == Dimension::Spatial {
            config.viewport = cell_viewport(columns, rows);
        }
    }

    fn translation_step(&self) -> f32 {
        match self.renderer.config().dimension {
            Dimension::Planar => 10.0,
            Dimension::Spatial => 2.0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let step = self.translation_step();
        if self.handle_camera_key(key, step) {
            return Action::Redraw;
        }
        let result = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return Action::Quit;
            }
            KeyCode::Tab => self.cycle_selection(1),
            KeyCode::BackTab => self.cycle_selection(-1),
            KeyCode::Char(c @ '1'..='5') => {
                let kind = ShapeKind::ALL[c as usize - '1' as usize];
                self.add_at_center(kind);
                Ok(())
            }
            KeyCode::Char('x') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Left => self.nudge_translation(Axis::X, -step),
            KeyCode::Right => self.nudge_translation(Axis::X, step),
            // Planar pixel space grows downward
            KeyCode::Up => self.nudge_translation(Axis::Y, self.screen_up(step)),
            KeyCode::Down => self.nudge_translation(Axis::Y, -self.screen_up(step)),
            KeyCode::PageUp => self.nudge_translation(Axis::Z, -step),
            KeyCode::PageDown => self.nudge_translation(Axis::Z, step),
            KeyCode::Char('w') => self.scene.rotate_selected(ROTATION_STEP, 0.0, 0.0),
            KeyCode::Char('s') => self.scene.rotate_selected(-ROTATION_STEP, 0.0, 0.0),
            KeyCode::Char('a') => self.scene.rotate_selected(0.0, -ROTATION_STEP, 0.0),
            KeyCode::Char('d') => self.scene.rotate_selected(0.0, ROTATION_STEP, 0.0),
            KeyCode::Char('e') => self.scene.rotate_selected(0.0, 0.0, ROTATION_STEP),
            KeyCode::Char('r') => self.scene.rotate_selected(0.0, 0.0, -ROTATION_STEP),
            // Shifted rotation keys turn the free camera
            KeyCode::Char('W') => self.rotate_camera(ROTATION_STEP, 0.0, 0.0),
            KeyCode::Char('S') => self.rotate_camera(-ROTATION_STEP, 0.0, 0.0),
            KeyCode::Char('A') => self.rotate_camera(0.0, -ROTATION_STEP, 0.0),
            KeyCode::Char('D') => self.rotate_camera(0.0, ROTATION_STEP, 0.0),
            KeyCode::Char('E') => self.rotate_camera(0.0, 0.0, ROTATION_STEP),
            KeyCode::Char('R') => self.rotate_camera(0.0, 0.0, -ROTATION_STEP),
            KeyCode::Char('u') => self.nudge_light(Axis::X, -LIGHT_STEP),
            KeyCode::Char('o') => self.nudge_light(Axis::X, LIGHT_STEP),
            KeyCode::Char('i') => self.nudge_light(Axis::Y, LIGHT_STEP),
            KeyCode::Char('k') => self.nudge_light(Axis::Y, -LIGHT_STEP),
            KeyCode::Char('y') => self.nudge_light(Axis::Z, LIGHT_STEP),
            KeyCode::Char('h') => self.nudge_light(Axis::Z, -LIGHT_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.scale_selected(1.1),
            KeyCode::Char('-') => self.scale_selected(1.0 / 1.1),
            KeyCode::Char('c') => self.cycle_color(),
            KeyCode::Char('l') => {
                let mode = self.scene.camera.toggle_mode();
                self.status = format!("camera: {:?}", mode);
                return Action::Redraw;
            }
            KeyCode::Char('[') => {
                let z = self.scene.camera.translation.z - step;
                self.scene.set_camera_translation(Axis::Z, z);
                Ok(())
            }
            KeyCode::Char(']') => {
                let z = self.scene.camera.translation.z + step;
                self.scene.set_camera_translation(Axis::Z, z);
                Ok(())
            }
            KeyCode::Char('<') => self.adjust_field_of_view(-5.0),
            KeyCode::Char('>') => self.adjust_field_of_view(5.0),
            _ => return Action::Ignored,
        };

        if let Err(e) = result {
            log::warn!("edit rejected: {}", e);
            self.status = e.to_string();
        }
        Action::Redraw
    }

    /// Shift+arrows move the camera, Alt+arrows move the look-at target.
    /// PgUp/PgDn cover the z axis in both layers.
    fn handle_camera_key(&mut self, key: KeyEvent, step: f32) -> bool {
        let (axis, delta) = match key.code {
            KeyCode::Left => (Axis::X, -step),
            KeyCode::Right => (Axis::X, step),
            KeyCode::Up => (Axis::Y, step),
            KeyCode::Down => (Axis::Y, -step),
            KeyCode::PageUp => (Axis::Z, -step),
            KeyCode::PageDown => (Axis::Z, step),
            _ => return false,
        };

        if key.modifiers.contains(KeyModifiers::ALT) {
            let value = self.scene.camera.target[axis.index()] + delta;
            self.scene.set_camera_target(axis, value);
            self.status = format!("look-at target {:?} {}", axis, value);
        } else if key.modifiers.contains(KeyModifiers::SHIFT) {
            let value = self.scene.camera.translation[axis.index()] + delta;
            self.scene.set_camera_translation(axis, value);
            self.status = format!("camera {:?} {}", axis, value);
        } else {
            return false;
        }
        true
    }

    fn screen_up(&self, step: f32) -> f32 {
        match self.renderer.config().dimension {
            Dimension::Planar => -step,
            Dimension::Spatial => step,
        }
    }

    fn cycle_selection(&mut self, delta: isize) -> Result<(), sketch3d_core::SceneError> {
        let len = self.scene.len() as isize;
        let current = self
            .scene
            .selected_index()
            .ok_or(sketch3d_core::SceneError::EmptyScene)? as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.scene.select(next)?;
        self.status = format!("selected {}", next);
        Ok(())
    }

    fn add_at_center(&mut self, kind: ShapeKind) {
        let color = self.current_color();
        let config = self.renderer.config();
        let viewport = config.viewport;
        let index = self.scene.add_at_pointer(
            kind,
            color,
            viewport.width / 2.0,
            viewport.height / 2.0,
            &viewport,
            config.dimension,
        );
        self.status = format!("added {} at {}", kind, index);
    }

    fn delete_selected(&mut self) -> Result<(), sketch3d_core::SceneError> {
        let index = self
            .scene
            .selected_index()
            .ok_or(sketch3d_core::SceneError::EmptyScene)?;
        let removed = self.scene.delete_shape(index)?;
        self.status = format!("deleted {} at {}", removed.kind, index);
        Ok(())
    }

    fn nudge_translation(&mut self, axis: Axis, delta: f32) -> Result<(), sketch3d_core::SceneError> {
        let value = self.scene.selected_shape()?.translation[axis.index()];
        self.scene.set_translation(axis, value + delta)
    }

    fn rotate_camera(&mut self, dx: f32, dy: f32, dz: f32) -> Result<(), sketch3d_core::SceneError> {
        self.scene.rotate_camera(dx, dy, dz);
        let rotation = self.scene.camera.rotation;
        self.status = format!(
            "camera rotation {} {} {} ({:?})",
            rotation.x, rotation.y, rotation.z, self.scene.camera.mode
        );
        Ok(())
    }

    fn nudge_light(&mut self, axis: Axis, delta: f32) -> Result<(), sketch3d_core::SceneError> {
        let value = self.scene.light.direction[axis.index()] + delta;
        self.scene.set_light_direction(axis, value);
        let d = self.scene.light.direction;
        self.status = format!("light {:.1} {:.1} {:.1}", d.x, d.y, d.z);
        Ok(())
    }

    fn scale_selected(&mut self, factor: f32) -> Result<(), sketch3d_core::SceneError> {
        let scale = self.scene.selected_shape()?.scale;
        self.scene.set_scale(Axis::X, scale.x * factor)?;
        self.scene.set_scale(Axis::Y, scale.y * factor)?;
        self.scene.set_scale(Axis::Z, scale.z * factor)
    }

    fn current_color(&self) -> ShapeColor {
        ShapeColor::from_hex(PALETTE[self.palette_index]).unwrap_or_default()
    }

    fn cycle_color(&mut self) -> Result<(), sketch3d_core::SceneError> {
        self.palette_index = (self.palette_index + 1) % PALETTE.len();
        let color = self.current_color();
        self.status = format!("color {}", color.to_hex());
        self.scene.set_color(color)
    }

    fn adjust_field_of_view(&mut self, delta: f32) -> Result<(), sketch3d_core::SceneError> {
        let config = self.renderer.config_mut();
        config.field_of_view_degrees = (config.field_of_view_degrees + delta).clamp(5.0, 175.0);
        self.status = format!("field of view {}", config.field_of_view_degrees);
        Ok(())
    }

    /// Redraws the whole scene into the backend and refreshes the shape list.
    pub fn redraw(&mut self) {
        if let Err(e) = self
            .renderer
            .render_with_list(&self.scene, &mut self.backend, &mut self.list)
        {
            log::error!("frame skipped: {}", e);
            self.status = e.to_string();
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.redraw();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, HEADER_ROWS), terminal::Clear(ClearType::FromCursorDown))?;
        self.backend.draw_to(&mut stdout)?;

        // Shape list overlay
        for (row, line) in self.list.rows().iter().enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(0, HEADER_ROWS + row as u16),
                SetForegroundColor(Color::Grey),
                Print(line),
                ResetColor
            )?;
        }

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Sketch3D | {} | Tab=Select 1-5=Add X=Delete Arrows=Move WASDER=Rotate +/-=Scale C=Color L=LookAt Shift=Camera Alt=Target UIOKYH=Light Q=Quit",
                self.status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Virtual pixel viewport matching the canvas cell grid.
fn cell_viewport(columns: usize, rows: usize) -> Viewport {
    Viewport::new(
        columns as f32 * renderer::CELL_WIDTH,
        rows as f32 * renderer::CELL_HEIGHT,
    )
}
