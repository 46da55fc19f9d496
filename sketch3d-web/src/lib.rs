/// Sketch3D Web - WASM facade over the shape editor
///
/// The JavaScript host owns the DOM and the WebGL context. It forwards form
/// and pointer events to [`WebEditor`], calls [`WebEditor::render`] after
/// every change, and replays the recorded draw calls with its own buffers
/// and shader program.

use sketch3d_core::render::RecordedDraw;
use sketch3d_core::{
    Axis, Color, CommandRecorder, FrameRenderer, PipelineConfig, Primitive, Scene, SceneError,
    ShapeKind, TransformMatrix, Viewport,
};
use wasm_bindgen::prelude::*;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_axis(axis: &str) -> Result<Axis, JsValue> {
    match axis {
        "x" | "X" => Ok(Axis::X),
        "y" | "Y" => Ok(Axis::Y),
        "z" | "Z" => Ok(Axis::Z),
        other => Err(JsValue::from_str(&format!("unknown axis {:?}", other))),
    }
}

#[wasm_bindgen]
pub struct WebEditor {
    scene: Scene,
    renderer: FrameRenderer,
    recorder: CommandRecorder,
    draws: Vec<RecordedDraw>,
}

#[wasm_bindgen]
impl WebEditor {
    /// `spatial` selects the 3D camera pipeline; `lighting` only applies to it.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, spatial: bool, lighting: bool) -> WebEditor {
        let viewport = Viewport::new(width, height);
        let (mut config, scene) = if spatial {
            (PipelineConfig::spatial(viewport), Scene::default_spatial())
        } else {
            (PipelineConfig::planar(viewport), Scene::default_planar())
        };
        config.lighting = lighting;
        WebEditor {
            scene: scene.with_selection_policy(config.selection_policy),
            renderer: FrameRenderer::new(config),
            recorder: CommandRecorder::new(),
            draws: Vec::new(),
        }
    }

    /// Adds a shape where the pointer was pressed; returns its index.
    #[wasm_bindgen(js_name = addAtPointer)]
    pub fn add_at_pointer(&mut self, kind: &str, color_hex: &str, x: f32, y: f32) -> Result<usize, JsValue> {
        let kind = ShapeKind::from_name(kind)
            .ok_or_else(|| JsValue::from_str(&format!("unknown shape {:?}", kind)))?;
        let color = Color::from_hex(color_hex).map_err(to_js)?;
        let config = self.renderer.config();
        Ok(self
            .scene
            .add_at_pointer(kind, color, x, y, &config.viewport, config.dimension))
    }

    #[wasm_bindgen(js_name = deleteShape)]
    pub fn delete_shape(&mut self, index: usize) -> Result<(), JsValue> {
        self.scene.delete_shape(index).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectShape)]
    pub fn select_shape(&mut self, index: usize) -> Result<(), JsValue> {
        self.scene.select(index).map_err(to_js)
    }

    /// Selected index, or -1 for an empty scene.
    #[wasm_bindgen(js_name = selectedIndex)]
    pub fn selected_index(&self) -> i32 {
        self.scene.selected_index().map_or(-1, |i| i as i32)
    }

    #[wasm_bindgen(js_name = updateTranslation)]
    pub fn update_translation(&mut self, axis: &str, value: f32) -> Result<(), JsValue> {
        self.scene.set_translation(parse_axis(axis)?, value).map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateRotation)]
    pub fn update_rotation(&mut self, axis: &str, degrees: f32) -> Result<(), JsValue> {
        self.scene.set_rotation(parse_axis(axis)?, degrees).map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateScale)]
    pub fn update_scale(&mut self, axis: &str, value: f32) -> Result<(), JsValue> {
        self.scene.set_scale(parse_axis(axis)?, value).map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateColor)]
    pub fn update_color(&mut self, color_hex: &str) -> Result<(), JsValue> {
        let color = Color::from_hex(color_hex).map_err(to_js)?;
        self.scene.set_color(color).map_err(to_js)
    }

    /// Hex color of the selected shape, for populating the color input.
    #[wasm_bindgen(js_name = selectedColor)]
    pub fn selected_color(&self) -> Result<String, JsValue> {
        self.scene
            .selected_shape()
            .map(|shape| shape.color.to_hex())
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = updateFieldOfView)]
    pub fn update_field_of_view(&mut self, degrees: f32) {
        self.renderer.config_mut().field_of_view_degrees = degrees;
    }

    #[wasm_bindgen(js_name = toggleLookAt)]
    pub fn toggle_look_at(&mut self) -> bool {
        self.scene.camera.toggle_mode() == sketch3d_core::CameraMode::LookAt
    }

    #[wasm_bindgen(js_name = updateCameraTranslation)]
    pub fn update_camera_translation(&mut self, axis: &str, value: f32) -> Result<(), JsValue> {
        self.scene.set_camera_translation(parse_axis(axis)?, value);
        Ok(())
    }

    #[wasm_bindgen(js_name = updateCameraRotation)]
    pub fn update_camera_rotation(&mut self, axis: &str, degrees: f32) -> Result<(), JsValue> {
        self.scene.set_camera_rotation(parse_axis(axis)?, degrees);
        Ok(())
    }

    #[wasm_bindgen(js_name = updateLookAtTarget)]
    pub fn update_look_at_target(&mut self, axis: &str, value: f32) -> Result<(), JsValue> {
        self.scene.set_camera_target(parse_axis(axis)?, value);
        Ok(())
    }

    #[wasm_bindgen(js_name = updateLightDirection)]
    pub fn update_light_direction(&mut self, axis: &str, value: f32) -> Result<(), JsValue> {
        self.scene.set_light_direction(parse_axis(axis)?, value);
        Ok(())
    }

    /// Redraws the scene into the command recorder; returns the draw count.
    pub fn render(&mut self) -> Result<usize, JsValue> {
        self.recorder.reset();
        self.renderer
            .render(&self.scene, &mut self.recorder)
            .map_err(to_js)?;
        self.draws = self.recorder.draws();
        log::debug!("recorded {} draws", self.draws.len());
        Ok(self.draws.len())
    }

    /// Rows for the shape list, e.g. `"CUBE; X: 20; Y: 0; Z: 0;"`.
    #[wasm_bindgen(js_name = shapeList)]
    pub fn shape_list(&self) -> Vec<String> {
        self.scene
            .list_entries()
            .iter()
            .map(|entry| entry.to_string())
            .collect()
    }

    /// Flat vertex coordinates of draw `index`: xy pairs for planar frames,
    /// xyz triples for spatial ones.
    #[wasm_bindgen(js_name = drawVertices)]
    pub fn draw_vertices(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        let draw = self.draw(index)?;
        let planar = matches!(draw.transform, TransformMatrix::Planar(_));
        Ok(draw
            .vertices
            .iter()
            .flat_map(|v| if planar { vec![v.x, v.y] } else { vec![v.x, v.y, v.z] })
            .collect())
    }

    /// Flat normals of draw `index`; empty when the frame is unlit.
    #[wasm_bindgen(js_name = drawNormals)]
    pub fn draw_normals(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        let draw = self.draw(index)?;
        Ok(draw
            .normals
            .iter()
            .flatten()
            .flat_map(|n| [n.x, n.y, n.z])
            .collect())
    }

    /// Column-major matrix for `uniformMatrix3fv` / `uniformMatrix4fv`.
    #[wasm_bindgen(js_name = drawMatrix)]
    pub fn draw_matrix(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        Ok(self.draw(index)?.transform.to_column_major())
    }

    #[wasm_bindgen(js_name = drawColor)]
    pub fn draw_color(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        Ok(self.draw(index)?.color.to_vec())
    }

    /// `true` for a triangle fan, `false` for a plain triangle list.
    #[wasm_bindgen(js_name = drawIsFan)]
    pub fn draw_is_fan(&self, index: usize) -> Result<bool, JsValue> {
        Ok(self.draw(index)?.primitive == Primitive::TriangleFan)
    }

    /// Normalized light direction of the last frame; empty when unlit.
    #[wasm_bindgen(js_name = lightDirection)]
    pub fn light_direction(&self) -> Vec<f32> {
        self.recorder
            .light_direction()
            .map(|d| vec![d.x, d.y, d.z])
            .unwrap_or_default()
    }
}

impl WebEditor {
    fn draw(&self, index: usize) -> Result<&RecordedDraw, JsValue> {
        self.draws.get(index).ok_or_else(|| {
            to_js(SceneError::IndexOutOfRange {
                index,
                len: self.draws.len(),
            })
        })
    }
}
