//! vizij-spatial-wasm: wasm-bindgen glue exposing a `Scene` to JS.
//!
//! JS callbacks stand in for spatializers: the `update` callback receives the
//! interpolated pose object every tick and the optional `dispose` callback runs
//! exactly once when the source is removed, replaced or the scene shuts down.

use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_spatial_core::{Config, Outputs, Pose, Resource, Scene, SourceId, Spatializer};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

struct JsSpatializer {
    update: Function,
    dispose: Option<Function>,
}

impl Spatializer for JsSpatializer {
    fn update(&mut self, pose: &Pose) {
        let arg = match swb::to_value(pose) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("pose serialization failed: {e}");
                return;
            }
        };
        if let Err(e) = self.update.call1(&JsValue::UNDEFINED, &arg) {
            log::warn!("spatializer update callback threw: {e:?}");
        }
    }

    fn dispose(&mut self) -> anyhow::Result<()> {
        if let Some(f) = self.dispose.take() {
            f.call0(&JsValue::UNDEFINED)
                .map_err(|e| anyhow::anyhow!("spatializer dispose callback threw: {e:?}"))?;
        }
        Ok(())
    }
}

#[wasm_bindgen]
pub struct VizijSpatial {
    core: Scene,
}

#[wasm_bindgen]
impl VizijSpatial {
    /// Create a new scene. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new VizijSpatial({ resource_capacity: 64, transition_time: 0.25 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijSpatial, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let core = Scene::new(cfg).map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(VizijSpatial { core })
    }

    /// Track a new remote source. Returns its id (u32).
    #[wasm_bindgen(js_name = add_source)]
    pub fn add_source(&mut self) -> u32 {
        self.core.add_source().0
    }

    #[wasm_bindgen(js_name = remove_source)]
    pub fn remove_source(&mut self, id: u32) -> bool {
        self.core.remove_source(SourceId(id))
    }

    #[wasm_bindgen(js_name = source_count)]
    pub fn source_count(&self) -> u32 {
        self.core.source_ids().count() as u32
    }

    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = set_listener_target)]
    pub fn set_listener_target(
        &mut self,
        px: f32,
        py: f32,
        pz: f32,
        fx: f32,
        fy: f32,
        fz: f32,
        ux: f32,
        uy: f32,
        uz: f32,
        t: f32,
    ) {
        self.core
            .set_listener_target([px, py, pz], [fx, fy, fz], [ux, uy, uz], t);
    }

    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = set_source_target)]
    pub fn set_source_target(
        &mut self,
        id: u32,
        px: f32,
        py: f32,
        pz: f32,
        fx: f32,
        fy: f32,
        fz: f32,
        ux: f32,
        uy: f32,
        uz: f32,
        t: f32,
    ) -> Result<(), JsError> {
        self.core
            .set_source_target(SourceId(id), [px, py, pz], [fx, fy, fz], [ux, uy, uz], t)
            .map_err(|e| JsError::new(&format!("set_source_target: {e}")))
    }

    #[wasm_bindgen(js_name = set_source_position)]
    pub fn set_source_position(
        &mut self,
        id: u32,
        px: f32,
        py: f32,
        pz: f32,
        t: f32,
    ) -> Result<(), JsError> {
        self.core
            .set_source_target_position(SourceId(id), [px, py, pz], t)
            .map_err(|e| JsError::new(&format!("set_source_position: {e}")))
    }

    /// Attach JS callbacks as the source's spatializer, disposing the previous one.
    /// `update(pose)` runs every tick; `dispose()` (optional) runs once on release.
    #[wasm_bindgen(js_name = set_source_spatializer)]
    pub fn set_source_spatializer(
        &mut self,
        id: u32,
        update: Function,
        dispose: Option<Function>,
    ) -> Result<(), JsError> {
        let spatializer = JsSpatializer { update, dispose };
        self.core
            .set_source_spatializer(SourceId(id), Some(Box::new(spatializer)))
            .map_err(|e| JsError::new(&format!("set_source_spatializer: {e}")))
    }

    #[wasm_bindgen(js_name = clear_source_spatializer)]
    pub fn clear_source_spatializer(&mut self, id: u32) -> Result<(), JsError> {
        self.core
            .set_source_spatializer(SourceId(id), None)
            .map_err(|e| JsError::new(&format!("clear_source_spatializer: {e}")))
    }

    /// Advance all poses to time `t` (seconds). Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, t: f32) -> Result<JsValue, JsError> {
        let out: &Outputs = self.core.update(t);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    #[wasm_bindgen(js_name = cache_resource)]
    pub fn cache_resource(&mut self, key: String, kind: String, bytes: u32) {
        self.core
            .resources_mut()
            .set(key, Resource::new(kind, bytes as usize));
    }

    #[wasm_bindgen(js_name = has_resource)]
    pub fn has_resource(&self, key: &str) -> bool {
        self.core.resources().has(key)
    }

    #[wasm_bindgen(js_name = delete_resource)]
    pub fn delete_resource(&mut self, key: &str) -> bool {
        self.core.resources_mut().delete(key)
    }

    #[wasm_bindgen(js_name = resource_count)]
    pub fn resource_count(&self) -> u32 {
        self.core.resources().len() as u32
    }

    /// Dispose every spatializer and cached resource. The scene can be reused.
    #[wasm_bindgen]
    pub fn shutdown(&mut self) {
        self.core.shutdown();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
