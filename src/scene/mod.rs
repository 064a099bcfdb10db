//! Night street scene
//!
//! [`SceneAssembler`] builds the graph from [`SceneParams`];
//! [`NightStreet`] keeps the graph, the parameters and the tunable handles
//! together so the debug panel can edit all three consistently.

mod assembler;
mod debug_panel;
mod params;

pub use assembler::{SceneAssembler, SceneHandles, LIGHT_ROW, LIGHT_ROW_SPACING, STREET_Z};
pub use debug_panel::{Binding, ControlKind, DebugPanel, PanelValue};
pub use params::{
    apply_ambient, apply_background, apply_fog, apply_lamps, apply_street_light, AmbientParams,
    BackgroundParams, FireflyParams, FogParams, LampParams, SceneParams, StreetLightParams,
};

use nightstreet_core::{SceneGraph, TextureLoader};

/// The assembled scene with its live parameters
pub struct NightStreet {
    pub graph: SceneGraph,
    pub params: SceneParams,
    pub handles: SceneHandles,
}

impl NightStreet {
    pub fn build(loader: &dyn TextureLoader, params: SceneParams) -> Self {
        let mut graph = SceneGraph::new();
        let handles = SceneAssembler::new(loader, &params).assemble(&mut graph);
        Self { graph, params, handles }
    }

    /// Advance the fireflies to `elapsed` seconds since start
    pub fn animate(&mut self, elapsed: f32) {
        self.handles.fireflies.update(&mut self.graph, elapsed);
    }
}
