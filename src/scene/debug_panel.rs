//! Keyboard-driven parameter panel
//!
//! Each [`Binding`] exposes one value of [`SceneParams`] with a range and a
//! setter that pushes the new value into the live scene. The panel is hidden
//! at start; arrows select and adjust the current binding.

use std::fmt;

use nightstreet_core::{Color, PointLight};

use super::params::{apply_ambient, apply_fog, apply_lamps, SceneParams};
use super::NightStreet;

/// How a binding is edited
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Number { min: f32, max: f32, step: f32 },
    /// `0xRRGGBB`, adjusted by rotating the hue
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelValue {
    Number(f32),
    Color(u32),
}

impl fmt::Display for PanelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelValue::Number(v) => write!(f, "{}", v),
            PanelValue::Color(c) => write!(f, "#{:06x}", c),
        }
    }
}

/// Reads a binding's current value
pub type Getter = Box<dyn Fn(&SceneParams) -> PanelValue>;
/// Writes a value into the parameters and the live scene
pub type Setter = Box<dyn Fn(&mut NightStreet, PanelValue)>;

/// One tunable parameter
pub struct Binding {
    pub name: &'static str,
    pub folder: &'static str,
    pub kind: ControlKind,
    pub get: Getter,
    pub set: Setter,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("folder", &self.folder)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Binding {
    /// Numeric slider over `[min, max]` with the given step
    pub fn number(
        folder: &'static str,
        name: &'static str,
        (min, max, step): (f32, f32, f32),
        get: fn(&SceneParams) -> f32,
        set: fn(&mut NightStreet, f32),
    ) -> Self {
        Self {
            name,
            folder,
            kind: ControlKind::Number { min, max, step },
            get: Box::new(move |p: &SceneParams| PanelValue::Number(get(p))),
            set: Box::new(move |s: &mut NightStreet, v: PanelValue| {
                if let PanelValue::Number(v) = v {
                    set(s, v);
                }
            }),
        }
    }

    /// Color picker over `0xRRGGBB`
    pub fn color(
        folder: &'static str,
        name: &'static str,
        get: fn(&SceneParams) -> u32,
        set: fn(&mut NightStreet, u32),
    ) -> Self {
        Self {
            name,
            folder,
            kind: ControlKind::Color,
            get: Box::new(move |p: &SceneParams| PanelValue::Color(get(p))),
            set: Box::new(move |s: &mut NightStreet, v: PanelValue| {
                if let PanelValue::Color(v) = v {
                    set(s, v);
                }
            }),
        }
    }
}

/// Hue step in degrees for one color nudge
const HUE_STEP: f32 = 10.0;
/// Multiplier applied to steps when the coarse modifier is held
const COARSE: f32 = 10.0;

/// The scene's tweak panel
#[derive(Debug, Default)]
pub struct DebugPanel {
    bindings: Vec<Binding>,
    selected: usize,
    visible: bool,
}

impl DebugPanel {
    /// Empty, hidden panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel with every scene binding registered
    ///
    /// With `legacy_light_handlers` the street light distance and decay
    /// controls write the light intensity instead.
    pub fn for_scene(legacy_light_handlers: bool) -> Self {
        let mut panel = Self::new();

        panel.register(Binding::color("Fog", "color", |p| p.fog.color, |s, v| {
            s.params.fog.color = v;
            apply_fog(&mut s.graph, &s.params.fog);
        }));
        panel.register(Binding::number("Fog", "density", (0.0, 0.2, 0.001), |p| p.fog.density, |s, v| {
            s.params.fog.density = v;
            apply_fog(&mut s.graph, &s.params.fog);
        }));

        panel.register(Binding::color("Lamps", "lamps color", |p| p.lamps.color, |s, v| {
            s.params.lamps.color = v;
            apply_lamps(&s.handles.lamp_material, &s.params.lamps);
        }));
        panel.register(Binding::number(
            "Lamps",
            "lamp color intensity",
            (0.0, 10.0, 0.1),
            |p| p.lamps.intensity,
            |s, v| {
                s.params.lamps.intensity = v;
                apply_lamps(&s.handles.lamp_material, &s.params.lamps);
            },
        ));

        panel.register(Binding::color("Street lights", "light color", |p| p.street_light.color, |s, v| {
            s.params.street_light.color = v;
            update_lights(s, |light| light.color = Color::from_hex(v));
        }));
        panel.register(Binding::number(
            "Street lights",
            "intensity",
            (0.0, 6.0, 0.1),
            |p| p.street_light.intensity,
            |s, v| {
                s.params.street_light.intensity = v;
                update_lights(s, |light| light.intensity = v);
            },
        ));
        if legacy_light_handlers {
            panel.register(Binding::number(
                "Street lights",
                "distance",
                (0.0, 15.0, 0.1),
                |p| p.street_light.distance,
                |s, v| {
                    s.params.street_light.distance = v;
                    update_lights(s, |light| light.intensity = v);
                },
            ));
            panel.register(Binding::number(
                "Street lights",
                "decay",
                (0.0, 25.0, 0.1),
                |p| p.street_light.decay,
                |s, v| {
                    s.params.street_light.decay = v;
                    update_lights(s, |light| light.intensity = v);
                },
            ));
        } else {
            panel.register(Binding::number(
                "Street lights",
                "distance",
                (0.0, 15.0, 0.1),
                |p| p.street_light.distance,
                |s, v| {
                    s.params.street_light.distance = v;
                    update_lights(s, |light| light.distance = v);
                },
            ));
            panel.register(Binding::number(
                "Street lights",
                "decay",
                (0.0, 25.0, 0.1),
                |p| p.street_light.decay,
                |s, v| {
                    s.params.street_light.decay = v;
                    update_lights(s, |light| light.decay = v);
                },
            ));
        }

        panel.register(Binding::color("Ambient Light", "color", |p| p.ambient.color, |s, v| {
            s.params.ambient.color = v;
            apply_ambient(&mut s.graph, s.handles.ambient, &s.params.ambient);
        }));
        panel.register(Binding::number("Ambient Light", "intensity", (0.0, 2.0, 0.01), |p| p.ambient.intensity, |s, v| {
            s.params.ambient.intensity = v;
            apply_ambient(&mut s.graph, s.handles.ambient, &s.params.ambient);
        }));

        panel.register(Binding::number(
            "Fireflies",
            "amount",
            (0.0, 500.0, 1.0),
            |p| p.fireflies.amount as f32,
            |s, v| {
                let amount = v.max(0.0) as usize;
                s.params.fireflies.amount = amount;
                let handles = &mut s.handles;
                handles.fireflies.respawn(&mut s.graph, amount, &mut handles.rng);
            },
        ));

        panel
    }

    pub fn register(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Show or hide the panel; returns the new visibility
    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        log::debug!("Debug panel {}", if self.visible { "shown" } else { "hidden" });
        self.visible
    }

    pub fn selected(&self) -> Option<&Binding> {
        self.bindings.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.bindings.is_empty() {
            self.selected = (self.selected + 1) % self.bindings.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.bindings.is_empty() {
            self.selected = (self.selected + self.bindings.len() - 1) % self.bindings.len();
        }
    }

    /// Move the selected value one step up (`direction > 0`) or down
    pub fn nudge(&self, scene: &mut NightStreet, direction: f32, coarse: bool) -> Option<PanelValue> {
        if direction == 0.0 {
            return None;
        }
        let binding = self.bindings.get(self.selected)?;
        let scale = if coarse { COARSE } else { 1.0 };
        let next = match ((binding.get)(&scene.params), binding.kind) {
            (PanelValue::Number(v), ControlKind::Number { step, .. }) => {
                PanelValue::Number(v + direction.signum() * step * scale)
            }
            (PanelValue::Color(c), ControlKind::Color) => {
                PanelValue::Color(rotate_hue(c, direction.signum() * HUE_STEP * scale))
            }
            (value, kind) => {
                log::warn!("Binding {} has {:?} control but {:?} value", binding.name, kind, value);
                return None;
            }
        };
        let selected = self.selected;
        self.set_value(scene, selected, next)
    }

    /// Write a value through binding `index`, clamped and snapped to its range
    pub fn set_value(&self, scene: &mut NightStreet, index: usize, value: PanelValue) -> Option<PanelValue> {
        let binding = self.bindings.get(index)?;
        let value = match (value, binding.kind) {
            (PanelValue::Number(v), ControlKind::Number { min, max, step }) => {
                PanelValue::Number(snap(v, min, max, step))
            }
            (PanelValue::Color(c), ControlKind::Color) => PanelValue::Color(c & 0xff_ffff),
            _ => return None,
        };
        (binding.set)(scene, value);
        log::debug!("{} / {} = {}", binding.folder, binding.name, value);
        Some(value)
    }

    /// `Folder / name: value` for the selected binding
    pub fn selection_label(&self, params: &SceneParams) -> Option<String> {
        let b = self.selected()?;
        Some(format!("{} / {}: {}", b.folder, b.name, (b.get)(params)))
    }

    /// Every binding grouped by folder, the selection marked with `>`
    pub fn summary(&self, params: &SceneParams) -> String {
        let mut out = String::new();
        let mut folder = "";
        for (i, b) in self.bindings.iter().enumerate() {
            if b.folder != folder {
                folder = b.folder;
                out.push_str(folder);
                out.push('\n');
            }
            let marker = if i == self.selected { '>' } else { ' ' };
            out.push_str(&format!("{} {}: {}\n", marker, b.name, (b.get)(params)));
        }
        out
    }
}

/// Each street light control touches one field, leaving the others as they are
fn update_lights(scene: &mut NightStreet, edit: impl Fn(&mut PointLight)) {
    for &key in &scene.handles.point_lights {
        if let Some(light) = scene.graph.get_mut(key).and_then(|n| n.as_point_light_mut()) {
            edit(light);
        }
    }
}

fn snap(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let snapped = if step > 0.0 {
        min + ((value - min) / step).round() * step
    } else {
        value
    };
    snapped.clamp(min, max)
}

/// Rotate the hue of an sRGB color by `degrees`, keeping saturation and lightness
fn rotate_hue(rgb: u32, degrees: f32) -> u32 {
    let [r, g, b] = [16, 8, 0].map(|s| ((rgb >> s) & 0xff) as f32 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d == 0.0 {
        return rgb;
    }
    let s = d / (1.0 - (2.0 * l - 1.0).abs());
    let h = if max == r {
        60.0 * ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    let h = (h + degrees).rem_euclid(360.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let channel = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}
