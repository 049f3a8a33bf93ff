// src/ui/panel.rs
//! Lighting control panel
//!
//! The panel never touches scene state. It reads a [`LightingControls`]
//! snapshot and turns what the user changed into [`InputEvent`]s, which the
//! scene applies at the start of the next frame like any other input.

use crate::gfx::scene::SceneState;
use crate::input::{InputEvent, InputQueue};

/// What the panel displays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingControls {
    /// Light angle in degrees, `0..360`.
    pub angle_degrees: f32,
    pub color: [f32; 3],
    pub lighting_on: bool,
    pub spotlight_on: bool,
    pub normal_visualization: bool,
}

impl LightingControls {
    pub fn from_state(state: &SceneState) -> Self {
        let lighting = &state.lighting;
        Self {
            angle_degrees: state.animator.light.slider_degrees(),
            color: lighting.point.color,
            lighting_on: lighting.lighting_on,
            spotlight_on: lighting.spotlight_on,
            normal_visualization: lighting.normal_visualization,
        }
    }
}

/// What the user did with the panel this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelEdits {
    pub angle_degrees: Option<f32>,
    pub color: Option<[f32; 3]>,
    pub toggle_lighting: bool,
    pub toggle_normal_visualization: bool,
    pub toggle_spotlight: bool,
}

impl PanelEdits {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Events for the edits, in panel order. Toggles invert the displayed state.
    pub fn into_events(self, shown: &LightingControls) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if let Some(degrees) = self.angle_degrees {
            events.push(InputEvent::LightAngle(degrees.clamp(0.0, 360.0)));
        }
        if let Some(color) = self.color {
            events.push(InputEvent::LightColor(color.map(|c| c.clamp(0.0, 1.0))));
        }
        if self.toggle_lighting {
            events.push(InputEvent::SetLighting(!shown.lighting_on));
        }
        if self.toggle_normal_visualization {
            events.push(InputEvent::SetNormalVisualization(
                !shown.normal_visualization,
            ));
        }
        if self.toggle_spotlight {
            events.push(InputEvent::SetSpotlight(!shown.spotlight_on));
        }
        events
    }
}

/// Draws the lighting window and queues an event for every change.
pub fn lighting_panel(ui: &imgui::Ui, shown: &LightingControls, queue: &mut InputQueue) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    let mut edits = PanelEdits::default();

    ui.window("Lighting")
        .size([320.0, 300.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            let mut angle = shown.angle_degrees;
            if ui.slider("Light angle", 0.0, 360.0, &mut angle) {
                edits.angle_degrees = Some(angle);
            }

            ui.separator();
            ui.text("Light color");
            let mut color = shown.color;
            let mut color_changed = false;
            for (channel, label) in color.iter_mut().zip(["Red", "Green", "Blue"]) {
                color_changed |= ui.slider(label, 0.0, 1.0, channel);
            }
            if color_changed {
                edits.color = Some(color);
            }

            ui.separator();
            edits.toggle_lighting = ui.button("Toggle Lighting");
            ui.same_line();
            ui.text(on_off(shown.lighting_on));

            edits.toggle_normal_visualization = ui.button("Toggle Normals");
            ui.same_line();
            ui.text(on_off(shown.normal_visualization));

            edits.toggle_spotlight = ui.button("Toggle Spotlight");
            ui.same_line();
            ui.text(on_off(shown.spotlight_on));
        });

    if !edits.is_empty() {
        for event in edits.into_events(shown) {
            queue.push(event);
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn shown() -> LightingControls {
        LightingControls::from_state(&SceneState::new(&AppConfig::default()))
    }

    #[test]
    fn controls_reflect_the_initial_scene() {
        let controls = shown();
        assert_eq!(controls.angle_degrees, 0.0);
        assert_eq!(controls.color, [1.0, 1.0, 1.0]);
        assert!(controls.lighting_on);
        assert!(!controls.spotlight_on);
        assert!(!controls.normal_visualization);
    }

    #[test]
    fn no_edits_no_events() {
        let edits = PanelEdits::default();
        assert!(edits.is_empty());
        assert!(edits.into_events(&shown()).is_empty());
    }

    #[test]
    fn toggles_invert_what_is_shown() {
        let edits = PanelEdits {
            toggle_lighting: true,
            toggle_spotlight: true,
            ..Default::default()
        };
        assert_eq!(
            edits.into_events(&shown()),
            vec![InputEvent::SetLighting(false), InputEvent::SetSpotlight(true)]
        );
    }

    #[test]
    fn slider_values_are_clamped_to_their_ranges() {
        let edits = PanelEdits {
            angle_degrees: Some(400.0),
            color: Some([1.5, -0.2, 0.5]),
            ..Default::default()
        };
        assert_eq!(
            edits.into_events(&shown()),
            vec![
                InputEvent::LightAngle(360.0),
                InputEvent::LightColor([1.0, 0.0, 0.5]),
            ]
        );
    }

    #[test]
    fn panel_events_drive_the_scene() {
        let mut state = SceneState::new(&AppConfig::default());
        let mut queue = InputQueue::new();
        let edits = PanelEdits {
            angle_degrees: Some(90.0),
            toggle_normal_visualization: true,
            ..Default::default()
        };
        for event in edits.into_events(&LightingControls::from_state(&state)) {
            queue.push(event);
        }

        state.drain_input(&mut queue);
        let controls = LightingControls::from_state(&state);
        assert!((controls.angle_degrees - 90.0).abs() < 1e-3);
        assert!(controls.normal_visualization);
    }
}
