//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`). Every field
//! carries a serde default so a partial file only overrides what it names.
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_vsync")]
    pub vsync: bool, // Enable vertical sync to cap FPS to the display refresh rate.
}

impl GraphicsSettings {
    fn default_vsync() -> bool { true }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self { vsync: Self::default_vsync() }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool, // Invert mouse Y axis
    #[serde(default)]
    pub invert_x: bool, // Invert mouse X axis
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Mouse sensitivity multiplier
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 20.0 }

    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W"),
            ("back", "S"),
            ("left", "A"),
            ("right", "D"),
            ("jump", "Space"),
            ("pause", "Escape"),
            ("toggle_debug", "F1"),
            ("toggle_contacts", "F2"),
            ("dump_debug", "F3"),
        ]
        .into_iter()
        .map(|(action, key)| (action.to_string(), key.to_string()))
        .collect()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            mouse_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Tuning for the player ball. `move_force` and `jump_impulse` are per unit
/// mass; the controller multiplies them by the body mass once at spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    #[serde(default = "PlayerSettings::default_mass")]
    pub mass: f32, // Mass of the ball rigid body (kg)
    #[serde(default = "PlayerSettings::default_radius")]
    pub radius: f32, // Collision and visual radius of the ball
    #[serde(default = "PlayerSettings::default_move_force")]
    pub move_force: f32, // Lateral force per unit mass (m/s^2 at full input)
    #[serde(default = "PlayerSettings::default_jump_impulse")]
    pub jump_impulse: f32, // Jump impulse per unit mass (m/s of upward velocity change)
    #[serde(default = "PlayerSettings::default_max_jump_count")]
    pub max_jump_count: u32, // Jumps available before touching the ground again
    #[serde(default = "PlayerSettings::default_kill_height")]
    pub kill_height: f32, // Falling below this height respawns the ball
}

impl PlayerSettings {
    fn default_mass() -> f32 { 2.0 }
    fn default_radius() -> f32 { 0.5 }
    fn default_move_force() -> f32 { 12.0 }
    fn default_jump_impulse() -> f32 { 6.5 }
    fn default_max_jump_count() -> u32 { 1 }
    fn default_kill_height() -> f32 { -20.0 }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            mass: Self::default_mass(),
            radius: Self::default_radius(),
            move_force: Self::default_move_force(),
            jump_impulse: Self::default_jump_impulse(),
            max_jump_count: Self::default_max_jump_count(),
            kill_height: Self::default_kill_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_arm_length")]
    pub arm_length: f32, // Distance from the ball to the camera along the spring arm
    #[serde(default = "CameraSettings::default_pitch_degrees")]
    pub pitch_degrees: f32, // Initial downward tilt of the spring arm
}

impl CameraSettings {
    fn default_arm_length() -> f32 { 8.0 }
    fn default_pitch_degrees() -> f32 { -25.0 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            arm_length: Self::default_arm_length(),
            pitch_degrees: Self::default_pitch_degrees(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSettings {
    #[serde(default = "PhysicsSettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration applied to simulated bodies (negative is down)
    #[serde(default = "PhysicsSettings::default_restitution")]
    pub restitution: f32, // Bounciness of contacts, 0 = no bounce
    #[serde(default = "PhysicsSettings::default_rolling_friction")]
    pub rolling_friction: f32, // Tangential velocity lost per second while in contact
    #[serde(default = "PhysicsSettings::default_linear_damping")]
    pub linear_damping: f32, // Velocity lost per second regardless of contact
}

impl PhysicsSettings {
    fn default_gravity() -> f32 { -19.6 }
    fn default_restitution() -> f32 { 0.1 }
    fn default_rolling_friction() -> f32 { 0.8 }
    fn default_linear_damping() -> f32 { 0.05 }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            restitution: Self::default_restitution(),
            rolling_friction: Self::default_rolling_friction(),
            linear_damping: Self::default_linear_damping(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub player: PlayerSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub physics: PhysicsSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Resolve the key bound to `action`, falling back to `default` when the
    /// action is unbound or its identifier is not recognised.
    #[must_use]
    pub fn key_for(&self, action: &str, default: KeyCode) -> KeyCode {
        self.controls
            .keybinds
            .get(action)
            .and_then(|s| Self::keycode_from_str(s))
            .unwrap_or(default)
    }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode`.
    ///
    /// Letters and digits are accepted as single characters (`"W"`, `"3"`),
    /// everything else by name (`"Space"`, `"F1"`, `"LShift"`). Matching is
    /// case-insensitive.
    ///
    /// # Returns
    /// The matching `KeyCode`, or `None` if the string names no known key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return FUNCTION.get(n.checked_sub(1)?).copied();
        }

        Some(match s.as_str() {
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" => KeyCode::Backspace,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            _ => return None,
        })
    }
}

pub mod loader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_digits_and_names() {
        assert_eq!(Settings::keycode_from_str("w"), Some(KeyCode::KeyW));
        assert_eq!(Settings::keycode_from_str("7"), Some(KeyCode::Digit7));
        assert_eq!(Settings::keycode_from_str("Space"), Some(KeyCode::Space));
        assert_eq!(Settings::keycode_from_str("f3"), Some(KeyCode::F3));
        assert_eq!(Settings::keycode_from_str("F12"), Some(KeyCode::F12));
        assert_eq!(Settings::keycode_from_str("ArrowUp"), Some(KeyCode::ArrowUp));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert_eq!(Settings::keycode_from_str("F0"), None);
        assert_eq!(Settings::keycode_from_str("F13"), None);
        assert_eq!(Settings::keycode_from_str("Hyper"), None);
        assert_eq!(Settings::keycode_from_str(""), None);
    }

    #[test]
    fn key_for_falls_back_on_bad_binding() {
        let mut settings = Settings::default();
        settings.controls.keybinds.insert("jump".into(), "NotAKey".into());
        assert_eq!(settings.key_for("jump", KeyCode::Space), KeyCode::Space);
        assert_eq!(settings.key_for("forward", KeyCode::ArrowUp), KeyCode::KeyW);
        assert_eq!(settings.key_for("missing", KeyCode::KeyQ), KeyCode::KeyQ);
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let parsed: Settings = ron::from_str("(player: (max_jump_count: 2))").unwrap();
        assert_eq!(parsed.player.max_jump_count, 2);
        assert_eq!(parsed.player.mass, PlayerSettings::default().mass);
        assert_eq!(parsed.camera, CameraSettings::default());
        assert_eq!(parsed.controls.keybinds.get("jump").map(String::as_str), Some("Space"));
    }
}
