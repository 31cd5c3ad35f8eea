//! Debug dump (F3 default): writes diagnostics, entity count, memory usage
//! and the player's physics state to a timestamped text file in `./debug-dumps/`.
//!
//! Handy for capturing the exact state behind a movement bug report without
//! attaching a debugger.
use bevy::diagnostic::{Diagnostic, DiagnosticPath, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::physics::{PhysicsConfig, RigidBody};
use crate::player::Player;
use crate::settings::Settings;
use crate::ui::describe_player;

pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

/// Process and system memory, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    pub process: u64,
    pub process_virtual: u64,
    pub system_total: u64,
    pub system_used: u64,
}

impl MemoryUsage {
    #[must_use]
    pub fn sample() -> Self {
        let mut sys = System::new();
        let pid = Pid::from_u32(std::process::id());
        sys.refresh_memory();
        sys.refresh_process(pid);
        let proc = sys.process(pid);
        Self {
            process: proc.map_or(0, ProcessExt::memory),
            process_virtual: proc.map_or(0, ProcessExt::virtual_memory),
            system_total: sys.total_memory(),
            system_used: sys.used_memory(),
        }
    }
}

fn bytes_to_mb(bytes: u64) -> String {
    format!("{:.2} MB", (bytes as f64) / 1024.0 / 1024.0)
}

/// Everything that goes into one dump.
pub struct DumpSnapshot {
    pub taken_at: SystemTime,
    pub fps: f64,
    pub frame_time_ms: f64,
    pub entity_count: usize,
    pub memory: MemoryUsage,
    pub physics: PhysicsConfig,
    pub players: Vec<String>,
}

impl DumpSnapshot {
    #[must_use]
    pub fn epoch_secs(&self) -> u64 {
        self.taken_at.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
    }

    #[must_use]
    pub fn render(&self) -> String {
        let dt: DateTime<Utc> = DateTime::from(self.taken_at);
        let mut out = String::new();
        writeln!(out, "Debug dump: {}", self.epoch_secs()).ok();
        writeln!(out, "Timestamp: {}", dt.format("%Y-%m-%d %H:%M:%S")).ok();
        writeln!(out, "FPS: {:.1}, frame_time: {:.2} ms", self.fps, self.frame_time_ms).ok();
        writeln!(out, "Entities: {}", self.entity_count).ok();
        writeln!(
            out,
            "Process memory: {} (virtual {})",
            bytes_to_mb(self.memory.process),
            bytes_to_mb(self.memory.process_virtual)
        )
        .ok();
        writeln!(
            out,
            "System memory: total={} used={}",
            bytes_to_mb(self.memory.system_total),
            bytes_to_mb(self.memory.system_used)
        )
        .ok();
        writeln!(
            out,
            "Physics: gravity={:.2} restitution={:.2} rolling_friction={:.2} linear_damping={:.2}",
            self.physics.gravity.y, self.physics.restitution, self.physics.rolling_friction, self.physics.linear_damping
        )
        .ok();

        if self.players.is_empty() {
            writeln!(out, "\nNo player spawned").ok();
        }
        for (i, player) in self.players.iter().enumerate() {
            writeln!(out, "\nPlayer {i}:\n{player}").ok();
        }
        out
    }

    /// Write the dump into `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the directory or file can't be written.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let file = dir.join(format!("debug-{}.txt", self.epoch_secs()));
        fs::write(&file, self.render())?;
        Ok(file)
    }
}

/// Write a debug dump when the dump key is pressed.
#[allow(clippy::needless_pass_by_value)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    diagnostics: Res<DiagnosticsStore>,
    physics: Option<Res<PhysicsConfig>>,
    entities: Query<Entity>,
    players: Query<(&Transform, &RigidBody, &Player)>,
) {
    if !keys.just_pressed(settings.key_for("dump_debug", KeyCode::F3)) {
        return;
    }

    let smoothed = |path: &DiagnosticPath| diagnostics.get(path).and_then(Diagnostic::smoothed).unwrap_or(0.0);
    let snapshot = DumpSnapshot {
        taken_at: SystemTime::now(),
        fps: smoothed(&FrameTimeDiagnosticsPlugin::FPS),
        frame_time_ms: smoothed(&FrameTimeDiagnosticsPlugin::FRAME_TIME),
        entity_count: entities.iter().count(),
        memory: MemoryUsage::sample(),
        physics: physics.map(|p| (*p).clone()).unwrap_or_default(),
        players: players.iter().map(|(tf, body, player)| describe_player(tf, body, player)).collect(),
    };

    match snapshot.write_to(Path::new(DUMP_DIR)) {
        Ok(file) => info!("wrote debug dump: {}", file.display()),
        Err(e) => error!("debug dump: failed to write into '{DUMP_DIR}': {e}"),
    }
}
