use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{Window, WindowPlugin};
use rollaball::debug::DebugDumpPlugin;
use rollaball::physics::{sync_physics_settings, PhysicsPlugin};
use rollaball::player::PlayerPlugin;
use rollaball::settings::loader::{self as settings_loader, SETTINGS_DIR};
use rollaball::ui::DebugOverlayPlugin;

mod app;

fn main() {
    let settings = settings_loader::load_settings_from_dir(SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Roll a Ball".into(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: crate::app::display::present_mode(settings.graphics.vsync),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins((PhysicsPlugin, PlayerPlugin))
        .add_plugins((DebugOverlayPlugin, DebugDumpPlugin));

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, crate::app::setup);
    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, sync_physics_settings);
    app.add_systems(Update, crate::app::sync_vsync_settings);

    app.run();
}
