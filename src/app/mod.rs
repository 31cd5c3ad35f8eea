pub mod setup;
pub mod display;

pub use setup::setup;
pub use display::sync_vsync_settings;
