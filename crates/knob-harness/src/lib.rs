#![forbid(unsafe_code)]

//! Test harness and reference fixture settings for knob.
//!
//! - [`fixtures`]: a small display-settings panel (fullscreen, volume,
//!   brightness, window mode) used across crate tests
//! - [`Recorder`]: counts and captures notifications
//! - [`strategies`]: proptest strategies over raw values and preview edits
//! - [`init_tracing`]: opt-in log output for debugging a failing test

pub mod fixtures;
pub mod recorder;
pub mod strategies;

pub use fixtures::{
    BrightnessSetting, DisplaySettings, FullscreenSetting, VolumeSetting, WindowMode,
    WindowModePreview,
};
pub use recorder::Recorder;

use std::sync::Once;

/// Install a `fmt` subscriber writing through the test harness.
///
/// Filtered by `RUST_LOG` (default `warn`). Safe to call from every test;
/// only the first call installs anything. The subscriber is global, so do
/// not call this from a test binary that also uses `#[traced_test]`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
