//! External key derivation from a setting's Rust type name.
//!
//! The key is what renderers, definers and codecs use to address a setting,
//! so a `VolumeSetting` and a `VolumePreview` both answer to `"Volume"`.
//!
//! # Algorithm
//!
//! 1. Cut at the first `<` (generic arguments).
//! 2. Keep the last `::` path segment.
//! 3. Find the rightmost `setting` or `preview`, compared ASCII
//!    case-insensitively, that does not start the name, and truncate there.
//!    `VolumeSettingExtra` becomes `Volume`; a bare `Setting` is kept.

/// Suffixes stripped from type names.
pub const CONVENTIONAL_SUFFIXES: [&str; 2] = ["setting", "preview"];

/// Derive the external key from a (possibly path-qualified) type name.
///
/// ```
/// use knob_core::derive_name;
///
/// assert_eq!(derive_name("game::audio::VolumeSetting"), "Volume");
/// assert_eq!(derive_name("VolumePreview"), "Volume");
/// assert_eq!(derive_name("Volume"), "Volume");
/// assert_eq!(derive_name("ui::Scale<f32>"), "Scale");
/// ```
#[must_use]
pub fn derive_name(type_name: &str) -> &str {
    let base = match type_name.find('<') {
        Some(generic) => &type_name[..generic],
        None => type_name,
    };
    let base = base.rsplit("::").next().unwrap_or(base);
    strip_conventional_suffix(base)
}

fn strip_conventional_suffix(name: &str) -> &str {
    // ASCII lowercasing keeps byte offsets, so indices map back onto `name`.
    let lowered = name.to_ascii_lowercase();
    let cut = CONVENTIONAL_SUFFIXES
        .iter()
        .filter_map(|suffix| lowered.rfind(suffix))
        .filter(|&index| index > 0)
        .max();
    match cut {
        Some(index) => &name[..index],
        None => name,
    }
}
