#![forbid(unsafe_code)]

//! JSON and TOML codecs for knob snapshots.
//!
//! Encoding takes a rendered [`ValueMap`](knob_core::ValueMap); decoding
//! takes a [`Definition`](knob_core::Definition) and produces a map ready for
//! [`Definer::define`](knob_core::Definer::define) or
//! [`Definer::try_define`](knob_core::Definer::try_define). Reading and
//! writing files is left to the caller.
//!
//! # Feature Flags
//!
//! | Feature | Module |
//! |---------|--------|
//! | `json` (default) | [`json`] |
//! | `toml` | [`toml`] |

pub mod error;
#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "toml")]
pub mod toml;

pub use error::CodecError;
