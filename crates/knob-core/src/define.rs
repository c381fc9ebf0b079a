//! Name-keyed assignment of raw values onto previews.
//!
//! A [`Definer`] is the inbound half of the external boundary: a codec uses
//! its [`definition`](Definer::definition) to decode an untyped document,
//! then hands the decoded map to [`define`](Definer::define) (strict) or
//! [`try_define`](Definer::try_define) (best effort).
//!
//! # Invariants
//!
//! 1. Previews whose name is absent from the input are left untouched.
//! 2. Neither operation is atomic: assignments made before a failure stay.
//! 3. `try_define` attempts every matched preview regardless of earlier
//!    failures and returns `true` only if all of them succeeded.
//! 4. Only previews change. Committed values move on the next
//!    `Manager::apply_preview`.

use std::fmt;
use std::rc::Rc;

use crate::config::KnobConfig;
use crate::error::Result;
use crate::setting::PreviewSource;
use crate::value::{Definition, ValueMap};

/// Assigns raw name → value input onto a collection of previews.
pub struct Definer {
    previews: Vec<Rc<dyn PreviewSource>>,
    definition: Definition,
}

impl Definer {
    /// Build a definer under the default [`KnobConfig`].
    pub fn new<I>(previews: I) -> Result<Self>
    where
        I: IntoIterator<Item = Rc<dyn PreviewSource>>,
    {
        Self::with_config(previews, &KnobConfig::default())
    }

    /// Build a definer, checking names against `config.duplicates`.
    pub fn with_config<I>(previews: I, config: &KnobConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Rc<dyn PreviewSource>>,
    {
        let previews: Vec<Rc<dyn PreviewSource>> = previews.into_iter().collect();
        config.duplicates.check(previews.iter().map(|p| p.name()))?;
        let definition = previews
            .iter()
            .map(|p| (p.name().to_owned(), p.value_kind()))
            .collect();
        Ok(Self {
            previews,
            definition,
        })
    }

    /// Name → declared kind for every preview.
    #[must_use]
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Assign every matched preview, stopping at the first failure
    /// (`TypeMismatch` or `Validation`).
    pub fn define(&self, values: &ValueMap) -> Result<()> {
        for preview in &self.previews {
            let Some(value) = values.get(preview.name()) else {
                continue;
            };
            preview.set_preview_value(value.clone())?;
        }
        Ok(())
    }

    /// Assign every matched preview without stopping; `true` if all
    /// matched assignments succeeded.
    pub fn try_define(&self, values: &ValueMap) -> bool {
        let mut successful = true;
        for preview in &self.previews {
            let Some(value) = values.get(preview.name()) else {
                continue;
            };
            if let Err(err) = preview.set_preview_value(value.clone()) {
                tracing::debug!(setting = preview.name(), %err, "definition rejected");
                successful = false;
            }
        }
        successful
    }

    /// Input keys that match no preview, in key order.
    #[must_use]
    pub fn unknown_keys<'a>(&self, values: &'a ValueMap) -> Vec<&'a str> {
        values
            .keys()
            .filter(|key| !self.definition.contains_key(key.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl fmt::Debug for Definer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definer")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}
