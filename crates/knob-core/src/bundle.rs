//! Lazily wired manager, renderer and reporter.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;
use crate::registry::SettingSet;
use crate::render::{Renderer, Reporter};
use crate::setting::CommitSource;

/// A manager plus its renderer and reporter, created on first use.
///
/// The reporter is always paired with the bundle's own renderer, so the
/// binding check of [`Reporter::with_renderer`] cannot fail here.
pub struct SettingsBundle {
    manager: Manager,
    renderer: OnceCell<Renderer>,
    reporter: OnceCell<Reporter>,
}

impl SettingsBundle {
    /// Build the manager from `sources`.
    pub fn new<I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = Rc<dyn CommitSource>>,
    {
        Manager::new(sources).map(Self::from_manager)
    }

    /// Build the manager from a registered set.
    pub fn from_set(set: SettingSet) -> Result<Self> {
        set.into_manager().map(Self::from_manager)
    }

    #[must_use]
    pub fn from_manager(manager: Manager) -> Self {
        Self {
            manager,
            renderer: OnceCell::new(),
            reporter: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// The bundle's renderer, created on first call.
    pub fn renderer(&self) -> &Renderer {
        self.renderer.get_or_init(|| Renderer::new(&self.manager))
    }

    /// The bundle's reporter, created on first call over [`renderer`](Self::renderer).
    pub fn reporter(&self) -> &Reporter {
        self.reporter.get_or_init(|| {
            tracing::trace!("bundle reporter created");
            Reporter::bind(&self.manager, self.renderer().clone())
        })
    }
}

impl fmt::Debug for SettingsBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsBundle")
            .field("manager", &self.manager)
            .field("renderer", &self.renderer.get().is_some())
            .field("reporter", &self.reporter.get().is_some())
            .finish()
    }
}
