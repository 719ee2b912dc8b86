use std::collections::HashSet;

use thiserror::Error;

use crate::dom::{Document, TriggerRole};
use crate::location::{HistoryMode, NavigationStore};

pub const DEFAULT_PAGE: &str = "home";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("each page section must have an id (section {index} has none)")]
    MissingPageId { index: usize },

    #[error("page id '{id}' is used by more than one section")]
    DuplicatePageId { id: String },

    #[error("default page '{id}' does not match any page section")]
    UnknownDefaultPage { id: String },
}

#[derive(Clone, Debug)]
pub struct NavigationOptions {
    pub default_page: String,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            default_page: DEFAULT_PAGE.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivateOptions {
    pub update_hash: bool,
}

impl Default for ActivateOptions {
    fn default() -> Self {
        Self { update_hash: true }
    }
}

/// Keeps exactly one page section visible, mirrored onto the nav triggers and
/// the URL hash.
#[derive(Clone, Debug)]
pub struct NavigationController {
    page_ids: Vec<String>,
    default_page: String,
}

impl NavigationController {
    /// Validates the page markup and activates the initial page.
    ///
    /// A document without page sections yields `Ok(None)`.
    pub fn init<S: NavigationStore + ?Sized>(
        document: &mut Document,
        store: &mut S,
        options: &NavigationOptions,
    ) -> Result<Option<Self>, ConfigError> {
        if document.pages.is_empty() {
            return Ok(None);
        }

        let mut page_ids = Vec::with_capacity(document.pages.len());
        let mut seen = HashSet::new();
        for (index, page) in document.pages.iter().enumerate() {
            let id = match page.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
                Some(id) => id,
                None => return Err(ConfigError::MissingPageId { index }),
            };
            if !seen.insert(id) {
                return Err(ConfigError::DuplicatePageId { id: id.to_string() });
            }
            page_ids.push(id.to_string());
        }

        let default_page = options.default_page.trim().to_string();
        if !page_ids.contains(&default_page) {
            return Err(ConfigError::UnknownDefaultPage { id: default_page });
        }

        let controller = Self {
            page_ids,
            default_page,
        };

        match store.hash().filter(|id| controller.page_exists(id)) {
            Some(initial) => {
                controller.activate(
                    document,
                    store,
                    &initial,
                    ActivateOptions { update_hash: false },
                );
            }
            None => {
                let default_page = controller.default_page.clone();
                controller.activate(document, store, &default_page, ActivateOptions::default());
            }
        }
        Ok(Some(controller))
    }

    pub fn page_ids(&self) -> &[String] {
        &self.page_ids
    }

    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    pub fn page_exists(&self, page_id: &str) -> bool {
        self.page_ids.iter().any(|id| id == page_id)
    }

    /// Shows `page_id` and hides every other section. Unknown ids are ignored.
    pub fn activate<S: NavigationStore + ?Sized>(
        &self,
        document: &mut Document,
        store: &mut S,
        page_id: &str,
        options: ActivateOptions,
    ) -> bool {
        if !self.page_exists(page_id) {
            return false;
        }

        for page in document.pages.iter_mut() {
            let is_active = page.id.as_deref().map(str::trim) == Some(page_id);
            page.active = is_active;
            page.hidden = !is_active;
        }

        for trigger in document.nav_triggers.iter_mut() {
            let is_active = trigger.target.as_deref() == Some(page_id);
            if trigger.role == Some(TriggerRole::Tab) {
                trigger.aria_selected = Some(is_active);
                trigger.tab_index = Some(if is_active { 0 } else { -1 });
            }
            trigger.active = is_active;
        }

        if options.update_hash {
            store.set_hash(page_id, HistoryMode::Replace);
        }
        tracing::debug!(page = page_id, update_hash = options.update_hash, "page activated");
        true
    }

    /// A click on the nav trigger at `index`.
    pub fn on_trigger_click<S: NavigationStore + ?Sized>(
        &self,
        document: &mut Document,
        store: &mut S,
        index: usize,
    ) -> bool {
        let target = match document
            .nav_triggers
            .get(index)
            .and_then(|t| t.target.clone())
        {
            Some(target) => target,
            None => return false,
        };
        if !self.activate(document, store, &target, ActivateOptions::default()) {
            return false;
        }
        document.scroll_to_top();
        true
    }

    /// The URL hash changed; follow it without touching history.
    pub fn on_hash_change<S: NavigationStore + ?Sized>(
        &self,
        document: &mut Document,
        store: &mut S,
    ) -> bool {
        match store.hash() {
            Some(page_id) => self.activate(
                document,
                store,
                &page_id,
                ActivateOptions { update_hash: false },
            ),
            None => false,
        }
    }
}
