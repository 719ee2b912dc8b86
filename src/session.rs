use thiserror::Error;

use crate::dom::Document;
use crate::location::{HistoryMode, MemoryHistory, NavigationStore};
use crate::navigation::{ConfigError, NavigationController, NavigationOptions};
use crate::records::{
    load_records, LoadReport, RecordSource, RecordsEngine, RecordsError, RecordsOptions, UrlUpdate,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("navigation setup failed: {0}")]
    Navigation(#[from] ConfigError),
}

/// Something the user or the browser did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Click on the nav trigger at this index.
    NavClick(usize),
    /// The hash was edited to this page id (a new history entry).
    HashNavigate(String),
    /// Click on a leaderboard row's arrow.
    OpenProfile(String),
    /// Click on the profile back control.
    ProfileBack,
    HistoryBack,
    HistoryForward,
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub navigation: NavigationOptions,
    pub records: RecordsOptions,
}

/// One page lifetime: the document, its history, and both controllers.
///
/// Events are handled one at a time, to completion, in the order dispatched.
#[derive(Debug)]
pub struct Session {
    document: Document,
    history: MemoryHistory,
    navigation: Option<NavigationController>,
    records: Option<RecordsEngine>,
}

impl Session {
    /// Initializes navigation and records independently. Only a navigation
    /// markup error aborts.
    pub fn start(
        mut document: Document,
        mut history: MemoryHistory,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let navigation =
            NavigationController::init(&mut document, &mut history, &options.navigation)?;
        let records = RecordsEngine::mount(&mut document, options.records);
        Ok(Self {
            document,
            history,
            navigation,
            records,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    pub fn navigation(&self) -> Option<&NavigationController> {
        self.navigation.as_ref()
    }

    pub fn records(&self) -> Option<&RecordsEngine> {
        self.records.as_ref()
    }

    /// Fetches and applies the records. Skipped when the records feature is
    /// not mounted.
    pub async fn load(&mut self, source: &RecordSource, client: &reqwest::Client) {
        if self.records.is_none() {
            return;
        }
        let result = load_records(source, client).await;
        self.finish_load(result);
    }

    pub fn finish_load(&mut self, result: Result<LoadReport, RecordsError>) {
        if let Some(records) = self.records.as_mut() {
            records.finish_load(&mut self.document, &self.history, result);
        }
    }

    /// Index of the first nav trigger targeting `page_id`.
    pub fn trigger_for(&self, page_id: &str) -> Option<usize> {
        self.document
            .nav_triggers
            .iter()
            .position(|t| t.target.as_deref() == Some(page_id))
    }

    /// Runs one event to completion. Returns whether anything changed.
    pub fn dispatch(&mut self, event: Event) -> bool {
        tracing::debug!(?event, "dispatch");
        match event {
            Event::NavClick(index) => match self.navigation.as_ref() {
                Some(nav) => nav.on_trigger_click(&mut self.document, &mut self.history, index),
                None => false,
            },
            Event::HashNavigate(page_id) => {
                self.history.set_hash(page_id.trim(), HistoryMode::Push);
                self.hash_changed()
            }
            Event::OpenProfile(name) => match self.records.as_mut() {
                Some(records) => records.open_profile(
                    &mut self.document,
                    &mut self.history,
                    &name,
                    UrlUpdate::Push,
                ),
                None => false,
            },
            Event::ProfileBack => match self.records.as_mut() {
                Some(records) => records.back(&mut self.document, &mut self.history),
                None => false,
            },
            Event::HistoryBack => self.traverse(-1),
            Event::HistoryForward => self.traverse(1),
        }
    }

    fn traverse(&mut self, delta: isize) -> bool {
        let Some(traversal) = self.history.go(delta) else {
            return false;
        };
        let mut changed = self.pop_state();
        if traversal.hash_changed {
            changed |= self.hash_changed();
        }
        changed
    }

    fn pop_state(&mut self) -> bool {
        match self.records.as_mut() {
            Some(records) => records.on_pop_state(&mut self.document, &mut self.history),
            None => false,
        }
    }

    fn hash_changed(&mut self) -> bool {
        match self.navigation.as_ref() {
            Some(nav) => nav.on_hash_change(&mut self.document, &mut self.history),
            None => false,
        }
    }
}
