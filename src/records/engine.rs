use serde::Serialize;

use super::assets::AssetResolver;
use super::loader::RecordsError;
use super::model::{LoadReport, Record, Status};
use super::ranking::{compare_records, group_by_person, Leader};
use super::render::{self, LOADING, LOADING_PEOPLE, LOADING_RECORDS};
use crate::dom::{ContainerId, Content, Document, StatId};
use crate::location::{HistoryMode, NavigationStore};

pub const PERSON_PARAM: &str = "person";

/// Which half of the people panel is showing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "person", rename_all = "lowercase")]
pub enum PeopleView {
    Leaderboard,
    Profile(String),
}

/// How a people-view transition is reflected in the URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlUpdate {
    Push,
    Replace,
    Skip,
}

impl UrlUpdate {
    fn mode(self) -> Option<HistoryMode> {
        match self {
            UrlUpdate::Push => Some(HistoryMode::Push),
            UrlUpdate::Replace => Some(HistoryMode::Replace),
            UrlUpdate::Skip => None,
        }
    }
}

#[derive(Clone, Debug)]
enum EngineState {
    Loading,
    Ready {
        records: Vec<Record>,
        leaders: Vec<Leader>,
        view: PeopleView,
    },
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct RecordsOptions {
    pub assets: AssetResolver,
    pub person_param: String,
}

impl RecordsOptions {
    pub fn new(assets: AssetResolver) -> Self {
        Self {
            assets,
            person_param: PERSON_PARAM.to_string(),
        }
    }
}

/// Wires loaded records into the document and owns the leaderboard/profile
/// sub-state.
#[derive(Clone, Debug)]
pub struct RecordsEngine {
    options: RecordsOptions,
    state: EngineState,
}

impl RecordsEngine {
    /// Returns `None` when any output container is missing; the page simply
    /// has no records feature. Otherwise paints the loading placeholders.
    pub fn mount(document: &mut Document, options: RecordsOptions) -> Option<Self> {
        let missing: Vec<&str> = ContainerId::ALL
            .iter()
            .filter(|id| !document.has_container(**id))
            .map(|id| id.element_id())
            .collect();
        if !missing.is_empty() {
            tracing::debug!(?missing, "records containers not present, skipping");
            return None;
        }

        document.set_content(
            ContainerId::RecordsGrid,
            Content::Empty(LOADING_RECORDS.to_string()),
        );
        document.set_content(
            ContainerId::FormerGrid,
            Content::Empty(LOADING_RECORDS.to_string()),
        );
        document.set_content(
            ContainerId::LeaderboardList,
            Content::Empty(LOADING_PEOPLE.to_string()),
        );
        document.set_content(
            ContainerId::ProfileGrid,
            Content::Empty(LOADING.to_string()),
        );

        Some(Self {
            options,
            state: EngineState::Loading,
        })
    }

    pub fn options(&self) -> &RecordsOptions {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, EngineState::Loading)
    }

    pub fn records(&self) -> &[Record] {
        match &self.state {
            EngineState::Ready { records, .. } => records,
            _ => &[],
        }
    }

    pub fn leaders(&self) -> &[Leader] {
        match &self.state {
            EngineState::Ready { leaders, .. } => leaders,
            _ => &[],
        }
    }

    pub fn view(&self) -> Option<&PeopleView> {
        match &self.state {
            EngineState::Ready { view, .. } => Some(view),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            EngineState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn finish_load<S: NavigationStore + ?Sized>(
        &mut self,
        document: &mut Document,
        store: &S,
        result: Result<LoadReport, RecordsError>,
    ) {
        match result {
            Ok(report) => self.render_loaded(document, store, report.records),
            Err(e) => self.render_failure(document, &e.to_string()),
        }
    }

    fn render_loaded<S: NavigationStore + ?Sized>(
        &mut self,
        document: &mut Document,
        store: &S,
        mut records: Vec<Record>,
    ) {
        records.sort_by(compare_records);
        update_stats(document, &records);

        let assets = &self.options.assets;
        document.set_content(ContainerId::RecordsGrid, render::grid(&records, assets));
        let former: Vec<Record> = records
            .iter()
            .filter(|r| r.status == Status::Former)
            .cloned()
            .collect();
        document.set_content(ContainerId::FormerGrid, render::grid(&former, assets));

        let leaders = group_by_person(&records);
        document.set_content(ContainerId::LeaderboardList, render::leaderboard(&leaders));

        self.state = EngineState::Ready {
            records,
            leaders,
            view: PeopleView::Leaderboard,
        };

        // leaderboard first, so an unknown person in the URL leaves it showing
        document.set_hidden(ContainerId::PeopleLeaderboard, false);
        document.set_hidden(ContainerId::PeopleProfile, true);
        if let Some(person) = store.query_param(&self.options.person_param) {
            if self.show_profile(document, &person) {
                document.scroll_to_top();
            } else {
                tracing::debug!(%person, "person in URL is not on the leaderboard");
            }
        }
    }

    fn render_failure(&mut self, document: &mut Document, message: &str) {
        tracing::warn!(error = %message, "records failed to load");
        for id in [
            ContainerId::RecordsGrid,
            ContainerId::FormerGrid,
            ContainerId::LeaderboardList,
            ContainerId::ProfileGrid,
        ] {
            document.set_content(id, Content::Error(message.to_string()));
        }
        self.state = EngineState::Failed(message.to_string());
    }

    /// Switches to `name`'s profile. Unknown names, or a call before the
    /// records are ready, change nothing and return `false`.
    pub fn open_profile<S: NavigationStore + ?Sized>(
        &mut self,
        document: &mut Document,
        store: &mut S,
        name: &str,
        update: UrlUpdate,
    ) -> bool {
        if !self.show_profile(document, name) {
            return false;
        }
        if let Some(mode) = update.mode() {
            store.set_query_param(&self.options.person_param, Some(name), mode);
        }
        document.scroll_to_top();
        true
    }

    pub fn show_leaderboard<S: NavigationStore + ?Sized>(
        &mut self,
        document: &mut Document,
        store: &mut S,
        update: UrlUpdate,
    ) -> bool {
        let EngineState::Ready { view, .. } = &mut self.state else {
            return false;
        };
        *view = PeopleView::Leaderboard;
        document.set_hidden(ContainerId::PeopleLeaderboard, false);
        document.set_hidden(ContainerId::PeopleProfile, true);
        document.set_content(ContainerId::ProfileName, Content::Text(String::new()));
        if let Some(mode) = update.mode() {
            store.set_query_param(&self.options.person_param, None, mode);
        }
        document.scroll_to_top();
        true
    }

    /// The profile back control.
    pub fn back<S: NavigationStore + ?Sized>(
        &mut self,
        document: &mut Document,
        store: &mut S,
    ) -> bool {
        self.show_leaderboard(document, store, UrlUpdate::Push)
    }

    /// History traversal: re-derive the view from the URL, never writing it.
    pub fn on_pop_state<S: NavigationStore + ?Sized>(
        &mut self,
        document: &mut Document,
        store: &mut S,
    ) -> bool {
        match store.query_param(&self.options.person_param) {
            Some(person) => self.open_profile(document, store, &person, UrlUpdate::Skip),
            None => self.show_leaderboard(document, store, UrlUpdate::Skip),
        }
    }

    fn show_profile(&mut self, document: &mut Document, name: &str) -> bool {
        let assets = &self.options.assets;
        let EngineState::Ready { leaders, view, .. } = &mut self.state else {
            return false;
        };
        let Some(leader) = leaders.iter().find(|l| l.name == name) else {
            return false;
        };

        let mut records = leader.records.clone();
        records.sort_by(compare_records);
        document.set_hidden(ContainerId::PeopleLeaderboard, true);
        document.set_hidden(ContainerId::PeopleProfile, false);
        document.set_content(ContainerId::ProfileName, Content::Text(leader.name.clone()));
        document.set_content(ContainerId::ProfileGrid, render::grid(&records, assets));
        *view = PeopleView::Profile(leader.name.clone());
        true
    }
}

/// Stats render only when all three elements are on the page.
fn update_stats(document: &mut Document, records: &[Record]) {
    if !StatId::ALL.iter().all(|id| document.has_stat(*id)) {
        return;
    }
    let former = records.iter().filter(|r| r.status == Status::Former).count();
    let current = records.len() - former;
    document.set_stat(StatId::Total, records.len().to_string());
    document.set_stat(StatId::Current, current.to_string());
    document.set_stat(StatId::Former, former.to_string());
}
