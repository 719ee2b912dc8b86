use std::collections::BTreeMap;

use serde::Serialize;

use crate::records::render::{Certificate, LeaderRow};

/// Named output containers the records engine renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerId {
    RecordsGrid,
    FormerGrid,
    PeopleLeaderboard,
    LeaderboardList,
    PeopleProfile,
    ProfileBack,
    ProfileName,
    ProfileGrid,
}

impl ContainerId {
    pub const ALL: [ContainerId; 8] = [
        ContainerId::RecordsGrid,
        ContainerId::FormerGrid,
        ContainerId::PeopleLeaderboard,
        ContainerId::LeaderboardList,
        ContainerId::PeopleProfile,
        ContainerId::ProfileBack,
        ContainerId::ProfileName,
        ContainerId::ProfileGrid,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            ContainerId::RecordsGrid => "recordsGrid",
            ContainerId::FormerGrid => "formerGrid",
            ContainerId::PeopleLeaderboard => "peopleLeaderboard",
            ContainerId::LeaderboardList => "leaderboardList",
            ContainerId::PeopleProfile => "peopleProfile",
            ContainerId::ProfileBack => "profileBackBtn",
            ContainerId::ProfileName => "profileName",
            ContainerId::ProfileGrid => "profileGrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.element_id().eq_ignore_ascii_case(value.trim()))
    }
}

/// Numeric stat display elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatId {
    Total,
    Current,
    Former,
}

impl StatId {
    pub const ALL: [StatId; 3] = [StatId::Total, StatId::Current, StatId::Former];

    pub fn element_id(&self) -> &'static str {
        match self {
            StatId::Total => "statTotal",
            StatId::Current => "statCurrent",
            StatId::Former => "statFormer",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageSection {
    pub id: Option<String>,
    pub hidden: bool,
    pub active: bool,
}

impl PageSection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            hidden: false,
            active: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            id: None,
            hidden: false,
            active: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerRole {
    Tab,
}

impl TriggerRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "tab" => Some(Self::Tab),
            _ => None,
        }
    }
}

/// An element that switches pages when clicked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavTrigger {
    pub target: Option<String>,
    pub role: Option<TriggerRole>,
    pub active: bool,
    pub aria_selected: Option<bool>,
    pub tab_index: Option<i32>,
}

impl NavTrigger {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            role: None,
            active: false,
            aria_selected: None,
            tab_index: None,
        }
    }

    pub fn tab(target: impl Into<String>) -> Self {
        Self {
            role: Some(TriggerRole::Tab),
            ..Self::new(target)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Content {
    Blank,
    Empty(String),
    Error(String),
    Text(String),
    Certificates(Vec<Certificate>),
    Leaderboard(Vec<LeaderRow>),
}

impl Content {
    pub fn message(&self) -> Option<&str> {
        match self {
            Content::Empty(m) | Content::Error(m) | Content::Text(m) => Some(m.as_str()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Container {
    pub hidden: bool,
    pub content: Content,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            hidden: false,
            content: Content::Blank,
        }
    }
}

/// In-memory page: sections, nav triggers, output containers and stats.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Document {
    pub pages: Vec<PageSection>,
    pub nav_triggers: Vec<NavTrigger>,
    containers: BTreeMap<ContainerId, Container>,
    stats: BTreeMap<StatId, String>,
    scroll_resets: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with the given sections, one tab trigger per section, every
    /// output container and every stat element.
    pub fn standard<S: AsRef<str>>(page_ids: &[S]) -> Self {
        let mut doc = Self::new();
        for id in page_ids {
            doc.pages.push(PageSection::new(id.as_ref()));
            doc.nav_triggers.push(NavTrigger::tab(id.as_ref()));
        }
        doc.with_all_containers().with_stats()
    }

    pub fn with_page(mut self, page: PageSection) -> Self {
        self.pages.push(page);
        self
    }

    pub fn with_trigger(mut self, trigger: NavTrigger) -> Self {
        self.nav_triggers.push(trigger);
        self
    }

    pub fn with_all_containers(mut self) -> Self {
        for id in ContainerId::ALL {
            self.insert_container(id);
        }
        self
    }

    pub fn with_stats(mut self) -> Self {
        for id in StatId::ALL {
            self.stats.insert(id, String::new());
        }
        self
    }

    pub fn insert_container(&mut self, id: ContainerId) {
        let mut container = Container::default();
        // the profile starts out hidden, like the markup ships it
        if id == ContainerId::PeopleProfile {
            container.hidden = true;
        }
        self.containers.insert(id, container);
    }

    pub fn remove_container(&mut self, id: ContainerId) -> Option<Container> {
        self.containers.remove(&id)
    }

    pub fn has_container(&self, id: ContainerId) -> bool {
        self.containers.contains_key(&id)
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn containers(&self) -> impl Iterator<Item = (&ContainerId, &Container)> {
        self.containers.iter()
    }

    pub fn content(&self, id: ContainerId) -> Option<&Content> {
        self.containers.get(&id).map(|c| &c.content)
    }

    pub fn set_content(&mut self, id: ContainerId, content: Content) -> bool {
        match self.containers.get_mut(&id) {
            Some(container) => {
                container.content = content;
                true
            }
            None => false,
        }
    }

    pub fn is_hidden(&self, id: ContainerId) -> Option<bool> {
        self.containers.get(&id).map(|c| c.hidden)
    }

    pub fn set_hidden(&mut self, id: ContainerId, hidden: bool) -> bool {
        match self.containers.get_mut(&id) {
            Some(container) => {
                container.hidden = hidden;
                true
            }
            None => false,
        }
    }

    pub fn has_stat(&self, id: StatId) -> bool {
        self.stats.contains_key(&id)
    }

    pub fn stat(&self, id: StatId) -> Option<&str> {
        self.stats.get(&id).map(String::as_str)
    }

    pub fn set_stat(&mut self, id: StatId, value: String) -> bool {
        match self.stats.get_mut(&id) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn remove_stat(&mut self, id: StatId) {
        self.stats.remove(&id);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_resets += 1;
    }

    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    pub fn active_page(&self) -> Option<&str> {
        self.pages
            .iter()
            .find(|p| p.active && !p.hidden)
            .and_then(|p| p.id.as_deref())
    }

    pub fn visible_pages(&self) -> Vec<&PageSection> {
        self.pages.iter().filter(|p| !p.hidden).collect()
    }
}
