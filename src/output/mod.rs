pub mod report;

use itertools::Itertools;
use serde::Serialize;

use crate::dom::{ContainerId, Content, Document, StatId};
use crate::location::NavigationStore;
use crate::records::PeopleView;
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// What a session looks like after the last event.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot<'a> {
    pub url: String,
    pub history_length: usize,
    pub active_page: Option<&'a str>,
    pub people_view: Option<&'a PeopleView>,
    pub error: Option<&'a str>,
    pub document: &'a Document,
}

impl<'a> Snapshot<'a> {
    pub fn from_session(session: &'a Session) -> Self {
        let records = session.records();
        Self {
            url: session.history().current().to_string(),
            history_length: session.history().len(),
            active_page: session.document().active_page(),
            people_view: records.and_then(|r| r.view()),
            error: records.and_then(|r| r.error()),
            document: session.document(),
        }
    }
}

pub fn render(format: OutputFormat, snapshot: &Snapshot<'_>) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(snapshot),
        OutputFormat::Json => render_json(snapshot),
        OutputFormat::Html => render_html(snapshot),
    }
}

fn content_lines(content: &Content) -> Vec<String> {
    match content {
        Content::Blank => Vec::new(),
        Content::Empty(m) | Content::Text(m) => vec![m.clone()],
        Content::Error(m) => vec![format!("error: {m}")],
        Content::Certificates(cards) => cards
            .iter()
            .map(|c| {
                let headline = format!("{} - {}", c.person, c.title);
                [
                    c.seal.as_str(),
                    c.badge.as_str(),
                    headline.as_str(),
                    c.meta.as_str(),
                    c.footage.as_deref().unwrap_or(c.footage_label()),
                ]
                .iter()
                .join(" | ")
            })
            .collect(),
        Content::Leaderboard(rows) => rows
            .iter()
            .map(|r| format!("{:<5} {} ({} pts)", r.rank_label, r.name, r.points))
            .collect(),
    }
}

pub fn render_text(snapshot: &Snapshot<'_>) -> Vec<u8> {
    let doc = snapshot.document;
    let mut out = String::new();
    out.push_str(&format!("url: {}\n", snapshot.url));
    out.push_str(&format!("page: {}\n", snapshot.active_page.unwrap_or("-")));
    if let Some(view) = snapshot.people_view {
        let view = match view {
            PeopleView::Leaderboard => "leaderboard".to_string(),
            PeopleView::Profile(name) => format!("profile ({name})"),
        };
        out.push_str(&format!("people: {view}\n"));
    }
    let stats = StatId::ALL
        .iter()
        .filter_map(|id| doc.stat(*id).map(|v| format!("{}={}", id.element_id(), v)))
        .join(", ");
    if !stats.is_empty() {
        out.push_str(&format!("stats: {stats}\n"));
    }

    for (id, container) in doc.containers() {
        if matches!(
            id,
            ContainerId::PeopleLeaderboard | ContainerId::PeopleProfile | ContainerId::ProfileBack
        ) {
            continue;
        }
        let lines = content_lines(&container.content);
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("\n[{}]\n", id.element_id()));
        for line in lines {
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.into_bytes()
}

pub fn render_json(snapshot: &Snapshot<'_>) -> Vec<u8> {
    serde_json::to_vec_pretty(snapshot).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(snapshot: &Snapshot<'_>) -> Vec<u8> {
    report::render_html(snapshot)
}
