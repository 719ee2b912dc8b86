use serde::Serialize;

use super::assets::AssetResolver;
use super::model::{Record, Status};
use super::ranking::{medal_for_rank, ordinal, Leader, Medal};
use crate::dom::Content;

pub const LOADING_RECORDS: &str = "Loading records…";
pub const LOADING_PEOPLE: &str = "Loading people…";
pub const LOADING: &str = "Loading…";
pub const NO_RECORDS: &str = "No records to display.";
pub const NO_PEOPLE: &str = "No people yet.";
pub const NO_FOOTAGE: &str = "No footage";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub seal: String,
    pub status: Status,
    pub badge: String,
    pub image_src: String,
    pub image_alt: String,
    pub placeholder_src: String,
    pub person: String,
    pub title: String,
    pub description: String,
    pub meta: String,
    pub footage: Option<String>,
}

impl Certificate {
    pub fn from_record(record: &Record, assets: &AssetResolver) -> Self {
        Self {
            seal: format!("Year {}", record.year),
            status: record.status,
            badge: record.status.label().to_string(),
            image_src: assets.image_href(record.image.as_deref()),
            image_alt: format!("{} image", record.title),
            placeholder_src: assets.placeholder_href().to_string(),
            person: record.name.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            meta: format!("{} • {}", record.year, record.status),
            footage: record.footage.clone(),
        }
    }

    pub fn footage_label(&self) -> &'static str {
        if self.footage.is_some() {
            "Footage"
        } else {
            NO_FOOTAGE
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderRow {
    pub rank: usize,
    pub rank_label: String,
    pub medal: Option<Medal>,
    pub name: String,
    pub points: u32,
    pub action_label: String,
}

impl LeaderRow {
    pub fn new(rank: usize, leader: &Leader) -> Self {
        Self {
            rank,
            rank_label: ordinal(rank),
            medal: medal_for_rank(rank),
            name: leader.name.clone(),
            points: leader.points,
            action_label: format!("View {}'s profile", leader.name),
        }
    }
}

pub fn grid(records: &[Record], assets: &AssetResolver) -> Content {
    if records.is_empty() {
        return Content::Empty(NO_RECORDS.to_string());
    }
    Content::Certificates(
        records
            .iter()
            .map(|r| Certificate::from_record(r, assets))
            .collect(),
    )
}

pub fn leaderboard(leaders: &[Leader]) -> Content {
    if leaders.is_empty() {
        return Content::Empty(NO_PEOPLE.to_string());
    }
    Content::Leaderboard(
        leaders
            .iter()
            .enumerate()
            .map(|(idx, leader)| LeaderRow::new(idx + 1, leader))
            .collect(),
    )
}
