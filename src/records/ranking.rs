use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::model::{Record, Status};

pub const CURRENT_POINTS: u32 = 10;
pub const FORMER_POINTS: u32 = 5;

/// Newest year first, then status name, then title.
pub fn compare_records(a: &Record, b: &Record) -> Ordering {
    b.year
        .cmp(&a.year)
        .then_with(|| a.status.as_str().cmp(b.status.as_str()))
        .then_with(|| a.title.cmp(&b.title))
}

pub fn sort_records(records: &mut [Record]) {
    records.sort_by(compare_records);
}

pub fn points_for_record(record: &Record) -> u32 {
    match record.status {
        Status::Current => CURRENT_POINTS,
        Status::Former => FORMER_POINTS,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Leader {
    pub name: String,
    pub points: u32,
    pub records: Vec<Record>,
}

/// Groups records by exact name and orders the groups by points (desc) then
/// name (asc). Position in the returned list is the 1-based rank minus one.
pub fn group_by_person(records: &[Record]) -> Vec<Leader> {
    let mut by_name: HashMap<&str, Leader> = HashMap::new();
    for record in records {
        let entry = by_name.entry(record.name.as_str()).or_insert_with(|| Leader {
            name: record.name.clone(),
            points: 0,
            records: Vec::new(),
        });
        entry.points += points_for_record(record);
        entry.records.push(record.clone());
    }

    let mut leaders: Vec<Leader> = by_name.into_values().collect();
    leaders.sort_by(|a, b| {
        b.points.cmp(&a.points).then_with(|| a.name.cmp(&b.name))
    });
    leaders
}

pub fn ordinal(rank: usize) -> String {
    let mod100 = rank % 100;
    if (11..=13).contains(&mod100) {
        return format!("{rank}th");
    }
    match rank % 10 {
        1 => format!("{rank}st"),
        2 => format!("{rank}nd"),
        3 => format!("{rank}rd"),
        _ => format!("{rank}th"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn fill(&self) -> &'static str {
        match self {
            Medal::Gold => "#fbbf24",
            Medal::Silver => "#cbd5e1",
            Medal::Bronze => "#fb923c",
        }
    }

    pub fn stroke(&self) -> &'static str {
        match self {
            Medal::Gold => "#b45309",
            Medal::Silver => "#64748b",
            Medal::Bronze => "#c2410c",
        }
    }
}

pub fn medal_for_rank(rank: usize) -> Option<Medal> {
    match rank {
        1 => Some(Medal::Gold),
        2 => Some(Medal::Silver),
        3 => Some(Medal::Bronze),
        _ => None,
    }
}
