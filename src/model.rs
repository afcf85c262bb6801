//! Records returned by the EGOT API.
//!
//! These mirror the JSON payloads of the remote service. They are immutable once fetched: the
//! derived views (status, groups, progress) live in [`crate::aggregate`].

use std::fmt;

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::find_missing_award;

/// One of the four awards making up the EGOT
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AwardType {
    /// Television
    Emmy,
    /// Music
    Grammy,
    /// Film
    Oscar,
    /// Theatre
    Tony,
}

impl AwardType {
    /// The order of the acronym, used for status and progress displays
    pub const EGOT_ORDER: [AwardType; 4] = [Self::Emmy, Self::Grammy, Self::Oscar, Self::Tony];
    /// The order award sections are shown in on a celebrity's page
    pub const DISPLAY_ORDER: [AwardType; 4] = [Self::Oscar, Self::Emmy, Self::Grammy, Self::Tony];

    /// Single letter used in the E-G-O-T badges
    pub fn letter(self) -> char {
        match self {
            Self::Emmy => 'E',
            Self::Grammy => 'G',
            Self::Oscar => 'O',
            Self::Tony => 'T',
        }
    }
}

impl TryFrom<&str> for AwardType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "emmy" | "e" => Ok(Self::Emmy),
            "grammy" | "g" => Ok(Self::Grammy),
            "oscar" | "o" => Ok(Self::Oscar),
            "tony" | "t" => Ok(Self::Tony),
            _ => Err(format!("Unknown award type {value}")),
        }
    }
}

/// A single nomination or win
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    /// Record identity
    pub id: Uuid,
    /// The celebrity this award belongs to
    pub celebrity_id: Uuid,
    /// Which of the four awards this is
    #[serde(rename = "type")]
    pub kind: AwardType,
    /// Ceremony year, 0 when unknown
    #[serde(default)]
    pub year: i32,
    /// Title of the work the award was given for; the API sends an empty string when unknown
    #[serde(default, deserialize_with = "empty_as_none")]
    pub work: Option<String>,
    /// Award category, e.g. "Best Actor"
    #[serde(default)]
    pub category: String,
    /// Whether this is a win rather than a nomination
    #[serde(default)]
    pub is_winner: bool,
    /// Date of the ceremony, when known
    #[serde(default)]
    pub ceremony_date: Option<NaiveDate>,
    /// Whether the ceremony has yet to happen
    #[serde(default)]
    pub is_upcoming: Option<bool>,
}

impl Award {
    /// The year if it is known
    pub fn known_year(&self) -> Option<i32> {
        (self.year > 0).then_some(self.year)
    }
}

/// A celebrity with their full award history, as returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebrity {
    /// Record identity
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// URL slug derived from the name
    #[serde(default)]
    pub slug: String,
    /// Portrait URL
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Short biography
    #[serde(default)]
    pub summary: Option<String>,
    /// When the record was last refreshed from the source
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Every known nomination and win
    #[serde(default, deserialize_with = "null_as_default")]
    pub awards: Vec<Award>,
}

/// A lightweight candidate match surfaced while typing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Record identity
    pub id: Uuid,
    /// Display name, also used as the lookup key when committing
    pub name: String,
    /// URL slug
    #[serde(default)]
    pub slug: String,
    /// Portrait URL
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A celebrity annotated with the award types they have won, used by the progress listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrityWithProgress {
    /// Record identity
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// URL slug
    #[serde(default)]
    pub slug: String,
    /// Portrait URL
    #[serde(default)]
    pub photo_url: Option<String>,
    /// When the record was last refreshed from the source
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Number of distinct award types won
    pub egot_win_count: u8,
    /// The award types won
    #[serde(default, deserialize_with = "null_as_default")]
    pub won_awards: Vec<AwardType>,
}

impl CelebrityWithProgress {
    /// Whether the given type was won
    pub fn has_won(&self, kind: AwardType) -> bool {
        self.won_awards.contains(&kind)
    }

    /// The single award standing between this celebrity and an EGOT.
    ///
    /// Only answers for celebrities with exactly three of the four types won.
    pub fn missing_award(&self) -> Option<AwardType> {
        let mut won = self.won_awards.clone();
        won.sort_unstable();
        won.dedup();
        if won.len() != 3 {
            return None;
        }
        find_missing_award(&won)
    }
}

/// A celebrity without awards, as returned by the no-awards listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrityBasic {
    /// Record identity
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// URL slug
    #[serde(default)]
    pub slug: String,
    /// Portrait URL
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Short biography
    #[serde(default)]
    pub summary: Option<String>,
    /// When the record was last refreshed from the source
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// An annual Academy Awards ceremony with its categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscarCeremony {
    /// Record identity
    pub id: Uuid,
    /// Ceremony year
    pub year: i32,
    /// e.g. "97th Academy Awards"
    #[serde(default)]
    pub ceremony_name: Option<String>,
    /// Date of the ceremony
    #[serde(default)]
    pub ceremony_date: Option<NaiveDate>,
    /// Whether every winner has been announced
    #[serde(default)]
    pub is_complete: bool,
    /// Categories with their nominees
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<OscarCategory>,
}

impl OscarCeremony {
    /// The ceremony name, falling back to "<year> Oscars"
    pub fn title(&self) -> String {
        match &self.ceremony_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{} Oscars", self.year),
        }
    }

    /// Categories in display order
    pub fn sorted_categories(&self) -> Vec<&OscarCategory> {
        let mut categories: Vec<_> = self.categories.iter().collect();
        categories.sort_by_key(|c| c.display_order);
        categories
    }
}

/// A category within an Oscar ceremony
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscarCategory {
    /// Record identity
    pub id: Uuid,
    /// Owning ceremony
    #[serde(default)]
    pub ceremony_id: Option<Uuid>,
    /// e.g. "Best Picture"
    pub name: String,
    /// Position of the category on the ceremony page
    #[serde(default)]
    pub display_order: i32,
    /// Whether the winner has been announced
    #[serde(default)]
    pub winner_announced: bool,
    /// Nominees in this category
    #[serde(default, deserialize_with = "null_as_default")]
    pub nominees: Vec<OscarNominee>,
}

impl OscarCategory {
    /// The nominee marked as winner, if any
    pub fn winner(&self) -> Option<&OscarNominee> {
        self.nominees.iter().find(|n| n.is_winner)
    }
}

/// A nominee within an Oscar category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscarNominee {
    /// Record identity
    pub id: Uuid,
    /// Owning category
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Linked celebrity, when the nominee is a tracked person
    #[serde(default)]
    pub celebrity_id: Option<Uuid>,
    /// Nominee name
    pub name: String,
    /// Portrait URL
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Title of the nominated work
    #[serde(default)]
    pub work_title: Option<String>,
    /// Whether this nominee won
    #[serde(default)]
    pub is_winner: bool,
    /// Position of the nominee within the category
    #[serde(default)]
    pub display_order: i32,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
