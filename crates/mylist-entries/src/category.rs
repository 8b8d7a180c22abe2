//! Closed sets for entry categories and statuses
//!
//! The declared order of `Category::ALL` is the display order of a grouped list:
//! webtoon, série, manga, anime.

use serde::{Deserialize, Serialize};

use crate::error::EntryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "webtoon")]
    Webtoon,
    #[serde(rename = "série")]
    Serie,
    #[serde(rename = "manga")]
    Manga,
    #[serde(rename = "anime")]
    Anime,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Webtoon,
        Category::Serie,
        Category::Manga,
        Category::Anime,
    ];

    /// Stored value
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Webtoon => "webtoon",
            Category::Serie => "série",
            Category::Manga => "manga",
            Category::Anime => "anime",
        }
    }

    /// Heading used when rendering a grouped list
    pub fn label(&self) -> String {
        capitalize(self.as_str())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "webtoon" => Ok(Category::Webtoon),
            "série" => Ok(Category::Serie),
            "manga" => Ok(Category::Manga),
            "anime" => Ok(Category::Anime),
            _ => Err(invalid("category", s, Category::ALL.iter().map(|c| c.as_str()))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "à voir/lire")]
    Planned,
    #[serde(rename = "en cours")]
    InProgress,
    #[serde(rename = "terminé")]
    Finished,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Planned, Status::InProgress, Status::Finished];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Planned => "à voir/lire",
            Status::InProgress => "en cours",
            Status::Finished => "terminé",
        }
    }

    pub fn label(&self) -> String {
        capitalize(self.as_str())
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "à voir/lire" => Ok(Status::Planned),
            "en cours" => Ok(Status::InProgress),
            "terminé" => Ok(Status::Finished),
            _ => Err(invalid("status", s, Status::ALL.iter().map(|st| st.as_str()))),
        }
    }
}

fn invalid<'a>(
    field: &'static str,
    value: &str,
    expected: impl Iterator<Item = &'a str>,
) -> EntryError {
    EntryError::InvalidEnumValue {
        field,
        value: value.trim().to_string(),
        expected: expected.collect::<Vec<_>>().join(", "),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
