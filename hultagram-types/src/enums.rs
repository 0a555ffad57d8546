use serde::{Deserialize, Serialize};

/// Outcome of a like toggle: the state the (user, post) pair ended up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeState {
    Liked,
    Unliked,
}

impl LikeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeState::Liked => "liked",
            LikeState::Unliked => "unliked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "liked" => Some(LikeState::Liked),
            "unliked" => Some(LikeState::Unliked),
            _ => None,
        }
    }

    pub fn is_liked(&self) -> bool {
        matches!(self, LikeState::Liked)
    }
}

/// How username search compares the query against stored usernames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

impl SearchMode {
    pub fn from_case_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive {
            SearchMode::CaseSensitive
        } else {
            SearchMode::CaseInsensitive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::CaseInsensitive => "case_insensitive",
            SearchMode::CaseSensitive => "case_sensitive",
        }
    }
}
