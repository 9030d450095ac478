use serde::{Deserialize, Serialize};

/// Which kind of media a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Movie,
    Season,
    Episode,
}

impl SearchMode {
    pub const ALL: &[SearchMode] = &[Self::Movie, Self::Season, Self::Episode];

    /// Whether the resolved title should carry the season/episode token.
    pub fn includes_identifier(self) -> bool {
        !matches!(self, Self::Movie)
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie => write!(f, "Movie"),
            Self::Season => write!(f, "Season"),
            Self::Episode => write!(f, "Episode"),
        }
    }
}

/// What the caller is looking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaQuery {
    pub title: String,
    pub year: Option<u16>,
    /// Season/episode token, e.g. `S02` or `S02E05`.
    pub identifier: Option<String>,
    pub mode: SearchMode,
}

impl MediaQuery {
    pub fn movie(title: impl Into<String>, year: u16) -> Self {
        Self {
            title: title.into(),
            year: Some(year),
            identifier: None,
            mode: SearchMode::Movie,
        }
    }

    pub fn season(title: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            identifier: Some(identifier.into()),
            mode: SearchMode::Season,
        }
    }

    pub fn episode(title: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            identifier: Some(identifier.into()),
            mode: SearchMode::Episode,
        }
    }
}

/// Size bounds in megabytes; `None` leaves the bound open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityConstraint {
    pub min_size_mb: Option<u64>,
    pub max_size_mb: Option<u64>,
}
