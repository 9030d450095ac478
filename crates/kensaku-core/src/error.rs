use thiserror::Error;

#[derive(Debug, Error)]
pub enum KensakuError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single feed entry was dropped from the result set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("missing enclosure")]
    MissingEnclosure,

    #[error("missing title")]
    MissingTitle,

    #[error("no release id in link {0:?}")]
    BadLink(Option<String>),

    #[error("unparseable publish date {0:?}")]
    BadDate(Option<String>),
}
