pub mod media;
pub mod release;

pub use media::{MediaQuery, QualityConstraint, SearchMode};
pub use release::SearchResult;
