//! tally-ingest: where the task document comes from (local file or HTTP).

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

use anyhow::Result;
use std::path::PathBuf;
use tally_core::TaskSource;

/// Default document location, relative to the working directory.
pub const DEFAULT_LOCATION: &str = "tasks.json";

/// A source picked at runtime from a location string.
#[derive(Debug, Clone)]
pub enum AnySource {
    File(FileSource),
    Http(HttpSource),
}

/// `http://` / `https://` locations fetch over the network, anything else is a path.
pub fn source_for(location: &str) -> AnySource {
    let loc = location.trim();
    if loc.starts_with("http://") || loc.starts_with("https://") {
        AnySource::Http(HttpSource::new(loc))
    } else {
        AnySource::File(FileSource::new(PathBuf::from(loc)))
    }
}

impl TaskSource for AnySource {
    fn describe(&self) -> String {
        match self {
            AnySource::File(s) => s.describe(),
            AnySource::Http(s) => s.describe(),
        }
    }

    async fn fetch(&self) -> Result<String> {
        match self {
            AnySource::File(s) => s.fetch().await,
            AnySource::Http(s) => s.fetch().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_for_picks_by_scheme() {
        assert!(matches!(source_for("https://example.com/tasks.json"), AnySource::Http(_)));
        assert!(matches!(source_for(" http://localhost:8080/tasks.json "), AnySource::Http(_)));
        assert!(matches!(source_for("data/tasks.json"), AnySource::File(_)));
        assert!(matches!(source_for(DEFAULT_LOCATION), AnySource::File(_)));
    }

    #[test]
    fn test_describe_names_the_location() {
        assert_eq!(source_for("data/tasks.json").describe(), "data/tasks.json");
        assert_eq!(
            source_for("https://example.com/tasks.json").describe(),
            "https://example.com/tasks.json"
        );
    }
}
