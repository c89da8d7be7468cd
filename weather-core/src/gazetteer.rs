use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path};

const BUNDLED_INDIAN_CITIES: &str = include_str!("../data/indian_cities.json");

/// Opaque city identifier as published by the weather service.
///
/// Datasets disagree on whether ids are numbers or strings, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CityId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityId::Numeric(n) => write!(f, "{n}"),
            CityId::Text(s) => f.write_str(s),
        }
    }
}

/// One known city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub id: CityId,
    pub name: String,
}

/// Read-only list of known cities, kept in the order it was loaded.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
}

impl Gazetteer {
    pub fn new(entries: Vec<GazetteerEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of `{ "id": ..., "name": ... }` records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<GazetteerEntry> =
            serde_json::from_str(json).context("Failed to parse gazetteer JSON")?;

        Ok(Self { entries })
    }

    /// Load a gazetteer from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gazetteer file: {}", path.display()))?;

        let gazetteer = Self::from_json_str(&contents)
            .with_context(|| format!("Invalid gazetteer file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), cities = gazetteer.len(), "loaded gazetteer");
        Ok(gazetteer)
    }

    /// The Indian cities dataset compiled into the library.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_INDIAN_CITIES).context("Bundled gazetteer is corrupt")
    }

    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_numeric_and_string_ids() {
        let json = r#"[
            {"id": 1263214, "name": "Meerut"},
            {"id": "IN-PN", "name": "Pune", "state": "MH"}
        ]"#;
        let g = Gazetteer::from_json_str(json).expect("valid json");

        assert_eq!(g.len(), 2);
        assert_eq!(g.entries()[0].id, CityId::Numeric(1263214));
        assert_eq!(g.entries()[1].id, CityId::Text("IN-PN".into()));
        assert_eq!(g.entries()[1].id.to_string(), "IN-PN");
    }

    #[test]
    fn empty_array_is_valid() {
        let g = Gazetteer::from_json_str("[]").expect("valid json");
        assert!(g.is_empty());
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = Gazetteer::from_json_str(r#"[{"id": 1}]"#).unwrap_err();
        assert!(err.to_string().contains("Failed to parse gazetteer JSON"));
    }

    #[test]
    fn bundled_dataset_parses() {
        let g = Gazetteer::bundled().expect("bundled gazetteer");
        assert!(g.entries().iter().any(|e| e.name == "Meerut"));
        assert!(g.entries().iter().any(|e| e.name == "New Delhi"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"id": 7, "name": "Agra"}}]"#).expect("write");

        let g = Gazetteer::load(file.path()).expect("load");
        assert_eq!(g.entries()[0].name, "Agra");
    }

    #[test]
    fn load_missing_file_mentions_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nope.json");

        let err = Gazetteer::load(&path).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
