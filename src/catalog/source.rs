//! Record sources and the in-memory catalog.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use super::SourceError;
use crate::emperor::EmperorRecord;

/// Read-only access to emperor records, as needed by the guessing game.
///
/// Implementations may be queried concurrently; nothing here writes.
pub trait RecordSource {
    /// Draw one record uniformly at random, or `None` when the source is empty.
    fn random_record<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Option<EmperorRecord>, SourceError>;

    fn find_by_exact_name(&self, name: &str) -> Result<Option<EmperorRecord>, SourceError>;

    /// First record (in rank order) whose name contains `fragment`.
    fn find_by_name_substring(&self, fragment: &str)
        -> Result<Option<EmperorRecord>, SourceError>;

    fn find_by_exact_title(&self, title: &str) -> Result<Option<EmperorRecord>, SourceError>;

    /// Every non-empty name, in rank order.
    fn names_by_rank(&self) -> Result<Vec<String>, SourceError>;
}

/// All records held in memory, kept in rank order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<EmperorRecord>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ranks.
    pub fn from_records(mut records: Vec<EmperorRecord>) -> Result<Self, SourceError> {
        let mut seen = HashSet::new();
        for rank in records.iter().filter_map(|r| r.overall_rank) {
            if !seen.insert(rank) {
                return Err(SourceError::DuplicateRank(rank));
            }
        }
        // Ranked records first, then unranked by name
        records.sort_by(|a, b| match (a.overall_rank, b.overall_rank) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        });
        Ok(Self { records })
    }

    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let records: Vec<EmperorRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Load a JSON array of records from disk.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let json = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            "Loaded {} emperor records from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[EmperorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_rank(&self, rank: u32) -> Option<&EmperorRecord> {
        self.records.iter().find(|r| r.overall_rank == Some(rank))
    }
}

impl RecordSource for Catalog {
    fn random_record<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Option<EmperorRecord>, SourceError> {
        Ok(self.records.choose(rng).cloned())
    }

    fn find_by_exact_name(&self, name: &str) -> Result<Option<EmperorRecord>, SourceError> {
        Ok(self.records.iter().find(|r| r.name == name).cloned())
    }

    fn find_by_name_substring(
        &self,
        fragment: &str,
    ) -> Result<Option<EmperorRecord>, SourceError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.name.contains(fragment))
            .cloned())
    }

    fn find_by_exact_title(&self, title: &str) -> Result<Option<EmperorRecord>, SourceError> {
        Ok(self.records.iter().find(|r| r.title == title).cloned())
    }

    fn names_by_rank(&self) -> Result<Vec<String>, SourceError> {
        Ok(self
            .records
            .iter()
            .filter(|r| !r.name.is_empty())
            .map(|r| r.name.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn record(rank: Option<u32>, name: &str, title: &str) -> EmperorRecord {
        EmperorRecord {
            overall_rank: rank,
            name: name.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Catalog {
        Catalog::from_records(vec![
            record(Some(3), "朱元璋", "明太祖"),
            record(None, "无名", ""),
            record(Some(1), "李世民", "唐太宗"),
            record(Some(2), "李渊", "唐高祖"),
        ])
        .unwrap()
    }

    #[test]
    fn test_records_sorted_by_rank_with_unranked_last() {
        let catalog = sample();
        let ranks: Vec<Option<u32>> = catalog.records().iter().map(|r| r.overall_rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(2), Some(3), None]);
    }

    #[test]
    fn test_duplicate_rank_rejected() {
        let err = Catalog::from_records(vec![
            record(Some(1), "a", ""),
            record(Some(1), "b", ""),
        ])
        .unwrap_err();
        assert!(matches!(err, SourceError::DuplicateRank(1)));
    }

    #[test]
    fn test_substring_match_uses_rank_order() {
        let catalog = sample();
        let hit = catalog.find_by_name_substring("李").unwrap().unwrap();
        assert_eq!(hit.name, "李世民");
    }

    #[test]
    fn test_exact_lookups() {
        let catalog = sample();
        assert_eq!(
            catalog.find_by_exact_name("李渊").unwrap().unwrap().overall_rank,
            Some(2)
        );
        assert_eq!(
            catalog.find_by_exact_title("明太祖").unwrap().unwrap().name,
            "朱元璋"
        );
        assert!(catalog.find_by_exact_name("李").unwrap().is_none());
    }

    #[test]
    fn test_random_record_empty_catalog() {
        let catalog = Catalog::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(catalog.random_record(&mut rng).unwrap().is_none());
    }

    #[test]
    fn test_names_by_rank() {
        let names = sample().names_by_rank().unwrap();
        assert_eq!(names, vec!["李世民", "李渊", "朱元璋", "无名"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/emperors.json")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
