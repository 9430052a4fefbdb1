//! Catalog browsing: filtering, whitelisted sorting and pagination.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;

use super::{Catalog, QueryError};
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::emperor::{era_sort_key, EmperorBrief, EmperorRecord, ScoreField};

/// Column a listing may be sorted by. Anything else falls back to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Rank,
    Era,
    Score(ScoreField),
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "overall_rank" => Self::Rank,
            "era" => Self::Era,
            other => ScoreField::from_key(other)
                .map(Self::Score)
                .unwrap_or(Self::Rank),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub per_page: usize,
    pub sort: SortKey,
    pub order: SortOrder,
    pub era: Option<String>,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            sort: SortKey::Rank,
            order: SortOrder::Asc,
            era: None,
            search: None,
        }
    }
}

impl ListQuery {
    /// Build from raw request parameters, clamping and whitelisting every value.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<i64>().ok());
        let text = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let page = number("page").unwrap_or(1).max(1) as usize;
        let per_page = number("per_page")
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as usize;

        Self {
            page,
            per_page,
            sort: params
                .get("sort")
                .map(|s| SortKey::parse(s))
                .unwrap_or(SortKey::Rank),
            order: params
                .get("order")
                .map(|s| SortOrder::parse(s))
                .unwrap_or(SortOrder::Asc),
            era: text("era"),
            search: text("search"),
        }
    }

    fn matches(&self, record: &EmperorRecord) -> bool {
        if let Some(era) = &self.era {
            if record.era_str() != Some(era.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let hit = record.name.contains(search.as_str())
                || record.title.contains(search.as_str())
                || record.era_str().is_some_and(|e| e.contains(search.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &EmperorRecord, b: &EmperorRecord) -> Ordering {
        match self.sort {
            SortKey::Era => {
                // Unknown eras trail in both directions
                let (ka, kb) = (era_sort_key(a.era_str()), era_sort_key(b.era_str()));
                let unknown = crate::emperor::ERA_ORDER.len();
                match self.order {
                    SortOrder::Asc => ka.cmp(&kb),
                    SortOrder::Desc => match (ka == unknown, kb == unknown) {
                        (false, false) => kb.cmp(&ka),
                        (a_unknown, b_unknown) => a_unknown.cmp(&b_unknown),
                    },
                }
            }
            SortKey::Rank => self.directed(a.overall_rank.cmp(&b.overall_rank)),
            SortKey::Score(field) => self.directed(compare_scores(a.score(field), b.score(field))),
        }
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Missing scores order before any present score.
fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub data: Vec<EmperorRecord>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl Catalog {
    /// Every record matching the query's filters, in the query's order.
    pub fn select(&self, query: &ListQuery) -> Vec<&EmperorRecord> {
        let mut rows: Vec<&EmperorRecord> =
            self.records().iter().filter(|r| query.matches(r)).collect();
        // Stable: ties keep rank order
        rows.sort_by(|a, b| query.compare(a, b));
        rows
    }

    pub fn list(&self, query: &ListQuery) -> Page {
        let rows = self.select(query);
        let total = rows.len();
        let offset = (query.page - 1).saturating_mul(query.per_page);
        let data = rows
            .into_iter()
            .skip(offset)
            .take(query.per_page)
            .cloned()
            .collect();
        Page {
            data,
            total,
            page: query.page,
            per_page: query.per_page,
        }
    }

    pub fn detail(&self, rank: u32) -> Result<EmperorRecord, QueryError> {
        self.by_rank(rank).cloned().ok_or(QueryError::NotFound)
    }

    /// Distinct non-empty eras, sorted as strings.
    pub fn eras(&self) -> Vec<String> {
        self.records()
            .iter()
            .filter_map(|r| r.era.clone())
            .filter(|e| !e.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every record in brief, ordered by era string then rank.
    pub fn all_brief(&self) -> Vec<EmperorBrief> {
        let mut briefs: Vec<EmperorBrief> = self.records().iter().map(|r| r.brief()).collect();
        briefs.sort_by(|a, b| {
            a.era
                .cmp(&b.era)
                .then_with(|| a.overall_rank.cmp(&b.overall_rank))
        });
        briefs
    }
}

/// Check a DIY reorder request body. The ordering itself lives client-side.
///
/// Returns how many entries were submitted.
pub fn accept_reorder(body: &Value) -> Result<usize, &'static str> {
    match body.get("ranks") {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Array(ranks)) => Ok(ranks.len()),
        Some(_) => Err("ranks must be array"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(rank: u32, era: &str, name: &str, virtue: Option<f64>) -> EmperorRecord {
        EmperorRecord {
            overall_rank: Some(rank),
            era: Some(era.to_string()),
            name: name.to_string(),
            title: format!("{name}帝"),
            virtue,
            ..Default::default()
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            record(1, "唐", "李世民", Some(95.0)),
            record(2, "西汉", "刘彻", Some(70.0)),
            record(3, "清", "玄烨", None),
            record(4, "异域", "某王", Some(80.0)),
            record(5, "唐", "李隆基", Some(60.0)),
        ])
        .unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn names(rows: &[EmperorRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_params_are_clamped_and_whitelisted() {
        let q = ListQuery::from_params(&params(&[
            ("page", "-3"),
            ("per_page", "1000"),
            ("sort", "name; DROP TABLE"),
            ("order", "sideways"),
            ("era", "  "),
        ]));
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, MAX_PAGE_SIZE);
        assert_eq!(q.sort, SortKey::Rank);
        assert_eq!(q.order, SortOrder::Asc);
        assert_eq!(q.era, None);

        let q = ListQuery::from_params(&params(&[("per_page", "0"), ("page", "abc")]));
        assert_eq!(q.per_page, 1);
        assert_eq!(q.page, 1);
    }

    #[test]
    fn test_score_sort_missing_first_ascending() {
        let q = ListQuery::from_params(&params(&[("sort", "virtue")]));
        let page = catalog().list(&q);
        assert_eq!(names(&page.data), vec!["玄烨", "李隆基", "刘彻", "某王", "李世民"]);

        let q = ListQuery::from_params(&params(&[("sort", "virtue"), ("order", "DESC")]));
        let page = catalog().list(&q);
        assert_eq!(names(&page.data), vec!["李世民", "某王", "刘彻", "李隆基", "玄烨"]);
    }

    #[test]
    fn test_era_sort_unknown_last_both_directions() {
        let q = ListQuery::from_params(&params(&[("sort", "era")]));
        let page = catalog().list(&q);
        assert_eq!(names(&page.data), vec!["刘彻", "李世民", "李隆基", "玄烨", "某王"]);

        let q = ListQuery::from_params(&params(&[("sort", "era"), ("order", "desc")]));
        let page = catalog().list(&q);
        assert_eq!(names(&page.data), vec!["玄烨", "李世民", "李隆基", "刘彻", "某王"]);
    }

    #[test]
    fn test_filters_and_paging() {
        let q = ListQuery::from_params(&params(&[("era", "唐")]));
        let page = catalog().list(&q);
        assert_eq!(page.total, 2);

        let q = ListQuery::from_params(&params(&[("search", "李")]));
        assert_eq!(catalog().list(&q).total, 2);

        let q = ListQuery::from_params(&params(&[("search", "西汉")]));
        assert_eq!(names(&catalog().list(&q).data), vec!["刘彻"]);

        let q = ListQuery::from_params(&params(&[("per_page", "2"), ("page", "3")]));
        let page = catalog().list(&q);
        assert_eq!(page.total, 5);
        assert_eq!(names(&page.data), vec!["李隆基"]);

        let q = ListQuery::from_params(&params(&[("per_page", "2"), ("page", "9")]));
        assert!(catalog().list(&q).data.is_empty());
    }

    #[test]
    fn test_detail_and_eras() {
        let catalog = catalog();
        assert_eq!(catalog.detail(2).unwrap().name, "刘彻");
        assert_eq!(catalog.detail(99), Err(QueryError::NotFound));
        let eras = catalog.eras();
        assert_eq!(eras.len(), 4);
        assert!(eras.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_all_brief_grouped_by_era_then_rank() {
        let briefs = catalog().all_brief();
        let tang: Vec<Option<u32>> = briefs
            .iter()
            .filter(|b| b.era.as_deref() == Some("唐"))
            .map(|b| b.overall_rank)
            .collect();
        assert_eq!(tang, vec![Some(1), Some(5)]);
        assert_eq!(briefs.len(), 5);
    }

    #[test]
    fn test_accept_reorder() {
        assert_eq!(accept_reorder(&json!({"ranks": [3, 1, 2]})), Ok(3));
        assert_eq!(accept_reorder(&json!({})), Ok(0));
        assert!(accept_reorder(&json!({"ranks": "1,2"})).is_err());
    }
}
