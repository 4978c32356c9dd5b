/// Reading list data and the view operations over it
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A reading list as returned by `meta=readinglists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingList {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Computed locally: the current page is already in this list
    #[serde(default, skip_serializing)]
    pub has_entry: bool,
}

impl ReadingList {
    pub fn new(id: i64, name: &str, default: bool) -> ReadingList {
        ReadingList {
            id,
            name: name.to_string(),
            default,
            size: None,
            has_entry: false,
        }
    }
}

/// Put the default list first. Stable: other lists keep their order.
pub fn sort_default_first(mut lists: Vec<ReadingList>) -> Vec<ReadingList> {
    lists.sort_by_key(|list| !list.default);
    lists
}

/// Flag each list by whether its id is in `saved_ids`
pub fn mark_saved(lists: &[ReadingList], saved_ids: &HashSet<i64>) -> Vec<ReadingList> {
    lists
        .iter()
        .map(|list| ReadingList {
            has_entry: saved_ids.contains(&list.id),
            ..list.clone()
        })
        .collect()
}

fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// Lists whose name contains `filter`, ignoring case
pub fn filter_by_name<'a>(lists: &'a [ReadingList], filter: &str) -> Vec<&'a ReadingList> {
    let filter = normalize_name(filter);
    lists
        .iter()
        .filter(|list| normalize_name(&list.name).contains(&filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(lists: &[ReadingList]) -> Vec<&str> {
        lists.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_deserialize_api_list() {
        let list: ReadingList = serde_json::from_value(json!({
            "id": 12,
            "name": "Saved",
            "default": true,
            "size": 3,
            "description": "",
            "created": "2018-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(list.id, 12);
        assert!(list.default);
        assert_eq!(list.size, Some(3));
        assert!(!list.has_entry);
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let list: ReadingList = serde_json::from_value(json!({"id": 1, "name": "Trips"})).unwrap();
        assert_eq!(list, ReadingList::new(1, "Trips", false));
    }

    #[test]
    fn test_sort_default_first_is_stable() {
        let lists = vec![
            ReadingList::new(2, "B", false),
            ReadingList::new(1, "A", true),
            ReadingList::new(3, "C", false),
        ];

        let sorted = sort_default_first(lists);

        assert_eq!(names(&sorted), vec!["A", "B", "C"]);
        assert!(sorted[0].default);
    }

    #[test]
    fn test_sort_keeps_order_without_default() {
        let lists = vec![
            ReadingList::new(3, "Z", false),
            ReadingList::new(1, "Y", false),
            ReadingList::new(2, "X", false),
        ];

        assert_eq!(names(&sort_default_first(lists)), vec!["Z", "Y", "X"]);
    }

    #[test]
    fn test_mark_saved() {
        let mut trips = ReadingList::new(2, "Trips", false);
        trips.size = Some(9);
        let lists = vec![ReadingList::new(1, "Saved", true), trips.clone(), ReadingList::new(3, "Food", false)];
        let saved: HashSet<i64> = [2, 99].into_iter().collect();

        let marked = mark_saved(&lists, &saved);

        assert_eq!(marked.len(), lists.len());
        for (before, after) in lists.iter().zip(&marked) {
            assert_eq!(after.has_entry, saved.contains(&after.id));
            assert_eq!(
                ReadingList { has_entry: false, ..after.clone() },
                *before
            );
        }
        assert_eq!(marked[1].size, Some(9));
    }

    #[test]
    fn test_mark_saved_clears_stale_flags() {
        let mut list = ReadingList::new(1, "Saved", true);
        list.has_entry = true;

        let marked = mark_saved(&[list], &HashSet::new());

        assert!(!marked[0].has_entry);
    }

    #[test]
    fn test_filter_by_name() {
        let lists = vec![
            ReadingList::new(1, "Abby's list", true),
            ReadingList::new(2, "Cats", false),
            ReadingList::new(3, "Kebab", false),
        ];

        let filtered = filter_by_name(&lists, "ab");

        assert_eq!(filtered.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_filter_empty_returns_all_in_order() {
        let lists = vec![
            ReadingList::new(5, "E", false),
            ReadingList::new(4, "D", false),
        ];

        let filtered = filter_by_name(&lists, "");

        assert_eq!(filtered.iter().map(|l| l.id).collect::<Vec<_>>(), vec![5, 4]);
    }

    #[test]
    fn test_filter_no_match() {
        let lists = vec![ReadingList::new(1, "Cats", false)];
        assert!(filter_by_name(&lists, "dogs").is_empty());
    }
}
