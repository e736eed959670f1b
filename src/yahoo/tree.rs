//! Readers for the Yahoo Fantasy API's irregular JSON.
//!
//! The API wraps most records in one of two shapes, unpredictably: a plain
//! object, or an array of single-key fragment objects that together make up
//! the record. Collections arrive as counted pseudo-arrays keyed by stringed
//! indices: `{"0": {..}, "1": {..}, "count": 2}`. Numbers are usually
//! strings. Everything here accepts all of it and answers `None` instead of
//! failing when a piece is missing.

use serde_json::Value;

/// Uniform view over a node that is either a bare object or an array of
/// fragment objects.
pub enum Fragments<'a> {
    Seq(&'a [Value]),
    One(&'a Value),
}

impl<'a> Fragments<'a> {
    pub fn of(node: &'a Value) -> Fragments<'a> {
        match node.as_array() {
            Some(items) => Fragments::Seq(items),
            None => Fragments::One(node),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Value> {
        match self {
            Fragments::Seq(items) => items.iter(),
            Fragments::One(v) => std::slice::from_ref(*v).iter(),
        }
    }
}

/// Look up `key` in a list-or-object wrapper. The first fragment carrying
/// `key` wins; the value under the key is returned, not the fragment.
pub fn find_field<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    Fragments::of(node).iter().find_map(|frag| frag.get(key))
}

/// Iterate a counted pseudo-array in index order. The `count` field is
/// authoritative; indices it promises but does not deliver are skipped.
pub fn counted_items<'a>(node: &'a Value) -> impl Iterator<Item = &'a Value> + 'a {
    let count = node.get("count").and_then(as_u64_lenient).unwrap_or(0);
    (0..count).filter_map(move |i| node.get(i.to_string().as_str()))
}

/// Accept a JSON number or a numeric string.
pub fn as_f64_lenient(v: &Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

/// Accept a JSON integer or an integer string.
pub fn as_u64_lenient(v: &Value) -> Option<u64> {
    v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

/// String content of a node, with the empty string treated as absent.
pub fn as_str_nonempty(v: &Value) -> Option<&str> {
    v.as_str().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn find_field_reads_bare_objects() {
        let node = json!({"standings": {"rank": 1}, "name": "x"});
        assert_eq!(find_field(&node, "name").and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn find_field_searches_fragment_lists() {
        let node = json!([
            {"team_key": "303.l.13567.t.4"},
            {"name": "Ice Pilots"},
            {"managers": []}
        ]);
        assert_eq!(
            find_field(&node, "name").and_then(Value::as_str),
            Some("Ice Pilots")
        );
        assert_eq!(
            find_field(&node, "team_key").and_then(Value::as_str),
            Some("303.l.13567.t.4")
        );
    }

    #[test]
    fn find_field_absent_key_is_none() {
        assert!(find_field(&json!([{"a": 1}]), "b").is_none());
        assert!(find_field(&json!({"a": 1}), "b").is_none());
        assert!(find_field(&json!("scalar"), "b").is_none());
    }

    #[test]
    fn counted_items_walks_stringed_indices() {
        let node = json!({"0": {"id": 0}, "1": {"id": 1}, "count": 2});
        let ids: Vec<i64> = counted_items(&node)
            .filter_map(|v| v.get("id").and_then(Value::as_i64))
            .collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn counted_items_accepts_string_counts_and_skips_holes() {
        let node = json!({"0": {"id": 0}, "2": {"id": 2}, "count": "3"});
        let ids: Vec<i64> = counted_items(&node)
            .filter_map(|v| v.get("id").and_then(Value::as_i64))
            .collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn counted_items_without_a_usable_count_is_empty() {
        assert_eq!(counted_items(&json!({"0": {}})).count(), 0);
        assert_eq!(counted_items(&json!({"0": {}, "count": "soon"})).count(), 0);
        assert_eq!(counted_items(&json!(null)).count(), 0);
    }

    #[test]
    fn lenient_numbers_take_both_spellings() {
        assert_eq!(as_f64_lenient(&json!("3.5")), Some(3.5));
        assert_eq!(as_f64_lenient(&json!(3.5)), Some(3.5));
        assert_eq!(as_f64_lenient(&json!("abc")), None);
        assert_eq!(as_f64_lenient(&json!({})), None);

        assert_eq!(as_u64_lenient(&json!("21")), Some(21));
        assert_eq!(as_u64_lenient(&json!(21)), Some(21));
        assert_eq!(as_u64_lenient(&json!("21.5")), None);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        assert_eq!(as_str_nonempty(&json!("")), None);
        assert_eq!(as_str_nonempty(&json!("x")), Some("x"));
        assert_eq!(as_str_nonempty(&json!(7)), None);
    }
}
