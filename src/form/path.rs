//! Structured value paths
//!
//! Copy-on-write get/set/delete over `serde_json::Value` addressed by
//! dotted paths such as `spec.tuningConfig.maxRowsInMemory`, `items[0].name`
//! or `{dotted.key}.value`.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Largest array index a set may grow an array to
pub const MAX_ARRAY_INDEX: usize = 10_000;

/// Canonical decimal index: digits only, no sign, no leading zeros
fn parse_index(s: &str) -> Option<usize> {
    let canonical = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s == "0" || !s.starts_with('0'));
    canonical.then(|| s.parse().ok()).flatten()
}

/// Segment of a property path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object property access: .fieldName
    Property(String),
    /// Array index access: [0], [1], etc.
    Index(usize),
}

impl PathSegment {
    /// Index this segment addresses when applied to an array
    fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Property(name) => parse_index(name),
            PathSegment::Index(idx) => Some(*idx),
        }
    }

    /// Key this segment addresses when applied to an object
    fn as_key(&self) -> String {
        match self {
            PathSegment::Property(name) => name.clone(),
            PathSegment::Index(idx) => idx.to_string(),
        }
    }
}

/// Property path for nested access
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Parse a path string.
    ///
    /// `.` separates properties, `[n]` addresses an array element and
    /// `{...}` quotes a key that itself contains dots. Empty segments are
    /// dropped.
    pub fn parse(s: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                }
                '{' if current.is_empty() => {
                    let mut key = String::new();
                    for c in chars.by_ref() {
                        if c == '}' {
                            break;
                        }
                        key.push(c);
                    }
                    segments.push(PathSegment::Property(key));
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                    let mut index_str = String::new();
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                        index_str.push(c);
                    }
                    match parse_index(&index_str) {
                        Some(idx) => segments.push(PathSegment::Index(idx)),
                        None if !index_str.is_empty() => {
                            segments.push(PathSegment::Property(index_str))
                        }
                        None => {}
                    }
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::Property(current));
        }

        Self { segments }
    }
}

impl FromStr for PropertyPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for PropertyPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Property(name) if name.contains('.') => write!(f, "{{{}}}", name)?,
                PathSegment::Property(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Property(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

fn child<'a>(value: &'a Value, seg: &PathSegment) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(&seg.as_key()),
        Value::Array(items) => seg.as_index().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, seg: &PathSegment) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(&seg.as_key()),
        Value::Array(items) => seg.as_index().and_then(move |idx| items.get_mut(idx)),
        _ => None,
    }
}

/// Read the value at `path`, `None` when any segment is missing
pub fn deep_get<'a>(value: &'a Value, path: &PropertyPath) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(value, |current, seg| child(current, seg))
}

/// Return a copy of `value` with `path` set to `new_value`.
///
/// Missing intermediates are created: an array when the segment is a
/// bracketed index, an object otherwise. Scalars in the way are replaced.
///
/// An array is never grown past [`MAX_ARRAY_INDEX`]; such a set leaves the
/// value unchanged.
pub fn deep_set(value: &Value, path: &PropertyPath, new_value: Value) -> Value {
    match set_owned(value.clone(), &path.segments, new_value) {
        Ok(updated) => updated,
        Err(idx) => {
            warn!(path = %path, index = idx, "array index too large, value left unchanged");
            value.clone()
        }
    }
}

/// Err carries the offending index
fn set_owned(current: Value, segments: &[PathSegment], new_value: Value) -> Result<Value, usize> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(new_value);
    };

    match (current, head.as_index()) {
        (Value::Array(mut items), Some(idx)) => {
            if items.len() <= idx {
                if idx > MAX_ARRAY_INDEX {
                    return Err(idx);
                }
                items.resize(idx + 1, Value::Null);
            }
            let slot = std::mem::take(&mut items[idx]);
            items[idx] = set_owned(slot, rest, new_value)?;
            Ok(Value::Array(items))
        }
        (Value::Object(mut map), _) => {
            let slot = map.entry(head.as_key()).or_insert(Value::Null);
            let existing = std::mem::take(slot);
            *slot = set_owned(existing, rest, new_value)?;
            Ok(Value::Object(map))
        }
        (_, _) => match head {
            PathSegment::Index(idx) if *idx > MAX_ARRAY_INDEX => Err(*idx),
            PathSegment::Index(idx) => {
                let mut items = vec![Value::Null; idx + 1];
                items[*idx] = set_owned(Value::Null, rest, new_value)?;
                Ok(Value::Array(items))
            }
            PathSegment::Property(name) => {
                let mut map = Map::new();
                map.insert(name.clone(), set_owned(Value::Null, rest, new_value)?);
                Ok(Value::Object(map))
            }
        },
    }
}

/// Return a copy of `value` with the leaf at `path` removed.
///
/// Only the leaf goes; parents left empty by the removal stay in place.
pub fn deep_delete(value: &Value, path: &PropertyPath) -> Value {
    let mut copy = value.clone();
    if let Some((last, parents)) = path.segments.split_last() {
        let parent = parents
            .iter()
            .try_fold(&mut copy, |current, seg| child_mut(current, seg));
        match parent {
            Some(Value::Object(map)) => {
                map.remove(&last.as_key());
            }
            Some(Value::Array(items)) => {
                if let Some(idx) = last.as_index().filter(|idx| *idx < items.len()) {
                    items.remove(idx);
                }
            }
            _ => {}
        }
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_dotted_and_indexed() {
        let path = PropertyPath::parse("spec.dimensions[2].name");
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Property("spec".into()),
                PathSegment::Property("dimensions".into()),
                PathSegment::Index(2),
                PathSegment::Property("name".into()),
            ]
        );
        assert_eq!(path.to_string(), "spec.dimensions[2].name");
    }

    #[test]
    fn test_parse_escaped_key() {
        let path = PropertyPath::parse("{druid.indexer}.mode");
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Property("druid.indexer".into()),
                PathSegment::Property("mode".into()),
            ]
        );
        assert_eq!(path.to_string(), "{druid.indexer}.mode");
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        assert_eq!(PropertyPath::parse("a..b"), PropertyPath::parse("a.b"));
        assert!(PropertyPath::parse("").segments().is_empty());
    }

    #[test]
    fn test_deep_get() {
        let model = json!({"a": {"b": [10, {"c": true}]}});
        assert_eq!(deep_get(&model, &"a.b[0]".into()), Some(&json!(10)));
        assert_eq!(deep_get(&model, &"a.b.1.c".into()), Some(&json!(true)));
        assert_eq!(deep_get(&model, &"a.x".into()), None);
        assert_eq!(deep_get(&model, &"a.b[5]".into()), None);
        assert_eq!(deep_get(&json!(3), &"a".into()), None);
    }

    #[test]
    fn test_deep_set_creates_intermediates() {
        let model = json!({});
        let updated = deep_set(&model, &"a.b.c".into(), json!(1));
        assert_eq!(updated, json!({"a": {"b": {"c": 1}}}));
        assert_eq!(model, json!({}));
    }

    #[test]
    fn test_deep_set_creates_arrays_for_indexes() {
        let updated = deep_set(&json!({}), &"list[2]".into(), json!("x"));
        assert_eq!(updated, json!({"list": [null, null, "x"]}));
    }

    #[test]
    fn test_deep_set_replaces_scalar_in_the_way() {
        let updated = deep_set(&json!({"a": 5}), &"a.b".into(), json!(true));
        assert_eq!(updated, json!({"a": {"b": true}}));
    }

    #[test]
    fn test_deep_set_into_existing_array() {
        let model = json!({"items": [{"n": 1}, {"n": 2}]});
        let updated = deep_set(&model, &"items.1.n".into(), json!(20));
        assert_eq!(updated, json!({"items": [{"n": 1}, {"n": 20}]}));
        assert_eq!(model["items"][1]["n"], json!(2));
    }

    #[test]
    fn test_deep_set_rejects_huge_indexes() {
        let model = json!({"a": [1]});
        let max = "18446744073709551615";

        assert_eq!(deep_set(&json!({}), &format!("a[{}]", max).as_str().into(), json!(1)), json!({}));
        assert_eq!(deep_set(&model, &format!("a.{}", max).as_str().into(), json!(1)), model);
        assert_eq!(deep_set(&model, &"a[10001]".into(), json!(1)), model);
        assert_eq!(deep_set(&json!({}), &"x.y[10001].z".into(), json!(1)), json!({}));

        let grown = deep_set(&json!({}), &"a[3]".into(), json!(1));
        assert_eq!(grown, json!({"a": [null, null, null, 1]}));
    }

    #[test]
    fn test_only_canonical_digits_address_array_elements() {
        let model = json!({"xs": [10, 20]});
        assert_eq!(deep_get(&model, &"xs.1".into()), Some(&json!(20)));
        assert_eq!(deep_get(&model, &"xs.+1".into()), None);
        assert_eq!(deep_get(&model, &"xs.01".into()), None);
        assert_eq!(deep_get(&model, &"xs.0".into()), Some(&json!(10)));

        assert_eq!(
            PropertyPath::parse("xs[01]").segments(),
            &[PathSegment::Property("xs".into()), PathSegment::Property("01".into())]
        );
    }

    #[test]
    fn test_deep_delete_leaf_only() {
        let model = json!({"a": {"b": 1}, "c": 2});
        let updated = deep_delete(&model, &"a.b".into());
        assert_eq!(updated, json!({"a": {}, "c": 2}));
        assert_eq!(model, json!({"a": {"b": 1}, "c": 2}));
    }

    #[test]
    fn test_deep_delete_missing_path_is_noop() {
        let model = json!({"a": 1});
        assert_eq!(deep_delete(&model, &"x.y".into()), model);
        assert_eq!(deep_delete(&model, &"a.b".into()), model);
    }

    #[test]
    fn test_deep_delete_array_element() {
        let model = json!({"xs": [1, 2, 3]});
        assert_eq!(deep_delete(&model, &"xs[1]".into()), json!({"xs": [1, 3]}));
        assert_eq!(deep_delete(&model, &"xs[9]".into()), model);
    }
}
