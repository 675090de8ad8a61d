//! Read and write helpers over the nested map stored in a structured attribute.
//!
//! Reads tolerate absence: a missing key anywhere along the way yields `None`.
//! Writes autovivify: missing intermediate keys are created as empty maps, and
//! values that cannot hold the next key are replaced by one.

use serde_json::{Map, Value};

use crate::errors::FieldError;
use crate::path::AttributePath;

/// Looks up the value addressed by `segments` below `root`.
///
/// Numeric segments index into arrays, so `tags->0` reads the first tag.
pub fn read_nested<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path.nested()` below `root`, creating intermediate maps.
///
/// Whatever stands in the way is replaced: a scalar or `null` becomes an empty
/// map, and a list that cannot be indexed by the segment becomes a map keyed by
/// its former indices (`["a"]` turns into `{"0": "a"}`). Only a path with no
/// segment below the top-level attribute is rejected.
pub fn write_nested(root: &mut Value, path: &AttributePath, value: Value) -> Result<(), FieldError> {
    let Some((key, parents)) = path.nested().split_last() else {
        return Err(FieldError::invalid_path(
            path.to_string(),
            "path must address a key inside the structured attribute",
        ));
    };
    let mut current = root;
    for segment in parents {
        current = child_mut(current, segment);
    }
    *child_mut(current, key) = value;
    Ok(())
}

/// Slot for `segment` inside `container`, reshaping the container when needed.
fn child_mut<'a>(container: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &*container {
        Value::Array(items) => segment.parse::<usize>().ok().filter(|index| *index <= items.len()),
        _ => None,
    };
    if index.is_none() && !container.is_object() {
        *container = Value::Object(match container.take() {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            _ => Map::new(),
        });
    }

    match container {
        Value::Array(items) => {
            let index = index.unwrap_or(items.len());
            if index == items.len() {
                items.push(Value::Null);
            }
            &mut items[index]
        }
        Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> AttributePath {
        AttributePath::parse(raw).unwrap()
    }

    #[test]
    fn reads_nested_values() {
        let root = json!({"location": {"latitude": "1.5"}, "tags": ["a", "b"]});
        let lat = path("address->location->latitude");
        assert_eq!(read_nested(&root, lat.nested()), Some(&json!("1.5")));
        let tag = path("address->tags->1");
        assert_eq!(read_nested(&root, tag.nested()), Some(&json!("b")));
    }

    #[test]
    fn missing_segments_read_as_none() {
        let root = json!({"street": "x"});
        assert_eq!(read_nested(&root, path("address->location->latitude").nested()), None);
        assert_eq!(read_nested(&root, path("address->street->name").nested()), None);
        assert_eq!(read_nested(&Value::Null, path("address->street").nested()), None);
    }

    #[test]
    fn write_creates_intermediate_maps() {
        let mut root = json!({"street": ""});
        write_nested(&mut root, &path("address->location->latitude"), json!("some-val")).unwrap();
        assert_eq!(root, json!({"street": "", "location": {"latitude": "some-val"}}));
    }

    #[test]
    fn write_on_null_root_starts_empty_map() {
        let mut root = Value::Null;
        write_nested(&mut root, &path("address->street"), json!("main")).unwrap();
        assert_eq!(root, json!({"street": "main"}));
    }

    #[test]
    fn write_replaces_scalar_in_the_way() {
        let mut root = json!({"location": "somewhere"});
        write_nested(&mut root, &path("address->location->latitude"), json!("1")).unwrap();
        assert_eq!(root, json!({"location": {"latitude": "1"}}));

        let mut root = json!("not a map");
        write_nested(&mut root, &path("address->street"), json!("main")).unwrap();
        assert_eq!(root, json!({"street": "main"}));
    }

    #[test]
    fn write_on_empty_list_starts_map() {
        let mut root = json!([]);
        write_nested(&mut root, &path("address->street"), json!("main")).unwrap();
        assert_eq!(root, json!({"street": "main"}));
    }

    #[test]
    fn write_requires_nested_segment() {
        let mut root = json!({});
        let err = write_nested(&mut root, &path("address"), json!("x")).unwrap_err();
        assert!(matches!(err, FieldError::InvalidPath { .. }));
    }

    #[test]
    fn write_indexes_lists_and_keys_the_rest() {
        let mut root = json!({"lines": ["a", "b"]});
        write_nested(&mut root, &path("address->lines->1"), json!("c")).unwrap();
        assert_eq!(root, json!({"lines": ["a", "c"]}));
        write_nested(&mut root, &path("address->lines->2"), json!("d")).unwrap();
        assert_eq!(root, json!({"lines": ["a", "c", "d"]}));
        write_nested(&mut root, &path("address->lines->extra"), json!("e")).unwrap();
        assert_eq!(root, json!({"lines": {"0": "a", "1": "c", "2": "d", "extra": "e"}}));
    }
}
