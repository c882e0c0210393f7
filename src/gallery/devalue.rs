//! Decoder for the flattened "devalue" encoding used by form-action results.
//!
//! A payload is a JSON array whose first element is the root value. Objects
//! and arrays hold indices into that array instead of nested values:
//!
//! ```text
//! [{"success":1,"data":2},true,{"name":3},"photo.jpg"]
//!   ⇒ {"success":true,"data":{"name":"photo.jpg"}}
//! ```
//!
//! Negative indices are sentinels. Typed entries (`["Date", ...]`,
//! `["Set", ...]`, ...) are lowered to the closest plain JSON value. Values
//! JSON cannot express (`NaN`, infinities, `undefined`) become `null`, and
//! `undefined` object members are dropped.

use serde_json::{Map, Value};

const UNDEFINED: i64 = -1;
const HOLE: i64 = -2;
const NAN: i64 = -3;
const POSITIVE_INFINITY: i64 = -4;
const NEGATIVE_INFINITY: i64 = -5;
const NEGATIVE_ZERO: i64 = -6;

/// Longest chain of nested references accepted.
pub const MAX_DEPTH: usize = 128;
/// Largest number of JSON values a payload may expand to. Shared indices are
/// expanded at every use, so this bounds the decoded size.
pub const MAX_EXPANDED_VALUES: usize = 100_000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DevalueError {
    #[error("payload must be an array or a sentinel number")]
    NotFlattened,
    #[error("index {0} is out of range")]
    BadIndex(i64),
    #[error("reference cycle through index {0}")]
    Cycle(usize),
    #[error("unsupported typed value '{0}'")]
    UnsupportedType(String),
    #[error("malformed entry at index {0}")]
    Malformed(usize),
    #[error("reference chain too deep at index {0}")]
    TooDeep(usize),
    #[error("payload expands to too many values")]
    TooLarge,
}

/// Parse a devalue string into plain JSON.
pub fn parse(s: &str) -> Result<Value, DevalueError> {
    let parsed: Value = serde_json::from_str(s).map_err(|_| DevalueError::NotFlattened)?;
    unflatten(&parsed)
}

/// Rebuild the value graph of an already-parsed devalue payload.
pub fn unflatten(parsed: &Value) -> Result<Value, DevalueError> {
    match parsed {
        Value::Number(n) => match n.as_i64() {
            Some(i) if i < 0 => Ok(sentinel(i).unwrap_or(Value::Null)),
            _ => Err(DevalueError::NotFlattened),
        },
        Value::Array(values) if !values.is_empty() => {
            Ok(Hydrator::new(values).hydrate(0)?.unwrap_or(Value::Null))
        }
        _ => Err(DevalueError::NotFlattened),
    }
}

/// Sentinel value for a negative index. `Some(Null)` also covers `undefined`
/// when used at the top level.
fn sentinel(index: i64) -> Option<Value> {
    match index {
        UNDEFINED | HOLE | NAN | POSITIVE_INFINITY | NEGATIVE_INFINITY => Some(Value::Null),
        NEGATIVE_ZERO => Some(Value::from(0)),
        _ => None,
    }
}

/// A hydrated entry and the number of values it expanded to.
#[derive(Clone)]
struct Hydrated {
    value: Value,
    size: usize,
}

/// Walks a flattened payload. Each index is hydrated once and cloned on
/// later uses.
struct Hydrator<'a> {
    values: &'a [Value],
    cache: Vec<Option<Hydrated>>,
    on_path: Vec<bool>,
    depth: usize,
    expanded: usize,
}

impl<'a> Hydrator<'a> {
    fn new(values: &'a [Value]) -> Self {
        Self {
            values,
            cache: vec![None; values.len()],
            on_path: vec![false; values.len()],
            depth: 0,
            expanded: 0,
        }
    }

    fn charge(&mut self, size: usize) -> Result<(), DevalueError> {
        self.expanded = self.expanded.saturating_add(size);
        if self.expanded > MAX_EXPANDED_VALUES {
            return Err(DevalueError::TooLarge);
        }
        Ok(())
    }

    /// Hydrate a reference. `Ok(None)` means `undefined`.
    fn hydrate_ref(
        &mut self,
        reference: &Value,
        from: usize,
    ) -> Result<Option<Value>, DevalueError> {
        let index = reference.as_i64().ok_or(DevalueError::Malformed(from))?;
        if index == UNDEFINED {
            return Ok(None);
        }
        if index < 0 {
            let value = sentinel(index).ok_or(DevalueError::BadIndex(index))?;
            self.charge(1)?;
            return Ok(Some(value));
        }
        let index = usize::try_from(index).map_err(|_| DevalueError::BadIndex(index))?;
        self.hydrate(index)
    }

    fn hydrate(&mut self, index: usize) -> Result<Option<Value>, DevalueError> {
        let values = self.values;
        let entry = values
            .get(index)
            .ok_or(DevalueError::BadIndex(index as i64))?;
        if let Some(hit) = &self.cache[index] {
            let Hydrated { value, size } = hit.clone();
            self.charge(size)?;
            return Ok(Some(value));
        }
        if self.on_path[index] {
            return Err(DevalueError::Cycle(index));
        }
        if self.depth >= MAX_DEPTH {
            return Err(DevalueError::TooDeep(index));
        }

        self.on_path[index] = true;
        self.depth += 1;
        let before = self.expanded;
        let result = match entry {
            Value::Array(items) => self.hydrate_array(index, items),
            Value::Object(members) => self.hydrate_object(index, members),
            primitive => Ok(primitive.clone()),
        };
        self.depth -= 1;
        self.on_path[index] = false;

        let value = result?;
        self.charge(1)?;
        self.cache[index] = Some(Hydrated {
            value: value.clone(),
            size: self.expanded - before,
        });
        Ok(Some(value))
    }

    fn hydrate_object(
        &mut self,
        index: usize,
        members: &Map<String, Value>,
    ) -> Result<Value, DevalueError> {
        let mut out = Map::new();
        for (key, reference) in members {
            if let Some(v) = self.hydrate_ref(reference, index)? {
                out.insert(key.clone(), v);
            }
        }
        Ok(Value::Object(out))
    }

    fn hydrate_list(&mut self, index: usize, refs: &[Value]) -> Result<Vec<Value>, DevalueError> {
        let mut out = Vec::with_capacity(refs.len());
        for reference in refs {
            out.push(self.hydrate_ref(reference, index)?.unwrap_or(Value::Null));
        }
        Ok(out)
    }

    fn hydrate_array(&mut self, index: usize, items: &[Value]) -> Result<Value, DevalueError> {
        let Some(Value::String(kind)) = items.first() else {
            return self.hydrate_list(index, items).map(Value::Array);
        };

        match kind.as_str() {
            "Date" | "BigInt" | "RegExp" | "URL" | "Object" => {
                items.get(1).cloned().ok_or(DevalueError::Malformed(index))
            }
            "Set" => self.hydrate_list(index, &items[1..]).map(Value::Array),
            "Map" => {
                let mut out = Vec::new();
                for pair in items[1..].chunks(2) {
                    let [key, value] = pair else {
                        return Err(DevalueError::Malformed(index));
                    };
                    let key = self.hydrate_ref(key, index)?.unwrap_or(Value::Null);
                    let value = self.hydrate_ref(value, index)?.unwrap_or(Value::Null);
                    out.push(Value::Array(vec![key, value]));
                }
                Ok(Value::Array(out))
            }
            "null" => {
                let mut out = Map::new();
                for pair in items[1..].chunks(2) {
                    let [Value::String(key), value] = pair else {
                        return Err(DevalueError::Malformed(index));
                    };
                    if let Some(v) = self.hydrate_ref(value, index)? {
                        out.insert(key.clone(), v);
                    }
                }
                Ok(Value::Object(out))
            }
            other => Err(DevalueError::UnsupportedType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_envelope_with_nested_object() {
        let payload = r#"[{"success":1,"data":2},true,{"name":3,"size":4},"photo.jpg",2048]"#;
        let value = parse(payload).expect("parse devalue");
        assert_eq!(
            value,
            json!({ "success": true, "data": { "name": "photo.jpg", "size": 2048 } })
        );
    }

    #[test]
    fn decodes_arrays_of_references() {
        let payload = r#"[[1,2],"a","b"]"#;
        assert_eq!(parse(payload).expect("parse"), json!(["a", "b"]));
    }

    #[test]
    fn shared_references_are_expanded_each_time() {
        let payload = r#"[{"a":1,"b":1},"same"]"#;
        assert_eq!(parse(payload).expect("parse"), json!({ "a": "same", "b": "same" }));
    }

    #[test]
    fn undefined_members_are_dropped_and_holes_become_null() {
        let payload = r#"[{"kept":1,"gone":-1,"list":2},"x",[1,-2]]"#;
        assert_eq!(
            parse(payload).expect("parse"),
            json!({ "kept": "x", "list": ["x", null] })
        );
    }

    #[test]
    fn special_numbers_lower_to_json() {
        let payload = r#"[{"nan":-3,"zero":-6}]"#;
        assert_eq!(parse(payload).expect("parse"), json!({ "nan": null, "zero": 0 }));
    }

    #[test]
    fn typed_entries_lower_to_plain_values() {
        let payload = r#"[{"when":1,"tags":2},["Date","2026-01-01T00:00:00.000Z"],["Set",3,4],"a","b"]"#;
        assert_eq!(
            parse(payload).expect("parse"),
            json!({ "when": "2026-01-01T00:00:00.000Z", "tags": ["a", "b"] })
        );
    }

    #[test]
    fn null_prototype_object_is_decoded() {
        let payload = r#"[["null","k",1],"v"]"#;
        assert_eq!(parse(payload).expect("parse"), json!({ "k": "v" }));
    }

    #[test]
    fn top_level_sentinel_is_null() {
        assert_eq!(parse("-1").expect("parse"), Value::Null);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let result = parse(r#"[{"a":7}]"#);
        assert_eq!(result, Err(DevalueError::BadIndex(7)));
    }

    #[test]
    fn cycles_are_rejected() {
        let result = parse(r#"[{"self":0}]"#);
        assert_eq!(result, Err(DevalueError::Cycle(0)));
    }

    #[test]
    fn plain_objects_are_not_devalue() {
        assert_eq!(parse(r#"{"success":true}"#), Err(DevalueError::NotFlattened));
        assert_eq!(parse("[]"), Err(DevalueError::NotFlattened));
    }

    #[test]
    fn long_reference_chain_is_too_deep() {
        let links = 200_000;
        let mut entries: Vec<String> = (1..=links).map(|i| format!("[{i}]")).collect();
        entries.push("\"x\"".to_string());
        let payload = format!("[{}]", entries.join(","));

        let result = parse(&payload);
        assert!(matches!(result, Err(DevalueError::TooDeep(_))));
    }

    #[test]
    fn chain_within_depth_limit_decodes() {
        let mut entries: Vec<String> = (1..=100).map(|i| format!("[{i}]")).collect();
        entries.push("\"x\"".to_string());
        let payload = format!("[{}]", entries.join(","));

        let mut expected = json!("x");
        for _ in 0..100 {
            expected = json!([expected]);
        }
        assert_eq!(parse(&payload).expect("parse"), expected);
    }

    #[test]
    fn doubled_chain_is_bounded() {
        let depth = 40;
        let mut entries: Vec<String> = (1..=depth).map(|i| format!("[{i},{i}]")).collect();
        entries.push("\"x\"".to_string());
        let payload = format!("[{}]", entries.join(","));

        assert_eq!(parse(&payload), Err(DevalueError::TooLarge));
    }

    #[test]
    fn shared_index_within_budget_is_reused() {
        let payload = r#"[[1,1,1],{"name":2,"size":3},"photo.jpg",2048]"#;
        let one = json!({ "name": "photo.jpg", "size": 2048 });
        assert_eq!(parse(payload).expect("parse"), json!([one, one, one]));
    }

    #[test]
    fn unknown_typed_value_is_rejected() {
        let result = parse(r#"[["Widget",1],"x"]"#);
        assert_eq!(result, Err(DevalueError::UnsupportedType("Widget".to_string())));
    }
}
