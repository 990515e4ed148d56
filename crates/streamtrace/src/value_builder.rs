//! Incremental construction of the materialized document.
//!
//! The builder mirrors the decoder's container nesting: one open frame per
//! unclosed array or object. Scalars attach to the innermost frame as they
//! resolve and a closed container attaches to its parent, so the root is
//! complete the moment its closing bracket is read and no second decoding
//! pass over the raw text is needed.
use alloc::{string::String, vec::Vec};

use crate::value::{Array, Map, Value};

#[derive(Debug, Clone)]
enum Open {
    Array(Array),
    Object { map: Map, key: Option<String> },
}

impl Open {
    fn attach(&mut self, value: Value) {
        match self {
            Open::Array(items) => items.push(value),
            // Duplicate keys: last write wins.
            Open::Object { map, key } => {
                map.insert(key.take().unwrap_or_default(), value);
            }
        }
    }

    fn snapshot(&self) -> (Value, Option<&str>) {
        match self {
            Open::Array(items) => (Value::Array(items.clone()), None),
            Open::Object { map, key } => (Value::Object(map.clone()), key.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ValueBuilder {
    stack: Vec<Open>,
}

impl ValueBuilder {
    pub fn begin_object(&mut self) {
        self.stack.push(Open::Object {
            map: Map::new(),
            key: None,
        });
    }

    pub fn begin_array(&mut self) {
        self.stack.push(Open::Array(Array::new()));
    }

    /// Names the slot the next value fills in the innermost object.
    pub fn key(&mut self, name: String) {
        if let Some(Open::Object { key, .. }) = self.stack.last_mut() {
            *key = Some(name);
        }
    }

    pub fn scalar(&mut self, value: Value) {
        if let Some(open) = self.stack.last_mut() {
            open.attach(value);
        }
    }

    /// Closes the innermost container. Returns the root once the outermost
    /// container closes.
    pub fn end_container(&mut self) -> Option<Value> {
        let value = match self.stack.pop()? {
            Open::Array(items) => Value::Array(items),
            Open::Object { map, .. } => Value::Object(map),
        };
        match self.stack.last_mut() {
            Some(parent) => {
                parent.attach(value);
                None
            }
            None => Some(value),
        }
    }

    /// Everything resolved so far, with open containers included as they
    /// currently stand.
    pub fn partial(&self) -> Option<Value> {
        let mut child: Option<Value> = None;
        for open in self.stack.iter().rev() {
            let (mut value, key) = open.snapshot();
            if let Some(inner) = child.take() {
                match &mut value {
                    Value::Array(items) => items.push(inner),
                    Value::Object(map) => {
                        map.insert(key.unwrap_or_default().into(), inner);
                    }
                    _ => {}
                }
            }
            child = Some(value);
        }
        child
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::ValueBuilder;
    use crate::Value;

    #[test]
    fn nested_containers_attach_on_close() {
        let mut b = ValueBuilder::default();
        b.begin_object();
        b.key("a".into());
        b.begin_array();
        b.scalar(Value::Number(1.0));
        b.scalar(Value::Null);
        assert_eq!(b.end_container(), None);
        b.key("b".into());
        b.scalar(Value::Boolean(true));
        let root = b.end_container().unwrap();
        assert_eq!(root.to_string(), r#"{"a":[1,null],"b":true}"#);
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let mut b = ValueBuilder::default();
        b.begin_object();
        b.key("a".into());
        b.scalar(Value::Number(1024.0));
        b.key("a".into());
        b.scalar(Value::Number(2048.0));
        assert_eq!(b.end_container().unwrap().to_string(), r#"{"a":2048}"#);
    }

    #[test]
    fn partial_includes_open_containers() {
        let mut b = ValueBuilder::default();
        b.begin_object();
        b.key("list".into());
        b.begin_array();
        b.scalar(Value::from("x"));
        let partial = b.partial().unwrap();
        assert_eq!(partial.to_string(), r#"{"list":["x"]}"#);
        assert_eq!(partial.pointer("list"), Some(&Value::Array(vec![Value::from("x")])));
    }
}
