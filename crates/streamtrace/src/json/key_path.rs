//! URI bookkeeping for the JSON decoder.
//!
//! [`KeyPath`] holds one segment per open value context plus a counter per
//! open array. The joined URI is cached and patched on every push and pop, so
//! emitting a per-character event never re-joins the whole path.
use alloc::{string::String, vec::Vec};
use core::fmt::Write as _;

#[derive(Debug, Clone)]
pub(crate) struct KeyPath {
    /// Length of the root prefix inside `uri`.
    root_len: usize,
    uri: String,
    /// Length of `uri` before each segment was appended.
    marks: Vec<usize>,
    /// Next element index of every open array, innermost last.
    indices: Vec<usize>,
}

impl KeyPath {
    pub fn new(root: Option<&str>) -> Self {
        let uri: String = root.unwrap_or_default().into();
        Self {
            root_len: uri.len(),
            uri,
            marks: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    fn separate(&mut self) {
        let nested = !self.marks.is_empty() || self.root_len > 0;
        self.marks.push(self.uri.len());
        if nested {
            self.uri.push('/');
        }
    }

    pub fn push_key(&mut self, key: &str) {
        self.separate();
        self.uri.push_str(key);
    }

    /// Enters the next element of the innermost array and returns its index.
    pub fn push_index(&mut self) -> usize {
        let index = match self.indices.last_mut() {
            Some(next) => {
                let index = *next;
                *next += 1;
                index
            }
            None => 0,
        };
        self.separate();
        let _ = write!(self.uri, "{index}");
        index
    }

    pub fn pop(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.uri.truncate(mark);
        }
    }

    pub fn open_array(&mut self) {
        self.indices.push(0);
    }

    pub fn close_array(&mut self) {
        self.indices.pop();
    }
}
