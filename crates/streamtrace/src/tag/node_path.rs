//! Node addresses for the tag decoder.
//!
//! Every open element or text run is a [`Frame`] carrying its own sibling
//! counters, so indices restart under each parent. The bottom frame stands
//! for the configured parent path and is never popped.
use alloc::{collections::BTreeMap, format, string::String, vec, vec::Vec};

/// Segment name of a text run.
pub(crate) const TEXT_NODE: &str = "$$TEXTNODE";

#[derive(Debug, Clone)]
struct Frame {
    name: String,
    /// Length of the address before this frame's segment.
    mark: usize,
    text: bool,
    /// Children opened so far, per name.
    children: BTreeMap<String, usize>,
}

impl Frame {
    fn new(name: String, mark: usize, text: bool) -> Self {
        Self {
            name,
            mark,
            text,
            children: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodePath {
    address: String,
    frames: Vec<Frame>,
}

impl NodePath {
    pub fn new(root: Option<&str>) -> Self {
        let address: String = root.unwrap_or_default().into();
        Self {
            frames: vec![Frame::new(String::new(), address.len(), false)],
            address,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn push(&mut self, name: &str, text: bool) {
        let Some(parent) = self.frames.last_mut() else {
            return;
        };
        let index = parent.children.entry(name.into()).or_default();
        *index += 1;
        let segment = format!("/{name}[{index}]");
        let mark = self.address.len();
        self.address.push_str(&segment);
        self.frames.push(Frame::new(name.into(), mark, text));
    }

    pub fn push_element(&mut self, name: &str) {
        self.push(name, false);
    }

    pub fn push_text(&mut self) {
        self.push(TEXT_NODE, true);
    }

    /// Pops the innermost node. The root frame stays.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            if let Some(frame) = self.frames.pop() {
                self.address.truncate(frame.mark);
            }
        }
    }

    pub fn in_text(&self) -> bool {
        self.frames.last().is_some_and(|f| f.text)
    }

    /// Name of the innermost open element.
    pub fn current_element(&self) -> Option<&str> {
        self.frames[1..].iter().rev().find(|f| !f.text).map(|f| f.name.as_str())
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.frames[1..].iter().filter(|f| !f.text).count()
    }

    /// How many nodes sit above the innermost open element named `name`
    /// (compared case-insensitively), or `None` if no such element is open.
    pub fn distance_to(&self, name: &str) -> Option<usize> {
        self.frames[1..]
            .iter()
            .rev()
            .position(|f| !f.text && f.name.eq_ignore_ascii_case(name))
    }

    /// Name of the innermost node.
    pub fn top_name(&self) -> &str {
        self.frames.last().map_or("", |f| f.name.as_str())
    }
}
