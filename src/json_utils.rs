use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// Model output is free text that usually wraps one JSON payload in prose or a
// ```json fence. Everything here works on byte coordinates of balanced
// structures, skipping brackets that appear inside string literals.

/// Type of a JSON node found by the structure scanner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeType {
    Object,
    Array,
}

/// Coordinates of a JSON structure within a larger text, including nested children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjCoords {
    pub start: usize,
    pub end: usize, // inclusive index of the closing bracket/brace
    pub kind: NodeType,
    pub children: Vec<ObjCoords>,
}

impl ObjCoords {
    pub fn new(start: usize, end: usize, kind: NodeType, children: Vec<ObjCoords>) -> Self {
        Self { start, end, kind, children }
    }

    /// The text covered by this node.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..=self.end]
    }
}

#[derive(Debug)]
struct Frame {
    start: usize,
    kind: NodeType,
    children: Vec<ObjCoords>,
}

/// Find all balanced JSON object/array structures in the given text. Coordinates are byte indices.
#[instrument(target = "daily_prep::json", skip(text), fields(text_len = text.len()))]
pub fn find_json_structures(text: &str) -> Vec<ObjCoords> {
    let bytes = text.as_bytes();
    let mut results: Vec<ObjCoords> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let closing = match b {
            b'"' => {
                in_string = true;
                None
            }
            b'{' => {
                stack.push(Frame { start: i, kind: NodeType::Object, children: Vec::new() });
                None
            }
            b'[' => {
                stack.push(Frame { start: i, kind: NodeType::Array, children: Vec::new() });
                None
            }
            b'}' => Some(NodeType::Object),
            b']' => Some(NodeType::Array),
            _ => None,
        };

        let Some(kind) = closing else { continue };
        // A closer that does not match the open frame means the text was not
        // JSON there; drop the frame and keep scanning.
        if let Some(frame) = stack.pop() {
            if frame.kind == kind {
                let node = ObjCoords::new(frame.start, i, kind, frame.children);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => results.push(node),
                }
            }
        }
    }

    debug!(target = "daily_prep::json", count = results.len(), "found root structures");
    results
}

fn first_of_kind(text: &str, kind: NodeType) -> Option<&str> {
    fn search<'a>(text: &'a str, nodes: &[ObjCoords], kind: NodeType) -> Option<&'a str> {
        nodes.iter().find_map(|node| {
            if node.kind == kind {
                Some(node.slice(text))
            } else {
                search(text, &node.children, kind)
            }
        })
    }
    search(text, &find_json_structures(text), kind)
}

/// The first balanced JSON array in `text`, searching nested structures too.
pub fn extract_first_array(text: &str) -> Option<&str> {
    first_of_kind(text, NodeType::Array)
}

/// The first balanced JSON object in `text`, searching nested structures too.
pub fn extract_first_object(text: &str) -> Option<&str> {
    first_of_kind(text, NodeType::Object)
}
