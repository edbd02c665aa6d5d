//! Reading and writing through paths

use crate::path::{Path, Segment};
use serde_json::{Map, Value};
use tracing::trace;

/// Resolve `path` against `root`.
///
/// Returns `None` when any segment is missing or an intermediate node is a
/// scalar. Segment traversal always runs first; only when it misses does a
/// multi-segment string path fall back to its whole text as one top-level
/// key, so `"a.b"` prefers `{"a": {"b": ..}}` over `{"a.b": ..}`.
#[must_use]
pub fn get<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    traverse(root, path.segments()).or_else(|| {
        let literal = path.literal()?;
        trace!(path = literal, "falling back to literal key");
        root.as_object()?.get(literal)
    })
}

/// Mutable counterpart of [`get`], with the same literal-key fallback.
#[must_use]
pub fn get_mut<'a>(root: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    if traverse(root, path.segments()).is_some() {
        return traverse_mut(root, path.segments());
    }
    let literal = path.literal()?;
    root.as_object_mut()?.get_mut(literal)
}

/// Write `value` at `path`, creating intermediate containers as needed.
///
/// A missing or scalar node on the way becomes an array when the segment
/// addressing into it is an index and an object otherwise. Arrays are padded
/// with `null` up to the written index. An index above [`MAX_INDEX`](crate::MAX_INDEX) is
/// not treated as an index and lands as an object key instead. Siblings of the
/// written leaf are left untouched. An empty path replaces `root`.
pub fn set(root: &mut Value, path: &Path, value: Value) {
    let mut node = root;
    for segment in path.segments() {
        node = slot(node, segment);
    }
    *node = value;
}

fn traverse<'a>(root: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |node, segment| match node {
            Value::Object(map) => map.get(&segment.to_key()),
            Value::Array(items) => segment.as_index().and_then(|index| items.get(index)),
            _ => None,
        })
}

fn traverse_mut<'a>(root: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    segments
        .iter()
        .try_fold(root, |node, segment| match node {
            Value::Object(map) => map.get_mut(&segment.to_key()),
            Value::Array(items) => segment
                .as_index()
                .and_then(move |index| items.get_mut(index)),
            _ => None,
        })
}

/// Child slot for `segment` inside `node`, reshaping `node` when it cannot
/// hold that segment.
fn slot<'a>(node: &'a mut Value, segment: &Segment) -> &'a mut Value {
    match (node, segment.as_index()) {
        (Value::Array(items), Some(index)) => {
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        (Value::Object(map), _) => map.entry(segment.to_key()).or_insert(Value::Null),
        (node, Some(_)) => {
            trace!(segment = %segment.to_key(), "replacing non-container with array");
            *node = Value::Array(Vec::new());
            slot(node, segment)
        }
        (node, None) => {
            trace!(segment = %segment.to_key(), "replacing non-object with object");
            *node = Value::Object(Map::new());
            slot(node, segment)
        }
    }
}
