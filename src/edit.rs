use crate::types::{Position, Range};

/// One queued text operation, in pre-edit document coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub range: Range,
    pub text: String,
}

/// Collects inserts and replacements that the host applies as one atomic edit.
#[derive(Debug, Clone, Default)]
pub struct EditBuilder {
    ops: Vec<EditOp>,
}

impl EditBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, at: Position, text: impl Into<String>) {
        self.ops.push(EditOp {
            range: Range::empty(at),
            text: text.into(),
        });
    }

    pub fn replace(&mut self, range: Range, text: impl Into<String>) {
        self.ops.push(EditOp {
            range,
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operations in queue order.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Order the queued operations for application.
    ///
    /// The result is sorted by start position and never overlaps. Operations at
    /// the same position keep their queue order, so their texts end up
    /// back-to-back. An operation reaching into text an earlier one already
    /// replaced is clamped to start where that replacement ended.
    pub fn resolve(&self) -> Vec<EditOp> {
        let mut ops = self.ops.clone();
        // stable: queue order survives for equal starts
        ops.sort_by_key(|op| op.range.start);

        let mut consumed_until: Option<Position> = None;
        for op in &mut ops {
            if let Some(limit) = consumed_until
                && op.range.start < limit
            {
                op.range.start = limit;
                op.range.end = op.range.end.max(limit);
            }
            consumed_until = Some(consumed_until.map_or(op.range.end, |p| p.max(op.range.end)));
        }
        ops
    }
}
