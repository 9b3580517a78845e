//! Tier layout: rows by `tier`, columns by `order_index`, each row centered on the canvas.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{NodeId, SkillNode, Vec2f};

/// Horizontal distance between siblings, in layout units.
pub const H_SPACING: f32 = 140.0;
/// Vertical distance between tiers, in layout units.
pub const V_SPACING: f32 = 160.0;
pub const PADDING: f32 = 100.0;
pub const MIN_ROW_WIDTH: f32 = 400.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub positions: HashMap<NodeId, Vec2f>,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl LayoutResult {
    pub fn position(&self, id: &NodeId) -> Option<Vec2f> {
        self.positions.get(id).copied()
    }

    pub fn canvas_size(&self) -> Vec2f {
        Vec2f::new(self.canvas_width, self.canvas_height)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// An empty layout has no canvas; callers show an empty state instead.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Computes a position for every distinct node id.
///
/// Pure and total: the same input always yields the same map, nothing is mutated, and
/// duplicate ids keep only their first occurrence.
pub fn layout(nodes: &[SkillNode]) -> LayoutResult {
    let mut seen = HashSet::with_capacity(nodes.len());
    let mut tiers: BTreeMap<u32, Vec<&SkillNode>> = BTreeMap::new();
    for node in nodes {
        if !seen.insert(&node.id) {
            tracing::debug!(id = %node.id, "duplicate node id ignored by layout");
            continue;
        }
        tiers.entry(node.tier).or_default().push(node);
    }

    let Some((&max_tier, _)) = tiers.last_key_value() else {
        return LayoutResult::default();
    };

    // `sort_by_key` is stable: equal order indices keep their input order.
    for bucket in tiers.values_mut() {
        bucket.sort_by_key(|node| node.order_index);
    }

    let max_bucket = tiers.values().map(Vec::len).max().unwrap_or(0);
    let row_span = (max_bucket as f32 * H_SPACING).max(MIN_ROW_WIDTH);
    let canvas_height = (max_tier as f32 + 1.0) * V_SPACING + 2.0 * PADDING;

    let mut positions = HashMap::with_capacity(seen.len());
    for (&tier, bucket) in &tiers {
        let row_width = bucket.len() as f32 * H_SPACING;
        let start_x = (row_span - row_width) / 2.0 + H_SPACING / 2.0 + PADDING;
        let y = PADDING + tier as f32 * V_SPACING;

        for (i, node) in bucket.iter().enumerate() {
            let pos = node
                .placement
                .fixed_position()
                .unwrap_or_else(|| Vec2f::new(start_x + i as f32 * H_SPACING, y));
            positions.insert(node.id.clone(), pos);
        }
    }

    tracing::debug!(
        nodes = positions.len(),
        tiers = tiers.len(),
        width = row_span + 2.0 * PADDING,
        height = canvas_height,
        "skill tree laid out"
    );

    LayoutResult {
        positions,
        canvas_width: row_span + 2.0 * PADDING,
        canvas_height,
    }
}
