use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const ZERO: Vec2f = Vec2f::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(self, other: Vec2f) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    #[default]
    Skill,
    Milestone,
    Capstone,
}

impl NodeType {
    /// Rendered radius in layout units.
    pub fn radius(self) -> f32 {
        match self {
            NodeType::Root => 34.0,
            NodeType::Skill => 26.0,
            NodeType::Milestone => 30.0,
            NodeType::Capstone => 38.0,
        }
    }
}

/// Learner progress on a node. Supplied by the data source, never derived here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Locked,
    Available,
    InProgress,
    Completed,
}

impl NodeStatus {
    pub fn label(self) -> &'static str {
        match self {
            NodeStatus::Locked => "Locked",
            NodeStatus::Available => "Available",
            NodeStatus::InProgress => "In Progress",
            NodeStatus::Completed => "Completed",
        }
    }
}

/// Where a node sits: computed from its tier/order, or pinned by a curator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Computed,
    Fixed { x: f32, y: f32 },
}

impl Placement {
    /// Maps the zero-sentinel wire format: a pair counts as an override when either component
    /// is nonzero, and then both values are taken verbatim.
    pub fn from_legacy(x: Option<f32>, y: Option<f32>) -> Self {
        let x = x.filter(|v| v.is_finite()).unwrap_or(0.0);
        let y = y.filter(|v| v.is_finite()).unwrap_or(0.0);
        if x != 0.0 || y != 0.0 {
            Placement::Fixed { x, y }
        } else {
            Placement::Computed
        }
    }

    pub fn fixed_position(self) -> Option<Vec2f> {
        match self {
            Placement::Computed => None,
            Placement::Fixed { x, y } => Some(Vec2f::new(x, y)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SkillNodeRecord")]
pub struct SkillNode {
    pub id: NodeId,
    pub name: String,
    pub tier: u32,
    pub order_index: i32,
    pub node_type: NodeType,
    pub status: NodeStatus,
    /// 0..=100; only meaningful while `status` is `InProgress`.
    pub progress_pct: u8,
    pub placement: Placement,
    pub description: Option<String>,
    pub xp_reward: Option<u32>,
}

impl SkillNode {
    pub fn new(id: impl Into<String>, tier: u32, order_index: i32) -> Self {
        Self {
            id: NodeId::new(id),
            name: String::new(),
            tier,
            order_index,
            node_type: NodeType::default(),
            status: NodeStatus::default(),
            progress_pct: 0,
            placement: Placement::Computed,
            description: None,
            xp_reward: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_progress(mut self, pct: u8) -> Self {
        self.progress_pct = pct.min(100);
        self
    }

    pub fn fixed_at(mut self, x: f32, y: f32) -> Self {
        self.placement = Placement::Fixed { x, y };
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }

    pub fn radius(&self) -> f32 {
        self.node_type.radius()
    }
}

/// Wire shape accepted from the data source. Accepts the explicit `placement` object as well
/// as the older `positionOverride` / `positionX`+`positionY` forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkillNodeRecord {
    id: NodeId,
    #[serde(default, alias = "title")]
    name: String,
    #[serde(default)]
    tier: u32,
    #[serde(default)]
    order_index: i32,
    #[serde(default)]
    node_type: NodeType,
    #[serde(default)]
    status: NodeStatus,
    #[serde(default)]
    progress_pct: i64,
    #[serde(default)]
    placement: Option<Placement>,
    #[serde(default)]
    position_override: Option<LegacyPoint>,
    #[serde(default)]
    position_x: Option<f32>,
    #[serde(default)]
    position_y: Option<f32>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    xp_reward: Option<u32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LegacyPoint {
    #[serde(default)]
    x: Option<f32>,
    #[serde(default)]
    y: Option<f32>,
}

impl From<SkillNodeRecord> for SkillNode {
    fn from(r: SkillNodeRecord) -> Self {
        let placement = match (r.placement, r.position_override) {
            (Some(p), _) => p,
            (None, Some(point)) => Placement::from_legacy(point.x, point.y),
            (None, None) => Placement::from_legacy(r.position_x, r.position_y),
        };
        Self {
            id: r.id,
            name: r.name,
            tier: r.tier,
            order_index: r.order_index,
            node_type: r.node_type,
            status: r.status,
            progress_pct: r.progress_pct.clamp(0, 100) as u8,
            placement,
            description: r.description.filter(|d| !d.trim().is_empty()),
            xp_reward: r.xp_reward,
        }
    }
}

/// Directed prerequisite edge `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillConnection {
    pub id: String,
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
}

impl SkillConnection {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_node_id: NodeId::new(from),
            to_node_id: NodeId::new(to),
        }
    }
}

/// Immutable snapshot handed over by the data source for one render lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTreeSnapshot {
    #[serde(default)]
    pub nodes: Vec<SkillNode>,
    #[serde(default)]
    pub connections: Vec<SkillConnection>,
}

impl SkillTreeSnapshot {
    pub fn new(nodes: Vec<SkillNode>, connections: Vec<SkillConnection>) -> Self {
        Self { nodes, connections }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bundled demo tree; falls back to an empty snapshot if the asset fails to parse.
    pub fn sample() -> Self {
        serde_json::from_str(include_str!("../assets/sample_tree.json")).unwrap_or_else(|err| {
            tracing::warn!(%err, "bundled sample tree is invalid");
            Self::default()
        })
    }
}
