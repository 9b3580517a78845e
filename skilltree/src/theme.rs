use engine::graphics::Color;

use crate::model::NodeStatus;

/// Colors for one rendering of the tree. Connector colors live with [`crate::connector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub grid: Color,
    pub label: Color,
    pub label_muted: Color,
    pub ring_track: Color,
    pub ring_fill: Color,
    pub glow: Color,
    pub panel: Color,
    pub panel_border: Color,
    pub panel_text: Color,
    pub button: Color,
    pub button_border: Color,
    pub button_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl Theme {
    pub const STANDARD: Theme = Theme {
        background: [15, 23, 42, 255],
        grid: [30, 41, 59, 255],
        label: [226, 232, 240, 255],
        label_muted: [148, 163, 184, 255],
        ring_track: [51, 65, 85, 255],
        ring_fill: [251, 191, 36, 255],
        glow: [52, 211, 153, 255],
        panel: [2, 6, 23, 255],
        panel_border: [71, 85, 105, 255],
        panel_text: [241, 245, 249, 255],
        button: [30, 41, 59, 255],
        button_border: [71, 85, 105, 255],
        button_text: [226, 232, 240, 255],
    };

    pub const HIGH_CONTRAST: Theme = Theme {
        background: [0, 0, 0, 255],
        grid: [40, 40, 40, 255],
        label: [255, 255, 255, 255],
        label_muted: [220, 220, 220, 255],
        ring_track: [90, 90, 90, 255],
        ring_fill: [255, 221, 0, 255],
        glow: [0, 255, 170, 255],
        panel: [0, 0, 0, 255],
        panel_border: [255, 255, 255, 255],
        panel_text: [255, 255, 255, 255],
        button: [0, 0, 0, 255],
        button_border: [255, 255, 255, 255],
        button_text: [255, 255, 255, 255],
    };

    pub fn for_contrast(high_contrast: bool) -> Self {
        if high_contrast {
            Self::HIGH_CONTRAST
        } else {
            Self::STANDARD
        }
    }

    pub fn node_fill(&self, status: NodeStatus) -> Color {
        let high = *self == Self::HIGH_CONTRAST;
        match (status, high) {
            (NodeStatus::Locked, false) => [71, 85, 105, 255],
            (NodeStatus::Available, false) => [14, 165, 233, 255],
            (NodeStatus::InProgress, false) => [245, 158, 11, 255],
            (NodeStatus::Completed, false) => [16, 185, 129, 255],
            (NodeStatus::Locked, true) => [110, 110, 110, 255],
            (NodeStatus::Available, true) => [0, 170, 255, 255],
            (NodeStatus::InProgress, true) => [255, 170, 0, 255],
            (NodeStatus::Completed, true) => [0, 220, 120, 255],
        }
    }

    pub fn node_outline(&self, status: NodeStatus) -> Color {
        match status {
            NodeStatus::Locked => self.label_muted,
            _ => self.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_have_distinct_fills_in_both_themes() {
        for theme in [Theme::STANDARD, Theme::HIGH_CONTRAST] {
            let fills = [
                NodeStatus::Locked,
                NodeStatus::Available,
                NodeStatus::InProgress,
                NodeStatus::Completed,
            ]
            .map(|s| theme.node_fill(s));
            for (i, a) in fills.iter().enumerate() {
                for b in &fills[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn contrast_flag_selects_theme() {
        assert_eq!(Theme::for_contrast(true), Theme::HIGH_CONTRAST);
        assert_eq!(Theme::for_contrast(false), Theme::default());
    }
}
