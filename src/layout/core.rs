use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::geometry::{Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Row,
    Column,
}

/// Space rule for one child along the parent's axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Fixed(u16),
    Percent(u8),
    /// At least this many cells, then shares leftover space like `Flex(1)`.
    Min(u16),
    Flex(u16),
}

pub type NodeId = String;

#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: NodeId,
    pub direction: Direction,
    pub constraints: Vec<Constraint>,
    pub children: Vec<LayoutNode>,
    pub gap: u16,
}

impl LayoutNode {
    pub fn leaf(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            direction: Direction::Row,
            constraints: Vec::new(),
            children: Vec::new(),
            gap: 0,
        }
    }

    pub fn container(
        id: impl Into<NodeId>,
        direction: Direction,
        constraints: Vec<Constraint>,
        children: Vec<LayoutNode>,
    ) -> Self {
        Self {
            id: id.into(),
            direction,
            constraints,
            children,
            gap: 0,
        }
    }

    pub fn with_gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LayoutTree {
    pub root: LayoutNode,
}

impl LayoutTree {
    pub fn new(root: LayoutNode) -> Self {
        Self { root }
    }

    /// Solve rectangles for every node, keyed by node id.
    pub fn solve(&self, size: Size) -> Result<HashMap<NodeId, Rect>> {
        if self.root.is_leaf() {
            return Err(ForgeError::EmptyLayout);
        }
        let mut rects = HashMap::new();
        solve_node(
            &self.root,
            Rect::new(0, 0, size.width, size.height),
            &mut rects,
        );
        Ok(rects)
    }

    /// Ids of leaf nodes in declaration order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect_leaves(&self.root, &mut out);
        out
    }
}

fn collect_leaves(node: &LayoutNode, out: &mut Vec<NodeId>) {
    if node.is_leaf() {
        out.push(node.id.clone());
    }
    for child in &node.children {
        collect_leaves(child, out);
    }
}

fn solve_node(node: &LayoutNode, rect: Rect, accum: &mut HashMap<NodeId, Rect>) {
    accum.insert(node.id.clone(), rect);
    if node.is_leaf() {
        return;
    }

    let axis = match node.direction {
        Direction::Row => rect.width,
        Direction::Column => rect.height,
    };
    let gaps = node
        .gap
        .saturating_mul(node.children.len().saturating_sub(1) as u16);
    let spans = distribute(axis.saturating_sub(gaps), node.children.len(), &node.constraints);

    let mut cursor = match node.direction {
        Direction::Row => rect.x,
        Direction::Column => rect.y,
    };
    for (child, span) in node.children.iter().zip(spans) {
        let child_rect = match node.direction {
            Direction::Row => Rect::new(cursor, rect.y, span, rect.height),
            Direction::Column => Rect::new(rect.x, cursor, rect.width, span),
        };
        solve_node(child, child_rect, accum);
        cursor = cursor.saturating_add(span).saturating_add(node.gap);
    }
}

/// Split `available` cells between `count` children. Fixed and percent spans
/// are honoured first, then minimums; the remainder goes to flexible children
/// by weight. Overflow is taken back from the last children first.
fn distribute(available: u16, count: usize, constraints: &[Constraint]) -> Vec<u16> {
    let rules: Vec<Constraint> = (0..count)
        .map(|idx| constraints.get(idx).copied().unwrap_or(Constraint::Flex(1)))
        .collect();

    let mut spans: Vec<u32> = rules
        .iter()
        .map(|rule| match *rule {
            Constraint::Fixed(value) => value as u32,
            Constraint::Percent(pct) => (available as u32 * pct.min(100) as u32) / 100,
            Constraint::Min(min) => min as u32,
            Constraint::Flex(_) => 0,
        })
        .collect();

    let total = available as u32;
    let mut used: u32 = spans.iter().sum();

    if used > total {
        for span in spans.iter_mut().rev() {
            let cut = (*span).min(used - total);
            *span -= cut;
            used -= cut;
            if used == total {
                break;
            }
        }
    }

    let weights: Vec<u32> = rules
        .iter()
        .map(|rule| match *rule {
            Constraint::Flex(weight) => weight.max(1) as u32,
            Constraint::Min(_) => 1,
            _ => 0,
        })
        .collect();
    let weight_total: u32 = weights.iter().sum();
    let remaining = total.saturating_sub(used);

    if weight_total > 0 && remaining > 0 {
        let mut handed_out = 0;
        for (span, weight) in spans.iter_mut().zip(&weights) {
            let share = remaining * weight / weight_total;
            *span += share;
            handed_out += share;
        }
        // Rounding leftovers land on the last flexible child.
        if let Some(idx) = weights.iter().rposition(|weight| *weight > 0) {
            spans[idx] += remaining - handed_out;
        }
    }

    spans
        .into_iter()
        .map(|span| span.min(u16::MAX as u32) as u16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbench_column_fills_height() {
        let tree = LayoutTree::new(LayoutNode::container(
            "root",
            Direction::Column,
            vec![Constraint::Fixed(1), Constraint::Fixed(2), Constraint::Flex(1), Constraint::Fixed(1)],
            vec![
                LayoutNode::leaf("tabs"),
                LayoutNode::leaf("controls"),
                LayoutNode::leaf("body"),
                LayoutNode::leaf("status"),
            ],
        ));
        let rects = tree.solve(Size::new(80, 24)).unwrap();
        assert_eq!(rects["tabs"], Rect::new(0, 0, 80, 1));
        assert_eq!(rects["controls"], Rect::new(0, 1, 80, 2));
        assert_eq!(rects["body"], Rect::new(0, 3, 80, 20));
        assert_eq!(rects["status"], Rect::new(0, 23, 80, 1));
        assert_eq!(tree.leaves(), vec!["tabs", "controls", "body", "status"]);
    }

    #[test]
    fn row_mixes_percent_min_and_flex_with_gap() {
        let tree = LayoutTree::new(
            LayoutNode::container(
                "root",
                Direction::Row,
                vec![Constraint::Percent(25), Constraint::Min(10), Constraint::Flex(2)],
                vec![LayoutNode::leaf("a"), LayoutNode::leaf("b"), LayoutNode::leaf("c")],
            )
            .with_gap(1),
        );
        let rects = tree.solve(Size::new(102, 5)).unwrap();
        // 100 cells after gaps; 65 left after a=25 and b's minimum of 10.
        assert_eq!(rects["a"].width, 25);
        assert_eq!(rects["b"].width, 31);
        assert_eq!(rects["c"].width, 44);
        assert_eq!(rects["b"].x, 26);
        assert_eq!(rects["c"].x, 58);
    }

    #[test]
    fn overflow_shrinks_trailing_children() {
        let spans = distribute(10, 3, &[Constraint::Fixed(6), Constraint::Fixed(6), Constraint::Fixed(6)]);
        assert_eq!(spans, vec![6, 4, 0]);
    }

    #[test]
    fn leaf_root_is_rejected() {
        let tree = LayoutTree::new(LayoutNode::leaf("only"));
        assert!(matches!(tree.solve(Size::new(10, 10)), Err(ForgeError::EmptyLayout)));
    }
}
