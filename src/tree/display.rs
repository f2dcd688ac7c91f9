//! Box-drawing pretty printer.
//!
//! Each subtree is rendered into a "box" of equal-width lines. A parent joins
//! its left and right boxes side by side, draws its own label between them and
//! connects the label to each child's label with `_`, `/` and `\` branches.

use std::fmt;

use super::{BinaryTree, NodeId};

/// What to print for each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Label {
    /// `{level-order index}-{visits}`
    Index,
    /// `visits=V, reward=R`
    #[default]
    Stats,
}

/// A rendered subtree.
struct TreeBox {
    lines: Vec<String>,
    width: usize,
    /// Column range of the subtree root's label.
    root_start: usize,
    root_end: usize,
}

impl TreeBox {
    fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0,
            root_start: 0,
            root_end: 0,
        }
    }
}

impl BinaryTree {
    /// Renders the tree as multi-line text using the given label format.
    pub fn render(&self, label: Label) -> String {
        let tree_box = self.build_box(Some(self.root()), label);
        let mut lines: Vec<&str> = tree_box.lines.iter().map(|l| l.trim_end()).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn node_label(&self, id: NodeId, label: Label) -> String {
        let node = self.get(id);
        match label {
            Label::Index => format!("{}-{}", node.level_index, node.visits),
            Label::Stats => format!("visits={}, reward={:.2}", node.visits, node.reward),
        }
    }

    fn build_box(&self, id: Option<NodeId>, label: Label) -> TreeBox {
        let Some(id) = id else {
            return TreeBox::empty();
        };
        let node = self.get(id);

        let repr = self.node_label(id, label);
        let root_width = repr.len();
        let mut gap_size = root_width;

        let left = self.build_box(node.left, label);
        let right = self.build_box(node.right, label);

        let mut line1 = String::new();
        let mut line2 = String::new();

        // Branch down to the left box.
        let root_start = if left.width > 0 {
            let l_root = (left.root_start + left.root_end) / 2 + 1;
            line1.push_str(&" ".repeat(l_root + 1));
            line1.push_str(&"_".repeat(left.width - l_root));
            line2.push_str(&" ".repeat(l_root));
            line2.push('/');
            line2.push_str(&" ".repeat(left.width - l_root));
            gap_size += 1;
            left.width + 1
        } else {
            0
        };

        line1.push_str(&repr);
        line2.push_str(&" ".repeat(root_width));

        // Branch down to the right box.
        if right.width > 0 {
            let r_root = (right.root_start + right.root_end) / 2;
            line1.push_str(&"_".repeat(r_root));
            line1.push_str(&" ".repeat(right.width - r_root + 1));
            line2.push_str(&" ".repeat(r_root));
            line2.push('\\');
            line2.push_str(&" ".repeat(right.width - r_root));
            gap_size += 1;
        }
        let root_end = root_start + root_width - 1;

        let gap = " ".repeat(gap_size);
        let mut lines = vec![line1, line2];
        for i in 0..left.lines.len().max(right.lines.len()) {
            let l_line = left
                .lines
                .get(i)
                .cloned()
                .unwrap_or_else(|| " ".repeat(left.width));
            let r_line = right
                .lines
                .get(i)
                .cloned()
                .unwrap_or_else(|| " ".repeat(right.width));
            lines.push(format!("{l_line}{gap}{r_line}"));
        }

        TreeBox {
            width: lines[0].len(),
            lines,
            root_start,
            root_end,
        }
    }
}

impl fmt::Display for BinaryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Label::Stats))
    }
}
