//! Inline widgets placed after hard breaks

use crate::document::{Document, Node};
use crate::error::Result;
use serde::Serialize;

pub const HARD_BREAK_CLASS: &str = "rm-br-decoration";

/// Widget rendered right after a `\n` inside a leaf block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardBreakWidget {
    /// Root index of the block
    pub block: usize,
    /// Byte offset just past the break
    pub offset: usize,
}

/// One widget per hard break, in document order
pub fn hard_break_widgets(document: &Document) -> Vec<HardBreakWidget> {
    document
        .children()
        .iter()
        .enumerate()
        .filter_map(|(index, node)| match node {
            Node::Leaf(block) => Some((index, block)),
            _ => None,
        })
        .flat_map(|(block, leaf)| {
            leaf.hard_break_offsets()
                .map(move |offset| HardBreakWidget { block, offset })
        })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HardBreakOverlay<'a> {
    class_name: &'static str,
    widgets: &'a [HardBreakWidget],
}

/// Widgets with the class the host renders them under
pub fn hard_breaks_json(widgets: &[HardBreakWidget]) -> Result<String> {
    let overlay = HardBreakOverlay {
        class_name: HARD_BREAK_CLASS,
        widgets,
    };
    Ok(serde_json::to_string(&overlay)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;

    #[test]
    fn test_widgets_follow_breaks() {
        let doc = Document::from_nodes(vec![
            Node::container(),
            Node::Leaf(Block::paragraph("a\nbc\nd")),
            Node::Leaf(Block::paragraph("plain")),
            Node::Leaf(Block::paragraph("x\n")),
        ]);
        assert_eq!(
            hard_break_widgets(&doc),
            vec![
                HardBreakWidget { block: 1, offset: 2 },
                HardBreakWidget { block: 1, offset: 5 },
                HardBreakWidget { block: 3, offset: 2 },
            ]
        );
    }

    #[test]
    fn test_json_carries_class() {
        let widgets = [HardBreakWidget { block: 2, offset: 4 }];
        let json: serde_json::Value = serde_json::from_str(&hard_breaks_json(&widgets).unwrap()).unwrap();
        assert_eq!(json["className"], HARD_BREAK_CLASS);
        assert_eq!(json["widgets"][0]["block"], 2);
        assert_eq!(json["widgets"][0]["offset"], 4);
    }
}
