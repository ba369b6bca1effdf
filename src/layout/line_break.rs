//! Line breaking for the headless layout

use crate::document::{Block, BlockKind};
use crate::layout::font::FontMetrics;
use std::ops::Range;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Indentation width per list level
pub const INDENT_WIDTH: f32 = 24.0;

/// Layout result for a single line
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Byte range within the block text
    pub byte_range: Range<usize>,
    pub width: f32,
    pub height: f32,
}

/// Layout result for a block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub lines: Vec<LineLayout>,
    /// Space below the last line
    pub spacing_after: f32,
}

impl BlockLayout {
    /// Height of the lines alone
    pub fn lines_height(&self) -> f32 {
        self.lines.iter().map(|l| l.height).sum()
    }

    /// Height including spacing
    pub fn total_height(&self) -> f32 {
        self.lines_height() + self.spacing_after
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Greedy line breaker over UAX #14 break opportunities
#[derive(Debug, Clone, Default)]
pub struct LineBreaker {
    metrics: FontMetrics,
}

impl LineBreaker {
    pub fn new(metrics: FontMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Layout a block into lines no wider than `max_width`
    pub fn layout_block(&self, block: &Block, max_width: f32) -> BlockLayout {
        let effective_width = match &block.kind {
            BlockKind::ListItem { indent_level, .. } => {
                max_width - (*indent_level as f32 * INDENT_WIDTH)
            }
            _ => max_width,
        }
        .max(1.0);
        let metrics = self.metrics.scaled(block.kind.line_height_multiplier());

        let mut lines = Vec::new();
        let mut segment_start = 0;
        for segment in block.text.split('\n') {
            self.break_segment(segment, segment_start, effective_width, &metrics, &mut lines);
            segment_start += segment.len() + 1;
        }

        BlockLayout {
            lines,
            spacing_after: block.kind.spacing_after() * self.metrics.line_height,
        }
    }

    /// Break one hard-break-free segment starting at byte `base`
    fn break_segment(
        &self,
        segment: &str,
        base: usize,
        max_width: f32,
        metrics: &FontMetrics,
        lines: &mut Vec<LineLayout>,
    ) {
        if segment.is_empty() {
            lines.push(LineLayout {
                byte_range: base..base,
                width: 0.0,
                height: metrics.line_height,
            });
            return;
        }

        let opportunities: Vec<usize> = linebreaks(segment)
            .filter(|(_, opp)| *opp == BreakOpportunity::Allowed)
            .map(|(offset, _)| offset)
            .collect();

        let mut line_start = 0;
        // (byte offset, width) of the clusters on the current line
        let mut clusters: Vec<(usize, f32)> = Vec::new();
        let mut x = 0.0;

        for (byte_idx, grapheme) in segment.grapheme_indices(true) {
            let width = metrics.cluster_width(grapheme);
            // trailing whitespace hangs past the edge
            let hangs = grapheme.chars().all(char::is_whitespace);

            if x + width > max_width && !clusters.is_empty() && !hangs {
                let break_at = opportunities
                    .iter()
                    .rev()
                    .find(|&&offset| offset > line_start && offset <= byte_idx)
                    .copied()
                    .unwrap_or(byte_idx);

                let split = clusters
                    .iter()
                    .position(|(offset, _)| *offset >= break_at)
                    .unwrap_or(clusters.len());
                let line_width: f32 = clusters.drain(..split).map(|(_, w)| w).sum();

                lines.push(LineLayout {
                    byte_range: base + line_start..base + break_at,
                    width: line_width,
                    height: metrics.line_height,
                });
                line_start = break_at;
                x -= line_width;
            }

            clusters.push((byte_idx, width));
            x += width;
        }

        lines.push(LineLayout {
            byte_range: base + line_start..base + segment.len(),
            width: x,
            height: metrics.line_height,
        });
    }
}
