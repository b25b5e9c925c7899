// Copyright 2026 PosPrint Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Receipt document model.
//!
//! Builds the markup payload that serial receipt printers understand:
//! a `<Printout>` element containing text blocks, line feeds and a paper
//! cut. The document content is fixed demo data; only the timestamp is
//! computed at print time.

use chrono::{DateTime, Local};
use std::fmt::Write;

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// A block of printed text with its formatting attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub align: Align,
    pub width_scale: f32,
    pub height_scale: f32,
    pub margin_top: i32,
    pub bold: bool,
    pub content: String,
}

impl TextBlock {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            align: Align::Left,
            width_scale: 0.5,
            height_scale: 1.0,
            margin_top: 0,
            bold: false,
            content: content.into(),
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn scale(mut self, width: f32, height: f32) -> Self {
        self.width_scale = width;
        self.height_scale = height;
        self
    }

    pub fn margin_top(mut self, margin: i32) -> Self {
        self.margin_top = margin;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// One node of a receipt document.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptNode {
    Text(TextBlock),
    LineBreak,
    CutPaper,
}

/// An ordered receipt document, rendered to printer markup on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptDocument {
    nodes: Vec<ReceiptNode>,
}

impl ReceiptDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, block: TextBlock) -> Self {
        self.nodes.push(ReceiptNode::Text(block));
        self
    }

    pub fn line_break(mut self) -> Self {
        self.nodes.push(ReceiptNode::LineBreak);
        self
    }

    pub fn line_breaks(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.nodes.push(ReceiptNode::LineBreak);
        }
        self
    }

    pub fn cut(mut self) -> Self {
        self.nodes.push(ReceiptNode::CutPaper);
        self
    }

    pub fn nodes(&self) -> &[ReceiptNode] {
        &self.nodes
    }

    /// Render the document to the markup string the printer firmware
    /// interprets.
    pub fn render(&self) -> String {
        let mut out = String::from("<Printout>\n");
        for node in &self.nodes {
            match node {
                ReceiptNode::Text(block) => {
                    let _ = writeln!(
                        out,
                        "  <Text align='{}' fontWidth='{}' fontHeight='{}' marginTop='{}' bold='{}'>{}</Text>",
                        block.align.as_str(),
                        block.width_scale,
                        block.height_scale,
                        block.margin_top,
                        block.bold as u8,
                        block.content
                    );
                }
                ReceiptNode::LineBreak => out.push_str("  <NewLine />\n"),
                ReceiptNode::CutPaper => out.push_str("  <Cut />\n"),
            }
        }
        out.push_str("</Printout>\n");
        out
    }
}

/// Receipt timestamp: `DD/MM/YYYY at HH:MM`, 24-hour clock, zero-padded.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%d/%m/%Y at %H:%M").to_string()
}

/// The fixed demo receipt. Everything is hard-coded except the timestamp.
pub fn demo_receipt(printed_at: DateTime<Local>) -> ReceiptDocument {
    ReceiptDocument::new()
        .text(
            TextBlock::new("Welcome to My\nShop")
                .align(Align::Center)
                .scale(1.0, 2.0)
                .margin_top(-1)
                .bold(),
        )
        .line_breaks(2)
        .text(
            TextBlock::new(format!(
                "Receipt #12345\nDate: {}",
                format_timestamp(printed_at)
            ))
            .align(Align::Center),
        )
        .line_breaks(2)
        .text(TextBlock::new("Item              Qty   Price").bold())
        .line_break()
        .text(TextBlock::new("Apple             2     $3.00\n"))
        .line_break()
        .text(TextBlock::new("Orange            1     $1.50\n"))
        .line_break()
        .text(TextBlock::new("Banana            3     $2.25\n"))
        .line_breaks(2)
        .text(
            TextBlock::new("Total:          $6.75")
                .align(Align::Right)
                .bold(),
        )
        .line_breaks(2)
        .text(TextBlock::new("Thank you for shopping\nwith us!").align(Align::Center))
        .line_breaks(5)
        .cut()
}
