//! Markdown rendering for AI disposal suggestions
//!
//! The backend returns suggestions as Markdown. `parse_markdown` folds the
//! pulldown-cmark event stream into flat blocks of styled spans, and
//! `render_markdown` paints those blocks with egui rich text. Parsing is a
//! pure function so the conversion is testable without a UI.

use eframe::egui;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::theme;

/// A run of text with inline styling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdSpan {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub code: bool,
}

/// A rendered block element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MdBlock {
    Paragraph(Vec<MdSpan>),
    Heading { level: u8, spans: Vec<MdSpan> },
    Bullet { depth: usize, spans: Vec<MdSpan> },
    Numbered { depth: usize, number: u64, spans: Vec<MdSpan> },
    CodeBlock(String),
    Rule,
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Convert a Markdown string into renderable blocks.
pub fn parse_markdown(markdown: &str) -> Vec<MdBlock> {
    let parser = Parser::new_ext(markdown, Options::empty());

    let mut blocks = Vec::new();
    let mut spans: Vec<MdSpan> = Vec::new();
    let mut strong = 0u32;
    let mut emphasis = 0u32;
    // Stack of list contexts: next number for ordered lists, None for bullets
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_item = false;
    let mut heading: Option<u8> = None;
    let mut code_block: Option<String> = None;

    let push_text = |spans: &mut Vec<MdSpan>, text: &str, strong: u32, emphasis: u32| {
        if text.is_empty() {
            return;
        }
        spans.push(MdSpan {
            text: text.to_string(),
            strong: strong > 0,
            emphasis: emphasis > 0,
            code: false,
        });
    };

    let flush_item = |blocks: &mut Vec<MdBlock>, spans: &mut Vec<MdSpan>, lists: &mut Vec<Option<u64>>| {
        if spans.is_empty() {
            return;
        }
        let depth = lists.len().saturating_sub(1);
        match lists.last_mut() {
            Some(Some(next)) => {
                let number = *next;
                *next += 1;
                blocks.push(MdBlock::Numbered {
                    depth,
                    number,
                    spans: std::mem::take(spans),
                });
            }
            _ => blocks.push(MdBlock::Bullet {
                depth,
                spans: std::mem::take(spans),
            }),
        }
    };

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(heading_level(level));
                spans.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(level) = heading.take() {
                    blocks.push(MdBlock::Heading {
                        level,
                        spans: std::mem::take(&mut spans),
                    });
                }
            }
            Event::Start(Tag::List(start)) => {
                // A nested list opening inside an unfinished item: emit the
                // item text collected so far before descending
                if in_item {
                    flush_item(&mut blocks, &mut spans, &mut lists);
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                in_item = true;
                spans.clear();
            }
            Event::End(TagEnd::Item) => {
                flush_item(&mut blocks, &mut spans, &mut lists);
                in_item = false;
            }
            Event::Start(Tag::Paragraph) => {
                if !in_item {
                    spans.clear();
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if !in_item && !spans.is_empty() {
                    blocks.push(MdBlock::Paragraph(std::mem::take(&mut spans)));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                code_block = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(code) = code_block.take() {
                    blocks.push(MdBlock::CodeBlock(code.trim_end().to_string()));
                }
            }
            Event::Start(Tag::Strong) => strong += 1,
            Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => emphasis += 1,
            Event::End(TagEnd::Emphasis) => emphasis = emphasis.saturating_sub(1),
            Event::Text(text) => match code_block.as_mut() {
                Some(code) => code.push_str(&text),
                None => push_text(&mut spans, &text, strong, emphasis),
            },
            Event::Code(code) => spans.push(MdSpan {
                text: code.to_string(),
                strong: strong > 0,
                emphasis: emphasis > 0,
                code: true,
            }),
            Event::SoftBreak => push_text(&mut spans, " ", strong, emphasis),
            Event::HardBreak => push_text(&mut spans, "\n", strong, emphasis),
            Event::Rule => blocks.push(MdBlock::Rule),
            // Link/image URLs are dropped, their text renders as plain spans
            _ => {}
        }
    }

    // Trailing spans without a closing tag (defensive against cut-off input)
    if !spans.is_empty() {
        blocks.push(MdBlock::Paragraph(spans));
    }

    blocks
}

fn span_text(span: &MdSpan, size: f32) -> egui::RichText {
    let mut text = egui::RichText::new(&span.text)
        .size(size)
        .color(theme::TEXT_SECONDARY);
    if span.strong {
        text = text.strong().color(theme::TEXT_PRIMARY);
    }
    if span.emphasis {
        text = text.italics();
    }
    if span.code {
        text = text.code();
    }
    text
}

fn spans_row(ui: &mut egui::Ui, spans: &[MdSpan], size: f32) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            ui.label(span_text(span, size));
        }
    });
}

/// Paint a Markdown string into the given ui.
pub fn render_markdown(ui: &mut egui::Ui, markdown: &str) {
    for block in parse_markdown(markdown) {
        match &block {
            MdBlock::Paragraph(spans) => {
                spans_row(ui, spans, theme::FONT_BODY);
                ui.add_space(theme::SPACING_SM);
            }
            MdBlock::Heading { level, spans } => {
                let size = match level {
                    1 => theme::FONT_TITLE,
                    2 => theme::FONT_HEADING,
                    _ => theme::FONT_BODY,
                };
                ui.add_space(theme::SPACING_SM);
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    for span in spans {
                        ui.label(span_text(span, size).strong().color(theme::TEXT_PRIMARY));
                    }
                });
                ui.add_space(theme::SPACING_SM);
            }
            MdBlock::Bullet { depth, spans } => {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    ui.add_space(theme::SPACING_LG * (*depth as f32 + 1.0));
                    ui.label(
                        egui::RichText::new("•  ")
                            .size(theme::FONT_BODY)
                            .color(theme::ACCENT),
                    );
                    for span in spans {
                        ui.label(span_text(span, theme::FONT_BODY));
                    }
                });
            }
            MdBlock::Numbered { depth, number, spans } => {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    ui.add_space(theme::SPACING_LG * (*depth as f32 + 1.0));
                    ui.label(
                        egui::RichText::new(format!("{}.  ", number))
                            .size(theme::FONT_BODY)
                            .color(theme::ACCENT),
                    );
                    for span in spans {
                        ui.label(span_text(span, theme::FONT_BODY));
                    }
                });
            }
            MdBlock::CodeBlock(code) => {
                egui::Frame::new()
                    .fill(theme::BG_INPUT)
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
                    .corner_radius(theme::RADIUS_DEFAULT)
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(code)
                                .monospace()
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_SECONDARY),
                        );
                    });
                ui.add_space(theme::SPACING_SM);
            }
            MdBlock::Rule => {
                ui.separator();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_text(spans: &[MdSpan]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn bold_text_becomes_strong_span() {
        let blocks = parse_markdown("**bold**");
        match &blocks[..] {
            [MdBlock::Paragraph(spans)] => {
                assert_eq!(spans.len(), 1);
                assert_eq!(spans[0].text, "bold");
                assert!(spans[0].strong);
                assert!(!spans[0].emphasis);
            }
            other => panic!("unexpected blocks: {:?}", other),
        }
    }

    #[test]
    fn mixed_inline_styles() {
        let blocks = parse_markdown("plain **bold** and *soft*");
        match &blocks[..] {
            [MdBlock::Paragraph(spans)] => {
                assert_eq!(flat_text(spans), "plain bold and soft");
                assert!(spans.iter().any(|s| s.strong && s.text == "bold"));
                assert!(spans.iter().any(|s| s.emphasis && s.text == "soft"));
            }
            other => panic!("unexpected blocks: {:?}", other),
        }
    }

    #[test]
    fn headings_keep_their_level() {
        let blocks = parse_markdown("## Recycling or Reuse Ideas");
        match &blocks[..] {
            [MdBlock::Heading { level: 2, spans }] => {
                assert_eq!(flat_text(spans), "Recycling or Reuse Ideas");
            }
            other => panic!("unexpected blocks: {:?}", other),
        }
    }

    #[test]
    fn ordered_list_numbers_increment() {
        let blocks = parse_markdown(
            "1. Primary Disposal Method\n2. Recycling or Reuse Ideas\n3. Important Note",
        );
        let numbers: Vec<u64> = blocks
            .iter()
            .map(|b| match b {
                MdBlock::Numbered { number, .. } => *number,
                other => panic!("unexpected block: {:?}", other),
            })
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn bullet_list_items() {
        let blocks = parse_markdown("- rinse it\n- flatten it");
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            MdBlock::Bullet { depth: 0, spans } => assert_eq!(flat_text(spans), "rinse it"),
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn inline_code_span() {
        let blocks = parse_markdown("check `PETE 1` on the bottom");
        match &blocks[..] {
            [MdBlock::Paragraph(spans)] => {
                assert!(spans.iter().any(|s| s.code && s.text == "PETE 1"));
            }
            other => panic!("unexpected blocks: {:?}", other),
        }
    }

    #[test]
    fn fenced_code_block() {
        let blocks = parse_markdown("```\nrecycle --dry-run\n```");
        assert_eq!(
            blocks,
            vec![MdBlock::CodeBlock("recycle --dry-run".to_string())]
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(parse_markdown("").is_empty());
    }
}
