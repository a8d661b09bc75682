//! Markdown parsing (§4.1): headings, fenced code blocks, lists, blockquotes,
//! admonitions, tables, and a paragraph fallback.

use style_core::model::BlockType;

use super::BlockBuilder;

const ADMONITION_MARKERS: [&str; 3] = ["NOTE:", "TIP:", "WARNING:"];

struct Line<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

fn lines_with_offsets(text: &str) -> Vec<Line<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0usize;
    for raw in text.split_inclusive('\n') {
        let stripped = raw.trim_end_matches(['\n', '\r']);
        out.push(Line {
            start: cursor,
            end: cursor + stripped.len(),
            text: stripped,
        });
        cursor += raw.len();
    }
    out
}

pub(crate) fn parse(text: &str, builder: &mut BlockBuilder<'_>) {
    let lines = lines_with_offsets(text);
    let mut i = 0usize;
    let mut para_start: Option<usize> = None;
    let mut para_end: usize = 0;

    macro_rules! flush_paragraph {
        () => {
            if let Some(start) = para_start.take() {
                emit_paragraph(builder, text, start, para_end);
            }
        };
    }

    while i < lines.len() {
        let line = &lines[i];
        let trimmed = line.text.trim_start();
        let indent = line.text.len() - trimmed.len();

        // Fenced code block.
        if trimmed.starts_with("```") {
            flush_paragraph!();
            let fence_start = line.start;
            let mut j = i + 1;
            while j < lines.len() && !lines[j].text.trim_start().starts_with("```") {
                j += 1;
            }
            let body_end = if j < lines.len() { lines[j].start } else { lines[lines.len() - 1].end };
            let fence_end = if j < lines.len() { lines[j].end } else { body_end };
            let body = &text[fence_start..fence_end];
            builder.push(BlockType::CodeBlock, fence_start, fence_end, 0, body.to_string(), None);
            i = j + 1;
            continue;
        }

        // Heading.
        if let Some(level) = heading_level(trimmed) {
            flush_paragraph!();
            let heading_text = trimmed[level + 1..].trim().to_string();
            builder.push(BlockType::Heading, line.start, line.end, level, heading_text, None);
            i += 1;
            continue;
        }

        // Admonition: NOTE:/TIP:/WARNING: opens a parent wrapping the
        // following non-blank lines as its child paragraph (§4.1).
        if let Some(marker) = admonition_marker(trimmed) {
            flush_paragraph!();
            let admonition_start = line.start;
            let mut j = i;
            let mut body_lines = Vec::new();
            body_lines.push(trimmed[marker.len()..].trim().to_string());
            j += 1;
            while j < lines.len() && !lines[j].text.trim().is_empty() {
                body_lines.push(lines[j].text.trim().to_string());
                j += 1;
            }
            let admonition_end = if j > 0 { lines[j - 1].end } else { line.end };
            let parent = builder.push(
                BlockType::Admonition,
                admonition_start,
                admonition_end,
                0,
                marker.trim_end_matches(':').to_lowercase(),
                None,
            );
            builder.push(
                BlockType::Paragraph,
                admonition_start,
                admonition_end,
                1,
                body_lines.join(" "),
                Some(parent),
            );
            i = j;
            continue;
        }

        // Blockquote: consecutive `> ` lines collapse into one block.
        if trimmed.starts_with('>') {
            flush_paragraph!();
            let quote_start = line.start;
            let mut j = i;
            let mut body_lines = Vec::new();
            while j < lines.len() && lines[j].text.trim_start().starts_with('>') {
                let stripped = lines[j].text.trim_start().trim_start_matches('>').trim_start();
                body_lines.push(stripped.to_string());
                j += 1;
            }
            let quote_end = lines[j - 1].end;
            builder.push(
                BlockType::Blockquote,
                quote_start,
                quote_end,
                0,
                body_lines.join(" "),
                None,
            );
            i = j;
            continue;
        }

        // Table: a header row followed by a `---|---` separator row.
        if trimmed.contains('|') && i + 1 < lines.len() && is_table_separator(lines[i + 1].text.trim_start()) {
            flush_paragraph!();
            let mut row_index = 0usize;
            emit_table_row(builder, text, line, row_index);
            row_index += 1;
            let mut j = i + 2;
            while j < lines.len() && lines[j].text.contains('|') && !lines[j].text.trim().is_empty() {
                emit_table_row(builder, text, &lines[j], row_index);
                row_index += 1;
                j += 1;
            }
            i = j;
            continue;
        }

        // List item (unordered or ordered), depth from indentation.
        if let Some((is_ordered, marker_len)) = list_marker(trimmed) {
            flush_paragraph!();
            let depth = indent / 2;
            let item_text = trimmed[marker_len..].trim().to_string();
            let block_type = if is_ordered { BlockType::OrderedListItem } else { BlockType::ListItem };
            builder.push(block_type, line.start, line.end, depth, item_text, None);
            i += 1;
            continue;
        }

        // Inline code: a line that is a single backtick-wrapped run.
        if trimmed.len() > 1 && trimmed.starts_with('`') && trimmed.ends_with('`') && !trimmed[1..trimmed.len() - 1].contains('`') {
            flush_paragraph!();
            let code_text = trimmed[1..trimmed.len() - 1].to_string();
            builder.push(BlockType::InlineCode, line.start, line.end, 0, code_text, None);
            i += 1;
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph!();
        } else if para_start.is_none() {
            para_start = Some(line.start);
            para_end = line.end;
        } else {
            para_end = line.end;
        }
        i += 1;
    }

    flush_paragraph!();
}

fn emit_paragraph(builder: &mut BlockBuilder<'_>, text: &str, start: usize, end: usize) {
    let body = text[start..end].trim();
    if body.is_empty() {
        return;
    }
    let body_start = start + (text[start..end].len() - text[start..end].trim_start().len());
    builder.push(BlockType::Paragraph, body_start, body_start + body.len(), 0, body.to_string(), None);
}

fn emit_table_row(builder: &mut BlockBuilder<'_>, text: &str, line: &Line<'_>, row: usize) {
    let mut column = 0usize;
    let mut offset = line.start;
    for cell in line.text.trim_matches('|').split('|') {
        let trimmed = cell.trim();
        let cell_offset = text[offset..line.end].find(cell).map(|p| offset + p).unwrap_or(offset);
        if !trimmed.is_empty() {
            builder.push_table_cell(cell_offset, cell_offset + trimmed.len(), trimmed.to_string(), row, column);
        }
        offset = cell_offset + cell.len();
        column += 1;
    }
}

fn heading_level(trimmed: &str) -> Option<usize> {
    let hashes: usize = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    trimmed.as_bytes().get(hashes).filter(|b| **b == b' ').map(|_| hashes)
}

fn admonition_marker(trimmed: &str) -> Option<&'static str> {
    let upper = trimmed.to_uppercase();
    ADMONITION_MARKERS.iter().find(|m| upper.starts_with(*m)).copied()
}

fn is_table_separator(trimmed: &str) -> bool {
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c == '-' || c == '|' || c == ':' || c.is_whitespace())
        && trimmed.contains('-')
}

fn list_marker(trimmed: &str) -> Option<(bool, usize)> {
    if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        let _ = rest;
        return Some((false, 2));
    }
    let digits: usize = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && trimmed[digits..].starts_with(". ") {
        return Some((true, digits + 2));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use style_core::ids::DocumentId;
    use style_core::model::{BlockType, FormatHint};

    fn doc_id() -> DocumentId {
        DocumentId::from_content(b"md")
    }

    #[test]
    fn parses_heading_and_paragraph() {
        let blocks = parse(&doc_id(), "# Title\n\nBody text here.\n", FormatHint::Markdown);
        assert_eq!(blocks[0].block_type, BlockType::Heading);
        assert_eq!(blocks[0].depth, 1);
        assert_eq!(blocks[0].text, "Title");
        assert_eq!(blocks[1].block_type, BlockType::Paragraph);
    }

    #[test]
    fn fenced_code_block_is_verbatim() {
        let input = "```\nlet x = 1;\n```\n";
        let blocks = parse(&doc_id(), input, FormatHint::Markdown);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::CodeBlock);
        assert!(blocks[0].text.contains("let x = 1;"));
    }

    #[test]
    fn nested_list_items_track_depth() {
        let input = "- top\n  - nested\n";
        let blocks = parse(&doc_id(), input, FormatHint::Markdown);
        assert_eq!(blocks[0].depth, 0);
        assert_eq!(blocks[1].depth, 1);
    }

    #[test]
    fn admonition_wraps_child_paragraph() {
        let input = "NOTE: remember this\nand this too\n";
        let blocks = parse(&doc_id(), input, FormatHint::Markdown);
        assert_eq!(blocks[0].block_type, BlockType::Admonition);
        assert_eq!(blocks[1].block_type, BlockType::Paragraph);
        assert_eq!(blocks[1].parent_id.as_ref(), Some(&blocks[0].id));
    }

    #[test]
    fn table_rows_emit_cells() {
        let input = "a | b\n---|---\n1 | 2\n";
        let blocks = parse(&doc_id(), input, FormatHint::Markdown);
        assert!(blocks.iter().all(|b| b.block_type == BlockType::TableCell));
        assert_eq!(blocks.len(), 4);
    }
}
