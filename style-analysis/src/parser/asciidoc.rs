//! AsciiDoc parsing (§4.1): `=` headings, `----` delimited blocks, lists,
//! admonitions, and a paragraph fallback.

use style_core::model::BlockType;

use super::BlockBuilder;

const ADMONITION_MARKERS: [&str; 4] = ["NOTE:", "TIP:", "WARNING:", "IMPORTANT:"];
const DELIMITER: &str = "----";

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

        // Delimited block: ---- ... ----
        if trimmed == DELIMITER {
            flush_paragraph!();
            let block_start = line.start;
            let mut j = i + 1;
            while j < lines.len() && lines[j].text.trim() != DELIMITER {
                j += 1;
            }
            let block_end = if j < lines.len() { lines[j].end } else { lines[lines.len() - 1].end };
            let body = &text[block_start..block_end];
            builder.push(BlockType::CodeBlock, block_start, block_end, 0, body.to_string(), None);
            i = j + 1;
            continue;
        }

        // Heading: one or more leading `=` followed by a space.
        if let Some(level) = heading_level(trimmed) {
            flush_paragraph!();
            let heading_text = trimmed[level + 1..].trim().to_string();
            builder.push(BlockType::Heading, line.start, line.end, level, heading_text, None);
            i += 1;
            continue;
        }

        // Admonition: NOTE:/TIP:/WARNING:/IMPORTANT: wraps the following
        // non-blank lines as a child paragraph, same convention as markdown.
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

        // List item: `* ` unordered (depth = run length of `*`), `. ` ordered
        // (depth = run length of `.`).
        if let Some((is_ordered, depth, marker_len)) = list_marker(trimmed) {
            flush_paragraph!();
            let item_text = trimmed[marker_len..].trim().to_string();
            let block_type = if is_ordered { BlockType::OrderedListItem } else { BlockType::ListItem };
            builder.push(block_type, line.start, line.end, depth, item_text, None);
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

fn heading_level(trimmed: &str) -> Option<usize> {
    let equals: usize = trimmed.chars().take_while(|c| *c == '=').count();
    if equals == 0 || equals > 6 {
        return None;
    }
    trimmed.as_bytes().get(equals).filter(|b| **b == b' ').map(|_| equals)
}

fn admonition_marker(trimmed: &str) -> Option<&'static str> {
    let upper = trimmed.to_uppercase();
    ADMONITION_MARKERS.iter().find(|m| upper.starts_with(*m)).copied()
}

fn list_marker(trimmed: &str) -> Option<(bool, usize, usize)> {
    let star_run: usize = trimmed.chars().take_while(|c| *c == '*').count();
    if star_run > 0 && trimmed.as_bytes().get(star_run) == Some(&b' ') {
        return Some((false, star_run - 1, star_run + 1));
    }
    let dot_run: usize = trimmed.chars().take_while(|c| *c == '.').count();
    if dot_run > 0 && trimmed.as_bytes().get(dot_run) == Some(&b' ') {
        return Some((true, dot_run - 1, dot_run + 1));
    }
    None
}
