//! Plain paragraph stream: blank-line separated (§4.1).

use style_core::model::BlockType;

use super::BlockBuilder;

pub(crate) fn parse(text: &str, builder: &mut BlockBuilder<'_>) {
    let mut para_start: Option<usize> = None;
    let mut cursor = 0usize;

    for line in text.split_inclusive('\n') {
        let line_start = cursor;
        let stripped = line.trim_end_matches(['\n', '\r']);
        cursor += line.len();

        if stripped.trim().is_empty() {
            if let Some(start) = para_start.take() {
                emit_paragraph(builder, text, start, line_start);
            }
        } else if para_start.is_none() {
            para_start = Some(line_start);
        }
    }

    if let Some(start) = para_start {
        emit_paragraph(builder, text, start, text.len());
    }
}

fn emit_paragraph(builder: &mut BlockBuilder<'_>, text: &str, start: usize, end: usize) {
    let slice = text[start..end].trim_end_matches(['\n', '\r']);
    let trimmed_start = start + (text[start..end].len() - text[start..end].trim_start().len());
    let body = slice.trim();
    if body.is_empty() {
        return;
    }
    builder.push(
        BlockType::Paragraph,
        trimmed_start,
        trimmed_start + body.len(),
        0,
        body.to_string(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use style_core::ids::DocumentId;
    use style_core::model::FormatHint;

    #[test]
    fn splits_on_blank_lines() {
        let doc_id = DocumentId::from_content(b"x");
        let blocks = parse(&doc_id, "First paragraph.\n\nSecond paragraph.\nstill second.\n", FormatHint::Plain);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "First paragraph.");
        assert!(blocks[1].text.contains("Second paragraph."));
    }

    #[test]
    fn single_paragraph_no_trailing_blank() {
        let doc_id = DocumentId::from_content(b"x");
        let blocks = parse(&doc_id, "Just one paragraph.", FormatHint::Plain);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Just one paragraph.");
    }
}
