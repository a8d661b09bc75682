//! Structural Parser (B, §4.1): `parse(text, format_hint) → ordered blocks`.

mod asciidoc;
mod markdown;
mod plain;

use style_core::ids::{BlockId, DocumentId};
use style_core::model::{BlockType, FormatHint, StructuralBlock};

/// Builds blocks with sequential, document-scoped ids as a parser submodule
/// discovers them, preserving source order.
pub(crate) struct BlockBuilder<'a> {
    document_id: &'a DocumentId,
    next_sequence: usize,
    blocks: Vec<StructuralBlock>,
}

impl<'a> BlockBuilder<'a> {
    fn new(document_id: &'a DocumentId) -> Self {
        Self {
            document_id,
            next_sequence: 0,
            blocks: Vec::new(),
        }
    }

    pub(crate) fn push(
        &mut self,
        block_type: BlockType,
        start: usize,
        end: usize,
        depth: usize,
        text: String,
        parent_id: Option<BlockId>,
    ) -> BlockId {
        let id = BlockId::new(self.document_id, self.next_sequence);
        self.next_sequence += 1;
        self.blocks.push(StructuralBlock {
            id: id.clone(),
            block_type,
            start,
            end,
            depth,
            text,
            parent_id,
            table_cell: None,
        });
        id
    }

    pub(crate) fn push_table_cell(
        &mut self,
        start: usize,
        end: usize,
        text: String,
        row: usize,
        column: usize,
    ) -> BlockId {
        let id = BlockId::new(self.document_id, self.next_sequence);
        self.next_sequence += 1;
        self.blocks.push(StructuralBlock {
            id: id.clone(),
            block_type: BlockType::TableCell,
            start,
            end,
            depth: 0,
            text,
            parent_id: None,
            table_cell: Some(style_core::model::TableCellRef { row, column }),
        });
        id
    }

    fn finish(self) -> Vec<StructuralBlock> {
        self.blocks
    }
}

/// Inspects the first 1 KiB of `text` to resolve `FormatHint::Auto` (§4.1).
fn detect_format(text: &str) -> FormatHint {
    let window_end = text
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| i >= 1024)
        .unwrap_or(text.len());
    let window = &text[..window_end];

    for line in window.lines() {
        let trimmed = line.trim_start();
        if is_asciidoc_heading(trimmed) || trimmed == "----" {
            return FormatHint::Asciidoc;
        }
        if trimmed.starts_with("# ") || trimmed.starts_with("* ") || trimmed.starts_with("```") {
            return FormatHint::Markdown;
        }
    }
    FormatHint::Plain
}

fn is_asciidoc_heading(trimmed: &str) -> bool {
    let equals_run: String = trimmed.chars().take_while(|c| *c == '=').collect();
    !equals_run.is_empty() && trimmed[equals_run.len()..].starts_with(' ')
}

/// `parse(document_id, text, format_hint) → ordered sequence of StructuralBlock`
/// (§4.1). `document_id` scopes the generated block ids; it is not part of
/// the public contract in spec.md but every caller has one in hand already
/// (a `Document` is constructed before parsing).
pub fn parse(document_id: &DocumentId, text: &str, format_hint: FormatHint) -> Vec<StructuralBlock> {
    if text.is_empty() {
        return Vec::new();
    }

    let resolved = match format_hint {
        FormatHint::Auto => detect_format(text),
        other => other,
    };

    let mut builder = BlockBuilder::new(document_id);
    match resolved {
        FormatHint::Markdown => markdown::parse(text, &mut builder),
        FormatHint::Asciidoc => asciidoc::parse(text, &mut builder),
        FormatHint::Plain | FormatHint::Auto => plain::parse(text, &mut builder),
    }
    builder.finish()
}
