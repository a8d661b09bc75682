//! StructuralBlock and its type enumeration (§3, §4.1).

use serde::{Deserialize, Serialize};

use crate::ids::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    Heading,
    ListItem,
    OrderedListItem,
    CodeBlock,
    InlineCode,
    Blockquote,
    TableCell,
    Admonition,
    Other,
}

impl BlockType {
    /// Code spans are excluded from prose analysis (§3 invariant, §4.4 step 4).
    pub fn is_prose(&self) -> bool {
        !matches!(self, Self::CodeBlock | Self::InlineCode)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::ListItem => "list_item",
            Self::OrderedListItem => "ordered_list_item",
            Self::CodeBlock => "code_block",
            Self::InlineCode => "inline_code",
            Self::Blockquote => "blockquote",
            Self::TableCell => "table_cell",
            Self::Admonition => "admonition",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Row/column reference for a `table_cell` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCellRef {
    pub row: usize,
    pub column: usize,
}

/// An ordered, non-overlapping span of the document (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralBlock {
    pub id: BlockId,
    pub block_type: BlockType,
    pub start: usize,
    pub end: usize,
    pub depth: usize,
    pub text: String,
    pub parent_id: Option<BlockId>,
    pub table_cell: Option<TableCellRef>,
}

impl StructuralBlock {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
