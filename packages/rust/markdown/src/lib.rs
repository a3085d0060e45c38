//! Minimal markdown document tree for web search sources.
//!
//! Nodes own their children as an ordered list; no node holds a reference
//! back to its parent, so a tree can be serialized, cloned, and moved across
//! tasks as-is. Snippet text is stored verbatim: this crate builds and walks
//! trees, it does not parse markup.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Element types
// ---------------------------------------------------------------------------

/// The kind of a document tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkdownElementType {
    Root,
    Header,
    Paragraph,
    BlockQuote,
    CodeBlock,
    UnorderedList,
    OrderedList,
    UnorderedListItem,
    OrderedListItem,
}

// ---------------------------------------------------------------------------
// MarkdownNode
// ---------------------------------------------------------------------------

/// One node in a document tree. Children are owned, ordered, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownNode {
    /// Node kind.
    #[serde(rename = "type")]
    pub kind: MarkdownElementType,
    /// Text content of this node.
    pub content: String,
    /// Ordered child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MarkdownNode>,
}

impl MarkdownNode {
    /// Build a root node over the given children.
    pub fn root(content: impl Into<String>, children: Vec<MarkdownNode>) -> Self {
        Self {
            kind: MarkdownElementType::Root,
            content: content.into(),
            children,
        }
    }

    /// Build a paragraph leaf.
    pub fn paragraph(content: impl Into<String>) -> Self {
        Self::leaf(MarkdownElementType::Paragraph, content)
    }

    /// Build a childless node of any kind.
    pub fn leaf(kind: MarkdownElementType, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            children: Vec::new(),
        }
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in the tree rooted here, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(MarkdownNode::node_count).sum::<usize>()
    }

    /// Depth-first, pre-order iterator over this node and all descendants.
    pub fn iter(&self) -> DepthFirst<'_> {
        DepthFirst { stack: vec![self] }
    }

    /// Concatenate the content of every node in document order, one line per
    /// non-empty node.
    pub fn text(&self) -> String {
        let parts: Vec<&str> = self
            .iter()
            .filter(|node| !node.content.is_empty())
            .map(|node| node.content.as_str())
            .collect();
        parts.join("\n")
    }
}

/// Depth-first traversal state for [`MarkdownNode::iter`].
pub struct DepthFirst<'a> {
    stack: Vec<&'a MarkdownNode>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a MarkdownNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the first child is visited first.
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// ---------------------------------------------------------------------------
// Source tree construction
// ---------------------------------------------------------------------------

/// Build the two-node tree representing one search hit: a root whose content
/// is `title + "\n" + link`, with a single paragraph child holding the raw
/// snippet.
pub fn snippet_tree(title: &str, link: &str, snippet: &str) -> MarkdownNode {
    MarkdownNode::root(
        format!("{title}\n{link}"),
        vec![MarkdownNode::paragraph(snippet)],
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
