use crate::error::Span;
use std::collections::HashMap;

/// Markup tree handed to the interpreter by the front end. The
/// interpreter only reads it.
///
/// Element tags arrive canonicalized to ASCII uppercase (markup tag names
/// are case-insensitive); attribute names arrive lowercased. Text content
/// is verbatim apart from entity unescaping.
#[derive(Debug, Clone)]
pub enum Node {
    /// Synthetic root wrapping the program's top-level statements.
    Document {
        children: Vec<Node>,
        span: Span,
    },
    Element {
        tag: String,
        attributes: HashMap<String, String>,
        children: Vec<Node>,
        span: Span,
    },
    Text {
        content: String,
        span: Span,
    },
    Comment {
        span: Span,
    },
}

impl Node {
    pub fn span(&self) -> &Span {
        match self {
            Node::Document { span, .. } => span,
            Node::Element { span, .. } => span,
            Node::Text { span, .. } => span,
            Node::Comment { span } => span,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } => children,
            Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Concatenated text of this node and its descendants, in document
    /// order. This is what a list item contributes as its value.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { content, .. } => content.clone(),
            Node::Comment { .. } => String::new(),
            _ => {
                let mut out = String::new();
                for child in self.children() {
                    out.push_str(&child.text_content());
                }
                out
            }
        }
    }
}

/// The interpreter's classification of a markup tag. Anything outside
/// this vocabulary is an unknown construct, fatal wherever a statement or
/// expression is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    /// `VAR`: declaration at statement position, variable reference at
    /// expression position.
    Var,
    /// `OUTPUT`: print a variable or a child expression.
    Output,
    /// `FORM`: loop while the condition variable is not "0".
    Form,
    /// `OL`/`UL`: list literal (the two spellings are synonyms).
    List,
    /// `LI`: list item, meaningful only inside a list literal.
    ListItem,
    /// `SELECT`: first-match selection over its options.
    Select,
    /// `OPTION`: selection branch, meaningful only inside a `SELECT`.
    SelectOption,
    /// `INPUT`: read one value from the runtime.
    Input,
    /// `MATH`: arithmetic over spliced child values.
    Math,
}

impl Construct {
    /// Exact, case-sensitive match against the canonical vocabulary.
    pub fn from_tag(tag: &str) -> Option<Construct> {
        match tag {
            "VAR" => Some(Construct::Var),
            "OUTPUT" => Some(Construct::Output),
            "FORM" => Some(Construct::Form),
            "OL" | "UL" => Some(Construct::List),
            "LI" => Some(Construct::ListItem),
            "SELECT" => Some(Construct::Select),
            "OPTION" => Some(Construct::SelectOption),
            "INPUT" => Some(Construct::Input),
            "MATH" => Some(Construct::Math),
            _ => None,
        }
    }
}

/// Drops comment nodes and whitespace-only text nodes, preserving the
/// order of everything else. Applied before any construct walks its
/// children, so the interpreter never observes markup noise.
pub fn filter_nodes(nodes: &[Node]) -> Vec<&Node> {
    nodes
        .iter()
        .filter(|node| match node {
            Node::Comment { .. } => false,
            Node::Text { content, .. } => !content.trim().is_empty(),
            _ => true,
        })
        .collect()
}
