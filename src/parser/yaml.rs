//! Typed view over a YAML document
//!
//! The document is parsed with tree-sitter and folded into a small [`YamlNode`]
//! tree. Only the shape information callers need is kept: mappings (in document
//! order), sequences, scalar text and aliases. Anchors, tags and comments are dropped.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use indexmap::IndexMap;
use tracing::warn;

/// Kind of a [`YamlNode`], used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mapping,
    Sequence,
    Scalar,
    Alias,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::Scalar => "scalar",
            NodeKind::Alias => "alias",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of a parsed YAML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlNode {
    /// Key/value pairs in document order. When a key repeats, the first occurrence wins.
    Mapping(IndexMap<String, YamlNode>),
    Sequence(Vec<YamlNode>),
    /// Scalar text after unquoting. Empty values and `~` are kept as written.
    Scalar(String),
    /// Reference to an anchor (`*name`), stored without the leading `*`
    Alias(String),
}

impl YamlNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            YamlNode::Mapping(_) => NodeKind::Mapping,
            YamlNode::Sequence(_) => NodeKind::Sequence,
            YamlNode::Scalar(_) => NodeKind::Scalar,
            YamlNode::Alias(_) => NodeKind::Alias,
        }
    }

    /// Look up `key` if this node is a mapping
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_mapping()?.get(key)
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, YamlNode>> {
        match self {
            YamlNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            YamlNode::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// First key/value pair of a mapping, in document order
    pub fn first_entry(&self) -> Option<(&str, &YamlNode)> {
        self.as_mapping()?
            .first()
            .map(|(key, value)| (key.as_str(), value))
    }
}

/// Error type for YAML parsing
#[derive(Debug, thiserror::Error)]
pub enum YamlError {
    /// Tree-sitter could not be set up or gave up on the input
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// The document contains a syntax error
    #[error("Invalid syntax at line {line}, column {column}")]
    InvalidSyntax { line: usize, column: usize },
}

/// Parse `content` and return the root node of its first document.
///
/// Returns `Ok(None)` for a stream without any document content (empty file,
/// comments only).
pub fn parse_document(content: &str) -> Result<Option<YamlNode>, YamlError> {
    let mut parser = tree_sitter::Parser::new();
    let language = tree_sitter_yaml::LANGUAGE;
    parser.set_language(&language.into()).map_err(|e| {
        warn!("Failed to set YAML language for tree-sitter: {}", e);
        YamlError::TreeSitter(e.to_string())
    })?;

    let tree = parser.parse(content, None).ok_or_else(|| {
        warn!("Failed to parse YAML content");
        YamlError::TreeSitter("parser returned no tree".to_string())
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let point = first_error(root).unwrap_or(root).start_position();
        return Err(YamlError::InvalidSyntax {
            line: point.row + 1,
            column: point.column + 1,
        });
    }

    let builder = TreeBuilder { content };
    Ok(builder
        .first_document_body(root)
        .map(|body| builder.build(body)))
}

/// Locate the innermost-first ERROR or MISSING node below `node`
fn first_error(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

/// Converts tree-sitter-yaml syntax nodes into [`YamlNode`]s
///
/// YAML tree structure:
/// ```text
/// stream
///   document
///     block_node
///       block_mapping
///         block_mapping_pair          <- key/value fields
///           flow_node                 <- key: plain_scalar / quoted scalar
///           block_node | flow_node    <- value
///       block_sequence
///         block_sequence_item
///     flow_node
///       flow_mapping                  <- flow_pair (key/value fields) or bare flow_node
///       flow_sequence
///       plain_scalar | double_quote_scalar | single_quote_scalar | alias
/// ```
struct TreeBuilder<'a> {
    content: &'a str,
}

impl TreeBuilder<'_> {
    fn first_document_body<'t>(&self, root: tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
        let mut cursor = root.walk();
        let document = root
            .named_children(&mut cursor)
            .find(|child| child.kind() == "document")?;

        let mut cursor = document.walk();
        document
            .named_children(&mut cursor)
            .find(|child| matches!(child.kind(), "block_node" | "flow_node"))
    }

    fn build(&self, node: tree_sitter::Node) -> YamlNode {
        match node.kind() {
            "block_node" | "flow_node" | "block_sequence_item" => match self.content_child(node) {
                Some(inner) => self.build(inner),
                // Only an anchor or a tag, no value
                None => YamlNode::Scalar(String::new()),
            },
            "block_mapping" => self.build_block_mapping(node),
            "flow_mapping" => self.build_flow_mapping(node),
            "block_sequence" | "flow_sequence" => self.build_sequence(node),
            "flow_pair" => {
                let mut map = IndexMap::new();
                self.insert_pair(&mut map, node);
                YamlNode::Mapping(map)
            }
            "plain_scalar" => YamlNode::Scalar(fold_lines(self.text(node))),
            "single_quote_scalar" => {
                YamlNode::Scalar(fold_lines(strip_quotes(self.text(node), '\'')).replace("''", "'"))
            }
            "double_quote_scalar" => {
                YamlNode::Scalar(unescape_double_quoted(strip_quotes(self.text(node), '"')))
            }
            "block_scalar" => YamlNode::Scalar(block_scalar(
                self.block_scalar_text(node),
                self.line_indent(node),
            )),
            "alias" => YamlNode::Alias(self.text(node).trim().trim_start_matches('*').to_string()),
            _ => YamlNode::Scalar(self.text(node).trim().to_string()),
        }
    }

    fn build_block_mapping(&self, node: tree_sitter::Node) -> YamlNode {
        let mut map = IndexMap::new();
        let mut cursor = node.walk();
        for pair in node.named_children(&mut cursor) {
            if pair.kind() == "block_mapping_pair" {
                self.insert_pair(&mut map, pair);
            }
        }
        YamlNode::Mapping(map)
    }

    fn build_flow_mapping(&self, node: tree_sitter::Node) -> YamlNode {
        let mut map = IndexMap::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "flow_pair" => self.insert_pair(&mut map, child),
                // `{ key }` is a key with an empty value
                "flow_node" => {
                    let key = self.key_text(child);
                    map.entry(key).or_insert(YamlNode::Scalar(String::new()));
                }
                _ => {}
            }
        }
        YamlNode::Mapping(map)
    }

    fn build_sequence(&self, node: tree_sitter::Node) -> YamlNode {
        let mut items = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if matches!(child.kind(), "block_sequence_item" | "flow_node" | "flow_pair") {
                items.push(self.build(child));
            }
        }
        YamlNode::Sequence(items)
    }

    fn insert_pair(&self, map: &mut IndexMap<String, YamlNode>, pair: tree_sitter::Node) {
        let key = pair
            .child_by_field_name("key")
            .map(|key| self.key_text(key))
            .unwrap_or_default();
        let value = pair
            .child_by_field_name("value")
            .map(|value| self.build(value))
            .unwrap_or_else(|| YamlNode::Scalar(String::new()));

        map.entry(key).or_insert(value);
    }

    fn key_text(&self, node: tree_sitter::Node) -> String {
        match self.build(node) {
            YamlNode::Scalar(text) | YamlNode::Alias(text) => text,
            _ => self.text(node).trim().to_string(),
        }
    }

    /// First child carrying a value, skipping anchors, tags and comments
    fn content_child<'t>(&self, node: tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .find(|child| !matches!(child.kind(), "anchor" | "tag" | "comment"))
    }

    fn text(&self, node: tree_sitter::Node) -> &str {
        &self.content[node.byte_range()]
    }

    /// Block scalar text including the blank lines that follow it, which keep
    /// chomping (`+`) turns into line breaks
    fn block_scalar_text(&self, node: tree_sitter::Node) -> &str {
        let end = node.end_byte();
        let trailing: usize = self.content[end..]
            .split_inclusive('\n')
            .take_while(|line| line.trim().is_empty())
            .map(str::len)
            .sum();
        &self.content[node.start_byte()..end + trailing]
    }

    /// Indentation of the line `node` starts on
    fn line_indent(&self, node: tree_sitter::Node) -> usize {
        let before = &self.content[..node.start_byte()];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        leading_spaces(&self.content[line_start..])
    }
}

fn strip_quotes(text: &str, quote: char) -> &str {
    let text = text.trim();
    let text = text.strip_prefix(quote).unwrap_or(text);
    text.strip_suffix(quote).unwrap_or(text)
}

/// Apply YAML line folding to a multi-line flow scalar
///
/// A single line break becomes a space, each empty line becomes a newline.
fn fold_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut empty_lines = 0;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            empty_lines += 1;
            continue;
        }
        if !out.is_empty() {
            if empty_lines == 0 {
                out.push(' ');
            } else {
                out.extend(std::iter::repeat_n('\n', empty_lines));
            }
        }
        empty_lines = 0;
        out.push_str(line);
    }
    out
}

fn unescape_double_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') | Some('\t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some('a') => out.push('\u{7}'),
                Some('b') => out.push('\u{8}'),
                Some('v') => out.push('\u{b}'),
                Some('f') => out.push('\u{c}'),
                Some('e') => out.push('\u{1b}'),
                Some('_') => out.push('\u{a0}'),
                Some('N') => out.push('\u{85}'),
                Some('L') => out.push('\u{2028}'),
                Some('P') => out.push('\u{2029}'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('/') => out.push('/'),
                Some(' ') => out.push(' '),
                Some('x') => push_code_point(&mut out, &mut chars, 2),
                Some('u') => push_code_point(&mut out, &mut chars, 4),
                Some('U') => push_code_point(&mut out, &mut chars, 8),
                // Escaped line break joins the lines without a space
                Some('\n') => skip_indentation(&mut chars),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '\n' => {
                while out.ends_with([' ', '\t']) {
                    out.pop();
                }
                skip_indentation(&mut chars);
                let mut empty_lines = 0;
                while chars.next_if_eq(&'\n').is_some() {
                    skip_indentation(&mut chars);
                    empty_lines += 1;
                }
                if empty_lines == 0 {
                    out.push(' ');
                } else {
                    out.extend(std::iter::repeat_n('\n', empty_lines));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn skip_indentation(chars: &mut Peekable<Chars>) {
    while chars.next_if(|c| matches!(c, ' ' | '\t' | '\r')).is_some() {}
}

fn push_code_point(out: &mut String, chars: &mut Peekable<Chars>, digits: usize) {
    let hex: String = chars.by_ref().take(digits).collect();
    let decoded = u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    out.push(decoded);
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Chomping indicator of a block scalar header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomping {
    /// `-`: no final line break
    Strip,
    /// default: a single final line break
    Clip,
    /// `+`: the final line break and all trailing empty lines
    Keep,
}

/// Render a literal (`|`) or folded (`>`) block scalar
///
/// `parent_indent` is the indentation of the line holding the header, which an
/// explicit indentation indicator (`|2`) is relative to.
fn block_scalar(text: &str, parent_indent: usize) -> String {
    let (header, body) = text.split_once('\n').unwrap_or((text, ""));
    let header = header.split('#').next().unwrap_or_default().trim();
    let folded = header.starts_with('>');
    let chomping = if header.contains('-') {
        Chomping::Strip
    } else if header.contains('+') {
        Chomping::Keep
    } else {
        Chomping::Clip
    };

    let lines: Vec<&str> = body.lines().collect();
    let indent = header
        .chars()
        .find_map(|c| c.to_digit(10))
        .filter(|digit| *digit > 0)
        .map(|digit| parent_indent + digit as usize)
        .or_else(|| {
            lines
                .iter()
                .find(|line| !line.trim().is_empty())
                .map(|line| leading_spaces(line))
        })
        .unwrap_or(0);

    let content_len = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);
    let trailing_breaks = lines.len() - content_len;
    let content: Vec<&str> = lines[..content_len]
        .iter()
        .map(|line| &line[leading_spaces(line).min(indent)..])
        .collect();

    let mut out = if folded {
        fold_lines(&content.join("\n"))
    } else {
        content.join("\n")
    };

    match chomping {
        Chomping::Strip => {}
        Chomping::Clip => {
            if !out.is_empty() {
                out.push('\n');
            }
        }
        Chomping::Keep => {
            if !out.is_empty() {
                out.push('\n');
            }
            out.extend(std::iter::repeat_n('\n', trailing_breaks));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scalar(text: &str) -> YamlNode {
        YamlNode::Scalar(text.to_string())
    }

    #[test]
    fn parse_document_keeps_block_mapping_order() {
        let content = r#"sources:
  "2.0.0":
    url: "https://example.com/b.tar.gz"
  "1.0.0":
    url: "https://example.com/a.tar.gz"
patches: {}
"#;
        let root = parse_document(content).unwrap().unwrap();

        let keys: Vec<&str> = root.as_mapping().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["sources", "patches"]);

        let sources = root.get("sources").unwrap();
        let versions: Vec<&str> = sources.as_mapping().unwrap().keys().map(String::as_str).collect();
        assert_eq!(versions, vec!["2.0.0", "1.0.0"]);
        assert_eq!(
            sources.get("2.0.0").unwrap().get("url"),
            Some(&scalar("https://example.com/b.tar.gz"))
        );
    }

    #[test]
    fn parse_document_reads_flow_collections() {
        let content = r#"{ sources: { "1.2.0": { url: ["https://a/x", 'https://b/y'] } } }"#;
        let root = parse_document(content).unwrap().unwrap();

        let url = root.get("sources").unwrap().get("1.2.0").unwrap().get("url");
        assert_eq!(
            url,
            Some(&YamlNode::Sequence(vec![
                scalar("https://a/x"),
                scalar("https://b/y"),
            ]))
        );
    }

    #[test]
    fn parse_document_reads_block_sequences() {
        let content = r#"url:
  - https://a/x
  # mirror
  - "https://b/y"
"#;
        let root = parse_document(content).unwrap().unwrap();

        assert_eq!(
            root.get("url"),
            Some(&YamlNode::Sequence(vec![
                scalar("https://a/x"),
                scalar("https://b/y"),
            ]))
        );
    }

    #[rstest]
    #[case(r#"key: "a \"quoted\" value""#, "a \"quoted\" value")]
    #[case(r#"key: "tab\there""#, "tab\there")]
    #[case(r#"key: "café""#, "café")]
    #[case("key: 'it''s'", "it's")]
    #[case("key: plain text", "plain text")]
    #[case("key: 1.2.0", "1.2.0")]
    #[case("key: ~", "~")]
    #[case("key: !!str 3.10", "3.10")]
    #[case("key: &anchor value", "value")]
    #[case("key:", "")]
    #[case(r#"key: "a\eb""#, "a\u{1b}b")]
    #[case(r#"key: "a\_b""#, "a\u{a0}b")]
    #[case(r#"key: "\a\b\v\f""#, "\u{7}\u{8}\u{b}\u{c}")]
    #[case(r#"key: "\N\L\P""#, "\u{85}\u{2028}\u{2029}")]
    #[case(r#"key: "\x41\u00e9\U0001F600""#, "A\u{e9}\u{1F600}")]
    fn parse_document_unquotes_scalars(#[case] content: &str, #[case] expected: &str) {
        let root = parse_document(content).unwrap().unwrap();

        assert_eq!(root.get("key"), Some(&scalar(expected)));
    }

    #[test]
    fn parse_document_folds_multiline_plain_scalar() {
        let content = "key: first\n  second\n";
        let root = parse_document(content).unwrap().unwrap();

        assert_eq!(root.get("key"), Some(&scalar("first second")));
    }

    #[test]
    fn parse_document_reads_literal_block_scalar() {
        let content = "key: |\n  line one\n  line two\nother: x\n";
        let root = parse_document(content).unwrap().unwrap();

        assert_eq!(root.get("key"), Some(&scalar("line one\nline two\n")));
        assert_eq!(root.get("other"), Some(&scalar("x")));
    }

    #[rstest]
    #[case("key: |-\n  a\n  b\n\nother: x\n", "a\nb")]
    #[case("key: |\n  a\n\n\nother: x\n", "a\n")]
    #[case("key: |+\n  a\n\nother: x", "a\n\n")]
    #[case("key: |+\n  a\n", "a\n")]
    #[case("key: >\n  folded\n  text\n\n  next\n", "folded text\nnext\n")]
    #[case("key: >-\n  folded\n  text\n", "folded text")]
    #[case("key: |2\n    indented\n  normal\n", "  indented\nnormal\n")]
    #[case("outer:\n  key: |1\n     deep\n   base\n", "  deep\nbase\n")]
    fn parse_document_applies_block_scalar_indicators(
        #[case] content: &str,
        #[case] expected: &str,
    ) {
        let root = parse_document(content).unwrap().unwrap();
        let node = root.get("key").or_else(|| root.get("outer")?.get("key"));

        assert_eq!(node, Some(&scalar(expected)));
    }

    #[test]
    fn parse_document_keeps_numeric_looking_keys_as_written() {
        let content = "sources:\n  1.10:\n    url: https://example.com/a.tar.gz\n";
        let root = parse_document(content).unwrap().unwrap();

        assert_eq!(root.get("sources").unwrap().first_entry().unwrap().0, "1.10");
    }

    #[test]
    fn parse_document_keeps_first_of_duplicate_keys() {
        let content = "key: first\nkey: second\n";
        let root = parse_document(content).unwrap().unwrap();

        assert_eq!(root.as_mapping().unwrap().len(), 1);
        assert_eq!(root.get("key"), Some(&scalar("first")));
    }

    #[test]
    fn parse_document_reports_alias_nodes() {
        let content = "base: &mirror https://example.com\nurl: *mirror\n";
        let root = parse_document(content).unwrap().unwrap();

        assert_eq!(root.get("url"), Some(&YamlNode::Alias("mirror".to_string())));
        assert_eq!(root.get("url").unwrap().kind(), NodeKind::Alias);
    }

    #[rstest]
    #[case("")]
    #[case("# only a comment\n")]
    fn parse_document_returns_none_without_content(#[case] content: &str) {
        assert_eq!(parse_document(content).unwrap(), None);
    }

    #[test]
    fn parse_document_rejects_unbalanced_flow_collection() {
        let content = "sources: { \"1.0\": { url: [\"a\", \"b\" } \n";
        let result = parse_document(content);

        assert!(matches!(result, Err(YamlError::InvalidSyntax { .. })));
    }

    #[test]
    fn first_entry_returns_first_pair_in_document_order() {
        let root = parse_document("b: 1\na: 2\n").unwrap().unwrap();

        assert_eq!(root.first_entry(), Some(("b", &scalar("1"))));
    }

    #[test]
    fn get_returns_none_on_non_mapping() {
        let node = YamlNode::Sequence(vec![scalar("a")]);

        assert_eq!(node.get("a"), None);
        assert_eq!(node.first_entry(), None);
    }
}
