use ast_grep_language::{LanguageExt, SupportLang};
use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

/// First parse error found in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// 1-based.
    pub line: usize,
    /// 1-based, in bytes.
    pub column: usize,
    pub snippet: String,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}, column {}: {}",
            self.line, self.column, self.snippet
        )
    }
}

const SNIPPET_LEN: usize = 60;

/// Grammar used for a dynamic-scripting file, by extension.
pub fn grammar_for(filename: &str) -> Option<SupportLang> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext {
        "py" => Some(SupportLang::Python),
        "js" | "mjs" | "cjs" => Some(SupportLang::JavaScript),
        _ => None,
    }
}

/// Parse `source` with the grammar for `filename`.
///
/// `Ok(())` also covers the cases where no check could run: unknown
/// extension or a parser that could not be set up. Those are logged.
pub fn check_syntax(filename: &str, source: &str) -> Result<(), SyntaxError> {
    let Some(lang) = grammar_for(filename) else {
        debug!(file = filename, "No grammar for extension, syntax gate skipped");
        return Ok(());
    };

    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&lang.get_ts_language()) {
        warn!(file = filename, error = %e, "Grammar unavailable, syntax gate skipped");
        return Ok(());
    }
    let Some(tree) = parser.parse(source, None) else {
        warn!(file = filename, "Parser returned no tree, syntax gate skipped");
        return Ok(());
    };

    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    match first_error(root) {
        Some(node) => Err(describe(node, source)),
        None => Err(SyntaxError {
            line: 1,
            column: 1,
            snippet: "unparseable input".to_string(),
        }),
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn describe(node: Node<'_>, source: &str) -> SyntaxError {
    let position = node.start_position();
    let snippet = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let text = node.utf8_text(source.as_bytes()).unwrap_or_default();
        let first_line = text.lines().next().unwrap_or_default().trim();
        let short: String = first_line.chars().take(SNIPPET_LEN).collect();
        format!("unexpected `{short}`")
    };

    SyntaxError {
        line: position.row + 1,
        column: position.column + 1,
        snippet,
    }
}
