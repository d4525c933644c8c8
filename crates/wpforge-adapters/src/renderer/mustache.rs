//! Logic-less `{{mustache}}` renderer.
//!
//! Supported tags:
//!
//! | Tag              | Meaning                                        |
//! |------------------|------------------------------------------------|
//! | `{{a.b}}`        | value at a dotted path, HTML-escaped           |
//! | `{{{a.b}}}`      | value, unescaped                               |
//! | `{{& a.b}}`      | value, unescaped                               |
//! | `{{#a}}..{{/a}}` | section: repeated per list item, or shown once |
//! | `{{^a}}..{{/a}}` | inverted section: shown when `a` is falsy      |
//! | `{{! text}}`     | comment                                        |
//! | `{{.}}`          | the current list item                          |
//!
//! Falsy values are `null`, `false`, `0`, `""` and `[]`. Section, comment and
//! closing tags alone on a line take the whole line with them.

use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use wpforge_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    error::ForgeResult,
};

/// Template syntax errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("unclosed tag starting at byte {offset}")]
    UnclosedTag { offset: usize },

    #[error("empty tag at byte {offset}")]
    EmptyTag { offset: usize },

    #[error("section '{name}' is never closed")]
    UnclosedSection { name: String },

    #[error("closing tag '{found}' does not match open section '{expected}'")]
    MismatchedClose { expected: String, found: String },

    #[error("closing tag '{name}' without an open section")]
    UnexpectedClose { name: String },

    #[error("delimiter changes are not supported")]
    DelimiterChange,
}

/// Renderer for the mustache subset above.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustacheRenderer;

impl MustacheRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for MustacheRenderer {
    #[instrument(skip_all, fields(len = template.len()))]
    fn render(&self, template: &str, data: &Value) -> ForgeResult<String> {
        let nodes = parse(template).map_err(|e| ApplicationError::RenderingFailed {
            template: excerpt(template),
            reason: e.to_string(),
        })?;

        let mut out = String::with_capacity(template.len());
        let mut context = vec![data];
        render_nodes(&nodes, &mut context, &mut out);
        Ok(out)
    }
}

// ── parsing ───────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Node {
    Text(String),
    Var { name: String, escape: bool },
    Section { name: String, inverted: bool, children: Vec<Node> },
}

enum Tag {
    Var { name: String, escape: bool },
    Open { name: String, inverted: bool },
    Close { name: String },
    Comment,
}

impl Tag {
    fn classify(inner: &str, triple: bool, offset: usize) -> Result<Self, RenderError> {
        let inner = inner.trim();
        let (sigil, rest) = match inner.chars().next() {
            Some(c @ ('#' | '^' | '/' | '!' | '&' | '=')) if !triple => (Some(c), inner[1..].trim()),
            _ => (None, inner),
        };

        if sigil == Some('!') {
            return Ok(Self::Comment);
        }
        if sigil == Some('=') {
            return Err(RenderError::DelimiterChange);
        }
        if rest.is_empty() {
            return Err(RenderError::EmptyTag { offset });
        }

        let name = rest.to_string();
        Ok(match sigil {
            Some('#') => Self::Open { name, inverted: false },
            Some('^') => Self::Open { name, inverted: true },
            Some('/') => Self::Close { name },
            Some('&') => Self::Var { name, escape: false },
            _ => Self::Var { name, escape: !triple },
        })
    }

    fn can_stand_alone(&self) -> bool {
        !matches!(self, Self::Var { .. })
    }
}

struct Frame {
    section: Option<(String, bool)>,
    nodes: Vec<Node>,
}

fn parse(src: &str) -> Result<Vec<Node>, RenderError> {
    let mut stack = vec![Frame {
        section: None,
        nodes: Vec::new(),
    }];
    let mut pos = 0;

    while let Some(offset) = src[pos..].find("{{") {
        let start = pos + offset;
        let triple = src[start..].starts_with("{{{");
        let (open_len, close) = if triple { (3, "}}}") } else { (2, "}}") };

        let inner_start = start + open_len;
        let inner_len = src[inner_start..]
            .find(close)
            .ok_or(RenderError::UnclosedTag { offset: start })?;
        let end = inner_start + inner_len + close.len();

        let tag = Tag::classify(&src[inner_start..inner_start + inner_len], triple, start)?;

        let line_start = src[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = src[end..].find('\n').map_or(src.len(), |i| end + i + 1);
        let standalone = tag.can_stand_alone()
            && line_start >= pos
            && src[line_start..start].trim().is_empty()
            && src[end..line_end].trim().is_empty();

        let (text_end, next) = if standalone {
            (line_start, line_end)
        } else {
            (start, end)
        };
        push_text(&mut stack, &src[pos..text_end]);
        pos = next;

        match tag {
            Tag::Comment => {}
            Tag::Var { name, escape } => current(&mut stack).push(Node::Var { name, escape }),
            Tag::Open { name, inverted } => stack.push(Frame {
                section: Some((name, inverted)),
                nodes: Vec::new(),
            }),
            Tag::Close { name } => close_section(&mut stack, name)?,
        }
    }

    push_text(&mut stack, &src[pos..]);

    if stack.len() > 1 {
        let name = stack
            .pop()
            .and_then(|f| f.section)
            .map(|(name, _)| name)
            .unwrap_or_default();
        return Err(RenderError::UnclosedSection { name });
    }

    Ok(stack.pop().map(|f| f.nodes).unwrap_or_default())
}

fn close_section(stack: &mut Vec<Frame>, found: String) -> Result<(), RenderError> {
    if stack.len() < 2 {
        return Err(RenderError::UnexpectedClose { name: found });
    }
    let Some(Frame {
        section: Some((name, inverted)),
        nodes,
    }) = stack.pop()
    else {
        return Err(RenderError::UnexpectedClose { name: found });
    };

    if name != found {
        return Err(RenderError::MismatchedClose {
            expected: name,
            found,
        });
    }

    current(stack).push(Node::Section {
        name,
        inverted,
        children: nodes,
    });
    Ok(())
}

fn current(stack: &mut [Frame]) -> &mut Vec<Node> {
    // The root frame is never popped while parsing.
    match stack.last_mut() {
        Some(frame) => &mut frame.nodes,
        None => unreachable!("parser stack always holds the root frame"),
    }
}

fn push_text(stack: &mut [Frame], text: &str) {
    if !text.is_empty() {
        current(stack).push(Node::Text(text.to_string()));
    }
}

// ── rendering ─────────────────────────────────────────────────────────────

fn render_nodes<'a>(nodes: &[Node], context: &mut Vec<&'a Value>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var { name, escape } => {
                if let Some(value) = lookup(name, context) {
                    let text = to_text(value);
                    if *escape {
                        push_escaped(out, &text);
                    } else {
                        out.push_str(&text);
                    }
                }
            }
            Node::Section {
                name,
                inverted,
                children,
            } => {
                let value = lookup(name, context);
                let truthy = value.is_some_and(is_truthy);

                if *inverted {
                    if !truthy {
                        render_nodes(children, context, out);
                    }
                    continue;
                }

                match value {
                    Some(Value::Array(items)) if truthy => {
                        for item in items {
                            context.push(item);
                            render_nodes(children, context, out);
                            context.pop();
                        }
                    }
                    Some(value @ Value::Object(_)) => {
                        context.push(value);
                        render_nodes(children, context, out);
                        context.pop();
                    }
                    Some(_) if truthy => render_nodes(children, context, out),
                    _ => {}
                }
            }
        }
    }
}

/// Resolve a dotted name. The first segment is looked up from the innermost
/// context outwards; the rest walk down from there.
fn lookup<'a>(name: &str, context: &[&'a Value]) -> Option<&'a Value> {
    if name == "." {
        return context.last().copied();
    }

    let mut segments = name.split('.');
    let first = segments.next()?;
    let mut value = context.iter().rev().find_map(|ctx| ctx.get(first))?;

    for segment in segments {
        value = match value {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            other => other.get(segment)?,
        };
    }
    Some(value)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

fn excerpt(template: &str) -> String {
    const MAX: usize = 40;
    let line = template.lines().next().unwrap_or_default();
    match line.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: Value) -> String {
        MustacheRenderer::new().render(template, &data).unwrap()
    }

    #[test]
    fn dotted_variables() {
        let data = json!({ "project": { "title": "Acme Site" } });
        assert_eq!(render("# {{project.title}}", data), "# Acme Site");
    }

    #[test]
    fn missing_variables_render_empty() {
        assert_eq!(render("[{{nope.deeper}}]", json!({})), "[]");
    }

    #[test]
    fn escaping_rules() {
        let data = json!({ "v": "<a & 'b'>" });
        assert_eq!(render("{{v}}", data.clone()), "&lt;a &amp; &#39;b&#39;&gt;");
        assert_eq!(render("{{{v}}}", data.clone()), "<a & 'b'>");
        assert_eq!(render("{{& v}}", data), "<a & 'b'>");
    }

    #[test]
    fn secrets_and_namespaces_survive_escaping() {
        let data = json!({ "key": "a+b/c=", "ns": "ACME\\Plugin" });
        assert_eq!(render("{{key}} {{ns}}", data), "a+b/c= ACME\\Plugin");
    }

    #[test]
    fn list_sections_repeat() {
        let data = json!({ "plugins": [
            { "name": "Acf Pro", "file": "acf-pro.zip" },
            { "name": "Gravity Forms", "file": "gravity-forms.zip" },
        ]});
        let template = "{{#plugins}}\n- {{name}} ({{file}})\n{{/plugins}}\n";
        assert_eq!(
            render(template, data),
            "- Acf Pro (acf-pro.zip)\n- Gravity Forms (gravity-forms.zip)\n"
        );
    }

    #[test]
    fn outer_context_is_visible_in_sections() {
        let data = json!({ "project": { "slug": "acme" }, "plugins": [{ "file": "a.zip" }] });
        assert_eq!(
            render("{{#plugins}}{{project.slug}}/{{file}}{{/plugins}}", data),
            "acme/a.zip"
        );
    }

    #[test]
    fn boolean_and_inverted_sections() {
        let template = "{{#vvv}}vvv on{{/vvv}}{{^vvv}}vvv off{{/vvv}}";
        assert_eq!(render(template, json!({ "vvv": true })), "vvv on");
        assert_eq!(render(template, json!({ "vvv": false })), "vvv off");
        assert_eq!(render(template, json!({})), "vvv off");
    }

    #[test]
    fn empty_string_is_falsy() {
        let template = "{{#repo.url}}remote: {{repo.url}}{{/repo.url}}";
        assert_eq!(render(template, json!({ "repo": { "url": "" } })), "");
        assert_eq!(
            render(template, json!({ "repo": { "url": "git@x:y.git" } })),
            "remote: git@x:y.git"
        );
    }

    #[test]
    fn dot_renders_current_item() {
        assert_eq!(
            render("{{#dirs}}[{{.}}]{{/dirs}}", json!({ "dirs": ["css", "js"] })),
            "[css][js]"
        );
    }

    #[test]
    fn standalone_tags_drop_their_line() {
        let template = "a\n  {{#x}}\nb\n  {{/x}}\n{{! note }}\nc\n";
        assert_eq!(render(template, json!({ "x": true })), "a\nb\nc\n");
    }

    #[test]
    fn inline_sections_keep_surrounding_text() {
        assert_eq!(render("a {{#x}}b{{/x}} c", json!({ "x": true })), "a b c");
    }

    #[test]
    fn numbers_and_bools_render_as_text() {
        assert_eq!(
            render("{{n}} {{b}}", json!({ "n": 3, "b": false })),
            "3 false"
        );
    }

    #[test]
    fn renders_paths_too() {
        assert_eq!(
            render("{{plugin.slug}}.php", json!({ "plugin": { "slug": "acme-core" } })),
            "acme-core.php"
        );
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(parse("{{#a}}x").unwrap_err(), RenderError::UnclosedSection {
            name: "a".into()
        });
        assert_eq!(parse("{{#a}}x{{/b}}").unwrap_err(), RenderError::MismatchedClose {
            expected: "a".into(),
            found: "b".into()
        });
        assert_eq!(parse("x{{/a}}").unwrap_err(), RenderError::UnexpectedClose {
            name: "a".into()
        });
        assert!(matches!(parse("{{oops"), Err(RenderError::UnclosedTag { .. })));
        assert!(matches!(parse("{{ }}"), Err(RenderError::EmptyTag { .. })));
        assert_eq!(parse("{{=<% %>=}}").unwrap_err(), RenderError::DelimiterChange);
    }

    #[test]
    fn syntax_errors_become_rendering_failures() {
        let err = MustacheRenderer::new()
            .render("{{#a}}never closed", &json!({}))
            .unwrap_err();
        assert!(err.to_string().contains("never closed"));
    }
}
