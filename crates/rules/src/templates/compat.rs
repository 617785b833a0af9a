//! Translation of Go `text/template` actions into minijinja syntax.
//!
//! Existing ecschedule templates reference fields as `{{ .Name }}`. The subset
//! handled here is field references (`.Field`, `$.Field`), `if`/`else`/
//! `else if`/`end`, `range` with `.` as the current element, comments, and
//! `{{-`/`-}}` trim markers. Anything else inside `{{ }}` is passed through,
//! so native minijinja expressions keep working. A template with no Go-style
//! action is native minijinja and its `{% %}`/`{# #}` tags are left alone.

/// An open block awaiting its `{{ end }}`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    If,
    Range { var: String },
}

impl Block {
    fn closing_tag(&self) -> &'static str {
        match self {
            Self::If => "endif",
            Self::Range { .. } => "endfor",
        }
    }
}

/// A piece of template source: literal text or the inside of `{{ }}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Action(&'a str),
}

/// Rewrite Go-style actions in `source`. Returns a syntax message on failure.
///
/// When any action is Go-style, literal text is taken verbatim as Go does:
/// `{%` and `{#` in it are escaped so minijinja does not read them as tags.
pub(crate) fn translate(source: &str) -> Result<String, String> {
    let segments = split_segments(source)?;
    let go_style = segments
        .iter()
        .any(|s| matches!(s, Segment::Action(inner) if is_go_action(inner)));

    let mut out = String::with_capacity(source.len());
    let mut blocks: Vec<Block> = Vec::new();
    for segment in segments {
        match segment {
            Segment::Text(text) if go_style => push_literal(text, &mut out),
            Segment::Text(text) => out.push_str(text),
            Segment::Action(inner) => translate_action(inner, &mut blocks, &mut out)?,
        }
    }

    if let Some(block) = blocks.last() {
        return Err(format!(
            "missing {{{{ end }}}} for open {} block",
            if *block == Block::If { "if" } else { "range" }
        ));
    }
    Ok(out)
}

fn split_segments(source: &str) -> Result<Vec<Segment<'_>>, String> {
    let mut segments = Vec::new();
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }
        let after = &rest[start + 2..];
        let Some(end) = find_action_end(after) else {
            return Err(format!(
                "unterminated action starting at byte {}",
                offset + start
            ));
        };
        segments.push(Segment::Action(&after[..end]));
        let consumed = start + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    Ok(segments)
}

/// Byte offset of the `}}` closing an action, ignoring quoted strings.
fn find_action_end(action: &str) -> Option<usize> {
    let bytes = action.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(b'"') if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if matches!(b, b'"' | b'`' | b'\'') => quote = Some(b),
            None if b == b'}' && bytes.get(i + 1) == Some(&b'}') => return Some(i),
            None => {}
        }
        i += 1;
    }
    None
}

/// Whether an action uses Go syntax rather than native minijinja.
fn is_go_action(inner: &str) -> bool {
    let body = inner.trim_matches(|c: char| c == '-' || c.is_whitespace());
    if body.starts_with("/*") {
        return true;
    }
    let keyword = body.split_whitespace().next().unwrap_or("");
    matches!(
        keyword,
        "if" | "else" | "end" | "range" | "with" | "define" | "template" | "block"
    ) || body
        .split_whitespace()
        .any(|t| t.trim_start_matches('(').starts_with('.') || t.starts_with("$."))
}

fn push_literal(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(pos) = rest.find('{') {
        let tail = &rest[pos..];
        // A trailing `{` would join the next action's `{{`.
        let opener = if tail.starts_with("{%") || tail.starts_with("{#") {
            Some(&tail[..2])
        } else if tail == "{" {
            Some(tail)
        } else {
            None
        };
        if let Some(opener) = opener {
            out.push_str(&rest[..pos]);
            out.push_str(&format!("{{{{ \"{opener}\" }}}}"));
            rest = &tail[opener.len()..];
        } else {
            out.push_str(&rest[..=pos]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
}

fn translate_action(inner: &str, blocks: &mut Vec<Block>, out: &mut String) -> Result<(), String> {
    let (trim_left, body) = match inner.strip_prefix('-') {
        Some(r) if r.starts_with(char::is_whitespace) => (true, r),
        _ => (false, inner),
    };
    let (trim_right, body) = match body.strip_suffix('-') {
        Some(r) if r.ends_with(char::is_whitespace) => (true, r),
        _ => (false, body),
    };
    let body = body.trim();

    let tag = |content: &str| {
        format!(
            "{{%{} {} {}%}}",
            if trim_left { "-" } else { "" },
            content,
            if trim_right { "-" } else { "" }
        )
    };

    if body.starts_with("/*") && body.ends_with("*/") {
        // Comments vanish but keep their trim markers.
        if trim_left || trim_right {
            out.push_str(&format!(
                "{{{{{} \"\" {}}}}}",
                if trim_left { "-" } else { "" },
                if trim_right { "-" } else { "" }
            ));
        }
        return Ok(());
    }

    let (keyword, args) = match body.split_once(char::is_whitespace) {
        Some((k, a)) => (k, a.trim()),
        None => (body, ""),
    };

    match keyword {
        "end" if args.is_empty() => {
            let block = blocks.pop().ok_or("unexpected {{ end }} without open block")?;
            out.push_str(&tag(block.closing_tag()));
        }
        "else" => match (blocks.last(), args.strip_prefix("if ")) {
            (Some(Block::If), Some(cond)) => {
                let cond = translate_expr(cond.trim(), blocks)?;
                out.push_str(&tag(&format!("elif {cond}")));
            }
            (Some(_), None) if args.is_empty() => out.push_str(&tag("else")),
            (None, _) => return Err("unexpected {{ else }} without open block".to_string()),
            _ => return Err(format!("unsupported else clause: {{{{ {body} }}}}")),
        },
        "if" if !args.is_empty() => {
            let cond = translate_expr(args, blocks)?;
            blocks.push(Block::If);
            out.push_str(&tag(&format!("if {cond}")));
        }
        "range" if !args.is_empty() => {
            let iterable = translate_expr(args, blocks)?;
            let depth = blocks
                .iter()
                .filter(|b| matches!(b, Block::Range { .. }))
                .count();
            let var = if depth == 0 {
                "item".to_string()
            } else {
                format!("item{depth}")
            };
            out.push_str(&tag(&format!("for {var} in {iterable}")));
            blocks.push(Block::Range { var });
        }
        "with" | "define" | "template" | "block" | "break" | "continue" => {
            return Err(format!("unsupported action: {{{{ {body} }}}}"));
        }
        _ => {
            let expr = translate_expr(body, blocks)?;
            out.push_str(&format!(
                "{{{{{} {} {}}}}}",
                if trim_left { "-" } else { "" },
                expr,
                if trim_right { "-" } else { "" }
            ));
        }
    }
    Ok(())
}

/// Strip leading dots from field references and resolve a bare `.`.
fn translate_expr(expr: &str, blocks: &[Block]) -> Result<String, String> {
    let mut out = String::with_capacity(expr.len());
    let mut chars = expr.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && q == '"' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        let at_boundary = out
            .chars()
            .last()
            .map_or(true, |p| p.is_whitespace() || p == '(' || p == ',');

        match c {
            '"' | '`' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '$' if at_boundary && chars.peek() == Some(&'.') => {
                chars.next();
                if !chars.peek().is_some_and(|n| is_ident_start(*n)) {
                    return Err(format!("root reference `$` is not supported in `{expr}`"));
                }
            }
            '.' if at_boundary => {
                if chars.peek().is_some_and(|n| is_ident_start(*n)) {
                    continue;
                }
                let var = current_element(blocks)
                    .ok_or_else(|| format!("bare `.` outside range in `{expr}`"))?;
                out.push_str(var);
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn current_element(blocks: &[Block]) -> Option<&str> {
    blocks.iter().rev().find_map(|b| match b {
        Block::Range { var } => Some(var.as_str()),
        Block::If => None,
    })
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_references_lose_their_dot() {
        assert_eq!(
            translate("- name: {{ .Name }}\n  command: {{ .Command }}\n").unwrap(),
            "- name: {{ Name }}\n  command: {{ Command }}\n"
        );
        assert_eq!(translate("{{ $.Name }}").unwrap(), "{{ Name }}");
    }

    #[test]
    fn native_syntax_passes_through() {
        let src = "{% for e in Environment %}{{ e | upper }}{% endfor %}{{ Name }}";
        assert_eq!(translate(src).unwrap(), src);
    }

    #[test]
    fn dots_inside_strings_and_paths_are_kept() {
        assert_eq!(
            translate(r#"{{ .Name ~ ".yaml" }}"#).unwrap(),
            r#"{{ Name ~ ".yaml" }}"#
        );
        assert_eq!(translate("{{ .Rule.Name }}").unwrap(), "{{ Rule.Name }}");
        assert_eq!(translate("{{ 1.5 }}").unwrap(), "{{ 1.5 }}");
    }

    #[test]
    fn if_else_end() {
        assert_eq!(
            translate("{{ if .Disabled }}off{{ else if .Name }}named{{ else }}on{{ end }}").unwrap(),
            "{% if Disabled %}off{% elif Name %}named{% else %}on{% endif %}"
        );
    }

    #[test]
    fn range_binds_dot_to_element() {
        assert_eq!(
            translate("{{ range .Environment }}- {{ . }}\n{{ end }}").unwrap(),
            "{% for item in Environment %}- {{ item }}\n{% endfor %}"
        );
    }

    #[test]
    fn nested_range_uses_distinct_variables() {
        assert_eq!(
            translate("{{ range .A }}{{ range .B }}{{ . }}{{ end }}{{ . }}{{ end }}").unwrap(),
            "{% for item in A %}{% for item1 in B %}{{ item1 }}{% endfor %}{{ item }}{% endfor %}"
        );
    }

    #[test]
    fn trim_markers_are_preserved() {
        assert_eq!(translate("{{- .Name -}}").unwrap(), "{{- Name -}}");
        assert_eq!(
            translate("{{- if .Disabled }}x{{ end -}}").unwrap(),
            "{%- if Disabled %}x{% endif -%}"
        );
        assert_eq!(translate("{{ -1 }}").unwrap(), "{{ -1 }}");
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(translate("a{{/* note */}}b").unwrap(), "ab");
        assert_eq!(translate("a {{- /* note */ -}} b").unwrap(), "a {{- \"\" -}} b");
    }

    #[test]
    fn go_template_text_keeps_jinja_delimiters_literal() {
        assert_eq!(
            translate("- name: {{ .Name }}  # {% literal\n").unwrap(),
            "- name: {{ Name }}  # {{ \"{%\" }} literal\n"
        );
        assert_eq!(
            translate("{{ .Name }}\n  note: \"{# hash\"\n").unwrap(),
            "{{ Name }}\n  note: \"{{ \"{#\" }} hash\"\n"
        );
        assert_eq!(translate("x{{ .Name }}").unwrap(), "x{{ Name }}");
    }

    #[test]
    fn native_template_keeps_its_tags() {
        let src = "{# note #}{% if Disabled %}{{ Name }}{% endif %}";
        assert_eq!(translate(src).unwrap(), src);
    }

    #[test]
    fn closing_braces_inside_strings_do_not_end_action() {
        assert_eq!(translate(r#"{{ "}}" }}"#).unwrap(), r#"{{ "}}" }}"#);
        assert_eq!(
            translate(r#"{{ .Name ~ "a}}b" }}!"#).unwrap(),
            r#"{{ Name ~ "a}}b" }}!"#
        );
        assert!(translate(r#"{{ "}} "#).unwrap_err().contains("unterminated"));
    }

    #[test]
    fn structural_errors() {
        assert!(translate("{{ .Name ").unwrap_err().contains("unterminated"));
        assert!(translate("{{ end }}").unwrap_err().contains("without open block"));
        assert!(translate("{{ else }}").unwrap_err().contains("without open block"));
        assert!(translate("{{ if .Disabled }}x").unwrap_err().contains("missing"));
        assert!(translate("{{ . }}").unwrap_err().contains("outside range"));
        assert!(translate("{{ with .Name }}{{ end }}").unwrap_err().contains("unsupported"));
    }
}
