#[inline]
pub fn strip_surrounding_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 {
        let (first, last) = (b[0], b[b.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Splits one table record into unquoted fields.
///
/// A record holding a comma outside quotes is comma-separated; anything else
/// is split on runs of whitespace. Quotes group characters in both modes.
pub fn split_fields(line: &str) -> Vec<String> {
    let comma = has_unquoted_comma(line);
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes: Option<char> = None;
    let mut pending = false;

    for ch in line.chars() {
        if let Some(q) = in_quotes {
            cur.push(ch);
            if ch == q {
                in_quotes = None;
            }
            continue;
        }
        let separator = if comma { ch == ',' } else { ch.is_whitespace() };
        if separator {
            if comma || pending {
                out.push(strip_surrounding_quotes(cur.trim()).to_string());
            }
            cur.clear();
            pending = false;
            continue;
        }
        if ch == '"' || ch == '\'' {
            in_quotes = Some(ch);
        }
        cur.push(ch);
        pending = true;
    }
    if comma || pending {
        out.push(strip_surrounding_quotes(cur.trim()).to_string());
    }
    out
}

fn has_unquoted_comma(line: &str) -> bool {
    let mut in_quotes: Option<char> = None;
    for ch in line.chars() {
        match in_quotes {
            Some(q) if ch == q => in_quotes = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => in_quotes = Some(ch),
            None if ch == ',' => return true,
            None => {}
        }
    }
    false
}

/// Parses a `# key = value` or `# key: value` comment into its parts.
pub fn parse_metadata(line: &str) -> Option<(&str, &str)> {
    let body = line.trim_start().strip_prefix('#')?.trim();
    let at = body.find(['=', ':'])?;
    let key = body[..at].trim();
    let value = strip_surrounding_quotes(body[at + 1..].trim());
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}
