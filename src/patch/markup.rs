//! Pattern-based rewriting of keyed nodes in raw markup.
//!
//! Nothing here parses the document: each function locates one tag by pattern and
//! splices new text into the original string, leaving every other byte untouched.
//! Attribute values must be double-quoted and keys match case-sensitively.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One attribute of an opening tag with its optional double-quoted, single-quoted
    /// or bare value. Quoted values are consumed whole, so nothing inside them starts
    /// a match.
    static ref ATTR: Regex =
        Regex::new(r#"\s+([^\s"'=<>/]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?"#).unwrap();
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("cannot build pattern {pattern:?}: {e}");
            None
        }
    }
}

/// `name="key"` as it appears in markup.
pub fn key_attribute(name: &str, key: &str) -> String {
    format!(r#"{name}="{key}""#)
}

/// Number of times `name="key"` occurs in `html`.
pub fn count_key(html: &str, name: &str, key: &str) -> usize {
    html.matches(&key_attribute(name, key)).count()
}

/// Replaces the content of the first element whose opening tag carries
/// `attr="key"`, up to the first closing tag of the same element name.
///
/// An opening tag without such a closing tag is skipped in favour of the next one.
/// Returns `None` when no element matches.
pub fn replace_editable(html: &str, attr: &str, key: &str, value: &str) -> Option<String> {
    let open = compile(&format!(
        r#"<([a-zA-Z0-9:-]+)[^>]*?{}[^>]*>"#,
        regex::escape(&key_attribute(attr, key))
    ))?;

    let mut from = 0;
    while let Some(caps) = open.captures_at(html, from) {
        let tag = caps.get(0)?;
        let close = format!("</{}>", &caps[1]);

        if let Some(offset) = html[tag.end()..].find(&close) {
            let content_end = tag.end() + offset;
            let mut out = String::with_capacity(html.len() - offset + value.len());
            out.push_str(&html[..tag.end()]);
            out.push_str(value);
            out.push_str(&html[content_end..]);
            return Some(out);
        }

        // `<` is a single byte, so this stays on a char boundary
        from = tag.start() + 1;
    }
    None
}

/// Points the first `<img>` carrying `upload_attr="key"` at `value`: sets its `src`
/// and its `full_attr`, replacing existing values or inserting the attributes.
///
/// A missing `src` goes right after `<img`, a missing `full_attr` right after the
/// key attribute. Returns `None` when no image matches.
pub fn replace_photo(
    html: &str,
    upload_attr: &str,
    full_attr: &str,
    key: &str,
    value: &str,
) -> Option<String> {
    let key_attr = key_attribute(upload_attr, key);
    let img = compile(&format!(r#"<(?i:img)\b[^>]*{}[^>]*>"#, regex::escape(&key_attr)))?;
    let found = img.find(html)?;

    let tag = with_src(found.as_str(), value);
    let tag = with_full(&tag, full_attr, &key_attr, value)?;

    let mut out = String::with_capacity(html.len() + tag.len());
    out.push_str(&html[..found.start()]);
    out.push_str(&tag);
    out.push_str(&html[found.end()..]);
    Some(out)
}

/// Attributes of `tag` in order: name and byte span, leading whitespace excluded.
fn attributes(tag: &str) -> impl Iterator<Item = (&str, Range<usize>)> + '_ {
    ATTR.captures_iter(tag).filter_map(|caps| {
        let name = caps.get(1)?;
        Some((name.as_str(), name.start()..caps.get(0)?.end()))
    })
}

fn find_attribute(tag: &str, name: &str) -> Option<Range<usize>> {
    attributes(tag).find(|(n, _)| *n == name).map(|(_, span)| span)
}

fn with_src(tag: &str, value: &str) -> String {
    let replacement = format!(r#"src="{value}""#);
    match find_attribute(tag, "src") {
        Some(span) => splice(tag, span.start, span.end, &replacement),
        // insert right after `<img`, keeping its spelling
        None => splice(tag, 4, 4, &format!(" {replacement}")),
    }
}

fn with_full(tag: &str, full_attr: &str, key_attr: &str, value: &str) -> Option<String> {
    let replacement = format!(r#"{full_attr}="{value}""#);

    if let Some(span) = find_attribute(tag, full_attr) {
        return Some(splice(tag, span.start, span.end, &replacement));
    }
    let (_, key_span) = attributes(tag).find(|(_, span)| &tag[span.clone()] == key_attr)?;
    Some(splice(tag, key_span.end, key_span.end, &format!(" {replacement}")))
}

fn splice(s: &str, start: usize, end: usize, with: &str) -> String {
    let mut out = String::with_capacity(s.len() - (end - start) + with.len());
    out.push_str(&s[..start]);
    out.push_str(with);
    out.push_str(&s[end..]);
    out
}
