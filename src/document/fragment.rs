//! Content fragments for header/footer slots
//!
//! A fragment is a small XML snippet made of block elements (`<p>`,
//! `<h1>`..`<h6>`, `<ul>`/`<ol>` with `<li>`). Formatting elements inside a
//! block are flattened to their text, `<br/>` becomes a hard break. Text with
//! no markup at all is taken as a single paragraph.
//!
//! Common HTML named entities (`&nbsp;`, `&mdash;`, ...) are accepted on top
//! of the XML ones. A `<` or `&` that cannot start markup is kept as text.

use crate::document::{Block, BlockKind, ListMarker};
use crate::error::{PaginationError, Result};

const INLINE_TAGS: &[&str] = &["b", "i", "u", "s", "em", "strong", "span", "a", "code", "sub", "sup"];

/// HTML named entities beyond the five XML predefines
const HTML_ENTITIES: &[(&str, u32)] = &[
    ("nbsp", 160),
    ("copy", 169),
    ("reg", 174),
    ("sect", 167),
    ("deg", 176),
    ("para", 182),
    ("middot", 183),
    ("laquo", 171),
    ("raquo", 187),
    ("times", 215),
    ("ensp", 8194),
    ("emsp", 8195),
    ("thinsp", 8201),
    ("ndash", 8211),
    ("mdash", 8212),
    ("lsquo", 8216),
    ("rsquo", 8217),
    ("ldquo", 8220),
    ("rdquo", 8221),
    ("bull", 8226),
    ("hellip", 8230),
    ("euro", 8364),
    ("trade", 8482),
];

const XML_ENTITIES: &[(&str, char)] = &[("amp", '&'), ("lt", '<'), ("gt", '>'), ("quot", '"'), ("apos", '\'')];

/// Parse a fragment into slot content.
///
/// Blank input yields a single empty paragraph, never an empty list.
pub fn parse_fragment(input: &str) -> Result<Vec<Block>> {
    if input.trim().is_empty() {
        return Ok(vec![Block::empty()]);
    }
    if !has_markup(input) {
        return Ok(vec![Block::paragraph(decode_entities(input))]);
    }

    let wrapped = format!("<span>{}</span>", prepare_markup(input));
    let xml = roxmltree::Document::parse(&wrapped)?;

    let mut blocks = Vec::new();
    let mut loose = String::new();
    for child in xml.root_element().children() {
        if child.is_text() {
            loose.push_str(child.text().unwrap_or_default());
            continue;
        }
        if !child.is_element() {
            continue;
        }

        let tag = child.tag_name().name();
        if tag == "br" || INLINE_TAGS.contains(&tag) {
            collect_inline(child, &mut loose)?;
            continue;
        }

        flush_loose(&mut loose, &mut blocks);
        match tag {
            "p" => blocks.push(Block::paragraph(inline_text(child)?)),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                blocks.push(Block::heading(level, inline_text(child)?));
            }
            "ul" | "ol" => parse_list(child, 0, &mut blocks)?,
            other => {
                return Err(PaginationError::UnsupportedElement {
                    tag: other.to_string(),
                })
            }
        }
    }
    flush_loose(&mut loose, &mut blocks);

    if blocks.is_empty() {
        blocks.push(Block::empty());
    }
    Ok(blocks)
}

/// Whether `<` starts a tag, closing tag, comment or CDATA anywhere
fn has_markup(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes
        .iter()
        .enumerate()
        .any(|(i, b)| *b == b'<' && bytes.get(i + 1).is_some_and(|n| starts_markup(*n)))
}

fn starts_markup(next: u8) -> bool {
    next.is_ascii_alphabetic() || matches!(next, b'/' | b'!' | b'?')
}

/// Length of the entity name or character reference after `&`, when the
/// reference is terminated by `;`
fn reference_len(rest: &str) -> Option<usize> {
    let end = rest.find(';')?;
    let name = &rest[..end];
    let valid = match name.strip_prefix('#') {
        Some(num) => match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        },
        None => !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric()),
    };
    valid.then_some(end)
}

fn resolve_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    XML_ENTITIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .or_else(|| {
            HTML_ENTITIES
                .iter()
                .find(|(n, _)| *n == name)
                .and_then(|(_, code)| char::from_u32(*code))
        })
}

/// Rewrite HTML entities as character references and escape stray `<`/`&`
fn prepare_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find(|c: char| c == '<' || c == '&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if rest[pos..].starts_with('<') {
            if tail.as_bytes().first().is_some_and(|n| starts_markup(*n)) {
                out.push('<');
            } else {
                out.push_str("&lt;");
            }
            rest = tail;
            continue;
        }
        match reference_len(tail) {
            Some(len) => {
                let name = &tail[..len];
                let known = name.starts_with('#') || XML_ENTITIES.iter().any(|(n, _)| *n == name);
                match HTML_ENTITIES.iter().find(|(n, _)| *n == name) {
                    Some((_, code)) => out.push_str(&format!("&#{};", code)),
                    None if known => out.push_str(&format!("&{};", name)),
                    None => out.push_str(&format!("&amp;{};", name)),
                }
                rest = &tail[len + 1..];
            }
            None => {
                out.push_str("&amp;");
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolve entity and character references in text without markup;
/// unknown references stay as written
fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        match reference_len(tail).and_then(|len| resolve_reference(&tail[..len]).map(|c| (len, c))) {
            Some((len, c)) => {
                out.push(c);
                rest = &tail[len + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn flush_loose(loose: &mut String, blocks: &mut Vec<Block>) {
    if !loose.trim().is_empty() {
        blocks.push(Block::paragraph(loose.trim()));
    }
    loose.clear();
}

fn parse_list(list: roxmltree::Node, indent_level: u8, blocks: &mut Vec<Block>) -> Result<()> {
    let ordered = list.tag_name().name() == "ol";
    let mut ordinal = list
        .attribute("start")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(1);

    for item in list.children().filter(|n| n.is_element()) {
        let tag = item.tag_name().name();
        if tag != "li" {
            return Err(PaginationError::UnsupportedElement {
                tag: tag.to_string(),
            });
        }

        let marker = if ordered {
            ListMarker::Numbered { ordinal }
        } else {
            ListMarker::Bullet
        };
        ordinal += 1;

        let mut text = String::new();
        let mut nested = Vec::new();
        for child in item.children() {
            if child.is_element() && matches!(child.tag_name().name(), "ul" | "ol") {
                nested.push(child);
            } else {
                collect_inline(child, &mut text)?;
            }
        }
        blocks.push(Block::list_item(indent_level, marker, text.trim()));
        for sub in nested {
            parse_list(sub, indent_level.saturating_add(1), blocks)?;
        }
    }
    Ok(())
}

fn inline_text(node: roxmltree::Node) -> Result<String> {
    let mut text = String::new();
    for child in node.children() {
        collect_inline(child, &mut text)?;
    }
    Ok(text)
}

fn collect_inline(node: roxmltree::Node, out: &mut String) -> Result<()> {
    if node.is_text() {
        out.push_str(node.text().unwrap_or_default());
        return Ok(());
    }
    if !node.is_element() {
        return Ok(());
    }

    let tag = node.tag_name().name();
    if tag == "br" {
        out.push('\n');
        return Ok(());
    }
    if !INLINE_TAGS.contains(&tag) {
        return Err(PaginationError::UnsupportedElement {
            tag: tag.to_string(),
        });
    }
    for child in node.children() {
        collect_inline(child, out)?;
    }
    Ok(())
}

/// Write blocks back out as a fragment that [`parse_fragment`] accepts
pub fn write_fragment(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        let body = escape(&block.text).replace('\n', "<br/>");
        match &block.kind {
            BlockKind::ListItem { marker, .. } => {
                let open = match marker {
                    ListMarker::Bullet => "<ul>".to_string(),
                    ListMarker::Numbered { ordinal } => format!("<ol start=\"{}\">", ordinal),
                };
                let close = match marker {
                    ListMarker::Bullet => "</ul>",
                    ListMarker::Numbered { .. } => "</ol>",
                };
                out.push_str(&format!("{}<li>{}</li>{}", open, body, close));
            }
            kind => {
                let tag = kind.tag();
                out.push_str(&format!("<{tag}>{body}</{tag}>"));
            }
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_single_empty_paragraph() {
        assert_eq!(parse_fragment("").unwrap(), vec![Block::empty()]);
        assert_eq!(parse_fragment("   ").unwrap(), vec![Block::empty()]);
        assert_eq!(parse_fragment("<p></p>").unwrap(), vec![Block::empty()]);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_fragment("Page {page}").unwrap(), vec![Block::paragraph("Page {page}")]);
    }

    #[test]
    fn test_blocks_and_inline() {
        let blocks = parse_fragment("<h2>Title</h2><p>a <b>bold</b><br/>line</p>").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], Block::heading(2, "Title"));
        assert_eq!(blocks[1].text, "a bold\nline");
    }

    #[test]
    fn test_loose_text_becomes_paragraph() {
        let blocks = parse_fragment("intro <i>x</i><p>body</p>").unwrap();
        assert_eq!(blocks[0].text, "intro x");
        assert_eq!(blocks[1].text, "body");
    }

    #[test]
    fn test_lists() {
        let blocks = parse_fragment("<ol start=\"3\"><li>a</li><li>b<ul><li>c</li></ul></li></ol>").unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[1].kind,
            BlockKind::ListItem {
                indent_level: 0,
                marker: ListMarker::Numbered { ordinal: 4 }
            }
        );
        assert_eq!(
            blocks[2].kind,
            BlockKind::ListItem {
                indent_level: 1,
                marker: ListMarker::Bullet
            }
        );
    }

    #[test]
    fn test_malformed_is_rejected() {
        let err = parse_fragment("<p>unclosed").unwrap_err();
        assert!(matches!(err, PaginationError::MalformedFragment(_)));
        assert!(err.is_schema_violation());
    }

    #[test]
    fn test_unsupported_element_is_rejected() {
        let err = parse_fragment("<table><tr/></table>").unwrap_err();
        assert!(matches!(err, PaginationError::UnsupportedElement { ref tag } if tag == "table"));
    }

    #[test]
    fn test_write_then_parse() {
        let blocks = vec![
            Block::paragraph("a < b & c\nd"),
            Block::heading(1, "H"),
        ];
        assert_eq!(parse_fragment(&write_fragment(&blocks)).unwrap(), blocks);
    }

    #[test]
    fn test_comparison_text_is_plain() {
        assert_eq!(parse_fragment("a < b").unwrap(), vec![Block::paragraph("a < b")]);
        assert_eq!(parse_fragment("1 <2 & 3> 0").unwrap(), vec![Block::paragraph("1 <2 & 3> 0")]);
    }

    #[test]
    fn test_html_entities() {
        assert_eq!(
            parse_fragment("Page&nbsp;{page}").unwrap(),
            vec![Block::paragraph("Page\u{a0}{page}")]
        );
        assert_eq!(
            parse_fragment("<p>A&nbsp;&mdash;&#x42;&amp;</p>").unwrap(),
            vec![Block::paragraph("A\u{a0}\u{2014}B&")]
        );
        assert_eq!(parse_fragment("&bogus; &amp;").unwrap(), vec![Block::paragraph("&bogus; &")]);
    }

    #[test]
    fn test_stray_characters_inside_markup() {
        let blocks = parse_fragment("<p>a < b & c</p>").unwrap();
        assert_eq!(blocks, vec![Block::paragraph("a < b & c")]);
        let blocks = parse_fragment("<p>&bogus;</p>").unwrap();
        assert_eq!(blocks, vec![Block::paragraph("&bogus;")]);
    }
}
