//! Sources of configured color overrides.

use std::collections::{BTreeMap, HashMap};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Prefix of the configuration keys holding entity colors.
pub const COLOR_PREFIX: &str = "color.";

/// Key under which the color of `name` is configured.
pub fn color_key(name: &str) -> String { format!("{COLOR_PREFIX}{name}") }

/// A read-only key/value configuration, typically the map properties.
pub trait ColorSource {
    /// Return the value configured for `key`, if any.
    fn lookup(&self, key: &str) -> Option<String>;
}

impl<S: ColorSource + ?Sized> ColorSource for &S {
    fn lookup(&self, key: &str) -> Option<String> { (**self).lookup(key) }
}

impl ColorSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> { self.get(key).cloned() }
}

impl ColorSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> { self.get(key).cloned() }
}

/// Map properties, in the format of `map.properties`.
///
/// Follows the `.properties` line syntax: `#` and `!` start comment
/// lines; the key ends at the first unescaped `=`, `:` or whitespace;
/// a line ending with an odd number of `\` continues on the next
/// one; `\t`, `\n`, `\r`, `\f`, `\uXXXX` and `\<char>` are escapes.
/// Trailing whitespace of values is dropped.  The last occurrence of a
/// key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

fn ends_with_escape(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Split a logical line into its raw key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1 ..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
                return (&line[..i], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(s: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let c = Some(&hex)
                    .filter(|h| h.len() == 4 && h.chars().all(|c| c.is_ascii_hexdigit()))
                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                    .and_then(char::from_u32)
                    .ok_or(Error::Properties { line,
                                               reason: "malformed \\uxxxx escape" })?;
                out.push(c);
            }
            Some(c) => out.push(c),
            None => {}
        }
    }
    Ok(out)
}

impl Properties {
    pub fn new() -> Self { Self::default() }

    /// Parse properties text.  Fails only on malformed `\u` escapes.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut lines = text.lines().enumerate();
        while let Some((i, line)) = lines.next() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with(['#', '!']) {
                continue;
            }
            let mut logical = line.to_owned();
            while ends_with_escape(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }
            let (key, value) = split_entry(&logical);
            entries.insert(unescape(key, i + 1)?, unescape(value.trim_end(), i + 1)?);
        }
        Ok(Self { entries })
    }

    /// Read properties from a flat JSON object of strings, e.g.
    /// `{"color.Germany": "555555"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>)
               -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Set the color override of entity `name`.
    pub fn set_color(&mut self, name: &str, hex: impl Into<String>) -> Option<String> {
        self.set(color_key(name), hex)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl ColorSource for Properties {
    fn lookup(&self, key: &str) -> Option<String> { self.entries.get(key).cloned() }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_map_properties() {
        let props = Properties::parse(
            "# colors\n\
             color.Germany=555555\n\
             ! legacy comment\n\
             \n\
             color.Japan : DBBE5B \n\
             units.scale=0.875\n").unwrap();
        assert_eq!(props.len(), 3);
        assert_eq!(props.lookup("color.Germany").as_deref(), Some("555555"));
        assert_eq!(props.lookup("color.Japan").as_deref(), Some("DBBE5B"));
        assert_eq!(props.lookup(&color_key("Japan")).as_deref(), Some("DBBE5B"));
        assert_eq!(props.lookup("color.Russians"), None);
    }

    #[test]
    fn parse_whitespace_separator() {
        let props = Properties::parse(
            "color.Germany 555555\n\
             color.Japan\t=  DBBE5B\n\
             color.Neutral\n").unwrap();
        assert_eq!(props.lookup("color.Germany").as_deref(), Some("555555"));
        assert_eq!(props.lookup("color.Japan").as_deref(), Some("DBBE5B"));
        assert_eq!(props.lookup("color.Neutral").as_deref(), Some(""));
    }

    #[test]
    fn parse_continuations_and_escapes() {
        let props = Properties::parse(
            "color.Russians=AA\\\n\
             \x20   33\\\n\
             \x20   44\n\
             color.Free\\ French=112233\n\
             color.a\\=b=\\u0041\\tB\n\
             path=C:\\\\maps\n").unwrap();
        assert_eq!(props.lookup("color.Russians").as_deref(), Some("AA3344"));
        assert_eq!(props.lookup("color.Free French").as_deref(), Some("112233"));
        assert_eq!(props.lookup("color.a=b").as_deref(), Some("A\tB"));
        assert_eq!(props.lookup("path").as_deref(), Some("C:\\maps"));
    }

    #[test]
    fn parse_reports_bad_escape() {
        match Properties::parse("color.Germany=555555\ncolor.Japan=\\u00G1\n") {
            Err(Error::Properties { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(Properties::parse("x=\\u12"),
                         Err(Error::Properties { line: 1, .. })));
    }

    #[test]
    fn from_json_object() {
        let props = Properties::from_json(
            r#"{"color.Impassable": "112233", "color.Germany": "555555"}"#)
            .unwrap();
        assert_eq!(props.lookup("color.Impassable").as_deref(), Some("112233"));
        assert!(matches!(Properties::from_json("[1, 2]"), Err(Error::Json(_))));
    }

    #[test]
    fn set_color_uses_prefix() {
        let mut props = Properties::new();
        assert!(props.is_empty());
        assert_eq!(props.set_color("Italians", "4B4B4B"), None);
        assert_eq!(props.set_color("Italians", "4C4C4C").as_deref(), Some("4B4B4B"));
        assert_eq!(props.lookup("color.Italians").as_deref(), Some("4C4C4C"));
    }
}
