//! Tenant matching for ring groups.
//!
//! A ring group lists the tenants it serves either by exact name or by
//! shell-style glob (`*`, `?`, `[abc]`, `[^abc]`, `\*`). Exact names are
//! checked with a single hash lookup; globs are evaluated in configuration
//! order.
//!
//! Globs use `filepath.Match` syntax, which is what existing hashring files
//! are written in. They are rewritten into [`glob::Pattern`] syntax once, when
//! the set is built.

use corelib::{Error, Result};
use glob::{MatchOptions, Pattern};
use serde::Deserialize;
use std::collections::HashSet;

/// How the tenant names of a ring group are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum TenantMatcher {
    #[default]
    #[serde(rename = "exact", alias = "")]
    Exact,
    #[serde(rename = "glob")]
    Glob,
}

/// `*` and `?` never cross a `/`, like path matching.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

const ERR_TRAILING_ESCAPE: &str = "escape at end of pattern";
const ERR_UNCLOSED_CLASS: &str = "unclosed character class";
const ERR_CLASS_CHAR: &str = "unescaped '-' or ']' in character class";

/// Characters with a positional meaning inside a `glob` class, ascending.
const CLASS_SPECIALS: [char; 3] = ['!', '-', ']'];

type PatternResult<T> = std::result::Result<T, (usize, &'static str)>;

/// Rewrite a `filepath.Match` pattern into `glob` syntax.
///
/// `\x` becomes a literal, `[^..]` becomes `[!..]`, and runs of `*` collapse
/// into one. Error positions are character offsets into `raw`.
fn translate(raw: &str) -> PatternResult<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '\\' => {
                let c = *chars.get(i + 1).ok_or((i, ERR_TRAILING_ESCAPE))?;
                push_literal(&mut out, c);
                i += 1;
            }
            '[' => {
                i = translate_class(&chars, i, &mut out)?;
                continue;
            }
            c => out.push(c),
        }
        i += 1;
    }
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if matches!(c, '*' | '?' | '[' | ']') {
        out.push('[');
        out.push(c);
        out.push(']');
    } else {
        out.push(c);
    }
}

/// Translate the class opened at `chars[start]`, returning the index past
/// its closing `]`.
fn translate_class(chars: &[char], start: usize, out: &mut String) -> PatternResult<usize> {
    let mut i = start + 1;
    let negated = chars.get(i) == Some(&'^');
    if negated {
        i += 1;
    }

    let mut ranges = Vec::new();
    loop {
        match chars.get(i) {
            None => return Err((start, ERR_UNCLOSED_CLASS)),
            Some(']') if !ranges.is_empty() => break,
            _ => {}
        }
        let (lo, next) = class_char(chars, i)?;
        i = next;
        let mut hi = lo;
        if chars.get(i) == Some(&'-') {
            (hi, i) = class_char(chars, i + 1)?;
        }
        ranges.push((lo, hi));
    }

    push_class(out, &ranges, negated);
    Ok(i + 1)
}

fn class_char(chars: &[char], i: usize) -> PatternResult<(char, usize)> {
    match chars.get(i) {
        None => Err((i, ERR_UNCLOSED_CLASS)),
        Some('-') | Some(']') => Err((i, ERR_CLASS_CHAR)),
        Some('\\') => match chars.get(i + 1) {
            Some(&c) => Ok((c, i + 2)),
            None => Err((i, ERR_TRAILING_ESCAPE)),
        },
        Some(&c) => Ok((c, i + 1)),
    }
}

/// Emit a `glob` class for `ranges`.
///
/// `glob` has no escapes inside a class: `]` is literal only first, `!` is
/// a negation when first, and `-` forms a range between two characters. Those
/// three are split out of the ranges and placed where they read literally.
fn push_class(out: &mut String, ranges: &[(char, char)], negated: bool) {
    let mut special = [false; 3];
    let mut plain = Vec::new();
    for &(lo, hi) in ranges {
        if lo > hi {
            // Inverted ranges match nothing.
            plain.push(('b', 'a'));
            continue;
        }
        let mut from = lo;
        for (k, &c) in CLASS_SPECIALS.iter().enumerate() {
            if from <= c && c <= hi {
                special[k] = true;
                if from < c {
                    plain.push((from, char::from(c as u8 - 1)));
                }
                from = char::from(c as u8 + 1);
            }
        }
        if from <= hi {
            plain.push((from, hi));
        }
    }
    let [bang, dash, close] = special;

    if !negated && !close && plain.is_empty() && bang && !dash {
        // `[!]` would read as an unterminated negation.
        out.push('!');
        return;
    }

    out.push('[');
    if negated {
        out.push('!');
    }
    if close {
        out.push(']');
    }
    for &(lo, hi) in &plain {
        out.push(lo);
        if lo != hi {
            out.push('-');
            out.push(hi);
        }
    }
    if bang && dash && !negated && !close && plain.is_empty() {
        out.push_str("-!");
    } else {
        if bang {
            out.push('!');
        }
        if dash {
            out.push('-');
        }
    }
    out.push(']');
}

#[derive(Debug, Clone)]
struct GlobEntry {
    raw: String,
    /// Compile error position and message, kept to be reported at match time.
    compiled: std::result::Result<Pattern, (usize, &'static str)>,
}

impl GlobEntry {
    fn new(raw: String) -> Self {
        let compiled =
            translate(&raw).and_then(|p| Pattern::new(&p).map_err(|e| (e.pos, e.msg)));
        Self { raw, compiled }
    }

    fn matches(&self, tenant: &str) -> Result<bool> {
        match &self.compiled {
            Ok(pattern) => Ok(pattern.matches_with(tenant, MATCH_OPTIONS)),
            Err((pos, msg)) => Err(Error::TenantPattern {
                pattern: self.raw.clone(),
                tenant: tenant.to_owned(),
                pos: *pos,
                msg: (*msg).to_owned(),
            }),
        }
    }
}

/// The tenants a ring group is responsible for.
#[derive(Debug, Clone, Default)]
pub struct TenantSet {
    exact: HashSet<String>,
    globs: Vec<GlobEntry>,
}

impl TenantSet {
    /// Set where every tenant name is interpreted with `matcher`.
    pub fn new<I, S>(tenants: I, matcher: TenantMatcher) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_entries(tenants.into_iter().map(|t| (t.into(), matcher)))
    }

    /// Set built from individually typed entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, TenantMatcher)>) -> Self {
        let mut set = Self::default();
        for (tenant, matcher) in entries {
            match matcher {
                TenantMatcher::Exact => {
                    set.exact.insert(tenant);
                }
                TenantMatcher::Glob => set.globs.push(GlobEntry::new(tenant)),
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.globs.is_empty()
    }

    /// Whether `tenant` belongs to this set.
    ///
    /// A malformed glob pattern is reported as [`Error::TenantPattern`] when
    /// it is reached, not skipped.
    pub fn matches(&self, tenant: &str) -> Result<bool> {
        if self.exact.contains(tenant) {
            return Ok(true);
        }
        for glob in &self.globs {
            if glob.matches(tenant)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
