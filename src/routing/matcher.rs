//! Ant-style path pattern matching.
//!
//! # Responsibilities
//! - Compile a pattern string into path segments once, up front
//! - Match request paths segment by segment
//!
//! # Pattern Syntax
//! - `?` matches exactly one character
//! - `*` matches zero or more characters within one segment
//! - `**` as a whole segment matches zero or more segments
//! - `{name}` matches like `*` (the variable is not captured)
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Empty segments are ignored (`/a//b` is `/a/b`)
//! - Pattern and path must agree on the leading `/`
//! - No regex, so matching cost is bounded by pattern and path length

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Char(char),
    AnyChar,
    AnyRun,
}

#[derive(Debug, Clone)]
enum Segment {
    /// `**`
    AnySegments,
    /// A segment without wildcards, compared directly.
    Literal(String),
    /// A segment containing `*`, `?` or `{...}`.
    Glob(Vec<Token>),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == "**" {
            return Segment::AnySegments;
        }
        if !raw.contains(['*', '?', '{']) {
            return Segment::Literal(raw.to_string());
        }

        let mut tokens = Vec::new();
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            match c {
                '*' => tokens.push(Token::AnyRun),
                '?' => tokens.push(Token::AnyChar),
                '{' => {
                    // Unterminated braces are taken literally.
                    let rest: String = chars.clone().collect();
                    match rest.find('}') {
                        Some(end) => {
                            tokens.push(Token::AnyRun);
                            let skip = rest[..=end].chars().count();
                            for _ in 0..skip {
                                chars.next();
                            }
                        }
                        None => tokens.push(Token::Char('{')),
                    }
                }
                other => tokens.push(Token::Char(other)),
            }
        }
        tokens.dedup_by(|a, b| *a == Token::AnyRun && *b == Token::AnyRun);
        Segment::Glob(tokens)
    }

    fn is_any_segments(&self) -> bool {
        matches!(self, Segment::AnySegments)
    }

    fn is_single_star(&self) -> bool {
        matches!(self, Segment::Glob(tokens) if tokens.as_slice() == [Token::AnyRun])
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Segment::AnySegments => true,
            Segment::Literal(lit) => lit == text,
            Segment::Glob(tokens) => {
                let chars: Vec<char> = text.chars().collect();
                glob_match(tokens, &chars)
            }
        }
    }
}

/// Wildcard match with single-point backtracking on the last `*`.
fn glob_match(tokens: &[Token], text: &[char]) -> bool {
    let (mut t, mut s) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while s < text.len() {
        match tokens.get(t) {
            Some(Token::Char(c)) if *c == text[s] => {
                t += 1;
                s += 1;
            }
            Some(Token::AnyChar) => {
                t += 1;
                s += 1;
            }
            Some(Token::AnyRun) => {
                backtrack = Some((t, s));
                t += 1;
            }
            _ => match backtrack {
                Some((star_t, star_s)) => {
                    t = star_t + 1;
                    s = star_s + 1;
                    backtrack = Some((star_t, star_s + 1));
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|tk| *tk == Token::AnyRun)
}

/// A compiled Ant-style path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    absolute: bool,
    trailing_slash: bool,
}

impl PathPattern {
    /// Compile a pattern such as `/backend/**` or `/user/*/orders`.
    pub fn new(pattern: impl Into<String>) -> Self {
        let raw = pattern.into();
        let segments = split_segments(&raw).map(Segment::parse).collect();
        Self {
            absolute: raw.starts_with('/'),
            trailing_slash: raw.ends_with('/'),
            segments,
            raw,
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if the whole `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        if path.starts_with('/') != self.absolute {
            return false;
        }

        let dirs: Vec<&str> = split_segments(path).collect();
        let patt = self.segments.as_slice();
        let seg = move |i: isize| &patt[i as usize];
        let dirs = dirs.as_slice();
        let dir = move |i: isize| dirs[i as usize];

        let mut p_start: isize = 0;
        let mut p_end = patt.len() as isize - 1;
        let mut s_start: isize = 0;
        let mut s_end = dirs.len() as isize - 1;

        // Leading segments up to the first `**`.
        while p_start <= p_end && s_start <= s_end {
            if seg(p_start).is_any_segments() {
                break;
            }
            if !seg(p_start).matches(dir(s_start)) {
                return false;
            }
            p_start += 1;
            s_start += 1;
        }

        if s_start > s_end {
            if p_start > p_end {
                return self.trailing_slash == path.ends_with('/');
            }
            if p_start == p_end && seg(p_start).is_single_star() && path.ends_with('/') {
                return true;
            }
            return self.only_any_segments(p_start, p_end);
        } else if p_start > p_end {
            return false;
        }

        // Trailing segments back to the last `**`.
        while p_start <= p_end && s_start <= s_end {
            if seg(p_end).is_any_segments() {
                break;
            }
            if !seg(p_end).matches(dir(s_end)) {
                return false;
            }
            p_end -= 1;
            s_end -= 1;
        }

        if s_start > s_end {
            return self.only_any_segments(p_start, p_end);
        }

        // Both ends sit on `**`: place each run of literal segments between them.
        while p_start != p_end && s_start <= s_end {
            let next_any = ((p_start + 1)..=p_end)
                .find(|&i| seg(i).is_any_segments())
                .unwrap_or(p_end);
            if next_any == p_start + 1 {
                // `**/**`
                p_start += 1;
                continue;
            }

            let run_len = next_any - p_start - 1;
            let avail = s_end - s_start + 1;
            let found = (0..=(avail - run_len)).find(|&i| {
                (0..run_len).all(|j| seg(p_start + j + 1).matches(dir(s_start + i + j)))
            });

            match found {
                Some(offset) => {
                    p_start = next_any;
                    s_start = s_start + offset + run_len;
                }
                None => return false,
            }
        }

        self.only_any_segments(p_start, p_end)
    }

    fn only_any_segments(&self, from: isize, to: isize) -> bool {
        (from..=to).all(|i| self.segments[i as usize].is_any_segments())
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_segments(s: &str) -> impl Iterator<Item = &str> {
    s.split('/').filter(|part| !part.is_empty())
}
