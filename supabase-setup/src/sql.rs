//! SQL script splitting
//!
//! Turns a script into the ordered list of statements sent to `exec_sql`.

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// How a script is cut into statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Split on every `;`, wherever it appears.
    Naive,
    /// Split on `;` outside strings, quoted identifiers, dollar-quoted bodies
    /// and comments.
    #[default]
    Aware,
    /// Send the whole script as one statement.
    Batch,
}

impl SplitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::Aware => "aware",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "naive" => Ok(Self::Naive),
            "aware" => Ok(Self::Aware),
            "batch" => Ok(Self::Batch),
            other => Err(anyhow!(
                "Unknown split mode: {}. Expected one of: aware, naive, batch",
                other
            )),
        }
    }
}

/// A single trimmed statement of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based position among the statements that will be executed
    pub ordinal: usize,
    /// 1-based line of the statement's first character in the script
    pub line: usize,
    pub sql: String,
}

/// Split a script into non-empty statements, in file order.
pub fn split_statements(sql: &str, mode: SplitMode) -> Vec<Statement> {
    let segments = match mode {
        SplitMode::Naive => naive_segments(sql),
        SplitMode::Aware => aware_segments(sql),
        SplitMode::Batch => vec![Segment {
            start: 0,
            end: sql.len(),
            has_code: true,
        }],
    };

    let mut statements = Vec::new();
    for segment in segments {
        if !segment.has_code {
            continue;
        }
        let raw = &sql[segment.start..segment.end];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let leading = raw.len() - raw.trim_start().len();
        statements.push(Statement {
            ordinal: statements.len() + 1,
            line: line_at(sql, segment.start + leading),
            sql: trimmed.to_string(),
        });
    }
    statements
}

struct Segment {
    start: usize,
    end: usize,
    has_code: bool,
}

fn line_at(sql: &str, offset: usize) -> usize {
    sql.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

fn naive_segments(sql: &str) -> Vec<Segment> {
    let mut offset = 0;
    sql.split(';')
        .map(|part| {
            let segment = Segment {
                start: offset,
                end: offset + part.len(),
                has_code: true,
            };
            offset += part.len() + 1;
            segment
        })
        .collect()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Length of a dollar-quote opener (`$$` or `$tag$`) starting at `i`.
fn dollar_tag(bytes: &[u8], i: usize) -> Option<usize> {
    if i > 0 && is_ident_byte(bytes[i - 1]) {
        return None;
    }

    let mut j = i + 1;
    match bytes.get(j) {
        Some(b'$') => return Some(2),
        // $1 is a positional parameter
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' || *b >= 0x80 => {}
        _ => return None,
    }

    while let Some(&b) = bytes.get(j) {
        if b == b'$' {
            return Some(j + 1 - i);
        }
        if !(b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80) {
            return None;
        }
        j += 1;
    }
    None
}

/// Index just past the quoted run opened at `i`.
fn skip_quoted(bytes: &[u8], i: usize, quote: u8, backslash_escapes: bool) -> usize {
    let mut j = i + 1;
    while j < bytes.len() {
        let b = bytes[j];
        if backslash_escapes && b == b'\\' {
            j += 2;
            continue;
        }
        if b == quote {
            if bytes.get(j + 1) == Some(&quote) {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

fn aware_segments(sql: &str) -> Vec<Segment> {
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut has_code = false;
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        match b {
            b'-' if next == Some(b'-') => {
                i = bytes[i..]
                    .iter()
                    .position(|&c| c == b'\n')
                    .map_or(len, |p| i + p + 1);
            }
            b'/' if next == Some(b'*') => {
                let mut depth = 1;
                i += 2;
                while i < len && depth > 0 {
                    match (bytes[i], bytes.get(i + 1).copied()) {
                        (b'/', Some(b'*')) => {
                            depth += 1;
                            i += 2;
                        }
                        (b'*', Some(b'/')) => {
                            depth -= 1;
                            i += 2;
                        }
                        _ => i += 1,
                    }
                }
            }
            b'\'' => {
                // E'...' strings honor backslash escapes
                let escaped = i > 0
                    && matches!(bytes[i - 1], b'E' | b'e')
                    && (i < 2 || !is_ident_byte(bytes[i - 2]));
                has_code = true;
                i = skip_quoted(bytes, i, b'\'', escaped);
            }
            b'"' => {
                has_code = true;
                i = skip_quoted(bytes, i, b'"', false);
            }
            b'$' => {
                has_code = true;
                match dollar_tag(bytes, i) {
                    Some(tag_len) => {
                        let tag = &bytes[i..i + tag_len];
                        let body = i + tag_len;
                        i = bytes[body..]
                            .windows(tag_len)
                            .position(|w| w == tag)
                            .map_or(len, |p| body + p + tag_len);
                    }
                    None => i += 1,
                }
            }
            b';' => {
                segments.push(Segment {
                    start,
                    end: i,
                    has_code,
                });
                start = i + 1;
                has_code = false;
                i += 1;
            }
            c if c.is_ascii_whitespace() => i += 1,
            _ => {
                has_code = true;
                i += 1;
            }
        }
    }

    segments.push(Segment {
        start,
        end: len,
        has_code,
    });
    segments
}
