//! Variable expansion in template strings
//!
//! Recognised forms:
//!
//! - `$NAME` and `${NAME}`, unset is an error
//! - `${NAME:-word}` uses `word` when unset or empty, `${NAME-word}` only when unset
//! - `${NAME:=word}` like `:-` but also assigns `word` to `NAME`
//! - `${NAME:?message}` fails with `message` when unset or empty
//! - `%NAME%` when Windows-style variables are enabled
//!
//! `\$` and `\%` produce the literal character. A backslash directly after
//! a bare `$NAME` ends the name and is dropped, so `$WORD\_SUN` reads `WORD`.
//! Words in the operator forms are expanded themselves.

use crate::error::ExpandError;
use crate::source::VarSource;
use serde::{Deserialize, Serialize};

/// Which syntax families expansion honours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandOptions {
    /// Expand `%NAME%`
    pub windows_vars: bool,
    /// `${NAME:=word}` assigns. When off it behaves like `:-`.
    pub unix_assignment: bool,
    /// `${NAME:?message}` reports `message`. When off the standard unset error is used.
    pub unix_custom_errors: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            windows_vars: true,
            unix_assignment: true,
            unix_custom_errors: true,
        }
    }
}

/// Expand `template` against `source` with the default options
pub fn expand<S>(template: &str, source: &mut S) -> Result<String, ExpandError>
where
    S: VarSource + ?Sized,
{
    expand_with(template, source, &ExpandOptions::default())
}

/// Expand `template` against `source`.
///
/// `${NAME:=word}` writes through to `source` when assignment is enabled.
pub fn expand_with<S>(
    template: &str,
    source: &mut S,
    options: &ExpandOptions,
) -> Result<String, ExpandError>
where
    S: VarSource + ?Sized,
{
    if !template.contains(['$', '%', '\\']) {
        return Ok(template.to_string());
    }

    Expander {
        chars: template.char_indices().collect(),
        len: template.len(),
        source,
        options,
    }
    .run()
}

#[derive(Clone, Copy)]
enum Operator {
    Default,
    Assign,
    Required,
}

struct Expander<'a, S: ?Sized> {
    chars: Vec<(usize, char)>,
    len: usize,
    source: &'a mut S,
    options: &'a ExpandOptions,
}

impl<S> Expander<'_, S>
where
    S: VarSource + ?Sized,
{
    fn run(&mut self) -> Result<String, ExpandError> {
        let mut out = String::with_capacity(self.len);
        let mut i = 0;

        while i < self.chars.len() {
            let c = self.chars[i].1;
            match c {
                '\\' => match self.char_at(i + 1) {
                    Some('$') => {
                        out.push('$');
                        i += 2;
                    }
                    Some('%') if self.options.windows_vars => {
                        out.push('%');
                        i += 2;
                    }
                    _ => {
                        out.push('\\');
                        i += 1;
                    }
                },
                '$' => match self.char_at(i + 1) {
                    Some('{') => i = self.braced(i, &mut out)?,
                    Some(next) if is_name_start(next) => i = self.bare(i, &mut out)?,
                    _ => {
                        out.push('$');
                        i += 1;
                    }
                },
                '%' if self.options.windows_vars => i = self.percent(i, &mut out)?,
                _ => {
                    out.push(c);
                    i += 1;
                }
            }
        }

        Ok(out)
    }

    /// `$NAME`, starting at the `$`
    fn bare(&mut self, start: usize, out: &mut String) -> Result<usize, ExpandError> {
        let end = self.scan(start + 1, is_name_char);
        let name = self.text(start + 1, end);
        out.push_str(&self.lookup(&name)?);

        match (self.char_at(end), self.char_at(end + 1)) {
            (Some('\\'), Some(next)) if is_name_char(next) => Ok(end + 1),
            _ => Ok(end),
        }
    }

    /// `%NAME%`, starting at the first `%`
    fn percent(&mut self, start: usize, out: &mut String) -> Result<usize, ExpandError> {
        let end = self.scan(start + 1, is_windows_name_char);
        let has_name = end > start + 1;

        match self.char_at(end) {
            Some('%') if has_name => {
                let name = self.text(start + 1, end);
                out.push_str(&self.lookup(&name)?);
                Ok(end + 1)
            }
            Some('%') => {
                out.push('%');
                Ok(end + 1)
            }
            None if has_name => Err(ExpandError::unclosed("%", self.offset(start))),
            _ => {
                out.push('%');
                Ok(start + 1)
            }
        }
    }

    /// `${...}`, starting at the `$`
    fn braced(&mut self, start: usize, out: &mut String) -> Result<usize, ExpandError> {
        let body_start = start + 2;
        let close = self
            .matching_brace(body_start)
            .ok_or_else(|| ExpandError::unclosed("${", self.offset(start)))?;

        let name_end = self.scan(body_start, is_name_char);
        if name_end == body_start || !self.char_at(body_start).is_some_and(is_name_start) {
            return Err(ExpandError::InvalidName {
                position: self.offset(body_start),
            });
        }
        let name = self.text(body_start, name_end);

        if name_end == close {
            out.push_str(&self.lookup(&name)?);
            return Ok(close + 1);
        }

        let colon = self.char_at(name_end) == Some(':');
        let op_at = if colon { name_end + 1 } else { name_end };
        let operator = match self.char_at(op_at) {
            Some('-') => Operator::Default,
            Some('=') => Operator::Assign,
            Some('?') => Operator::Required,
            _ => {
                return Err(ExpandError::InvalidName {
                    position: self.offset(name_end),
                })
            }
        };
        let word = self.text(op_at + 1, close);

        let value = self.source.get(&name);
        let missing = match &value {
            None => true,
            Some(v) => colon && v.is_empty(),
        };

        let expanded = match (operator, value) {
            (_, Some(v)) if !missing => v,
            (Operator::Default, _) => self.nested(&word)?,
            (Operator::Assign, _) => {
                let word = self.nested(&word)?;
                if self.options.unix_assignment {
                    tracing::trace!(name = %name, "assigning default during expansion");
                    self.source.set(&name, &word)?;
                }
                word
            }
            (Operator::Required, _) => {
                return Err(if self.options.unix_custom_errors && !word.is_empty() {
                    ExpandError::required(name, word)
                } else {
                    ExpandError::unset(name)
                });
            }
        };

        out.push_str(&expanded);
        Ok(close + 1)
    }

    fn nested(&mut self, word: &str) -> Result<String, ExpandError> {
        expand_with(word, &mut *self.source, self.options)
    }

    fn lookup(&self, name: &str) -> Result<String, ExpandError> {
        match self.source.get(name) {
            Some(value) => {
                tracing::trace!(name, "expanded variable");
                Ok(value)
            }
            None => Err(ExpandError::unset(name)),
        }
    }

    /// Index of the `}` closing a body that starts at `from`, honouring nesting
    fn matching_brace(&self, from: usize) -> Option<usize> {
        let mut depth = 1usize;
        for (i, &(_, c)) in self.chars.iter().enumerate().skip(from) {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn scan(&self, from: usize, accept: fn(char) -> bool) -> usize {
        let mut i = from;
        while self.char_at(i).is_some_and(accept) {
            i += 1;
        }
        i
    }

    fn char_at(&self, i: usize) -> Option<char> {
        self.chars.get(i).map(|&(_, c)| c)
    }

    fn text(&self, from: usize, to: usize) -> String {
        self.chars[from..to].iter().map(|&(_, c)| c).collect()
    }

    /// Byte offset of the char at index `i`
    fn offset(&self, i: usize) -> usize {
        self.chars.get(i).map_or(self.len, |&(offset, _)| offset)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_windows_name_char(c: char) -> bool {
    is_name_char(c) || c == '(' || c == ')'
}
