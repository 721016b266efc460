//! Page range parsing and normalization.
//!
//! Grammar: comma-separated tokens, each a positive page number (`7`) or an
//! inclusive span (`2-5`). Whitespace around tokens is ignored and empty
//! tokens (`1,,3`) are skipped.

use std::fmt;

use crate::error::{PdfCombineError, Result};

/// Non-fatal condition corrected while normalizing a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeWarning {
    /// No range was given; the full document is selected.
    EmptyInput,
    /// At least one page number was moved into `1..=max_page`.
    RangeClamped,
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("No page range was entered; all pages are selected"),
            Self::RangeClamped => f.write_str(
                "Some page numbers were outside the document and have been moved to the \
                 nearest page: 0 becomes the first page and numbers past the end become \
                 the last page",
            ),
        }
    }
}

/// Result of [`parse_and_normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRange {
    /// Canonical form of the input, suitable for storing and showing.
    pub normalized: String,
    /// Pages in token order. Not sorted and not deduplicated.
    pub pages: Vec<usize>,
    /// Corrections that were applied.
    pub warnings: Vec<RangeWarning>,
}

impl ParsedRange {
    /// Whether every token was dropped, leaving no pages.
    ///
    /// The normalized string is then empty, which a stored selection reads
    /// as the whole document, so such a result must not be stored.
    pub fn selects_nothing(&self) -> bool {
        self.pages.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Single(usize),
    Span(usize, usize),
}

impl Token {
    fn expand_into(self, pages: &mut Vec<usize>) {
        match self {
            Token::Single(page) => pages.push(page),
            Token::Span(start, end) if start <= end => pages.extend(start..=end),
            Token::Span(start, end) => pages.extend((end..=start).rev()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Single(page) => write!(f, "{page}"),
            Token::Span(start, end) => write!(f, "{start}-{end}"),
        }
    }
}

/// Parse, validate and normalize a page range against a document with
/// `max_page` pages.
///
/// Every page number is clamped into `1..=max_page`. A span whose clamped
/// endpoints coincide is dropped, unless the shared value is the first or
/// last page, in which case it becomes that single page. A descending span
/// (`5-2`) is kept and expands in descending order.
///
/// # Arguments
///
/// * `input` - Range string as typed by the user
/// * `max_page` - Page count of the document
///
/// # Errors
///
/// Returns [`PdfCombineError::InvalidInput`] when a token has more than one
/// `-`, a `-` touches a comma or either end of the string, a token is not a
/// number, or the document has no pages.
pub fn parse_and_normalize(input: &str, max_page: usize) -> Result<ParsedRange> {
    if max_page == 0 {
        return Err(PdfCombineError::invalid_input(
            input,
            "the document has no pages",
        ));
    }

    let raw_tokens: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if raw_tokens.is_empty() {
        let full = if max_page == 1 {
            Token::Single(1)
        } else {
            Token::Span(1, max_page)
        };
        let mut pages = Vec::with_capacity(max_page);
        full.expand_into(&mut pages);
        return Ok(ParsedRange {
            normalized: full.to_string(),
            pages,
            warnings: vec![RangeWarning::EmptyInput],
        });
    }

    let mut clamped = false;
    let mut kept = Vec::with_capacity(raw_tokens.len());

    for raw in raw_tokens {
        let token = parse_token(input, raw)?;
        let token = match token {
            Token::Single(page) => Some(Token::Single(clamp(page, max_page, &mut clamped))),
            Token::Span(start, end) => {
                let start = clamp(start, max_page, &mut clamped);
                let end = clamp(end, max_page, &mut clamped);
                if start != end {
                    Some(Token::Span(start, end))
                } else if start == 1 || start == max_page {
                    Some(Token::Single(start))
                } else {
                    None
                }
            }
        };
        if let Some(token) = token {
            kept.push(token);
        }
    }

    let mut pages = Vec::new();
    for token in &kept {
        token.expand_into(&mut pages);
    }

    let normalized = kept
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(",");

    let warnings = if clamped {
        vec![RangeWarning::RangeClamped]
    } else {
        Vec::new()
    };

    Ok(ParsedRange {
        normalized,
        pages,
        warnings,
    })
}

fn parse_token(input: &str, raw: &str) -> Result<Token> {
    if raw.starts_with('-') || raw.ends_with('-') {
        let reason = if raw.len() == 1 {
            "a '-' has no page number on one side".to_string()
        } else {
            format!("'{raw}' has a '-' without a page number on one side")
        };
        return Err(PdfCombineError::invalid_input(input, reason));
    }

    let mut parts = raw.split('-');
    let first = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (None, _) => Ok(Token::Single(parse_page(input, first)?)),
        (Some(second), None) => Ok(Token::Span(
            parse_page(input, first)?,
            parse_page(input, second)?,
        )),
        (Some(_), Some(_)) => Err(PdfCombineError::invalid_input(
            input,
            format!("'{raw}' contains more than one '-'"),
        )),
    }
}

fn parse_page(input: &str, text: &str) -> Result<usize> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PdfCombineError::invalid_input(
            input,
            format!("'{text}' is not a page number"),
        ));
    }
    // All digits, so the only failure left is overflow.
    Ok(text.parse().unwrap_or(usize::MAX))
}

fn clamp(page: usize, max_page: usize, clamped: &mut bool) -> usize {
    let bounded = page.clamp(1, max_page);
    if bounded != page {
        *clamped = true;
    }
    bounded
}

/// Expand a range string without validation.
///
/// Malformed fragments are skipped. When `page_count` is known, pages outside
/// `1..=page_count` are skipped too, and an empty string selects every page.
pub fn expand_lenient(input: &str, page_count: Option<usize>) -> Vec<usize> {
    let in_bounds = |page: usize| page >= 1 && page_count.is_none_or(|n| page <= n);

    let mut pages = Vec::new();
    let mut any_token = false;

    for raw in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        any_token = true;
        let mut parts = raw.split('-').map(str::trim);
        let bounds = match (parts.next(), parts.next(), parts.next()) {
            (Some(a), None, _) => a.parse::<usize>().ok().map(|a| (a, a)),
            (Some(a), Some(b), None) => a.parse::<usize>().ok().zip(b.parse::<usize>().ok()),
            _ => None,
        };
        let Some((start, end)) = bounds else {
            log::debug!("Skipping malformed range fragment '{raw}'");
            continue;
        };

        let token = if start == end {
            Token::Single(start)
        } else if let Some(n) = page_count {
            // Trim spans to the document before expanding them.
            let lo = start.min(end).max(1);
            let hi = start.max(end).min(n);
            if lo > hi {
                continue;
            }
            if start <= end {
                Token::Span(lo, hi)
            } else {
                Token::Span(hi, lo)
            }
        } else {
            Token::Span(start, end)
        };

        let mut expanded = Vec::new();
        token.expand_into(&mut expanded);
        pages.extend(expanded.into_iter().filter(|&page| in_bounds(page)));
    }

    if !any_token && let Some(n) = page_count {
        pages.extend(1..=n);
    }

    pages
}

/// Drop every character that cannot appear in a range string.
pub fn sanitize_range_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == ',')
        .collect()
}
