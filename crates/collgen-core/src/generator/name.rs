use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;
use tracing::warn;

use crate::config::generation::INVALID_FORMAT_NAME;
use crate::replay::Score;
use crate::score::ModTranslator;

/// Exclusive upper bound for placeholder indexes and alignment widths.
const MAX_PLACEHOLDER_VALUE: u32 = 1_000_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unmatched '}}' at {position}")]
    UnexpectedClosingBrace { position: usize },

    #[error("placeholder at {position} is not closed")]
    UnterminatedPlaceholder { position: usize },

    #[error("placeholder at {position} has no valid index")]
    InvalidIndex { position: usize },

    #[error("placeholder at {position} has an invalid alignment")]
    InvalidAlignment { position: usize },

    #[error("argument {index} at {position} does not exist")]
    IndexOutOfRange { index: usize, position: usize },
}

/// Render a collection name for one score.
///
/// Placeholders follow the `{index[,alignment][:format]}` form: `{0}` is the
/// username and `{1}` the mod string produced by `translator`. `{{` and `}}`
/// are literal braces. Format strings are accepted and ignored.
///
/// ```
/// use collgen_core::generator::format_collection_name;
/// use collgen_core::replay::Score;
/// use collgen_core::score::{Mods, ShortModNames};
///
/// let score = Score { mods: Mods::HIDDEN, ..Default::default() };
/// let name = format_collection_name(&score, "alice", "{0} - {1}", &ShortModNames).unwrap();
/// assert_eq!(name, "alice - HD");
/// ```
pub fn format_collection_name(
    score: &Score,
    username: &str,
    template: &str,
    translator: &dyn ModTranslator,
) -> Result<String, FormatError> {
    let mods = translator.mods_to_string(score.mods);
    format_composite(template, &[username, &mods])
}

/// Like [`format_collection_name`], but a malformed template yields `"Invalid format!"`.
pub fn collection_name_or_fallback(
    score: &Score,
    username: &str,
    template: &str,
    translator: &dyn ModTranslator,
) -> String {
    format_collection_name(score, username, template, translator).unwrap_or_else(|e| {
        warn!("Invalid collection name template {:?}: {}", template, e);
        INVALID_FORMAT_NAME.to_string()
    })
}

fn format_composite(template: &str, args: &[&str]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }
                let body = placeholder_body(template, position, &mut chars)?;
                let (index, alignment) = parse_placeholder(body, position)?;
                let arg = args
                    .get(index)
                    .ok_or(FormatError::IndexOutOfRange { index, position })?;
                push_aligned(&mut out, arg, alignment);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(FormatError::UnexpectedClosingBrace { position });
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Text between `{` at `open` and its closing `}`.
fn placeholder_body<'a>(
    template: &'a str,
    open: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<&'a str, FormatError> {
    for (i, c) in chars.by_ref() {
        match c {
            '}' => return Ok(&template[open + 1..i]),
            '{' => break,
            _ => {}
        }
    }
    Err(FormatError::UnterminatedPlaceholder { position: open })
}

fn parse_placeholder(body: &str, position: usize) -> Result<(usize, i32), FormatError> {
    let head = body.split_once(':').map_or(body, |(head, _format)| head);
    let (index, alignment) = match head.split_once(',') {
        Some((index, alignment)) => (index, Some(alignment)),
        None => (head, None),
    };

    let index = index.trim_end();
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidIndex { position });
    }
    let index = index
        .parse::<u32>()
        .ok()
        .filter(|&i| i < MAX_PLACEHOLDER_VALUE)
        .ok_or(FormatError::InvalidIndex { position })?;

    let alignment = match alignment {
        Some(a) => a
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|a| a.unsigned_abs() < MAX_PLACEHOLDER_VALUE)
            .ok_or(FormatError::InvalidAlignment { position })?,
        None => 0,
    };
    Ok((index as usize, alignment))
}

/// Positive alignment pads on the left, negative on the right.
fn push_aligned(out: &mut String, value: &str, alignment: i32) {
    let width = alignment.unsigned_abs() as usize;
    let padding = width.saturating_sub(value.chars().count());
    if alignment > 0 {
        out.extend(std::iter::repeat_n(' ', padding));
        out.push_str(value);
    } else {
        out.push_str(value);
        out.extend(std::iter::repeat_n(' ', padding));
    }
}
