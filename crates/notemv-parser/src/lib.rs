//! # notemv-parser
//!
//! Parses the inline command lines notemv acts on.
//!
//! [`parse_line`] never fails: it only splits a line into verb and raw
//! arguments. Validating the arguments is left to the verb's handler;
//! for `move` that is [`parse_move_args`], backed by the pest grammar in
//! `src/command.pest`.

pub mod ast;

use pest::Parser;
use pest_derive::Parser;

use notemv_core::error::NotemvError;

pub use ast::{CommandLine, DestinationSpec, Verb};

#[derive(Parser)]
#[grammar = "command.pest"]
struct CommandGrammar;

/// Split a line into a lower-cased verb and the remaining argument text.
///
/// The line is trimmed first; the verb ends at the first whitespace run.
pub fn parse_line(line: &str) -> CommandLine {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => CommandLine {
            verb: verb.to_lowercase(),
            raw_args: rest.trim_start().to_string(),
        },
        None => CommandLine {
            verb: line.to_lowercase(),
            raw_args: String::new(),
        },
    }
}

/// Parse the arguments of a `move` command into a [`DestinationSpec`].
///
/// # Errors
///
/// Returns [`NotemvError::InvalidSyntax`] when the arguments do not start
/// with a `[[target]]` or `[[target|alias]]` wiki link.
pub fn parse_move_args(raw_args: &str) -> Result<DestinationSpec, NotemvError> {
    let mut pairs = CommandGrammar::parse(Rule::move_args, raw_args)
        .map_err(|_| NotemvError::invalid_move())?;
    let root = pairs.next().ok_or_else(NotemvError::invalid_move)?;

    let mut link_target = None;
    let mut alias = None;
    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::link_target => link_target = Some(pair.as_str().trim().to_string()),
            Rule::alias => {
                alias = pair
                    .into_inner()
                    .next()
                    .map(|text| text.as_str().to_string());
            }
            _ => {}
        }
    }

    Ok(DestinationSpec {
        link_target: link_target.ok_or_else(NotemvError::invalid_move)?,
        alias,
    })
}
