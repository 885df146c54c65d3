//! Interactive date prompts

use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::core::dates;
use crate::error::{DivisasError, DivisasResult, DATE_PATTERN_HINT};

/// Ask for a date until the answer parses.
///
/// An empty answer takes `default`. End of input is an error because there
/// is nobody left to reprompt.
pub fn prompt_date<R, W>(
    input: &mut R,
    output: &mut W,
    label: &str,
    default: &str,
) -> DivisasResult<NaiveDate>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{} ({}) [{}]: ", label, DATE_PATTERN_HINT, default)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Err(DivisasError::Prompt(label.to_lowercase()));
        }

        let answer = match line.trim() {
            "" => default,
            other => other,
        };
        match dates::parse_date(answer) {
            Ok(date) => return Ok(date),
            Err(e) => writeln!(output, "{}. Please try again.", e)?,
        }
    }
}

/// Use a date given on the command line, prompting when it is missing.
///
/// A malformed `arg` is an error unless `interactive`, in which case the
/// error is shown and the user is asked for the date instead.
pub fn date_from_arg<R, W>(
    arg: Option<&str>,
    interactive: bool,
    input: &mut R,
    output: &mut W,
    label: &str,
    default: &str,
) -> DivisasResult<NaiveDate>
where
    R: BufRead,
    W: Write,
{
    let Some(value) = arg else {
        return prompt_date(input, output, label, default);
    };
    match dates::parse_date(value) {
        Ok(date) => Ok(date),
        Err(e) if interactive => {
            writeln!(output, "{}. Please try again.", e)?;
            prompt_date(input, output, label, default)
        }
        Err(e) => Err(e),
    }
}
