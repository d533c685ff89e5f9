//! Board file parsing.
//!
//! ```text
//! file     := header LF cardline (LF cardline){rows*cols - 1} LF?
//! header   := digits "x" digits          ; rows and cols, both >= 1
//! cardline := non-empty run of non-whitespace characters
//! ```
//!
//! Trailing blank lines are tolerated; a blank line anywhere before the
//! last card is a parse error, as is a card count that disagrees with
//! the header.

use crate::board::engine::Board;
use crate::board::error::ParseError;
use std::path::Path;
use tracing::instrument;

impl Board {
    /// Parses a board from its file format. All cards start face down,
    /// uncontrolled, with the change counter at zero.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` describing the first grammar violation.
    #[instrument(skip(text))]
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = text.split('\n').collect();

        let header = lines[0];
        let (rows, cols) = parse_header(header)?;
        let expected = rows
            .checked_mul(cols)
            .ok_or(ParseError::Dimensions { rows, cols })?;

        let mut values = Vec::with_capacity(expected);
        for (index, &line) in lines.iter().enumerate().skip(1) {
            let lineno = index + 1;
            if values.len() == expected {
                // Only blank lines may follow the last card.
                if !line.is_empty() {
                    return Err(ParseError::Trailing(lineno));
                }
                continue;
            }
            if line.is_empty() {
                return Err(ParseError::BlankLine(lineno));
            }
            if line.chars().any(char::is_whitespace) {
                return Err(ParseError::Card {
                    line: lineno,
                    found: line.to_string(),
                });
            }
            values.push(line.to_string());
        }

        if values.len() != expected {
            return Err(ParseError::CardCount {
                expected,
                found: values.len(),
            });
        }

        Ok(Board::from_parts(rows, cols, values))
    }

    /// Reads and parses a board file.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Read` if the file cannot be read, or any
    /// grammar error from [`Board::parse`].
    #[instrument]
    pub fn from_file(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path).map_err(|err| ParseError::Read(err.to_string()))?;
        Self::parse(&text)
    }
}

/// Parses the `ROWSxCOLS` header line.
fn parse_header(header: &str) -> Result<(usize, usize), ParseError> {
    let malformed = || ParseError::Header(header.to_string());

    let (rows, cols) = header.split_once('x').ok_or_else(malformed)?;
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !digits(rows) || !digits(cols) {
        return Err(malformed());
    }
    let rows: usize = rows.parse().map_err(|_| malformed())?;
    let cols: usize = cols.parse().map_err(|_| malformed())?;
    if rows == 0 || cols == 0 {
        return Err(ParseError::Dimensions { rows, cols });
    }
    Ok((rows, cols))
}
