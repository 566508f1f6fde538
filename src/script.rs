use std::fmt;

use crate::vmm::command::Command;

/// Error for one unusable script line. The reader keeps yielding items
/// afterwards, so a bad line never takes the rest of the script with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number in the script.
    pub line: usize,
    pub kind: ScriptErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptErrorKind {
    /// Wrong number of fields for the opcode
    WrongArity {
        opcode: char,
        expected: usize,
        found: usize,
    },
    /// A numeric field that does not hold an acceptable integer
    BadNumber(String),
    /// A first token that is not one of the known opcodes
    UnknownCommand(String),
    /// A line with no tokens at all
    EmptyLine,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl fmt::Display for ScriptErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptErrorKind::WrongArity {
                opcode,
                expected,
                found,
            } => write!(
                f,
                "command {} takes {} fields, found {}",
                opcode, expected, found
            ),
            ScriptErrorKind::BadNumber(token) => write!(f, "invalid numeric field '{}'", token),
            ScriptErrorKind::UnknownCommand(token) => write!(f, "unknown command '{}'", token),
            ScriptErrorKind::EmptyLine => write!(f, "empty line"),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Splits a command script into typed commands, one item per line.
///
/// Fields are separated by arbitrary whitespace. Every line yields either
/// a command or a [`ScriptError`], so callers decide how to handle the
/// bad ones; nothing is silently skipped.
pub struct ScriptReader<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> ScriptReader<'a> {
    pub fn new(input: &'a str) -> ScriptReader<'a> {
        ScriptReader {
            lines: input.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for ScriptReader<'a> {
    type Item = Result<Command, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, line) = self.lines.next()?;
        Some(parse_line(index + 1, line))
    }
}

fn parse_line(line: usize, text: &str) -> Result<Command, ScriptError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let opcode = match tokens.first() {
        Some(&opcode) => opcode,
        None => {
            return Err(ScriptError {
                line,
                kind: ScriptErrorKind::EmptyLine,
            })
        }
    };
    match opcode {
        "P" => {
            expect_arity('P', &tokens, 3, line)?;
            Ok(Command::Allocate {
                bytes: parse_int(tokens[1], line)?,
                pid: tokens[2].to_string(),
            })
        }
        "A" => {
            expect_arity('A', &tokens, 4, line)?;
            Ok(Command::Access {
                addr: parse_int(tokens[1], line)?,
                pid: tokens[2].to_string(),
                write: parse_write_flag(tokens[3], line)?,
            })
        }
        "L" => {
            expect_arity('L', &tokens, 2, line)?;
            Ok(Command::Free {
                pid: tokens[1].to_string(),
            })
        }
        "C" => Ok(Command::Comment(tokens[1..].join(" "))),
        "F" => {
            expect_arity('F', &tokens, 1, line)?;
            Ok(Command::EndReport)
        }
        "E" => {
            expect_arity('E', &tokens, 1, line)?;
            Ok(Command::Terminate)
        }
        other => Err(ScriptError {
            line,
            kind: ScriptErrorKind::UnknownCommand(other.to_string()),
        }),
    }
}

fn expect_arity(
    opcode: char,
    tokens: &[&str],
    expected: usize,
    line: usize,
) -> Result<(), ScriptError> {
    if tokens.len() != expected {
        return Err(ScriptError {
            line,
            kind: ScriptErrorKind::WrongArity {
                opcode,
                expected,
                found: tokens.len(),
            },
        });
    }
    Ok(())
}

fn parse_int(token: &str, line: usize) -> Result<i64, ScriptError> {
    token.parse::<i64>().map_err(|_| ScriptError {
        line,
        kind: ScriptErrorKind::BadNumber(token.to_string()),
    })
}

/// The modification bit must be exactly `0` or `1`.
fn parse_write_flag(token: &str, line: usize) -> Result<bool, ScriptError> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ScriptError {
            line,
            kind: ScriptErrorKind::BadNumber(token.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("P 2048 p1", Command::Allocate { bytes: 2048, pid: "p1".to_string() })]
    #[case("P -40 p1", Command::Allocate { bytes: -40, pid: "p1".to_string() })]
    #[case("A 17 p1 1", Command::Access { addr: 17, pid: "p1".to_string(), write: true })]
    #[case("A 0 p1 0", Command::Access { addr: 0, pid: "p1".to_string(), write: false })]
    #[case("L p1", Command::Free { pid: "p1".to_string() })]
    #[case("C first load of the morning", Command::Comment("first load of the morning".to_string()))]
    #[case("C", Command::Comment(String::new()))]
    #[case("F", Command::EndReport)]
    #[case("E", Command::Terminate)]
    #[case("  P \t 16   spaced  ", Command::Allocate { bytes: 16, pid: "spaced".to_string() })]
    fn test_parses_single_lines(#[case] input: &str, #[case] expected: Command) {
        let mut reader = ScriptReader::new(input);
        assert_eq!(reader.next(), Some(Ok(expected)));
        assert_eq!(reader.next(), None);
    }

    #[rstest]
    #[case("P 16", ScriptErrorKind::WrongArity { opcode: 'P', expected: 3, found: 2 })]
    #[case("P 16 p1 extra", ScriptErrorKind::WrongArity { opcode: 'P', expected: 3, found: 4 })]
    #[case("A 16 p1", ScriptErrorKind::WrongArity { opcode: 'A', expected: 4, found: 3 })]
    #[case("L", ScriptErrorKind::WrongArity { opcode: 'L', expected: 2, found: 1 })]
    #[case("F now", ScriptErrorKind::WrongArity { opcode: 'F', expected: 1, found: 2 })]
    #[case("E 1", ScriptErrorKind::WrongArity { opcode: 'E', expected: 1, found: 2 })]
    #[case("P many p1", ScriptErrorKind::BadNumber("many".to_string()))]
    #[case("A x p1 0", ScriptErrorKind::BadNumber("x".to_string()))]
    #[case("A 16 p1 2", ScriptErrorKind::BadNumber("2".to_string()))]
    #[case("Z 1 2", ScriptErrorKind::UnknownCommand("Z".to_string()))]
    #[case("p 16 p1", ScriptErrorKind::UnknownCommand("p".to_string()))]
    #[case("   ", ScriptErrorKind::EmptyLine)]
    fn test_reports_bad_lines(#[case] input: &str, #[case] kind: ScriptErrorKind) {
        let mut reader = ScriptReader::new(input);
        assert_eq!(reader.next(), Some(Err(ScriptError { line: 1, kind })));
    }

    #[rstest]
    fn test_line_numbers_count_from_one_and_errors_do_not_stop_the_reader() {
        let script = "P 16 a\n\nQ what\nL a\n";
        let items: Vec<_> = ScriptReader::new(script).collect();
        assert_eq!(
            items,
            vec![
                Ok(Command::Allocate {
                    bytes: 16,
                    pid: "a".to_string(),
                }),
                Err(ScriptError {
                    line: 2,
                    kind: ScriptErrorKind::EmptyLine,
                }),
                Err(ScriptError {
                    line: 3,
                    kind: ScriptErrorKind::UnknownCommand("Q".to_string()),
                }),
                Ok(Command::Free {
                    pid: "a".to_string(),
                }),
            ]
        );
    }

    #[rstest]
    fn test_error_display_includes_the_line_number() {
        let error = ScriptError {
            line: 7,
            kind: ScriptErrorKind::UnknownCommand("Q".to_string()),
        };
        assert_eq!(error.to_string(), "line 7: unknown command 'Q'");
    }
}
