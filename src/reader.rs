// Line reader and file driver
//
// Key design:
// - Lines come out with their terminator (\n or \r\n) removed, so the
//   scanners never trim bytes themselves
// - One String line buffer and one RowBuffer are reused for every line;
//   fields are copied into the Table before the next line is read
// - Elapsed time is measured locally around the parse, never globally

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{MalformedPolicy, ParseConfig};
use crate::error::{ArityError, Error, Result};
use crate::strategy::Tokenizer;
use crate::table::{Row, Table};

/// Reads one line at a time into a reused buffer.
pub struct LineReader<R> {
    reader: R,
    buf: String,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        LineReader {
            reader,
            buf: String::new(),
            line_no: 0,
        }
    }

    /// Next line (1-based number, text without terminator), or `None` at end
    /// of input.
    pub fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.buf.clear();
        let line_no = self.line_no + 1;
        let n = self
            .reader
            .read_line(&mut self.buf)
            .map_err(|source| Error::Read {
                line: line_no,
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        self.line_no = line_no;
        Ok(Some((line_no, strip_terminator(&self.buf))))
    }
}

/// Drop a trailing `\n` and a `\r` right before it. A bare `\r` elsewhere is
/// data.
#[inline]
pub fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

/// A data line dropped under `MalformedPolicy::Skip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub error: ArityError,
}

/// Result of a parse: the table, any dropped lines, and how long it took.
#[derive(Debug)]
pub struct ParseReport {
    pub table: Table,
    pub skipped: Vec<SkippedLine>,
    pub elapsed: Duration,
}

/// Parse a file. Timing includes opening it.
pub fn parse_path(path: impl AsRef<Path>, config: &ParseConfig) -> Result<ParseReport> {
    let path = path.as_ref();
    let start = Instant::now();

    let file = File::open(path).map_err(|source| Error::StreamOpen {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "opened input");

    let mut report = parse_reader(BufReader::new(file), config)?;
    report.elapsed = start.elapsed();
    Ok(report)
}

/// Parse from any buffered reader: header on line 1, data after.
pub fn parse_reader<R: BufRead>(reader: R, config: &ParseConfig) -> Result<ParseReport> {
    let start = Instant::now();
    let tokenizer = Tokenizer::new(config.arity, config.strategy);
    debug!(
        arity = config.arity,
        strategy = %config.strategy,
        on_malformed = %config.on_malformed,
        verify = config.verify,
        "parse config"
    );

    let mut lines = LineReader::new(reader);
    let mut fields = tokenizer.buffer();

    let header = {
        let (line_no, line) = lines.next_line()?.ok_or(Error::EmptyInput)?;
        tokenizer
            .split_header(line, &mut fields)
            .map_err(|source| Error::ArityMismatch {
                line: line_no,
                source,
            })?;
        Row::from_buffer(&fields, line)
    };
    debug!(columns = ?header.fields(), "header");

    let mut check = config.verify.then(|| tokenizer.buffer());
    let mut rows = Vec::new();
    let mut skipped = Vec::new();

    while let Some((line_no, line)) = lines.next_line()? {
        let scanned = tokenizer.tokenize(line, &mut fields);

        if let Some(other) = check.as_mut() {
            tokenizer.strategy().other().scan(line.as_bytes(), other);
            if *other != fields {
                return Err(Error::StrategyDivergence { line: line_no });
            }
        }

        match scanned {
            Ok(()) => rows.push(Row::from_buffer(&fields, line)),
            Err(error) => match config.on_malformed {
                MalformedPolicy::Abort => {
                    return Err(Error::ArityMismatch {
                        line: line_no,
                        source: error,
                    })
                }
                MalformedPolicy::Skip => {
                    warn!(line = line_no, %error, "skipping malformed line");
                    skipped.push(SkippedLine {
                        line: line_no,
                        error,
                    });
                }
            },
        }
    }

    let table = Table::new(header, rows)?;
    let elapsed = start.elapsed();
    info!(
        rows = table.len(),
        skipped = skipped.len(),
        elapsed_secs = elapsed.as_secs_f64(),
        "parsed"
    );

    Ok(ParseReport {
        table,
        skipped,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;
    use std::io::Cursor;

    fn config(arity: usize) -> ParseConfig {
        ParseConfig::new(arity).unwrap()
    }

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator("a,b\n"), "a,b");
        assert_eq!(strip_terminator("a,b\r\n"), "a,b");
        assert_eq!(strip_terminator("a,b"), "a,b");
        assert_eq!(strip_terminator("a\rb"), "a\rb");
        assert_eq!(strip_terminator("a,b\r"), "a,b\r");
        assert_eq!(strip_terminator("\n"), "");
    }

    #[test]
    fn test_line_reader_numbers_lines() {
        let mut lines = LineReader::new(Cursor::new("h1,h2\r\nx,y\nlast"));

        assert_eq!(lines.next_line().unwrap(), Some((1, "h1,h2")));
        assert_eq!(lines.next_line().unwrap(), Some((2, "x,y")));
        assert_eq!(lines.next_line().unwrap(), Some((3, "last")));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn test_parse_crlf_input() {
        let input = "a,b,c\r\n1,\"x,y\",3\r\n4,5,6\r\n";
        let report = parse_reader(Cursor::new(input), &config(3)).unwrap();

        assert_eq!(report.table.len(), 2);
        let row = report.table.get_row(0).unwrap();
        assert_eq!(row.get("b"), Some("\"x,y\""));
        assert_eq!(row.get("c"), Some("3"));
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            parse_reader(Cursor::new(""), &config(3)),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_header_arity_mismatch_is_fatal_even_when_skipping() {
        let cfg = config(3).with_on_malformed(MalformedPolicy::Skip);
        match parse_reader(Cursor::new("a,b\n1,2,3\n"), &cfg) {
            Err(Error::ArityMismatch { line: 1, source }) => assert_eq!(source.found, 2),
            other => panic!("expected header ArityMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_abort_on_malformed_line() {
        let input = "a,b\n1,2\n3,4,5\n6,7\n";
        match parse_reader(Cursor::new(input), &config(2)) {
            Err(Error::ArityMismatch { line: 3, source }) => {
                assert_eq!(source.expected, 2);
                assert_eq!(source.found, 3);
            }
            other => panic!("expected ArityMismatch on line 3, got {other:?}"),
        }
    }

    #[test]
    fn test_skip_malformed_line() {
        let input = "a,b\n1,2\n3,4,5\n\n6,7\n";
        let cfg = config(2).with_on_malformed(MalformedPolicy::Skip);
        let report = parse_reader(Cursor::new(input), &cfg).unwrap();

        assert_eq!(report.table.len(), 2);
        assert_eq!(report.table.get_row(1).unwrap().get("a"), Some("6"));
        assert_eq!(
            report.skipped,
            vec![
                SkippedLine {
                    line: 3,
                    error: ArityError {
                        expected: 2,
                        found: 3
                    }
                },
                SkippedLine {
                    line: 4,
                    error: ArityError {
                        expected: 2,
                        found: 1
                    }
                },
            ]
        );
    }

    #[test]
    fn test_verify_passes_on_agreeing_strategies() {
        let mut input = String::from("k,v\n");
        for i in 0..50 {
            input.push_str(&format!("{i},\"{}\"\n", "pad,".repeat(i % 13)));
        }
        for strategy in Strategy::ALL {
            let cfg = config(2).with_strategy(strategy).with_verify(true);
            let report = parse_reader(Cursor::new(input.as_str()), &cfg).unwrap();
            assert_eq!(report.table.len(), 50);
        }
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let report = parse_reader(Cursor::new("a,b\n"), &config(2)).unwrap();
        assert!(report.table.is_empty());
        assert_eq!(report.table.arity(), 2);
    }
}
