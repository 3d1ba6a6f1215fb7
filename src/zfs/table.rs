//! Columnar output parsing for `zfs`/`zpool` human-readable listings.
//!
//! The first line is the header; every later line becomes a row as-is, blank
//! ones included. Only trailing blank lines are dropped.
//! Rows are never validated against the header width, so parsing cannot fail.

use serde::Serialize;

/// Header plus rows, exactly as split from the tool's stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// How a line is cut into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Splitter {
    /// Any run of whitespace separates fields (`list` output).
    Whitespace,
    /// Only runs of two or more spaces separate fields (`get all` output),
    /// so values such as free-form comments keep their single spaces.
    DoubleSpace,
}

impl Splitter {
    pub fn split(&self, line: &str) -> Vec<String> {
        match self {
            Splitter::Whitespace => line.split_whitespace().map(str::to_string).collect(),
            Splitter::DoubleSpace => split_double_space(line),
        }
    }
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Values of one column; rows too short to have it are skipped.
    pub fn column_values(&self, name: &str) -> Vec<&str> {
        let Some(idx) = self.column_index(name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(idx).map(String::as_str))
            .collect()
    }

    /// Widest row, header included.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.columns.len()))
            .max()
            .unwrap_or(0)
    }
}

pub fn parse(text: &str, splitter: Splitter) -> Table {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);
    let mut lines = lines[..end].iter().copied();

    let Some(header) = lines.next() else {
        return Table::default();
    };

    Table {
        columns: splitter.split(header),
        rows: lines.map(|line| splitter.split(line)).collect(),
    }
}

/// Parser for `list` output.
pub fn parse_whitespace(text: &str) -> Table {
    parse(text, Splitter::Whitespace)
}

/// Parser for `get all` output.
pub fn parse_double_space(text: &str) -> Table {
    parse(text, Splitter::DoubleSpace)
}

/// Runs of two or more spaces delimit fields; single spaces stay inside values.
///
/// Leading and trailing space runs of any length (a lone leading space
/// included) produce no empty edge fields: `" a b"` is `["a b"]`.
fn split_double_space(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut spaces = 0usize;

    for ch in line.chars() {
        if ch == ' ' {
            spaces += 1;
            continue;
        }
        if spaces >= 2 {
            if !current.is_empty() {
                fields.push(std::mem::take(&mut current));
            }
        } else if spaces == 1 && !current.is_empty() {
            current.push(' ');
        }
        spaces = 0;
        current.push(ch);
    }

    // Trailing spaces are a delimiter (or padding), never part of the value.
    if !current.is_empty() {
        fields.push(current);
    }
    fields
}

/* ---- Tests ---- */
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_table() {
        for text in ["", "\n", "   \n\n"] {
            let t = parse_whitespace(text);
            assert!(t.columns.is_empty());
            assert!(t.rows.is_empty());
            assert_eq!(parse_double_space(text), Table::default());
        }
    }

    #[test]
    fn whitespace_runs_of_any_length() {
        for sep in [" ", "  ", "     ", "\t"] {
            let line = ["name", "used", "avail"].join(sep);
            let t = parse_whitespace(&line);
            assert_eq!(t.columns, vec!["name", "used", "avail"]);
            assert!(t.rows.is_empty());
        }
    }

    #[test]
    fn double_space_keeps_single_spaces() {
        let t = parse_double_space("NAME  PROPERTY  VALUE A B");
        assert_eq!(t.columns, vec!["NAME", "PROPERTY", "VALUE A B"]);
    }

    #[test]
    fn double_space_get_all_output() {
        let out = "NAME       PROPERTY  VALUE                  SOURCE\n\
                   tank/data  type      filesystem             -\n\
                   tank/data  comment   weekly backup target   local\n";
        let t = parse_double_space(out);
        assert_eq!(t.columns, vec!["NAME", "PROPERTY", "VALUE", "SOURCE"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(
            t.rows[1],
            vec!["tank/data", "comment", "weekly backup target", "local"]
        );
    }

    #[test]
    fn list_output_rows() {
        let out = "NAME        USED  AVAIL  VOLSIZE  MOUNTPOINT\n\
                   tank        1.2G  7.8G   -        /tank\n\
                   tank/data   96K   7.8G   -        /tank/data\n";
        let t = parse_whitespace(out);
        assert_eq!(t.columns.len(), 5);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.column_values("name"), vec!["tank", "tank/data"]);
        assert_eq!(t.rows[1][4], "/tank/data");
    }

    #[test]
    fn ragged_rows_pass_through() {
        let out = "A B C\n1 2\n1 2 3 4\n";
        let t = parse_whitespace(out);
        assert_eq!(t.columns.len(), 3);
        assert_eq!(t.rows[0], vec!["1", "2"]);
        assert_eq!(t.rows[1].len(), 4);
        assert_eq!(t.width(), 4);
        assert_eq!(t.column_values("C"), vec!["3"]);
    }

    #[test]
    fn header_only() {
        let t = parse_whitespace("NAME  ALLOC  FREE  SIZE  HEALTH\n");
        assert_eq!(t.columns.len(), 5);
        assert!(t.rows.is_empty());
        assert!(!t.is_empty());
    }

    #[test]
    fn interior_and_leading_blank_lines_are_kept() {
        let t = parse_whitespace("NAME USED\ntank 1G\n\ntank/data 96K\n\n\n");
        assert_eq!(t.columns, vec!["NAME", "USED"]);
        assert_eq!(t.rows.len(), 3);
        assert!(t.rows[1].is_empty());
        assert_eq!(t.rows[2], vec!["tank/data", "96K"]);

        let t = parse_whitespace("\r\nNAME USED\r\ntank 1G\r\n");
        assert!(t.columns.is_empty());
        assert_eq!(t.rows, vec![vec!["NAME", "USED"], vec!["tank", "1G"]]);
    }

    #[test]
    fn double_space_edges() {
        assert_eq!(split_double_space("  a  b  "), vec!["a", "b"]);
        assert_eq!(split_double_space(" a b"), vec!["a b"]);
        assert!(split_double_space("   ").is_empty());
    }
}
