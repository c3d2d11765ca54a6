// src/csv.rs
use std::io::{self, Write};

/// Quoting policy for a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    /// Only fields that contain the separator, quotes or line breaks.
    Minimal,
    /// Every field.
    Always,
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char, quote: Quote) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if quote == Quote::Always || needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Stringify rows with an optional header line.
pub fn rows_to_string(headers: Option<&[String]>, rows: &[Vec<String>], sep: char) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if let Some(h) = headers {
        let _ = write_row(&mut buf, h, sep, Quote::Minimal);
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep, Quote::Minimal);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_quotes_only_when_needed() {
        let out = rows_to_string(
            Some(&[s!("a"), s!("b")]),
            &[vec![s!("x,y"), s!("z")]],
            ',',
        );
        assert_eq!(out, "a,b\n\"x,y\",z\n");
    }

    #[test]
    fn always_quotes_everything() {
        let mut buf = Vec::new();
        write_row(&mut buf, &[s!("1"), s!("say \"hi\"")], ',', Quote::Always).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\"1\",\"say \"\"hi\"\"\"\n");
    }
}
