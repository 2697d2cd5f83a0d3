use crate::model::ResultSet;
use serde_json::{Map, Value};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Shows a result set to the user.
pub trait Render {
    fn render(&mut self, rs: &ResultSet) -> io::Result<()>;
}

pub fn renderer<'a, W: Write + 'a>(format: OutputFormat, out: W) -> Box<dyn Render + 'a> {
    match format {
        OutputFormat::Table => Box::new(TableRenderer::new(out)),
        OutputFormat::Json => Box::new(JsonRenderer::new(out)),
    }
}

/// Keeps one row per line: control characters are written as escapes.
fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Bordered grid followed by a row count.
pub struct TableRenderer<W> {
    out: W,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn separator(&mut self, widths: &[usize]) -> io::Result<()> {
        let mut line = String::from("+");
        for w in widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        writeln!(self.out, "{line}")
    }

    fn line(&mut self, cells: &[String], widths: &[usize]) -> io::Result<()> {
        let mut line = String::from("|");
        for (cell, w) in cells.iter().zip(widths) {
            let pad = w - cell.chars().count();
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        writeln!(self.out, "{line}")
    }
}

impl<W: Write> Render for TableRenderer<W> {
    fn render(&mut self, rs: &ResultSet) -> io::Result<()> {
        if rs.is_empty() {
            return writeln!(self.out, "Empty set");
        }

        let text: Vec<Vec<String>> = rs
            .rows
            .iter()
            .map(|r| r.iter().map(|c| escape_cell(&c.to_string())).collect())
            .collect();
        let mut widths: Vec<usize> = rs.columns.iter().map(|c| c.chars().count()).collect();
        for row in &text {
            for (i, cell) in row.iter().enumerate() {
                let n = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(n),
                    None => widths.push(n),
                }
            }
        }

        let mut header = rs.columns.clone();
        header.resize(widths.len(), String::new());
        self.separator(&widths)?;
        self.line(&header, &widths)?;
        self.separator(&widths)?;
        for row in &text {
            let mut row = row.clone();
            row.resize(widths.len(), String::new());
            self.line(&row, &widths)?;
        }
        self.separator(&widths)?;

        match rs.len() {
            1 => writeln!(self.out, "1 row in set"),
            n => writeln!(self.out, "{n} rows in set"),
        }
    }
}

/// One JSON object per row, keyed by column name.
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    fn render(&mut self, rs: &ResultSet) -> io::Result<()> {
        for row in &rs.rows {
            let mut obj = Map::new();
            for (i, cell) in row.iter().enumerate() {
                let key = rs
                    .columns
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("column_{i}"));
                obj.insert(key, serde_json::to_value(cell)?);
            }
            serde_json::to_writer(&mut self.out, &Value::Object(obj))?;
            writeln!(self.out)?;
        }
        Ok(())
    }
}
