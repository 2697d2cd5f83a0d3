use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    DateTime(NaiveDateTime),
    // TIME can be negative or exceed 24h, so it keeps the server's text form.
    Time(String),
}

impl From<mysql::Value> for Cell {
    fn from(value: mysql::Value) -> Self {
        use mysql::Value;
        match value {
            Value::NULL => Cell::Null,
            Value::Int(i) => Cell::Int(i),
            Value::UInt(u) => Cell::UInt(u),
            Value::Float(f) => Cell::Float(f as f64),
            Value::Double(d) => Cell::Float(d),
            Value::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(s) => Cell::Text(s),
                Err(e) => Cell::Bytes(e.into_bytes()),
            },
            Value::Date(y, m, d, h, mi, s, us) => {
                NaiveDate::from_ymd_opt(y as i32, m as u32, d as u32)
                    .and_then(|date| date.and_hms_micro_opt(h as u32, mi as u32, s as u32, us))
                    .map(Cell::DateTime)
                    .unwrap_or_else(|| {
                        Cell::Text(format!("{y:04}-{m:02}-{d:02} {h:02}:{mi:02}:{s:02}"))
                    })
            }
            Value::Time(neg, days, h, mi, s, us) => {
                let hours = days * 24 + h as u32;
                let sign = if neg { "-" } else { "" };
                if us == 0 {
                    Cell::Time(format!("{sign}{hours:02}:{mi:02}:{s:02}"))
                } else {
                    Cell::Time(format!("{sign}{hours:02}:{mi:02}:{s:02}.{us:06}"))
                }
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of the cell. The text protocol returns numbers as strings,
    /// so numeric text is accepted too.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::UInt(u) => i64::try_from(*u).ok(),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NULL"),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::UInt(u) => write!(f, "{u}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Cell::DateTime(dt) => {
                if dt.time().num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else if dt.nanosecond() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f"))
                }
            }
            Cell::Time(s) => f.write_str(s),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::UInt(u) => serializer.serialize_u64(*u),
            Cell::Float(x) => serializer.serialize_f64(*x),
            Cell::Text(s) | Cell::Time(s) => serializer.serialize_str(s),
            other => serializer.collect_str(other),
        }
    }
}

pub type Row = Vec<Cell>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column of the first row, if any.
    pub fn first_value(&self) -> Option<&Cell> {
        self.rows.first().and_then(|r| r.first())
    }

    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |r| r.get(idx))
    }

    /// Values of column `idx` that are text; other values are skipped.
    pub fn text_column(&self, idx: usize) -> Vec<String> {
        self.column_values(idx)
            .filter_map(|c| c.as_text().map(str::to_string))
            .collect()
    }
}
