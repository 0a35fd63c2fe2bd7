use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Convert a 1-based column ordinal to its letter label (1 -> "A", 27 -> "AA").
///
/// Labels are a bijective base-26 numeral with no digit for zero, so ordinal
/// 0 has no label and yields an empty string.
pub fn column_letter(ordinal: u32) -> String {
    let mut label = String::new();
    let mut n = ordinal;

    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    label
}

/// Convert a column label back to its 1-based ordinal ("A" -> 1, "AA" -> 27)
pub fn column_ordinal(label: &str) -> Option<u32> {
    if label.is_empty() {
        return None;
    }

    let mut n: u32 = 0;
    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        n = n.checked_mul(26)?.checked_add(digit)?;
    }

    Some(n)
}

/// A single cell address; both fields are 1-based, as they appear on the wire.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        CellRef { row, col }
    }

    /// Address of a 0-based data cell. The header occupies wire row 1, so
    /// data row 0 lives on wire row 2.
    ///
    /// Indices past the wire's `u32` address space saturate at `u32::MAX`.
    pub fn data_cell(row: usize, col: usize) -> Self {
        CellRef::new(wire_index(row, 2), wire_index(col, 1))
    }

    /// Parse A1 notation ("B2" -> row 2, col 2)
    pub fn from_a1(notation: &str) -> Option<Self> {
        let caps = cell_pattern().captures(notation.trim())?;
        let col = column_ordinal(&caps[1])?;
        let row: u32 = caps[2].parse().ok()?;

        if row == 0 {
            return None;
        }

        Some(CellRef::new(row, col))
    }

    pub fn to_a1(&self) -> String {
        format!("{}{}", column_letter(self.col), self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

fn wire_index(index: usize, offset: u32) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_add(offset)
}

fn cell_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("valid cell pattern"))
}

/// A range in `Sheet!A1:B2` notation.
///
/// `start` and `end` are both optional: `Sheet` names the whole tab and
/// `Sheet!A5` a single anchor cell. Sheet names are written verbatim, without
/// quoting, which is what the service accepts for the ranges built here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeAddress {
    pub sheet: String,
    pub start: Option<CellRef>,
    pub end: Option<CellRef>,
}

impl RangeAddress {
    /// The whole tab
    pub fn sheet(sheet: impl Into<String>) -> Self {
        RangeAddress {
            sheet: sheet.into(),
            start: None,
            end: None,
        }
    }

    /// A bare anchor cell, e.g. `Sheet!A5`
    pub fn anchor(sheet: impl Into<String>, cell: CellRef) -> Self {
        RangeAddress {
            sheet: sheet.into(),
            start: Some(cell),
            end: None,
        }
    }

    /// One cell written as a range, e.g. `Sheet!B2:B2`
    pub fn single_cell(sheet: impl Into<String>, cell: CellRef) -> Self {
        RangeAddress {
            sheet: sheet.into(),
            start: Some(cell),
            end: Some(cell),
        }
    }

    /// Parse `Sheet`, `Sheet!A1` or `Sheet!A1:B2`. A single-quoted sheet
    /// name (`'My Sheet'!A1`) is unquoted.
    pub fn parse(notation: &str) -> Option<Self> {
        let (sheet, cells) = match notation.rfind('!') {
            Some(idx) => (&notation[..idx], Some(&notation[idx + 1..])),
            None => (notation, None),
        };

        let sheet = unquote_sheet(sheet);
        if sheet.is_empty() {
            return None;
        }

        let (start, end) = match cells {
            None => (None, None),
            Some(cells) => match cells.split_once(':') {
                Some((a, b)) => (Some(CellRef::from_a1(a)?), Some(CellRef::from_a1(b)?)),
                None => (Some(CellRef::from_a1(cells)?), None),
            },
        };

        Some(RangeAddress { sheet, start, end })
    }
}

fn unquote_sheet(sheet: &str) -> String {
    match sheet
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
    {
        Some(inner) => inner.replace("''", "'"),
        None => sheet.to_string(),
    }
}

impl fmt::Display for RangeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sheet)?;
        if let Some(start) = self.start {
            write!(f, "!{}", start)?;
            if let Some(end) = self.end {
                write!(f, ":{}", end)?;
            }
        }
        Ok(())
    }
}
