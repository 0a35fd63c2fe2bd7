use sheetsync_core::model::{
    AppendValuesResponse, BatchUpdateValuesResponse, DuplicateSheetReply, MajorDimension,
    SheetInfo, SheetProperties, SheetReply, SheetRequest, SpreadsheetMetadata,
    SpreadsheetProperties, UpdateValuesResponse, ValueRange,
};
use sheetsync_core::{CellRef, RangeAddress};

use crate::error::AppError;

/// Largest row number a range may address
pub const MAX_ROWS: usize = 1_000_000;
/// Largest column number a range may address (`ZZZ`)
pub const MAX_COLUMNS: usize = 18_278;

/// One tab: its properties and a ragged grid of cells
#[derive(Debug, Clone)]
pub struct SheetTab {
    pub properties: SheetProperties,
    pub grid: Vec<Vec<String>>,
}

/// An emulated spreadsheet.
///
/// Multi-part requests are applied to a copy and committed only when every
/// part succeeds, so a rejected request changes nothing.
#[derive(Debug, Clone)]
pub struct SpreadsheetDoc {
    pub id: String,
    pub title: String,
    sheets: Vec<SheetTab>,
    next_sheet_id: i64,
}

/// Rectangle covered by a range: 0-based, end-exclusive
struct Bounds {
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
}

impl Bounds {
    fn of(range: &RangeAddress) -> Self {
        match (range.start, range.end) {
            (None, _) => Bounds {
                top: 0,
                left: 0,
                bottom: usize::MAX,
                right: usize::MAX,
            },
            (Some(start), end) => {
                let end = end.unwrap_or(start);
                Bounds {
                    top: start.row.min(end.row) as usize - 1,
                    left: start.col.min(end.col) as usize - 1,
                    bottom: start.row.max(end.row) as usize,
                    right: start.col.max(end.col) as usize,
                }
            }
        }
    }
}

impl SpreadsheetDoc {
    /// Create a spreadsheet; with no titles it gets a single `Sheet1`
    pub fn new(id: impl Into<String>, title: impl Into<String>, sheet_titles: &[String]) -> Self {
        let mut doc = SpreadsheetDoc {
            id: id.into(),
            title: title.into(),
            sheets: Vec::new(),
            next_sheet_id: 0,
        };

        let default_title = ["Sheet1".to_string()];
        let titles = if sheet_titles.is_empty() {
            &default_title[..]
        } else {
            sheet_titles
        };
        for title in titles {
            doc.push_sheet(title.clone(), Vec::new());
        }
        doc
    }

    fn push_sheet(&mut self, title: String, grid: Vec<Vec<String>>) {
        let properties = SheetProperties {
            sheet_id: self.next_sheet_id,
            title,
            index: self.sheets.len() as i64,
        };
        self.next_sheet_id += 1;
        self.sheets.push(SheetTab { properties, grid });
    }

    pub fn metadata(&self) -> SpreadsheetMetadata {
        SpreadsheetMetadata {
            spreadsheet_id: Some(self.id.clone()),
            properties: Some(SpreadsheetProperties {
                title: self.title.clone(),
            }),
            sheets: self
                .sheets
                .iter()
                .map(|s| SheetInfo {
                    properties: s.properties.clone(),
                })
                .collect(),
        }
    }

    fn locate(&self, notation: &str) -> Result<(usize, RangeAddress), AppError> {
        let unparsable = || AppError::BadRequest(format!("Unable to parse range: {notation}"));
        let range = RangeAddress::parse(notation).ok_or_else(unparsable)?;
        let idx = self
            .sheets
            .iter()
            .position(|s| s.properties.title == range.sheet)
            .ok_or_else(unparsable)?;

        let beyond =
            |cell: &CellRef| cell.row as usize > MAX_ROWS || cell.col as usize > MAX_COLUMNS;
        if range.start.iter().chain(range.end.iter()).any(beyond) {
            return Err(exceeds_limits(notation));
        }
        Ok((idx, range))
    }

    /// Read a range, dropping trailing blank cells and rows
    pub fn read(&self, notation: &str) -> Result<ValueRange, AppError> {
        let (idx, range) = self.locate(notation)?;
        let b = Bounds::of(&range);

        let mut values: Vec<Vec<String>> = self.sheets[idx]
            .grid
            .iter()
            .take(b.bottom)
            .skip(b.top)
            .map(|row| row.iter().take(b.right).skip(b.left).cloned().collect())
            .collect();
        trim(&mut values);

        Ok(ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some(MajorDimension::Rows),
            values,
        })
    }

    /// Write rows after the last non-blank row at or below the anchor
    pub fn append(
        &mut self,
        notation: &str,
        body: &ValueRange,
    ) -> Result<AppendValuesResponse, AppError> {
        let (idx, range) = self.locate(notation)?;
        let anchor = range.start.unwrap_or(CellRef::new(1, 1));
        let tab = &mut self.sheets[idx];

        let last_used = tab
            .grid
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_empty()))
            .map_or(0, |i| i + 1);
        let top = (anchor.row as usize - 1).max(last_used);
        let left = anchor.col as usize - 1;

        let rows = as_rows(body);
        if !fits(top, left, &rows) {
            return Err(exceeds_limits(notation));
        }
        write_block(&mut tab.grid, top, left, &rows);

        Ok(AppendValuesResponse {
            spreadsheet_id: Some(self.id.clone()),
            table_range: None,
            updates: Some(updated(&self.id, &range.sheet, top, left, &rows)),
        })
    }

    /// Write every range of a batch, or none of them
    pub fn write_all(&mut self, data: &[ValueRange]) -> Result<BatchUpdateValuesResponse, AppError> {
        let mut staged = self.clone();
        let mut responses = Vec::with_capacity(data.len());
        let mut touched = Vec::with_capacity(data.len());

        for block in data {
            let notation = block
                .range
                .as_deref()
                .ok_or_else(|| AppError::BadRequest("Missing range in data".to_string()))?;
            let (idx, range) = staged.locate(notation)?;
            let b = Bounds::of(&range);
            let rows = as_rows(block);
            if !fits(b.top, b.left, &rows) {
                return Err(exceeds_limits(notation));
            }
            write_block(&mut staged.sheets[idx].grid, b.top, b.left, &rows);
            responses.push(updated(&self.id, &range.sheet, b.top, b.left, &rows));
            touched.push(idx);
        }

        *self = staged;
        touched.sort_unstable();
        touched.dedup();

        let total = |f: fn(&UpdateValuesResponse) -> u32| responses.iter().map(f).sum::<u32>();
        let total_updated_rows = total(|r| r.updated_rows);
        let total_updated_columns = total(|r| r.updated_columns);
        let total_updated_cells = total(|r| r.updated_cells);

        Ok(BatchUpdateValuesResponse {
            spreadsheet_id: Some(self.id.clone()),
            total_updated_rows,
            total_updated_columns,
            total_updated_cells,
            total_updated_sheets: touched.len() as u32,
            responses,
        })
    }

    /// Apply structural requests in order, or none of them
    pub fn apply_all(&mut self, requests: &[SheetRequest]) -> Result<Vec<SheetReply>, AppError> {
        let mut staged = self.clone();
        let replies = requests
            .iter()
            .map(|r| staged.apply(r))
            .collect::<Result<Vec<_>, _>>()?;
        *self = staged;
        Ok(replies)
    }

    fn apply(&mut self, request: &SheetRequest) -> Result<SheetReply, AppError> {
        match request {
            SheetRequest::DuplicateSheet(req) => {
                let source = self.position_of(req.source_sheet_id)?;
                let title = req
                    .new_sheet_name
                    .clone()
                    .unwrap_or_else(|| format!("Copy of {}", self.sheets[source].properties.title));
                if self.sheets.iter().any(|s| s.properties.title == title) {
                    return Err(AppError::BadRequest(format!(
                        "A sheet with the name \"{title}\" already exists"
                    )));
                }

                let at = req
                    .insert_sheet_index
                    .map_or(self.sheets.len(), |i| i.clamp(0, self.sheets.len() as i64) as usize);
                let properties = SheetProperties {
                    sheet_id: self.next_sheet_id,
                    title,
                    index: at as i64,
                };
                self.next_sheet_id += 1;

                let grid = self.sheets[source].grid.clone();
                self.sheets.insert(
                    at,
                    SheetTab {
                        properties: properties.clone(),
                        grid,
                    },
                );
                self.reindex();

                Ok(SheetReply {
                    duplicate_sheet: Some(DuplicateSheetReply { properties }),
                })
            }
            SheetRequest::DeleteSheet(req) => {
                let at = self.position_of(req.sheet_id)?;
                if self.sheets.len() == 1 {
                    return Err(AppError::BadRequest(
                        "You can't remove all the sheets in a document".to_string(),
                    ));
                }
                self.sheets.remove(at);
                self.reindex();
                Ok(SheetReply::default())
            }
        }
    }

    fn position_of(&self, sheet_id: i64) -> Result<usize, AppError> {
        self.sheets
            .iter()
            .position(|s| s.properties.sheet_id == sheet_id)
            .ok_or_else(|| AppError::BadRequest(format!("No sheet with id: {sheet_id}")))
    }

    fn reindex(&mut self) {
        for (i, tab) in self.sheets.iter_mut().enumerate() {
            tab.properties.index = i as i64;
        }
    }
}

/// Body values as rows, transposing column-major input
fn as_rows(body: &ValueRange) -> Vec<Vec<String>> {
    match body.major_dimension {
        Some(MajorDimension::Columns) => {
            let height = body.values.iter().map(Vec::len).max().unwrap_or(0);
            (0..height)
                .map(|r| {
                    body.values
                        .iter()
                        .map(|col| col.get(r).cloned().unwrap_or_default())
                        .collect()
                })
                .collect()
        }
        _ => body.values.clone(),
    }
}

/// Whether a block placed at (`top`, `left`) stays inside the grid limits
fn fits(top: usize, left: usize, rows: &[Vec<String>]) -> bool {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    top + rows.len() <= MAX_ROWS && left + width <= MAX_COLUMNS
}

fn exceeds_limits(notation: &str) -> AppError {
    AppError::BadRequest(format!(
        "Range ({notation}) exceeds grid limits. Max rows: {MAX_ROWS}, max columns: {MAX_COLUMNS}"
    ))
}

fn write_block(grid: &mut Vec<Vec<String>>, top: usize, left: usize, rows: &[Vec<String>]) {
    if grid.len() < top + rows.len() {
        grid.resize(top + rows.len(), Vec::new());
    }
    for (i, row) in rows.iter().enumerate() {
        let target = &mut grid[top + i];
        if target.len() < left + row.len() {
            target.resize(left + row.len(), String::new());
        }
        for (j, value) in row.iter().enumerate() {
            target[left + j].clone_from(value);
        }
    }
}

fn trim(values: &mut Vec<Vec<String>>) {
    for row in values.iter_mut() {
        while row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }
    }
    while values.last().is_some_and(|r| r.is_empty()) {
        values.pop();
    }
}

fn updated(
    id: &str,
    sheet: &str,
    top: usize,
    left: usize,
    rows: &[Vec<String>],
) -> UpdateValuesResponse {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let updated_range = (width > 0).then(|| {
        RangeAddress {
            sheet: sheet.to_string(),
            start: Some(CellRef::new(top as u32 + 1, left as u32 + 1)),
            end: Some(CellRef::new((top + rows.len()) as u32, (left + width) as u32)),
        }
        .to_string()
    });

    UpdateValuesResponse {
        spreadsheet_id: Some(id.to_string()),
        updated_range,
        updated_rows: rows.iter().filter(|r| !r.is_empty()).count() as u32,
        updated_columns: width as u32,
        updated_cells: rows.iter().map(Vec::len).sum::<usize>() as u32,
    }
}
