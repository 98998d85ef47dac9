use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Reader};

use crate::error::{KassaError, Result};

/// A single spreadsheet cell, normalized across the calamine and csv readers.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// String form as the field parsers see it. Integral numbers drop the
    /// decimal point so Excel serials print as `45292`, not `45292.0`.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
        }
    }
}

pub type Grid = Vec<Vec<Cell>>;
pub type RawRow = HashMap<String, Cell>;

/// Header labels and data rows derived from a grid for one header-row choice.
#[derive(Debug, Clone)]
pub struct SheetData {
    /// Exposed column names (synthesized placeholders excluded).
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

// Lowercased fragments that mark a header row in bank and card exports.
const HEADER_KEYWORDS: &[&str] = &[
    "amount",
    "belopp",
    "text",
    "description",
    "beskrivning",
    "date",
    "datum",
    "transaction",
    "transaktion",
];

const HEADER_SCAN_LIMIT: usize = 15;
const PLACEHOLDER_PREFIX: &str = "Column_";

/// Decode a file into a raw cell grid. Spreadsheets go through calamine
/// (first sheet only); `.csv` goes through the csv reader. Any decode failure
/// is fatal — there is nothing to preview.
pub fn read_grid(path: &Path) -> Result<Grid> {
    let is_csv = path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_csv_grid(path)
    } else {
        read_workbook_grid(path)
    }
}

fn read_workbook_grid(path: &Path) -> Result<Grid> {
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| KassaError::SheetDecode(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| KassaError::SheetDecode("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| KassaError::SheetDecode(e.to_string()))?;

    let grid = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Ok(grid)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        other => Cell::Text(other.to_string()),
    }
}

fn read_csv_grid(path: &Path) -> Result<Grid> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let mut grid = Vec::new();
    for result in rdr.records() {
        let record = result?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(grid)
}

/// First row within the scan window containing a known header keyword,
/// falling back to row 0.
pub fn detect_header_row(grid: &Grid) -> usize {
    for (i, row) in grid.iter().take(HEADER_SCAN_LIMIT).enumerate() {
        let hit = row.iter().any(|cell| {
            let text = cell.to_text().to_lowercase();
            !text.is_empty() && HEADER_KEYWORDS.iter().any(|kw| text.contains(kw))
        });
        if hit {
            return i;
        }
    }
    0
}

/// Derive header labels and keyed data rows from the grid. Blank header
/// cells get a synthesized `Column_N` label; rows with no content at all are
/// dropped. Re-running with a different header row re-derives everything
/// from the same grid without re-reading the file.
pub fn project(grid: &Grid, header_row: usize) -> SheetData {
    let Some(header) = grid.get(header_row) else {
        return SheetData { columns: Vec::new(), rows: Vec::new() };
    };

    let labels: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let label = cell.to_text().trim().to_string();
            if label.is_empty() {
                format!("{PLACEHOLDER_PREFIX}{}", i + 1)
            } else {
                label
            }
        })
        .collect();

    let mut rows = Vec::new();
    for raw in grid.iter().skip(header_row + 1) {
        if raw.iter().all(Cell::is_empty) {
            continue;
        }
        let mut row: RawRow = HashMap::new();
        for (idx, label) in labels.iter().enumerate() {
            let cell = raw.get(idx).cloned().unwrap_or(Cell::Empty);
            row.insert(label.clone(), cell);
        }
        rows.push(row);
    }

    let columns = labels
        .into_iter()
        .filter(|c| !c.starts_with(PLACEHOLDER_PREFIX))
        .collect();
    SheetData { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_detect_header_row_skips_preamble() {
        let grid: Grid = vec![
            vec![text("Kontoutdrag"), Cell::Empty],
            vec![Cell::Empty, Cell::Empty],
            vec![text("Datum"), text("Belopp")],
            vec![text("2024-01-05"), Cell::Number(-250.0)],
        ];
        assert_eq!(detect_header_row(&grid), 2);
    }

    #[test]
    fn test_detect_header_row_defaults_to_zero() {
        let grid: Grid = vec![
            vec![text("a"), text("b")],
            vec![text("c"), text("d")],
        ];
        assert_eq!(detect_header_row(&grid), 0);
    }

    #[test]
    fn test_detect_header_row_scan_window() {
        let mut grid: Grid = (0..20).map(|_| vec![text("noise")]).collect();
        grid.push(vec![text("Datum"), text("Belopp")]);
        // Header beyond row 15 is never picked up
        assert_eq!(detect_header_row(&grid), 0);
    }

    #[test]
    fn test_project_keys_rows_and_drops_empty() {
        let grid: Grid = vec![
            vec![text("Datum"), text("Text"), text("Belopp")],
            vec![text("2024-01-05"), text("ICA"), Cell::Number(-250.0)],
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
            vec![text("2024-01-06"), text("LÖN"), Cell::Number(28000.0)],
        ];
        let sheet = project(&grid, 0);
        assert_eq!(sheet.columns, vec!["Datum", "Text", "Belopp"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0]["Text"], text("ICA"));
        assert_eq!(sheet.rows[1]["Belopp"], Cell::Number(28000.0));
    }

    #[test]
    fn test_project_synthesizes_and_hides_placeholders() {
        let grid: Grid = vec![
            vec![text("Datum"), Cell::Empty, text("Belopp")],
            vec![text("2024-01-05"), text("stray"), Cell::Number(-1.0)],
        ];
        let sheet = project(&grid, 0);
        assert_eq!(sheet.columns, vec!["Datum", "Belopp"]);
        // The placeholder key still carries the data
        assert_eq!(sheet.rows[0]["Column_2"], text("stray"));
    }

    #[test]
    fn test_project_reprojection_from_same_grid() {
        let grid: Grid = vec![
            vec![text("junk"), text("junk")],
            vec![text("Datum"), text("Belopp")],
            vec![text("2024-01-05"), Cell::Number(-250.0)],
        ];
        let wrong = project(&grid, 0);
        assert_eq!(wrong.rows.len(), 2);
        let right = project(&grid, 1);
        assert_eq!(right.columns, vec!["Datum", "Belopp"]);
        assert_eq!(right.rows.len(), 1);
    }

    #[test]
    fn test_project_out_of_range_header() {
        let grid: Grid = vec![vec![text("Datum")]];
        let sheet = project(&grid, 5);
        assert!(sheet.columns.is_empty());
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_read_csv_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(&path, "Datum,Text,Belopp\n2024-01-05,ICA,-250\n").unwrap();
        let grid = read_grid(&path).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0], text("Datum"));
        assert_eq!(grid[1][2], text("-250"));
    }

    #[test]
    fn test_read_grid_rejects_garbage_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.xlsx");
        std::fs::write(&path, "definitely not a workbook").unwrap();
        assert!(matches!(read_grid(&path), Err(KassaError::SheetDecode(_))));
    }

    #[test]
    fn test_cell_to_text_number_forms() {
        assert_eq!(Cell::Number(45292.0).to_text(), "45292");
        assert_eq!(Cell::Number(12.5).to_text(), "12.5");
        assert_eq!(Cell::Empty.to_text(), "");
    }
}
