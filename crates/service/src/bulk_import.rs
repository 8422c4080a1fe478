//! Tabular upload parsing for collection records.
//!
//! The file is decoded into a header plus rows of loosely typed cells, then
//! each row is coerced into a [`NewCollection`] on its own so that one bad
//! row never hides the others.

use std::io::Cursor;
use std::str::FromStr;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use models::collection::{Branch, NewCollection, Service, Status};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::ServiceError;

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "invoice_number",
    "company_id",
    "customer_name",
    "user_id",
    "service",
    "invoice_date",
    "due_date",
    "amount",
    "branch",
];

const INVALID_FORMAT: &str = "Invalid file format. Use CSV or Excel (.xlsx, .xls)";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%m/%d/%Y %H:%M:%S"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Spreadsheet,
}

impl UploadFormat {
    /// Detection is by extension only; content is never sniffed.
    pub fn from_filename(name: &str) -> Result<Self, ServiceError> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(Self::Spreadsheet)
        } else {
            Err(ServiceError::invalid(INVALID_FORMAT))
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    fn text(s: &str) -> Self {
        let t = s.trim();
        if t.is_empty() { Cell::Empty } else { Cell::Text(t.to_string()) }
    }

    pub fn is_blank(&self) -> bool { matches!(self, Cell::Empty) }

    fn describe(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::DateTime(d) => d.to_string(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(d: &Data) -> Self {
        match d {
            Data::Empty => Cell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => dt.as_datetime().map_or(Cell::Float(dt.as_f64()), Cell::DateTime),
            Data::Error(e) => Cell::Text(format!("{e:?}")),
        }
    }
}

/// Header plus raw data rows. A row is `Err` when the file itself could not
/// be decoded at that position.
#[derive(Debug)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

#[derive(Debug)]
pub struct SheetRow {
    /// 1-based record index with the header counted as row 1. Blank lines
    /// and line breaks inside quoted fields do not shift it.
    pub number: usize,
    pub cells: Result<Vec<Cell>, String>,
}

impl Sheet {
    pub fn read(format: UploadFormat, content: &[u8]) -> Result<Self, ServiceError> {
        match format {
            UploadFormat::Csv => read_csv(content),
            UploadFormat::Spreadsheet => read_spreadsheet(content),
        }
    }

    pub fn missing_columns(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .into_iter()
            .filter(|c| !self.headers.iter().any(|h| h == c))
            .collect()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn read_csv(content: &[u8]) -> Result<Sheet, ServiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);
    let headers = reader
        .headers()
        .map_err(|e| ServiceError::invalid(format!("Unreadable CSV header: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let rows = reader
        .records()
        .enumerate()
        .map(|(idx, rec)| SheetRow {
            number: idx + 2,
            cells: rec.map(|r| r.iter().map(Cell::text).collect()).map_err(|e| e.to_string()),
        })
        .collect();
    Ok(Sheet { headers, rows })
}

fn read_spreadsheet(content: &[u8]) -> Result<Sheet, ServiceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(content.to_vec()))
        .map_err(|e| ServiceError::invalid(format!("Unreadable spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ServiceError::invalid("Spreadsheet has no worksheets"))?
        .map_err(|e| ServiceError::invalid(format!("Unreadable spreadsheet: {e}")))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|r| r.iter().map(|c| Cell::from(c).describe()).collect())
        .unwrap_or_default();
    let rows = rows
        .enumerate()
        .map(|(idx, r)| SheetRow { number: idx + 2, cells: Ok(r.iter().map(Cell::from).collect()) })
        .collect();
    Ok(Sheet { headers, rows })
}

/// One coerced data row ready for insertion.
#[derive(Debug)]
pub struct ParsedRow {
    pub number: usize,
    pub record: Result<NewCollection, String>,
}

/// Detect the format, check the header and coerce every non-blank row.
pub fn parse_upload(filename: &str, content: &[u8]) -> Result<Vec<ParsedRow>, ServiceError> {
    let format = UploadFormat::from_filename(filename)?;
    let sheet = Sheet::read(format, content)?;
    let missing = sheet.missing_columns();
    if !missing.is_empty() {
        return Err(ServiceError::invalid(format!("Missing required columns: {}", missing.join(", "))));
    }

    let rows = sheet
        .rows
        .iter()
        .filter(|row| !matches!(&row.cells, Ok(cells) if cells.iter().all(Cell::is_blank)))
        .map(|row| ParsedRow {
            number: row.number,
            record: row.cells.clone().and_then(|cells| coerce_row(&sheet, &cells)),
        })
        .collect();
    Ok(rows)
}

static EMPTY: Cell = Cell::Empty;

struct RowView<'a> {
    sheet: &'a Sheet,
    cells: &'a [Cell],
}

impl RowView<'_> {
    fn get(&self, name: &str) -> &Cell {
        self.sheet
            .column(name)
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&EMPTY)
    }

    fn text(&self, name: &str) -> Result<String, String> {
        match self.get(name) {
            Cell::Empty => Err(format!("{name}: value is required")),
            Cell::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
            other => Ok(other.describe()),
        }
    }

    fn int(&self, name: &str) -> Result<i32, String> {
        let bad = || format!("{name}: invalid integer '{}'", self.get(name).describe());
        match self.get(name) {
            Cell::Empty => Err(format!("{name}: value is required")),
            Cell::Int(i) => i32::try_from(*i).map_err(|_| bad()),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => Ok(*f as i32),
            Cell::Text(s) => s
                .parse::<i32>()
                .or_else(|_| match s.parse::<f64>() {
                    Ok(f) if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => Ok(f as i32),
                    _ => Err(bad()),
                }),
            _ => Err(bad()),
        }
    }

    fn decimal(&self, name: &str) -> Result<Option<Decimal>, String> {
        let bad = || format!("{name}: invalid number '{}'", self.get(name).describe());
        match self.get(name) {
            Cell::Empty => Ok(None),
            Cell::Int(i) => Ok(Some(Decimal::from(*i))),
            Cell::Float(f) => Decimal::try_from(*f).map(Some).map_err(|_| bad()),
            Cell::Text(s) => Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .map(Some)
                .map_err(|_| bad()),
            Cell::DateTime(_) => Err(bad()),
        }
    }

    fn date(&self, name: &str) -> Result<Option<NaiveDate>, String> {
        match self.get(name) {
            Cell::Empty => Ok(None),
            Cell::DateTime(dt) => Ok(Some(dt.date())),
            Cell::Text(s) => parse_date(s)
                .map(Some)
                .ok_or_else(|| format!("{name}: invalid date '{s}'")),
            other => Err(format!("{name}: invalid date '{}'", other.describe())),
        }
    }

    fn required_date(&self, name: &str) -> Result<NaiveDate, String> {
        self.date(name)?.ok_or_else(|| format!("{name}: value is required"))
    }

    fn parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>, String>
    where
        T::Err: std::fmt::Display,
    {
        match self.get(name) {
            Cell::Empty => Ok(None),
            other => other.describe().parse::<T>().map(Some).map_err(|e| e.to_string()),
        }
    }
}

fn coerce_row(sheet: &Sheet, cells: &[Cell]) -> Result<NewCollection, String> {
    let row = RowView { sheet, cells };
    Ok(NewCollection {
        invoice_number: row.text("invoice_number")?,
        company_id: row.int("company_id")?,
        customer_name: row.text("customer_name")?,
        user_id: row.int("user_id")?,
        service: row.parsed::<Service>("service")?.ok_or("service: value is required")?,
        invoice_date: row.required_date("invoice_date")?,
        due_date: row.required_date("due_date")?,
        amount: row.decimal("amount")?.ok_or("amount: value is required")?,
        amount_paid: row.decimal("amount_paid")?.unwrap_or(Decimal::ZERO),
        status: row.parsed::<Status>("status")?.unwrap_or_default(),
        last_partial_payment_date: row.date("last_partial_payment_date")?,
        branch: row.parsed::<Branch>("branch")?.ok_or("branch: value is required")?,
    })
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| DATETIME_FORMATS.iter().find_map(|f| NaiveDateTime::parse_from_str(s, f).ok().map(|d| d.date())))
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BulkImportSummary {
    pub success: bool,
    pub total_rows: usize,
    pub inserted: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

impl BulkImportSummary {
    pub fn new(total_rows: usize, inserted: usize, errors: Vec<RowError>) -> Self {
        Self { success: inserted > 0, total_rows, inserted, failed: errors.len(), errors }
    }
}
