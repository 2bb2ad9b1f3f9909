// Sayaç CRM - core/export.rs
//
// CSV and JSON export of (usually filtered) records.
// Core layer: renders to strings or any Write trait object; the only file
// it touches is the one `write_csv_file` is asked to create.
//
// CSV layout is fixed: the header row is always first and always lists the
// 17 columns in `CSV_COLUMNS` order. Cells are quoted only when they contain
// a comma, a quote, or `\n`; embedded quotes are doubled. Rows are
// joined with `\n` and the output carries no trailing newline.

use crate::core::model::{AnswerField, Record};
use crate::util::constants::{CSV_FILE_PREFIX, UTF8_BOM};
use crate::util::error::ExportError;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvColumn {
    Answer(AnswerField),
    Segment,
    ChurnRisk,
    Pipeline,
    CreatedAt,
    PriceNumeric,
}

/// Export column order. Do not reorder: downstream spreadsheets rely on it.
pub const CSV_COLUMNS: [CsvColumn; 17] = [
    CsvColumn::Answer(AnswerField::Instagram),
    CsvColumn::Answer(AnswerField::ContactName),
    CsvColumn::Answer(AnswerField::Phone),
    CsvColumn::Answer(AnswerField::BusinessName),
    CsvColumn::Answer(AnswerField::BusinessType),
    CsvColumn::Answer(AnswerField::EntryQuestion),
    CsvColumn::Answer(AnswerField::PriceOffer),
    CsvColumn::Answer(AnswerField::PriceOther),
    CsvColumn::Answer(AnswerField::ValueReason),
    CsvColumn::Answer(AnswerField::Objection),
    CsvColumn::Answer(AnswerField::SaleHappened),
    CsvColumn::Answer(AnswerField::PaymentType),
    CsvColumn::Segment,
    CsvColumn::ChurnRisk,
    CsvColumn::Pipeline,
    CsvColumn::CreatedAt,
    CsvColumn::PriceNumeric,
];

impl CsvColumn {
    /// Header name (the record's JSON key).
    pub fn header(&self) -> &'static str {
        match self {
            CsvColumn::Answer(field) => field.key(),
            CsvColumn::Segment => "segment",
            CsvColumn::ChurnRisk => "churnRisk",
            CsvColumn::Pipeline => "pipeline",
            CsvColumn::CreatedAt => "createdAt",
            CsvColumn::PriceNumeric => "priceNumeric",
        }
    }

    /// Cell value for `record`, unescaped. `None` renders as an empty cell.
    pub fn value(&self, record: &Record) -> Option<String> {
        match self {
            CsvColumn::Answer(field) => record.answers.get(*field).map(str::to_string),
            CsvColumn::Segment => Some(record.segment.label().to_string()),
            CsvColumn::ChurnRisk => Some(record.churn_risk.label().to_string()),
            CsvColumn::Pipeline => Some(record.pipeline.label().to_string()),
            CsvColumn::CreatedAt => Some(record.created_at.clone()),
            CsvColumn::PriceNumeric => record.price_numeric.map(|n| n.to_string()),
        }
    }
}

/// The header line exactly as written to every CSV export.
pub fn csv_header_line() -> String {
    CSV_COLUMNS
        .iter()
        .map(CsvColumn::header)
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape one cell: embedded quotes are doubled, and the cell is wrapped in
/// quotes when it contains a comma, a quote, or `\n`. A lone `\r` is left
/// bare.
pub fn escape_cell(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    if escaped.contains([',', '"', '\n']) {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

/// Render records as CSV text (no BOM).
pub fn to_csv<'a, I>(records: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buf = Vec::new();
    let mut count = 0usize;
    {
        // Cells are escaped by `escape_cell`; the writer must not quote again.
        let mut csv_writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);

        csv_writer
            .write_record(CSV_COLUMNS.iter().map(CsvColumn::header))
            .map_err(|e| ExportError::Csv { source: e })?;

        for record in records {
            let row: Vec<String> = CSV_COLUMNS
                .iter()
                .map(|col| col.value(record).map(|v| escape_cell(&v)).unwrap_or_default())
                .collect();
            csv_writer
                .write_record(&row)
                .map_err(|e| ExportError::Csv { source: e })?;
            count += 1;
        }

        csv_writer.flush().map_err(|e| ExportError::Csv { source: e.into() })?;
    }

    let mut text = String::from_utf8(buf).map_err(|e| ExportError::Encoding { source: e })?;

    // The writer terminates every row; the export format does not.
    if text.ends_with('\n') {
        text.pop();
    }

    tracing::debug!(rows = count, bytes = text.len(), "CSV rendered");
    Ok(text)
}

/// Export records as CSV to any writer (no BOM). Returns the row count.
pub fn export_csv<'a, I, W>(records: I, mut writer: W, export_path: &Path) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a Record>,
    W: Write,
{
    let records: Vec<&Record> = records.into_iter().collect();
    let text = to_csv(records.iter().copied())?;
    writer
        .write_all(text.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })?;
    Ok(records.len())
}

/// File name for a CSV export made on `date`.
pub fn csv_file_name(date: NaiveDate) -> String {
    format!("{CSV_FILE_PREFIX}-{}.csv", date.format("%Y-%m-%d"))
}

/// Write a BOM-prefixed CSV file into `dir`, creating the directory if
/// needed. An existing export with the same date is overwritten.
pub fn write_csv_file<'a, I>(records: I, dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let path = dir.join(csv_file_name(date));
    let io_err = |e: std::io::Error| ExportError::Io {
        path: path.clone(),
        source: e,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut file = std::fs::File::create(&path).map_err(io_err)?;
    file.write_all(UTF8_BOM).map_err(io_err)?;
    let rows = export_csv(records, &mut file, &path)?;

    tracing::info!(path = %path.display(), rows, "CSV export written");
    Ok(path)
}

/// Render records as a pretty-printed JSON array (clipboard payload).
pub fn to_json<'a, I>(records: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let records: Vec<&Record> = records.into_iter().collect();
    serde_json::to_string_pretty(&records).map_err(|e| ExportError::Json { source: e })
}

/// Export records as a JSON array to any writer. Returns the record count.
pub fn export_json<'a, I, W>(records: I, writer: W) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a Record>,
    W: Write,
{
    let records: Vec<&Record> = records.into_iter().collect();
    serde_json::to_writer_pretty(writer, &records).map_err(|e| ExportError::Json { source: e })?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Answers, Pipeline};
    use tempfile::TempDir;
    use uuid::Uuid;

    const HEADER: &str = "instagram,contactName,phone,businessName,businessType,entryQuestion,\
priceOffer,priceOther,valueReason,objection,saleHappened,paymentType,segment,churnRisk,\
pipeline,createdAt,priceNumeric";

    fn tricky_record() -> Record {
        Record::classify(
            Uuid::nil(),
            Answers {
                instagram: Some("@test,kisi".to_string()),
                contact_name: Some("Alihan \"AA\"".to_string()),
                phone: Some("+90 555 555 55 55".to_string()),
                business_name: Some("Satır\nAtlayan".to_string()),
                business_type: Some("Kafe".to_string()),
                entry_question: Some("Fiyat nedir?".to_string()),
                price_offer: Some("6000".to_string()),
                price_other: Some(String::new()),
                value_reason: Some("Reklam".to_string()),
                objection: Some("Pahalı".to_string()),
                sale_happened: Some("Hayır".to_string()),
                payment_type: Some("Direkt".to_string()),
            },
            Pipeline::Candidate,
            "1970-01-01T00:00:00.000Z".to_string(),
        )
    }

    #[test]
    fn test_header_is_fixed() {
        assert_eq!(csv_header_line(), HEADER);
        assert_eq!(to_csv(std::iter::empty::<&Record>()).unwrap(), HEADER);
    }

    #[test]
    fn test_csv_escaping() {
        let records = vec![tricky_record()];
        let csv = to_csv(&records).unwrap();

        assert_eq!(csv.split('\n').next(), Some(HEADER));
        assert!(csv.contains("\"@test,kisi\""), "comma cell must be quoted: {csv}");
        assert!(csv.contains("\"Alihan \"\"AA\"\"\""), "quotes must be doubled: {csv}");
        assert!(csv.contains("\"Satır\nAtlayan\""), "newline kept inside quotes: {csv}");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_escape_cell_rule() {
        assert_eq!(escape_cell("düz metin"), "düz metin");
        assert_eq!(escape_cell("a,b"), "\"a,b\"");
        assert_eq!(escape_cell("6\"lık"), "\"6\"\"lık\"");
        assert_eq!(escape_cell("a\nb"), "\"a\nb\"");
        assert_eq!(escape_cell("a\rb"), "a\rb");
        assert_eq!(escape_cell(""), "");
    }

    #[test]
    fn test_carriage_return_cell_is_not_quoted() {
        let mut record = tricky_record();
        record.answers.phone = Some("a\rb".to_string());
        let csv = to_csv([&record]).unwrap();
        assert!(csv.contains(",a\rb,"), "got: {csv:?}");
    }

    #[test]
    fn test_csv_row_values() {
        let records = vec![tricky_record()];
        let csv = to_csv(&records).unwrap();
        // Pahalı +2, Fiyat nedir? +1, price 6000 +1 => Yüksek
        assert!(csv.ends_with(
            ",Kafe,Yüksek,Aday Cari,1970-01-01T00:00:00.000Z,6000"
        ), "got: {csv}");
        assert!(csv.contains(",6000,,Reklam,"), "empty priceOther cell: {csv}");
    }

    #[test]
    fn test_csv_absent_values_are_empty() {
        let record = Record::classify(
            Uuid::nil(),
            Answers::default(),
            Pipeline::Candidate,
            "t".to_string(),
        );
        let csv = to_csv([&record]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, ",,,,,,,,,,,,Diğer,Düşük,Aday Cari,t,");
    }

    #[test]
    fn test_csv_file_has_bom_and_dated_name() {
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let records = vec![tricky_record()];

        let path = write_csv_file(&records, dir.path(), date).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "sayac-makinesi-crm-2025-03-09.csv"
        );

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, to_csv(&records).unwrap());
    }

    #[test]
    fn test_json_export_is_pretty_full_records() {
        let records = vec![tricky_record()];
        let json = to_json(&records).unwrap();
        assert!(json.starts_with("[\n  {"));
        assert!(json.contains("\"churnRisk\": \"Yüksek\""));

        let parsed: Vec<Record> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_export_json_writer_counts() {
        let records = vec![tricky_record(), tricky_record()];
        let mut buf = Vec::new();
        let count = export_json(&records, &mut buf).unwrap();
        assert_eq!(count, 2);
        assert!(String::from_utf8(buf).unwrap().contains("Alihan"));
    }
}
