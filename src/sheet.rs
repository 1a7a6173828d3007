use chrono::{DateTime, FixedOffset, Utc};
use rust_xlsxwriter::{Color, Format, FormatUnderline, Url, Workbook, XlsxError};

use crate::models::Submission;
use crate::storage::StoredDocument;

pub const SHEET_NAME: &str = "Submission";
pub const LINK_TEXT: &str = "View Document";

/// Longest string an XLSX cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Header and width of each column, in order.
pub const COLUMNS: [(&str, f64); 6] = [
    ("Name", 25.0),
    ("Date of Birth", 20.0),
    ("Phone", 15.0),
    ("ID Number", 20.0),
    ("Document Link", 25.0),
    ("Submitted At", 25.0),
];

const LINK_COLUMN: u16 = 4;

/// One spreadsheet row describing a stored submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub id_number: String,
    pub document_url: String,
    pub submitted_at: String,
}

impl SubmissionRecord {
    pub fn new(
        submission: &Submission,
        stored: &StoredDocument,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            name: fit_cell(&submission.name),
            date_of_birth: fit_cell(&submission.date_of_birth),
            phone: fit_cell(&submission.phone),
            id_number: fit_cell(&submission.id_number),
            document_url: stored.secure_url.clone(),
            submitted_at: format_timestamp(now, offset),
        }
    }
}

// Counted in chars so a cut never lands inside a code point.
fn fit_cell(value: &str) -> String {
    value.chars().take(MAX_CELL_CHARS).collect()
}

/// Render as `D/M/YYYY, h:mm:ss am` in the given offset.
pub fn format_timestamp(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset)
        .format("%-d/%-m/%Y, %-I:%M:%S %P")
        .to_string()
}

/// Build the single-sheet workbook for a record and serialize it to XLSX bytes.
pub fn build_workbook(record: &SubmissionRecord) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)?;
        worksheet.write_string_with_format(0, col, *title, &header)?;
    }

    worksheet.write_string(1, 0, &record.name)?;
    worksheet.write_string(1, 1, &record.date_of_birth)?;
    worksheet.write_string(1, 2, &record.phone)?;
    worksheet.write_string(1, 3, &record.id_number)?;

    let link = Format::new()
        .set_font_color(Color::Blue)
        .set_underline(FormatUnderline::Single);
    worksheet.write_url_with_format(
        1,
        LINK_COLUMN,
        Url::new(record.document_url.as_str()).set_text(LINK_TEXT),
        &link,
    )?;

    worksheet.write_string(1, 5, &record.submitted_at)?;

    workbook.save_to_buffer()
}
