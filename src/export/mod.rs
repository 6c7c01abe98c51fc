//! Spreadsheet export of the whole job store.

use crate::job_store::Job;
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const WORKSHEET_NAME: &str = "jobs";

/// Header labels, in the order columns are written.
pub const EXPORT_COLUMNS: [&str; 11] = [
    "id",
    "Title",
    "Teaser",
    "Company Name",
    "Location",
    "Work Type",
    "Role",
    "Salary",
    "keyword",
    "Bullet Points",
    "Listing Date",
];

const LISTING_DATE_COLUMN: u16 = 10;
const BULLET_POINTS_COLUMN: u16 = 9;

/// Name of the report generated at `at`.
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("job-report-{}.xlsx", at.timestamp())
}

/// Text cells of a job, in [`EXPORT_COLUMNS`] order minus the listing date.
fn text_cells(job: &Job) -> [String; 10] {
    [
        job.id.clone(),
        job.title.clone(),
        job.teaser.clone(),
        job.company_name.clone(),
        job.location.clone(),
        job.work_type.clone(),
        job.role.clone(),
        job.salary.clone(),
        job.keyword.clone(),
        job.bullet_points.join("\n"),
    ]
}

/// Renders `jobs` as an xlsx workbook: one header row, then one row per job.
pub fn render_jobs_xlsx(jobs: &[Job]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let wrap_format = Format::new().set_text_wrap();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(WORKSHEET_NAME)?;

    for (col, title) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }

    for (index, job) in jobs.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, text) in text_cells(job).iter().enumerate() {
            let col = col as u16;
            if col == BULLET_POINTS_COLUMN {
                worksheet.write_string_with_format(row, col, text, &wrap_format)?;
            } else {
                worksheet.write_string(row, col, text)?;
            }
        }
        worksheet.write_datetime_with_format(
            row,
            LISTING_DATE_COLUMN,
            &job.listing_date.naive_utc(),
            &date_format,
        )?;
    }

    worksheet.set_column_width(LISTING_DATE_COLUMN, 20)?;

    workbook.save_to_buffer()
}
