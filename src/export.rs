//! Excel report export functionality.

use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};
use std::path::Path;

use crate::models::Department;

/// Export the department overview to an Excel file.
/// One row per department with date range, keywords, and staffing count.
pub fn export_departments_to_excel(departments: &[Department], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Departments")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    // Headers
    let headers = ["Id", "Name", "Start Date", "End Date", "Keywords", "Employees", "Notes"];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    // Column widths
    worksheet.set_column_width(0, 8)?; // Id
    worksheet.set_column_width(1, 25)?; // Name
    worksheet.set_column_width(2, 12)?; // Start Date
    worksheet.set_column_width(3, 12)?; // End Date
    worksheet.set_column_width(4, 25)?; // Keywords
    worksheet.set_column_width(5, 10)?; // Employees
    worksheet.set_column_width(6, 40)?; // Notes

    // Data rows
    for (idx, department) in departments.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_number(row, 0, f64::from(department.id))?;
        worksheet.write_string(row, 1, &department.name)?;

        if let Some(date) = department.start_date {
            worksheet.write_string(row, 2, date.to_string())?;
        } else {
            worksheet.write_string(row, 2, "")?;
        }
        if let Some(date) = department.end_date {
            worksheet.write_string(row, 3, date.to_string())?;
        } else {
            worksheet.write_string(row, 3, "")?;
        }

        worksheet.write_string(row, 4, department.keywords.join(", "))?;
        worksheet.write_number(row, 5, department.employees.len() as f64)?;
        worksheet.write_string(row, 6, department.notes.as_deref().unwrap_or(""))?;
    }

    // Autofilter
    if !departments.is_empty() {
        let last_row = departments.len() as u32;
        worksheet.autofilter(0, 0, last_row, 6)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Export the flattened employee roster to an Excel file.
/// Every employee of every department, with contact and address columns.
pub fn export_roster_to_excel(departments: &[Department], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Staff Roster")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    // Headers
    let headers = [
        "Department",
        "Id",
        "First Name",
        "Last Name",
        "Title",
        "Phone",
        "Mail",
        "Locality",
        "Country",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    // Column widths
    worksheet.set_column_width(0, 25)?; // Department
    worksheet.set_column_width(1, 8)?; // Id
    worksheet.set_column_width(2, 18)?; // First Name
    worksheet.set_column_width(3, 18)?; // Last Name
    worksheet.set_column_width(4, 12)?; // Title
    worksheet.set_column_width(5, 18)?; // Phone
    worksheet.set_column_width(6, 30)?; // Mail
    worksheet.set_column_width(7, 18)?; // Locality
    worksheet.set_column_width(8, 18)?; // Country

    // Data rows
    let mut row: u32 = 0;
    for department in departments {
        for employee in &department.employees {
            row += 1;

            worksheet.write_string(row, 0, &department.name)?;
            worksheet.write_number(row, 1, f64::from(employee.id))?;
            worksheet.write_string(row, 2, &employee.first_name)?;
            worksheet.write_string(row, 3, &employee.last_name)?;
            worksheet.write_string(row, 4, employee.title.label())?;
            worksheet.write_string(row, 5, &employee.phone)?;
            worksheet.write_string(row, 6, &employee.mail)?;
            worksheet.write_string(row, 7, employee.locality.as_deref().unwrap_or(""))?;
            worksheet.write_string(row, 8, employee.country.as_deref().unwrap_or(""))?;
        }
    }

    // Autofilter
    if row > 0 {
        worksheet.autofilter(0, 0, row, 8)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}
