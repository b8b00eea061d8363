// ==========================================
// Depot Management - depot list workbook
// ==========================================
// Sheet "Depots": header row 2 at B..F, data from row 3, every cell
// boxed with a medium border. Active (column E) carries a three-color
// scale: lowest red, median white, highest green.
// ==========================================

use crate::domain::Depot;
use chrono::{DateTime, Local, TimeZone};
use rust_xlsxwriter::{
    Color, ConditionalFormat3ColorScale, ConditionalFormatType, Format, FormatAlign,
    FormatBorder, FormatPattern, Workbook, XlsxError,
};

pub const SHEET_NAME: &str = "Depots";
pub const HEADERS: [&str; 5] = ["Id", "Name", "CreatedAt", "Active", "CreatedBy"];
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Header row (0-based; row 2 in the sheet)
pub const HEADER_ROW: u32 = 1;
/// First column (0-based; column B)
pub const FIRST_COL: u16 = 1;
pub const COLUMN_WIDTH: f64 = 22.0;

const HEADER_FILL: u32 = 0x00008B; // dark blue
const BODY_FILL: u32 = 0xF5F5F5; // white smoke
const SCALE_LOW: u32 = 0xFF0000;
const SCALE_MID: u32 = 0xFFFFFF;
const SCALE_HIGH: u32 = 0x00FF00;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Download file name: `{yyyyMMddHHmmss}_Depots.xlsx`
pub fn export_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_Depots.xlsx", at.format("%Y%m%d%H%M%S"))
}

/// CreatedAt as shown in the sheet (local time)
pub fn format_local_timestamp(depot: &Depot) -> String {
    depot
        .created_at
        .with_timezone(&Local)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Medium)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
}

fn body_format() -> Format {
    Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(BODY_FILL))
        .set_border(FormatBorder::Medium)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
}

/// Render depots into an xlsx file held in memory
///
/// Rows keep the order of `depots`.
pub fn build_depot_workbook(depots: &[Depot]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = header_format();
    let body = body_format();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    worksheet.set_column_range_width(FIRST_COL, FIRST_COL + 4, COLUMN_WIDTH)?;

    for (offset, title) in (0u16..).zip(HEADERS) {
        worksheet.write_string_with_format(HEADER_ROW, FIRST_COL + offset, title, &header)?;
    }

    let mut row = HEADER_ROW + 1;
    for depot in depots {
        let col = FIRST_COL;
        worksheet.write_number_with_format(row, col, depot.id as f64, &body)?;
        worksheet.write_string_with_format(
            row,
            col + 1,
            depot.name.clone().unwrap_or_default(),
            &body,
        )?;
        worksheet.write_string_with_format(row, col + 2, format_local_timestamp(depot), &body)?;
        worksheet.write_number_with_format(row, col + 3, u8::from(depot.is_active()), &body)?;
        worksheet.write_string_with_format(
            row,
            col + 4,
            depot.created_by.clone().unwrap_or_default(),
            &body,
        )?;
        row += 1;
    }

    if !depots.is_empty() {
        let scale = ConditionalFormat3ColorScale::new()
            .set_midpoint(ConditionalFormatType::Percentile, 50)
            .set_minimum_color(Color::RGB(SCALE_LOW))
            .set_midpoint_color(Color::RGB(SCALE_MID))
            .set_maximum_color(Color::RGB(SCALE_HIGH));
        let active_col = FIRST_COL + 3;
        worksheet.add_conditional_format(HEADER_ROW + 1, active_col, row - 1, active_col, &scale)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_file_name_uses_compact_timestamp() {
        let at = FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 7, 14, 5, 9)
            .unwrap();
        assert_eq!(export_file_name(&at), "20240307140509_Depots.xlsx");
    }

    #[test]
    fn test_workbook_is_zip_container() {
        let bytes = build_depot_workbook(&[Depot::new("North")]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
