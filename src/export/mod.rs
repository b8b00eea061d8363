// ==========================================
// Depot Management - spreadsheet export
// ==========================================

pub mod depot_workbook;

pub use depot_workbook::{
    build_depot_workbook, export_file_name, format_local_timestamp, HEADERS, SHEET_NAME,
    XLSX_CONTENT_TYPE,
};
