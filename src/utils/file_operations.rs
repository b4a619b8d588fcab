use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use csv::Writer;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::config::BASE_FILENAME;
use crate::error::Result;
use crate::models::{ExportFormat, TestCaseRow};

const EXCEL_COLUMN_WIDTH: f64 = 30.0;

/// Columnas de todas las filas, en el orden en que aparecen por primera vez
pub fn collect_columns(rows: &[TestCaseRow]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();

    for row in rows {
        for column in row.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }

    columns
}

/// Valores de una fila alineados a las columnas; las celdas faltantes quedan vacías
fn aligned_values<'a>(row: &'a TestCaseRow, columns: &[String]) -> Vec<&'a str> {
    columns
        .iter()
        .map(|column| row.get(column).unwrap_or(""))
        .collect()
}

/// Ruta del archivo de salida con fecha y hora, p. ej. `jira_test_cases_2024-05-01_10-30-00.xlsx`
pub fn timestamped_path(output_dir: &Path, format: ExportFormat, now: DateTime<Local>) -> PathBuf {
    let timestamp = now.format("%Y-%m-%d_%H-%M-%S");
    output_dir.join(format!(
        "{}_{}.{}",
        BASE_FILENAME,
        timestamp,
        format.extension()
    ))
}

/// Guarda las filas en un archivo CSV
pub fn save_to_csv(file_path: &Path, rows: &[TestCaseRow]) -> Result<()> {
    let columns = collect_columns(rows);
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(aligned_values(row, &columns))?;
    }

    writer.flush()?;

    Ok(())
}

/// Guarda las filas en una planilla de Excel con el encabezado en negrita
pub fn save_to_excel(file_path: &Path, rows: &[TestCaseRow]) -> Result<()> {
    let columns = collect_columns(rows);
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Test Cases")?;

    for (col, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column, &header_format)?;
        worksheet.set_column_width(col as u16, EXCEL_COLUMN_WIDTH)?;
    }

    for (i, row) in rows.iter().enumerate() {
        for (col, value) in aligned_values(row, &columns).into_iter().enumerate() {
            worksheet.write_string(i as u32 + 1, col as u16, value)?;
        }
    }

    workbook.save(file_path)?;

    Ok(())
}

/// Exporta las filas al formato elegido dentro de `output_dir` y devuelve la ruta creada.
/// Sin filas no se crea nada.
pub fn export_rows(
    rows: &[TestCaseRow],
    format: ExportFormat,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        return Ok(None);
    }

    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    let path = timestamped_path(output_dir, format, Local::now());

    match format {
        ExportFormat::Excel => save_to_excel(&path, rows)?,
        ExportFormat::Csv => save_to_csv(&path, rows)?,
    }

    info!(path = %path.display(), rows = rows.len(), %format, "archivo exportado");
    Ok(Some(path))
}
