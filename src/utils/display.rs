use colored::*;

use crate::models::TestCaseRow;
use crate::utils::file_operations::collect_columns;

const MAX_CELL_WIDTH: usize = 40;

/// Ajusta una celda a una sola línea y la recorta si es demasiado larga
fn fit_cell(value: &str) -> String {
    let single_line = value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");

    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }

    let mut truncated: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
    truncated.push('…');
    truncated
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

/// Arma las líneas de la tabla (encabezado, separador y filas)
pub fn render_table(rows: &[TestCaseRow]) -> Vec<String> {
    let columns = collect_columns(rows);
    if columns.is_empty() {
        return Vec::new();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| fit_cell(row.get(c).unwrap_or("")))
                .collect()
        })
        .collect();

    // Calcular el ancho de cada columna
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(
        columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        lines.push(
            row.iter()
                .zip(&widths)
                .map(|(c, w)| pad(c, *w))
                .collect::<Vec<_>>()
                .join("  "),
        );
    }

    lines
}

/// Muestra las filas generadas en la terminal
pub fn print_rows(rows: &[TestCaseRow]) {
    let lines = render_table(rows);

    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
    println!();
}
