use crate::models::TestCaseRow;

/// Convierte una tabla Markdown en filas de casos de prueba.
///
/// Solo se consideran las líneas que contienen `|`. La primera es el
/// encabezado y la segunda el separador. Una fila se acepta únicamente si
/// tiene tantos campos no vacíos como columnas tiene el encabezado; las demás
/// se descartan sin error.
pub fn parse_markdown_table(md_text: &str) -> Vec<TestCaseRow> {
    let lines: Vec<&str> = md_text
        .trim()
        .lines()
        .filter(|line| line.contains('|'))
        .map(str::trim)
        .collect();

    if lines.len() < 2 {
        return Vec::new();
    }

    let headers = split_fields(lines[0]);

    lines[2..]
        .iter()
        .map(|line| split_fields(line))
        .filter(|fields| fields.len() == headers.len())
        .map(|fields| headers.iter().copied().zip(fields).collect::<TestCaseRow>())
        .collect()
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split('|')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect()
}

/// Reemplaza las etiquetas `<br>` por saltos de línea y recorta el texto
pub fn clean_html_br_tags_and_strip(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .trim()
        .to_string()
}

/// Limpia todos los valores de todas las filas
pub fn clean_rows(rows: &mut [TestCaseRow]) {
    for row in rows.iter_mut() {
        row.map_values(clean_html_br_tags_and_strip);
    }
}
