/// Columnas que se le piden al modelo, en orden
pub const GENERATED_COLUMNS: [&str; 6] = [
    "Test Case ID",
    "Test Scenario",
    "Preconditions",
    "Steps",
    "Expected Result",
    "Priority",
];

pub const JIRA_ID: &str = "Jira ID";
pub const STORY_SUMMARY: &str = "Story Summary";

/// Fila de caso de prueba: columna -> valor, conservando el orden de inserción
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCaseRow {
    fields: Vec<(String, String)>,
}

impl TestCaseRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta o reemplaza el valor de una columna
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    /// Aplica una transformación a todos los valores
    pub fn map_values<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        for (_, value) in self.fields.iter_mut() {
            *value = f(value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for TestCaseRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = TestCaseRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_replaces_in_place() {
        let mut row = TestCaseRow::new();
        row.insert("Test Case ID", "TC-01");
        row.insert("Priority", "High");
        row.insert(JIRA_ID, "QA-1");
        row.insert("Priority", "Low");

        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["Test Case ID", "Priority", JIRA_ID]);
        assert_eq!(row.get("Priority"), Some("Low"));
    }

    #[test]
    fn map_values_touches_every_cell() {
        let mut row: TestCaseRow = [("A", " x "), ("B", "y ")].into_iter().collect();
        row.map_values(|v| v.trim().to_uppercase());

        assert_eq!(row.get("A"), Some("X"));
        assert_eq!(row.get("B"), Some("Y"));
    }
}
