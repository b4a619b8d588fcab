use clap::ValueEnum;
use std::fmt;

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 5;
pub const DEFAULT_DEPTH: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestType {
    Functional,
    Security,
    Performance,
    Regression,
}

impl TestType {
    pub const ALL: [TestType; 4] = [
        TestType::Functional,
        TestType::Security,
        TestType::Performance,
        TestType::Regression,
    ];
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::Functional => write!(f, "Functional"),
            TestType::Security => write!(f, "Security"),
            TestType::Performance => write!(f, "Performance"),
            TestType::Regression => write!(f, "Regression"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Excel => write!(f, "Excel"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

/// Opciones de generación elegidas por el usuario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub depth: u8,
    pub test_types: Vec<TestType>,
}

impl GenerationOptions {
    pub fn new(depth: u8, test_types: Vec<TestType>) -> Self {
        GenerationOptions {
            depth: depth.clamp(MIN_DEPTH, MAX_DEPTH),
            test_types,
        }
    }

    /// Tipos separados por coma; sin selección se usa "Functional"
    pub fn test_types_label(&self) -> String {
        if self.test_types.is_empty() {
            return TestType::Functional.to_string();
        }

        self.test_types
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions::new(DEFAULT_DEPTH, vec![TestType::Functional])
    }
}
