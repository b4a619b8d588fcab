use std::path::{Path, PathBuf};

use clap::Args;
use colored::*;
use indicatif::ProgressBar;
use inquire::{InquireError, MultiSelect, Select};
use tracing::info;

use crate::clients::{GeminiClient, JiraClient, TextGenerator};
use crate::clients::jira::DEFAULT_MAX_RESULTS;
use crate::config::{Settings, OUTPUT_DIR};
use crate::error::Result;
use crate::models::{
    ExportFormat, GenerationOptions, Story, TestCaseRow, TestType, DEFAULT_DEPTH, JIRA_ID,
    MAX_DEPTH, MIN_DEPTH, STORY_SUMMARY,
};
use crate::utils::{
    build_prompt, clean_rows, export_rows, generate_with_retry, parse_markdown_table, print_rows,
    RetryPolicy,
};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Proyecto de Jira (por defecto PROJECT_KEY)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Clave de historia a procesar; se puede repetir. Sin claves se procesan todas
    #[arg(short = 'k', long = "story")]
    pub stories: Vec<String>,

    /// Filtrar historias por estado, p. ej. "To Do"
    #[arg(short, long)]
    pub status: Option<String>,

    /// Cantidad máxima de historias a buscar
    #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub limit: u32,

    /// Profundidad de los casos de prueba (1-5)
    #[arg(short, long, default_value_t = DEFAULT_DEPTH,
          value_parser = clap::value_parser!(u8).range((MIN_DEPTH as i64)..=(MAX_DEPTH as i64)))]
    pub depth: u8,

    /// Tipos de casos de prueba; se puede repetir
    #[arg(short = 't', long = "test-type", value_enum)]
    pub test_types: Vec<TestType>,

    /// Formato de exportación
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Excel)]
    pub format: ExportFormat,

    /// Directorio de salida
    #[arg(short, long, default_value = OUTPUT_DIR)]
    pub output_dir: PathBuf,
}

/// Genera los casos de prueba de cada historia, una por una.
///
/// Las historias cuyo modelo no responde no aportan filas. A cada fila se le
/// agregan la clave y el resumen de la historia. Los avisos (historia en curso,
/// reintentos) se entregan a `report`.
pub fn generate_all<G, R>(
    stories: &[Story],
    options: &GenerationOptions,
    generator: &G,
    policy: &RetryPolicy,
    progress: &ProgressBar,
    mut report: R,
) -> Vec<TestCaseRow>
where
    G: TextGenerator + ?Sized,
    R: FnMut(&str),
{
    let mut all_rows = Vec::new();

    for story in stories {
        progress.set_message(story.key.clone());
        report(
            &format!("🧩 Generando casos de prueba para {}: {}", story.key, story.summary)
                .blue()
                .to_string(),
        );

        let prompt = build_prompt(story, options);
        let table = generate_with_retry(generator, &prompt, policy, |attempt, e| {
            report(
                &format!(
                    "⚠️ Reintento {}/{} por error: {}",
                    attempt, policy.max_attempts, e
                )
                .yellow()
                .to_string(),
            );
        });

        let rows = parse_markdown_table(&table);
        info!(story = %story.key, rows = rows.len(), "casos de prueba generados");

        for mut row in rows {
            row.insert(JIRA_ID, story.key.as_str());
            row.insert(STORY_SUMMARY, story.summary.as_str());
            all_rows.push(row);
        }

        progress.inc(1);
    }

    all_rows
}

/// Imprime una línea sin romper la barra de progreso.
/// Con la barra oculta (salida redirigida) la línea se imprime igual.
fn print_above(progress: &ProgressBar, line: &str) {
    progress.suspend(|| println!("{}", line));
}

/// Genera, limpia, muestra y exporta. Devuelve la ruta creada, o `None` si no
/// hubo filas (en ese caso no se escribe ningún archivo).
pub fn generate_and_export<G>(
    stories: &[Story],
    options: &GenerationOptions,
    generator: &G,
    policy: &RetryPolicy,
    format: ExportFormat,
    output_dir: &Path,
) -> Result<Option<PathBuf>>
where
    G: TextGenerator + ?Sized,
{
    let progress = ProgressBar::new(stories.len() as u64);
    let mut rows = generate_all(stories, options, generator, policy, &progress, |line| {
        print_above(&progress, line)
    });
    progress.finish_and_clear();

    if rows.is_empty() {
        println!(
            "{}",
            "⚠️ No se generaron casos de prueba. Intenta de nuevo.".yellow()
        );
        return Ok(None);
    }

    clean_rows(&mut rows);

    println!(
        "{}",
        format!("✅ Se generaron {} casos de prueba correctamente.", rows.len()).green()
    );
    print_rows(&rows);

    export_rows(&rows, format, output_dir)
}

/// Genera, muestra y exporta los casos de prueba de las historias dadas
pub fn run_generation(
    settings: &Settings,
    stories: &[Story],
    options: &GenerationOptions,
    format: ExportFormat,
    output_dir: &Path,
) -> Result<()> {
    let gemini = GeminiClient::from_settings(settings)?;

    println!("{}", "🧠 Generando casos de prueba... por favor espera...".blue());

    let exported = generate_and_export(
        stories,
        options,
        &gemini,
        &RetryPolicy::default(),
        format,
        output_dir,
    )?;

    if let Some(path) = exported {
        println!(
            "{}",
            format!("✅ Archivo {} creado: {}", format, path.display()).green()
        );
    }

    Ok(())
}

/// Generación no interactiva a partir de los argumentos de línea de comandos
pub fn generate_from_args(settings: &Settings, args: &GenerateArgs) -> Result<()> {
    let jira = JiraClient::from_settings(settings)?;

    let stories = if args.stories.is_empty() {
        let project = args.project.as_deref().unwrap_or(&settings.project_key);
        jira.search_stories(project, args.status.as_deref(), args.limit)?
    } else {
        args.stories
            .iter()
            .map(|key| jira.get_story(key))
            .collect::<Result<Vec<_>>>()?
    };

    if stories.is_empty() {
        println!("{}", "No se encontraron historias de usuario.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("✅ Se cargaron {} historias.", stories.len()).green()
    );

    let options = GenerationOptions::new(args.depth, args.test_types.clone());
    run_generation(settings, &stories, &options, args.format, &args.output_dir)
}

/// Índice del proyecto preseleccionado; si no está en la lista se usa el primero
pub fn default_project_index(projects: &[String], project_key: &str) -> usize {
    projects
        .iter()
        .position(|p| p == project_key)
        .unwrap_or(0)
}

/// Pide un proyecto, con `project_key` preseleccionado.
/// Sin proyectos no se pregunta nada y se devuelve `None`.
pub fn pick_project(
    projects: Vec<String>,
    project_key: &str,
) -> std::result::Result<Option<String>, InquireError> {
    if projects.is_empty() {
        println!("{}", "No hay proyectos de Jira disponibles.".yellow());
        return Ok(None);
    }

    let start = default_project_index(&projects, project_key);
    Select::new("📁 Selecciona un proyecto de Jira:", projects)
        .with_starting_cursor(start)
        .prompt()
        .map(Some)
}

/// Una cancelación del usuario no es un error
pub fn cancelled(e: InquireError) -> Result<()> {
    match e {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            println!("{}", "Operación cancelada.".yellow());
            Ok(())
        }
        other => Err(other.into()),
    }
}

/// Asistente interactivo: proyecto, opciones, historias y exportación
pub fn generate_interactive(settings: &Settings) -> Result<()> {
    let jira = JiraClient::from_settings(settings)?;

    let projects = jira.projects()?;
    let project = match pick_project(projects, &settings.project_key) {
        Ok(Some(project)) => project,
        Ok(None) => return Ok(()),
        Err(e) => return cancelled(e),
    };

    let stories = jira.search_stories(&project, None, DEFAULT_MAX_RESULTS)?;
    if stories.is_empty() {
        println!(
            "{}",
            format!("No se encontraron historias de usuario en el proyecto {}.", project).yellow()
        );
        return Ok(());
    }
    println!(
        "{}",
        format!("✅ Se cargaron {} historias de {}.", stories.len(), project).green()
    );

    // Opciones de generación
    let depths: Vec<u8> = (MIN_DEPTH..=MAX_DEPTH).collect();
    let depth = match Select::new("Profundidad de los casos de prueba:", depths)
        .with_starting_cursor((DEFAULT_DEPTH - MIN_DEPTH) as usize)
        .prompt()
    {
        Ok(depth) => depth,
        Err(e) => return cancelled(e),
    };

    let test_types = match MultiSelect::new("Tipos de casos de prueba:", TestType::ALL.to_vec())
        .with_default(&[0])
        .prompt()
    {
        Ok(types) => types,
        Err(e) => return cancelled(e),
    };

    let format = match Select::new(
        "Formato de exportación:",
        vec![ExportFormat::Excel, ExportFormat::Csv],
    )
    .prompt()
    {
        Ok(format) => format,
        Err(e) => return cancelled(e),
    };

    let selected = match MultiSelect::new("Selecciona las historias de usuario:", stories)
        .with_help_message("Espacio para marcar, Enter para confirmar")
        .prompt()
    {
        Ok(selected) => selected,
        Err(e) => return cancelled(e),
    };

    if selected.is_empty() {
        println!(
            "{}",
            "Selecciona al menos una historia de usuario.".yellow()
        );
        return Ok(());
    }

    let options = GenerationOptions::new(depth, test_types);
    run_generation(settings, &selected, &options, format, Path::new(OUTPUT_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::cell::RefCell;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Responde según el resumen que aparece en el prompt
    struct ScriptedGenerator {
        prompts: RefCell<Vec<String>>,
    }

    impl TextGenerator for ScriptedGenerator {
        fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());

            if prompt.contains("Broken story") {
                return Err(AppError::Gemini("quota exceeded".to_string()));
            }

            Ok("\
| Test Case ID | Test Scenario | Preconditions | Steps | Expected Result | Priority |
|---|---|---|---|---|---|
| TC-01 | Happy path | None | 1. Open page<br>2. Submit  | Works | High |
| TC-02 | Sad path | None | 1. Break it | Error | Low |
| malformed row |"
                .to_string())
        }
    }

    fn story(key: &str, summary: &str) -> Story {
        Story {
            key: key.to_string(),
            summary: summary.to_string(),
            description: None,
        }
    }

    fn instant() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn rows_carry_story_key_and_summary() {
        let generator = ScriptedGenerator {
            prompts: RefCell::new(Vec::new()),
        };
        let stories = vec![story("QA-1", "Login"), story("QA-2", "Logout")];
        let progress = ProgressBar::hidden();

        let rows = generate_all(
            &stories,
            &GenerationOptions::default(),
            &generator,
            &instant(),
            &progress,
            |_| {},
        );

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].get("Test Case ID"), Some("TC-01"));
        assert_eq!(rows[0].get(JIRA_ID), Some("QA-1"));
        assert_eq!(rows[1].get(STORY_SUMMARY), Some("Login"));
        assert_eq!(rows[3].get(JIRA_ID), Some("QA-2"));
        assert_eq!(rows[3].get("Priority"), Some("Low"));
        assert_eq!(rows[0].columns().last(), Some(STORY_SUMMARY));
        assert_eq!(progress.position(), 2);
    }

    #[test]
    fn failing_story_contributes_no_rows() {
        let generator = ScriptedGenerator {
            prompts: RefCell::new(Vec::new()),
        };
        let stories = vec![story("QA-1", "Broken story"), story("QA-2", "Logout")];

        let mut reported = Vec::new();

        let rows = generate_all(
            &stories,
            &GenerationOptions::default(),
            &generator,
            &instant(),
            &ProgressBar::hidden(),
            |line| reported.push(line.to_string()),
        );

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.get(JIRA_ID) == Some("QA-2")));
        // dos intentos para la historia rota y uno para la otra
        assert_eq!(generator.prompts.borrow().len(), 3);

        // con la barra oculta los avisos se siguen entregando
        assert_eq!(reported.len(), 3);
        assert!(reported[0].contains("Generando casos de prueba para QA-1"));
        assert!(reported[1].contains("Reintento 1/2"));
        assert!(reported[1].contains("quota exceeded"));
        assert!(reported[2].contains("Generando casos de prueba para QA-2"));
    }

    #[test]
    fn nothing_is_written_when_every_story_fails() {
        let generator = ScriptedGenerator {
            prompts: RefCell::new(Vec::new()),
        };
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("output");

        let exported = generate_and_export(
            &[story("QA-1", "Broken story")],
            &GenerationOptions::default(),
            &generator,
            &instant(),
            ExportFormat::Csv,
            &output_dir,
        )
        .unwrap();

        assert_eq!(exported, None);
        assert!(!output_dir.exists());
    }

    #[test]
    fn exported_values_are_cleaned() {
        let generator = ScriptedGenerator {
            prompts: RefCell::new(Vec::new()),
        };
        let dir = TempDir::new().unwrap();

        let path = generate_and_export(
            &[story("QA-1", "Login")],
            &GenerationOptions::default(),
            &generator,
            &instant(),
            ExportFormat::Csv,
            dir.path(),
        )
        .unwrap()
        .expect("rows should be exported");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        let steps = headers.iter().position(|h| h == "Steps").unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][steps], "1. Open page\n2. Submit");
        assert!(records.iter().all(|r| !r.iter().any(|v| v.contains("<br"))));
    }

    #[test]
    fn no_projects_means_no_prompt() {
        assert_eq!(pick_project(Vec::new(), "QA").unwrap(), None);
    }

    #[test]
    fn preselects_configured_project() {
        let projects = vec!["OPS".to_string(), "SHOP".to_string()];

        assert_eq!(default_project_index(&projects, "SHOP"), 1);
        assert_eq!(default_project_index(&projects, "MISSING"), 0);
    }

    #[test]
    fn cancellation_is_not_an_error() {
        assert!(cancelled(InquireError::OperationCanceled).is_ok());
        assert!(cancelled(InquireError::OperationInterrupted).is_ok());
        assert!(cancelled(InquireError::NotTTY).is_err());
    }
}
