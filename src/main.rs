mod clients;
mod commands;
mod config;
mod error;
mod models;
mod utils;

use clap::{Parser, Subcommand};
use colored::*;
use inquire::Select;

use crate::clients::jira::DEFAULT_MAX_RESULTS;
use crate::commands::GenerateArgs;
use crate::config::Settings;
use crate::error::Result;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Genera casos de prueba a partir de historias de usuario de Jira usando Gemini",
    long_about = None
)]
struct Cli {
    /// Mostrar logs informativos
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Listar los proyectos de Jira disponibles
    Projects,
    /// Listar las historias de usuario de un proyecto
    Stories {
        /// Proyecto de Jira (por defecto PROJECT_KEY)
        #[arg(short, long)]
        project: Option<String>,

        /// Filtrar por estado, p. ej. "To Do"
        #[arg(short, long)]
        status: Option<String>,

        /// Cantidad máxima de historias
        #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
        limit: u32,
    },
    /// Generar casos de prueba sin el menú interactivo
    Generate(GenerateArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    config::load_dotenv();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("❌ {}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env()?;

    match cli.command {
        Some(Commands::Projects) => commands::list_projects(&settings),
        Some(Commands::Stories {
            project,
            status,
            limit,
        }) => commands::list_stories(&settings, project.as_deref(), status.as_deref(), limit),
        Some(Commands::Generate(args)) => commands::generate_from_args(&settings, &args),
        None => interactive_menu(&settings),
    }
}

/// Menú interactivo si no se proporciona un comando
fn interactive_menu(settings: &Settings) -> Result<()> {
    println!("{}", "🤖 Generador de casos de prueba con IA para Jira".bold());
    println!();
    println!("{}", "1. Selecciona tu proyecto de Jira.".blue());
    println!("{}", "2. Configura la profundidad, los tipos de prueba y el formato.".blue());
    println!("{}", "3. Elige una o más historias de usuario.".blue());
    println!("{}", "4. Los casos generados se muestran y se exportan a output/.".blue());
    println!();

    let options = vec![
        "Generar casos de prueba",
        "Listar proyectos",
        "Listar historias de usuario",
        "Salir",
    ];

    let selection = Select::new("¿Qué deseas hacer?", options).prompt();

    match selection {
        Ok("Generar casos de prueba") => commands::generate_interactive(settings),
        Ok("Listar proyectos") => commands::list_projects(settings),
        Ok("Listar historias de usuario") => commands::list_stories_interactive(settings),
        _ => {
            println!("¡Hasta pronto!");
            Ok(())
        }
    }
}
