use colored::*;

use crate::clients::jira::DEFAULT_MAX_RESULTS;
use crate::clients::JiraClient;
use crate::commands::generate::{cancelled, pick_project};
use crate::config::Settings;
use crate::error::Result;

/// Lista los proyectos de Jira disponibles
pub fn list_projects(settings: &Settings) -> Result<()> {
    let jira = JiraClient::from_settings(settings)?;
    let projects = jira.projects()?;

    if projects.is_empty() {
        println!("{}", "No hay proyectos de Jira disponibles.".yellow());
        return Ok(());
    }

    println!("{}", "Proyectos disponibles:".green());
    for (i, project) in projects.iter().enumerate() {
        if *project == settings.project_key {
            println!("{}: {} {}", i + 1, project, "(predeterminado)".blue());
        } else {
            println!("{}: {}", i + 1, project);
        }
    }

    Ok(())
}

/// Lista las historias de usuario de un proyecto
pub fn list_stories(
    settings: &Settings,
    project: Option<&str>,
    status: Option<&str>,
    limit: u32,
) -> Result<()> {
    let jira = JiraClient::from_settings(settings)?;
    let project = project.unwrap_or(&settings.project_key);

    print_stories(&jira, project, status, limit)
}

/// Pide el proyecto (con PROJECT_KEY preseleccionado) y lista sus historias
pub fn list_stories_interactive(settings: &Settings) -> Result<()> {
    let jira = JiraClient::from_settings(settings)?;

    let projects = jira.projects()?;
    match pick_project(projects, &settings.project_key) {
        Ok(Some(project)) => print_stories(&jira, &project, None, DEFAULT_MAX_RESULTS),
        Ok(None) => Ok(()),
        Err(e) => cancelled(e),
    }
}

fn print_stories(jira: &JiraClient, project: &str, status: Option<&str>, limit: u32) -> Result<()> {
    let stories = jira.search_stories(project, status, limit)?;

    if stories.is_empty() {
        println!(
            "{}",
            format!("No se encontraron historias de usuario en el proyecto {}.", project).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Historias de usuario de {}:", project).green()
    );
    for story in &stories {
        println!("{}", story);
    }

    Ok(())
}
