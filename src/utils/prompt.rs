use crate::models::{GenerationOptions, Story, GENERATED_COLUMNS};

/// Encabezado de la tabla que se le pide al modelo
pub fn table_header() -> String {
    format!("| {} |", GENERATED_COLUMNS.join(" | "))
}

/// Arma el prompt para generar los casos de prueba de una historia
pub fn build_prompt(story: &Story, options: &GenerationOptions) -> String {
    format!(
        "You are a highly skilled QA engineer. Given the following Jira user story, \
generate detailed {types} test cases with depth {depth} and format them in a Markdown table.
Each test case should cover unique scenarios (positive and negative) with preconditions, \
clear multi-step steps, and explicit expected results.
Do not make up features not described.

Jira Story Summary: {summary}
Jira Description: {description}

Output only a Markdown table with columns:
{header}
",
        types = options.test_types_label(),
        depth = options.depth,
        summary = story.summary,
        description = story.description_or_default(),
        header = table_header(),
    )
}
