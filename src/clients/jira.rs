use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::models::Story;

pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Búsqueda JQL de Jira Cloud
const SEARCH_JQL_PATH: &str = "/rest/api/2/search/jql";
/// Búsqueda clásica, disponible en Jira Server / Data Center
const LEGACY_SEARCH_PATH: &str = "/rest/api/2/search";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cliente REST de Jira con autenticación básica (email + API token)
pub struct JiraClient {
    client: Client,
    server: String,
    email: String,
    api_token: String,
}

#[derive(Deserialize)]
struct Project {
    key: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(Deserialize)]
struct Issue {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
    description: Option<String>,
}

impl From<Issue> for Story {
    fn from(issue: Issue) -> Self {
        Story {
            key: issue.key,
            summary: issue.fields.summary,
            description: issue.fields.description,
        }
    }
}

/// Consulta JQL de historias de un proyecto, las más recientes primero
pub fn story_jql(project_key: &str, status: Option<&str>) -> String {
    match status {
        Some(status) => format!(
            "project={} AND issuetype=Story AND status=\"{}\" ORDER BY created DESC",
            project_key, status
        ),
        None => format!(
            "project={} AND issuetype=Story ORDER BY created DESC",
            project_key
        ),
    }
}

impl JiraClient {
    pub fn new(server: &str, email: &str, api_token: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(JiraClient {
            client,
            server: server.trim_end_matches('/').to_string(),
            email: email.to_string(),
            api_token: api_token.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.jira_server,
            &settings.jira_email,
            &settings.jira_api_token,
        )
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.server, path))
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
    }

    fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AppError::Jira {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }

    /// Claves de todos los proyectos visibles para la cuenta
    pub fn projects(&self) -> Result<Vec<String>> {
        debug!(server = %self.server, "consultando proyectos de Jira");
        let projects: Vec<Project> = Self::send_json(self.get("/rest/api/2/project"))?;

        Ok(projects.into_iter().map(|p| p.key).collect())
    }

    /// Historias de usuario de un proyecto, opcionalmente filtradas por estado
    pub fn search_stories(
        &self,
        project_key: &str,
        status: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<Story>> {
        let jql = story_jql(project_key, status);
        debug!(%jql, max_results, "buscando historias");

        let max_results = max_results.to_string();
        let search = |path: &str| {
            self.get(path).query(&[
                ("jql", jql.as_str()),
                ("maxResults", max_results.as_str()),
                ("fields", "summary,description"),
            ])
        };

        // Las instancias sin /search/jql responden 404 o 405
        let response = match Self::send_json::<SearchResponse>(search(SEARCH_JQL_PATH)) {
            Err(AppError::Jira { status: 404 | 405, .. }) => {
                debug!("sin {}, se usa {}", SEARCH_JQL_PATH, LEGACY_SEARCH_PATH);
                Self::send_json(search(LEGACY_SEARCH_PATH))?
            }
            other => other?,
        };

        info!(project = project_key, count = response.issues.len(), "historias cargadas");
        Ok(response.issues.into_iter().map(Story::from).collect())
    }

    /// Obtiene una historia por su clave
    pub fn get_story(&self, key: &str) -> Result<Story> {
        let request = self
            .get(&format!("/rest/api/2/issue/{}", key))
            .query(&[("fields", "summary,description")]);

        match Self::send_json::<Issue>(request) {
            Ok(issue) => Ok(issue.into()),
            Err(AppError::Jira { status: 404, .. }) => Err(AppError::StoryNotFound(key.to_string())),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    // "qa@example.com:token" en base64
    const BASIC_AUTH: &str = "Basic cWFAZXhhbXBsZS5jb206dG9rZW4=";

    fn client(server: &mockito::ServerGuard) -> JiraClient {
        JiraClient::new(&server.url(), "qa@example.com", "token").unwrap()
    }

    #[test]
    fn jql_with_and_without_status() {
        assert_eq!(
            story_jql("SHOP", None),
            "project=SHOP AND issuetype=Story ORDER BY created DESC"
        );
        assert_eq!(
            story_jql("SHOP", Some("To Do")),
            "project=SHOP AND issuetype=Story AND status=\"To Do\" ORDER BY created DESC"
        );
    }

    #[test]
    fn lists_project_keys() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/api/2/project")
            .match_header("authorization", BASIC_AUTH)
            .with_status(200)
            .with_body(r#"[{"key":"SHOP","name":"Shop"},{"key":"OPS","name":"Ops"}]"#)
            .create();

        let keys = client(&server).projects().unwrap();

        assert_eq!(keys, vec!["SHOP", "OPS"]);
        mock.assert();
    }

    #[test]
    fn search_maps_issues_to_stories() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/api/2/search/jql")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "jql".into(),
                    "project=SHOP AND issuetype=Story ORDER BY created DESC".into(),
                ),
                Matcher::UrlEncoded("maxResults".into(), "50".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"issues":[
                    {"key":"SHOP-2","fields":{"summary":"Pay with card","description":"As a buyer..."}},
                    {"key":"SHOP-1","fields":{"summary":"Browse catalog","description":null}}
                ]}"#,
            )
            .create();

        let stories = client(&server)
            .search_stories("SHOP", None, DEFAULT_MAX_RESULTS)
            .unwrap();

        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].key, "SHOP-2");
        assert_eq!(stories[0].description.as_deref(), Some("As a buyer..."));
        assert_eq!(stories[1].summary, "Browse catalog");
        assert_eq!(stories[1].description, None);
        mock.assert();
    }

    #[test]
    fn falls_back_to_legacy_search() {
        let mut server = mockito::Server::new();
        let jql_mock = server
            .mock("GET", "/rest/api/2/search/jql")
            .match_query(Matcher::Any)
            .with_status(404)
            .create();
        let legacy_mock = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "jql".into(),
                    "project=OPS AND issuetype=Story AND status=\"To Do\" ORDER BY created DESC"
                        .into(),
                ),
                Matcher::UrlEncoded("maxResults".into(), "10".into()),
            ]))
            .match_header("authorization", BASIC_AUTH)
            .with_status(200)
            .with_body(r#"{"issues":[{"key":"OPS-7","fields":{"summary":"Rotate keys"}}]}"#)
            .create();

        let stories = client(&server)
            .search_stories("OPS", Some("To Do"), 10)
            .unwrap();

        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].key, "OPS-7");
        assert_eq!(stories[0].description, None);
        jql_mock.assert();
        legacy_mock.assert();
    }

    #[test]
    fn search_errors_other_than_missing_endpoint_are_not_retried() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/api/2/search/jql")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("bad jql")
            .create();
        let legacy_mock = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::Any)
            .expect(0)
            .create();

        let err = client(&server)
            .search_stories("SHOP", None, DEFAULT_MAX_RESULTS)
            .unwrap_err();

        assert!(matches!(err, AppError::Jira { status: 400, .. }));
        legacy_mock.assert();
    }

    #[test]
    fn error_status_is_reported() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/api/2/project")
            .with_status(401)
            .with_body("Unauthorized")
            .create();

        let err = client(&server).projects().unwrap_err();

        match err {
            AppError::Jira { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_issue_is_story_not_found() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/api/2/issue/SHOP-99")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"errorMessages":["Issue does not exist"]}"#)
            .create();

        let err = client(&server).get_story("SHOP-99").unwrap_err();

        assert!(matches!(err, AppError::StoryNotFound(key) if key == "SHOP-99"));
    }
}
