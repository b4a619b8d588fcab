use std::fmt;

pub const NO_DESCRIPTION: &str = "No description provided.";

/// Historia de usuario de Jira
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
}

impl Story {
    /// Descripción a enviar al modelo; una descripción vacía cuenta como ausente
    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => NO_DESCRIPTION,
        }
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(description: Option<&str>) -> Story {
        Story {
            key: "QA-7".to_string(),
            summary: "Login with SSO".to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn label_is_key_and_summary() {
        assert_eq!(story(None).to_string(), "QA-7: Login with SSO");
    }

    #[test]
    fn blank_description_falls_back() {
        assert_eq!(story(None).description_or_default(), NO_DESCRIPTION);
        assert_eq!(story(Some("  ")).description_or_default(), NO_DESCRIPTION);
        assert_eq!(
            story(Some("As a user I want SSO")).description_or_default(),
            "As a user I want SSO"
        );
    }
}
