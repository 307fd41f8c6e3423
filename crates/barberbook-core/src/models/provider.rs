use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// A barber available for booking. Fetched per dashboard view, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Provider {
    pub fn matches_search(&self, query: &str) -> bool {
        query.is_empty() || contains_ignore_case(&self.name, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_providers_list() {
        let json = r#"[
            {"id":"p1","name":"Ana Costa","email":"ana@example.com","avatar_url":"http://x/a.jpg"},
            {"id":"p2","name":"Bruno Lima","avatar_url":null}
        ]"#;
        let providers: Vec<Provider> = serde_json::from_str(json).expect("providers should parse");
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].avatar_url.as_deref(), Some("http://x/a.jpg"));
        assert_eq!(providers[1].avatar_url, None);
    }

    #[test]
    fn test_matches_search() {
        let p = Provider {
            id: "p1".to_string(),
            name: "Ana Costa".to_string(),
            avatar_url: None,
        };
        assert!(p.matches_search(""));
        assert!(p.matches_search("costa"));
        assert!(p.matches_search("ANA"));
        assert!(!p.matches_search("bruno"));
    }
}
