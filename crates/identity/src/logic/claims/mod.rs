pub mod names;
pub use self::names::*;

use serde_json::{Map, Value};
use tracing::debug;

/// Read access over a set of claims of unknown origin.
///
/// Getters never fail: a missing, `null` or unusable claim reads as `None`.
pub trait ClaimsParser: Send + Sync {
    /// Raw claim value, with `null` treated as absent.
    fn claim(&self, name: &str) -> Option<&Value>;

    fn get_string(&self, name: &str) -> Option<String>;

    /// Claim as a JSON object, parsing JSON-encoded strings when needed.
    fn get_object(&self, name: &str) -> Option<Map<String, Value>>;

    /// Claim as a list of non-empty, trimmed entries.
    ///
    /// Arrays are read item by item and strings are split on commas. Other
    /// values yield an empty list.
    fn get_list(&self, name: &str) -> Vec<String> {
        match self.claim(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(value)) => split_comma_separated(value),
            _ => Vec::new(),
        }
    }
}

pub fn split_comma_separated(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_json_object(name: &str, raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            debug!("Claim {name} is not a JSON object");
            None
        }
        Err(e) => {
            debug!("Claim {name} is not valid JSON: {e}");
            None
        }
    }
}

/// Claims backed by a JSON tree, as returned by a user-info endpoint.
///
/// Only textual claims are readable as strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonClaimsParser {
    claims: Map<String, Value>,
}

impl JsonClaimsParser {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }
}

impl ClaimsParser for JsonClaimsParser {
    fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name).filter(|value| !value.is_null())
    }

    fn get_string(&self, name: &str) -> Option<String> {
        self.claim(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn get_object(&self, name: &str) -> Option<Map<String, Value>> {
        match self.claim(name)? {
            Value::Object(map) => Some(map.clone()),
            Value::String(raw) => parse_json_object(name, raw),
            _ => None,
        }
    }
}

/// Claims backed by a flat map, as decoded from an access token.
///
/// Every claim is coerced to its string form, and objects are read by
/// parsing that string as JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatClaimsParser {
    claims: Map<String, Value>,
}

impl FlatClaimsParser {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }
}

impl ClaimsParser for FlatClaimsParser {
    fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name).filter(|value| !value.is_null())
    }

    fn get_string(&self, name: &str) -> Option<String> {
        self.claim(name).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn get_object(&self, name: &str) -> Option<Map<String, Value>> {
        let raw = self.get_string(name)?;
        parse_json_object(name, &raw)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn claims(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_json_parser_reads_text_only() {
        let parser = JsonClaimsParser::new(claims(json!({
            "sub": "user-51423",
            "count": 3,
            "flag": true,
            "missing": null
        })));

        assert_eq!(parser.get_string("sub"), Some("user-51423".to_string()));
        assert_eq!(parser.get_string("count"), None);
        assert_eq!(parser.get_string("flag"), None);
        assert_eq!(parser.get_string("missing"), None);
        assert_eq!(parser.get_string("unknown"), None);
    }

    #[test]
    fn test_json_parser_reads_native_and_encoded_objects() {
        let parser = JsonClaimsParser::new(claims(json!({
            "native": {"org-1": {"access": "group"}},
            "encoded": "{\"org-1\":{\"access\":\"group\"}}",
            "not_json": "org-1",
            "array_json": "[1, 2]",
            "number": 12
        })));

        let expected = claims(json!({"org-1": {"access": "group"}}));
        assert_eq!(parser.get_object("native"), Some(expected.clone()));
        assert_eq!(parser.get_object("encoded"), Some(expected));
        assert_eq!(parser.get_object("not_json"), None);
        assert_eq!(parser.get_object("array_json"), None);
        assert_eq!(parser.get_object("number"), None);
        assert_eq!(parser.get_string("not_json"), Some("org-1".to_string()));
    }

    #[test]
    fn test_flat_parser_coerces_to_string() {
        let parser = FlatClaimsParser::new(claims(json!({
            "sub": "client-1",
            "count": 3,
            "flag": true,
            "missing": null
        })));

        assert_eq!(parser.get_string("sub"), Some("client-1".to_string()));
        assert_eq!(parser.get_string("count"), Some("3".to_string()));
        assert_eq!(parser.get_string("flag"), Some("true".to_string()));
        assert_eq!(parser.get_string("missing"), None);
    }

    #[test]
    fn test_flat_parser_reads_objects_through_string_form() {
        let parser = FlatClaimsParser::new(claims(json!({
            "native": {"org-1": {"classification": "private"}},
            "encoded": "{\"org-1\":{\"classification\":\"private\"}}",
            "text": "private"
        })));

        let expected = claims(json!({"org-1": {"classification": "private"}}));
        assert_eq!(parser.get_object("native"), Some(expected.clone()));
        assert_eq!(parser.get_object("encoded"), Some(expected));
        assert_eq!(parser.get_object("text"), None);
    }

    #[test]
    fn test_get_list_accepts_arrays_and_comma_strings() {
        let parser = JsonClaimsParser::new(claims(json!({
            "csv": " role-1, role-2 ,,role-3 ",
            "array": ["role-1", " role-2 ", "", 7],
            "empty": ""
        })));

        assert_eq!(parser.get_list("csv"), vec!["role-1", "role-2", "role-3"]);
        assert_eq!(parser.get_list("array"), vec!["role-1", "role-2"]);
        assert!(parser.get_list("empty").is_empty());
        assert!(parser.get_list("unknown").is_empty());
    }

    #[test]
    fn test_get_list_ignores_structured_values() {
        let values = claims(json!({
            "object": {"realm": ["role-1", "role-2"]},
            "number": 42,
            "csv": "role-1,role-2"
        }));
        let flat = FlatClaimsParser::new(values.clone());
        let tree = JsonClaimsParser::new(values);

        for parser in [&flat as &dyn ClaimsParser, &tree] {
            assert!(parser.get_list("object").is_empty());
            assert!(parser.get_list("number").is_empty());
            assert_eq!(parser.get_list("csv"), vec!["role-1", "role-2"]);
        }
    }
}
