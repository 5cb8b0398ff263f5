//! Attribute domains and references to states

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A state as seen from outside the engine: attribute name to value
pub type Attributes = BTreeMap<String, String>;

/// Build an [`Attributes`] record from name/value pairs
pub fn attributes<I, K, V>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A named categorical attribute and the values it may take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDomain {
    pub name: String,
    pub values: Vec<String>,
}

impl AttributeDomain {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of `value` within the domain
    pub fn position(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }
}

/// Marks states carrying `attribute = value` as terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalMarker {
    pub attribute: String,
    pub value: String,
}

impl TerminalMarker {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Reference to a catalog state in seed tables: either its stable key
/// (values joined with `|` in domain order) or its attribute record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateRef {
    Key(String),
    Attributes(Attributes),
}

impl From<&str> for StateRef {
    fn from(key: &str) -> Self {
        StateRef::Key(key.to_string())
    }
}

impl From<Attributes> for StateRef {
    fn from(attrs: Attributes) -> Self {
        StateRef::Attributes(attrs)
    }
}

impl std::fmt::Display for StateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateRef::Key(key) => f.write_str(key),
            StateRef::Attributes(attrs) => {
                let parts: Vec<String> = attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_position() {
        let domain = AttributeDomain::new("quality", ["poor", "acceptable", "good"]);
        assert_eq!(domain.position("good"), Some(2));
        assert_eq!(domain.position("excellent"), None);
    }

    #[test]
    fn test_attributes_helper() {
        let attrs = attributes([("phase", "design"), ("budget", "over")]);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["phase"], "design");
    }

    #[test]
    fn test_state_ref_untagged_deserialization() {
        let key: StateRef = serde_json::from_str(r#""planning|adequate""#).unwrap();
        assert_eq!(key, StateRef::Key("planning|adequate".to_string()));

        let attrs: StateRef = serde_json::from_str(r#"{"phase": "planning"}"#).unwrap();
        assert!(matches!(attrs, StateRef::Attributes(ref a) if a["phase"] == "planning"));
    }

    #[test]
    fn test_state_ref_display() {
        let state = StateRef::from(attributes([("a", "1"), ("b", "2")]));
        assert_eq!(state.to_string(), "{a=1, b=2}");
    }
}
