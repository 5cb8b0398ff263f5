//! State and action catalogs
//!
//! Both catalogs are built once from configuration and are read-only
//! afterwards. States are interned as value-index tuples and addressed by
//! dense [`StateId`]s; actions by dense [`ActionId`]s in declaration order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use taskmdp_core::{
    ActionDescriptor, ActionId, AttributeDomain, Attributes, MdpError, Result, StateId, StateRef,
    TerminalMarker,
};

/// Reward value from environment
pub type Reward = f64;

/// Upper bound on the number of states a catalog may enumerate
pub const MAX_STATES: usize = 100_000;

/// Separator used in stable state keys
pub const KEY_SEPARATOR: char = '|';

/// How an observed state was matched against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Approximate,
    Default,
}

/// Result of matching an observed attribute record to a catalog state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateMatch {
    pub state: StateId,
    pub kind: MatchKind,
    /// Fraction of catalog attributes the observation agrees with
    pub similarity: f64,
}

/// The discrete states known to the engine
#[derive(Debug, Clone)]
pub struct StateCatalog {
    domains: Vec<AttributeDomain>,
    states: Vec<Vec<usize>>,
    index: HashMap<Vec<usize>, StateId>,
    terminal: Option<(usize, usize)>,
}

impl StateCatalog {
    /// Enumerate every combination of attribute values.
    ///
    /// The last attribute varies fastest, so ids follow lexicographic order
    /// of the value positions.
    pub fn from_domains(
        domains: Vec<AttributeDomain>,
        terminal: Option<&TerminalMarker>,
    ) -> Result<Self> {
        validate_domains(&domains)?;

        let size = domains
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(d.values.len()))
            .unwrap_or(usize::MAX);
        if size > MAX_STATES {
            return Err(MdpError::CatalogTooLarge {
                size,
                limit: MAX_STATES,
            });
        }

        let mut states = Vec::with_capacity(size);
        let mut current = vec![0usize; domains.len()];
        'enumerate: loop {
            states.push(current.clone());

            for pos in (0..domains.len()).rev() {
                current[pos] += 1;
                if current[pos] < domains[pos].values.len() {
                    continue 'enumerate;
                }
                current[pos] = 0;
            }
            break;
        }

        Self::build(domains, states, terminal)
    }

    /// Use an explicit list of states, each a complete attribute record.
    pub fn from_states(
        domains: Vec<AttributeDomain>,
        states: &[Attributes],
        terminal: Option<&TerminalMarker>,
    ) -> Result<Self> {
        validate_domains(&domains)?;
        if states.is_empty() {
            return Err(MdpError::EmptyCatalog("no states defined".to_string()));
        }

        let encoded = states
            .iter()
            .map(|attrs| encode_strict(&domains, attrs))
            .collect::<Result<Vec<_>>>()?;

        Self::build(domains, encoded, terminal)
    }

    fn build(
        domains: Vec<AttributeDomain>,
        states: Vec<Vec<usize>>,
        terminal: Option<&TerminalMarker>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(states.len());
        for (i, values) in states.iter().enumerate() {
            if index.insert(values.clone(), StateId::from(i)).is_some() {
                return Err(MdpError::DuplicateState(join_key(&domains, values)));
            }
        }

        let terminal = terminal
            .map(|marker| {
                let attr = domains
                    .iter()
                    .position(|d| d.name == marker.attribute)
                    .ok_or_else(|| MdpError::UnknownAttribute(marker.attribute.clone()))?;
                let value = domains[attr].position(&marker.value).ok_or_else(|| {
                    MdpError::UnknownValue {
                        attribute: marker.attribute.clone(),
                        value: marker.value.clone(),
                    }
                })?;
                Ok::<_, MdpError>((attr, value))
            })
            .transpose()?;

        Ok(Self {
            domains,
            states,
            index,
            terminal,
        })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn domains(&self) -> &[AttributeDomain] {
        &self.domains
    }

    /// All state ids in canonical order
    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(StateId::from)
    }

    /// Stable key: attribute values joined with `|` in domain order
    pub fn key(&self, id: StateId) -> String {
        join_key(&self.domains, &self.states[id.index()])
    }

    pub fn attributes(&self, id: StateId) -> Attributes {
        self.domains
            .iter()
            .zip(&self.states[id.index()])
            .map(|(d, &v)| (d.name.clone(), d.values[v].clone()))
            .collect()
    }

    /// Value of a named attribute in a catalog state
    pub fn value(&self, id: StateId, attribute: &str) -> Option<&str> {
        let pos = self.domains.iter().position(|d| d.name == attribute)?;
        let value = self.states[id.index()][pos];
        Some(self.domains[pos].values[value].as_str())
    }

    pub fn is_terminal(&self, id: StateId) -> bool {
        self.terminal
            .is_some_and(|(attr, value)| self.states[id.index()][attr] == value)
    }

    /// Exact structural lookup; attributes outside the schema are ignored
    pub fn lookup(&self, observed: &Attributes) -> Option<StateId> {
        let values = self
            .domains
            .iter()
            .map(|d| observed.get(&d.name).and_then(|v| d.position(v)))
            .collect::<Option<Vec<_>>>()?;
        self.index.get(&values).copied()
    }

    pub fn lookup_key(&self, key: &str) -> Option<StateId> {
        let parts: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        if parts.len() != self.domains.len() {
            return None;
        }
        let values = self
            .domains
            .iter()
            .zip(parts)
            .map(|(d, part)| d.position(part))
            .collect::<Option<Vec<_>>>()?;
        self.index.get(&values).copied()
    }

    /// Resolve a seed-table reference, failing on anything not in the catalog
    pub fn resolve(&self, state: &StateRef) -> Result<StateId> {
        let found = match state {
            StateRef::Key(key) => self.lookup_key(key),
            StateRef::Attributes(attrs) => self.lookup(attrs),
        };
        found.ok_or_else(|| MdpError::UnknownState(state.to_string()))
    }

    /// Fraction of the catalog state's attributes that the observation shares
    pub fn similarity(&self, id: StateId, observed: &Attributes) -> f64 {
        let matching = self
            .domains
            .iter()
            .zip(&self.states[id.index()])
            .filter(|(d, &v)| observed.get(&d.name) == Some(&d.values[v]))
            .count();
        matching as f64 / self.domains.len() as f64
    }

    /// Match an observation: exact first, then the most similar state at or
    /// above `threshold` (earliest id wins ties), else the first state.
    pub fn match_state(&self, observed: &Attributes, threshold: f64) -> StateMatch {
        if let Some(state) = self.lookup(observed) {
            return StateMatch {
                state,
                kind: MatchKind::Exact,
                similarity: 1.0,
            };
        }

        let mut best: Option<(StateId, f64)> = None;
        for id in self.ids() {
            let similarity = self.similarity(id, observed);
            if similarity >= threshold && best.map_or(true, |(_, s)| similarity > s) {
                best = Some((id, similarity));
            }
        }

        match best {
            Some((state, similarity)) => {
                debug!(
                    "Approximate state match {} (similarity {:.2})",
                    self.key(state),
                    similarity
                );
                StateMatch {
                    state,
                    kind: MatchKind::Approximate,
                    similarity,
                }
            }
            None => {
                let state = StateId(0);
                debug!("No state match above {:.2}, using default state", threshold);
                StateMatch {
                    state,
                    kind: MatchKind::Default,
                    similarity: self.similarity(state, observed),
                }
            }
        }
    }
}

/// The discrete actions available in every state
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    actions: Vec<ActionDescriptor>,
    index: HashMap<String, ActionId>,
}

impl ActionCatalog {
    pub fn new(actions: Vec<ActionDescriptor>) -> Result<Self> {
        if actions.is_empty() {
            return Err(MdpError::EmptyCatalog("no actions defined".to_string()));
        }

        let mut index = HashMap::with_capacity(actions.len());
        for (i, action) in actions.iter().enumerate() {
            if action.id.trim().is_empty() {
                return Err(MdpError::InvalidParameter(format!(
                    "action at position {i} has an empty id"
                )));
            }
            if index.insert(action.id.clone(), ActionId::from(i)).is_some() {
                return Err(MdpError::DuplicateAction(action.id.clone()));
            }
        }

        Ok(Self { actions, index })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        (0..self.actions.len()).map(ActionId::from)
    }

    pub fn get(&self, id: ActionId) -> &ActionDescriptor {
        &self.actions[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &ActionDescriptor)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, a)| (ActionId::from(i), a))
    }

    pub fn lookup(&self, id: &str) -> Option<ActionId> {
        self.index.get(id).copied()
    }

    pub fn resolve(&self, id: &str) -> Result<ActionId> {
        self.lookup(id)
            .ok_or_else(|| MdpError::UnknownAction(id.to_string()))
    }
}

fn validate_domains(domains: &[AttributeDomain]) -> Result<()> {
    if domains.is_empty() {
        return Err(MdpError::EmptyCatalog(
            "no state attributes defined".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for domain in domains {
        if !names.insert(domain.name.as_str()) {
            return Err(MdpError::DuplicateAttribute(domain.name.clone()));
        }
        if domain.values.is_empty() {
            return Err(MdpError::EmptyDomain(domain.name.clone()));
        }
        let mut seen = HashSet::new();
        for value in &domain.values {
            if value.contains(KEY_SEPARATOR) {
                return Err(MdpError::InvalidParameter(format!(
                    "value '{value}' of attribute '{}' contains '{KEY_SEPARATOR}'",
                    domain.name
                )));
            }
            if !seen.insert(value.as_str()) {
                return Err(MdpError::DuplicateValue {
                    attribute: domain.name.clone(),
                    value: value.clone(),
                });
            }
        }
    }
    Ok(())
}

fn encode_strict(domains: &[AttributeDomain], attrs: &Attributes) -> Result<Vec<usize>> {
    if let Some(extra) = attrs
        .keys()
        .find(|name| !domains.iter().any(|d| &d.name == *name))
    {
        return Err(MdpError::UnknownAttribute(extra.clone()));
    }

    domains
        .iter()
        .map(|d| {
            let value = attrs
                .get(&d.name)
                .ok_or_else(|| MdpError::MissingAttribute(d.name.clone()))?;
            d.position(value).ok_or_else(|| MdpError::UnknownValue {
                attribute: d.name.clone(),
                value: value.clone(),
            })
        })
        .collect()
}

fn join_key(domains: &[AttributeDomain], values: &[usize]) -> String {
    let parts: Vec<&str> = domains
        .iter()
        .zip(values)
        .map(|(d, &v)| d.values[v].as_str())
        .collect();
    parts.join(&KEY_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmdp_core::{attributes, ActionCategory};

    fn create_test_domains() -> Vec<AttributeDomain> {
        vec![
            AttributeDomain::new("phase", ["planning", "execution", "completed"]),
            AttributeDomain::new("budget", ["over", "on_budget"]),
        ]
    }

    #[test]
    fn test_from_domains_enumerates_product() {
        let catalog = StateCatalog::from_domains(create_test_domains(), None).unwrap();

        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.key(StateId(0)), "planning|over");
        assert_eq!(catalog.key(StateId(1)), "planning|on_budget");
        assert_eq!(catalog.key(StateId(5)), "completed|on_budget");
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            StateCatalog::from_domains(vec![], None),
            Err(MdpError::EmptyCatalog(_))
        ));

        let domains = vec![AttributeDomain::new("phase", Vec::<String>::new())];
        assert!(matches!(
            StateCatalog::from_domains(domains, None),
            Err(MdpError::EmptyDomain(_))
        ));

        assert!(matches!(
            StateCatalog::from_states(create_test_domains(), &[], None),
            Err(MdpError::EmptyCatalog(_))
        ));
    }

    #[test]
    fn test_duplicate_domain_entries_rejected() {
        let domains = vec![
            AttributeDomain::new("phase", ["planning"]),
            AttributeDomain::new("phase", ["execution"]),
        ];
        assert!(matches!(
            StateCatalog::from_domains(domains, None),
            Err(MdpError::DuplicateAttribute(_))
        ));

        let domains = vec![AttributeDomain::new("phase", ["planning", "planning"])];
        assert!(matches!(
            StateCatalog::from_domains(domains, None),
            Err(MdpError::DuplicateValue { .. })
        ));
    }

    #[test]
    fn test_catalog_size_limit() {
        let values: Vec<String> = (0..100).map(|i| format!("v{i}")).collect();
        let domains = vec![
            AttributeDomain::new("a", values.clone()),
            AttributeDomain::new("b", values.clone()),
            AttributeDomain::new("c", values),
        ];
        assert!(matches!(
            StateCatalog::from_domains(domains, None),
            Err(MdpError::CatalogTooLarge { size: 1_000_000, .. })
        ));
    }

    #[test]
    fn test_from_states_validation() {
        let ok = StateCatalog::from_states(
            create_test_domains(),
            &[
                attributes([("phase", "planning"), ("budget", "over")]),
                attributes([("phase", "completed"), ("budget", "on_budget")]),
            ],
            None,
        )
        .unwrap();
        assert_eq!(ok.len(), 2);

        let missing = StateCatalog::from_states(
            create_test_domains(),
            &[attributes([("phase", "planning")])],
            None,
        );
        assert!(matches!(missing, Err(MdpError::MissingAttribute(_))));

        let unknown = StateCatalog::from_states(
            create_test_domains(),
            &[attributes([("phase", "launch"), ("budget", "over")])],
            None,
        );
        assert!(matches!(unknown, Err(MdpError::UnknownValue { .. })));

        let duplicate = StateCatalog::from_states(
            create_test_domains(),
            &[
                attributes([("phase", "planning"), ("budget", "over")]),
                attributes([("phase", "planning"), ("budget", "over")]),
            ],
            None,
        );
        assert!(matches!(duplicate, Err(MdpError::DuplicateState(_))));
    }

    #[test]
    fn test_lookup_by_key_and_attributes() {
        let catalog = StateCatalog::from_domains(create_test_domains(), None).unwrap();
        let id = catalog.lookup_key("execution|on_budget").unwrap();

        assert_eq!(catalog.attributes(id)["phase"], "execution");
        assert_eq!(
            catalog.lookup(&attributes([("phase", "execution"), ("budget", "on_budget")])),
            Some(id)
        );
        assert_eq!(catalog.lookup_key("execution"), None);
        assert_eq!(catalog.lookup_key("execution|late"), None);
        assert!(catalog.resolve(&StateRef::from("nope|over")).is_err());
    }

    #[test]
    fn test_terminal_marker() {
        let marker = TerminalMarker::new("phase", "completed");
        let catalog = StateCatalog::from_domains(create_test_domains(), Some(&marker)).unwrap();

        let done = catalog.lookup_key("completed|over").unwrap();
        let active = catalog.lookup_key("planning|over").unwrap();
        assert!(catalog.is_terminal(done));
        assert!(!catalog.is_terminal(active));

        let bad = TerminalMarker::new("phase", "archived");
        assert!(StateCatalog::from_domains(create_test_domains(), Some(&bad)).is_err());
    }

    #[test]
    fn test_match_state_kinds() {
        let domains = vec![
            AttributeDomain::new("a", ["x", "y"]),
            AttributeDomain::new("b", ["x", "y"]),
            AttributeDomain::new("c", ["x", "y"]),
            AttributeDomain::new("d", ["x", "y"]),
        ];
        let catalog = StateCatalog::from_domains(domains, None).unwrap();

        let exact = catalog.match_state(
            &attributes([("a", "y"), ("b", "x"), ("c", "x"), ("d", "y")]),
            0.7,
        );
        assert_eq!(exact.kind, MatchKind::Exact);

        // 3 of 4 attributes known and matching
        let approx = catalog.match_state(&attributes([("a", "y"), ("b", "y"), ("c", "y")]), 0.7);
        assert_eq!(approx.kind, MatchKind::Approximate);
        assert_eq!(approx.similarity, 0.75);
        assert_eq!(catalog.key(approx.state), "y|y|y|x");

        let fallback = catalog.match_state(&attributes([("a", "z")]), 0.7);
        assert_eq!(fallback.kind, MatchKind::Default);
        assert_eq!(fallback.state, StateId(0));
    }

    #[test]
    fn test_action_catalog() {
        let actions = ActionCatalog::new(vec![
            ActionDescriptor::new("add_resources", ActionCategory::Resource),
            ActionDescriptor::new("quality_review", ActionCategory::Quality),
        ])
        .unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions.lookup("quality_review"), Some(ActionId(1)));
        assert_eq!(actions.get(ActionId(0)).id, "add_resources");
        assert!(matches!(
            actions.resolve("fire_everyone"),
            Err(MdpError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_action_catalog_rejects_bad_input() {
        assert!(matches!(
            ActionCatalog::new(vec![]),
            Err(MdpError::EmptyCatalog(_))
        ));
        assert!(matches!(
            ActionCatalog::new(vec![
                ActionDescriptor::new("fast_track", ActionCategory::Schedule),
                ActionDescriptor::new("fast_track", ActionCategory::Risk),
            ]),
            Err(MdpError::DuplicateAction(_))
        ));
    }
}
