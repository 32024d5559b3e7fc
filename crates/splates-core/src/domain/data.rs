//! Template data maps.

use std::collections::HashMap;

use crate::domain::value::Value;

/// Named values visible to a render body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data(HashMap<String, Value>);

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Union with `other`; keys in `other` win.
    pub fn merge(&mut self, other: Data) {
        self.0.extend(other.0);
    }

    /// `self` layered over `base`: keys present in `self` win.
    pub fn over(mut self, base: &Data) -> Self {
        for (key, value) in &base.0 {
            self.0.entry(key.clone()).or_insert_with(|| value.clone());
        }
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Data {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Data {
    type Item = (String, Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Which templates a block of shared data applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Templates(Vec<String>),
}

impl Scope {
    pub fn templates<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Templates(names.into_iter().map(Into::into).collect())
    }
}

/// Data preassigned by the host, either to every template or to named ones.
#[derive(Debug, Clone, Default)]
pub struct SharedData {
    shared: Data,
    templates: HashMap<String, Data>,
}

impl SharedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, data: Data, scope: Scope) {
        match scope {
            Scope::All => self.shared.merge(data),
            Scope::Templates(names) => {
                for name in names {
                    self.templates
                        .entry(name)
                        .or_default()
                        .merge(data.clone());
                }
            }
        }
    }

    /// Data for `name`: template-specific entries win over shared ones.
    /// `None` returns only the shared data.
    pub fn get(&self, name: Option<&str>) -> Data {
        let mut data = self.shared.clone();
        if let Some(specific) = name.and_then(|n| self.templates.get(n)) {
            data.merge(specific.clone());
        }
        data
    }
}
