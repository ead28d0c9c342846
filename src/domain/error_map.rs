use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Field name to message. A field without an entry has no error; empty
/// messages are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMap(BTreeMap<String, String>);

impl ErrorMap {
    /// Replaces the whole map with `errors`. Nothing from the previous map
    /// survives, even for fields `errors` does not mention.
    pub fn set_errors<I>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.0 = errors
            .into_iter()
            .filter(|(_, message)| !message.trim().is_empty())
            .collect();
    }

    pub fn set_error(&mut self, name: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        let name = name.into();
        if message.trim().is_empty() {
            self.0.remove(&name);
        } else {
            self.0.insert(name, message);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn clear_field(&mut self, name: &str) {
        self.0.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

/// Per-field messages returned by the server after a rejected submission.
///
/// Servers send either `{"email": "message"}` or
/// `{"email": ["message", ...]}`; only the first non-blank message of a list
/// is kept. Fields whose messages are all blank are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for ValidationErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ValidationErrors(
            iter.into_iter()
                .map(|(name, message)| (name.into(), message.into()))
                .filter(|(_, message): &(String, String)| !message.trim().is_empty())
                .collect(),
        )
    }
}

impl IntoIterator for ValidationErrors {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for ValidationErrors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Messages>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(name, messages)| match messages {
                Messages::One(message) => Some((name, message)),
                Messages::Many(messages) => messages
                    .into_iter()
                    .find(|m| !m.trim().is_empty())
                    .map(|m| (name, m)),
            })
            .collect())
    }
}
