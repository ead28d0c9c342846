use std::collections::BTreeMap;

pub type FieldValues = BTreeMap<String, String>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("`{name}` is not a declared form field")]
pub struct UnknownFieldError {
    pub name: String,
}

impl UnknownFieldError {
    fn new(name: &str) -> Self {
        UnknownFieldError {
            name: name.to_string(),
        }
    }
}

/// Current values of a form whose field names are fixed at construction.
///
/// Every declared field always holds a value; undeclared names are rejected
/// instead of being added on the fly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStore {
    defaults: FieldValues,
    values: FieldValues,
}

impl FieldStore {
    pub fn new<I, K, V>(fields: I) -> FieldStore
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let defaults: FieldValues = fields
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        FieldStore {
            values: defaults.clone(),
            defaults,
        }
    }

    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), UnknownFieldError> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| UnknownFieldError::new(name))?;
        *slot = value.into();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn snapshot(&self) -> FieldValues {
        self.values.clone()
    }

    /// Whether any value differs from the default it was declared with.
    pub fn is_dirty(&self) -> bool {
        self.values != self.defaults
    }

    pub fn reset(&mut self) {
        self.values.clone_from(&self.defaults);
    }

    pub fn reset_field(&mut self, name: &str) -> Result<(), UnknownFieldError> {
        let default = self
            .defaults
            .get(name)
            .ok_or_else(|| UnknownFieldError::new(name))?;
        self.values.insert(name.to_string(), default.clone());
        Ok(())
    }

    /// Makes the current values the ones `reset` goes back to.
    pub fn commit_defaults(&mut self) {
        self.defaults.clone_from(&self.values);
    }
}
