use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ValidationErrors;

/// The page object a server-driven view is rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub component: String,
    #[serde(default)]
    pub props: Value,
    pub url: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Page {
    pub fn new(component: impl Into<String>, url: impl Into<String>) -> Page {
        Page {
            component: component.into(),
            props: Value::Object(Default::default()),
            url: url.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Page {
        self.version = version;
        self
    }

    /// Validation errors shared with the page, looked up in `props.errors`
    /// first and in the flashed `props.flash.errors` otherwise.
    ///
    /// `None` when neither holds a non-empty object. An object whose
    /// messages are all blank or unreadable yields empty errors, so the
    /// rejection is still reported.
    pub fn validation_errors(&self) -> Option<ValidationErrors> {
        [
            self.props.get("errors"),
            self.props.get("flash").and_then(|flash| flash.get("errors")),
        ]
        .into_iter()
        .flatten()
        .find(|errors| errors.as_object().is_some_and(|fields| !fields.is_empty()))
        .map(|errors| ValidationErrors::deserialize(errors).unwrap_or_default())
    }
}
