//! Catalog-backed translator with parameter substitution.

use std::collections::HashMap;

use crudkit_core::TranslationParameters;

use super::{value_to_text, Translator};

/// Looks messages up in an in-memory catalog, falling back to the id itself.
///
/// Parameter names are replaced literally, so `%name%` and `{name}` styles
/// both work as long as the key includes the delimiters.
#[derive(Debug, Clone, Default)]
pub struct IdentityTranslator {
    /// domain -> id -> message
    catalog: HashMap<String, HashMap<String, String>>,
}

impl IdentityTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(
        &mut self,
        domain: impl Into<String>,
        id: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.catalog
            .entry(domain.into())
            .or_default()
            .insert(id.into(), message.into());
    }
}

impl Translator for IdentityTranslator {
    fn trans(&self, id: &str, parameters: &TranslationParameters, domain: &str) -> String {
        let message = self
            .catalog
            .get(domain)
            .and_then(|messages| messages.get(id))
            .map(String::as_str)
            .unwrap_or(id);

        parameters
            .iter()
            .fold(message.to_string(), |acc, (name, value)| {
                acc.replace(name.as_str(), &value_to_text(value))
            })
    }
}
