//! Entity descriptor and persistence metadata types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EntityError;

/// Mapping of one persisted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub field_name: String,

    /// Persistence type, e.g. "string", "integer", "datetime".
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

impl FieldMapping {
    pub fn new(field_name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: field_type.into(),
            nullable: false,
            length: None,
            column_name: None,
        }
    }
}

/// A value object embedded into the owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedClass {
    pub class: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_prefix: Option<String>,
}

/// Persistence metadata for an entity class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Identifier field names, in declaration order.
    #[serde(default)]
    pub identifier: Vec<String>,

    /// Mapped fields by name.
    #[serde(default)]
    pub field_mappings: IndexMap<String, FieldMapping>,

    /// Embedded classes by property name.
    #[serde(default)]
    pub embedded_classes: IndexMap<String, EmbeddedClass>,
}

impl ClassMetadata {
    /// Create metadata with the given identifier fields.
    pub fn new<I, S>(identifier: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifier: identifier.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: &str, field_type: &str) -> Self {
        self.field_mappings
            .insert(name.to_string(), FieldMapping::new(name, field_type));
        self
    }

    pub fn with_embedded(mut self, name: &str, class: &str) -> Self {
        self.embedded_classes.insert(
            name.to_string(),
            EmbeddedClass {
                class: class.to_string(),
                column_prefix: None,
            },
        );
        self
    }
}

/// Read-only view over one entity class and, optionally, one loaded instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDto {
    fqcn: String,
    metadata: Option<ClassMetadata>,
    instance: Option<Value>,
    id_name: Option<String>,
    id_value: Option<Value>,
}

impl EntityDto {
    /// Field names accepted by [`EntityDto::with_properties`].
    pub const PROPERTY_NAMES: [&'static str; 5] =
        ["fqcn", "metadata", "instance", "id_name", "id_value"];

    /// Create a descriptor. The id name is the first identifier field of the metadata.
    pub fn new(
        fqcn: impl Into<String>,
        metadata: Option<ClassMetadata>,
        instance: Option<Value>,
        id_value: Option<Value>,
    ) -> Self {
        let id_name = metadata
            .as_ref()
            .and_then(|m| m.identifier.first().cloned());

        Self {
            fqcn: fqcn.into(),
            metadata,
            instance,
            id_name,
            id_value,
        }
    }

    pub fn fqcn(&self) -> &str {
        &self.fqcn
    }

    /// Class name without its namespace.
    pub fn short_class_name(&self) -> &str {
        let trimmed = self.fqcn.trim_end_matches(['\\', '/', ':']);
        trimmed
            .rsplit(['\\', '/', ':'])
            .next()
            .unwrap_or(trimmed)
    }

    pub fn metadata(&self) -> Option<&ClassMetadata> {
        self.metadata.as_ref()
    }

    pub fn instance(&self) -> Option<&Value> {
        self.instance.as_ref()
    }

    pub fn id_name(&self) -> Option<&str> {
        self.id_name.as_deref()
    }

    pub fn id_value(&self) -> Option<&Value> {
        self.id_value.as_ref()
    }

    /// `(id_name, id_value)`.
    pub fn identity(&self) -> (Option<&str>, Option<&Value>) {
        (self.id_name(), self.id_value())
    }

    /// Stringified id. Empty when there is no id.
    pub fn id_value_as_string(&self) -> String {
        match &self.id_value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    fn require_metadata(&self) -> Result<&ClassMetadata, EntityError> {
        self.metadata
            .as_ref()
            .ok_or_else(|| EntityError::MissingMetadata {
                fqcn: self.fqcn.clone(),
            })
    }

    /// Field mapping for a property.
    pub fn property_metadata(&self, property_name: &str) -> Result<&FieldMapping, EntityError> {
        self.require_metadata()?
            .field_mappings
            .get(property_name)
            .ok_or_else(|| EntityError::UnknownProperty {
                fqcn: self.fqcn.clone(),
                name: property_name.to_string(),
            })
    }

    /// Whether the property is a mapped field.
    pub fn has_property(&self, property_name: &str) -> Result<bool, EntityError> {
        Ok(self
            .require_metadata()?
            .field_mappings
            .contains_key(property_name))
    }

    /// Dotted paths are associations unless they traverse an embedded class.
    pub fn is_association(&self, property_name: &str) -> Result<bool, EntityError> {
        if !property_name.contains('.') {
            return Ok(false);
        }
        Ok(!self.is_embedded_class(property_name)?)
    }

    pub fn is_embedded_class(&self, property_name: &str) -> Result<bool, EntityError> {
        let root = property_name.split('.').next().unwrap_or(property_name);
        Ok(self.require_metadata()?.embedded_classes.contains_key(root))
    }

    /// Apply a closed-field patch.
    ///
    /// Every key must be one of [`EntityDto::PROPERTY_NAMES`]; values are
    /// converted to the field's type.
    pub fn with_properties(mut self, patch: EntityPatch) -> Result<Self, EntityError> {
        for (name, value) in patch.entries {
            match name.as_str() {
                "fqcn" => self.fqcn = convert(&name, value)?,
                "metadata" => self.metadata = convert(&name, value)?,
                "instance" => self.instance = non_null(value),
                "id_name" => self.id_name = convert(&name, value)?,
                "id_value" => self.id_value = non_null(value),
                _ => {
                    return Err(EntityError::InvalidProperty {
                        name,
                        valid: Self::PROPERTY_NAMES.join(", "),
                    })
                }
            }
        }
        Ok(self)
    }
}

fn convert<T: serde::de::DeserializeOwned>(name: &str, value: Value) -> Result<T, EntityError> {
    serde_json::from_value(value).map_err(|e| EntityError::InvalidPropertyValue {
        name: name.to_string(),
        message: e.to_string(),
    })
}

fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        v => Some(v),
    }
}

/// Named updates for [`EntityDto::with_properties`], applied in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    entries: Vec<(String, Value)>,
}

impl EntityPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for EntityPatch {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
