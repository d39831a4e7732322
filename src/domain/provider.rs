//! Declarative connection descriptor for a secret backend.
//!
//! The serialized shape (`server`, `caBundle`, `caProvider.type`,
//! `caProvider.name`, `caProvider.key`, `caProvider.namespace`) matches the
//! persisted store configuration and must stay stable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::store::ObjectKind;

/// Where CA material for the backend connection comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaSourceKind {
    /// A config map entry.
    ConfigMap,
    /// A secret entry.
    Secret,
    /// The `caBundle` carried on the provider itself.
    Inline,
}

impl CaSourceKind {
    /// Object kind to look up in the store, `None` for inline data.
    pub fn object_kind(&self) -> Option<ObjectKind> {
        match self {
            Self::ConfigMap => Some(ObjectKind::ConfigMap),
            Self::Secret => Some(ObjectKind::Secret),
            Self::Inline => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
            Self::Inline => "Inline",
        }
    }
}

impl fmt::Display for CaSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the CA certificates used to verify the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaProviderSpec {
    #[serde(rename = "type")]
    pub kind: CaSourceKind,

    /// Name of the object holding the certificates.
    #[serde(default)]
    pub name: String,

    /// Field within the object's data holding PEM certificates.
    #[serde(default)]
    pub key: String,

    /// Overrides the namespace the object is looked up in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl CaProviderSpec {
    pub fn config_map(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self { kind: CaSourceKind::ConfigMap, name: name.into(), key: key.into(), namespace: None }
    }

    pub fn secret(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self { kind: CaSourceKind::Secret, name: name.into(), key: key.into(), namespace: None }
    }

    pub fn inline() -> Self {
        Self {
            kind: CaSourceKind::Inline,
            name: String::new(),
            key: String::new(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The namespace to look the object up in: the override when it is set
    /// and non-empty, otherwise `fallback`.
    pub fn effective_namespace<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => namespace,
            _ => fallback,
        }
    }
}

/// Connection descriptor for a TLS-reachable secret backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendProviderSpec {
    /// Backend endpoint URL. Not validated on load.
    pub server: String,

    /// Inline PEM bundle, base64 encoded on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "ca_bundle")]
    pub ca_bundle: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_provider: Option<CaProviderSpec>,
}

impl BackendProviderSpec {
    pub fn new(server: impl Into<String>) -> Self {
        Self { server: server.into(), ca_bundle: None, ca_provider: None }
    }

    pub fn with_ca_provider(mut self, provider: CaProviderSpec) -> Self {
        self.ca_provider = Some(provider);
        self
    }

    pub fn with_ca_bundle(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_bundle = Some(pem.into());
        self
    }

    /// Decode a descriptor from YAML.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).map_err(|e| Error::descriptor(e.to_string()))
    }

    /// Decode a descriptor from JSON.
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| Error::descriptor(e.to_string()))
    }
}

mod ca_bundle {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|value| STANDARD.decode(value.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
