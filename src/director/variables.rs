//! Director credentials extracted from interpolated variables

use serde_yaml::{Mapping, Value};

/// Username of the director's built-in admin user
pub const DIRECTOR_USERNAME: &str = "admin";

const ADMIN_PASSWORD: &str = "admin_password";
const DIRECTOR_SSL: &str = "director_ssl";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorCredentials {
    pub username: String,
    pub password: String,
    pub ssl_ca: String,
    pub ssl_certificate: String,
    pub ssl_private_key: String,
}

impl DirectorCredentials {
    /// Flatten the credentials out of a variables mapping.
    ///
    /// Missing entries leave the matching field empty.
    pub fn from_variables(variables: &Mapping) -> Self {
        let password = string_at(variables, ADMIN_PASSWORD);
        let username = if password.is_empty() {
            String::new()
        } else {
            DIRECTOR_USERNAME.to_string()
        };

        let ssl = variables
            .get(DIRECTOR_SSL)
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default();

        Self {
            username,
            password,
            ssl_ca: string_at(&ssl, "ca"),
            ssl_certificate: string_at(&ssl, "certificate"),
            ssl_private_key: string_at(&ssl, "private_key"),
        }
    }
}

fn string_at(mapping: &Mapping, key: &str) -> String {
    mapping
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Serialize variables into the YAML form persisted with the director.
pub fn to_yaml(variables: &Mapping) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(variables)
}

/// Parse persisted variables YAML; empty text is an empty mapping.
pub fn from_yaml(yaml: &str) -> Result<Mapping, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    serde_yaml::from_str(yaml)
}
