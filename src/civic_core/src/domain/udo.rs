use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// User Data Object: the secret-free projection of a user that travels with
/// requests and sockets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Udo {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl Udo {
    /// String value of a named field, as used by ownership checks.
    ///
    /// Accepts the serialised (camelCase) field names.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "id" => self.id.to_string(),
            "email" => self.email.clone(),
            "firstName" => self.first_name.clone(),
            "lastName" => self.last_name.clone(),
            "fullName" => self.full_name.clone(),
            _ => return None,
        };
        (!value.is_empty()).then_some(value)
    }
}

impl From<&User> for Udo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().as_str().to_owned(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            full_name: user.full_name(),
        }
    }
}

/// The durable form of a [`Udo`] as written into a session record.
///
/// Opaque JSON: producing one from a `Udo` always succeeds, reading one back
/// may fail if the store handed us something we did not write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionPayload(serde_json::Value);

impl SessionPayload {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}
