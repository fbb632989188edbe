use civic_core::{SessionPayload, SessionRecord, Udo, User};

#[derive(Debug, thiserror::Error)]
pub enum SessionSerializerError {
    #[error("Failed to encode session payload: {0}")]
    Encoding(String),
    #[error("Session record is not an object")]
    NotAnObject,
    #[error("Malformed session record: {0}")]
    Malformed(String),
}

/// Converts users to durable session payloads and back.
///
/// Everything a request needs is written into the payload, so restoring a
/// session never goes back to the credential store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionSerializer;

impl SessionSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Materialises derived fields and produces the payload.
    pub fn serialize(&self, user: &User) -> Result<SessionPayload, SessionSerializerError> {
        tracing::trace!(uid = %user.id(), "Serializing user");
        self.serialize_udo(&Udo::from(user))
    }

    pub fn serialize_udo(&self, udo: &Udo) -> Result<SessionPayload, SessionSerializerError> {
        serde_json::to_value(udo)
            .map(SessionPayload::from_value)
            .map_err(|e| SessionSerializerError::Encoding(e.to_string()))
    }

    /// Pass-through read of a payload. Malformed payloads are an integrity
    /// problem of the store and are reported, not defaulted.
    pub fn deserialize(&self, payload: &SessionPayload) -> Result<Udo, SessionSerializerError> {
        serde_json::from_value(payload.as_value().clone())
            .map_err(|e| SessionSerializerError::Malformed(e.to_string()))
    }

    /// Identity bound to a raw session record, `None` for anonymous sessions.
    ///
    /// Only the `user` key is interpreted; every other key stays opaque.
    pub fn restore(
        &self,
        record: serde_json::Value,
    ) -> Result<Option<Udo>, SessionSerializerError> {
        let serde_json::Value::Object(mut record) = record else {
            return Err(SessionSerializerError::NotAnObject);
        };

        match record.remove("user") {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(user) => self.deserialize(&SessionPayload::from_value(user)).map(Some),
        }
    }

    /// Record for a freshly authenticated identity.
    pub fn record_for(&self, udo: &Udo) -> Result<serde_json::Value, SessionSerializerError> {
        let record = SessionRecord::for_user(self.serialize_udo(udo)?);
        serde_json::to_value(record).map_err(|e| SessionSerializerError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::{Email, UserId};
    use quickcheck_macros::quickcheck;
    use serde_json::json;

    fn user(first: &str, last: &str) -> User {
        User::new(
            UserId::new(),
            Email::parse("jane@example.com").unwrap(),
            first.to_string(),
            last.to_string(),
        )
    }

    #[test]
    fn test_payload_carries_virtual_fields() {
        let payload = SessionSerializer.serialize(&user("Jane", "Doe")).unwrap();
        assert_eq!(payload.as_value()["fullName"], "Jane Doe");
        assert!(payload.as_value().get("passwordHash").is_none());
    }

    #[quickcheck]
    fn round_trip_reproduces_projection(first: String, last: String) -> bool {
        let user = user(&first, &last);
        let serializer = SessionSerializer::new();

        let payload = serializer.serialize(&user).unwrap();
        serializer.deserialize(&payload).unwrap() == Udo::from(&user)
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let payload = SessionPayload::from_value(json!({ "id": 42, "email": null }));
        assert!(matches!(
            SessionSerializer.deserialize(&payload),
            Err(SessionSerializerError::Malformed(_))
        ));
    }

    #[test]
    fn test_restore_record_variants() {
        let serializer = SessionSerializer;
        let udo = Udo::from(&user("Jane", "Doe"));

        let record = serializer.record_for(&udo).unwrap();
        assert_eq!(serializer.restore(record).unwrap(), Some(udo));

        let anonymous = serde_json::to_value(SessionRecord::anonymous()).unwrap();
        assert_eq!(serializer.restore(anonymous).unwrap(), None);

        assert!(matches!(
            serializer.restore(json!("just a string")),
            Err(SessionSerializerError::NotAnObject)
        ));
        assert!(matches!(
            serializer.restore(json!({ "user": { "id": "nope" } })),
            Err(SessionSerializerError::Malformed(_))
        ));
    }

    #[test]
    fn test_restore_ignores_keys_it_does_not_own() {
        let serializer = SessionSerializer;

        assert_eq!(serializer.restore(json!({})).unwrap(), None);
        assert_eq!(
            serializer
                .restore(json!({ "cookie": { "path": "/", "httpOnly": true } }))
                .unwrap(),
            None
        );
        assert_eq!(
            serializer
                .restore(json!({ "createdAt": "yesterday", "user": null }))
                .unwrap(),
            None
        );

        let udo = Udo::from(&user("Jane", "Doe"));
        let restored = serializer
            .restore(json!({ "cookie": { "path": "/" }, "user": udo }))
            .unwrap();
        assert_eq!(restored, Some(udo));
    }
}
