use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Collection-scoped integer id, assigned as `max + 1` starting at 1.
pub type RecordId = u64;

/// Field names of the system envelope present on every record.
pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "created_at";
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Entity fields as an order-preserving JSON object.
pub type Fields = Map<String, JsonValue>;

/// One persisted record: entity-specific fields plus the system envelope
/// (`id`, `created_at`, `updated_at`). The store treats everything outside
/// the envelope as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Fields,
}

impl Record {
    /// Assemble a fresh record from entity fields: the envelope is stamped
    /// here and nowhere else. Field order on disk is id, entity fields,
    /// timestamps; envelope fields smuggled in via `fields` are discarded.
    pub(crate) fn with_envelope(fields: Fields, id: RecordId) -> Self {
        let now = now_timestamp();
        let mut out = Fields::with_capacity(fields.len() + 3);
        out.insert(ID_FIELD.to_string(), JsonValue::from(id));
        for (name, value) in fields {
            if is_envelope_field(&name) {
                continue;
            }
            out.insert(name, value);
        }
        out.insert(CREATED_AT_FIELD.to_string(), JsonValue::from(now.clone()));
        out.insert(UPDATED_AT_FIELD.to_string(), JsonValue::from(now));
        Self { fields: out }
    }

    pub fn id(&self) -> Option<RecordId> {
        self.fields.get(ID_FIELD).and_then(JsonValue::as_u64)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.fields.get(CREATED_AT_FIELD).and_then(JsonValue::as_str)
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.fields.get(UPDATED_AT_FIELD).and_then(JsonValue::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Merge a partial patch over the existing fields. Patch fields win,
    /// untouched fields keep their values. `id` and `created_at` are
    /// immutable; `updated_at` is refreshed by the store, never the caller.
    pub(crate) fn apply_patch(&mut self, patch: Patch) {
        for (name, value) in patch.into_fields() {
            if is_envelope_field(&name) {
                continue;
            }
            self.fields.insert(name, value);
        }
        self.fields.insert(
            UPDATED_AT_FIELD.to_string(),
            JsonValue::from(now_timestamp()),
        );
    }
}

fn is_envelope_field(name: &str) -> bool {
    name == ID_FIELD || name == CREATED_AT_FIELD || name == UPDATED_AT_FIELD
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-15T10:30:00.123Z`.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Partial update applied by [`Record::apply_patch`]: a set of fields that
/// replace their current values. Envelope fields are ignored if present.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    fields: Fields,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    /// Set one field, builder style.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }
}
