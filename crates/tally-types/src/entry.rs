use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::error::TypeError;
use crate::resource::ResourceDelta;
use crate::time::GameTime;

/// The kind of economic/world event an entry records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Transfer,
    Produce,
    Consume,
    Move,
    Tax,
    Fee,
    Mint,
    Burn,
    Note,
}

/// Extension payload attached to an entry.
///
/// Known structured extensions travel as JSON; anything the ledger cannot
/// interpret travels as opaque bytes. Both forms canonical-encode
/// deterministically, which keeps entry ids well-defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtPayload {
    /// Structured extension data.
    Json(serde_json::Value),
    /// Uninterpreted extension bytes (hex-encoded on the wire).
    Opaque(#[serde(with = "hex::serde")] Vec<u8>),
}

/// Everything an entry records except its derived id.
///
/// The entry id is the domain-tagged hash of this body's canonical encoding;
/// bodies are therefore the unit of content addressing. Two byte-identical
/// bodies produce the same id, by design.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryBody {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// When it happened, in logical time.
    pub time: GameTime,
    /// Who initiated it.
    pub actor: String,
    /// The other party, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    /// Resources consumed by the event.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<ResourceDelta>,
    /// Resources produced by the event.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<ResourceDelta>,
    /// Causal links to prior entry ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<Digest>,
    /// Extension payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<ExtPayload>,
}

impl EntryBody {
    /// A minimal body with the given kind, time, and actor.
    pub fn new(kind: EntryKind, time: GameTime, actor: impl Into<String>) -> Self {
        Self {
            kind,
            time,
            actor: actor.into(),
            counterparty: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            refs: Vec::new(),
            ext: None,
        }
    }

    /// Validate every resource delta in `inputs` and `outputs`.
    pub fn validate(&self) -> Result<(), TypeError> {
        for delta in self.inputs.iter().chain(self.outputs.iter()) {
            delta.validate()?;
        }
        Ok(())
    }
}

/// An immutable, content-addressed ledger entry.
///
/// Constructed only by the entry factory in `tally-ledger`; the `id` is
/// derived from the body and never assigned by callers. Serializes flat:
/// the body's fields sit beside `id` rather than under a nested key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Derived content id: the ENTRY-domain hash of the canonical body.
    pub id: Digest,
    /// The recorded event.
    #[serde(flatten)]
    pub body: EntryBody,
}

impl<'de> Deserialize<'de> for LedgerEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        // A derived `flatten` here would buffer the body through serde's
        // content machinery, which loses arbitrary-precision number tokens
        // (the 128-bit amounts), so split the map by hand instead.
        let mut fields = serde_json::Map::deserialize(deserializer)?;
        let id = fields
            .remove("id")
            .ok_or_else(|| D::Error::missing_field("id"))?;
        let id: Digest = serde_json::from_value(id).map_err(D::Error::custom)?;
        let body: EntryBody = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(D::Error::custom)?;
        Ok(Self { id, body })
    }
}

impl LedgerEntry {
    /// When the entry happened.
    pub fn time(&self) -> &GameTime {
        &self.body.time
    }

    /// The entry's kind.
    pub fn kind(&self) -> EntryKind {
        self.body.kind
    }

    /// The initiating actor.
    pub fn actor(&self) -> &str {
        &self.body.actor
    }

    /// Returns `true` if `resource` appears in the entry's inputs or outputs.
    pub fn touches_resource(&self, resource: &str) -> bool {
        self.body
            .inputs
            .iter()
            .chain(self.body.outputs.iter())
            .any(|delta| delta.resource == resource)
    }
}
