use crate::domain::document::{ChildDocument, Document, Stamp};
use crate::domain::error::DomainError;
use crate::domain::validation::{Validate, require_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteType {
    #[default]
    General,
    Reminder,
    Important,
    Other,
}

impl NoteType {
    pub const ALL: [NoteType; 4] = [
        NoteType::General,
        NoteType::Reminder,
        NoteType::Important,
        NoteType::Other,
    ];
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub trip_id: Uuid,
    pub title: String,
    pub note: String,
    #[serde(rename = "type")]
    pub kind: NoteType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteBody {
    pub title: String,
    pub note: String,
    #[serde(rename = "type", default)]
    pub kind: NoteType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NoteType>,
}

impl From<NoteBody> for NotePatch {
    fn from(body: NoteBody) -> Self {
        Self {
            title: Some(body.title),
            note: Some(body.note),
            kind: Some(body.kind),
        }
    }
}

impl Validate for Note {
    fn validate(&self) -> Result<(), DomainError> {
        require_text("title", &self.title)?;
        require_text("note", &self.note)
    }
}

impl Document for Note {
    type Patch = NotePatch;

    const NAME: &'static str = "Note";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn trip_id(&self) -> Option<Uuid> {
        Some(self.trip_id)
    }

    fn apply(&mut self, patch: &NotePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(note) = &patch.note {
            self.note = note.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl ChildDocument for Note {
    type Body = NoteBody;

    const COLLECTION: &'static str = "notes";

    fn create(body: NoteBody, stamp: Stamp, trip_id: Uuid) -> Self {
        Self {
            id: stamp.id,
            owner_id: stamp.owner_id,
            trip_id,
            title: body.title,
            note: body.note,
            kind: body.kind,
            created_at: stamp.at,
            updated_at: stamp.at,
        }
    }
}
