use crate::domain::document::{ChildDocument, Document, Stamp};
use crate::domain::error::DomainError;
use crate::domain::validation::{Validate, require_ordered, require_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    Sport,
    Culture,
    Adventure,
    Leisure,
    Nature,
    Entertainment,
    Other,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub trip_id: Uuid,
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    #[serde(default)]
    pub external_url: Option<String>,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBody {
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActivityType>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub external_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub end: Option<Option<DateTime<Utc>>>,
}

impl From<ActivityBody> for ActivityPatch {
    fn from(body: ActivityBody) -> Self {
        Self {
            name: Some(body.name),
            location: Some(body.location),
            kind: Some(body.kind),
            external_url: Some(body.external_url),
            start: Some(body.start),
            end: Some(body.end),
        }
    }
}

impl Validate for Activity {
    fn validate(&self) -> Result<(), DomainError> {
        require_text("name", &self.name)?;
        require_text("location", &self.location)?;
        if let Some(end) = &self.end {
            require_ordered(&self.start, end)?;
        }
        Ok(())
    }
}

impl Document for Activity {
    type Patch = ActivityPatch;

    const NAME: &'static str = "Activity";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn trip_id(&self) -> Option<Uuid> {
        Some(self.trip_id)
    }

    fn apply(&mut self, patch: &ActivityPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(url) = &patch.external_url {
            self.external_url = url.clone();
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl ChildDocument for Activity {
    type Body = ActivityBody;

    const COLLECTION: &'static str = "activities";

    fn create(body: ActivityBody, stamp: Stamp, trip_id: Uuid) -> Self {
        Self {
            id: stamp.id,
            owner_id: stamp.owner_id,
            trip_id,
            name: body.name,
            location: body.location,
            kind: body.kind,
            // forms submit an empty string when the field is left blank
            external_url: body.external_url.filter(|url| !url.trim().is_empty()),
            start: body.start,
            end: body.end,
            created_at: stamp.at,
            updated_at: stamp.at,
        }
    }
}
