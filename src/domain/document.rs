use crate::domain::validation::Validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored record owned by exactly one user.
pub trait Document: Validate + Clone + Send + Sync + 'static {
    /// Partial update merged by `apply`.
    type Patch: Send + Sync;

    /// Human readable entity name, used in not-found messages.
    const NAME: &'static str;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
    /// Parent trip; `None` for top-level documents.
    fn trip_id(&self) -> Option<Uuid>;
    fn apply(&mut self, patch: &Self::Patch);
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Document that lives under a trip.
pub trait ChildDocument: Document {
    type Body: Send;

    /// Path segment of the collection under `/trips/{trip_id}`.
    const COLLECTION: &'static str;

    fn create(body: Self::Body, stamp: Stamp, trip_id: Uuid) -> Self;
}

/// Identity and creation time handed to a new document.
#[derive(Debug, Clone, Copy)]
pub struct Stamp {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub at: DateTime<Utc>,
}

impl Stamp {
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            at: Utc::now(),
        }
    }
}

/// Conjunction of equality filters over the scoping fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filter {
    pub id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub trip_id: Option<Uuid>,
}

impl Filter {
    pub fn owner(owner_id: Uuid) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    pub fn trip(trip_id: Uuid) -> Self {
        Self {
            trip_id: Some(trip_id),
            ..Self::default()
        }
    }

    pub fn with_trip(mut self, trip_id: Uuid) -> Self {
        self.trip_id = Some(trip_id);
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn matches<D: Document>(&self, doc: &D) -> bool {
        self.id.is_none_or(|id| doc.id() == id)
            && self.owner_id.is_none_or(|owner| doc.owner_id() == owner)
            && self.trip_id.is_none_or(|trip| doc.trip_id() == Some(trip))
    }
}

/// Reference to the parent trip attached to child reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRef {
    pub id: Uuid,
    pub destination: String,
}

/// Child record together with its resolved parent trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithTrip<D> {
    #[serde(flatten)]
    pub record: D,
    pub trip: Option<TripRef>,
}
