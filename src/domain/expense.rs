use crate::domain::document::{ChildDocument, Document, Stamp};
use crate::domain::error::DomainError;
use crate::domain::validation::{Validate, require_non_negative, require_text};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseType {
    Accommodation,
    Food,
    Transportation,
    Entertainment,
    Activities,
    Shopping,
    Health,
    Other,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 8] = [
        ExpenseType::Accommodation,
        ExpenseType::Food,
        ExpenseType::Transportation,
        ExpenseType::Entertainment,
        ExpenseType::Activities,
        ExpenseType::Shopping,
        ExpenseType::Health,
        ExpenseType::Other,
    ];
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub trip_id: Uuid,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ExpenseType,
    /// In the trip's local currency.
    pub amount: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBody {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ExpenseType,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExpenseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl From<ExpenseBody> for ExpensePatch {
    fn from(body: ExpenseBody) -> Self {
        Self {
            description: Some(body.description),
            kind: Some(body.kind),
            amount: Some(body.amount),
            date: Some(body.date),
        }
    }
}

impl Validate for Expense {
    fn validate(&self) -> Result<(), DomainError> {
        require_text("description", &self.description)?;
        require_non_negative("amount", self.amount)
    }
}

impl Document for Expense {
    type Patch = ExpensePatch;

    const NAME: &'static str = "Expense";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn trip_id(&self) -> Option<Uuid> {
        Some(self.trip_id)
    }

    fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl ChildDocument for Expense {
    type Body = ExpenseBody;

    const COLLECTION: &'static str = "expenses";

    fn create(body: ExpenseBody, stamp: Stamp, trip_id: Uuid) -> Self {
        Self {
            id: stamp.id,
            owner_id: stamp.owner_id,
            trip_id,
            description: body.description,
            kind: body.kind,
            amount: body.amount,
            date: body.date,
            created_at: stamp.at,
            updated_at: stamp.at,
        }
    }
}
