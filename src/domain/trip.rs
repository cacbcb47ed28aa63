use crate::domain::document::{Document, Stamp, TripRef};
use crate::domain::error::DomainError;
use crate::domain::validation::{
    Validate, require_currency, require_non_negative, require_ordered, require_text,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportationType {
    Car,
    Train,
    Plane,
    Bus,
    Ship,
    Motorcycle,
}

impl TransportationType {
    pub const ALL: [TransportationType; 6] = [
        TransportationType::Car,
        TransportationType::Train,
        TransportationType::Plane,
        TransportationType::Bus,
        TransportationType::Ship,
        TransportationType::Motorcycle,
    ];
}

impl fmt::Display for TransportationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub destination: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub transportation: TransportationType,
    #[serde(default)]
    pub limit: Option<f64>,
    pub my_currency: String,
    pub local_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripBody {
    pub destination: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub transportation: TransportationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    #[serde(default = "default_currency")]
    pub my_currency: String,
    #[serde(default = "default_currency")]
    pub local_currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation: Option<TransportationType>,
    /// `Some(None)` clears the budget.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub limit: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_currency: Option<String>,
}

impl From<TripBody> for TripPatch {
    fn from(body: TripBody) -> Self {
        Self {
            destination: Some(body.destination),
            start: Some(body.start),
            end: Some(body.end),
            transportation: Some(body.transportation),
            limit: Some(body.limit),
            my_currency: Some(body.my_currency),
            local_currency: Some(body.local_currency),
        }
    }
}

impl Trip {
    pub fn create(body: TripBody, stamp: Stamp) -> Self {
        Self {
            id: stamp.id,
            owner_id: stamp.owner_id,
            destination: body.destination,
            start: body.start,
            end: body.end,
            transportation: body.transportation,
            limit: body.limit,
            my_currency: body.my_currency,
            local_currency: body.local_currency,
            created_at: stamp.at,
            updated_at: stamp.at,
        }
    }

    pub fn to_ref(&self) -> TripRef {
        TripRef {
            id: self.id,
            destination: self.destination.clone(),
        }
    }
}

impl Validate for Trip {
    fn validate(&self) -> Result<(), DomainError> {
        require_text("destination", &self.destination)?;
        require_ordered(&self.start, &self.end)?;
        if let Some(limit) = self.limit {
            require_non_negative("limit", limit)?;
        }
        require_currency("myCurrency", &self.my_currency)?;
        require_currency("localCurrency", &self.local_currency)?;
        Ok(())
    }
}

impl Document for Trip {
    type Patch = TripPatch;

    const NAME: &'static str = "Trip";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn trip_id(&self) -> Option<Uuid> {
        None
    }

    fn apply(&mut self, patch: &TripPatch) {
        if let Some(destination) = &patch.destination {
            self.destination = destination.clone();
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(transportation) = patch.transportation {
            self.transportation = transportation;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(currency) = &patch.my_currency {
            self.my_currency = currency.clone();
        }
        if let Some(currency) = &patch.local_currency {
            self.local_currency = currency.clone();
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> TripBody {
        TripBody {
            destination: "Paris".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            transportation: TransportationType::Plane,
            limit: Some(1500.0),
            my_currency: "EUR".to_string(),
            local_currency: "EUR".to_string(),
        }
    }

    #[test]
    fn test_body_defaults_currencies() {
        let body: TripBody = serde_json::from_value(serde_json::json!({
            "destination": "Paris",
            "start": "2025-01-01",
            "end": "2025-01-10",
            "transportation": "Plane"
        }))
        .unwrap();

        assert_eq!(body.my_currency, "EUR");
        assert_eq!(body.local_currency, "EUR");
        assert_eq!(body.limit, None);
    }

    #[test]
    fn test_unknown_transportation_is_rejected() {
        let result = serde_json::from_value::<TripBody>(serde_json::json!({
            "destination": "Paris",
            "start": "2025-01-01",
            "end": "2025-01-10",
            "transportation": "Rocket"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let trip = Trip::create(paris(), Stamp::new(Uuid::new_v4()));
        let json = serde_json::to_value(&trip).unwrap();

        assert_eq!(json["destination"], "Paris");
        assert_eq!(json["start"], "2025-01-01");
        assert_eq!(json["transportation"], "Plane");
        assert_eq!(json["myCurrency"], "EUR");
        assert!(json.get("ownerId").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let mut body = paris();
        body.end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let trip = Trip::create(body, Stamp::new(Uuid::new_v4()));

        assert!(matches!(trip.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_negative_limit() {
        let mut body = paris();
        body.limit = Some(-10.0);
        let trip = Trip::create(body, Stamp::new(Uuid::new_v4()));

        assert!(trip.validate().is_err());
    }

    #[test]
    fn test_patch_null_limit_clears_budget() {
        let patch: TripPatch = serde_json::from_value(serde_json::json!({ "limit": null })).unwrap();
        assert_eq!(patch.limit, Some(None));

        let mut trip = Trip::create(paris(), Stamp::new(Uuid::new_v4()));
        trip.apply(&patch);
        assert_eq!(trip.limit, None);
        assert_eq!(trip.destination, "Paris");
    }

    #[test]
    fn test_absent_patch_fields_are_left_untouched() {
        let patch: TripPatch =
            serde_json::from_value(serde_json::json!({ "destination": "Lyon" })).unwrap();
        assert_eq!(patch.limit, None);

        let mut trip = Trip::create(paris(), Stamp::new(Uuid::new_v4()));
        trip.apply(&patch);
        assert_eq!(trip.destination, "Lyon");
        assert_eq!(trip.limit, Some(1500.0));

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "destination": "Lyon" }));
    }
}
