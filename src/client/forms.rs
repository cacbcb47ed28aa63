//! Form submissions: raw field strings in, typed request bodies out.

use crate::client::api::collection_path;
use crate::domain::activity::ActivityBody;
use crate::domain::document::ChildDocument;
use crate::domain::expense::ExpenseBody;
use crate::domain::note::NoteBody;
use crate::domain::trip::{DEFAULT_CURRENCY, Trip, TripBody};
use crate::domain::user::{CreateUser, LoginRequest};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} has an invalid value: {value}")]
    Invalid { field: &'static str, value: String },
}

/// Submitted fields by input name. Blank inputs count as absent.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<&str, FormError> {
        self.get(name).ok_or(FormError::Missing(name))
    }

    fn checked(&self, name: &str) -> bool {
        matches!(self.get(name), Some("on" | "true"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn invalid(field: &'static str, value: &str) -> FormError {
    FormError::Invalid {
        field,
        value: value.to_string(),
    }
}

fn parse_date(form: &FormData, field: &'static str) -> Result<NaiveDate, FormError> {
    let value = form.required(field)?;
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid(field, value))
}

fn parse_amount(form: &FormData, field: &'static str) -> Result<f64, FormError> {
    let value = form.required(field)?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(field, value))
}

/// Select values are the enum variant names.
fn parse_choice<T: DeserializeOwned>(form: &FormData, field: &'static str) -> Result<T, FormError> {
    let value = form.required(field)?;
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| invalid(field, value))
}

/// Date and time inputs are read as UTC.
fn parse_moment(
    form: &FormData,
    date_field: &'static str,
    time_field: &'static str,
) -> Result<DateTime<Utc>, FormError> {
    let date = parse_date(form, date_field)?;
    let time = match form.get(time_field) {
        Some(value) => {
            NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| invalid(time_field, value))?
        }
        None => NaiveTime::MIN,
    };
    Ok(NaiveDateTime::new(date, time).and_utc())
}

fn currency(form: &FormData, field: &str) -> String {
    form.get(field)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

pub fn trip_body(form: &FormData) -> Result<TripBody, FormError> {
    let limit = if form.checked("expenseLimitEnabled") {
        Some(parse_amount(form, "expenseLimit")?)
    } else {
        None
    };

    Ok(TripBody {
        destination: form.required("destination")?.to_string(),
        start: parse_date(form, "start")?,
        end: parse_date(form, "end")?,
        transportation: parse_choice(form, "transportation")?,
        limit,
        my_currency: currency(form, "myCurrency"),
        local_currency: currency(form, "localCurrency"),
    })
}

pub fn activity_body(form: &FormData) -> Result<ActivityBody, FormError> {
    let end = match form.get("end-date") {
        Some(_) => Some(parse_moment(form, "end-date", "end-time")?),
        None => None,
    };

    Ok(ActivityBody {
        name: form.required("name")?.to_string(),
        location: form.required("location")?.to_string(),
        kind: parse_choice(form, "type")?,
        external_url: form.get("externalUrl").map(str::to_string),
        start: parse_moment(form, "start-date", "start-time")?,
        end,
    })
}

pub fn note_body(form: &FormData) -> Result<NoteBody, FormError> {
    Ok(NoteBody {
        title: form.required("title")?.to_string(),
        note: form.required("note")?.to_string(),
        kind: match form.get("type") {
            Some(_) => parse_choice(form, "type")?,
            None => Default::default(),
        },
    })
}

pub fn expense_body(form: &FormData) -> Result<ExpenseBody, FormError> {
    Ok(ExpenseBody {
        description: form.required("description")?.to_string(),
        kind: parse_choice(form, "type")?,
        amount: parse_amount(form, "amount")?,
        date: parse_date(form, "date")?,
    })
}

pub fn login_request(form: &FormData) -> Result<LoginRequest, FormError> {
    Ok(LoginRequest {
        email: form.required("email")?.to_string(),
        password: form.required("password")?.to_string(),
    })
}

pub fn register_request(form: &FormData) -> Result<CreateUser, FormError> {
    Ok(CreateUser {
        email: form.required("email")?.to_string(),
        name: form.required("name")?.to_string(),
        password: form.required("password")?.to_string(),
    })
}

pub fn trip_route(trip: &Trip) -> String {
    format!("/trips/{}", trip.id)
}

/// Child forms return to the list of their collection.
pub fn child_route<C: ChildDocument>(record: &C) -> String {
    match record.trip_id() {
        Some(trip_id) => collection_path::<C>(trip_id),
        None => "/trips".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Navigate(String),
    Failed(String),
}

/// Inline state of a form while it submits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub loading: bool,
    pub error: Option<String>,
}

impl FormState {
    /// Sends `body` through `method`; on success the caller navigates to
    /// `route` of the stored record and the form stays in its loading state.
    pub async fn submit<B, R, E, Fut>(
        &mut self,
        body: Result<B, FormError>,
        method: impl FnOnce(B) -> Fut,
        route: impl FnOnce(&R) -> String,
    ) -> Submission
    where
        E: Display,
        Fut: Future<Output = Result<R, E>>,
    {
        let body = match body {
            Ok(body) => body,
            Err(e) => return self.fail(e),
        };

        self.loading = true;
        self.error = None;
        match method(body).await {
            Ok(record) => Submission::Navigate(route(&record)),
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: impl Display) -> Submission {
        let message = error.to_string();
        self.loading = false;
        self.error = Some(message.clone());
        Submission::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::{Activity, ActivityType};
    use crate::domain::document::{ChildDocument, Stamp};
    use crate::domain::expense::ExpenseType;
    use crate::domain::note::NoteType;
    use crate::domain::trip::TransportationType;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn trip_form() -> FormData {
        FormData::new()
            .with("destination", "Paris")
            .with("start", "2025-06-01")
            .with("end", "2025-06-07")
            .with("transportation", "Train")
            .with("expenseLimit", "500")
            .with("localCurrency", "gbp")
    }

    #[test]
    fn test_trip_body_limit_toggle() {
        let body = trip_body(&trip_form()).unwrap();
        assert_eq!(body.limit, None);
        assert_eq!(body.transportation, TransportationType::Train);
        assert_eq!(body.my_currency, "EUR");
        assert_eq!(body.local_currency, "GBP");

        let body = trip_body(&trip_form().with("expenseLimitEnabled", "on")).unwrap();
        assert_eq!(body.limit, Some(500.0));
    }

    #[test]
    fn test_trip_body_rejects_bad_fields() {
        let err = trip_body(&trip_form().with("transportation", "Rocket")).unwrap_err();
        assert_eq!(
            err,
            FormError::Invalid {
                field: "transportation",
                value: "Rocket".to_string()
            }
        );

        let err = trip_body(&trip_form().with("destination", "  ")).unwrap_err();
        assert_eq!(err, FormError::Missing("destination"));

        let err = trip_body(&trip_form().with("start", "01/06/2025")).unwrap_err();
        assert!(matches!(err, FormError::Invalid { field: "start", .. }));

        let form = trip_form()
            .with("expenseLimitEnabled", "on")
            .with("expenseLimit", "lots");
        assert!(matches!(
            trip_body(&form).unwrap_err(),
            FormError::Invalid { field: "expenseLimit", .. }
        ));
    }

    #[test]
    fn test_activity_body_combines_date_and_time() {
        let form: FormData = [
            ("name", "Louvre"),
            ("location", "Rue de Rivoli"),
            ("type", "Culture"),
            ("start-date", "2025-06-02"),
            ("start-time", "10:30"),
            ("end-date", "2025-06-02"),
            ("end-time", "13:00"),
            ("externalUrl", ""),
        ]
        .into_iter()
        .collect();

        let body = activity_body(&form).unwrap();
        assert_eq!(body.kind, ActivityType::Culture);
        assert_eq!(
            body.start,
            Utc.with_ymd_and_hms(2025, 6, 2, 10, 30, 0).unwrap()
        );
        assert_eq!(body.end, Some(Utc.with_ymd_and_hms(2025, 6, 2, 13, 0, 0).unwrap()));
        assert_eq!(body.external_url, None);
    }

    #[test]
    fn test_activity_body_without_end() {
        let form = FormData::new()
            .with("name", "Walk")
            .with("location", "Seine")
            .with("type", "Leisure")
            .with("start-date", "2025-06-03");

        let body = activity_body(&form).unwrap();
        assert_eq!(body.end, None);
        assert_eq!(body.start, Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_note_and_expense_bodies() {
        let note = note_body(&FormData::new().with("title", "Tickets").with("note", "Print")).unwrap();
        assert_eq!(note.kind, NoteType::General);

        let expense = expense_body(
            &FormData::new()
                .with("description", "Hotel")
                .with("type", "Accommodation")
                .with("amount", "120.5")
                .with("date", "2025-06-01"),
        )
        .unwrap();
        assert_eq!(expense.kind, ExpenseType::Accommodation);
        assert_eq!(expense.amount, 120.5);
    }

    #[test]
    fn test_child_route_points_at_collection() {
        let trip_id = Uuid::new_v4();
        let activity = Activity::create(
            activity_body(
                &FormData::new()
                    .with("name", "Walk")
                    .with("location", "Seine")
                    .with("type", "Leisure")
                    .with("start-date", "2025-06-03"),
            )
            .unwrap(),
            Stamp::new(Uuid::new_v4()),
            trip_id,
        );

        assert_eq!(
            child_route(&activity),
            format!("/trips/{}/activities", trip_id)
        );
    }

    #[tokio::test]
    async fn test_submit_navigates_on_success() {
        let mut state = FormState::default();

        let outcome = state
            .submit(
                Ok(3),
                |n: u32| async move { Ok::<_, String>(n * 2) },
                |n: &u32| format!("/trips/{}", n),
            )
            .await;

        assert_eq!(outcome, Submission::Navigate("/trips/6".to_string()));
        assert!(state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_submit_keeps_inline_error() {
        let mut state = FormState::default();

        let outcome = state
            .submit(
                Ok(1),
                |_: u32| async { Err::<u32, _>("Trip not found".to_string()) },
                |_: &u32| String::new(),
            )
            .await;

        assert_eq!(outcome, Submission::Failed("Trip not found".to_string()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Trip not found"));
    }

    #[tokio::test]
    async fn test_submit_skips_method_for_invalid_form() {
        let mut state = FormState::default();
        let mut called = false;

        let outcome = state
            .submit(
                login_request(&FormData::new().with("email", "a@b.c")),
                |_: LoginRequest| {
                    called = true;
                    async { Ok::<_, String>(()) }
                },
                |_: &()| "/".to_string(),
            )
            .await;

        assert_eq!(outcome, Submission::Failed("password is required".to_string()));
        assert!(!called);
    }
}
