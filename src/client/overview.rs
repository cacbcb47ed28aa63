//! Derived values shown by the trip views.

use crate::client::api::{ApiClient, ClientError};
use crate::domain::activity::Activity;
use crate::domain::expense::{Expense, ExpenseType};
use crate::domain::note::{Note, NoteType};
use crate::domain::trip::Trip;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const UPCOMING_ACTIVITY_COUNT: usize = 3;

/// Trips split around today. A trip ending today is still upcoming.
#[derive(Debug, Default, PartialEq)]
pub struct TripOverview<'a> {
    pub upcoming: Vec<&'a Trip>,
    pub finished: Vec<&'a Trip>,
}

pub fn trip_overview(trips: &[Trip], today: NaiveDate) -> TripOverview<'_> {
    let (mut upcoming, mut finished): (Vec<_>, Vec<_>) =
        trips.iter().partition(|trip| trip.end >= today);
    upcoming.sort_by_key(|trip| trip.start);
    finished.sort_by(|a, b| b.end.cmp(&a.end));
    TripOverview { upcoming, finished }
}

pub fn is_ongoing(trip: &Trip, today: NaiveDate) -> bool {
    trip.start <= today && today <= trip.end
}

pub fn countdown(trip: &Trip, now: DateTime<Utc>) -> String {
    let start = trip.start.and_time(NaiveTime::MIN).and_utc();
    if now < start {
        let secs = (start - now).num_seconds();
        return format!(
            "in {} hours, {} minutes, {} seconds",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        );
    }
    if now.date_naive() > trip.end {
        return "Trip has finished!".to_string();
    }
    "Trip has started!".to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    /// In the trip's local currency.
    pub total_local: f64,
    /// In the traveller's own currency.
    pub total_mine: f64,
    pub limit: Option<f64>,
    /// `limit - total_mine`; negative once the limit is exceeded.
    pub remaining: Option<f64>,
}

impl BudgetSummary {
    pub fn over_limit(&self) -> bool {
        self.remaining.is_some_and(|r| r < 0.0)
    }
}

/// `rate` is the price of one unit of local currency in the traveller's
/// currency. Without a rate, or with equal currencies, amounts are kept.
pub fn budget_summary(trip: &Trip, expenses: &[Expense], rate: Option<f64>) -> BudgetSummary {
    let total_local: f64 = expenses.iter().map(|e| e.amount).sum();
    let rate = if trip.my_currency == trip.local_currency {
        1.0
    } else {
        rate.unwrap_or(1.0)
    };
    let total_mine = total_local * rate;

    BudgetSummary {
        total_local,
        total_mine,
        limit: trip.limit,
        remaining: trip.limit.map(|limit| limit - total_mine),
    }
}

pub fn important_notes(notes: &[Note]) -> Vec<&Note> {
    notes
        .iter()
        .filter(|n| n.kind == NoteType::Important)
        .collect()
}

/// Earliest activities by start time.
pub fn next_activities(activities: &[Activity], count: usize) -> Vec<&Activity> {
    let mut sorted: Vec<_> = activities.iter().collect();
    sorted.sort_by_key(|a| a.start);
    sorted.truncate(count);
    sorted
}

pub fn activities_by_day(activities: &[Activity]) -> BTreeMap<NaiveDate, Vec<&Activity>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Activity>> = BTreeMap::new();
    for activity in activities {
        days.entry(activity.start.date_naive())
            .or_default()
            .push(activity);
    }
    for day in days.values_mut() {
        day.sort_by_key(|a| a.start);
    }
    days
}

pub fn notes_by_type(notes: &[Note]) -> Vec<(NoteType, Vec<&Note>)> {
    group_in_order(&NoteType::ALL, notes, |n| n.kind)
}

pub fn expenses_by_type(expenses: &[Expense]) -> Vec<(ExpenseType, Vec<&Expense>)> {
    group_in_order(&ExpenseType::ALL, expenses, |e| e.kind)
}

/// Groups in the order of `kinds`, skipping empty groups.
fn group_in_order<'a, K, T>(
    kinds: &[K],
    items: &'a [T],
    kind_of: impl Fn(&T) -> K,
) -> Vec<(K, Vec<&'a T>)>
where
    K: Copy + PartialEq,
{
    kinds
        .iter()
        .map(|&kind| {
            let group: Vec<_> = items.iter().filter(|item| kind_of(item) == kind).collect();
            (kind, group)
        })
        .filter(|(_, group)| !group.is_empty())
        .collect()
}

/// Day-month-year as shown in trip lists.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Everything the trip detail page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDashboard {
    pub trip: Trip,
    pub countdown: String,
    pub important_notes: Vec<Note>,
    pub next_activities: Vec<Activity>,
    pub budget: BudgetSummary,
}

impl TripDashboard {
    pub fn build(
        trip: Trip,
        activities: &[Activity],
        notes: &[Note],
        expenses: &[Expense],
        now: DateTime<Utc>,
        rate: Option<f64>,
    ) -> Self {
        Self {
            countdown: countdown(&trip, now),
            important_notes: important_notes(notes).into_iter().cloned().collect(),
            next_activities: next_activities(activities, UPCOMING_ACTIVITY_COUNT)
                .into_iter()
                .cloned()
                .collect(),
            budget: budget_summary(&trip, expenses, rate),
            trip,
        }
    }

    /// Fetches the trip and its records concurrently.
    pub async fn load(
        client: &ApiClient,
        trip_id: Uuid,
        now: DateTime<Utc>,
        rate: Option<f64>,
    ) -> Result<Self, ClientError> {
        let (trip, activities, notes, expenses) = tokio::try_join!(
            client.get_trip(trip_id),
            client.list_records::<Activity>(trip_id),
            client.list_records::<Note>(trip_id),
            client.list_records::<Expense>(trip_id),
        )?;

        let activities: Vec<_> = activities.into_iter().map(|r| r.record).collect();
        let notes: Vec<_> = notes.into_iter().map(|r| r.record).collect();
        let expenses: Vec<_> = expenses.into_iter().map(|r| r.record).collect();

        Ok(Self::build(trip, &activities, &notes, &expenses, now, rate))
    }
}
