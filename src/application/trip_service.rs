use crate::domain::activity::Activity;
use crate::domain::document::{Filter, Stamp};
use crate::domain::error::DomainError;
use crate::domain::repository::DocumentRepository;
use crate::domain::trip::{Trip, TripBody, TripPatch};
use crate::domain::validation::Validate;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub struct TripService<T: DocumentRepository<Trip>, A: DocumentRepository<Activity>> {
    trips: Arc<T>,
    activities: Arc<A>,
}

impl<T: DocumentRepository<Trip>, A: DocumentRepository<Activity>> TripService<T, A> {
    pub fn new(trips: Arc<T>, activities: Arc<A>) -> Self {
        Self { trips, activities }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Trip>> {
        self.trips.find(&Filter::owner(owner_id)).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, owner_id: Uuid, trip_id: Uuid) -> Result<Trip> {
        self.trips
            .find_one(&Filter::owner(owner_id).with_id(trip_id))
            .await?
            .ok_or_else(|| DomainError::not_found("Trip").into())
    }

    #[instrument(skip(self, body), fields(destination = %body.destination))]
    pub async fn create(&self, owner_id: Uuid, body: TripBody) -> Result<Trip> {
        let trip = Trip::create(body, Stamp::new(owner_id));
        trip.validate()?;
        let trip = self.trips.insert(trip).await?;
        info!(trip_id = %trip.id, "Trip created");
        Ok(trip)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, owner_id: Uuid, trip_id: Uuid, patch: TripPatch) -> Result<Trip> {
        let trip = self
            .trips
            .find_one_and_update(&Filter::owner(owner_id).with_id(trip_id), &patch)
            .await?
            .ok_or_else(|| DomainError::not_found("Trip"))?;
        info!(trip_id = %trip.id, "Trip updated");
        Ok(trip)
    }

    /// Deletes the trip's activities, then the trip itself.
    ///
    /// If removing the activities fails the trip is left in place, so the
    /// whole operation can be retried.
    #[instrument(skip(self))]
    pub async fn delete_trip(&self, owner_id: Uuid, trip_id: Uuid) -> Result<Trip> {
        let filter = Filter::owner(owner_id).with_id(trip_id);
        if self.trips.find_one(&filter).await?.is_none() {
            warn!("Trip not found for deletion");
            return Err(DomainError::not_found("Trip").into());
        }

        let removed_activities = self.activities.delete_many(&Filter::trip(trip_id)).await?;
        debug!(removed_activities, "Cascade removed activities");

        let trip = self
            .trips
            .find_one_and_delete(&filter)
            .await?
            .ok_or_else(|| DomainError::not_found("Trip"))?;
        info!(removed_activities, "Trip deleted");
        Ok(trip)
    }

    /// Bulk variant of [`Self::delete_trip`]; returns the number of trips removed.
    #[instrument(skip(self))]
    pub async fn delete_trips_for_owner(&self, owner_id: Uuid) -> Result<usize> {
        let trips = self.trips.find(&Filter::owner(owner_id)).await?;
        let mut deleted = 0;
        for trip in trips {
            self.activities.delete_many(&Filter::trip(trip.id)).await?;
            if self
                .trips
                .find_one_and_delete(&Filter::owner(owner_id).with_id(trip.id))
                .await?
                .is_some()
            {
                deleted += 1;
            }
        }
        info!(deleted, "Trips deleted for owner");
        Ok(deleted)
    }
}
