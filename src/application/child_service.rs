use crate::domain::document::{ChildDocument, Filter, Stamp, WithTrip};
use crate::domain::error::DomainError;
use crate::domain::repository::DocumentRepository;
use crate::domain::trip::Trip;
use anyhow::Result;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Owner-scoped CRUD for records that live under a trip.
pub struct ChildService<C, R, T>
where
    C: ChildDocument,
    R: DocumentRepository<C>,
    T: DocumentRepository<Trip>,
{
    records: Arc<R>,
    trips: Arc<T>,
    _record: PhantomData<C>,
}

impl<C, R, T> ChildService<C, R, T>
where
    C: ChildDocument,
    R: DocumentRepository<C>,
    T: DocumentRepository<Trip>,
{
    pub fn new(records: Arc<R>, trips: Arc<T>) -> Self {
        Self {
            records,
            trips,
            _record: PhantomData,
        }
    }

    fn scope(owner_id: Uuid, trip_id: Uuid) -> Filter {
        Filter::owner(owner_id).with_trip(trip_id)
    }

    async fn find_trip(&self, owner_id: Uuid, trip_id: Uuid) -> Result<Option<Trip>> {
        self.trips
            .find_one(&Filter::owner(owner_id).with_id(trip_id))
            .await
    }

    async fn require_trip(&self, owner_id: Uuid, trip_id: Uuid) -> Result<Trip> {
        self.find_trip(owner_id, trip_id).await?.ok_or_else(|| {
            warn!(trip_id = %trip_id, "Parent trip missing or not owned");
            DomainError::not_found("Trip").into()
        })
    }

    #[instrument(skip(self), fields(record = C::NAME))]
    pub async fn list(&self, owner_id: Uuid, trip_id: Uuid) -> Result<Vec<WithTrip<C>>> {
        let trip = self.find_trip(owner_id, trip_id).await?.map(|t| t.to_ref());
        let records = self.records.find(&Self::scope(owner_id, trip_id)).await?;
        Ok(records
            .into_iter()
            .map(|record| WithTrip {
                record,
                trip: trip.clone(),
            })
            .collect())
    }

    #[instrument(skip(self), fields(record = C::NAME))]
    pub async fn get(&self, owner_id: Uuid, trip_id: Uuid, id: Uuid) -> Result<WithTrip<C>> {
        let record = self
            .records
            .find_one(&Self::scope(owner_id, trip_id).with_id(id))
            .await?
            .ok_or_else(|| DomainError::not_found(C::NAME))?;
        let trip = self.find_trip(owner_id, trip_id).await?.map(|t| t.to_ref());
        Ok(WithTrip { record, trip })
    }

    #[instrument(skip(self, body), fields(record = C::NAME))]
    pub async fn create(&self, owner_id: Uuid, trip_id: Uuid, body: C::Body) -> Result<C> {
        let trip = self.require_trip(owner_id, trip_id).await?;
        let record = C::create(body, Stamp::new(owner_id), trip.id);
        record.validate()?;
        let record = self.records.insert(record).await?;
        info!(id = %record.id(), "Record created");
        Ok(record)
    }

    #[instrument(skip(self, patch), fields(record = C::NAME))]
    pub async fn update(
        &self,
        owner_id: Uuid,
        trip_id: Uuid,
        id: Uuid,
        patch: C::Patch,
    ) -> Result<C> {
        self.require_trip(owner_id, trip_id).await?;
        let record = self
            .records
            .find_one_and_update(&Self::scope(owner_id, trip_id).with_id(id), &patch)
            .await?
            .ok_or_else(|| DomainError::not_found(C::NAME))?;
        info!(id = %record.id(), "Record updated");
        Ok(record)
    }

    #[instrument(skip(self), fields(record = C::NAME))]
    pub async fn delete(&self, owner_id: Uuid, trip_id: Uuid, id: Uuid) -> Result<C> {
        let record = self
            .records
            .find_one_and_delete(&Self::scope(owner_id, trip_id).with_id(id))
            .await?
            .ok_or_else(|| DomainError::not_found(C::NAME))?;
        info!(id = %record.id(), "Record deleted");
        Ok(record)
    }
}
