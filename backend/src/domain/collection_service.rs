use log::{info, warn};

use crate::db::DbConnection;
use crate::domain::validation::{parse_date, parse_non_negative};
use crate::error::{DomainError, DomainResult};
use crate::storage::sqlite::{CollectionRepository, CustomerRepository, NewCollection};
use shared::{
    CollectionEntryRequest, CollectionRecord, CollectionResponse, RecentCollectionsResponse,
    UpdateCollectionRequest,
};

/// Default number of rows shown in the entry-screen table.
pub const DEFAULT_RECENT_LIMIT: u32 = 50;

/// Service for milk collection entries. Enforces the derived-amount rule and
/// the one-entry-per-(customer, date, session) rule uniformly for the create
/// and update paths; the uniqueness itself lives in the store's constraint.
#[derive(Clone)]
pub struct CollectionService {
    collection_repository: CollectionRepository,
    customer_repository: CustomerRepository,
}

impl CollectionService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            collection_repository: CollectionRepository::new(db.clone()),
            customer_repository: CustomerRepository::new(db),
        }
    }

    /// Record a collection entry.
    pub async fn create_collection(&self, request: CollectionEntryRequest) -> DomainResult<CollectionResponse> {
        info!(
            "Creating collection entry: customer={}, date={}, session={}",
            request.customer_code, request.date, request.session
        );

        let fields = self.validate_entry(&request).await?;
        let id = self.collection_repository.insert(&fields).await?;

        info!("Created collection entry {} (amount {})", id, fields.amount);

        Ok(CollectionResponse {
            record: record_from_fields(id, fields),
        })
    }

    /// Replace all fields of an existing entry, re-deriving the amount. Moving
    /// the entry onto an occupied (customer, date, session) triple is rejected
    /// the same way a create would be.
    pub async fn update_collection(&self, request: UpdateCollectionRequest) -> DomainResult<CollectionResponse> {
        info!("Updating collection entry {}", request.id);

        let fields = self.validate_entry(&request.entry).await?;
        self.collection_repository.update(request.id, &fields).await?;

        Ok(CollectionResponse {
            record: record_from_fields(request.id, fields),
        })
    }

    /// Permanently delete one entry by id.
    pub async fn delete_collection(&self, id: i64) -> DomainResult<()> {
        info!("Deleting collection entry {}", id);
        self.collection_repository.delete(id).await
    }

    /// Fetch one entry by id.
    pub async fn get_collection(&self, id: i64) -> DomainResult<Option<CollectionRecord>> {
        self.collection_repository.get(id).await
    }

    /// Most recent entries first, for the entry-screen table.
    pub async fn list_recent_collections(&self, limit: u32) -> DomainResult<RecentCollectionsResponse> {
        let records = self.collection_repository.list_recent(limit).await?;
        Ok(RecentCollectionsResponse { records })
    }

    /// Parse-validate the form fields and derive the amount.
    async fn validate_entry(&self, request: &CollectionEntryRequest) -> DomainResult<NewCollection> {
        let date = parse_date("date", &request.date)?;
        let quantity_liters = parse_non_negative("quantity", &request.quantity)?;
        let fat = parse_non_negative("fat", &request.fat)?;
        let rate = parse_non_negative("rate", &request.rate)?;

        if self.customer_repository.get(request.customer_code).await?.is_none() {
            warn!("Collection entry references unknown customer {}", request.customer_code);
            return Err(DomainError::NotFound {
                entity: "customer",
                id: request.customer_code,
            });
        }

        Ok(NewCollection {
            customer_code: request.customer_code,
            date,
            session: request.session,
            animal_type: request.animal_type,
            quantity_liters,
            fat,
            rate,
            amount: quantity_liters * rate,
        })
    }
}

fn record_from_fields(id: i64, fields: NewCollection) -> CollectionRecord {
    CollectionRecord {
        id,
        customer_code: fields.customer_code,
        date: fields.date,
        session: fields.session,
        animal_type: fields.animal_type,
        quantity_liters: fields.quantity_liters,
        fat: fields.fat,
        rate: fields.rate,
        amount: fields.amount,
    }
}
