use log::info;

use crate::db::DbConnection;
use crate::domain::validation::parse_date;
use crate::error::{DomainError, DomainResult};
use crate::storage::sqlite::{CollectionRepository, CustomerRepository};
use shared::{BillLine, BillRequest, BillResponse, CustomerRef};

/// Service for billing: an inclusive date-range query over one customer's
/// entries plus the exact sum of their amounts. Rounding is deferred to the
/// export layout.
#[derive(Clone)]
pub struct BillingService {
    collection_repository: CollectionRepository,
    customer_repository: CustomerRepository,
}

impl BillingService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            collection_repository: CollectionRepository::new(db.clone()),
            customer_repository: CustomerRepository::new(db),
        }
    }

    /// Build the bill for one customer over [start, end] inclusive, ordered by
    /// date. An empty range simply yields an empty bill with total 0.
    pub async fn query_bill(&self, request: BillRequest) -> DomainResult<BillResponse> {
        let start_date = parse_date("start date", &request.start_date)?;
        let end_date = parse_date("end date", &request.end_date)?;

        let customer = self
            .customer_repository
            .get(request.customer_code)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "customer",
                id: request.customer_code,
            })?;

        let records = self
            .collection_repository
            .query_range(request.customer_code, start_date, end_date)
            .await?;

        let lines: Vec<BillLine> = records
            .into_iter()
            .map(|r| BillLine {
                date: r.date,
                session: r.session,
                animal_type: r.animal_type,
                quantity_liters: r.quantity_liters,
                fat: r.fat,
                rate: r.rate,
                amount: r.amount,
            })
            .collect();
        let total: f64 = lines.iter().map(|l| l.amount).sum();

        info!(
            "Bill for customer {} ({} to {}): {} lines, total {}",
            request.customer_code, start_date, end_date, lines.len(), total
        );

        Ok(BillResponse {
            customer: CustomerRef {
                code: customer.code,
                name: customer.name,
            },
            start_date,
            end_date,
            lines,
            total,
        })
    }
}
