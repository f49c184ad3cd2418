use log::info;

use crate::db::DbConnection;
use crate::domain::validation::{parse_date, require_non_empty};
use crate::error::DomainResult;
use crate::storage::sqlite::CustomerRepository;
use shared::{
    CreateCustomerRequest, Customer, CustomerListResponse, CustomerRefsResponse, CustomerResponse,
};

/// Service for the customer registry. Registration is the only mutation;
/// customers are never updated or deleted.
#[derive(Clone)]
pub struct CustomerService {
    customer_repository: CustomerRepository,
}

impl CustomerService {
    pub fn new(db: DbConnection) -> Self {
        let customer_repository = CustomerRepository::new(db);
        Self { customer_repository }
    }

    /// Register a new customer.
    pub async fn create_customer(&self, request: CreateCustomerRequest) -> DomainResult<CustomerResponse> {
        info!("Registering customer: name={}", request.name);

        let name = require_non_empty("name", &request.name)?;
        let doj = parse_date("doj", &request.doj)?;

        let code = self
            .customer_repository
            .insert(
                &name,
                doj,
                request.phone.trim(),
                request.address.trim(),
                request.animal_type,
            )
            .await?;

        info!("Registered customer '{}' with code {}", name, code);

        Ok(CustomerResponse {
            customer: Customer {
                code,
                name,
                doj,
                phone: request.phone.trim().to_string(),
                address: request.address.trim().to_string(),
                animal_type: request.animal_type,
            },
        })
    }

    /// Full-attribute directory listing, ordered by code.
    pub async fn list_customers(&self) -> DomainResult<CustomerListResponse> {
        let customers = self.customer_repository.list().await?;
        info!("Listed {} customers", customers.len());
        Ok(CustomerListResponse { customers })
    }

    /// Identity-only listing for selection widgets, ordered by code.
    pub async fn list_customer_refs(&self) -> DomainResult<CustomerRefsResponse> {
        let customers = self.customer_repository.list_refs().await?;
        Ok(CustomerRefsResponse { customers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use shared::AnimalType;

    async fn setup_test() -> CustomerService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        CustomerService::new(db)
    }

    fn request(name: &str) -> CreateCustomerRequest {
        CreateCustomerRequest {
            name: name.to_string(),
            doj: "2024-01-01".to_string(),
            phone: " 9876500000 ".to_string(),
            address: "Main Rd".to_string(),
            animal_type: AnimalType::Cow,
        }
    }

    #[tokio::test]
    async fn test_create_customer_trims_and_assigns_code() {
        let service = setup_test().await;

        let response = service.create_customer(request("  Ravi  ")).await.unwrap();
        assert_eq!(response.customer.name, "Ravi");
        assert_eq!(response.customer.phone, "9876500000");
        assert!(response.customer.code > 0);
    }

    #[tokio::test]
    async fn test_create_customer_requires_name() {
        let service = setup_test().await;

        let err = service.create_customer(request("   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "name", .. }));

        // Nothing was stored.
        assert!(service.list_customers().await.unwrap().customers.is_empty());
    }

    #[tokio::test]
    async fn test_create_customer_rejects_bad_doj() {
        let service = setup_test().await;

        let mut bad = request("Ravi");
        bad.doj = "01-01-2024".to_string();
        let err = service.create_customer(bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "doj", .. }));
    }

    #[tokio::test]
    async fn test_both_listing_shapes() {
        let service = setup_test().await;

        service.create_customer(request("Ravi")).await.unwrap();
        let mut second = request("Sita");
        second.animal_type = AnimalType::BuffaloAndCow;
        service.create_customer(second).await.unwrap();

        let full = service.list_customers().await.unwrap().customers;
        assert_eq!(full.len(), 2);
        assert_eq!(full[1].animal_type, AnimalType::BuffaloAndCow);

        let refs = service.list_customer_refs().await.unwrap().customers;
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].code, full[0].code);
        assert_eq!(refs[0].name, "Ravi");
    }
}
