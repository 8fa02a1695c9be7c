pub mod company_store;
pub use company_store::CompanyStore;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod memory_store;
pub use memory_store::InMemoryCompanyStore;
