pub mod company_service;
pub mod dashboard_service;
pub mod export;
pub mod seed_data;
