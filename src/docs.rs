// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Painel de Empresas", description = "Consulta e indicadores do cadastro de CNPJs"),
    paths(
        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::export_companies,
        handlers::companies::get_company,
        handlers::companies::get_company_by_cnpj,
        handlers::companies::import_companies,
        handlers::companies::seed_example_data,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::list_activities,
        handlers::dashboard::list_states,
        handlers::dashboard::list_municipalities,
    ),
    components(
        schemas(
            // --- Companies ---
            models::company::Company,
            models::company::SecondaryActivity,
            models::filters::CompanyPage,

            // --- Payloads ---
            models::company::ImportCompanyRecord,
            models::company::ImportCompaniesPayload,
            models::company::ImportSummary,
            models::company::SeedSummary,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
            models::dashboard::ActivityCount,
            models::dashboard::StateCount,
            models::dashboard::MunicipalityCount,
        )
    ),
    tags(
        (name = "Companies", description = "Listagem, busca, importação e exportação de empresas"),
        (name = "Dashboard", description = "Indicadores e listas para os filtros do painel")
    )
)]
pub struct ApiDoc;
