// src/db/company_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        company::{Company, NewCompany},
        filters::{CompanyPage, PaginationOpts, SearchCoFilters},
    },
};

/// Resultado do insert-if-absent.
#[derive(Debug)]
pub enum InsertOutcome {
    Inserted(Company),
    /// Já existia uma empresa com o mesmo CNPJ; nada foi alterado.
    Skipped,
}

/// O contrato que os serviços esperam do banco de empresas.
///
/// Duas implementações: Postgres (`CompanyRepository`) e memória
/// (`InMemoryCompanyStore`, usada sem `DATABASE_URL` e nos testes).
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError>;

    /// Busca pelo índice único de CNPJ. Aceita o CNPJ com ou sem pontuação.
    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>, AppError>;

    /// A coleção inteira, em ordem de inserção.
    async fn scan_all(&self) -> Result<Vec<Company>, AppError>;

    /// Busca textual na razão social, ordenada por relevância, com filtros de
    /// igualdade aplicados junto. O cursor é opaco e pertence ao store.
    async fn search(
        &self,
        text: &str,
        filters: &SearchCoFilters,
        opts: &PaginationOpts,
    ) -> Result<CompanyPage, AppError>;

    async fn insert_if_absent(
        &self,
        company: NewCompany,
        now: DateTime<Utc>,
    ) -> Result<InsertOutcome, AppError>;
}
