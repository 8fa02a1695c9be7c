// src/services/company_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::company_store::{CompanyStore, InsertOutcome},
    models::{
        company::{Company, ImportCompanyRecord, ImportSummary, SeedSummary},
        filters::{CompanyFilters, CompanyPage, PaginationOpts},
    },
    services::{export, seed_data},
};

#[derive(Clone)]
pub struct CompanyService {
    store: Arc<dyn CompanyStore>,
    max_page_size: usize,
}

impl CompanyService {
    pub fn new(store: Arc<dyn CompanyStore>, max_page_size: usize) -> Self {
        Self { store, max_page_size }
    }

    // =========================================================================
    //  LISTAGEM (busca textual OU varredura com filtros)
    // =========================================================================

    pub async fn list_companies(
        &self,
        filters: CompanyFilters,
        opts: PaginationOpts,
    ) -> Result<CompanyPage, AppError> {
        if opts.num_items == 0 || opts.num_items > self.max_page_size {
            return Err(AppError::InvalidPageSize {
                requested: opts.num_items,
                max: self.max_page_size,
            });
        }

        let filters = filters.normalized();

        match filters.search_text() {
            // Caminho 1: o índice de busca ranqueia e pagina. O cursor é dele.
            Some(text) => {
                self.store
                    .search(text, &filters.co_filters(), &opts)
                    .await
            }
            // Caminho 2: carrega tudo, filtra, ordena e fatia por offset
            None => {
                let matches = self.scan_matching(&filters).await?;
                CompanyPage::from_offset(matches, &opts, "")
            }
        }
    }

    /// Varredura completa: O(tamanho da coleção) a cada chamada.
    async fn scan_matching(&self, filters: &CompanyFilters) -> Result<Vec<Company>, AppError> {
        let mut matches: Vec<Company> = self
            .store
            .scan_all()
            .await?
            .into_iter()
            .filter(|c| filters.matches(c))
            .collect();

        // Mais recentes primeiro. sort_by é estável: empates ficam na ordem de inserção.
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    // =========================================================================
    //  EXPORTAÇÃO
    // =========================================================================

    /// Todas as empresas que casam com os filtros, sem paginação.
    pub async fn matching_companies(&self, filters: CompanyFilters) -> Result<Vec<Company>, AppError> {
        let filters = filters.normalized();

        let Some(text) = filters.search_text() else {
            return self.scan_matching(&filters).await;
        };

        // Na busca seguimos a corrente de cursores até o fim
        let co_filters = filters.co_filters();
        let mut opts = PaginationOpts::first(self.max_page_size.max(1));
        let mut all = Vec::new();
        loop {
            let page = self.store.search(text, &co_filters, &opts).await?;
            all.extend(page.page);
            match page.continue_cursor {
                Some(cursor) if !page.is_done => opts.cursor = Some(cursor),
                _ => break,
            }
        }
        Ok(all)
    }

    pub async fn export_companies(&self, filters: CompanyFilters) -> Result<String, AppError> {
        let companies = self.matching_companies(filters).await?;
        tracing::info!("📄 Exportando {} empresas em CSV.", companies.len());
        Ok(export::companies_to_csv(&companies))
    }

    // =========================================================================
    //  CONSULTAS PONTUAIS
    // =========================================================================

    pub async fn get_company(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        self.store.find_by_id(id).await
    }

    pub async fn get_company_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>, AppError> {
        self.store.find_by_cnpj(cnpj).await
    }

    // =========================================================================
    //  ESCRITA (importação e dados de exemplo)
    // =========================================================================

    /// Insere cada registro cujo CNPJ ainda não existe. Registros existentes
    /// não são atualizados, então rodar o mesmo lote de novo importa zero.
    pub async fn import_companies(
        &self,
        records: Vec<ImportCompanyRecord>,
    ) -> Result<ImportSummary, AppError> {
        let total = records.len();
        let now = Utc::now();
        let mut imported = 0;

        for record in records {
            match self.store.insert_if_absent(record.into_new_company(), now).await? {
                InsertOutcome::Inserted(company) => {
                    tracing::debug!("Empresa {} inserida ({})", company.cnpj, company.id);
                    imported += 1;
                }
                InsertOutcome::Skipped => {}
            }
        }

        tracing::info!("📥 Importação concluída: {} de {} empresas novas.", imported, total);
        Ok(ImportSummary { imported, total })
    }

    pub async fn seed_example_data(&self) -> Result<SeedSummary, AppError> {
        let examples = seed_data::example_companies()?;
        let summary = self.import_companies(examples).await?;

        tracing::info!("🌱 Dados de exemplo: {} inseridas.", summary.imported);
        Ok(SeedSummary {
            message: "Dados de exemplo criados com sucesso!".to_string(),
            imported: summary.imported,
            total: summary.total,
        })
    }
}
