// src/db/company_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::company_store::{CompanyStore, InsertOutcome},
    models::{
        company::{cnpj_digits, Company, NewCompany, SecondaryActivity},
        filters::{
            decode_offset_cursor, encode_offset_cursor, CompanyPage, PaginationOpts, SearchCoFilters,
        },
    },
};

// Prefixo dos cursores da busca full-text. A varredura usa offset puro ("20"),
// então os dois formatos nunca se confundem.
const SEARCH_CURSOR_PREFIX: &str = "fts:";

// Colunas lidas em todas as consultas (seq e cnpj_digits são internas)
const COMPANY_COLUMNS: &str = r#"
    id, cnpj, legal_name, trade_name,
    primary_activity_code, primary_activity_description, secondary_activities,
    legal_nature, size_class, head_office, mei, simples, opened_on, registry_url,
    municipality, state, postal_code, neighborhood, address, maps_url,
    phones, email, accounting_email, whatsapp_links, corporate_domain, website,
    share_capital, created_at, imported_at, updated_at
"#;

// Linha crua da tabela 'companies'
#[derive(Debug, FromRow)]
struct CompanyRow {
    id: Uuid,
    cnpj: String,
    legal_name: String,
    trade_name: Option<String>,
    primary_activity_code: String,
    primary_activity_description: String,
    secondary_activities: Json<Vec<SecondaryActivity>>,
    legal_nature: Option<String>,
    size_class: Option<String>,
    head_office: Option<String>,
    mei: bool,
    simples: bool,
    opened_on: Option<NaiveDate>,
    registry_url: Option<String>,
    municipality: String,
    state: String,
    postal_code: Option<String>,
    neighborhood: Option<String>,
    address: Option<String>,
    maps_url: Option<String>,
    phones: Vec<String>,
    email: Option<String>,
    accounting_email: Option<String>,
    whatsapp_links: Vec<String>,
    corporate_domain: Option<String>,
    website: Option<String>,
    share_capital: Option<Decimal>,
    created_at: DateTime<Utc>,
    imported_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        let data = NewCompany {
            cnpj: row.cnpj,
            legal_name: row.legal_name,
            trade_name: row.trade_name,
            primary_activity_code: row.primary_activity_code,
            primary_activity_description: row.primary_activity_description,
            secondary_activities: row.secondary_activities.0,
            legal_nature: row.legal_nature,
            size_class: row.size_class,
            head_office: row.head_office,
            mei: row.mei,
            simples: row.simples,
            opened_on: row.opened_on,
            registry_url: row.registry_url,
            municipality: row.municipality,
            state: row.state,
            postal_code: row.postal_code,
            neighborhood: row.neighborhood,
            address: row.address,
            maps_url: row.maps_url,
            phones: row.phones,
            email: row.email,
            accounting_email: row.accounting_email,
            whatsapp_links: row.whatsapp_links,
            corporate_domain: row.corporate_domain,
            website: row.website,
            share_capital: row.share_capital,
        };
        Company::assemble(row.id, data, row.created_at, row.imported_at, row.updated_at)
    }
}

// O repositório de empresas, responsável por todas as interações com a tabela 'companies'
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Company::from))
    }

    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>, AppError> {
        // Usa o índice único companies_cnpj_digits_key
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE cnpj_digits = $1"
        ))
            .bind(cnpj_digits(cnpj))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Company::from))
    }

    async fn scan_all(&self) -> Result<Vec<Company>, AppError> {
        let rows = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY seq ASC"
        ))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn search(
        &self,
        text: &str,
        filters: &SearchCoFilters,
        opts: &PaginationOpts,
    ) -> Result<CompanyPage, AppError> {
        let offset = decode_offset_cursor(opts.cursor.as_deref(), SEARCH_CURSOR_PREFIX)?;

        // Busca uma linha a mais para saber se existe próxima página
        let rows = sqlx::query_as::<_, CompanyRow>(&format!(
            r#"
            SELECT {COMPANY_COLUMNS}
            FROM companies
            WHERE to_tsvector('portuguese', legal_name) @@ plainto_tsquery('portuguese', $1)
              AND ($2::text IS NULL OR state = $2)
              AND ($3::text IS NULL OR size_class = $3)
              AND ($4::text IS NULL OR primary_activity_code = $4)
              AND ($5::text IS NULL OR municipality = $5)
            ORDER BY ts_rank(to_tsvector('portuguese', legal_name), plainto_tsquery('portuguese', $1)) DESC,
                     created_at DESC,
                     seq DESC
            LIMIT $6 OFFSET $7
            "#
        ))
            .bind(text)
            .bind(filters.state.as_deref())
            .bind(filters.size_class.as_deref())
            .bind(filters.activity_code.as_deref())
            .bind(filters.municipality.as_deref())
            .bind(opts.num_items as i64 + 1)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        if offset > 0 && rows.is_empty() {
            return Err(AppError::InvalidCursor(encode_offset_cursor(SEARCH_CURSOR_PREFIX, offset)));
        }

        let is_done = rows.len() <= opts.num_items;
        let page: Vec<Company> = rows
            .into_iter()
            .take(opts.num_items)
            .map(Company::from)
            .collect();
        let next = offset + page.len();

        Ok(CompanyPage {
            page,
            is_done,
            continue_cursor: (!is_done).then(|| encode_offset_cursor(SEARCH_CURSOR_PREFIX, next)),
        })
    }

    async fn insert_if_absent(
        &self,
        company: NewCompany,
        now: DateTime<Utc>,
    ) -> Result<InsertOutcome, AppError> {
        // ON CONFLICT DO NOTHING: empresa já existente não é atualizada
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            r#"
            INSERT INTO companies (
                id, cnpj, cnpj_digits, legal_name, trade_name,
                primary_activity_code, primary_activity_description, secondary_activities,
                legal_nature, size_class, head_office, mei, simples, opened_on, registry_url,
                municipality, state, postal_code, neighborhood, address, maps_url,
                phones, email, accounting_email, whatsapp_links, corporate_domain, website,
                share_capital, imported_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25, $26, $27, $28, $29, $29
            )
            ON CONFLICT (cnpj_digits) DO NOTHING
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
            .bind(Uuid::new_v4())
            .bind(&company.cnpj)
            .bind(cnpj_digits(&company.cnpj))
            .bind(&company.legal_name)
            .bind(&company.trade_name)
            .bind(&company.primary_activity_code)
            .bind(&company.primary_activity_description)
            .bind(Json(&company.secondary_activities))
            .bind(&company.legal_nature)
            .bind(&company.size_class)
            .bind(&company.head_office)
            .bind(company.mei)
            .bind(company.simples)
            .bind(company.opened_on)
            .bind(&company.registry_url)
            .bind(&company.municipality)
            .bind(&company.state)
            .bind(&company.postal_code)
            .bind(&company.neighborhood)
            .bind(&company.address)
            .bind(&company.maps_url)
            .bind(&company.phones)
            .bind(&company.email)
            .bind(&company.accounting_email)
            .bind(&company.whatsapp_links)
            .bind(&company.corporate_domain)
            .bind(&company.website)
            .bind(company.share_capital)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => InsertOutcome::Inserted(Company::from(row)),
            None => InsertOutcome::Skipped,
        })
    }
}
