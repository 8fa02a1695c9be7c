// src/db/memory_store.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::company_store::{CompanyStore, InsertOutcome},
    models::{
        company::{cnpj_digits, Company, NewCompany},
        filters::{CompanyPage, PaginationOpts, SearchCoFilters},
    },
};

// Prefixo dos cursores da busca em memória
const SEARCH_CURSOR_PREFIX: &str = "mem:";

#[derive(Default)]
struct Inner {
    companies: Vec<Company>,
    by_cnpj: HashMap<String, usize>,
    by_id: HashMap<Uuid, usize>,
}

/// Store em memória com o mesmo contrato do Postgres.
/// Os índices de CNPJ e id apontam para a posição no vetor (ordem de inserção).
#[derive(Default)]
pub struct InMemoryCompanyStore {
    inner: RwLock<Inner>,
}

impl InMemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompanyStore for InMemoryCompanyStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(&id).map(|&i| inner.companies[i].clone()))
    }

    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_cnpj
            .get(&cnpj_digits(cnpj))
            .map(|&i| inner.companies[i].clone()))
    }

    async fn scan_all(&self) -> Result<Vec<Company>, AppError> {
        Ok(self.inner.read().await.companies.clone())
    }

    async fn search(
        &self,
        text: &str,
        filters: &SearchCoFilters,
        opts: &PaginationOpts,
    ) -> Result<CompanyPage, AppError> {
        let terms = tokenize(text);
        if terms.is_empty() {
            return Ok(CompanyPage::empty());
        }

        let inner = self.inner.read().await;
        let mut hits: Vec<(usize, &Company)> = inner
            .companies
            .iter()
            .filter(|c| filters.matches(c))
            .filter_map(|c| relevance(&terms, &c.legal_name).map(|score| (score, c)))
            .collect();

        // Relevância primeiro, depois as mais recentes
        hits.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then(b.created_at.cmp(&a.created_at)));

        let ranked = hits.into_iter().map(|(_, c)| c.clone()).collect();
        CompanyPage::from_offset(ranked, opts, SEARCH_CURSOR_PREFIX)
    }

    async fn insert_if_absent(
        &self,
        company: NewCompany,
        now: DateTime<Utc>,
    ) -> Result<InsertOutcome, AppError> {
        let mut inner = self.inner.write().await;

        let key = cnpj_digits(&company.cnpj);
        if inner.by_cnpj.contains_key(&key) {
            return Ok(InsertOutcome::Skipped);
        }

        // Timestamps de criação estritamente crescentes, mesmo dentro de um lote
        let created_at = match inner.companies.last() {
            Some(last) if last.created_at >= now => last.created_at + Duration::microseconds(1),
            _ => now,
        };

        let id = Uuid::new_v4();
        let record = Company::assemble(id, company, created_at, Some(now), Some(now));

        let position = inner.companies.len();
        inner.companies.push(record.clone());
        inner.by_cnpj.insert(key, position);
        inner.by_id.insert(id, position);

        Ok(InsertOutcome::Inserted(record))
    }
}

// --- Ranking ---

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        other => other,
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(fold_accent)
        .collect::<String>()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Todos os termos precisam casar com alguma palavra do nome; o último termo
/// vale como prefixo (o usuário ainda está digitando). A pontuação é o número
/// de termos que casaram por inteiro.
fn relevance(terms: &[String], name: &str) -> Option<usize> {
    let words = tokenize(name);
    let last = terms.len().saturating_sub(1);
    let mut score = 0;

    for (i, term) in terms.iter().enumerate() {
        if words.iter().any(|w| w == term) {
            score += 1;
        } else if !(i == last && words.iter().any(|w| w.starts_with(term.as_str()))) {
            return None;
        }
    }

    Some(score)
}
