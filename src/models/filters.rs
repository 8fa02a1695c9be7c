// src/models/filters.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{common::error::AppError, models::company::Company};

// --- CRITÉRIOS DA LISTAGEM ---

/// Critérios opcionais da listagem. `None` = sem restrição naquele campo.
/// Strings vazias chegam do frontend quando o usuário limpa um select, por isso
/// tudo passa por `normalized()` antes de ser usado.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CompanyFilters {
    /// Busca textual pela razão social
    pub search: Option<String>,
    #[serde(alias = "cnae")]
    pub activity_code: Option<String>,
    #[serde(alias = "estado")]
    pub state: Option<String>,
    #[serde(alias = "municipio")]
    pub municipality: Option<String>,
    #[serde(alias = "porte")]
    pub size_class: Option<String>,
    pub mei: Option<bool>,
    pub simples: Option<bool>,
    #[serde(alias = "tem_email")]
    pub has_email: Option<bool>,
    #[serde(alias = "tem_telefone")]
    pub has_phone: Option<bool>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CompanyFilters {
    pub fn normalized(self) -> Self {
        Self {
            search: clean(self.search),
            activity_code: clean(self.activity_code),
            state: clean(self.state).map(|s| s.to_uppercase()),
            municipality: clean(self.municipality),
            size_class: clean(self.size_class),
            ..self
        }
    }

    /// Texto de busca, se houver. É o único critério que decide o caminho da consulta.
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn co_filters(&self) -> SearchCoFilters {
        SearchCoFilters {
            state: self.state.clone(),
            size_class: self.size_class.clone(),
            activity_code: self.activity_code.clone(),
            municipality: self.municipality.clone(),
        }
    }

    /// Conjunção de todos os filtros de igualdade presentes (a busca textual não entra aqui).
    pub fn matches(&self, company: &Company) -> bool {
        eq_opt(&self.activity_code, &company.primary_activity_code)
            && eq_opt(&self.state, &company.state)
            && eq_opt(&self.municipality, &company.municipality)
            && self
                .size_class
                .as_ref()
                .is_none_or(|wanted| company.size_class.as_deref() == Some(wanted.as_str()))
            && flag_opt(self.mei, company.mei)
            && flag_opt(self.simples, company.simples)
            && flag_opt(self.has_email, company.has_email())
            && flag_opt(self.has_phone, company.has_phone())
    }
}

fn eq_opt(wanted: &Option<String>, actual: &str) -> bool {
    wanted.as_deref().is_none_or(|w| w == actual)
}

fn flag_opt(wanted: Option<bool>, actual: bool) -> bool {
    wanted.is_none_or(|w| w == actual)
}

/// Filtros de igualdade que o índice de busca aplica junto com o texto.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCoFilters {
    pub state: Option<String>,
    pub size_class: Option<String>,
    pub activity_code: Option<String>,
    pub municipality: Option<String>,
}

impl SearchCoFilters {
    pub fn matches(&self, company: &Company) -> bool {
        eq_opt(&self.state, &company.state)
            && eq_opt(&self.activity_code, &company.primary_activity_code)
            && eq_opt(&self.municipality, &company.municipality)
            && self
                .size_class
                .as_ref()
                .is_none_or(|wanted| company.size_class.as_deref() == Some(wanted.as_str()))
    }
}

// --- FILTROS DAS ESTATÍSTICAS ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatsFilters {
    #[serde(alias = "cnae")]
    pub activity_code: Option<String>,
    #[serde(alias = "estado")]
    pub state: Option<String>,
}

impl StatsFilters {
    /// Mesma semântica do caminho de varredura da listagem, só com dois campos.
    pub fn as_company_filters(&self) -> CompanyFilters {
        CompanyFilters {
            activity_code: self.activity_code.clone(),
            state: self.state.clone(),
            ..Default::default()
        }
        .normalized()
    }
}

// --- PAGINAÇÃO ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOpts {
    pub num_items: usize,
    pub cursor: Option<String>,
}

impl PaginationOpts {
    pub fn first(num_items: usize) -> Self {
        Self { num_items, cursor: None }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPage {
    pub page: Vec<Company>,
    pub is_done: bool,
    /// Nulo exatamente quando `isDone` é verdadeiro
    pub continue_cursor: Option<String>,
}

impl CompanyPage {
    pub fn empty() -> Self {
        Self { page: Vec::new(), is_done: true, continue_cursor: None }
    }

    /// Fatia `items` a partir do offset codificado no cursor.
    ///
    /// O cursor é o offset em decimal, precedido de `prefix` (vazio na varredura,
    /// `"mem:"`/`"fts:"` nas buscas). Cursor de outro formato é rejeitado, assim
    /// um cursor de busca nunca é aceito na varredura e vice-versa.
    pub fn from_offset(items: Vec<Company>, opts: &PaginationOpts, prefix: &str) -> Result<Self, AppError> {
        let start = decode_offset_cursor(opts.cursor.as_deref(), prefix)?;
        if start > 0 && start >= items.len() {
            return Err(AppError::InvalidCursor(encode_offset_cursor(prefix, start)));
        }

        let end = start.saturating_add(opts.num_items).min(items.len());
        let is_done = end >= items.len();
        let page = items.into_iter().skip(start).take(end - start).collect();

        Ok(Self {
            page,
            is_done,
            continue_cursor: (!is_done).then(|| encode_offset_cursor(prefix, end)),
        })
    }
}

pub fn encode_offset_cursor(prefix: &str, offset: usize) -> String {
    format!("{prefix}{offset}")
}

pub fn decode_offset_cursor(cursor: Option<&str>, prefix: &str) -> Result<usize, AppError> {
    let Some(raw) = cursor else {
        return Ok(0);
    };

    raw.strip_prefix(prefix)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<usize>().ok())
        .ok_or_else(|| AppError::InvalidCursor(raw.to_string()))
}
