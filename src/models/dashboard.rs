// src/models/dashboard.rs

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

// Rótulo usado quando a empresa não tem porte cadastrado
pub const SIZE_CLASS_NOT_INFORMED: &str = "Não informado";

// 1. Estatísticas do painel (os cards do topo + as tabelas de frequência)
// Os nomes no JSON são os que o frontend do painel já consome.
// As flags são independentes entre si: `mei` + `simples` não somam `total`.
// Cada tabela de frequência soma exatamente `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total: u64,
    pub mei: u64,
    pub simples: u64,
    #[serde(rename = "com_email")]
    pub with_email: u64,
    #[serde(rename = "com_telefone")]
    pub with_phone: u64,
    #[serde(rename = "com_whatsapp")]
    pub with_whatsapp: u64,
    #[serde(rename = "com_site")]
    pub with_website: u64,

    #[serde(rename = "por_porte")]
    pub by_size_class: BTreeMap<String, u64>,
    #[serde(rename = "por_estado")]
    pub by_state: BTreeMap<String, u64>,
    #[serde(rename = "por_municipio")]
    pub by_municipality: BTreeMap<String, u64>,
    /// Tabela completa, sem corte. O frontend ordena e pega o top-N.
    #[serde(rename = "top_cnaes")]
    pub by_activity: BTreeMap<String, u64>,
}

// 2. Listagens de valores únicos (alimentam os selects de filtro)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ActivityCount {
    #[serde(rename = "codigo")]
    #[schema(example = "4751201")]
    pub code: String,
    #[serde(rename = "nome")]
    pub description: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StateCount {
    #[serde(rename = "codigo")]
    #[schema(example = "TO")]
    pub code: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MunicipalityCount {
    #[serde(rename = "nome")]
    #[schema(example = "PALMAS")]
    pub name: String,
    pub total: u64,
}
