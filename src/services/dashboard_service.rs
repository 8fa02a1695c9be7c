// src/services/dashboard_service.rs

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    common::error::AppError,
    db::company_store::CompanyStore,
    models::{
        company::Company,
        dashboard::{
            ActivityCount, DashboardStats, MunicipalityCount, StateCount, SIZE_CLASS_NOT_INFORMED,
        },
        filters::StatsFilters,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn CompanyStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self { store }
    }

    pub async fn get_stats(&self, filters: StatsFilters) -> Result<DashboardStats, AppError> {
        let filters = filters.as_company_filters();
        let companies = self.store.scan_all().await?;
        Ok(compute_stats(companies.iter().filter(|c| filters.matches(c))))
    }

    pub async fn unique_activities(&self) -> Result<Vec<ActivityCount>, AppError> {
        Ok(count_activities(&self.store.scan_all().await?))
    }

    pub async fn unique_states(&self) -> Result<Vec<StateCount>, AppError> {
        Ok(count_states(&self.store.scan_all().await?))
    }

    pub async fn municipalities_by_state(&self, state: &str) -> Result<Vec<MunicipalityCount>, AppError> {
        let state = state.trim().to_uppercase();
        let companies = self.store.scan_all().await?;
        Ok(count_municipalities(companies.iter().filter(|c| c.state == state)))
    }
}

// ---
// Agregações puras (uma passada sobre a coleção já filtrada)
// ---

pub fn compute_stats<'a>(companies: impl IntoIterator<Item = &'a Company>) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for c in companies {
        stats.total += 1;
        stats.mei += u64::from(c.mei);
        stats.simples += u64::from(c.simples);
        stats.with_email += u64::from(c.has_email());
        stats.with_phone += u64::from(c.has_phone());
        stats.with_whatsapp += u64::from(c.has_whatsapp());
        stats.with_website += u64::from(c.has_website());

        let size = c
            .size_class
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(SIZE_CLASS_NOT_INFORMED);
        bump(&mut stats.by_size_class, size);
        bump(&mut stats.by_state, &c.state);
        bump(&mut stats.by_municipality, &c.municipality);
        bump(&mut stats.by_activity, &c.primary_activity_code);
    }

    stats
}

fn bump(table: &mut BTreeMap<String, u64>, key: &str) {
    *table.entry(key.to_string()).or_default() += 1;
}

// Maior contagem primeiro; empate desempata pela chave para a saída ser estável
fn ranked(table: BTreeMap<String, u64>) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = table.into_iter().collect();
    rows.sort_by(|(ka, a), (kb, b)| b.cmp(a).then_with(|| ka.cmp(kb)));
    rows
}

pub fn count_activities(companies: &[Company]) -> Vec<ActivityCount> {
    let mut totals = BTreeMap::new();
    let mut descriptions: BTreeMap<&str, &str> = BTreeMap::new();

    for c in companies {
        bump(&mut totals, &c.primary_activity_code);
        // A última descrição vista vence (deveria ser a mesma para o mesmo código)
        descriptions.insert(&c.primary_activity_code, &c.primary_activity_description);
    }

    ranked(totals)
        .into_iter()
        .map(|(code, total)| ActivityCount {
            description: descriptions.get(code.as_str()).copied().unwrap_or_default().to_string(),
            code,
            total,
        })
        .collect()
}

pub fn count_states(companies: &[Company]) -> Vec<StateCount> {
    let mut totals = BTreeMap::new();
    for c in companies {
        bump(&mut totals, &c.state);
    }

    ranked(totals)
        .into_iter()
        .map(|(code, total)| StateCount { code, total })
        .collect()
}

pub fn count_municipalities<'a>(companies: impl IntoIterator<Item = &'a Company>) -> Vec<MunicipalityCount> {
    let mut totals = BTreeMap::new();
    for c in companies {
        bump(&mut totals, &c.municipality);
    }

    ranked(totals)
        .into_iter()
        .map(|(name, total)| MunicipalityCount { name, total })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory_store::InMemoryCompanyStore,
        models::company::ImportCompanyRecord,
        services::company_service::CompanyService,
    };
    use serde_json::json;

    fn record(cnpj: &str, uf: &str, city: &str, cnae: &str, mei: bool, porte: Option<&str>) -> ImportCompanyRecord {
        serde_json::from_value(json!({
            "cnpj": cnpj,
            "cnae_principal_codigo": cnae,
            "cnae_principal_nome": format!("ATIVIDADE {cnae}"),
            "razao_social": format!("EMPRESA {cnpj}"),
            "municipio": city,
            "estado": uf,
            "porte": porte,
            "mei": mei,
            "simples": !mei
        }))
        .unwrap()
    }

    async fn seeded(records: Vec<ImportCompanyRecord>) -> DashboardService {
        let store: Arc<dyn CompanyStore> = Arc::new(InMemoryCompanyStore::new());
        CompanyService::new(store.clone(), 100)
            .import_companies(records)
            .await
            .unwrap();
        DashboardService::new(store)
    }

    fn assert_tables_sum_to_total(stats: &DashboardStats) {
        for table in [&stats.by_size_class, &stats.by_state, &stats.by_municipality, &stats.by_activity] {
            assert_eq!(table.values().sum::<u64>(), stats.total);
        }
    }

    #[tokio::test]
    async fn three_companies_in_tocantins() {
        let svc = seeded(vec![
            record("00000000000101", "TO", "PALMAS", "4751201", true, Some("MEI")),
            record("00000000000102", "TO", "PALMAS", "4751201", false, None),
            record("00000000000103", "TO", "ARAGUAINA", "4646001", false, Some("MICRO EMPRESA")),
        ])
        .await;

        let stats = svc.get_stats(StatsFilters::default()).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.mei, 1);
        assert_eq!(stats.simples, 2);
        assert_eq!(stats.by_state, BTreeMap::from([("TO".to_string(), 3)]));
        assert_eq!(stats.by_size_class.get(SIZE_CLASS_NOT_INFORMED), Some(&1));
        assert_eq!(stats.by_activity.get("4751201"), Some(&2));
        assert_tables_sum_to_total(&stats);
    }

    #[tokio::test]
    async fn stats_respect_activity_and_state_filters() {
        let svc = seeded(vec![
            record("00000000000201", "TO", "PALMAS", "4751201", true, None),
            record("00000000000202", "GO", "GOIANIA", "4751201", false, None),
            record("00000000000203", "GO", "ANAPOLIS", "4646001", false, None),
        ])
        .await;

        let go = svc
            .get_stats(StatsFilters { state: Some("go".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(go.total, 2);
        assert_tables_sum_to_total(&go);

        let both = svc
            .get_stats(StatsFilters { state: Some("GO".into()), activity_code: Some("4751201".into()) })
            .await
            .unwrap();
        assert_eq!(both.total, 1);
        assert_eq!(both.by_municipality, BTreeMap::from([("GOIANIA".to_string(), 1)]));

        // String vazia não filtra
        let all = svc
            .get_stats(StatsFilters { state: Some(String::new()), activity_code: None })
            .await
            .unwrap();
        assert_eq!(all.total, 3);
    }

    #[tokio::test]
    async fn contact_flags_are_counted_independently() {
        let store: Arc<dyn CompanyStore> = Arc::new(InMemoryCompanyStore::new());
        CompanyService::new(store.clone(), 100).seed_example_data().await.unwrap();
        let stats = DashboardService::new(store).get_stats(StatsFilters::default()).await.unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.with_email, 3);
        assert_eq!(stats.with_phone, 3);
        assert_eq!(stats.with_whatsapp, 3);
        assert_eq!(stats.with_website, 2);
        assert_eq!(stats.mei, 1);
        assert_tables_sum_to_total(&stats);
    }

    #[tokio::test]
    async fn empty_collection_has_zeroed_stats() {
        let svc = seeded(Vec::new()).await;
        let stats = svc.get_stats(StatsFilters::default()).await.unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn unique_listings_are_sorted_by_count() {
        let svc = seeded(vec![
            record("00000000000301", "GO", "GOIANIA", "4646001", false, None),
            record("00000000000302", "TO", "PALMAS", "4751201", false, None),
            record("00000000000303", "TO", "PALMAS", "4751201", false, None),
            record("00000000000304", "TO", "ARAGUAINA", "4751201", false, None),
        ])
        .await;

        let activities = svc.unique_activities().await.unwrap();
        assert_eq!(activities[0].code, "4751201");
        assert_eq!(activities[0].total, 3);
        assert_eq!(activities[0].description, "ATIVIDADE 4751201");
        assert_eq!(activities[1].total, 1);

        let states = svc.unique_states().await.unwrap();
        assert_eq!(
            states,
            vec![
                StateCount { code: "TO".into(), total: 3 },
                StateCount { code: "GO".into(), total: 1 },
            ]
        );

        let cities = svc.municipalities_by_state("to").await.unwrap();
        assert_eq!(
            cities,
            vec![
                MunicipalityCount { name: "PALMAS".into(), total: 2 },
                MunicipalityCount { name: "ARAGUAINA".into(), total: 1 },
            ]
        );
        assert!(svc.municipalities_by_state("SP").await.unwrap().is_empty());
    }
}
