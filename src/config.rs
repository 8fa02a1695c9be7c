// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{CompanyRepository, CompanyStore, InMemoryCompanyStore},
    services::{company_service::CompanyService, dashboard_service::DashboardService},
};

// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Config {
    /// Sem DATABASE_URL o backend sobe com o store em memória
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: String,
    pub max_page_size: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            max_page_size: parse_var("MAX_PAGE_SIZE", 100)?,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} inválida: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub company_service: CompanyService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn CompanyStore> = match &config.database_url {
            Some(database_url) => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(CompanyRepository::new(db_pool))
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL não definida: usando store em memória (dados somem ao reiniciar).");
                Arc::new(InMemoryCompanyStore::new())
            }
        };

        Ok(Self::from_store(store, config.max_page_size))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_store(store: Arc<dyn CompanyStore>, max_page_size: usize) -> Self {
        Self {
            company_service: CompanyService::new(store.clone(), max_page_size),
            dashboard_service: DashboardService::new(store),
        }
    }
}
