// src/routes.rs

use axum::{routing::{get, post}, Json, Router};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn router(app_state: AppState) -> Router {
    // Rotas das empresas. "export" e "cnpj/..." antes de "{id}" só por leitura,
    // o axum prioriza segmentos estáticos de qualquer forma.
    let company_routes = Router::new()
        .route("/", get(handlers::companies::list_companies))
        .route("/export", get(handlers::companies::export_companies))
        .route("/import", post(handlers::companies::import_companies))
        .route("/seed", post(handlers::companies::seed_example_data))
        .route("/cnpj/{cnpj}", get(handlers::companies::get_company_by_cnpj))
        .route("/{id}", get(handlers::companies::get_company));

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .route("/cnaes", get(handlers::dashboard::list_activities))
        .route("/estados", get(handlers::dashboard::list_states))
        .route("/estados/{estado}/municipios", get(handlers::dashboard::list_municipalities));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/companies", company_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::db::InMemoryCompanyStore;

    fn app() -> Router {
        router(AppState::from_store(Arc::new(InMemoryCompanyStore::new()), 100))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let (status, bytes) = send(app, Method::GET, uri, None).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn seeded() -> Router {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/api/companies/seed", None).await;
        assert_eq!(status, StatusCode::CREATED);
        app
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = send(&app(), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn lists_the_seeded_companies_page_by_page() {
        let app = seeded().await;

        let (status, first) = get_json(&app, "/api/companies?numItems=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["page"].as_array().unwrap().len(), 2);
        assert_eq!(first["isDone"], json!(false));

        let cursor = first["continueCursor"].as_str().unwrap();
        let (_, second) = get_json(&app, &format!("/api/companies?numItems=2&cursor={}", cursor)).await;
        assert_eq!(second["page"].as_array().unwrap().len(), 1);
        assert_eq!(second["isDone"], json!(true));
        assert_eq!(second["continueCursor"], Value::Null);
    }

    #[tokio::test]
    async fn list_accepts_registry_filter_names() {
        let app = seeded().await;

        let (_, page) = get_json(&app, "/api/companies?estado=to&municipio=PALMAS").await;
        let names: Vec<&str> = page["page"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["legalName"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["BEAUTTY FITNESS LTDA"]);

        let (_, meis) = get_json(&app, "/api/companies?mei=true").await;
        assert_eq!(meis["page"].as_array().unwrap().len(), 1);

        // Filtros e paginação na mesma query string
        let (status, first) = get_json(&app, "/api/companies?estado=TO&mei=false&numItems=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["page"].as_array().unwrap().len(), 1);
        assert_eq!(first["continueCursor"], json!("1"));
    }

    #[tokio::test]
    async fn search_goes_through_the_text_index() {
        let app = seeded().await;

        let (status, page) = get_json(&app, "/api/companies?search=delta").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["page"][0]["legalName"], json!("DELTA DISTRIBUIDOR LTDA"));
        assert_eq!(page["isDone"], json!(true));
    }

    #[tokio::test]
    async fn bad_pagination_is_a_400() {
        let app = seeded().await;

        let (status, body) = get_json(&app, "/api/companies?cursor=banana").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("banana"));

        let (status, _) = get_json(&app, "/api/companies?numItems=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(&app, "/api/companies?numItems=101").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lookups_by_id_and_cnpj() {
        let app = seeded().await;

        let (status, company) = get_json(&app, "/api/companies/cnpj/49418105000154").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(company["cnpj"], json!("49.418.105/0001-54"));

        let id = company["id"].as_str().unwrap();
        let (status, same) = get_json(&app, &format!("/api/companies/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(same["legalName"], company["legalName"]);

        let (status, body) = get_json(&app, &format!("/api/companies/{}", uuid::Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("Empresa não encontrada."));
    }

    #[tokio::test]
    async fn errors_follow_accept_language() {
        let app = seeded().await;
        let request = Request::builder()
            .uri(format!("/api/companies/{}", uuid::Uuid::new_v4()))
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], json!("Company not found."));
    }

    #[tokio::test]
    async fn import_validates_the_whole_batch() {
        let app = app();
        let valid = json!({
            "cnpj": "11.222.333/0001-81",
            "razao_social": "PADARIA CENTRAL LTDA",
            "cnae_principal_codigo": "1091102",
            "cnae_principal_nome": "FABRICAÇÃO DE PRODUTOS DE PADARIA",
            "municipio": "GURUPI",
            "estado": "TO",
            "mei": false,
            "simples": true
        });
        let mut broken = valid.clone();
        broken["cnpj"] = json!("123");

        let (status, bytes) = send(
            &app,
            Method::POST,
            "/api/companies/import",
            Some(json!({ "companies": [valid.clone(), broken] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["details"]["companies[1].cnpj"].is_array());

        let (status, bytes) = send(
            &app,
            Method::POST,
            "/api/companies/import",
            Some(json!({ "companies": [valid.clone(), valid] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let summary: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(summary, json!({ "imported": 1, "total": 2 }));
    }

    #[tokio::test]
    async fn import_accepts_blank_cells_from_the_registry_csv() {
        let app = app();
        let row = json!({
            "cnpj": "11.222.333/0001-81",
            "razao_social": "PADARIA CENTRAL LTDA",
            "cnae_principal_codigo": "1091102",
            "cnae_principal_nome": "FABRICAÇÃO DE PRODUTOS DE PADARIA",
            "municipio": "GURUPI",
            "estado": "to ",
            "email": "",
            "whatsapp_1": "https://api.whatsapp.com/send/?phone=556333333333",
            "mei": false,
            "simples": true
        });

        let (status, bytes) = send(
            &app,
            Method::POST,
            "/api/companies/import",
            Some(json!({ "companies": [row] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let summary: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(summary, json!({ "imported": 1, "total": 1 }));

        let (_, company) = get_json(&app, "/api/companies/cnpj/11222333000181").await;
        assert_eq!(company["state"], json!("TO"));
        assert_eq!(company["email"], Value::Null);
        assert_eq!(company["hasEmail"], json!(false));

        let (_, stats) = get_json(&app, "/api/dashboard/stats?estado=TO").await;
        assert_eq!(stats["com_whatsapp"], json!(1));
        assert_eq!(stats["com_email"], json!(0));
    }

    #[tokio::test]
    async fn export_is_a_csv_attachment() {
        let app = seeded().await;
        let request = Request::builder()
            .uri("/api/companies/export?estado=TO")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/csv")
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        // cabeçalho + 3 empresas
        assert_eq!(csv.lines().count(), 4);
    }

    #[tokio::test]
    async fn dashboard_endpoints() {
        let app = seeded().await;

        let (status, stats) = get_json(&app, "/api/dashboard/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total"], json!(3));
        assert_eq!(stats["por_estado"], json!({ "TO": 3 }));
        assert_eq!(stats["com_whatsapp"], json!(3));
        assert_eq!(stats["com_site"], json!(2));
        assert!(stats["top_cnaes"].is_object());
        assert!(stats["por_porte"].is_object());

        let (_, filtered) = get_json(&app, "/api/dashboard/stats?estado=GO").await;
        assert_eq!(filtered["total"], json!(0));

        let (_, states) = get_json(&app, "/api/dashboard/estados").await;
        assert_eq!(states, json!([{ "codigo": "TO", "total": 3 }]));

        let (_, cities) = get_json(&app, "/api/dashboard/estados/to/municipios").await;
        assert_eq!(cities.as_array().unwrap().len(), 3);
        assert!(cities[0]["nome"].is_string());

        let (status, activities) = get_json(&app, "/api/dashboard/cnaes").await;
        assert_eq!(status, StatusCode::OK);
        let total: u64 = activities
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["total"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 3);
        assert!(activities[0]["codigo"].is_string());
        assert!(activities[0]["nome"].is_string());
    }

    #[tokio::test]
    async fn serves_the_openapi_document() {
        let (status, doc) = get_json(&app(), "/api/docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/companies"].is_object());
        assert!(doc["paths"]["/api/dashboard/stats"].is_object());
    }
}
