// src/models/company.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

/// Remove pontuação do CNPJ: "27.083.149/0001-38" -> "27083149000138".
/// É essa forma que vai para o índice único.
pub fn cnpj_digits(cnpj: &str) -> String {
    cnpj.chars().filter(|c| c.is_ascii_digit()).collect()
}

// --- CNAE SECUNDÁRIO ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryActivity {
    #[schema(example = "4752100")]
    pub code: String,
    pub description: Option<String>,
}

/// A Receita entrega os CNAEs secundários como duas strings separadas por ';'
/// (códigos e nomes). Quebramos uma única vez, na ingestão, e pareamos por posição.
/// Quando há menos nomes do que códigos, os códigos excedentes ficam sem descrição.
pub fn parse_secondary_activities(codes: Option<&str>, names: Option<&str>) -> Vec<SecondaryActivity> {
    let Some(codes) = codes else {
        return Vec::new();
    };

    let mut names = names
        .map(|n| n.split(';').map(str::trim).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter();

    codes
        .split(';')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| SecondaryActivity {
            code: code.to_string(),
            description: names
                .next()
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        })
        .collect()
}

// --- EMPRESA (O registro lido do banco) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,

    // Identificação
    #[schema(example = "27.083.149/0001-38")]
    pub cnpj: String,
    #[schema(example = "BEAUTTY FITNESS LTDA")]
    pub legal_name: String,
    pub trade_name: Option<String>,

    // Classificação
    #[schema(example = "4772500")]
    pub primary_activity_code: String,
    pub primary_activity_description: String,
    pub secondary_activities: Vec<SecondaryActivity>,
    pub legal_nature: Option<String>,
    #[schema(example = "MICRO EMPRESA")]
    pub size_class: Option<String>,
    pub head_office: Option<String>, // MATRIZ / FILIAL
    pub mei: bool,
    pub simples: bool,
    pub opened_on: Option<NaiveDate>,
    pub registry_url: Option<String>,

    // Localização
    #[schema(example = "PALMAS")]
    pub municipality: String,
    #[schema(example = "TO")]
    pub state: String,
    pub postal_code: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub maps_url: Option<String>,

    // Contatos
    pub phones: Vec<String>,
    pub email: Option<String>,
    pub accounting_email: Option<String>,
    pub whatsapp_links: Vec<String>,
    pub corporate_domain: Option<String>,
    pub website: Option<String>,

    // Derivados dos contatos acima. Só são calculados em `Company::assemble`.
    has_email: bool,
    has_phone: bool,

    // None = capital não informado. Zero é um valor válido e diferente de None.
    pub share_capital: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub imported_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Company {
    /// Monta o registro a partir dos dados normalizados.
    /// Todos os caminhos de leitura (Postgres e memória) passam por aqui.
    pub fn assemble(
        id: Uuid,
        data: NewCompany,
        created_at: DateTime<Utc>,
        imported_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        let has_email = is_filled(data.email.as_deref()) || is_filled(data.accounting_email.as_deref());
        let has_phone = data.phones.iter().any(|p| is_filled(Some(p)));

        Self {
            id,
            cnpj: data.cnpj,
            legal_name: data.legal_name,
            trade_name: data.trade_name,
            primary_activity_code: data.primary_activity_code,
            primary_activity_description: data.primary_activity_description,
            secondary_activities: data.secondary_activities,
            legal_nature: data.legal_nature,
            size_class: data.size_class,
            head_office: data.head_office,
            mei: data.mei,
            simples: data.simples,
            opened_on: data.opened_on,
            registry_url: data.registry_url,
            municipality: data.municipality,
            state: data.state,
            postal_code: data.postal_code,
            neighborhood: data.neighborhood,
            address: data.address,
            maps_url: data.maps_url,
            phones: data.phones,
            email: data.email,
            accounting_email: data.accounting_email,
            whatsapp_links: data.whatsapp_links,
            corporate_domain: data.corporate_domain,
            website: data.website,
            has_email,
            has_phone,
            share_capital: data.share_capital,
            created_at,
            imported_at,
            updated_at,
        }
    }

    pub fn has_email(&self) -> bool {
        self.has_email
    }

    pub fn has_phone(&self) -> bool {
        self.has_phone
    }

    pub fn has_whatsapp(&self) -> bool {
        !self.whatsapp_links.is_empty()
    }

    pub fn has_website(&self) -> bool {
        is_filled(self.website.as_deref())
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

// --- NOVA EMPRESA (Forma normalizada que vai para o store) ---

#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub cnpj: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub primary_activity_code: String,
    pub primary_activity_description: String,
    pub secondary_activities: Vec<SecondaryActivity>,
    pub legal_nature: Option<String>,
    pub size_class: Option<String>,
    pub head_office: Option<String>,
    pub mei: bool,
    pub simples: bool,
    pub opened_on: Option<NaiveDate>,
    pub registry_url: Option<String>,
    pub municipality: String,
    pub state: String,
    pub postal_code: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub maps_url: Option<String>,
    pub phones: Vec<String>,
    pub email: Option<String>,
    pub accounting_email: Option<String>,
    pub whatsapp_links: Vec<String>,
    pub corporate_domain: Option<String>,
    pub website: Option<String>,
    pub share_capital: Option<Decimal>,
}

// ---
// Validação Customizada
// ---
fn validate_cnpj(cnpj: &str) -> Result<(), ValidationError> {
    if cnpj_digits(cnpj).len() != 14 {
        let mut err = ValidationError::new("cnpj");
        err.message = Some("O CNPJ deve ter 14 dígitos.".into());
        return Err(err);
    }
    Ok(())
}

// Célula vazia do CSV é "sem e-mail", não e-mail inválido
fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || email.validate_email() {
        return Ok(());
    }
    let mut err = ValidationError::new("email");
    err.message = Some("O e-mail fornecido é inválido.".into());
    Err(err)
}

// Compara depois do trim, como `into_new_company` grava
fn validate_state(state: &str) -> Result<(), ValidationError> {
    if state.trim().chars().count() != 2 {
        let mut err = ValidationError::new("length");
        err.message = Some("A UF deve ter 2 letras.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O capital social não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// --- PAYLOAD DE IMPORTAÇÃO ---
// Uma linha do CSV da Receita já convertida em JSON pelo importador.
// Aceita os nomes originais das colunas (razao_social, cnae_principal_codigo...)
// como alias. `tem_email`/`tem_telefone` não existem aqui: são sempre derivados.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportCompanyRecord {
    #[validate(custom(function = "validate_cnpj"))]
    #[schema(example = "49.418.105/0001-54")]
    pub cnpj: String,

    #[serde(alias = "cnae_principal_codigo")]
    #[validate(length(min = 1, message = "O CNAE principal é obrigatório."))]
    pub primary_activity_code: String,
    #[serde(alias = "cnae_principal_nome")]
    pub primary_activity_description: String,
    #[serde(default, alias = "cnae_secundario_codigo")]
    pub secondary_activity_codes: Option<String>,
    #[serde(default, alias = "cnae_secundario_nome")]
    pub secondary_activity_names: Option<String>,

    #[serde(alias = "razao_social")]
    #[validate(length(min = 1, message = "A razão social é obrigatória."))]
    pub legal_name: String,
    #[serde(default, alias = "nome_fantasia")]
    pub trade_name: Option<String>,

    #[serde(default, alias = "telefone_1")]
    pub phone_1: Option<String>,
    #[serde(default, alias = "telefone_2")]
    pub phone_2: Option<String>,
    #[serde(default, alias = "telefone_3")]
    pub phone_3: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_optional_email"))]
    pub email: Option<String>,

    #[serde(default, alias = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(default, alias = "cep")]
    pub postal_code: Option<String>,
    #[serde(alias = "municipio")]
    #[validate(length(min = 1, message = "O município é obrigatório."))]
    pub municipality: String,
    #[serde(alias = "estado")]
    #[validate(custom(function = "validate_state"))]
    pub state: String,
    #[serde(default, alias = "endereco_mapa")]
    pub address: Option<String>,
    #[serde(default, alias = "maps")]
    pub maps_url: Option<String>,

    #[serde(default, alias = "matriz_filial")]
    pub head_office: Option<String>,
    #[serde(default, alias = "porte")]
    pub size_class: Option<String>,
    #[serde(default, alias = "capital_social")]
    #[validate(custom(function = "validate_not_negative"))]
    pub share_capital: Option<Decimal>,
    pub mei: bool,
    pub simples: bool,
    #[serde(default, alias = "inicio_atividade")]
    #[schema(value_type = Option<String>, format = Date, example = "2023-02-01")]
    pub opened_on: Option<NaiveDate>,
    #[serde(default, alias = "receita_federal")]
    pub registry_url: Option<String>,
    #[serde(default, alias = "natureza_juridica")]
    pub legal_nature: Option<String>,

    #[serde(default, alias = "email_contabilidade")]
    pub accounting_email: Option<String>,
    #[serde(default, alias = "whatsapp_1")]
    pub whatsapp_1: Option<String>,
    #[serde(default, alias = "whatsapp_2")]
    pub whatsapp_2: Option<String>,
    #[serde(default, alias = "whatsapp_3")]
    pub whatsapp_3: Option<String>,
    #[serde(default, alias = "dominio_corporativo")]
    pub corporate_domain: Option<String>,
    #[serde(default, alias = "site")]
    pub website: Option<String>,
}

// Strings vazias do CSV viram None.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ImportCompanyRecord {
    pub fn into_new_company(self) -> NewCompany {
        let secondary_activities = parse_secondary_activities(
            self.secondary_activity_codes.as_deref(),
            self.secondary_activity_names.as_deref(),
        );

        let phones = [self.phone_1, self.phone_2, self.phone_3]
            .into_iter()
            .filter_map(non_empty)
            .collect();

        let whatsapp_links = [self.whatsapp_1, self.whatsapp_2, self.whatsapp_3]
            .into_iter()
            .filter_map(non_empty)
            .collect();

        NewCompany {
            cnpj: self.cnpj.trim().to_string(),
            legal_name: self.legal_name.trim().to_string(),
            trade_name: non_empty(self.trade_name),
            primary_activity_code: self.primary_activity_code.trim().to_string(),
            primary_activity_description: self.primary_activity_description.trim().to_string(),
            secondary_activities,
            legal_nature: non_empty(self.legal_nature),
            size_class: non_empty(self.size_class),
            head_office: non_empty(self.head_office),
            mei: self.mei,
            simples: self.simples,
            opened_on: self.opened_on,
            registry_url: non_empty(self.registry_url),
            municipality: self.municipality.trim().to_string(),
            state: self.state.trim().to_uppercase(),
            postal_code: non_empty(self.postal_code),
            neighborhood: non_empty(self.neighborhood),
            address: non_empty(self.address),
            maps_url: non_empty(self.maps_url),
            phones,
            email: non_empty(self.email),
            accounting_email: non_empty(self.accounting_email),
            whatsapp_links,
            corporate_domain: non_empty(self.corporate_domain),
            website: non_empty(self.website),
            share_capital: self.share_capital,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportCompaniesPayload {
    #[validate(nested)]
    pub companies: Vec<ImportCompanyRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    #[schema(example = "Dados de exemplo criados com sucesso!")]
    pub message: String,
    pub imported: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cnpj_digits_strips_punctuation() {
        assert_eq!(cnpj_digits("27.083.149/0001-38"), "27083149000138");
        assert_eq!(cnpj_digits("27083149000138"), "27083149000138");
    }

    #[test]
    fn secondary_activities_are_paired_by_position() {
        let parsed = parse_secondary_activities(
            Some("2063100; 4752100; 4753900"),
            Some("FABRICAÇÃO DE COSMÉTICOS, PRODUTOS DE PERFUMARIA; COMÉRCIO VAREJISTA DE TELEFONIA"),
        );

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].code, "2063100");
        assert_eq!(
            parsed[0].description.as_deref(),
            Some("FABRICAÇÃO DE COSMÉTICOS, PRODUTOS DE PERFUMARIA")
        );
        assert_eq!(parsed[1].description.as_deref(), Some("COMÉRCIO VAREJISTA DE TELEFONIA"));
        assert_eq!(parsed[2].code, "4753900");
        assert_eq!(parsed[2].description, None);
    }

    #[test]
    fn secondary_activities_absent_or_blank() {
        assert!(parse_secondary_activities(None, Some("X")).is_empty());
        assert!(parse_secondary_activities(Some(" ; "), None).is_empty());
    }

    fn sample_record() -> serde_json::Value {
        json!({
            "cnpj": "49.418.105/0001-54",
            "cnae_principal_codigo": "4772500",
            "cnae_principal_nome": "COMÉRCIO VAREJISTA DE COSMÉTICOS",
            "cnae_secundario_codigo": "2063100; 4646001",
            "razao_social": "BEAUTTY FITNESS LTDA",
            "telefone_1": "+556399369369",
            "telefone_2": "",
            "municipio": "PALMAS",
            "estado": "to",
            "porte": "MICRO EMPRESA",
            "capital_social": 0,
            "mei": false,
            "simples": false,
            "whatsapp_1": "https://api.whatsapp.com/send/?phone=556399369369",
            "site": "  "
        })
    }

    #[test]
    fn import_record_accepts_registry_column_names() {
        let record: ImportCompanyRecord = serde_json::from_value(sample_record()).unwrap();
        assert!(record.validate().is_ok());

        let new = record.into_new_company();
        assert_eq!(new.legal_name, "BEAUTTY FITNESS LTDA");
        assert_eq!(new.state, "TO");
        assert_eq!(new.phones, vec!["+556399369369".to_string()]);
        assert_eq!(new.secondary_activities.len(), 2);
        assert_eq!(new.website, None);
        // Zero continua zero, não vira "não informado"
        assert_eq!(new.share_capital, Some(Decimal::ZERO));
    }

    #[test]
    fn contact_flags_are_derived_from_contact_fields() {
        let record: ImportCompanyRecord = serde_json::from_value(sample_record()).unwrap();
        let company = Company::assemble(Uuid::new_v4(), record.into_new_company(), Utc::now(), None, None);

        assert!(company.has_phone());
        assert!(!company.has_email());
        assert!(company.has_whatsapp());
        assert!(!company.has_website());

        let body = serde_json::to_value(&company).unwrap();
        assert_eq!(body["hasPhone"], json!(true));
        assert_eq!(body["hasEmail"], json!(false));
        assert_eq!(body["shareCapital"], json!(0.0));
    }

    #[test]
    fn whatsapp_links_use_registry_column_names() {
        let record: ImportCompanyRecord = serde_json::from_value(sample_record()).unwrap();
        let new = record.into_new_company();
        assert_eq!(
            new.whatsapp_links,
            vec!["https://api.whatsapp.com/send/?phone=556399369369".to_string()]
        );
    }

    #[test]
    fn blank_email_and_padded_state_are_accepted() {
        let mut value = sample_record();
        value["email"] = json!("");
        value["estado"] = json!("to ");
        let record: ImportCompanyRecord = serde_json::from_value(value).unwrap();
        assert!(record.validate().is_ok());

        let new = record.into_new_company();
        assert_eq!(new.email, None);
        assert_eq!(new.state, "TO");
    }

    #[test]
    fn malformed_email_is_still_rejected() {
        let mut value = sample_record();
        value["email"] = json!("contato-arroba-empresa");
        let record: ImportCompanyRecord = serde_json::from_value(value).unwrap();

        let errors = record.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn invalid_cnpj_and_state_are_rejected() {
        let mut value = sample_record();
        value["cnpj"] = json!("123");
        value["estado"] = json!("TOC");
        let record: ImportCompanyRecord = serde_json::from_value(value).unwrap();

        let errors = record.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("cnpj"));
        assert!(fields.contains_key("state"));
    }
}
