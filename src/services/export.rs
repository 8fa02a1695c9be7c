// src/services/export.rs

use crate::{common::csv::CsvWriter, models::company::Company};

const HEADER: [&str; 24] = [
    "cnpj",
    "razao_social",
    "nome_fantasia",
    "cnae_principal_codigo",
    "cnae_principal_nome",
    "cnae_secundario_codigo",
    "porte",
    "natureza_juridica",
    "mei",
    "simples",
    "capital_social",
    "municipio",
    "estado",
    "bairro",
    "cep",
    "endereco",
    "telefones",
    "email",
    "whatsapp",
    "site",
    "tem_email",
    "tem_telefone",
    "inicio_atividade",
    "importado_em",
];

fn yes_no(flag: bool) -> String {
    if flag { "SIM" } else { "NAO" }.to_string()
}

/// Uma linha por empresa. Capital ausente sai vazio, zero sai "0".
pub fn companies_to_csv(companies: &[Company]) -> String {
    let mut writer = CsvWriter::new();
    writer.write_record(HEADER);

    for c in companies {
        let secondary = c
            .secondary_activities
            .iter()
            .map(|a| a.code.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        writer.write_record([
            c.cnpj.clone(),
            c.legal_name.clone(),
            c.trade_name.clone().unwrap_or_default(),
            c.primary_activity_code.clone(),
            c.primary_activity_description.clone(),
            secondary,
            c.size_class.clone().unwrap_or_default(),
            c.legal_nature.clone().unwrap_or_default(),
            yes_no(c.mei),
            yes_no(c.simples),
            c.share_capital.map(|v| v.normalize().to_string()).unwrap_or_default(),
            c.municipality.clone(),
            c.state.clone(),
            c.neighborhood.clone().unwrap_or_default(),
            c.postal_code.clone().unwrap_or_default(),
            c.address.clone().unwrap_or_default(),
            c.phones.join("; "),
            c.email.clone().unwrap_or_default(),
            c.whatsapp_links.join("; "),
            c.website.clone().unwrap_or_default(),
            yes_no(c.has_email()),
            yes_no(c.has_phone()),
            c.opened_on.map(|d| d.to_string()).unwrap_or_default(),
            c.imported_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]);
    }

    writer.finish()
}
