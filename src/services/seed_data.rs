// src/services/seed_data.rs

use serde_json::json;

use crate::{common::error::AppError, models::company::ImportCompanyRecord};

/// Três empresas reais de Tocantins, no formato de colunas do CSV da Receita.
/// Passam pelo mesmo caminho da importação (insert-if-absent por CNPJ).
pub fn example_companies() -> Result<Vec<ImportCompanyRecord>, AppError> {
    let rows = json!([
        {
            "cnpj": "27.083.149/0001-38",
            "cnae_principal_codigo": "4751201",
            "cnae_principal_nome": "COMÉRCIO VAREJISTA ESPECIALIZADO DE EQUIPAMENTOS E SUPRIMENTOS DE INFORMÁTICA",
            "cnae_secundario_codigo": "2063100; 4752100; 4753900; 4757100; 4759899",
            "cnae_secundario_nome": "FABRICAÇÃO DE COSMÉTICOS, PRODUTOS DE PERFUMARIA E DE HIGIENE PESSOAL; COMÉRCIO VAREJISTA ESPECIALIZADO DE EQUIPAMENTOS DE TELEFONIA E COMUNICAÇÃO",
            "razao_social": "CRISLLANY BARROS VELOSO 01464580103",
            "nome_fantasia": "RAYTECH",
            "telefone_1": "+556333771155",
            "email": "RAYTECHST@GMAIL.COM",
            "bairro": "CENTRO",
            "cep": "77455-000",
            "municipio": "ALIANCA DO TOCANTINS",
            "estado": "TO",
            "endereco_mapa": "AVENIDA BERNARDO SAYAO, 237, CENTRO - ALIANCA DO TOCANTINS, TO - 77455-000, BRASIL",
            "maps": "https://www.google.com/search?q=AVENIDA+BERNARDO+SAYAO+237+CENTRO+ALIANCA+DO+TOCANTINS+TO+77455-000+Brasil",
            "matriz_filial": "MATRIZ",
            "porte": "MICRO EMPRESA",
            "capital_social": 2000,
            "mei": true,
            "simples": true,
            "inicio_atividade": "2017-02-10",
            "receita_federal": "http://servicos.receita.fazenda.gov.br/Servicos/cnpjreva/Cnpjreva_Solicitacao.asp?cnpj=27083149000138",
            "natureza_juridica": "EMPRESÁRIO (INDIVIDUAL)",
            "whatsapp_1": "https://api.whatsapp.com/send/?phone=556333771155",
            "dominio_corporativo": "PROVEDOR GRATUITO"
        },
        {
            "cnpj": "49.418.105/0001-54",
            "cnae_principal_codigo": "4772500",
            "cnae_principal_nome": "COMÉRCIO VAREJISTA DE COSMÉTICOS, PRODUTOS DE PERFUMARIA E DE HIGIENE PESSOAL",
            "cnae_secundario_codigo": "2063100; 4646001; 4646002",
            "cnae_secundario_nome": "FABRICAÇÃO DE COSMÉTICOS, PRODUTOS DE PERFUMARIA E DE HIGIENE PESSOAL; COMÉRCIO ATACADISTA DE COSMÉTICOS E PRODUTOS DE PERFUMARIA",
            "razao_social": "BEAUTTY FITNESS LTDA",
            "nome_fantasia": "BEFIT",
            "telefone_1": "+556399369369",
            "email": "AFIAC1988@GMAIL.COM",
            "bairro": "PLANO DIRETOR SUL",
            "cep": "77020-468",
            "municipio": "PALMAS",
            "estado": "TO",
            "endereco_mapa": "QUADRA ARSE 21 ALAMEDA EMAS QI 5, SN, PLANO DIRETOR SUL - PALMAS, TO - 77020-468, BRASIL",
            "maps": "https://www.google.com/search?q=QUADRA+ARSE+21+ALAMEDA+EMAS+QI+5+SN+PLANO+DIRETOR+SUL+PALMAS+TO+77020-468+Brasil",
            "matriz_filial": "MATRIZ",
            "porte": "MICRO EMPRESA",
            "capital_social": 50000,
            "mei": false,
            "simples": false,
            "inicio_atividade": "2023-02-01",
            "receita_federal": "http://servicos.receita.fazenda.gov.br/Servicos/cnpjreva/Cnpjreva_Solicitacao.asp?cnpj=49418105000154",
            "natureza_juridica": "SOCIEDADE EMPRESÁRIA LIMITADA",
            "whatsapp_1": "https://api.whatsapp.com/send/?phone=556399369369",
            "dominio_corporativo": "PROVEDOR GRATUITO",
            "site": "https://www.google.com/search?q=befit+palmas+to+instagram"
        },
        {
            "cnpj": "57.818.180/0001-30",
            "cnae_principal_codigo": "4646001",
            "cnae_principal_nome": "COMÉRCIO ATACADISTA DE COSMÉTICOS E PRODUTOS DE PERFUMARIA",
            "cnae_secundario_codigo": "2063100; 4649408; 4723700; 4757100",
            "cnae_secundario_nome": "FABRICAÇÃO DE COSMÉTICOS, PRODUTOS DE PERFUMARIA E DE HIGIENE PESSOAL; COMÉRCIO ATACADISTA DE PRODUTOS DE HIGIENE, LIMPEZA E CONSERVAÇÃO DOMICILIAR",
            "razao_social": "DELTA DISTRIBUIDOR LTDA",
            "nome_fantasia": "DELTA",
            "telefone_1": "+556392748325",
            "telefone_2": "+55000000000000",
            "email": "OLIVEIRAMANASSES1312@GMAIL.COM",
            "bairro": "SETOR CENTRAL",
            "cep": "77803-901",
            "municipio": "ARAGUAINA",
            "estado": "TO",
            "endereco_mapa": "AVENIDA PRIMEIRO DE JANEIRO, 1-2, SETOR CENTRAL - ARAGUAINA, TO - 77803-901, BRASIL",
            "maps": "https://www.google.com/search?q=AVENIDA+PRIMEIRO+DE+JANEIRO+1-2+SETOR+CENTRAL+ARAGUAINA+TO+77803-901+Brasil",
            "matriz_filial": "MATRIZ",
            "porte": "MICRO EMPRESA",
            "capital_social": 250000,
            "mei": false,
            "simples": false,
            "inicio_atividade": "2024-10-23",
            "receita_federal": "http://servicos.receita.fazenda.gov.br/Servicos/cnpjreva/Cnpjreva_Solicitacao.asp?cnpj=57818180000130",
            "natureza_juridica": "SOCIEDADE EMPRESÁRIA LIMITADA",
            "whatsapp_1": "https://api.whatsapp.com/send/?phone=556392748325",
            "whatsapp_2": "https://api.whatsapp.com/send/?phone=55000000000000",
            "dominio_corporativo": "PROVEDOR GRATUITO",
            "site": "https://www.google.com/search?q=delta+araguaina+to+instagram"
        }
    ]);

    serde_json::from_value(rows)
        .map_err(|e| anyhow::anyhow!("Dados de exemplo inválidos: {}", e).into())
}
