use crate::domain::model::ContractSummary;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Table,
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "tabela" => Ok(ExportFormat::Table),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Formato desconhecido: {} (use table, csv ou json)", other)),
        }
    }
}

const HEADER: [&str; 8] = [
    "matricula",
    "nome",
    "cpf",
    "data_admissao",
    "cargo",
    "departamento",
    "situacao",
    "empresa",
];

fn row(c: &ContractSummary) -> [&str; 8] {
    [
        c.matricula.as_str(),
        c.nome.as_str(),
        c.cpf.as_str(),
        c.data_admissao.as_str(),
        c.cargo.as_str(),
        c.departamento.as_str(),
        c.situacao.as_str(),
        c.empresa.codigo.as_str(),
    ]
}

pub fn to_csv(contracts: &[ContractSummary]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for contract in contracts {
        writer.write_record(row(contract))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn to_json(contracts: &[ContractSummary]) -> Result<String> {
    Ok(serde_json::to_string_pretty(contracts)?)
}

/// Aligned text table followed by the record count.
pub fn to_table(contracts: &[ContractSummary]) -> String {
    let mut widths = HEADER.map(|h| h.chars().count());
    for contract in contracts {
        for (width, cell) in widths.iter_mut().zip(row(contract)) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: [&str; 8]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render(HEADER)];
    lines.extend(contracts.iter().map(|c| render(row(c))));
    lines.push(format!("Total de registros: {}", contracts.len()));
    lines.join("\n")
}

pub fn render(contracts: &[ContractSummary], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Table => Ok(to_table(contracts)),
        ExportFormat::Csv => to_csv(contracts),
        ExportFormat::Json => to_json(contracts),
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EmpresaRef;
    use tempfile::TempDir;

    fn contract(matricula: &str, nome: &str) -> ContractSummary {
        ContractSummary {
            matricula: matricula.to_string(),
            nome: nome.to_string(),
            cpf: "12345678900".to_string(),
            data_admissao: "01/04/2025".to_string(),
            cargo: "Analista".to_string(),
            departamento: "TI".to_string(),
            situacao: "Ativo".to_string(),
            empresa: EmpresaRef {
                codigo: "001".to_string(),
            },
        }
    }

    #[test]
    fn test_csv_has_header_and_quotes_commas() {
        let csv = to_csv(&[contract("1", "Silva, João")]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "matricula,nome,cpf,data_admissao,cargo,departamento,situacao,empresa"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,\"Silva, João\",12345678900,01/04/2025,Analista,TI,Ativo,001"
        );
    }

    #[test]
    fn test_table_ends_with_total() {
        let table = to_table(&[contract("1", "Ana"), contract("22", "Bruno")]);
        assert!(table.starts_with("matricula"));
        assert!(table.ends_with("Total de registros: 2"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("tabela".parse::<ExportFormat>().unwrap(), ExportFormat::Table);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[tokio::test]
    async fn test_local_storage_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
        let json = to_json(&[contract("1", "Ana")]).unwrap();

        storage
            .write_file("exports/abril.json", json.as_bytes())
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("exports/abril.json")).unwrap();
        assert!(written.contains("\"Codigo\": \"001\""));
    }
}
