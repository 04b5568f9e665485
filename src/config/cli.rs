use crate::adapters::export::ExportFormat;
use crate::config::toml_config::DEFAULT_CONFIG_PATH;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "contratos")]
#[command(about = "Consulta contratos de trabalho admitidos no mês via LG ConsultarListaPorDemanda")]
pub struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Busca os contratos admitidos no mês
    Contratos(ContratosArgs),
    /// Lista ou altera as empresas cadastradas
    Empresas {
        #[command(subcommand)]
        acao: Option<EmpresaAcao>,
    },
    /// Lista ou altera os operadores da API
    Operadores {
        #[command(subcommand)]
        acao: Option<OperadorAcao>,
    },
    /// Lista ou altera os usuários do painel
    Usuarios {
        #[command(subcommand)]
        acao: Option<UsuarioAcao>,
    },
    /// Gera o hash bcrypt de uma senha para o arquivo de configuração
    HashSenha {
        senha: String,
    },
}

/// Changes to `[[empresas]]`. Omitted `editar` fields keep their current value.
#[derive(Debug, Clone, Subcommand)]
pub enum EmpresaAcao {
    Adicionar {
        #[arg(long)]
        codigo: String,
        #[arg(long)]
        nome: String,
        #[arg(long)]
        tenant_id: String,
        #[arg(long)]
        ambiente: String,
    },
    Editar {
        codigo_original: String,
        #[arg(long)]
        codigo: Option<String>,
        #[arg(long)]
        nome: Option<String>,
        #[arg(long)]
        tenant_id: Option<String>,
        #[arg(long)]
        ambiente: Option<String>,
    },
    Excluir {
        codigo: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum OperadorAcao {
    Adicionar {
        email: String,
        #[arg(long)]
        senha: String,
        #[arg(long)]
        inativo: bool,
    },
    Editar {
        email_original: String,
        #[arg(long)]
        email: Option<String>,
        /// Sem valor, mantém a senha atual
        #[arg(long)]
        senha: Option<String>,
        #[arg(long)]
        ativo: Option<bool>,
    },
    Excluir {
        email: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum UsuarioAcao {
    Adicionar {
        username: String,
        #[arg(long)]
        nome: String,
        #[arg(long)]
        senha: String,
        #[arg(long)]
        admin: bool,
        #[arg(long, value_delimiter = ',')]
        empresas: Vec<String>,
    },
    Editar {
        username_original: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        nome: Option<String>,
        /// Sem valor, mantém a senha atual
        #[arg(long)]
        senha: Option<String>,
        #[arg(long)]
        admin: Option<bool>,
        #[arg(long, value_delimiter = ',')]
        empresas: Option<Vec<String>>,
    },
    Excluir {
        username: String,
    },
    /// Troca a senha de um usuário
    Senha {
        username: String,
        #[arg(long)]
        nova: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ContratosArgs {
    /// Mês (1-12); padrão é o mês atual
    #[arg(long)]
    pub mes: Option<String>,

    /// Ano (2000-2100); padrão é o ano atual
    #[arg(long)]
    pub ano: Option<String>,

    #[arg(long)]
    pub empresa: String,

    #[arg(long)]
    pub operador: String,

    /// Usuário do painel; quando informado, o resultado respeita suas permissões
    #[arg(long, requires = "senha")]
    pub usuario: Option<String>,

    #[arg(long, requires = "usuario")]
    pub senha: Option<String>,

    #[arg(long, default_value = "table")]
    pub formato: ExportFormat,

    /// Grava o resultado neste arquivo em vez da saída padrão
    #[arg(long)]
    pub saida: Option<PathBuf>,
}
