use clap::Parser;
use contratos_lg::adapters::export;
use contratos_lg::config::{admin, Cli, Command, ContratosArgs};
use contratos_lg::domain::ports::Storage;
use contratos_lg::utils::error::ErrorSeverity;
use contratos_lg::utils::{
    logger,
    validation::{validate_path, Validate},
};
use contratos_lg::{
    AccessControl, AppConfig, ContractFetcher, ContractQuery, Directory, EtlError, LocalStorage,
    QueryParams,
};
use chrono::Datelike;
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!(config = %cli.config.display(), "Starting contratos CLI");

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Sugestão: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: Cli) -> Result<(), EtlError> {
    if let Command::HashSenha { senha } = &cli.command {
        println!("{}", bcrypt::hash(senha, bcrypt::DEFAULT_COST)?);
        return Ok(());
    }

    tracing::info!("📄 Loading configuration from {}", cli.config.display());
    let config = AppConfig::from_file(&cli.config)?;
    config.validate()?;
    let directory = config.directory();

    match cli.command {
        Command::Contratos(args) => buscar(&config, &directory, args).await,
        Command::Empresas { acao: Some(acao) } => {
            salvar(&cli.config, |dir| admin::aplicar_empresa(dir, acao))
        }
        Command::Operadores { acao: Some(acao) } => {
            salvar(&cli.config, |dir| admin::aplicar_operador(dir, acao))
        }
        Command::Usuarios { acao: Some(acao) } => {
            salvar(&cli.config, |dir| admin::aplicar_usuario(dir, acao))
        }
        Command::Empresas { acao: None } => {
            for e in directory.empresas() {
                println!("{}  {}  ({}, tenant {})", e.codigo, e.nome, e.ambiente, e.tenant_id);
            }
            Ok(())
        }
        Command::Operadores { acao: None } => {
            for o in directory.operadores() {
                let status = if o.ativo { "ativo" } else { "inativo" };
                println!("{}  {}", o.email, status);
            }
            Ok(())
        }
        Command::Usuarios { acao: None } => {
            for u in directory.usuarios() {
                let perfil = if u.is_admin { "admin" } else { "analista" };
                println!("{}  {}  {}  [{}]", u.username, u.nome, perfil, u.empresas.join(", "));
            }
            Ok(())
        }
        Command::HashSenha { .. } => Ok(()),
    }
}

fn salvar<F>(path: &Path, alteracao: F) -> Result<(), EtlError>
where
    F: FnOnce(&mut Directory) -> Result<String, EtlError>,
{
    let mensagem = admin::alterar_diretorio(path, alteracao)?;
    tracing::info!("✅ {}", mensagem);
    println!("✅ {}", mensagem);
    Ok(())
}

async fn buscar(config: &AppConfig, directory: &Directory, args: ContratosArgs) -> Result<(), EtlError> {
    let mut access = AccessControl::new();
    if let (Some(usuario), Some(senha)) = (&args.usuario, &args.senha) {
        let session = access.login(directory, usuario, senha)?;
        tracing::info!("🔐 Logged in as {}", session.nome);
    }
    let session = access.current_user().map(|_| &access);

    let hoje = chrono::Local::now().date_naive();
    let params = QueryParams {
        mes: args.mes.unwrap_or_else(|| hoje.month().to_string()),
        ano: args.ano.unwrap_or_else(|| hoje.year().to_string()),
        empresa: args.empresa,
        operador: args.operador,
    };

    let fetcher = ContractFetcher::new(config.connector(), config.fetch_settings());
    let query = ContractQuery::new(fetcher);

    tracing::info!("🚀 Querying {} for {}/{}", params.empresa, params.mes, params.ano);
    let outcome = query.buscar_contratos(directory, session, &params).await;
    if !outcome.sucesso {
        tracing::error!("❌ {}", outcome.mensagem);
        eprintln!("❌ {}", outcome.mensagem);
        std::process::exit(1);
    }
    tracing::info!("✅ {}", outcome.mensagem);

    let rendered = export::render(&outcome.contratos, args.formato)?;
    match args.saida {
        Some(path) => {
            validate_path("saida", &path.to_string_lossy())?;
            let storage = LocalStorage::new(".".to_string());
            storage
                .write_file(&path.to_string_lossy(), rendered.as_bytes())
                .await?;
            tracing::info!("📁 Output saved to: {}", path.display());
            println!("📁 {} ({} registros)", path.display(), outcome.contratos.len());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
