use crate::config::cli::{EmpresaAcao, OperadorAcao, UsuarioAcao};
use crate::config::toml_config::AppConfig;
use crate::core::directory::Directory;
use crate::domain::model::Empresa;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use std::path::Path;

/// Loads the config file, applies one directory change and writes the file back.
/// Nothing is written when the change is rejected.
pub fn alterar_diretorio<F>(path: &Path, alteracao: F) -> Result<String>
where
    F: FnOnce(&mut Directory) -> Result<String>,
{
    let mut config = AppConfig::from_file(path)?;
    config.validate()?;

    let mut directory = config.directory();
    let mensagem = alteracao(&mut directory)?;

    config.update_directory(&directory);
    config.save_to_file(path)?;
    tracing::info!(path = %path.display(), "Configuração salva");
    Ok(mensagem)
}

pub fn aplicar_empresa(directory: &mut Directory, acao: EmpresaAcao) -> Result<String> {
    match acao {
        EmpresaAcao::Adicionar {
            codigo,
            nome,
            tenant_id,
            ambiente,
        } => {
            directory.criar_empresa(Empresa {
                codigo,
                nome,
                tenant_id,
                ambiente,
            })?;
            Ok("Empresa criada com sucesso".to_string())
        }
        EmpresaAcao::Editar {
            codigo_original,
            codigo,
            nome,
            tenant_id,
            ambiente,
        } => {
            let atual = directory
                .get_empresa(&codigo_original)
                .cloned()
                .ok_or_else(|| EtlError::directory("Empresa não encontrada"))?;
            directory.atualizar_empresa(
                &codigo_original,
                Empresa {
                    codigo: codigo.unwrap_or(atual.codigo),
                    nome: nome.unwrap_or(atual.nome),
                    tenant_id: tenant_id.unwrap_or(atual.tenant_id),
                    ambiente: ambiente.unwrap_or(atual.ambiente),
                },
            )?;
            Ok("Empresa atualizada com sucesso".to_string())
        }
        EmpresaAcao::Excluir { codigo } => {
            directory.excluir_empresa(&codigo)?;
            Ok("Empresa excluída com sucesso".to_string())
        }
    }
}

pub fn aplicar_operador(directory: &mut Directory, acao: OperadorAcao) -> Result<String> {
    match acao {
        OperadorAcao::Adicionar {
            email,
            senha,
            inativo,
        } => {
            directory.adicionar_operador(&email, &senha, !inativo)?;
            Ok("Operador adicionado com sucesso".to_string())
        }
        OperadorAcao::Editar {
            email_original,
            email,
            senha,
            ativo,
        } => {
            let atual = directory
                .get_operador(&email_original)
                .cloned()
                .ok_or_else(|| EtlError::directory("Operador não encontrado"))?;
            directory.atualizar_operador(
                &email_original,
                email.as_deref().unwrap_or(&atual.email),
                senha.as_deref().unwrap_or(""),
                ativo.unwrap_or(atual.ativo),
            )?;
            Ok("Operador atualizado com sucesso".to_string())
        }
        OperadorAcao::Excluir { email } => {
            directory.excluir_operador(&email)?;
            Ok("Operador excluído com sucesso".to_string())
        }
    }
}

pub fn aplicar_usuario(directory: &mut Directory, acao: UsuarioAcao) -> Result<String> {
    match acao {
        UsuarioAcao::Adicionar {
            username,
            nome,
            senha,
            admin,
            empresas,
        } => {
            directory.criar_usuario(&username, &nome, &senha, admin, empresas)?;
            Ok("Usuário criado com sucesso".to_string())
        }
        UsuarioAcao::Editar {
            username_original,
            username,
            nome,
            senha,
            admin,
            empresas,
        } => {
            let atual = directory
                .get_usuario(&username_original)
                .cloned()
                .ok_or_else(|| EtlError::directory("Usuário não encontrado"))?;
            directory.atualizar_usuario(
                &username_original,
                username.as_deref().unwrap_or(&atual.username),
                nome.as_deref().unwrap_or(&atual.nome),
                senha.as_deref().unwrap_or(""),
                admin.unwrap_or(atual.is_admin),
                empresas.unwrap_or(atual.empresas),
            )?;
            Ok("Usuário atualizado com sucesso".to_string())
        }
        UsuarioAcao::Excluir { username } => {
            directory.excluir_usuario(&username)?;
            Ok("Usuário excluído com sucesso".to_string())
        }
        UsuarioAcao::Senha { username, nova } => {
            directory.alterar_senha(&username, &nova)?;
            Ok("Senha alterada com sucesso".to_string())
        }
    }
}
