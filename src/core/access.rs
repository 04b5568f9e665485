use crate::core::directory::Directory;
use crate::domain::model::{ContractSummary, Empresa};
use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

/// Logged-in dashboard user, as of login time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub nome: String,
    pub is_admin: bool,
}

/// Login state and company-level permissions of the dashboard user.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    usuario_atual: Option<Session>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, directory: &Directory, username: &str, senha: &str) -> Result<&Session> {
        if !directory.verificar_login(username, senha) {
            tracing::warn!(username, "Login rejected");
            return Err(EtlError::access("Usuário ou senha inválidos"));
        }
        let usuario = directory
            .get_usuario(username)
            .ok_or_else(|| EtlError::access("Usuário ou senha inválidos"))?;

        tracing::info!(username, admin = usuario.is_admin, "Login");
        Ok(&*self.usuario_atual.insert(Session {
            username: usuario.username.clone(),
            nome: usuario.nome.clone(),
            is_admin: usuario.is_admin,
        }))
    }

    pub fn logout(&mut self) {
        self.usuario_atual = None;
    }

    pub fn current_user(&self) -> Option<&Session> {
        self.usuario_atual.as_ref()
    }

    /// Admins see every company; everyone else only their linked ones.
    pub fn empresas_permitidas<'d>(&self, directory: &'d Directory) -> Vec<&'d Empresa> {
        match &self.usuario_atual {
            None => Vec::new(),
            Some(session) if session.is_admin => directory.empresas().iter().collect(),
            Some(session) => directory.empresas_do_usuario(&session.username),
        }
    }

    fn codigos_permitidos(&self, directory: &Directory) -> HashSet<String> {
        self.empresas_permitidas(directory)
            .into_iter()
            .map(|e| e.codigo.clone())
            .collect()
    }

    pub fn tem_acesso_empresa(&self, directory: &Directory, codigo: &str) -> bool {
        match &self.usuario_atual {
            None => false,
            Some(session) if session.is_admin => true,
            Some(_) => self.codigos_permitidos(directory).contains(codigo),
        }
    }

    pub fn filtrar_contratos(
        &self,
        directory: &Directory,
        contratos: Vec<ContractSummary>,
    ) -> Vec<ContractSummary> {
        match &self.usuario_atual {
            None => Vec::new(),
            Some(session) if session.is_admin => contratos,
            Some(session) => {
                let permitidas = self.codigos_permitidos(directory);
                let before = contratos.len();
                let filtrados: Vec<ContractSummary> = contratos
                    .into_iter()
                    .filter(|c| permitidas.contains(&c.empresa.codigo))
                    .collect();
                tracing::debug!(
                    username = %session.username,
                    before,
                    after = filtrados.len(),
                    "Contracts filtered by permission"
                );
                filtrados
            }
        }
    }

    pub fn empresas_permitidas_descricao(&self, directory: &Directory) -> String {
        if self.usuario_atual.is_none() {
            return "Nenhum usuário logado".to_string();
        }
        let permitidas = self.empresas_permitidas(directory);
        if !directory.empresas().is_empty() && permitidas.len() == directory.empresas().len() {
            return "Todas as empresas".to_string();
        }
        permitidas
            .iter()
            .map(|e| e.nome.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
