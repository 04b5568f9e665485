use crate::domain::model::{Empresa, Operador, QueryCredentials, Usuario};
use crate::utils::error::{EtlError, Result};

/// Registry of companies, API operators and dashboard users.
///
/// Mutations enforce the same rules as the admin screens: mandatory fields,
/// unique keys, and an error message fit to show the operator as-is.
#[derive(Debug, Clone)]
pub struct Directory {
    empresas: Vec<Empresa>,
    operadores: Vec<Operador>,
    usuarios: Vec<Usuario>,
    hash_cost: u32,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Directory {
    pub fn new(empresas: Vec<Empresa>, operadores: Vec<Operador>, usuarios: Vec<Usuario>) -> Self {
        Self {
            empresas,
            operadores,
            usuarios,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// bcrypt cost for new password hashes (4..=31).
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn hash_password(&self, senha: &str) -> Result<String> {
        Ok(bcrypt::hash(senha, self.hash_cost)?)
    }

    // --- empresas ---

    pub fn empresas(&self) -> &[Empresa] {
        &self.empresas
    }

    pub fn get_empresa(&self, codigo: &str) -> Option<&Empresa> {
        self.empresas.iter().find(|e| e.codigo == codigo)
    }

    pub fn criar_empresa(&mut self, empresa: Empresa) -> Result<()> {
        if blank(&empresa.codigo) || blank(&empresa.nome) || blank(&empresa.tenant_id) || blank(&empresa.ambiente) {
            return Err(EtlError::directory("Todos os campos são obrigatórios"));
        }
        if self.get_empresa(&empresa.codigo).is_some() {
            return Err(EtlError::directory("Empresa com este código já existe"));
        }
        tracing::info!(codigo = %empresa.codigo, "Empresa criada");
        self.empresas.push(empresa);
        Ok(())
    }

    /// Renaming a company code carries the new code into every user's list.
    pub fn atualizar_empresa(&mut self, codigo_original: &str, empresa: Empresa) -> Result<()> {
        if blank(&empresa.codigo) || blank(&empresa.nome) || blank(&empresa.tenant_id) || blank(&empresa.ambiente) {
            return Err(EtlError::directory("Todos os campos são obrigatórios"));
        }
        let Some(index) = self.empresas.iter().position(|e| e.codigo == codigo_original) else {
            return Err(EtlError::directory("Empresa não encontrada"));
        };
        if empresa.codigo != codigo_original && self.get_empresa(&empresa.codigo).is_some() {
            return Err(EtlError::directory("Já existe uma empresa com este código"));
        }

        if empresa.codigo != codigo_original {
            for usuario in &mut self.usuarios {
                for codigo in &mut usuario.empresas {
                    if *codigo == codigo_original {
                        *codigo = empresa.codigo.clone();
                    }
                }
            }
        }
        self.empresas[index] = empresa;
        Ok(())
    }

    pub fn excluir_empresa(&mut self, codigo: &str) -> Result<()> {
        let before = self.empresas.len();
        self.empresas.retain(|e| e.codigo != codigo);
        if self.empresas.len() == before {
            return Err(EtlError::directory("Empresa não encontrada"));
        }
        for usuario in &mut self.usuarios {
            usuario.empresas.retain(|c| c != codigo);
        }
        tracing::info!(codigo, "Empresa excluída");
        Ok(())
    }

    // --- operadores ---

    pub fn operadores(&self) -> &[Operador] {
        &self.operadores
    }

    pub fn get_operador(&self, email: &str) -> Option<&Operador> {
        self.operadores.iter().find(|o| o.email == email)
    }

    pub fn adicionar_operador(&mut self, email: &str, senha: &str, ativo: bool) -> Result<()> {
        if blank(email) || blank(senha) {
            return Err(EtlError::directory("Email e senha são obrigatórios"));
        }
        if self.get_operador(email).is_some() {
            return Err(EtlError::directory("Operador com este email já existe"));
        }
        self.operadores.push(Operador {
            email: email.to_string(),
            senha: senha.to_string(),
            ativo,
        });
        Ok(())
    }

    /// An empty `senha` keeps the stored password.
    pub fn atualizar_operador(
        &mut self,
        email_original: &str,
        email: &str,
        senha: &str,
        ativo: bool,
    ) -> Result<()> {
        if blank(email) {
            return Err(EtlError::directory("Email e senha são obrigatórios"));
        }
        let Some(index) = self.operadores.iter().position(|o| o.email == email_original) else {
            return Err(EtlError::directory(format!(
                "Operador com email {} não encontrado",
                email_original
            )));
        };
        if email != email_original && self.get_operador(email).is_some() {
            return Err(EtlError::directory(format!(
                "Já existe um operador com o email {}",
                email
            )));
        }

        let operador = &mut self.operadores[index];
        operador.email = email.to_string();
        if !blank(senha) {
            operador.senha = senha.to_string();
        }
        operador.ativo = ativo;
        Ok(())
    }

    pub fn excluir_operador(&mut self, email: &str) -> Result<()> {
        let before = self.operadores.len();
        self.operadores.retain(|o| o.email != email);
        if self.operadores.len() == before {
            return Err(EtlError::directory("Operador não encontrado"));
        }
        Ok(())
    }

    // --- usuarios ---

    pub fn usuarios(&self) -> &[Usuario] {
        &self.usuarios
    }

    pub fn get_usuario(&self, username: &str) -> Option<&Usuario> {
        self.usuarios.iter().find(|u| u.username == username)
    }

    pub fn criar_usuario(
        &mut self,
        username: &str,
        nome: &str,
        senha: &str,
        is_admin: bool,
        empresas: Vec<String>,
    ) -> Result<()> {
        if blank(username) || blank(nome) || blank(senha) {
            return Err(EtlError::directory(
                "Nome de usuário, nome completo e senha são obrigatórios",
            ));
        }
        if self.get_usuario(username).is_some() {
            return Err(EtlError::directory("Usuário com este nome já existe"));
        }
        if empresas.is_empty() {
            return Err(EtlError::directory("Selecione pelo menos uma empresa"));
        }
        self.ensure_known_companies(&empresas)?;

        let senha_hash = self.hash_password(senha)?;
        self.usuarios.push(Usuario {
            username: username.to_string(),
            nome: nome.to_string(),
            senha_hash,
            is_admin,
            empresas,
        });
        tracing::info!(username, "Usuário criado");
        Ok(())
    }

    /// An empty `senha` keeps the stored hash.
    pub fn atualizar_usuario(
        &mut self,
        username_original: &str,
        username: &str,
        nome: &str,
        senha: &str,
        is_admin: bool,
        empresas: Vec<String>,
    ) -> Result<()> {
        if blank(username) || blank(nome) {
            return Err(EtlError::directory(
                "Nome de usuário e nome completo são obrigatórios",
            ));
        }
        let Some(index) = self.usuarios.iter().position(|u| u.username == username_original) else {
            return Err(EtlError::directory("Usuário não encontrado"));
        };
        if username != username_original && self.get_usuario(username).is_some() {
            return Err(EtlError::directory("Já existe um usuário com este nome"));
        }
        if empresas.is_empty() {
            return Err(EtlError::directory("Selecione pelo menos uma empresa"));
        }
        self.ensure_known_companies(&empresas)?;

        let senha_hash = if blank(senha) {
            None
        } else {
            Some(self.hash_password(senha)?)
        };

        let usuario = &mut self.usuarios[index];
        usuario.username = username.to_string();
        usuario.nome = nome.to_string();
        usuario.is_admin = is_admin;
        usuario.empresas = empresas;
        if let Some(hash) = senha_hash {
            usuario.senha_hash = hash;
        }
        Ok(())
    }

    pub fn excluir_usuario(&mut self, username: &str) -> Result<()> {
        let before = self.usuarios.len();
        self.usuarios.retain(|u| u.username != username);
        if self.usuarios.len() == before {
            return Err(EtlError::directory("Usuário não encontrado"));
        }
        Ok(())
    }

    pub fn alterar_senha(&mut self, username: &str, nova_senha: &str) -> Result<()> {
        if blank(nova_senha) {
            return Err(EtlError::directory("A nova senha não pode ser vazia"));
        }
        let senha_hash = self.hash_password(nova_senha)?;
        let usuario = self
            .usuarios
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| EtlError::directory("Usuário não encontrado"))?;
        usuario.senha_hash = senha_hash;
        Ok(())
    }

    /// Unknown users and malformed hashes both read as a failed login.
    pub fn verificar_login(&self, username: &str, senha: &str) -> bool {
        self.get_usuario(username)
            .map(|u| bcrypt::verify(senha, &u.senha_hash).unwrap_or(false))
            .unwrap_or(false)
    }

    /// Companies linked to a user that still exist in the registry.
    pub fn empresas_do_usuario(&self, username: &str) -> Vec<&Empresa> {
        let Some(usuario) = self.get_usuario(username) else {
            return Vec::new();
        };
        self.empresas
            .iter()
            .filter(|e| usuario.empresas.contains(&e.codigo))
            .collect()
    }

    fn ensure_known_companies(&self, codigos: &[String]) -> Result<()> {
        match codigos.iter().find(|c| self.get_empresa(c).is_none()) {
            Some(codigo) => Err(EtlError::directory(format!(
                "Empresa {} não encontrada",
                codigo
            ))),
            None => Ok(()),
        }
    }

    /// Tenant from the company, login from the operator.
    pub fn resolve_credentials(
        &self,
        empresa_codigo: &str,
        operador_email: &str,
    ) -> Result<QueryCredentials> {
        let empresa = self
            .get_empresa(empresa_codigo)
            .ok_or_else(|| EtlError::directory("Empresa não encontrada"))?;
        let operador = self
            .get_operador(operador_email)
            .ok_or_else(|| EtlError::directory("Operador não encontrado"))?;

        Ok(QueryCredentials::new(
            operador.email.clone(),
            operador.senha.clone(),
            empresa.tenant_id.clone(),
            empresa.ambiente.clone(),
        ))
    }
}
