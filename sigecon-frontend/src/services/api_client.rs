use crate::config::BackendSettings;
use crate::models::contract::{Contract, ContractUpdatePayload, ImportPayload, ItemPayload};
use crate::models::order::{
    Order, OrderCreatePayload, OrderSummary, OrderUpdatePayload, XlsxExtras,
};
use crate::models::user::{CreatedUser, LoginResponse, Role, User};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use sigecon_core::observability::TracedClientExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered with an error status; the message is taken from the
    /// response body when it carries one.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
    },
    #[error("Falha de comunicação com o servidor.")]
    Transport(#[from] reqwest::Error),
}

/// Picks the human-readable message out of an error body, `message` first,
/// then `error`.
pub fn message_from_body(body: &serde_json::Value) -> Option<&str> {
    for key in ["message", "error"] {
        if let Some(text) = body.get(key).and_then(|v| v.as_str()) {
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

pub(crate) async fn upstream_error(response: reqwest::Response, fallback: &str) -> ApiError {
    let status = response.status();
    let message = match response.json::<serde_json::Value>().await {
        Ok(body) => message_from_body(&body)
            .map(|s| s.to_string())
            .unwrap_or_else(|| fallback.to_string()),
        Err(_) => fallback.to_string(),
    };
    tracing::warn!(status = %status, message = %message, "upstream request failed");
    ApiError::Upstream { status, message }
}

/// Client for the contract/order REST backend. Every call carries the
/// session's bearer token and W3C trace context.
pub struct ApiClient {
    client: Client,
    settings: BackendSettings,
}

impl ApiClient {
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url, path)
    }

    async fn expect_json<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ApiError> {
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(upstream_error(response, fallback).await)
        }
    }

    async fn expect_ok(response: reqwest::Response, fallback: &str) -> Result<(), ApiError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(upstream_error(response, fallback).await)
        }
    }

    // auth

    pub async fn login(&self, cpf: &str, senha: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/auth/login"))
            .json(&serde_json::json!({ "cpf": cpf, "senha": senha }))
            .send()
            .await?;
        Self::expect_json(response, "CPF ou senha inválidos.").await
    }

    // users

    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        let response = self
            .client
            .traced_get(&self.url("/usuarios/me"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_json(response, "Sessão expirada. Entre novamente.").await
    }

    pub async fn update_my_name(&self, token: &str, nome: &str) -> Result<User, ApiError> {
        let response = self
            .client
            .traced_put(&self.url("/usuarios/me/nome"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "nome": nome }))
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível atualizar o nome.").await
    }

    pub async fn change_my_password(
        &self,
        token: &str,
        senha_atual: &str,
        senha_nova: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .traced_put(&self.url("/usuarios/me/senha"))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "senhaAtual": senha_atual,
                "senhaNova": senha_nova,
            }))
            .send()
            .await?;
        Self::expect_ok(response, "Não foi possível alterar a senha.").await
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        let response = self
            .client
            .traced_get(&self.url("/usuarios"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível carregar os usuários.").await
    }

    pub async fn create_user(
        &self,
        token: &str,
        nome: &str,
        cpf: &str,
        role: Role,
    ) -> Result<CreatedUser, ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/usuarios"))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "nome": nome,
                "cpf": cpf,
                "role": role.as_str(),
            }))
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível criar o usuário.").await
    }

    // contracts

    pub async fn list_contracts(&self, token: &str) -> Result<Vec<Contract>, ApiError> {
        let response = self
            .client
            .traced_get(&self.url("/contracts"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível carregar os contratos.").await
    }

    pub async fn get_contract(&self, token: &str, id: &str) -> Result<Contract, ApiError> {
        let response = self
            .client
            .traced_get(&self.url(&format!("/contracts/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível carregar o contrato.").await
    }

    pub async fn update_contract(
        &self,
        token: &str,
        id: &str,
        payload: &ContractUpdatePayload,
    ) -> Result<Contract, ApiError> {
        let response = self
            .client
            .traced_put(&self.url(&format!("/contracts/{}", id)))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível salvar as alterações.").await
    }

    pub async fn delete_contract(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .traced_delete(&self.url(&format!("/contracts/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_ok(response, "Não foi possível excluir o contrato.").await
    }

    pub async fn update_contract_item(
        &self,
        token: &str,
        id: &str,
        payload: &ItemPayload,
    ) -> Result<Contract, ApiError> {
        let response = self
            .client
            .traced_put(&self.url(&format!("/contracts/{}/items", id)))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível salvar o item.").await
    }

    pub async fn delete_contract_item(
        &self,
        token: &str,
        id: &str,
        item_no: u64,
    ) -> Result<Contract, ApiError> {
        let response = self
            .client
            .traced_delete(&self.url(&format!("/contracts/{}/items/{}", id, item_no)))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível remover o item.").await
    }

    pub async fn import_contract(
        &self,
        token: &str,
        payload: &ImportPayload,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/contracts/import"))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível importar o contrato.").await
    }

    // orders

    pub async fn list_orders(&self, token: &str) -> Result<Vec<OrderSummary>, ApiError> {
        let response = self
            .client
            .traced_get(&self.url("/orders"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível carregar as ordens já emitidas.").await
    }

    pub async fn create_order(
        &self,
        token: &str,
        payload: &OrderCreatePayload,
    ) -> Result<Order, ApiError> {
        let response = self
            .client
            .traced_post(&self.url("/orders"))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        Self::expect_json(
            response,
            "Não foi possível criar a ordem. Verifique os dados e tente novamente.",
        )
        .await
    }

    pub async fn get_order(&self, token: &str, id: &str) -> Result<Order, ApiError> {
        let response = self
            .client
            .traced_get(&self.url(&format!("/orders/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível carregar a ordem.").await
    }

    pub async fn update_order(
        &self,
        token: &str,
        id: &str,
        payload: &OrderUpdatePayload,
    ) -> Result<Order, ApiError> {
        let response = self
            .client
            .traced_put(&self.url(&format!("/orders/{}", id)))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        Self::expect_json(response, "Não foi possível salvar as alterações da ordem.").await
    }

    pub async fn delete_order(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .traced_delete(&self.url(&format!("/orders/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_ok(response, "Não foi possível excluir a ordem.").await
    }

    /// Generates the order spreadsheet and returns the raw XLSX bytes.
    pub async fn order_xlsx(
        &self,
        token: &str,
        id: &str,
        extras: &XlsxExtras,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .traced_post(&self.url(&format!("/orders/{}/xlsx", id)))
            .bearer_auth(token)
            .json(extras)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            Err(upstream_error(response, "Não foi possível gerar a planilha da ordem.").await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_message_then_error_field() {
        let both = serde_json::json!({ "message": "Saldo insuficiente.", "error": "other" });
        assert_eq!(message_from_body(&both), Some("Saldo insuficiente."));

        let only_error = serde_json::json!({ "error": "Contrato não encontrado." });
        assert_eq!(message_from_body(&only_error), Some("Contrato não encontrado."));

        let empty = serde_json::json!({ "message": "" });
        assert_eq!(message_from_body(&empty), None);

        let unrelated = serde_json::json!({ "detail": "x" });
        assert_eq!(message_from_body(&unrelated), None);
    }
}
