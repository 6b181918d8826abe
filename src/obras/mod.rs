//! Client for the `/obras` resource

mod draft;
mod types;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::fetch::{ApiClient, ApiResponse};

pub use draft::*;
pub use types::*;

const OBRAS_PATH: &str = "/obras";

/// Message shown when saving an obra fails with `status`
pub fn save_error_message(status: u16) -> String {
    match status {
        400 => "Dados inválidos enviados para o servidor. Verifique os campos.".to_string(),
        401 => "Sessão expirada. Faça login novamente.".to_string(),
        403 => "Você não tem permissão para executar esta ação.".to_string(),
        404 => "Obra não encontrada.".to_string(),
        409 => "Conflito: Esta obra pode já estar sendo editada.".to_string(),
        422 => "Dados enviados são inválidos para o servidor.".to_string(),
        500 => "Erro no servidor. Tente novamente mais tarde.".to_string(),
        other => format!("Erro {}: Não foi possível processar a requisição.", other),
    }
}

/// CRUD operations on productions, authenticated through the session
#[derive(Clone)]
pub struct ObrasClient {
    api: ApiClient,
}

impl ObrasClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", OBRAS_PATH, id)
    }

    /// Fetch every production
    pub async fn list(&self) -> Result<Vec<Obra>> {
        let response = self.api.get(OBRAS_PATH).send().await?;
        let response = expect_success(response)?;
        response.json()
    }

    /// Create a production. Returns the stored record when the backend echoes it.
    pub async fn create(&self, payload: &ObraPayload) -> Result<Option<Obra>> {
        info!("[OBRA CREATE] POST {}", OBRAS_PATH);
        let response = self.api.post(OBRAS_PATH).json(payload)?.send().await?;
        let response = expect_success(response)?;
        Ok(parse_echo(&response))
    }

    /// Replace the production `id`
    pub async fn update(&self, id: i64, payload: &ObraPayload) -> Result<Option<Obra>> {
        let path = Self::item_path(id);
        info!("[OBRA UPDATE] PUT {}", path);
        let response = self.api.put(&path).json(payload)?.send().await?;
        let response = expect_success(response)?;
        Ok(parse_echo(&response))
    }

    /// Create when `id` is `None`, update otherwise
    pub async fn save(&self, id: Option<i64>, payload: &ObraPayload) -> Result<Option<Obra>> {
        match id {
            Some(id) => self.update(id, payload).await,
            None => self.create(payload).await,
        }
    }

    /// Delete the production `id`
    pub async fn delete(&self, id: i64) -> Result<()> {
        let path = Self::item_path(id);
        info!("[OBRA DELETE] DELETE {}", path);
        let response = self.api.delete(&path).send().await?;
        expect_success(response)?;
        Ok(())
    }
}

fn expect_success(response: ApiResponse) -> Result<ApiResponse> {
    if response.ok() {
        Ok(response)
    } else {
        Err(Error::api(response.status().as_u16(), response.text()))
    }
}

fn parse_echo(response: &ApiResponse) -> Option<Obra> {
    if response.bytes().is_empty() {
        return None;
    }
    match response.json() {
        Ok(obra) => Some(obra),
        Err(e) => {
            debug!("[OBRA] response body is not a record: {}", e);
            None
        }
    }
}
