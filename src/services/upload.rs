// src/services/upload.rs

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use uuid::Uuid;

use crate::common::error::AppError;

// Encaminha a planilha de produtos para o webhook externo de
// sincronização. Um POST multipart, sem retry e sem chunking:
// qualquer 2xx é sucesso, o resto é falha.
#[derive(Clone)]
pub struct UploadService {
    http: Client,
    webhook_url: String,
}

impl UploadService {
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: Client::new(),
            webhook_url,
        }
    }

    pub async fn forward_spreadsheet(
        &self,
        file_name: &str,
        content: Vec<u8>,
        store_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let file_part = Part::bytes(content).file_name(file_name.to_string());

        let form = Form::new()
            .part("file", file_part)
            .text("storeId", store_id.to_string())
            .text("userId", user_id.to_string());

        let response = self
            .http
            .post(&self.webhook_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(format!("falha de rede: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::UploadFailed(format!(
                "webhook respondeu {}",
                response.status()
            )));
        }

        tracing::info!("📦 Planilha '{}' encaminhada para o webhook", file_name);
        Ok(())
    }
}
