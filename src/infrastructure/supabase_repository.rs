// Supabase (PostgREST) machine repository
use crate::application::machine_repository::MachineRepository;
use crate::domain::machine::Machine;
use anyhow::{Context, Result};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct SupabaseRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseRepository {
    pub fn new(base_url: String, api_key: String, table: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table,
        }
    }

    fn build_query_url(&self, filter: &str) -> String {
        format!("{}/rest/v1/{}?select=*&{}", self.base_url, self.table, filter)
    }

    async fn execute_query(&self, filter: &str) -> Result<Vec<Machine>> {
        let url = self.build_query_url(filter);
        tracing::debug!("Executing machines query: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to Supabase")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Supabase query failed with status {}: {}", status, body);
        }

        response
            .json::<Vec<Machine>>()
            .await
            .context("Failed to parse Supabase response")
    }
}

#[async_trait]
impl MachineRepository for SupabaseRepository {
    async fn list_machines(&self) -> Result<Vec<Machine>> {
        let machines = self.execute_query("order=name.asc").await?;
        tracing::debug!("Found {} machines", machines.len());
        Ok(machines)
    }

    async fn get_machine(&self, id: &str) -> Result<Option<Machine>> {
        let filter = format!("id=eq.{}&limit=1", urlencoding::encode(id));
        let machines = self.execute_query(&filter).await?;
        Ok(machines.into_iter().next())
    }
}
