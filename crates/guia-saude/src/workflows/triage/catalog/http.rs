use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::super::domain::{GuidanceSet, HealthUnit, Symptom, UnitType};
use super::payload::{parse_guidance, parse_symptoms, parse_units};
use super::{CatalogError, CatalogResource, CatalogSource};

/// Catalog backed by the upstream JSON API (`/symptoms`, `/guidance`, `/units`).
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    base_url: Url,
}

impl HttpCatalogSource {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: CatalogResource) -> Result<Url, CatalogError> {
        let (segment, unit_type) = match resource {
            CatalogResource::Symptoms => ("symptoms", None),
            CatalogResource::Guidance => ("guidance", None),
            CatalogResource::Units(unit_type) => ("units", unit_type),
        };

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Transport {
                resource,
                message: format!("base url '{}' cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .push(segment);

        if let Some(unit_type) = unit_type {
            url.query_pairs_mut()
                .append_pair("type", unit_type.as_str());
        }

        Ok(url)
    }

    async fn get_json(&self, resource: CatalogResource) -> Result<Value, CatalogError> {
        let url = self.endpoint(resource)?;
        tracing::debug!(%resource, %url, "fetching catalog resource");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::Transport {
                resource,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::UnsuccessfulResponse {
                resource,
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|err| {
            if err.is_decode() {
                CatalogError::ShapeMismatch {
                    resource,
                    detail: format!("response is not valid JSON: {err}"),
                }
            } else {
                CatalogError::Transport {
                    resource,
                    message: err.to_string(),
                }
            }
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_symptoms(&self) -> Result<Vec<Symptom>, CatalogError> {
        let value = self.get_json(CatalogResource::Symptoms).await?;
        parse_symptoms(value)
    }

    async fn fetch_guidance(&self) -> Result<GuidanceSet, CatalogError> {
        let value = self.get_json(CatalogResource::Guidance).await?;
        parse_guidance(value)
    }

    async fn fetch_units(
        &self,
        unit_type: Option<UnitType>,
    ) -> Result<Vec<HealthUnit>, CatalogError> {
        let value = self.get_json(CatalogResource::Units(unit_type)).await?;
        parse_units(unit_type, value)
    }
}
