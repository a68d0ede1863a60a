//! # Catalog Client SDK
//!
//! A typed Rust client for the Vehicle Catalog API.

use std::collections::BTreeMap;

use catalog_types::{
    Page, PageRequest, PatchVehicleRequest, RateResponse, SearchFilter, Vehicle, VehicleId,
    VehicleRequest,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Header carrying the caller's role, as read by the server's role gate.
pub const ROLE_HEADER: &str = "X-Catalog-Role";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Vehicle Catalog API client.
pub struct CatalogClient {
    base_url: String,
    role: Option<String>,
    http: Client,
}

impl CatalogClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            role: None,
            http: Client::new(),
        }
    }

    /// Sets the role sent with every request (`admin` unlocks writes).
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Registers a new vehicle.
    pub async fn create_vehicle(&self, req: &VehicleRequest) -> Result<Vehicle, ClientError> {
        self.send(self.http.post(self.url("/api/vehicles")).json(req))
            .await
    }

    /// Gets a vehicle by ID.
    pub async fn get_vehicle(&self, id: VehicleId) -> Result<Vehicle, ClientError> {
        self.send(self.http.get(self.url(&format!("/api/vehicles/{}", id))))
            .await
    }

    /// Lists one page of vehicles.
    pub async fn list_vehicles(&self, page: PageRequest) -> Result<Page<Vehicle>, ClientError> {
        self.send(self.http.get(self.url("/api/vehicles")).query(&page))
            .await
    }

    /// Searches vehicles; price bounds are in local currency.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<Vehicle>, ClientError> {
        self.send(self.http.get(self.url("/api/vehicles/search")).query(filter))
            .await
    }

    /// Replaces every mutable field of a vehicle.
    pub async fn update_vehicle(
        &self,
        id: VehicleId,
        req: &VehicleRequest,
    ) -> Result<Vehicle, ClientError> {
        let url = self.url(&format!("/api/vehicles/{}", id));
        self.send(self.http.put(url).json(req)).await
    }

    /// Updates a subset of a vehicle's fields.
    pub async fn patch_vehicle(
        &self,
        id: VehicleId,
        patch: &PatchVehicleRequest,
    ) -> Result<Vehicle, ClientError> {
        let url = self.url(&format!("/api/vehicles/{}", id));
        self.send(self.http.patch(url).json(patch)).await
    }

    /// Soft-deletes a vehicle.
    pub async fn delete_vehicle(&self, id: VehicleId) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/vehicles/{}", id));
        let resp = self.authorize(self.http.delete(url)).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(api_error(resp).await)
        }
    }

    /// Live vehicle count per brand.
    pub async fn brand_report(&self) -> Result<BTreeMap<String, u64>, ClientError> {
        self.send(self.http.get(self.url("/api/vehicles/reports/by-brand")))
            .await
    }

    /// The exchange rate the server currently applies.
    pub async fn exchange_rate(&self) -> Result<RateResponse, ClientError> {
        self.send(self.http.get(self.url("/api/exchange-rate")))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.role {
            Some(role) => req.header(ROLE_HEADER, role),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = self.authorize(req).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        if resp.status().is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(api_error(resp).await)
        }
    }
}

/// Extracts the `error` field of a failure body, falling back to the raw text.
async fn api_error(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(body);
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CatalogClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = CatalogClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_role() {
        let client = CatalogClient::new("http://localhost:3000").with_role("admin");
        assert_eq!(client.role, Some("admin".to_string()));
    }

    fn vehicle_json() -> serde_json::Value {
        json!({
            "id": "6f1c2b1e-8a57-4f4e-9f64-3f0c9f0f6d11",
            "name": "Corolla XEi",
            "brand": "Toyota",
            "model": "Corolla",
            "year": 2022,
            "color": "Black",
            "plate": "ABC1D23",
            "price_usd": "20000.00",
            "sold": false,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_search_sends_only_present_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/vehicles/search"))
            .and(query_param("brand", "Toyota"))
            .and(query_param("min_price", "100000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([vehicle_json()])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri());
        let found = client
            .search(&SearchFilter {
                brand: Some("Toyota".into()),
                min_price: Some(Decimal::from(100_000)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].price_usd, Decimal::from_str("20000.00").unwrap());
    }

    #[tokio::test]
    async fn test_role_header_sent_on_writes() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(header(ROLE_HEADER, "admin"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri()).with_role("admin");
        client.delete_vehicle(VehicleId::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_message_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/exchange-rate"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(json!({"error": "Exchange rate unavailable", "code": 503})),
            )
            .mount(&server)
            .await;

        let err = CatalogClient::new(server.uri())
            .exchange_rate()
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Exchange rate unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
