//! Stateless request builder and response parser for the fleet API.
//!
//! # Design
//! `ApiClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; a `Transport` runs the round-trip in
//! between. Builders and parsers are generic over `Resource`, so the three
//! collections share one path scheme: `/{resource}` and `/{resource}/{id}`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, CONTENT_TYPE};
use crate::resource::Resource;
use crate::types::EntityId;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list<R: Resource>(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.collection_url::<R>(), None)
    }

    pub fn build_get<R: Resource>(&self, id: EntityId) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url::<R>(id), None)
    }

    pub fn build_create<R: Resource>(&self, input: &R::Create) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(self.request(HttpMethod::Post, self.collection_url::<R>(), Some(body)))
    }

    pub fn build_update<R: Resource>(
        &self,
        id: EntityId,
        input: &R::Update,
    ) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(self.request(HttpMethod::Put, self.item_url::<R>(id), Some(body)))
    }

    pub fn build_delete<R: Resource>(&self, id: EntityId) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_url::<R>(id), None)
    }

    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R::Record>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// Parse the single record returned by get, create and update.
    pub fn parse_record<R: Resource>(&self, response: HttpResponse) -> Result<R::Record, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// Parse a delete acknowledgement. Whatever body a 2xx carries is ignored.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn collection_url<R: Resource>(&self) -> String {
        format!("{}/{}", self.base_url, R::PATH)
    }

    fn item_url<R: Resource>(&self, id: EntityId) -> String {
        format!("{}/{}/{id}", self.base_url, R::PATH)
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
            body,
        }
    }
}

fn encode<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Any 2xx passes; everything else becomes an `ApiError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_response(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Places, Units, Users};
    use crate::types::{CreatePlaceDto, CreateUserDto, Role, UnitStatus, UpdateUnitDto};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn json_header() -> Vec<(String, String)> {
        vec![("content-type".to_string(), "application/json".to_string())]
    }

    #[test]
    fn build_list_produces_correct_request() {
        let req = client().build_list::<Units>();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/units");
        assert!(req.body.is_none());
        assert_eq!(req.headers, json_header());
    }

    #[test]
    fn build_get_produces_correct_request() {
        let req = client().build_get::<Places>(12);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/places/12");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_produces_correct_request() {
        let input = CreateUserDto {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Driver,
        };
        let req = client().build_create::<Users>(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/users");
        assert_eq!(req.headers, json_header());
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Ana");
        assert_eq!(body["password"], "secret1");
        assert_eq!(body["role"], "DRIVER");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_update_sends_only_present_fields() {
        let req = client()
            .build_update::<Units>(3, &UpdateUnitDto::status(UnitStatus::Maintenance))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/units/3");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"status": "MAINTENANCE"}));
    }

    #[test]
    fn build_delete_produces_correct_request() {
        let req = client().build_delete::<Users>(999);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/users/999");
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://192.168.1.64:3000/");
        let req = client.build_create::<Places>(&CreatePlaceDto { name: "Depot".into() }).unwrap();
        assert_eq!(req.url, "http://192.168.1.64:3000/places");
    }

    #[test]
    fn parse_list_success() {
        let places = client()
            .parse_list::<Places>(response(200, r#"[{"id":1,"name":"Depot"},{"id":2,"name":"Yard"}]"#))
            .unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[1].name, "Yard");
    }

    #[test]
    fn parse_record_accepts_created() {
        let user = client()
            .parse_record::<Users>(response(
                201,
                r#"{"id":7,"name":"Ana","email":"ana@x.com","role":"DRIVER"}"#,
            ))
            .unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::Driver);
    }

    #[test]
    fn parse_record_not_found() {
        let err = client()
            .parse_record::<Users>(response(404, r#"{"message":"User with ID 9 not found"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(err.message(), Some("User with ID 9 not found"));
    }

    #[test]
    fn parse_record_server_error() {
        let err = client()
            .parse_record::<Places>(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn parse_empty_accepts_any_success() {
        assert!(client().parse_empty(response(204, "")).is_ok());
        assert!(client().parse_empty(response(200, r#"{"id":4,"name":"Old"}"#)).is_ok());
    }

    #[test]
    fn parse_empty_not_found() {
        let err = client().parse_empty(response(404, "")).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.message().is_none());
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list::<Units>(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_record_rejects_unknown_enum_literal() {
        let err = client()
            .parse_record::<Users>(response(
                200,
                r#"{"id":1,"name":"Bo","email":"bo@x.com","role":"OWNER"}"#,
            ))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
