use crate::{Entity, Match, Player, RecordId, Team};
use reqwest::Client;
use std::fmt;
use std::marker::PhantomData;

pub type ApiResult<T> = Result<T, ApiError>;

/// Where the backend listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5130";

/// REST client for the football backend. One resource endpoint per entity,
/// reached through [`Collection`] handles.
///
/// Every call is a fresh round trip: no retries, no caching and no request
/// timeout. A hung backend keeps the caller waiting.
#[derive(Debug, Clone)]
pub struct LigaApi {
    client: Client,
    base_url: String,
}

impl Default for LigaApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
        }
    }
}

impl LigaApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client: Client::builder()
                .user_agent(concat!("liga-tui/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn teams(&self) -> Collection<'_, Team> {
        self.collection()
    }

    pub fn players(&self) -> Collection<'_, Player> {
        self.collection()
    }

    pub fn matches(&self) -> Collection<'_, Match> {
        self.collection()
    }

    pub fn collection<T: Entity>(&self) -> Collection<'_, T> {
        Collection {
            api: self,
            url: format!("{}/api/{}", self.base_url, T::KIND.path()),
            _record: PhantomData,
        }
    }
}

/// Typed handle on one collection resource, e.g. `/api/Teams`.
#[derive(Debug)]
pub struct Collection<'a, T> {
    api: &'a LigaApi,
    url: String,
    _record: PhantomData<T>,
}

impl<T: Entity> Collection<'_, T> {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `GET /api/{Path}`
    pub async fn list_all(&self) -> ApiResult<Vec<T>> {
        let response = self.api.client.get(&self.url).send().await;
        decode(checked(response, &self.url)?, &self.url).await
    }

    /// `GET /api/{Path}/{id}`
    pub async fn get_by_id(&self, id: RecordId) -> ApiResult<T> {
        let url = self.member_url(id);
        let response = self.api.client.get(&url).send().await;
        decode(checked(response, &url)?, &url).await
    }

    /// `POST /api/{Path}`. Returns the record as stored, with its assigned id.
    pub async fn create(&self, record: &T) -> ApiResult<T> {
        let response = self.api.client.post(&self.url).json(record).send().await;
        decode(checked(response, &self.url)?, &self.url).await
    }

    /// `PUT /api/{Path}/{id}`. The response body is not part of the contract.
    pub async fn update(&self, id: RecordId, record: &T) -> ApiResult<()> {
        let url = self.member_url(id);
        let response = self.api.client.put(&url).json(record).send().await;
        checked(response, &url).map(drop)
    }

    /// `DELETE /api/{Path}/{id}`. The response body is not part of the contract.
    pub async fn delete(&self, id: RecordId) -> ApiResult<()> {
        let url = self.member_url(id);
        let response = self.api.client.delete(&url).send().await;
        checked(response, &url).map(drop)
    }

    fn member_url(&self, id: RecordId) -> String {
        format!("{}/{id}", self.url)
    }
}

/// Any transport failure or non-2xx status fails the call.
fn checked(
    response: Result<reqwest::Response, reqwest::Error>,
    url: &str,
) -> ApiResult<reqwest::Response> {
    response
        .map_err(|e| ApiError::Network(e, url.to_owned()))?
        .error_for_status()
        .map_err(|e| ApiError::Api(e, url.to_owned()))
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    url: &str,
) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parsing(e, url.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::Matcher;
    use serde_json::json;

    fn real_madrid(id: RecordId) -> Team {
        Team {
            id,
            name: "Real Madrid".into(),
            city: "Madrid".into(),
            stadium: "Bernabéu".into(),
            founding_year: 1902,
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = LigaApi::new("http://localhost:5130/");
        assert_eq!(api.teams().url(), "http://localhost:5130/api/Teams");
        assert_eq!(api.matches().url(), "http://localhost:5130/api/Matches");
    }

    #[tokio::test]
    async fn list_all_decodes_collection() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/Teams")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"id": 1, "nombre": "Real Madrid", "ciudad": "Madrid", "estadio": "Bernabéu", "anioFundacion": 1902},
                    {"id": 2, "nombre": "Valencia", "ciudad": "Valencia", "estadio": "Mestalla", "anioFundacion": 1919}
                ])
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let api = LigaApi::new(server.url());
        let teams = api.teams().list_all().await.unwrap();

        mock.assert_async().await;
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0], real_madrid(1));
        assert_eq!(teams[1].stadium, "Mestalla");
    }

    #[tokio::test]
    async fn get_by_id_hits_member_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/Matches/9")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 9, "equipoLocalId": 1, "equipoVisitanteId": 2,
                    "fecha": "2024-05-01T18:30:00", "resultado": "2-1", "estadio": "Bernabéu"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let api = LigaApi::new(server.url());
        let m = api.matches().get_by_id(9).await.unwrap();

        assert_eq!(m.id, 9);
        assert_eq!(m.result.as_deref(), Some("2-1"));
        assert_eq!(
            m.date,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(18, 30, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn create_posts_record_with_zero_id_and_returns_assigned_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/Teams")
            .match_body(Matcher::Json(json!({
                "id": 0, "nombre": "Real Madrid", "ciudad": "Madrid",
                "estadio": "Bernabéu", "anioFundacion": 1902
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&real_madrid(31)).unwrap())
            .expect(1)
            .create_async()
            .await;

        let api = LigaApi::new(server.url());
        let created = api.teams().create(&real_madrid(0)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created, real_madrid(31));
    }

    #[tokio::test]
    async fn update_ignores_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/Players/4")
            .match_body(Matcher::PartialJson(json!({"id": 4, "idEquipo": 1})))
            .with_status(204)
            .create_async()
            .await;

        let player = Player {
            id: 4,
            name: "Ana Ruiz".into(),
            position: "Delantero Centro".into(),
            age: 16,
            team_id: 1,
        };
        let api = LigaApi::new(server.url());
        api.players().update(4, &player).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_ignores_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/Teams/3")
            .with_status(200)
            .with_body("whatever the server says")
            .create_async()
            .await;

        let api = LigaApi::new(server.url());
        api.teams().delete(3).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/Players/99")
            .with_status(404)
            .create_async()
            .await;

        let api = LigaApi::new(server.url());
        let err = api.players().get_by_id(99).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, ref url) if url.ends_with("/api/Players/99")));
    }

    #[tokio::test]
    async fn server_error_on_delete_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/Matches/2")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let api = LigaApi::new(server.url());
        assert!(api.matches().delete(2).await.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_body_is_a_parsing_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/Teams")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{not json")
            .create_async()
            .await;

        let api = LigaApi::new(server.url());
        let err = api.teams().list_all().await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Port 9 (discard) is not listening on the test host.
        let api = LigaApi::new("http://127.0.0.1:9");
        let err = api.teams().list_all().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(..)));
    }
}
