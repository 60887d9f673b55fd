//! HTTP client for the player tracking API.
//!
//! This module provides the [`WomRequester`] struct implementing [`PlayerApi`].

use async_trait::async_trait;
use log::{debug, info};
use mockall::automock;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::wom::{
    WomError,
    response_structs::{MessageResponse, Player, PlayerAchievement, PlayerGains, PlayerRecord},
};

/// HTTP client for the player tracking API.
///
/// # Examples
///
/// ```no_run
/// let requester = WomRequester::new("https://api.wiseoldman.net/v2", None, Some("secret"));
/// let records = requester.fetch_player_records("zezima", "overall").await.unwrap();
/// println!("Records: {:?}", records);
/// ```
pub struct WomRequester {
    /// API base url, without trailing slash
    url: String,
    /// Optional API key sent with every request
    api_key: Option<String>,
    /// Administrative password, required to delete players or change their country
    admin_password: Option<String>,
    /// HTTP client
    client: Client,
}

/// Requests commands can make to the player tracking API.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
#[async_trait]
pub trait PlayerApi: Send + Sync {
    /// Fetches the details of a player.
    async fn fetch_player(&self, username: &str) -> Result<Player, WomError>;
    /// Tracks a player, creating it if needed, and returns its updated details.
    async fn track_player(&self, username: &str) -> Result<Player, WomError>;
    /// Deletes a player and all its data.
    async fn delete_player(&self, username: &str) -> Result<MessageResponse, WomError>;
    /// Changes the country of a player.
    async fn update_country(
        &self,
        username: &str,
        country: &str,
    ) -> Result<MessageResponse, WomError>;
    /// Fetches the gains of a player over a period (day, week, month...).
    async fn fetch_player_gains(
        &self,
        username: &str,
        period: &str,
    ) -> Result<PlayerGains, WomError>;
    /// Fetches the records of a player for a metric.
    async fn fetch_player_records(
        &self,
        username: &str,
        metric: &str,
    ) -> Result<Vec<PlayerRecord>, WomError>;
    /// Fetches the most recent achievements of a player, newest first, at most `limit`.
    async fn fetch_player_achievements(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<PlayerAchievement>, WomError>;
}

impl WomRequester {
    /// Create a new [WomRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the API.
    /// * `api_key` - Optional API key.
    /// * `admin_password` - Administrative password used by delete and country updates.
    pub fn new(url: &str, api_key: Option<&str>, admin_password: Option<&str>) -> Self {
        WomRequester {
            url: url.to_string(),
            api_key: api_key.map(str::to_string),
            admin_password: admin_password.map(str::to_string),
            client: Client::new(),
        }
    }

    fn player_url(&self, username: &str) -> String {
        format!("{}/players/username/{}", &self.url, username)
    }

    fn admin_password(&self) -> Result<&str, WomError> {
        self.admin_password
            .as_deref()
            .ok_or(WomError::MissingAdminPassword)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, WomError> {
        let request = match &self.api_key {
            Some(api_key) => request.header("x-api-key", api_key),
            None => request,
        };

        read_body(request.send().await?).await
    }
}

async fn read_body(response: Response) -> Result<String, WomError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<MessageResponse>(&body)
            .map(|m| m.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
        return Err(WomError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, WomError> {
    serde_json::from_str(body).map_err(WomError::Decode)
}

/// Keeps the `limit` most recent achievements, newest first.
pub fn latest_achievements(
    mut achievements: Vec<PlayerAchievement>,
    limit: usize,
) -> Vec<PlayerAchievement> {
    achievements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    achievements.truncate(limit);
    achievements
}

#[async_trait]
impl PlayerApi for WomRequester {
    /// Request `GET /players/username/{username}`.
    async fn fetch_player(&self, username: &str) -> Result<Player, WomError> {
        let url = self.player_url(username);
        info!("request player {}", username);

        let body = self.send(self.client.get(&url)).await?;
        debug!("response from {} -> {}", &url, &body);

        decode(&body)
    }

    /// Request `POST /players/track` with `{ username }`.
    async fn track_player(&self, username: &str) -> Result<Player, WomError> {
        let url = format!("{}/players/track", &self.url);
        info!("request tracking of {}", username);

        let body = self
            .send(self.client.post(&url).json(&json!({ "username": username })))
            .await?;
        debug!("response from {} -> {}", &url, &body);

        decode(&body)
    }

    /// Request `DELETE /players/username/{username}` with the admin password.
    async fn delete_player(&self, username: &str) -> Result<MessageResponse, WomError> {
        let admin_password = self.admin_password()?;
        let url = self.player_url(username);
        info!("request deletion of {}", username);

        let body = self
            .send(
                self.client
                    .delete(&url)
                    .json(&json!({ "adminPassword": admin_password })),
            )
            .await?;
        debug!("response from {} -> {}", &url, &body);

        decode(&body)
    }

    /// Request `PUT /players/username/{username}/country` with the admin password.
    async fn update_country(
        &self,
        username: &str,
        country: &str,
    ) -> Result<MessageResponse, WomError> {
        let admin_password = self.admin_password()?;
        let url = format!("{}/country", self.player_url(username));
        info!("request country update of {} to {}", username, country);

        let body = self
            .send(self.client.put(&url).json(&json!({
                "country": country,
                "adminPassword": admin_password,
            })))
            .await?;
        debug!("response from {} -> {}", &url, &body);

        decode(&body)
    }

    /// Request `GET /players/username/{username}/gained?period={period}`.
    async fn fetch_player_gains(
        &self,
        username: &str,
        period: &str,
    ) -> Result<PlayerGains, WomError> {
        let url = format!("{}/gained", self.player_url(username));
        info!("request {} gains of {}", period, username);

        let body = self
            .send(self.client.get(&url).query(&[("period", period)]))
            .await?;
        debug!("response from {}?period={} -> {}", &url, period, &body);

        decode(&body)
    }

    /// Request `GET /players/username/{username}/records?metric={metric}`.
    async fn fetch_player_records(
        &self,
        username: &str,
        metric: &str,
    ) -> Result<Vec<PlayerRecord>, WomError> {
        let url = format!("{}/records", self.player_url(username));
        info!("request {} records of {}", metric, username);

        let body = self
            .send(self.client.get(&url).query(&[("metric", metric)]))
            .await?;
        debug!("response from {}?metric={} -> {}", &url, metric, &body);

        decode(&body)
    }

    /// Request `GET /players/username/{username}/achievements`.
    ///
    /// An empty or `null` body is an empty list.
    async fn fetch_player_achievements(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<PlayerAchievement>, WomError> {
        let url = format!("{}/achievements", self.player_url(username));
        info!("request achievements of {}", username);

        let body = self.send(self.client.get(&url)).await?;
        debug!("response from {} -> {}", &url, &body);

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let achievements: Option<Vec<PlayerAchievement>> = decode(&body)?;

        Ok(latest_achievements(achievements.unwrap_or_default(), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::Matcher;

    const PLAYER_BODY: &str = r#"{
        "id": 1,
        "username": "zezima",
        "displayName": "Zezima",
        "type": "regular",
        "build": "main",
        "country": "US",
        "exp": 1000,
        "ehp": 1.5,
        "ehb": 0,
        "registeredAt": "2020-04-18T08:00:00.000Z",
        "updatedAt": "2023-01-02T10:30:00.000Z",
        "lastImportedAt": null,
        "latestSnapshot": null
    }"#;

    fn achievement(name: &str, day: u32) -> PlayerAchievement {
        PlayerAchievement {
            name: name.to_string(),
            metric: "attack".to_string(),
            threshold: 13034431.0,
            created_at: Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap(),
        }
    }

    fn achievements_body(count: u32) -> String {
        let items: Vec<String> = (1..=count)
            .map(|day| {
                format!(
                    r#"{{"name": "a{day}", "metric": "attack", "threshold": 99, "createdAt": "2023-01-{day:02}T00:00:00.000Z"}}"#
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[tokio::test]
    async fn test_fetch_player() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/zezima")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PLAYER_BODY)
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let player = requester.fetch_player("zezima").await.unwrap();

        assert_eq!(player.display_name, "Zezima");
        assert_eq!(player.country.as_deref(), Some("US"));
        assert_eq!(
            player.updated_at,
            Some(Utc.with_ymd_and_hms(2023, 1, 2, 10, 30, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_fetch_player_sends_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/players/username/zezima")
            .match_header("x-api-key", "key")
            .with_status(200)
            .with_body(PLAYER_BODY)
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), Some("key"), None);
        requester.fetch_player("zezima").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_player_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/nobody")
            .with_status(404)
            .with_body(r#"{"message": "Player not found."}"#)
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let error = requester.fetch_player("nobody").await.unwrap_err();

        assert!(error.is_not_found());
        assert!(matches!(
            error,
            WomError::Status { message, .. } if message == "Player not found."
        ));
    }

    #[tokio::test]
    async fn test_error_without_message_uses_status_reason() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/zezima")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let error = requester.fetch_player("zezima").await.unwrap_err();

        assert!(matches!(
            error,
            WomError::Status { status: 500, message } if message == "Internal Server Error"
        ));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/zezima")
            .with_status(200)
            .with_body(r#"{"id": "not a number"}"#)
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let error = requester.fetch_player("zezima").await.unwrap_err();

        assert!(matches!(error, WomError::Decode(_)));
    }

    #[tokio::test]
    async fn test_track_player() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/players/track")
            .match_body(Matcher::Json(json!({ "username": "zezima" })))
            .with_status(200)
            .with_body(PLAYER_BODY)
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let player = requester.track_player("zezima").await.unwrap();

        assert_eq!(player.username, "zezima");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_player_sends_admin_password() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/players/username/zezima")
            .match_body(Matcher::Json(json!({ "adminPassword": "secret" })))
            .with_status(200)
            .with_body(r#"{"message": "Successfully deleted player: zezima"}"#)
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, Some("secret"));
        let response = requester.delete_player("zezima").await.unwrap();

        assert_eq!(response.message, "Successfully deleted player: zezima");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_player_without_admin_password() {
        let requester = WomRequester::new("http://127.0.0.1:9", None, None);
        let error = requester.delete_player("zezima").await.unwrap_err();

        assert!(matches!(error, WomError::MissingAdminPassword));
    }

    #[tokio::test]
    async fn test_update_country() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/players/username/zezima/country")
            .match_body(Matcher::Json(
                json!({ "country": "PT", "adminPassword": "secret" }),
            ))
            .with_status(200)
            .with_body(r#"{"message": "Successfully changed country to: Portugal (PT)"}"#)
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, Some("secret"));
        let response = requester.update_country("zezima", "PT").await.unwrap();

        assert!(response.message.contains("Portugal"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_player_gains() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/zezima/gained")
            .match_query(Matcher::UrlEncoded("period".to_owned(), "week".to_owned()))
            .with_status(200)
            .with_body(
                r#"{
                    "startsAt": "2023-01-01T00:00:00.000Z",
                    "endsAt": "2023-01-08T00:00:00.000Z",
                    "data": {
                        "skills": { "attack": { "metric": "attack", "experience": { "gained": 500 } } },
                        "bosses": { "zulrah": { "metric": "zulrah", "kills": { "gained": 3 } } }
                    }
                }"#,
            )
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let gains = requester
            .fetch_player_gains("zezima", "week")
            .await
            .unwrap();

        assert_eq!(
            gains.starts_at,
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(gains.data.bosses["zulrah"].kills.gained, 3.0);
    }

    #[tokio::test]
    async fn test_fetch_player_records() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/zezima/records")
            .match_query(Matcher::UrlEncoded(
                "metric".to_owned(),
                "overall".to_owned(),
            ))
            .with_status(200)
            .with_body(
                r#"[{"value": 1000, "period": "day", "metric": "overall", "updatedAt": "2023-01-05T00:00:00.000Z"}]"#,
            )
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let records = requester
            .fetch_player_records("zezima", "overall")
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].updated_at,
            Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_fetch_player_achievements_null_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/zezima/achievements")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let achievements = requester
            .fetch_player_achievements("zezima", 5)
            .await
            .unwrap();

        assert!(achievements.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_player_achievements_empty_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/zezima/achievements")
            .with_status(200)
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let achievements = requester
            .fetch_player_achievements("zezima", 5)
            .await
            .unwrap();

        assert!(achievements.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_player_achievements_limited_newest_first() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/players/username/zezima/achievements")
            .with_status(200)
            .with_body(achievements_body(8))
            .create_async()
            .await;

        let requester = WomRequester::new(&server.url(), None, None);
        let achievements = requester
            .fetch_player_achievements("zezima", 5)
            .await
            .unwrap();

        let names: Vec<&str> = achievements.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a8", "a7", "a6", "a5", "a4"]);
    }

    #[test]
    fn test_latest_achievements_sorts_descending() {
        let achievements = vec![
            achievement("old", 1),
            achievement("new", 20),
            achievement("mid", 10),
        ];

        let latest = latest_achievements(achievements, 5);

        let names: Vec<&str> = latest.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_latest_achievements_truncates() {
        let achievements = (1..=10).map(|day| achievement("a", day)).collect();
        assert_eq!(latest_achievements(achievements, 3).len(), 3);
    }

    #[test]
    fn test_latest_achievements_empty() {
        assert!(latest_achievements(Vec::new(), 5).is_empty());
    }
}
