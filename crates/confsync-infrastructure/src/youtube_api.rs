//! YouTube Data API v3 client.
//!
//! Implements both [`VideoService`] and [`PlaylistService`] over a single
//! bearer-token `reqwest` client. The access token is obtained up front
//! through [`YouTubeAuth`](crate::youtube_auth::YouTubeAuth).

use crate::http_client::transport_error;
use async_trait::async_trait;
use confsync_core::error::RemoteError;
use confsync_core::youtube::{
    PlaylistItem, PlaylistService, PlaylistSnapshot, VideoInfo, VideoService, VideoUpdateRequest,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `playlistItems.list` page size (API maximum).
const PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize, Serialize)]
struct VideoResource {
    id: String,
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
    /// The API sends the category as a numeric string.
    category_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItemResource>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    id: String,
    snippet: PlaylistItemSnippetIn,
    #[serde(default)]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippetIn {
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct PlaylistItemBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    snippet: PlaylistItemSnippetOut<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippetOut<'a> {
    playlist_id: &'a str,
    position: u32,
    resource_id: ResourceId,
}

pub struct YouTubeApiClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl YouTubeApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Sends an authorized request and returns the body of a 2xx response.
    async fn send(
        &self,
        request: RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<String, RemoteError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| transport_error("YouTube API request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error("Failed to read YouTube API response", e))?;

        if !status.is_success() {
            return Err(map_http_error(status, body, resource, id));
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<T, RemoteError> {
        let body = self.send(request, resource, id).await?;
        parse_body(&body)
    }

    async fn list_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, RemoteError> {
        let page_size = PAGE_SIZE.to_string();
        let mut query = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let request = self.client.get(self.url("playlistItems")).query(&query);
        self.send_json(request, "Playlist", playlist_id).await
    }

    async fn write_playlist_item(
        &self,
        item_id: Option<&str>,
        playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> Result<(), RemoteError> {
        let body = playlist_item_body(item_id, playlist_id, video_id, position);
        let url = self.url("playlistItems");
        let request = match item_id {
            Some(_) => self.client.put(url),
            None => self.client.post(url),
        }
        .query(&[("part", "snippet")])
        .json(&body);

        self.send(request, "Playlist", playlist_id).await?;
        Ok(())
    }
}

#[async_trait]
impl VideoService for YouTubeApiClient {
    async fn get_info(&self, video_id: &str) -> Result<VideoInfo, RemoteError> {
        tracing::debug!("[YouTube] videos.list {}", video_id);
        let request = self
            .client
            .get(self.url("videos"))
            .query(&[("part", "snippet"), ("id", video_id)]);

        let response: VideoListResponse = self.send_json(request, "Video", video_id).await?;
        video_info_from_response(video_id, response)
    }

    async fn update(&self, request: &VideoUpdateRequest) -> Result<(), RemoteError> {
        tracing::debug!("[YouTube] videos.update {}", request.video_id);
        let body = video_update_body(request);
        let http_request = self
            .client
            .put(self.url("videos"))
            .query(&[("part", "snippet")])
            .json(&body);

        self.send(http_request, "Video", &request.video_id).await?;
        Ok(())
    }
}

#[async_trait]
impl PlaylistService for YouTubeApiClient {
    async fn list_items(&self, playlist_id: &str) -> Result<PlaylistSnapshot, RemoteError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_page(playlist_id, page_token.as_deref()).await?;
            items.extend(page.items.into_iter().filter_map(playlist_item_from_resource));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("[YouTube] Playlist {} has {} items", playlist_id, items.len());
        Ok(PlaylistSnapshot::from_items(items))
    }

    async fn add_item(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> Result<(), RemoteError> {
        tracing::debug!("[YouTube] playlistItems.insert {} @ {}", video_id, position);
        self.write_playlist_item(None, playlist_id, video_id, position)
            .await
    }

    async fn move_item(
        &self,
        item_id: &str,
        playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> Result<(), RemoteError> {
        tracing::debug!("[YouTube] playlistItems.update {} @ {}", video_id, position);
        self.write_playlist_item(Some(item_id), playlist_id, video_id, position)
            .await
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    serde_json::from_str(body).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
}

fn map_http_error(status: StatusCode, body: String, resource: &'static str, id: &str) -> RemoteError {
    match status {
        StatusCode::NOT_FOUND => RemoteError::NotFound {
            resource,
            id: id.to_string(),
        },
        StatusCode::UNAUTHORIZED => RemoteError::Unauthorized,
        StatusCode::FORBIDDEN => RemoteError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => RemoteError::RateLimited,
        _ => {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|wrapper| wrapper.error.message)
                .unwrap_or(body);
            RemoteError::Http {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn video_info_from_response(
    video_id: &str,
    response: VideoListResponse,
) -> Result<VideoInfo, RemoteError> {
    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| RemoteError::video_not_found(video_id))?;

    let category_id = item.snippet.category_id.trim().parse::<u32>().map_err(|_| {
        RemoteError::InvalidResponse(format!(
            "categoryId '{}' of video {} is not a number",
            item.snippet.category_id, item.id
        ))
    })?;

    Ok(VideoInfo {
        video_id: item.id,
        title: item.snippet.title,
        description: item.snippet.description,
        category_id,
    })
}

fn video_update_body(request: &VideoUpdateRequest) -> VideoResource {
    VideoResource {
        id: request.video_id.clone(),
        snippet: VideoSnippet {
            title: request.title.clone(),
            description: request.description.clone(),
            category_id: request.category_id.to_string(),
        },
    }
}

fn playlist_item_body<'a>(
    item_id: Option<&'a str>,
    playlist_id: &'a str,
    video_id: &str,
    position: u32,
) -> PlaylistItemBody<'a> {
    PlaylistItemBody {
        id: item_id,
        snippet: PlaylistItemSnippetOut {
            playlist_id,
            position,
            resource_id: ResourceId {
                kind: "youtube#video".to_string(),
                video_id: Some(video_id.to_string()),
            },
        },
    }
}

/// Items without a video id or position (deleted or private videos) are
/// skipped.
fn playlist_item_from_resource(resource: PlaylistItemResource) -> Option<PlaylistItem> {
    let video_id = resource
        .content_details
        .and_then(|details| details.video_id)
        .or_else(|| resource.snippet.resource_id.and_then(|r| r.video_id));

    match (video_id, resource.snippet.position) {
        (Some(video_id), Some(position)) => Some(PlaylistItem {
            item_id: resource.id,
            video_id,
            position,
        }),
        _ => {
            tracing::warn!("[YouTube] Skipping playlist item {} without video", resource.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_http_error_statuses() {
        assert_eq!(
            map_http_error(StatusCode::NOT_FOUND, String::new(), "Video", "v1"),
            RemoteError::video_not_found("v1")
        );
        assert_eq!(
            map_http_error(StatusCode::UNAUTHORIZED, String::new(), "Video", "v1"),
            RemoteError::Unauthorized
        );
        assert_eq!(
            map_http_error(StatusCode::FORBIDDEN, String::new(), "Video", "v1"),
            RemoteError::Forbidden
        );
        assert_eq!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, String::new(), "Video", "v1"),
            RemoteError::RateLimited
        );
    }

    #[test]
    fn test_map_http_error_uses_google_message() {
        let body = json!({"error": {"code": 400, "message": "Invalid title"}}).to_string();
        assert_eq!(
            map_http_error(StatusCode::BAD_REQUEST, body, "Video", "v1"),
            RemoteError::Http {
                status: 400,
                message: "Invalid title".to_string()
            }
        );

        assert_eq!(
            map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string(), "Video", "v1"),
            RemoteError::Http {
                status: 502,
                message: "upstream down".to_string()
            }
        );
    }

    #[test]
    fn test_video_info_from_response() {
        let body = json!({
            "items": [{
                "id": "v1",
                "snippet": {
                    "title": "Talk",
                    "description": "About things",
                    "categoryId": "28",
                    "tags": ["ignored"]
                }
            }]
        })
        .to_string();
        let response: VideoListResponse = parse_body(&body).unwrap();

        let info = video_info_from_response("v1", response).unwrap();

        assert_eq!(
            info,
            VideoInfo {
                video_id: "v1".to_string(),
                title: "Talk".to_string(),
                description: "About things".to_string(),
                category_id: 28,
            }
        );
    }

    #[test]
    fn test_empty_items_is_not_found() {
        let response: VideoListResponse = parse_body(r#"{"items": []}"#).unwrap();
        let err = video_info_from_response("missing", response).unwrap_err();

        assert_eq!(err, RemoteError::video_not_found("missing"));
    }

    #[test]
    fn test_bad_category_is_invalid_response() {
        let body = json!({
            "items": [{"id": "v1", "snippet": {"title": "T", "description": "", "categoryId": "x"}}]
        })
        .to_string();
        let response: VideoListResponse = parse_body(&body).unwrap();

        assert!(matches!(
            video_info_from_response("v1", response),
            Err(RemoteError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_video_update_body_shape() {
        let body = video_update_body(&VideoUpdateRequest {
            video_id: "v1".to_string(),
            title: "New".to_string(),
            description: "Desc".to_string(),
            category_id: 22,
        });

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "id": "v1",
                "snippet": {"title": "New", "description": "Desc", "categoryId": "22"}
            })
        );
    }

    #[test]
    fn test_playlist_item_bodies() {
        let insert = playlist_item_body(None, "PL1", "v1", 3);
        assert_eq!(
            serde_json::to_value(&insert).unwrap(),
            json!({
                "snippet": {
                    "playlistId": "PL1",
                    "position": 3,
                    "resourceId": {"kind": "youtube#video", "videoId": "v1"}
                }
            })
        );

        let update = playlist_item_body(Some("item-9"), "PL1", "v1", 0);
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["id"], "item-9");
        assert_eq!(value["snippet"]["position"], 0);
    }

    #[test]
    fn test_playlist_page_parsing() {
        let body = json!({
            "nextPageToken": "page2",
            "items": [
                {
                    "id": "item-1",
                    "snippet": {"position": 0, "resourceId": {"kind": "youtube#video", "videoId": "v1"}},
                    "contentDetails": {"videoId": "v1"}
                },
                {
                    "id": "item-2",
                    "snippet": {"position": 1, "resourceId": {"kind": "youtube#video", "videoId": "v2"}}
                },
                {
                    "id": "item-3",
                    "snippet": {"resourceId": {"kind": "youtube#video"}}
                }
            ]
        })
        .to_string();
        let page: PlaylistItemListResponse = parse_body(&body).unwrap();

        assert_eq!(page.next_page_token.as_deref(), Some("page2"));
        let items: Vec<_> = page
            .items
            .into_iter()
            .filter_map(playlist_item_from_resource)
            .collect();

        assert_eq!(
            items,
            vec![
                PlaylistItem {
                    item_id: "item-1".to_string(),
                    video_id: "v1".to_string(),
                    position: 0
                },
                PlaylistItem {
                    item_id: "item-2".to_string(),
                    video_id: "v2".to_string(),
                    position: 1
                },
            ]
        );
    }

    #[test]
    fn test_url_joins_base() {
        let client = YouTubeApiClient::new(Client::new(), "https://example.com/youtube/v3/", "t");
        assert_eq!(client.url("videos"), "https://example.com/youtube/v3/videos");
    }
}
