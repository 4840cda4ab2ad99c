//! Typed calls against the feed service.
//!
//! Every request goes through [`FeedApi::call`], which bounds it with the
//! configured timeout. Non-2xx statuses become [`FeedError::ServerRejected`]
//! (or [`FeedError::ContentRejectedAsSpam`] for a 406 on submission) and
//! bodies that do not decode become [`FeedError::MalformedResponse`].

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use feed_core::Draft;
use feed_types::{
    FeedError, FeedPage, FeedQuery, FeedSource, LikeAction, LikeResponse, PostEntity, PostId,
    PostObject, PostsResponse, Topic, TopicsResponse, UserId, Visibility,
};

use crate::config::ClientConfig;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Status the service uses to refuse a post as spam.
pub const SPAM_REJECTED_STATUS: u16 = 406;

/// Feed service API over a transport.
pub struct FeedApi<T: Transport> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> FeedApi<T> {
    /// Create an API client.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request under the configured timeout.
    ///
    /// Returns the response whatever its status.
    pub async fn call(&self, request: ApiRequest) -> Result<ApiResponse, FeedError> {
        let method = request.method;
        let target = request.target();
        debug!(%method, %target, "Sending request");

        let response = match tokio::time::timeout(
            self.config.request_timeout,
            self.transport.send(request),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(%method, %target, error = %e, "Request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(%method, %target, timeout = ?self.config.request_timeout, "Request timed out");
                return Err(FeedError::Timeout);
            }
        };

        debug!(%method, %target, status = response.status, "Received response");
        Ok(response)
    }

    async fn call_ok(&self, request: ApiRequest) -> Result<ApiResponse, FeedError> {
        let response = self.call(request).await?;
        if !response.is_success() {
            return Err(FeedError::ServerRejected(response.status));
        }
        Ok(response)
    }

    /// Fetch one page of `source` under `query`.
    pub async fn fetch_page(
        &self,
        source: FeedSource,
        query: &FeedQuery,
    ) -> Result<FeedPage, FeedError> {
        let request = query
            .query_pairs()
            .into_iter()
            .fold(ApiRequest::get(source.path()), |r, (k, v)| r.with_query(k, v));

        let response = self.call_ok(request).await?;
        FeedPage::from_response(decode::<PostsResponse>(&response)?)
    }

    /// Fetch a single post.
    pub async fn fetch_post(&self, id: PostId) -> Result<PostEntity, FeedError> {
        let response = self.call_ok(ApiRequest::get(format!("/posts/{}", id))).await?;
        PostEntity::try_from(decode::<PostObject>(&response)?)
    }

    /// Create a post authored by `author`.
    pub async fn create_post(&self, author: UserId, draft: Draft) -> Result<PostEntity, FeedError> {
        let body = serde_json::to_value(draft.into_request())
            .map_err(|e| FeedError::MalformedResponse(e.to_string()))?;
        let request =
            ApiRequest::post(format!("/account/self/user/{}/post", author)).with_json(body);

        let response = self.call(request).await?;
        match response.status {
            SPAM_REJECTED_STATUS => Err(FeedError::ContentRejectedAsSpam),
            status if !response.is_success() => Err(FeedError::ServerRejected(status)),
            _ => PostEntity::try_from(decode::<PostObject>(&response)?),
        }
    }

    /// Like or unlike a post. Returns the server's new like count.
    pub async fn set_like(&self, id: PostId, action: LikeAction) -> Result<u64, FeedError> {
        let request =
            ApiRequest::post(format!("/posts/{}/like/", id)).with_query("type", action.as_str());
        let response = self.call_ok(request).await?;
        Ok(decode::<LikeResponse>(&response)?.likes)
    }

    /// Hide or unhide a post. Any 2xx counts as done; the body is ignored.
    pub async fn set_visibility(&self, id: PostId, visibility: Visibility) -> Result<(), FeedError> {
        let request =
            ApiRequest::put(format!("/posts/{}/", id)).with_query("action", visibility.as_str());
        self.call_ok(request).await.map(|_| ())
    }

    /// Delete a post. Any 2xx counts as done; the body is ignored.
    pub async fn delete_post(&self, id: PostId) -> Result<(), FeedError> {
        self.call_ok(ApiRequest::delete(format!("/posts/{}", id)))
            .await
            .map(|_| ())
    }

    /// List topics whose name matches `search`.
    pub async fn fetch_topics(&self, search: &str) -> Result<Vec<Topic>, FeedError> {
        let request = ApiRequest::get("/topics").with_query("search_query", search);
        let response = self.call_ok(request).await?;
        Ok(decode::<TopicsResponse>(&response)?.topics)
    }
}

fn decode<D: DeserializeOwned>(response: &ApiResponse) -> Result<D, FeedError> {
    serde_json::from_slice(&response.body).map_err(|e| FeedError::MalformedResponse(e.to_string()))
}
