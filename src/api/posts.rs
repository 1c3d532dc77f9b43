//! Public post view: post detail, comments and likes.

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::request::ApiRequest;
use super::transport::Transport;
use super::types::{Comment, NewComment, Post};

pub async fn get<T: Transport>(client: &ApiClient<T>, id: u64) -> Result<Post, ApiError> {
    client.fetch(&ApiRequest::get(format!("/posts/{}", id))).await
}

pub async fn comments<T: Transport>(
    client: &ApiClient<T>,
    id: u64,
) -> Result<Vec<Comment>, ApiError> {
    Ok(client
        .dispatch(&ApiRequest::get(format!("/posts/{}/comments", id)))
        .await?
        .unwrap_or_default())
}

/// Fetch a post and its comments concurrently.
pub async fn with_comments<T: Transport>(
    client: &ApiClient<T>,
    id: u64,
) -> Result<(Post, Vec<Comment>), ApiError> {
    tokio::try_join!(get(client, id), comments(client, id))
}

pub async fn add_comment<T: Transport>(
    client: &ApiClient<T>,
    id: u64,
    content: &str,
) -> Result<Comment, ApiError> {
    let request = ApiRequest::post(format!("/posts/{}/comments", id)).json(&NewComment {
        content: content.to_string(),
    })?;
    client.fetch(&request).await
}

/// POST /posts/{id}/like to like, DELETE to unlike.
pub async fn set_liked<T: Transport>(
    client: &ApiClient<T>,
    id: u64,
    liked: bool,
) -> Result<(), ApiError> {
    let method = if liked { Method::POST } else { Method::DELETE };
    client
        .dispatch::<serde_json::Value>(&ApiRequest::new(method, format!("/posts/{}/like", id)))
        .await?;
    Ok(())
}

/// Flip the like state of `post` on the backend and mirror it locally.
pub async fn toggle_like<T: Transport>(
    client: &ApiClient<T>,
    post: &mut Post,
) -> Result<(), ApiError> {
    let liked = !post.user_liked;
    set_liked(client, post.id, liked).await?;
    if liked {
        post.likes += 1;
    } else {
        post.likes = post.likes.saturating_sub(1);
    }
    post.user_liked = liked;
    Ok(())
}
