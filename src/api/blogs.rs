//! Blog management endpoints (`/blogs`), used by the dashboard and editor.

use super::client::ApiClient;
use super::error::ApiError;
use super::request::ApiRequest;
use super::transport::Transport;
use super::types::{Blog, BlogRequest, BlogStats};

/// GET /blogs: all blogs of the current user.
pub async fn list<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Blog>, ApiError> {
    Ok(client
        .dispatch(&ApiRequest::get("/blogs"))
        .await?
        .unwrap_or_default())
}

/// GET /blogs/recent
pub async fn recent<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Blog>, ApiError> {
    Ok(client
        .dispatch(&ApiRequest::get("/blogs/recent"))
        .await?
        .unwrap_or_default())
}

/// GET /blogs/stats
pub async fn stats<T: Transport>(client: &ApiClient<T>) -> Result<BlogStats, ApiError> {
    client.fetch(&ApiRequest::get("/blogs/stats")).await
}

pub async fn get<T: Transport>(client: &ApiClient<T>, id: u64) -> Result<Blog, ApiError> {
    client.fetch(&ApiRequest::get(format!("/blogs/{}", id))).await
}

pub async fn create<T: Transport>(
    client: &ApiClient<T>,
    blog: &BlogRequest,
) -> Result<Blog, ApiError> {
    client.fetch(&ApiRequest::post("/blogs").json(blog)?).await
}

pub async fn update<T: Transport>(
    client: &ApiClient<T>,
    id: u64,
    blog: &BlogRequest,
) -> Result<Blog, ApiError> {
    client
        .fetch(&ApiRequest::put(format!("/blogs/{}", id)).json(blog)?)
        .await
}

/// DELETE /blogs/{id}. Any 2xx, with or without a body, counts as success.
pub async fn delete<T: Transport>(client: &ApiClient<T>, id: u64) -> Result<(), ApiError> {
    client
        .dispatch::<serde_json::Value>(&ApiRequest::delete(format!("/blogs/{}", id)))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::{json, Value};

    use crate::api::testing::{client, json_response, no_content, response, Scripted};

    fn blog_json(id: u64, published: bool) -> Value {
        json!({"id": id, "title": format!("Post {id}"), "content": "body", "published": published})
    }

    #[tokio::test]
    async fn test_list_decodes_blogs() {
        let api = client(Scripted::new(json_response(json!([
            blog_json(1, true),
            blog_json(2, false)
        ]))));
        let blogs = list(&api).await.unwrap();
        assert_eq!(blogs.len(), 2);
        assert!(!blogs[1].published);
        assert_eq!(api.transport().last().url, "http://api.test/api/blogs");
    }

    #[tokio::test]
    async fn test_list_empty_response_is_empty_vec() {
        let api = client(Scripted::new(no_content()));
        assert!(list(&api).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_request_body() {
        let api = client(Scripted::new(json_response(blog_json(9, true))));
        let blog = create(
            &api,
            &BlogRequest {
                title: "Post 9".into(),
                content: "body".into(),
                published: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(blog.id, 9);

        let sent = api.transport().last();
        assert_eq!(sent.method, Method::POST);
        let body: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"title": "Post 9", "content": "body", "published": true}));
    }

    #[tokio::test]
    async fn test_update_targets_blog_id() {
        let api = client(Scripted::new(json_response(blog_json(3, false))));
        let req = BlogRequest {
            title: "t".into(),
            content: "c".into(),
            published: false,
        };
        update(&api, 3, &req).await.unwrap();
        let sent = api.transport().last();
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(sent.url, "http://api.test/api/blogs/3");
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let api = client(Scripted::new(no_content()));
        delete(&api, 5).await.unwrap();
        let sent = api.transport().last();
        assert_eq!(sent.method, Method::DELETE);
        assert_eq!(sent.url, "http://api.test/api/blogs/5");
    }

    #[tokio::test]
    async fn test_get_missing_blog_is_not_found() {
        let api = client(Scripted::new(response(
            404,
            "Not Found",
            r#"{"message":"Blog not found with id: 42"}"#,
        )));
        let err = get(&api, 42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stats() {
        let api = client(Scripted::new(json_response(json!({
            "totalBlogs": 3, "publishedBlogs": 1, "draftBlogs": 2
        }))));
        let s = stats(&api).await.unwrap();
        assert_eq!(s.published_blogs, 1);
    }
}
