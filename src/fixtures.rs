//! Demo data served when the mock policy is active.

use crate::api::types::{Author, Blog, Post, User};

/// Token stored for the local demo session.
pub const DEMO_TOKEN: &str = "mock-jwt-token";

pub fn demo_user() -> User {
    User {
        id: 1,
        name: "Demo User".to_string(),
        email: "demo@example.com".to_string(),
        bio: Some("This is a demo user account for testing purposes.".to_string()),
        avatar_url: Some(String::new()),
    }
}

fn demo_author() -> Author {
    Author {
        id: 1,
        name: "Demo User".to_string(),
        avatar_url: Some(String::new()),
    }
}

pub fn demo_posts() -> Vec<Post> {
    vec![Post {
        id: 1,
        title: "Getting Started with React".to_string(),
        content: "React is a popular JavaScript library for building user interfaces..."
            .to_string(),
        created_at: Some("2023-05-15T10:30:00Z".to_string()),
        likes: 24,
        comments: 8,
        author: demo_author(),
        user_liked: false,
    }]
}

/// Demo posts in the dashboard's blog shape, owned by [`demo_user`].
pub fn demo_blogs() -> Vec<Blog> {
    demo_posts()
        .into_iter()
        .map(|post| Blog {
            id: post.id,
            title: post.title,
            content: post.content,
            published: true,
            created_at: post.created_at.clone(),
            updated_at: post.created_at,
            user: Some(demo_user()),
        })
        .collect()
}
