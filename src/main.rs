use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use blog_client::api::types::BlogRequest;
use blog_client::api::{auth, blogs, posts, users};
use blog_client::dashboard::Dashboard;
use blog_client::{ApiClient, ApiConfig, Session};

#[derive(Parser, Debug)]
#[command(name = "blog-client", about = "Command-line client for the blog backend")]
struct Args {
    /// Keep the session in memory instead of the OS keychain
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login { email: String, password: String },
    /// Create an account and store the session token
    Signup {
        name: String,
        email: String,
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Dashboard: list your blogs (demo data when mocked or the backend fails)
    Blogs,
    /// Most recent blogs
    Recent,
    /// Blog counts
    Stats,
    /// Show one blog
    Blog { id: u64 },
    /// Create a blog
    Create {
        title: String,
        content: String,
        #[arg(long)]
        publish: bool,
    },
    /// Replace a blog's title and content
    Edit {
        id: u64,
        title: String,
        content: String,
        #[arg(long)]
        publish: bool,
    },
    /// Delete a blog
    Delete { id: u64 },
    /// Show a post with its comments
    Post { id: u64 },
    /// Comment on a post
    Comment { id: u64, content: String },
    /// Like or unlike a post
    Like {
        id: u64,
        #[arg(long)]
        undo: bool,
    },
    /// Show your profile
    Profile,
    /// Update name and bio
    UpdateProfile { name: String, bio: String },
    /// Change password
    Password { current: String, new: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    env_logger::init();

    let args = Args::parse();
    let config = ApiConfig::from_env();
    log::debug!("API base URL: {}", config.base_url);

    let session = if args.ephemeral {
        Session::in_memory()
    } else {
        Session::keychain()
    };

    match run(args.command, &config, session).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &ApiConfig, session: Session) -> Result<(), String> {
    let client = ApiClient::new(config, session).map_err(|e| e.to_string())?;
    let policy = config.mock_policy();
    let dashboard = Dashboard::new(&client, &policy);

    let needs_session = matches!(
        command,
        Command::Blogs | Command::Delete { .. } | Command::Profile | Command::UpdateProfile { .. }
    );
    if needs_session && !dashboard.ensure_session().map_err(describe)? {
        return Err("Not logged in. Run `blog-client login` first.".to_string());
    }

    match command {
        Command::Login { email, password } => {
            let user = auth::login(&client, &email, &password)
                .await
                .map_err(|e| format!("Login failed: {}", e))?;
            print_json(&user)
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let user = auth::signup(&client, &name, &email, &password)
                .await
                .map_err(|e| format!("Signup failed: {}", e))?;
            print_json(&user)
        }
        Command::Logout => auth::logout(&client).map_err(|e| e.to_string()),
        Command::Blogs => print_json(&dashboard.posts().await.map_err(describe)?),
        Command::Recent => print_json(&blogs::recent(&client).await.map_err(describe)?),
        Command::Stats => print_json(&blogs::stats(&client).await.map_err(describe)?),
        Command::Blog { id } => print_json(&blogs::get(&client, id).await.map_err(describe)?),
        Command::Create {
            title,
            content,
            publish,
        } => {
            let blog = BlogRequest {
                title,
                content,
                published: publish,
            };
            print_json(&blogs::create(&client, &blog).await.map_err(describe)?)
        }
        Command::Edit {
            id,
            title,
            content,
            publish,
        } => {
            let blog = BlogRequest {
                title,
                content,
                published: publish,
            };
            print_json(&blogs::update(&client, id, &blog).await.map_err(describe)?)
        }
        Command::Delete { id } => dashboard.delete_post(id).await.map_err(describe),
        Command::Post { id } => {
            let (post, comments) = posts::with_comments(&client, id).await.map_err(describe)?;
            print_json(&serde_json::json!({ "post": post, "comments": comments }))
        }
        Command::Comment { id, content } => {
            print_json(&posts::add_comment(&client, id, &content).await.map_err(describe)?)
        }
        Command::Like { id, undo } => posts::set_liked(&client, id, !undo)
            .await
            .map_err(describe),
        Command::Profile => print_json(&dashboard.profile().await.map_err(describe)?),
        Command::UpdateProfile { name, bio } => dashboard
            .update_profile(&name, &bio)
            .await
            .map_err(describe),
        Command::Password { current, new } => users::update_password(&client, &current, &new)
            .await
            .map_err(describe),
    }
}

/// User-facing message, using the status code for the common cases.
fn describe(err: blog_client::ApiError) -> String {
    if err.is_unauthorized() {
        "Not logged in or session expired. Run `blog-client login` first.".to_string()
    } else if err.is_forbidden() {
        format!("You don't have permission to do that: {}", err)
    } else if err.is_not_found() {
        format!("Not found: {}", err)
    } else {
        err.to_string()
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to format output: {}", e))?;
    println!("{}", text);
    Ok(())
}
