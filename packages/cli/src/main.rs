// ABOUTME: Tutor binary: HTTP server plus user and token administration
// ABOUTME: `tutor serve` exposes the API; user/token subcommands provision access

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{header, HeaderName};
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutor_api::{create_api_router, request_logger, AppState, DbState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database (defaults to ~/.tutor/tutor.db)
    #[arg(long, env = "TUTOR_DB", global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve {
        #[arg(short, long, default_value_t = 4100)]
        port: u16,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Manage bearer tokens
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user
    Add {
        email: String,
        #[arg(long, default_value = "")]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a bearer token for a user; the plaintext is printed once
    Create {
        user_id: String,
        #[arg(long, default_value = "default")]
        name: String,
    },
    /// List a user's tokens
    List { user_id: String },
    /// Revoke a token by id
    Revoke { token_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let db = DbState::init_with_path(cli.db_path).await?;

    match cli.command {
        Command::Serve { port } => serve(db, port).await?,
        Command::User { command } => match command {
            UserCommand::Add { email, name } => {
                let user = db.user_storage.create(&email, &name).await?;
                println!("Created user {} ({})", user.id, user.email);
            }
        },
        Command::Token { command } => match command {
            TokenCommand::Create { user_id, name } => {
                if db.user_storage.get(&user_id).await?.is_none() {
                    anyhow::bail!("No such user: {}", user_id);
                }
                let generated = db.token_storage.create_token(&user_id, &name).await?;
                println!("Token id: {}", generated.id);
                println!("Bearer token (shown once): {}", generated.token);
            }
            TokenCommand::List { user_id } => {
                for token in db.token_storage.list_tokens(&user_id).await? {
                    println!(
                        "{}  {}  active={}  created={}",
                        token.id, token.name, token.is_active, token.created_at
                    );
                }
            }
            TokenCommand::Revoke { token_id } => {
                db.token_storage.revoke_token(&token_id).await?;
                println!("Revoked token {}", token_id);
            }
        },
    }

    Ok(())
}

async fn serve(db: DbState, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(db);

    // Permissive CORS: any origin, with the headers browser clients send
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    let app = create_api_router(state)
        .layer(cors)
        .layer(axum::middleware::from_fn(request_logger));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
