use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use carelink::api::ApiClient;
use carelink::config::AppConfig;
use carelink::db;
use carelink::navigation::{screen_catalog, select_dashboard};
use carelink::{PermissionHook, SessionRepository, SessionRouter, SqliteSessionStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "carelink session and permission tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in against the remote API and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Store a session from a token and a saved user payload
    Import {
        #[arg(long)]
        token: String,
        #[arg(long)]
        user_file: PathBuf,
    },
    /// Show the signed-in user, role, dashboard and list scope
    Whoami,
    /// Check one permission for the signed-in user
    Can { resource: String, action: String },
    /// List screens and the privileged controls the user would see
    Screens,
    /// Sign out and clear the stored session
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let pool = db::init(&config.database_url).await?;
    let repo = SessionRepository::new(SqliteSessionStore::new(pool));
    let router = SessionRouter::new(repo.clone());
    let hook = PermissionHook::new(repo, config.authz_mode);

    router.launch().await;
    hook.load().await;

    match cli.command {
        Commands::Login { email, password } => {
            let api = ApiClient::new(config.require_api_base_url()?, config.api_timeout, router.clone())?;
            let response = api.login(&email, &password).await?;
            if !response.success {
                anyhow::bail!(response.message.unwrap_or_else(|| "login failed".to_string()));
            }

            hook.refresh().await;
            print_signed_in(&router, &hook);
        }
        Commands::Import { token, user_file } => {
            let raw = std::fs::read_to_string(&user_file)
                .with_context(|| format!("failed to read {}", user_file.display()))?;
            let user: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", user_file.display()))?;

            if !router.login(Some(&token), user).await {
                anyhow::bail!("session was not stored");
            }

            hook.refresh().await;
            print_signed_in(&router, &hook);
        }
        Commands::Whoami => {
            let user = router.current_user().context("not signed in")?;
            let scope = serde_json::to_string(&hook.route_scope())?;

            println!("{:<10} {}", "Name", user.display_name());
            println!("{:<10} {}", "Email", user.email.as_deref().unwrap_or("-"));
            println!("{:<10} {} ({})", "Role", hook.role(), hook.role_name());
            println!("{:<10} {}", "Dashboard", select_dashboard(Some(user.as_ref())).route_name());
            println!("{:<10} {}", "Scope", scope);
        }
        Commands::Can { resource, action } => {
            let allowed = hook.can(&resource, &action);
            println!("{}.{}: {}", resource, action, if allowed { "allowed" } else { "denied" });
            hook.require(&resource, &action)?;
        }
        Commands::Screens => {
            let evaluator = hook.evaluator().context("not signed in")?;

            println!("{:<18} {:<22} {:<6} {}", "Screen", "Title", "View", "Controls");
            for spec in screen_catalog() {
                let view = match spec.resource {
                    Some(resource) => evaluator.can_view(resource.as_str()),
                    None => true,
                };
                let controls = spec
                    .visible_controls(&evaluator)
                    .iter()
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "{:<18} {:<22} {:<6} {}",
                    spec.route_name,
                    spec.title,
                    if view { "yes" } else { "no" },
                    if controls.is_empty() { "-" } else { controls.as_str() }
                );
            }
        }
        Commands::Logout => {
            router.logout().await;
            println!("Signed out");
        }
    }

    Ok(())
}

fn print_signed_in(router: &SessionRouter, hook: &PermissionHook) {
    let name = router
        .current_user()
        .map(|u| u.display_name())
        .unwrap_or_default();
    println!(
        "Signed in as {} ({}), landing on {}",
        name,
        hook.role_name(),
        router.initial_destination().route_name()
    );
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
