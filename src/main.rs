use anyhow::Context;
use satchel::{
    build_app,
    cli::{init, output::Output, Cli, Commands},
    db::DatabaseProvider,
    AppState, SatchelConfig, SessionCodec,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    // .env is optional; the secret may come from the real environment
    dotenvy::dotenv().ok();

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => {
            let result = init::run(
                init::InitConfig {
                    path,
                    force,
                    host,
                    port,
                },
                &output,
            );
            if let init::InitResult::Error(e) = result {
                anyhow::bail!("init failed: {}", e);
            }
            Ok(())
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        None => serve(&cli.config, cli.verbose).await,
    }
}

fn show_config(path: &std::path::Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: SatchelConfig =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv("listen", &config.bind_address());
    output.kv("log level", &config.server.log_level);
    output.kv("database", &config.database.url);
    output.kv("secret env", &config.auth.jwt_secret_env);
    output.kv(
        "cart updates",
        &format!("{:?}", config.cart.update_policy),
    );

    if validate {
        match config.validate() {
            Ok(()) => output.success("configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                anyhow::bail!("invalid configuration");
            }
        }
    }

    Ok(())
}

async fn serve(config_path: &std::path::Path, verbose: bool) -> anyhow::Result<()> {
    let config = SatchelConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let default_filter = if verbose {
        "debug".to_string()
    } else {
        config.server.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let secret = config.jwt_secret()?;
    let sessions = Arc::new(SessionCodec::new(&secret));

    let store = DatabaseProvider::from_url(&config.database.url)
        .create_store()
        .await
        .context("failed to open credential store")?;

    let app = build_app(AppState::new(store, sessions, config.cart.update_policy));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        address = %addr,
        database = %config.database.url,
        cart_updates = ?config.cart.update_policy,
        "satchel listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("satchel stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
