use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uritmpl::{
    cli::{self, CliCommand},
    config, create_router,
};

const DEFAULT_LOG_FILTER: &str = "uritmpl=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();

    match CliCommand::from_matches(&matches)? {
        CliCommand::Serve { routes, bind } => {
            let table = config::load_route_table(Some(routes.as_str()))?;
            let app = create_router(table);

            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind {}", bind))?;
            info!(address = %bind, "Listening");

            axum::serve(listener, app).await?;
        }
        CliCommand::Expand { template, values } => {
            println!("{}", cli::run_expand(&template, &values)?);
        }
        CliCommand::Extract {
            template,
            uri,
            shapes,
            required,
        } => {
            println!("{}", cli::run_extract(&template, &uri, &shapes, &required)?);
        }
    }

    Ok(())
}
