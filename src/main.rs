//! svrlab - Main entry point

use clap::Parser;
use svrlab::cli::{cmd_info, cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "svrlab=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            cmd_serve(host, port).await?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(&data)?;
        }
        Some(Commands::Train {
            data,
            target,
            features,
            c,
            epsilon,
            gamma,
            test_size,
            seed,
            output,
        }) => {
            cmd_train(
                &data,
                &target,
                features.as_deref(),
                c,
                epsilon,
                &gamma,
                test_size,
                seed,
                output.as_deref(),
            )?;
        }
        None => {
            // Default: run the service
            cmd_serve(None, None).await?;
        }
    }

    Ok(())
}
