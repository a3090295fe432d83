mod server;

use clap::{Parser, Subcommand};
use medchat_core::{
    run_indexing, ChatService, GeminiConfig, GeminiModel, IndexingOptions, MiniLmEmbedder,
    PineconeConfig, PineconeStore, DEFAULT_EMBEDDING_DIMENSIONS,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "medchat", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a folder of PDFs, chunk and embed them, and upsert the chunks
    /// into the remote vector index.
    Index {
        /// Folder that contains the reference PDFs.
        #[arg(long, env = "MEDCHAT_DATA_DIR", default_value = "data")]
        data_dir: String,
    },
    /// Serve the chat page and answer endpoint.
    Serve {
        /// Interface to listen on.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on.
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Index { data_dir } => {
            let store = PineconeStore::new(PineconeConfig::from_env()?, DEFAULT_EMBEDDING_DIMENSIONS);
            let embedder = MiniLmEmbedder::load()?;

            info!(folder = %data_dir, index = store.index_name(), "indexing pdf folder");
            let report = run_indexing(
                Path::new(&data_dir),
                &embedder,
                &store,
                IndexingOptions::default(),
            )
            .await?;

            println!(
                "{} chunks from {} documents embedded and stored in index \"{}\"",
                report.upserted,
                report.documents,
                store.index_name()
            );
        }
        Command::Serve { host, port } => {
            let store = PineconeStore::new(PineconeConfig::from_env()?, DEFAULT_EMBEDDING_DIMENSIONS);
            let model = GeminiModel::new(GeminiConfig::from_env()?);
            info!(model = model.model_name(), "using Gemini chat model");

            let embedder = MiniLmEmbedder::load()?;
            let service = Arc::new(ChatService::new(embedder, store, model));

            let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
            info!(%host, port, "medchat server listening");
            axum::serve(listener, server::router(service)).await?;
        }
    }

    Ok(())
}
