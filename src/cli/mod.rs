// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Command line interface for the face embedding service

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::{start_server, AppState};
use crate::config::{
    parse_extensions, ModelSettings, ServerSettings, ServiceConfig, StorageSettings,
    DEFAULT_LISTEN_ADDR, DEFAULT_MODEL_PATH, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_STORAGE_ROOT,
};
use crate::embeddings::{FaceEmbedder, OnnxFaceEmbedder};
use crate::faces::{FaceEmbeddingService, FaceStore};
use crate::version;
use crate::vision::read_image_file;

/// Face embedding service
#[derive(Parser, Debug)]
#[command(name = "face-embedding-service")]
#[command(version = version::VERSION_NUMBER)]
#[command(about = "Serves face embeddings for company image directories", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the model, optionally embed one image, then exit
    CheckModel {
        /// Image to embed after loading
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Root directory holding one sub-directory per company
    #[arg(long, env = "FACE_STORAGE_ROOT", default_value = DEFAULT_STORAGE_ROOT)]
    pub storage_root: PathBuf,

    /// Accepted image extensions, comma separated
    #[arg(long, env = "FACE_IMAGE_EXTENSIONS", value_delimiter = ',', default_value = "jpg")]
    pub extensions: Vec<String>,

    /// Path to the ONNX face recognition model
    #[arg(long, env = "FACE_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Try the CUDA execution provider first
    #[arg(long, env = "FACE_USE_CUDA")]
    pub use_cuda: bool,

    #[arg(long, env = "FACE_API_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "FACE_REQUEST_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,
}

impl ServeArgs {
    pub fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            storage: StorageSettings {
                root: self.storage_root,
                extensions: parse_extensions(&self.extensions.join(",")),
            },
            model: ModelSettings {
                path: self.model_path,
                use_cuda: self.use_cuda,
            },
            server: ServerSettings {
                listen_addr: self.listen_addr,
                request_timeout_ms: self.request_timeout_ms,
            },
        }
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = cli.serve.into_config();
    config.validate().map_err(|e| anyhow!(e))?;

    match cli.command {
        None => serve(config).await,
        Some(Commands::CheckModel { image }) => check_model(config, image),
    }
}

fn load_embedder(config: &ServiceConfig) -> Result<OnnxFaceEmbedder> {
    info!("🧠 Loading face model from {}", config.model.path.display());
    let embedder = OnnxFaceEmbedder::new(&config.model.path, config.model.use_cuda)
        .with_context(|| format!("Cannot start without face model {}", config.model.path.display()))?;
    info!("✅ Face model ready: {:?}", embedder.info());
    Ok(embedder)
}

async fn serve(config: ServiceConfig) -> Result<()> {
    let embedder = load_embedder(&config)?;
    let store = FaceStore::from_settings(&config.storage);
    info!(
        "📁 Face images under {} (extensions: {})",
        store.root().display(),
        store.accepted_extensions().join(", ")
    );

    let service = FaceEmbeddingService::new(store, Arc::new(embedder));
    let state = AppState::new(Arc::new(service), config.request_timeout());
    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen_addr))?;

    start_server(addr, state, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
    })
    .await
    .context("HTTP server failed")?;

    info!("👋 Face embedding service stopped");
    Ok(())
}

fn check_model(config: ServiceConfig, image: Option<PathBuf>) -> Result<()> {
    let embedder = load_embedder(&config)?;
    if let Some(path) = image {
        let decoded = read_image_file(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let embedding = embedder
            .embed(&decoded.image)
            .with_context(|| format!("Failed to embed {}", path.display()))?;
        println!(
            "{}: {} values, norm {:.6}",
            path.display(),
            embedding.len(),
            embedding.norm()
        );
    }
    Ok(())
}
