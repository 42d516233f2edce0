//! Embed command - build a view mosaic and request its SAM embedding.

use std::path::PathBuf;

use clap::Args;
use samgeo::config::ConfigFile;
use samgeo::embedding::{EmbeddingClient, SAM_EMBEDDING_SHAPE};
use samgeo::provider::ReqwestClient;
use tracing::warn;

use super::common::{build_fetcher, build_view_mosaic, resolve_viewport, ViewArgs};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct EmbedArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Embedding service URL (overrides embedding.url)
    #[arg(long)]
    pub embedding_url: Option<String>,

    /// Where to write the raw embedding
    #[arg(short, long, default_value = "embedding.bin")]
    pub output: PathBuf,

    /// Also save the uploaded mosaic PNG
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// Run the embed command.
pub fn run(args: EmbedArgs, config: &ConfigFile) -> Result<(), CliError> {
    let viewport = resolve_viewport(&args.view, config)?;
    let fetcher = build_fetcher(&args.view, config)?;
    let mosaic = build_view_mosaic(&fetcher, &viewport, config)?;

    if let Some(path) = &args.image {
        mosaic.save_png(path)?;
        println!("Mosaic: {}", path.display());
    }

    let url = args
        .embedding_url
        .unwrap_or_else(|| config.embedding.url.clone());
    let client = EmbeddingClient::new(
        ReqwestClient::with_timeout(config.embedding_timeout())?,
        url,
    );

    println!("Requesting embedding from {}...", client.url());
    let embedding = client.compute(&mosaic)?;

    if let Err(e) = embedding.check_shape(&SAM_EMBEDDING_SHAPE) {
        warn!(error = %e, "Embedding does not have the expected SAM shape");
    }
    embedding.save(&args.output)?;

    let [west, south, east, north] = mosaic.extent.to_array();
    println!("Embedding: {} ({} bytes)", args.output.display(), embedding.len());
    println!("  Image:  {}x{} px", mosaic.width, mosaic.height);
    println!("  Extent: [{}, {}, {}, {}]", west, south, east, north);
    Ok(())
}
