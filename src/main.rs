//! View Host - plugin view host for document-mining sessions
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;

use viewhost_app::Settings;

/// View Host - plugin view host for document-mining sessions
#[derive(Parser, Debug)]
#[command(name = "viewhost")]
#[command(about = "Plugin view host for document-mining sessions", long_about = None)]
struct Args {
    /// Path to a TOML settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Document set this session operates on
    #[arg(long, value_name = "ID")]
    document_set_id: Option<u64>,

    /// Origin the host is served from (frame URL `server` parameter)
    #[arg(long, value_name = "URL")]
    server_origin: Option<String>,

    /// Base URL of the external filter/link backend
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// URL of the plugin loaded into the main view
    #[arg(long, value_name = "URL")]
    plugin_url: Option<String>,
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    viewhost_core::logging::init()?;

    let mut settings = Settings::load_or_default(args.config.as_deref())?;
    if let Some(id) = args.document_set_id {
        settings.document_set_id = id;
    }
    if let Some(origin) = args.server_origin {
        settings.server_origin = origin;
    }
    if let Some(url) = args.backend_url {
        settings.backend_url = url;
    }
    if let Some(url) = args.plugin_url {
        settings.plugin_url = url;
    }

    viewhost::run_headless(settings).await?;
    Ok(())
}
