use anyhow::Result;
use clap::Parser;
use nodeimage::commands;
use nodeimage::commands::config::{Config, resolve_api_key};
use nodeimage::runtime::RealRuntime;

/// nodeimage - NodeImage hosting service client
///
/// Upload, list, and delete images on the NodeImage hosting service.
///
/// The API key is taken from --api-key, the NODE_IMAGE_API_KEY environment
/// variable, or a .env file in the current directory, in that order.
///
/// Examples:
///   nodeimage upload photo.png                     # Upload a local file
///   nodeimage upload https://example.com/a.jpg     # Upload a remote image
///   nodeimage list                                 # List uploaded images
///   nodeimage delete img_abc123 --yes              # Delete without prompting
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key (overrides the NODE_IMAGE_API_KEY environment variable)
    #[arg(long = "api-key", value_name = "KEY", global = true)]
    pub api_key: Option<String>,

    /// Service API URL (defaults to https://api.nodeimage.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List all images in the account
    List,

    /// Upload an image from a local path or an http(s) URL
    Upload(UploadArgs),

    /// Delete an image by its id
    Delete(DeleteArgs),

    /// Print environment details for troubleshooting
    Debug,
}

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Local file path or http(s) URL of the image
    #[arg(value_name = "PATH_OR_URL")]
    pub reference: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Id of the image to delete
    #[arg(value_name = "IMAGE_ID")]
    pub image_id: String,

    /// Skip the confirmation prompt
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    match cli.command {
        Commands::List => {
            let config = Config::new(runtime, cli.api_key, cli.api_url)?;
            commands::list(&config.service)?
        }
        Commands::Upload(args) => {
            let config = Config::new(runtime, cli.api_key, cli.api_url)?;
            commands::upload(&config.runtime, &config.service, &config.http, &args.reference)?
        }
        Commands::Delete(args) => {
            let config = Config::new(runtime, cli.api_key, cli.api_url)?;
            commands::delete(&config.runtime, &config.service, &args.image_id, args.yes)?
        }
        // Debug must work without a credential.
        Commands::Debug => {
            let api_key = resolve_api_key(&runtime, cli.api_key);
            commands::debug(&runtime, api_key.as_deref())?
        }
    }
    Ok(())
}
