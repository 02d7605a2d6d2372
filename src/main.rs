//! CLI entry point for prismic-blog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prismic-blog")]
#[command(version)]
#[command(about = "A static blog generator backed by a Prismic repository", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Start a local server that renders unknown posts on demand
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Generate the site before serving
        #[arg(short, long)]
        generate: bool,
    },

    /// Clean the public folder
    Clean,

    /// List posts from the CMS
    List {
        /// Ask before loading each further page
        #[arg(short, long)]
        interactive: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "prismic_blog=debug,info"
    } else {
        "prismic_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            prismic_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::Generate => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            let report = blog.generate().await?;
            println!(
                "Generated successfully! {} posts listed, {} post pages.",
                report.listed, report.posts
            );
        }

        Commands::Server { port, ip, generate } => {
            let blog = prismic_blog::Blog::new(&base_dir)?;

            if generate {
                tracing::info!("Generating static files...");
                blog.generate().await?;
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            prismic_blog::server::start(&blog, &ip, port).await?;
        }

        Commands::Clean => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { interactive } => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            let client = blog.client()?;
            prismic_blog::commands::list::run(&blog, &client, interactive).await?;
        }

        Commands::Version => {
            println!("prismic-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
