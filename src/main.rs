use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use captionflow::caption::config::CaptionConfig;
use captionflow::caption::server;
use captionflow::caption::workflow::CaptionGraph;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the caption web form
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,
    },
    /// Generate one caption and print the post and its last review
    Generate {
        /// Topic of the post
        #[arg(short, long)]
        topic: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let config = CaptionConfig::from_env()?;
    let graph = CaptionGraph::from_config(&config)?;

    match args.command {
        Commands::Serve { host, port } => {
            server::serve(Arc::new(graph), SocketAddr::new(host, port)).await?;
        }
        Commands::Generate { topic } => {
            let (post, review) = graph.run(&topic).await?.into_pair();
            println!("{}\n\n---\nReview: {}", post, review);
        }
    }

    Ok(())
}
