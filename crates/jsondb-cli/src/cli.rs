use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "jsondb",
    about = "jsondb: JSON documents as files, served over HTTP",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the collections.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print one document
    Get(GetArgs),
    /// Print every document in a collection
    List(ListArgs),
    /// Create or replace a document
    Put(PutArgs),
    /// Delete a document or nested collection
    Delete(DeleteArgs),
    /// List top-level collections
    Collections,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:4000")]
    pub bind: SocketAddr,
    /// Collection served by the HTTP endpoints.
    #[arg(long, default_value = jsondb_server::DEFAULT_COLLECTION)]
    pub collection: String,
    /// Answer 404 rather than 500 for missing documents.
    #[arg(long)]
    pub not_found_404: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub collection: String,
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    pub collection: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub collection: String,
    pub id: String,
    /// Document as a JSON object.
    pub json: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub collection: String,
    pub id: String,
}
