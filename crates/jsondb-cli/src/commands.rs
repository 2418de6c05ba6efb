use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use jsondb_server::{JsonDbServer, ServerConfig};
use jsondb_store::{Document, DocumentStore, FsDocumentStore};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = FsDocumentStore::open(&cli.root)
        .with_context(|| format!("opening data root {}", cli.root.display()))?;
    let mut out = std::io::stdout();

    match cli.command {
        Command::Serve(args) => cmd_serve(store, args),
        Command::Get(args) => cmd_get(&store, args, &mut out),
        Command::List(args) => cmd_list(&store, args, &mut out),
        Command::Put(args) => cmd_put(&store, args, &mut out),
        Command::Delete(args) => cmd_delete(&store, args, &mut out),
        Command::Collections => cmd_collections(&store, &mut out),
    }
}

fn cmd_serve(store: FsDocumentStore, args: ServeArgs) -> anyhow::Result<()> {
    let config = ServerConfig {
        bind_addr: args.bind,
        data_root: store.root().to_path_buf(),
        collection: args.collection,
        not_found_as_404: args.not_found_404,
    };
    println!(
        "{} jsondb on {} (root: {}, collection: {})",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.data_root.display(),
        config.collection.yellow(),
    );

    let server = JsonDbServer::new(config, Arc::new(store));
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_get(store: &impl DocumentStore, args: GetArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let doc = store.read(&args.collection, &args.id)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

fn cmd_list(store: &impl DocumentStore, args: ListArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let docs = store.read_all(&args.collection)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&docs)?)?;
    Ok(())
}

fn cmd_put(store: &impl DocumentStore, args: PutArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let doc: Document = serde_json::from_str(&args.json).context("document must be a JSON object")?;
    store.write(&args.collection, &args.id, &doc)?;
    writeln!(out, "{} Wrote {}/{}", "✓".green().bold(), args.collection.bold(), args.id.yellow())?;
    Ok(())
}

fn cmd_delete(store: &impl DocumentStore, args: DeleteArgs, out: &mut impl Write) -> anyhow::Result<()> {
    store.delete(&args.collection, &args.id)?;
    writeln!(out, "{} Deleted {}/{}", "✓".green().bold(), args.collection.bold(), args.id.yellow())?;
    Ok(())
}

fn cmd_collections(store: &FsDocumentStore, out: &mut impl Write) -> anyhow::Result<()> {
    let names = store.collections()?;
    if names.is_empty() {
        writeln!(out, "No collections.")?;
    }
    for name in names {
        writeln!(out, "{}", name.bold())?;
    }
    Ok(())
}
