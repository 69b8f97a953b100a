use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

use nsfs::namespace::BindMode;
use nsfs::{provider, NameSpace};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Bind an OS directory at a mount point before running the command
    #[arg(short = 'b', long = "bind", value_names = ["MOUNT", "HOST_DIR"], num_args = 2, action = clap::ArgAction::Append)]
    binds: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entries of a directory in the assembled namespace
    Ls {
        /// Path inside the namespace
        path: String,
    },
    /// Print the contents of a file in the assembled namespace
    Cat {
        /// Path inside the namespace
        path: String,
    },
    /// Walk the namespace from a path, printing every entry visited
    Tree {
        /// Path inside the namespace
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print the bind table
    Bindings,
}

fn build_namespace(binds: &[String]) -> Result<NameSpace> {
    let ns = NameSpace::new();
    for pair in binds.chunks(2) {
        let [mount, host] = pair else {
            anyhow::bail!("--bind requires a MOUNT and HOST_DIR pair");
        };
        let p = provider::safe_os(PathBuf::from(host)).with_context(|| format!("binding {mount}"))?;
        ns.bind(mount, p, "/", BindMode::Replace);
        info!("bound {mount} <- os({host})");
    }
    Ok(ns)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new().filter_level(log_level).init();

    let ns = build_namespace(&cli.binds)?;

    match &cli.command {
        Commands::Ls { path } => {
            for entry in ns.read_dir(path)? {
                let kind = if entry.is_dir() { "d" } else { "-" };
                println!("{kind} {:>10} {}", entry.size(), entry.name());
            }
        }
        Commands::Cat { path } => {
            let bytes = provider::read_file(&ns, path)?;
            std::io::Write::write_all(&mut std::io::stdout(), &bytes)?;
        }
        Commands::Tree { path } => {
            nsfs::walk_tree(path, &ns, &mut |p, md, err| {
                match (md, err) {
                    (Some(md), _) => println!("{} {}", if md.is_dir() { "d" } else { "-" }, p),
                    (None, Some(e)) => println!("? {p} ({e})"),
                    _ => {}
                }
                nsfs::WalkControl::Continue
            })?;
        }
        Commands::Bindings => {
            print!("{ns}");
        }
    }

    Ok(())
}
