// Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand};
use clap_num::maybe_hex;
use std::path::PathBuf;

mod efuse;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Xtask {
    /// Log guard decisions to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    xtask: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an eFUSE write would be allowed on a device snapshot
    Validate {
        /// JSON snapshot of the eFUSE cache and controller registers
        #[arg(long)]
        snapshot: PathBuf,

        #[command(subcommand)]
        request: Request,
    },
    /// Write the snapshot of a never-programmed device
    Template {
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the eFUSE memory map
    MemoryMap,
}

#[derive(Clone, Debug, Subcommand)]
pub(crate) enum Request {
    /// AES key slot (0 = AES key, 1 = user key 0, 2 = user key 1)
    AesKey {
        #[arg(long, value_parser = maybe_hex::<u32>)]
        key_type: u32,
    },
    /// PPK hash slot (0..=2)
    Ppk {
        #[arg(long, value_parser = maybe_hex::<u32>)]
        ppk_type: u32,
    },
    /// IV range or black IV (0 = metaheader, 1 = black, 2 = PLM, 3 = data partition)
    Iv {
        #[arg(long, value_parser = maybe_hex::<u32>)]
        iv_type: u32,

        /// Three words, one per cache row
        #[arg(long, num_args = 3, value_parser = maybe_hex::<u32>)]
        iv: Vec<u32>,
    },
}

fn main() {
    let cli = Xtask::parse();
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = simple_logger::SimpleLogger::new().with_level(level).init();

    let result = match &cli.xtask {
        Commands::Validate { snapshot, request } => efuse::validate(snapshot, request),
        Commands::Template { out } => efuse::template(out).map(|_| true),
        Commands::MemoryMap => {
            efuse::print_memory_map();
            Ok(true)
        }
    };
    let allowed = result.unwrap_or_else(|e| {
        eprintln!("{e:#}");
        std::process::exit(2);
    });
    if !allowed {
        std::process::exit(1);
    }
}
