use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use diskarb_core::volume::volume_id;
use diskarb_core::{load_config, UserDirectory, VolumeStatus};
use diskarb_disk::{create_from_volume_path, runtime, Disk};
use diskarb_registry::MemEntry;
use diskarb_report::create_report_bundle;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "diskarb",
    about = "Inspect volumes the way the disk arbitration daemon sees them"
)]
struct Cli {
    /// JSON file with a DiskConfig
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the disk for a mounted volume and print it
    Volume {
        path: PathBuf,
        /// Print the description as JSON
        #[arg(long)]
        json: bool,
        /// Write the serialized description to this file
        #[arg(long)]
        plist: Option<PathBuf>,
        /// Write a report bundle under this directory
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List mounted volumes with their disk ids
    Mounts,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        let config = load_config(path)?;
        runtime::initialize(config)?;
        log::debug!("configuration loaded from {}", path.display());
    }

    let volumes = host_volumes();
    let users = host_users();

    match cli.command {
        Command::Volume {
            path,
            json,
            plist,
            report,
        } => {
            let disk = volume_disk(&path, volumes.as_ref(), users.as_ref())?;
            disk.log();
            print!("{}", render(&disk, json)?);
            if let Some(out) = plist {
                let bytes = disk.serialization()?;
                std::fs::write(&out, &bytes[..])
                    .with_context(|| format!("write {}", out.display()))?;
                log::info!("plist: {}", out.display());
            }
            if let Some(base) = report {
                let summary = disk.log_line();
                let paths =
                    create_report_bundle(base, disk.id(), disk.description(), summary.as_deref())?;
                log::info!("report_root: {}", paths.root.display());
            }
            Ok(())
        }
        Command::Mounts => {
            for mount in volumes.mounts()? {
                println!(
                    "{:<40} {:<10} {:<8} {}",
                    volume_id(&mount),
                    mount.fs_type,
                    if mount.local { "local" } else { "network" },
                    mount.mount_on
                );
            }
            Ok(())
        }
    }
}

/// Standard output for `volume`. The summary line goes through the logger
/// in `Disk::log`, so only the id and the optional JSON are printed here.
fn render(disk: &Disk<MemEntry>, json: bool) -> Result<String> {
    let mut out = format!("{}\n", disk);
    if json {
        out.push_str(&serde_json::to_string_pretty(disk.description())?);
        out.push('\n');
    }
    Ok(out)
}

fn volume_disk(
    path: &Path,
    volumes: &dyn VolumeStatus,
    users: &dyn UserDirectory,
) -> Result<Disk<MemEntry>> {
    create_from_volume_path(path, volumes, users)
        .ok_or_else(|| anyhow!("{} is not a mounted volume", path.display()))
}

fn host_volumes() -> Box<dyn VolumeStatus> {
    #[cfg(target_os = "macos")]
    {
        Box::new(diskarb_host_macos::MacVolumes)
    }
    #[cfg(target_os = "linux")]
    {
        Box::new(diskarb_host_linux::LinuxVolumes)
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        Box::new(diskarb_host_macos::MacVolumes)
    }
}

fn host_users() -> Box<dyn UserDirectory> {
    #[cfg(unix)]
    {
        Box::new(diskarb_core::SystemUsers)
    }
    #[cfg(not(unix))]
    {
        Box::new(Vec::<diskarb_core::UserRecord>::new())
    }
}
