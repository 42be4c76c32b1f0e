use bytesize::ByteSize;
use clap::Parser;
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};
use eyre_pretty::{Context, Result};
use std::path::PathBuf;
use whdslave::Slave;

/// CLI tool to obtain info about a WHDLoad .slave file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the .slave file
    input: PathBuf,
}

fn setup_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or(EnvFilter::new("slaveinfo=info,whdslave=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn memory_size(size: u32) -> String {
    format!("{} ({:#x})", ByteSize(size as u64).display(), size)
}

fn main() -> Result<()> {
    eyre_pretty::install().unwrap();
    setup_tracing();

    let config = Args::parse();

    let slave = Slave::from_path(&config.input).context("reading .slave file")?;
    tracing::debug!(
        "parsed {} header bytes of version {}",
        slave.data_length,
        slave.header.version
    );

    println!(
        " {} ({})    Slave v{}    Entry: 0x{:08X}",
        slave.file_name,
        ByteSize(slave.size).display(),
        slave.header.version,
        slave.header.exec_install,
    );

    let mut properties = Table::new();
    properties
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut row = |label: &str, value: String| {
        if !value.is_empty() {
            properties.add_row(vec![Cell::new(format!("{label}:")), Cell::new(value)]);
        }
    };

    row("Path", slave.path.display().to_string());
    row("File Name", slave.file_name.clone());

    if let Some(name) = &slave.name {
        row("Name", name.clone());
    }
    if let Some(copyright) = &slave.copyright {
        row("Copyright", copyright.clone());
    }
    if let Some(info) = &slave.info {
        row("Info", info.clone());
    }

    if let Some(modified) = slave.modified {
        row("Modified Time", modified.format("%Y-%m-%d %H:%M:%S").to_string());
    }

    row("Base Memory Size", memory_size(slave.header.base_mem_size));
    row(
        "Flags",
        slave
            .flags
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    );
    row("Current Directory", slave.current_dir.clone());
    row("Don't Cache", slave.dont_cache.clone());

    if let Some(keys) = slave.header.keys {
        row("Debug Key", format!("{:02x}", keys.debug));
        row("Exit Key", format!("{:02x}", keys.exit));
    }

    if let Some(exp_mem) = slave.header.exp_mem.filter(|&mem| mem != 0) {
        row("Expansion Memory Size", memory_size(exp_mem));
    }

    row(
        "Kickstarts",
        slave
            .kickstarts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    );

    if let Some(kick) = slave.header.kickstart.filter(|kick| kick.size != 0) {
        row("Kickstart Size", memory_size(kick.size));
    }

    if let Some(directives) = &slave.config {
        row("Config", directives.join("\n"));
    }

    row("SHA1 Hash", slave.hash.to_string());

    println!("{properties}");

    Ok(())
}
