//! `adlibs` - CLI for the Ad-Libs dashboard
//!
//! This binary runs the dashboard server and offers offline access to the
//! data generator and the PDF report.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use chrono::Local;

use adlibs::cli::{Cli, Command, ConfigCommand, GenerateCommand, ReportCommand, ServeCommand};
use adlibs::report::{render_report, report_file_name};
use adlibs::{init_logging, CampaignGenerator, Config, Error};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(cmd) => handle_serve(config, &cmd).await,
        Command::Generate(cmd) => handle_generate(&config, &cmd),
        Command::Report(cmd) => handle_report(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    cmd.apply(&mut config);
    config.validate()?;
    adlibs::server::start_server(config, !cmd.no_stream).await?;
    Ok(())
}

fn handle_generate(config: &Config, cmd: &GenerateCommand) -> anyhow::Result<()> {
    let mut generator = CampaignGenerator::new(cmd.seed.or(config.generator.seed));
    let records = generator.generate_batch(cmd.count);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{:<10} {:<13} {:<15} {:<8} {:>11} {:>7} {:>7} {:>10}  {}",
        "Campaign", "Ad Type", "Region", "Device", "Impressions", "Clicks", "CTR", "Revenue",
        "Period"
    );
    for r in &records {
        println!(
            "{:<10} {:<13} {:<15} {:<8} {:>11} {:>7} {:>6.2}% {:>10.2}  {}",
            r.campaign_id,
            r.ad_type,
            r.region,
            r.device,
            r.impressions,
            r.clicks,
            r.ctr,
            r.revenue,
            r.period
        );
    }
    Ok(())
}

fn handle_report(config: &Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    let mut generator = CampaignGenerator::new(cmd.seed.or(config.generator.seed));
    let records = generator.generate_batch(cmd.records);
    let bytes = render_report(&records)?;

    let path = cmd.output.clone().unwrap_or_else(|| {
        report_file_name(&config.report.file_prefix, &Local::now()).into()
    });
    std::fs::write(&path, &bytes).map_err(|source| Error::FileWrite {
        path: path.clone(),
        source,
    })?;

    println!(
        "Wrote report over {} records to {} ({} bytes)",
        records.len(),
        path.display(),
        bytes.len()
    );
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Address:            {}", config.socket_addr());
                println!("  Request timeout:    {}s", config.server.request_timeout_secs);
                println!("  Max sessions:       {}", config.server.max_sessions);
                println!();
                println!("[Generator]");
                println!("  Batch size:         {}", config.generator.batch_size);
                println!("  Interval:           {}s", config.generator.interval_secs);
                match config.generator.seed {
                    Some(seed) => println!("  Seed:               {seed}"),
                    None => println!("  Seed:               (random)"),
                }
                println!();
                println!("[Buffer]");
                println!("  Capacity:           {}", config.buffer.capacity);
                println!();
                println!("[Dashboard]");
                println!("  Title:              {}", config.dashboard.title);
                println!(
                    "  Refresh interval:   {}s",
                    config.dashboard.refresh_interval_secs
                );
                println!("  Default theme:      {}", config.dashboard.default_theme);
                println!();
                println!("[Forecast]");
                println!("  Start date:         {}", config.forecast.start_date);
                println!("  Horizon (days):     {}", config.forecast.horizon_days);
                println!();
                println!("[Report]");
                println!("  File prefix:        {}", config.report.file_prefix);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
