use anyhow::{bail, Result};
use clap::Parser;
use std::io;
use tracing::warn;

use wireless_calc::app;
use wireless_calc::cli::{Cli, Command};
use wireless_calc::client::HttpCalculationClient;
use wireless_calc::config::Settings;
use wireless_calc::controller::UiController;
use wireless_calc::format::format_label;
use wireless_calc::logging;
use wireless_calc::render::ConsoleRenderer;
use wireless_calc::scenario::Scenario;
use wireless_calc::store::{FormStateStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli.global);

    match cli.cmd.unwrap_or(Command::Tui) {
        Command::Tui => {
            logging::init_file(&settings.log_file)?;
            app::run_tui(&settings).await
        }

        Command::Calc { scenario, values } => {
            logging::init_stderr();
            let scenario = Scenario::from_id(&scenario)?;
            let client = HttpCalculationClient::new(&settings.api_base, settings.flavor, settings.timeout)?;

            let mut ctl = UiController::new(
                ConsoleRenderer::new(io::stdout()),
                FormStateStore::new(MemoryStore::new()),
                settings.export_dir.clone(),
            );
            ctl.select(scenario);
            for (name, value) in &values {
                if !ctl.set_field(name, value) {
                    warn!(%scenario, field = %name, "ignoring unknown field");
                }
            }

            ctl.submit_with(&client).await;
            if ctl.last_calculation().is_none() {
                bail!("{} calculation did not succeed", scenario.title());
            }
            Ok(())
        }

        Command::Scenarios => {
            for s in Scenario::ALL {
                println!("{} ({})  {}", s.title(), s.id(), s.endpoint());
                for f in s.fields() {
                    let mark = if f.required { "*" } else { " " };
                    println!("  {mark} {:<28} {}", f.name, format_label(f.name));
                    println!("      {}", f.tooltip);
                }
                println!();
            }
            Ok(())
        }
    }
}
