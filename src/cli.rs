use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::client::ApiFlavor;
use crate::defaults::Defaults;

/// Wireless calculator: forms for the calculation service, in your terminal
#[derive(Parser, Debug)]
#[command(version, about = "Wireless communications calculator client")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Base URL of the calculation service
    #[arg(long, global = true, env = "WIRELESS_CALC_API_BASE", default_value = Defaults::API_BASE_URL)]
    pub api_base: String,

    /// Wire contract spoken by the service
    #[arg(long, global = true, value_enum, default_value_t = ApiFlavor::Routes)]
    pub flavor: ApiFlavor,

    /// Where saved form values (and the TUI log) live
    #[arg(long, global = true, default_value = Defaults::STATE_DIR)]
    pub state_dir: PathBuf,

    /// Where Ctrl+E exports are written
    #[arg(long, global = true, default_value = Defaults::EXPORT_DIR)]
    pub export_dir: PathBuf,

    /// Request timeout in seconds (default: transport default)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log file for the interactive UI (default: <state-dir>/wireless-calc.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive tabbed calculator (default)
    Tui,

    /// Run one calculation and print the results
    Calc {
        /// Scenario id (wireless-comm, ofdm, link-budget, cellular)
        #[arg(long)]
        scenario: String,

        /// Field value, repeatable: --set distance_km=1.5
        #[arg(long = "set", value_parser = parse_key_val)]
        values: Vec<(String, String)>,
    },

    /// List scenarios and their fields
    Scenarios,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    Ok((k.trim().to_string(), v.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calc_collects_repeated_sets() {
        let cli = Cli::try_parse_from([
            "wireless-calc",
            "--flavor",
            "unified",
            "calc",
            "--scenario",
            "link-budget",
            "--set",
            "distance_km=1.5",
            "--set",
            "frequency_mhz = 2400",
        ])
        .unwrap();
        assert_eq!(cli.global.flavor, ApiFlavor::Unified);
        match cli.cmd {
            Some(Command::Calc { scenario, values }) => {
                assert_eq!(scenario, "link-budget");
                assert_eq!(
                    values,
                    vec![
                        ("distance_km".to_string(), "1.5".to_string()),
                        ("frequency_mhz".to_string(), "2400".to_string()),
                    ]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_set_is_a_usage_error() {
        assert!(Cli::try_parse_from(["wireless-calc", "calc", "--scenario", "ofdm", "--set", "oops"]).is_err());
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["wireless-calc"]).unwrap();
        assert!(cli.cmd.is_none());
        assert_eq!(cli.global.api_base, Defaults::API_BASE_URL);
    }
}
