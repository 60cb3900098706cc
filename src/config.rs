//! Runtime settings resolved from CLI flags, env and `Defaults`.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::GlobalOpts;
use crate::client::ApiFlavor;
use crate::defaults::Defaults;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base: String,
    pub flavor: ApiFlavor,
    pub state_dir: PathBuf,
    pub export_dir: PathBuf,
    pub timeout: Option<Duration>,
    pub log_file: PathBuf,
}

impl Settings {
    pub fn from_cli(opts: &GlobalOpts) -> Self {
        let log_file = opts
            .log_file
            .clone()
            .unwrap_or_else(|| opts.state_dir.join(Defaults::LOG_FILE_NAME));
        Self {
            api_base: opts.api_base.trim().to_string(),
            flavor: opts.flavor,
            state_dir: opts.state_dir.clone(),
            export_dir: opts.export_dir.clone(),
            // 0 means "no override"
            timeout: opts.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
            log_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn log_file_defaults_into_state_dir() {
        let cli = Cli::try_parse_from(["wireless-calc", "--state-dir", "/tmp/wc"]).unwrap();
        let s = Settings::from_cli(&cli.global);
        assert_eq!(s.log_file, PathBuf::from("/tmp/wc/wireless-calc.log"));
        assert_eq!(s.timeout, None);
    }

    #[test]
    fn timeout_override() {
        let cli = Cli::try_parse_from(["wireless-calc", "--timeout-secs", "30", "scenarios"]).unwrap();
        assert_eq!(Settings::from_cli(&cli.global).timeout, Some(Duration::from_secs(30)));
    }
}
