use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum UpdateMode {
    Download,
    Check,
    Skip,
}

impl UpdateMode {
    /// Maps a persisted `autoUpdate` value; unknown values fall back to
    /// downloading, matching the store default.
    pub(crate) fn from_config(raw: &str) -> Self {
        match raw {
            "check" => Self::Check,
            "skip" => Self::Skip,
            _ => Self::Download,
        }
    }
}

#[derive(Debug, Clone, Parser, Default)]
#[command(name = "idkr", about = "Krunker.io desktop shell", version)]
pub(crate) struct CliArgs {
    /// Open devtools on every window.
    #[arg(long)]
    pub(crate) debug: bool,

    /// Override the configured auto-update mode.
    #[arg(long, value_enum, value_name = "MODE")]
    pub(crate) update: Option<UpdateMode>,

    /// Open an extra window at the given URL.
    #[arg(long = "new-window", value_name = "URL")]
    pub(crate) new_window: Option<String>,
}

impl CliArgs {
    /// Parses a second-instance argv as forwarded by the single-instance
    /// plugin. A malformed argv yields the defaults rather than an error so
    /// a stray flag cannot wedge the running instance.
    pub(crate) fn from_forwarded(argv: &[String]) -> Self {
        Self::try_parse_from(argv).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_launch_flags() {
        let args = CliArgs::try_parse_from([
            "idkr",
            "--debug",
            "--update",
            "check",
            "--new-window",
            "https://krunker.io/social.html",
        ])
        .expect("flags should parse");
        assert!(args.debug);
        assert_eq!(args.update, Some(UpdateMode::Check));
        assert_eq!(
            args.new_window.as_deref(),
            Some("https://krunker.io/social.html")
        );
    }

    #[test]
    fn forwarded_argv_with_unknown_flag_falls_back_to_defaults() {
        let argv = vec!["idkr".to_string(), "--definitely-not-a-flag".to_string()];
        let args = CliArgs::from_forwarded(&argv);
        assert!(!args.debug);
        assert!(args.new_window.is_none());
    }

    #[test]
    fn forwarded_argv_carries_new_window() {
        let argv = vec![
            "idkr".to_string(),
            "--new-window=https://krunker.io/".to_string(),
        ];
        let args = CliArgs::from_forwarded(&argv);
        assert_eq!(args.new_window.as_deref(), Some("https://krunker.io/"));
    }

    #[test]
    fn update_mode_from_config_falls_back_to_download() {
        assert_eq!(UpdateMode::from_config("check"), UpdateMode::Check);
        assert_eq!(UpdateMode::from_config("skip"), UpdateMode::Skip);
        assert_eq!(UpdateMode::from_config("banana"), UpdateMode::Download);
        assert_eq!(UpdateMode::from_config(""), UpdateMode::Download);
    }
}
