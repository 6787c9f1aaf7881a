use anyhow::bail;
use clap::{Parser, ValueEnum};
use lojistas_client::DEFAULT_SERPAPI_URL;
use lojistas_core::LinkMode;

/// Gateway configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "lojistas-gateway")]
#[command(
    author,
    version,
    about = "HTTP gateway that searches Google Shopping and groups listings by seller"
)]
#[command(after_help = "Environment:
  SERPAPI_KEY=...  lojistas-gateway
  PORT=8080 SERPAPI_KEY=...  lojistas-gateway
  LINK_MODE=verbatim SERPAPI_KEY=...  lojistas-gateway")]
pub struct Config {
    /// SerpAPI key used for every shopping search
    #[arg(long, env = "SERPAPI_KEY", hide_env_values = true)]
    pub serpapi_key: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SerpAPI base URL
    #[arg(long, env = "SERPAPI_URL", default_value = DEFAULT_SERPAPI_URL)]
    pub serpapi_url: String,

    /// How seller links are stored: site origin or the listing URL as sent
    #[arg(long, env = "LINK_MODE", default_value = "origin")]
    pub link_mode: LinkModeArg,
}

/// Command-line form of [`LinkMode`]
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LinkModeArg {
    /// Scheme, host and port only
    Origin,
    /// Listing URL unchanged
    Verbatim,
}

impl From<LinkModeArg> for LinkMode {
    fn from(arg: LinkModeArg) -> Self {
        match arg {
            LinkModeArg::Origin => LinkMode::Origin,
            LinkModeArg::Verbatim => LinkMode::Verbatim,
        }
    }
}

impl Config {
    /// Startup check: the API key must be non-blank.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.serpapi_key.trim().is_empty() {
            bail!(
                "SERPAPI_KEY is empty.\n   Create a .env file with your SerpAPI key:\n   SERPAPI_KEY=your_key_here"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["lojistas-gateway", "--serpapi-key", "abc"]).unwrap();
        assert_eq!(config.serpapi_key, "abc");
        assert_eq!(config.serpapi_url, "https://serpapi.com");
        assert_eq!(LinkMode::from(config.link_mode), LinkMode::Origin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_key_rejected() {
        let config = Config::try_parse_from(["lojistas-gateway", "--serpapi-key", "  "]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SERPAPI_KEY"));
    }

    #[test]
    fn test_port_override() {
        let config = Config::try_parse_from([
            "lojistas-gateway",
            "--serpapi-key",
            "abc",
            "--port",
            "8080",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_link_mode_flag() {
        let config = Config::try_parse_from([
            "lojistas-gateway",
            "--serpapi-key",
            "abc",
            "--link-mode",
            "verbatim",
        ])
        .unwrap();
        assert_eq!(LinkMode::from(config.link_mode), LinkMode::Verbatim);

        let bad = Config::try_parse_from([
            "lojistas-gateway",
            "--serpapi-key",
            "abc",
            "--link-mode",
            "path",
        ]);
        assert!(bad.is_err());
    }
}
