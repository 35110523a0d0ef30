use std::path::PathBuf;

use anyhow::Context;
use cep_weather_core::{Config, Lookup};
use clap::{Parser, Subcommand};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cep-weather", version, about = "Current temperature for a Brazilian CEP")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Address to listen on, e.g. "127.0.0.1:8080".
        #[arg(long)]
        listen: Option<String>,
    },

    /// Look up one CEP and print the JSON result.
    Lookup {
        /// Eight digits, e.g. 01001000.
        cep: String,
    },

    /// Store the WeatherAPI.com key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;

        match self.command {
            Command::Serve { listen } => {
                if let Some(addr) = listen {
                    config.listen_addr = addr;
                }
                server::serve(&config).await
            }
            Command::Lookup { cep } => {
                let lookup = Lookup::from_config(&config)?;
                match lookup.handle_lookup(&cep).await {
                    Ok(weather) => {
                        println!("{}", serde_json::to_string_pretty(&weather)?);
                        Ok(())
                    }
                    Err(e) => anyhow::bail!("{e} (status {})", e.status_code()),
                }
            }
            Command::Configure => configure(config, self.config),
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        config.apply_env(|k| std::env::var(k).ok())?;
        Ok(config)
    }
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_help_message("Get one at https://www.weatherapi.com/my/")
        .prompt()
        .context("Failed to read API key")?;

    config.set_weather_api_key(api_key.trim().to_string());

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Saved configuration to {}", saved_to.display());
    Ok(())
}
