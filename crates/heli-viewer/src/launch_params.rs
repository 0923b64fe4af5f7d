//! Launch parameter parsing for the viewer.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use std::path::PathBuf;

use heli_sim::SimConfig;

/// Launch parameters for the viewer.
#[derive(Debug, Default, Clone)]
pub struct LaunchParams {
    /// Optional JSON config file overriding the built-in constants.
    pub config: Option<PathBuf>,
    /// Terrain seed override.
    pub seed: Option<u64>,
    /// Start with the simulation paused.
    pub paused: bool,
    /// Start with physics debug rendering enabled.
    pub debug: bool,
    /// Disable terrain shadows.
    pub no_shadows: bool,
}

impl LaunchParams {
    /// Build the simulation config: the file (if any) first, then the
    /// command-line overrides on top.
    ///
    /// A config file that cannot be read or parsed is logged and the
    /// built-in defaults are used instead.
    pub fn resolve_config(&self) -> SimConfig {
        let mut config = self
            .config
            .as_ref()
            .and_then(|path| match std::fs::read_to_string(path) {
                Ok(json) => match SimConfig::from_json_str(&json) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        Some(config)
                    }
                    Err(e) => {
                        tracing::error!("{}: {e}; using defaults", path.display());
                        None
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read {}: {e}; using defaults", path.display());
                    None
                }
            })
            .unwrap_or_default();

        self.apply_overrides(&mut config);
        config
    }

    fn apply_overrides(&self, config: &mut SimConfig) {
        if let Some(seed) = self.seed {
            config.terrain.seed = seed;
        }
        if self.no_shadows {
            config.terrain.enable_shadows = false;
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(about = "Interactive helicopter flight demo")]
    struct CliArgs {
        /// JSON config file; omitted fields keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Terrain generation seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Start with the simulation paused (P to resume).
        #[arg(long)]
        paused: bool,

        /// Start with physics debug rendering enabled (F1 to toggle).
        #[arg(long)]
        debug: bool,

        /// Disable terrain shadows.
        #[arg(long)]
        no_shadows: bool,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        LaunchParams {
            config: args.config,
            seed: args.seed,
            paused: args.paused,
            debug: args.debug,
            no_shadows: args.no_shadows,
        }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
