//! Command-line configuration for the `qteleport` binary.

use crate::core::errors::ConfigError;
use crate::protocols::Preparation;

/// Seed used when `--seed` is absent.
pub const SEED_ENV: &str = "QTELEPORT_SEED";
pub const DEFAULT_SHOTS: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub shots: usize,
    pub seed: Option<u64>,
    pub preparation: Preparation,
    /// Undo the preparation on Bob's qubit before measuring it.
    pub verify: bool,
    pub draw: bool,
    pub histogram: bool,
    pub json: bool,
    pub help: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            seed: None,
            preparation: Preparation::default(),
            verify: false,
            draw: true,
            histogram: false,
            json: false,
            help: false,
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

impl RunConfig {
    /// Parses arguments (program name excluded). `env_seed` is the value of
    /// [`SEED_ENV`], consulted only when no `--seed` flag is given.
    pub fn from_args<I, S>(args: I, env_seed: Option<&str>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = RunConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let mut value_for = |flag: &str| {
                args.next()
                    .map(|v| v.as_ref().to_string())
                    .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
            };
            match arg {
                "--shots" | "-s" => config.shots = parse_number(arg, &value_for(arg)?)?,
                "--seed" => config.seed = Some(parse_number(arg, &value_for(arg)?)?),
                "--state" => config.preparation = value_for(arg)?.parse()?,
                "--verify" => config.verify = true,
                "--no-draw" => config.draw = false,
                "--histogram" => config.histogram = true,
                "--json" => config.json = true,
                "--help" | "-h" => config.help = true,
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }

        if let (None, Some(raw)) = (config.seed, env_seed) {
            config.seed = Some(parse_number(SEED_ENV, raw)?);
        }

        if config.shots == 0 {
            return Err(ConfigError::NoShots);
        }
        Ok(config)
    }

    /// Reads the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_seed = std::env::var(SEED_ENV).ok();
        Self::from_args(std::env::args().skip(1), env_seed.as_deref())
    }
}

pub fn usage() -> String {
    format!(
        "Usage: qteleport [OPTIONS]\n\n\
         Options:\n  \
         -s, --shots <N>    Number of shots (default {DEFAULT_SHOTS})\n  \
         --seed <N>         Seed the simulator (or set {SEED_ENV})\n  \
         --state <NAME>     zero, one, plus, minus, plus-i (default), minus-i\n  \
         --verify           Undo the preparation on Bob's qubit before measuring\n  \
         --no-draw          Do not print the circuit diagram\n  \
         --histogram        Print a histogram of the counts\n  \
         --json             Print counts as JSON\n  \
         -h, --help         Show this message\n"
    )
}
