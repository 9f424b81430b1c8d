use anyhow::{Context, Result};
use qteleport::config::{RunConfig, usage};
use qteleport::protocols::TeleportCircuit;
use qteleport::{Histogram, Simulator, TeleportReport, logging};
use tracing::{info, warn};

/// Agreement required between observed and expected frequencies.
const TOLERANCE: f64 = 0.05;

fn main() -> Result<()> {
    let config = RunConfig::from_env().context("invalid arguments")?;
    if config.help {
        print!("{}", usage());
        return Ok(());
    }
    logging::init(logging::DEFAULT_DIRECTIVE);
    info!(?config, "starting");

    let protocol =
        TeleportCircuit::build(config.preparation).context("building teleportation circuit")?;
    if config.draw {
        println!("{}", protocol.circuit);
    }
    let circuit = protocol
        .finish(config.verify)
        .context("adding Bob's measurement")?;

    let mut simulator = Simulator::new();
    if let Some(seed) = config.seed {
        simulator = simulator.with_seed(seed);
    }
    let counts = simulator
        .run(&circuit, config.shots)
        .context("simulating teleportation circuit")?;

    if config.json {
        println!("{}", serde_json::to_string(&counts)?);
    } else {
        println!("The counts for circuit teleport are: {counts}");
    }
    if config.histogram {
        print!("{}", Histogram::new(&counts));
    }

    let report = TeleportReport::from_counts(&counts);
    if report.is_consistent(config.preparation, config.verify, TOLERANCE) {
        info!(%report, "teleportation statistics consistent");
    } else {
        warn!(
            %report,
            expected_bob_one = TeleportReport::expected_bob_one(config.preparation, config.verify),
            "teleportation statistics outside tolerance"
        );
    }
    Ok(())
}
