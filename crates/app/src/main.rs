//! Headless vessel simulator
//!
//! Usage: `vessel-sim [SCENARIO] [--log-level LEVEL]`
//!
//! Runs the scenario (or the built-in box route) at the fixed tick rate as
//! fast as possible, logging to stderr and writing one JSON telemetry line
//! per report interval to stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use vessel_sim::{AppError, ScenarioConfig, Simulation};

/// Run a vessel navigation scenario and stream telemetry as JSON lines
#[derive(Parser, Debug)]
#[command(name = "vessel-sim")]
#[command(about = "Run a vessel navigation scenario and stream telemetry as JSON lines")]
struct Args {
    /// Scenario JSON file; the built-in 100 m box route when omitted
    scenario: Option<PathBuf>,

    /// Overrides the scenario's log level (off, error, warn, info, debug, trace)
    #[arg(long, short = 'l')]
    log_level: Option<String>,
}

impl Args {
    fn load_scenario(&self) -> Result<ScenarioConfig, AppError> {
        let mut scenario = match &self.scenario {
            Some(path) => ScenarioConfig::from_path(path)?,
            None => ScenarioConfig::default(),
        };
        if let Some(level) = &self.log_level {
            scenario.log_level = level.clone();
            scenario.validate()?;
        }
        Ok(scenario)
    }
}

fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();

    if TermLogger::init(level, config.clone(), TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        let _ = WriteLogger::init(level, config, io::stderr());
    }
}

fn main() -> Result<(), AppError> {
    let scenario = Args::parse().load_scenario()?;
    init_logging(scenario.level_filter()?);

    info!(
        "Running scenario `{}` for {:.0} s at {} Hz",
        scenario.name, scenario.duration_s, scenario.vessel.ticks_per_second
    );

    let mut sim = Simulation::from_scenario(&scenario)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    sim.run(scenario.total_ticks(), scenario.report_every_ticks(), |telemetry| {
        writeln!(out, "{}", serde_json::to_string(telemetry)?)?;
        Ok(())
    })?;
    out.flush()?;

    let status = sim.navigator().status();
    info!(
        "Finished: {:.1} m travelled, mode {}, {} of {} waypoints reached",
        sim.track().distance_m(),
        status.mode,
        sim.navigator().current_waypoint_index(),
        status.waypoint_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_no_arguments_uses_box_route() {
        let args = Args::try_parse_from(["vessel-sim"]).unwrap();
        assert!(args.scenario.is_none());
        let scenario = args.load_scenario().unwrap();
        assert_eq!(scenario.name, "box");
        assert_eq!(scenario.waypoints.len(), 4);
    }

    #[test]
    fn test_help_is_not_a_scenario_path() {
        let err = Args::try_parse_from(["vessel-sim", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_extra_arguments_rejected() {
        let err = Args::try_parse_from(["vessel-sim", "a.json", "b.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_log_level_override() {
        let args = Args::try_parse_from(["vessel-sim", "--log-level", "debug"]).unwrap();
        let scenario = args.load_scenario().unwrap();
        assert_eq!(scenario.level_filter().unwrap(), LevelFilter::Debug);

        let args = Args::try_parse_from(["vessel-sim", "-l", "chatty"]).unwrap();
        assert!(matches!(args.load_scenario(), Err(AppError::InvalidScenario(_))));
    }

    #[test]
    fn test_missing_scenario_file() {
        let args = Args::try_parse_from(["vessel-sim", "/nonexistent/run.json"]).unwrap();
        assert_eq!(args.scenario, Some(PathBuf::from("/nonexistent/run.json")));
        assert!(matches!(args.load_scenario(), Err(AppError::Io(_))));
    }
}
