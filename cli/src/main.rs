// Seat inventory experiment runner
// Usage: seat-sim [CONFIG.json] [REPLICATIONS] [--seed N] [--handoff]
//                 [--resume HANDOFF.json [--experiment ID]]

use seat_simulator_core_rs::{Experiment, ReplicationHandoff, SimulationConfig};
use std::process::ExitCode;
use uuid::Uuid;

const DEFAULT_REPLICATIONS: usize = 100;
const USAGE: &str = "usage: seat-sim [CONFIG.json] [REPLICATIONS] [--seed N] [--handoff] \
                     [--resume HANDOFF.json [--experiment ID]]";

#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<String>,
    replications: usize,
    seed: Option<u64>,
    handoff: bool,
    resume_path: Option<String>,
    experiment: Option<Uuid>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        replications: DEFAULT_REPLICATIONS,
        ..CliArgs::default()
    };

    let mut positional = 0;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let value = args.get(i).ok_or("--seed needs a value")?;
                cli.seed = Some(value.parse().map_err(|_| format!("Invalid seed: {}", value))?);
            }
            "--handoff" => {
                cli.handoff = true;
            }
            "--resume" => {
                i += 1;
                let path = args.get(i).ok_or("--resume needs a file")?;
                cli.resume_path = Some(path.clone());
            }
            "--experiment" => {
                i += 1;
                let value = args.get(i).ok_or("--experiment needs an id")?;
                cli.experiment = Some(
                    Uuid::parse_str(value).map_err(|_| format!("Invalid experiment id: {}", value))?,
                );
            }
            arg if !arg.starts_with('-') => {
                match positional {
                    0 => cli.config_path = Some(arg.to_string()),
                    1 => {
                        cli.replications = arg
                            .parse()
                            .map_err(|_| format!("Invalid replication count: {}", arg))?
                    }
                    _ => return Err(format!("Unexpected argument: {}", arg)),
                }
                positional += 1;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }
    if cli.experiment.is_some() && cli.resume_path.is_none() {
        return Err("--experiment only applies with --resume".to_string());
    }
    Ok(cli)
}

fn load_config(cli: &CliArgs) -> Result<SimulationConfig, String> {
    let config = match &cli.config_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read {}: {}", path, e))?;
            SimulationConfig::from_json(&json).map_err(|e| e.to_string())?
        }
        None => SimulationConfig::reference(),
    };
    // Long experiments do not need per-event logs
    let config = config.with_record_events(false);
    Ok(match cli.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Accepts a bare hand-off or the report printed by `--handoff`.
fn parse_handoff(json: &str) -> Result<ReplicationHandoff, String> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let payload = match value.get("handoff") {
        Some(inner) => inner.to_string(),
        None => json.to_string(),
    };
    ReplicationHandoff::from_json(&payload).map_err(|e| e.to_string())
}

fn start(cli: &CliArgs, config: SimulationConfig) -> Result<Experiment, String> {
    let Some(path) = &cli.resume_path else {
        return Experiment::new(config).map_err(|e| e.to_string());
    };
    let json =
        std::fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {}", path, e))?;
    let handoff = parse_handoff(&json)?;
    let experiment_id = cli.experiment.unwrap_or(handoff.experiment_id);
    Experiment::resume(config, &handoff, experiment_id).map_err(|e| e.to_string())
}

fn run(cli: &CliArgs) -> Result<String, String> {
    let config = load_config(cli)?;
    let mut experiment = start(cli, config)?;
    let summary = experiment
        .run(cli.replications)
        .map_err(|e| e.to_string())?;

    if cli.handoff {
        let report = serde_json::json!({
            "summary": summary,
            "handoff": experiment.handoff(),
        });
        serde_json::to_string_pretty(&report).map_err(|e| e.to_string())
    } else {
        summary.to_json().map_err(|e| e.to_string())
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = parse_args(&args).and_then(|cli| run(&cli));
    match outcome {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("seat-sim: {}", msg);
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("seat-sim-{}-{}", Uuid::new_v4(), name));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_parse_resume_flags() {
        let id = Uuid::new_v4();
        let cli = parse_args(&args(&[
            "cfg.json",
            "4",
            "--resume",
            "h.json",
            "--experiment",
            &id.to_string(),
        ]))
        .unwrap();
        assert_eq!(cli.resume_path.as_deref(), Some("h.json"));
        assert_eq!(cli.experiment, Some(id));
        assert_eq!(cli.replications, 4);
    }

    #[test]
    fn test_experiment_without_resume_rejected() {
        let id = Uuid::new_v4().to_string();
        let result = parse_args(&args(&["--experiment", &id]));
        assert!(result.is_err());
    }

    #[test]
    fn test_resume_continues_cli_report() {
        let straight_cli = CliArgs {
            replications: 4,
            ..CliArgs::default()
        };
        let config = load_config(&straight_cli).unwrap();
        let mut straight = Experiment::new(config.clone()).unwrap();
        straight.run(4).unwrap();

        let first_cli = CliArgs {
            replications: 2,
            handoff: true,
            ..CliArgs::default()
        };
        let report = run(&first_cli).unwrap();
        let path = write_temp("report.json", &report);

        let second_cli = CliArgs {
            replications: 2,
            resume_path: Some(path.clone()),
            ..CliArgs::default()
        };
        let mut second = start(&second_cli, config).unwrap();
        second.run(2).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(second.results()[0].index, 2);
        assert_eq!(&straight.results()[2..], second.results());
    }

    #[test]
    fn test_resume_rejects_wrong_experiment() {
        let mut first = Experiment::new(SimulationConfig::reference()).unwrap();
        first.run(1).unwrap();
        let payload = first.handoff().to_json().unwrap();
        let path = write_temp("handoff.json", &payload);

        let cli = CliArgs {
            replications: 1,
            resume_path: Some(path.clone()),
            experiment: Some(Uuid::new_v4()),
            ..CliArgs::default()
        };
        let config = load_config(&cli).unwrap();
        let result = start(&cli, config);
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }
}
