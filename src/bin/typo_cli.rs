use serde::Serialize;
use std::{env, fs};
use tracing_subscriber::EnvFilter;
use typogenetics::{
    Enzyme, Strand, about,
    engine::{Engine, EngineParameters, Operation, ProjectState, TypoEngine, Workflow},
    operate::format_trace,
    replication::{self, Evolution},
};

const DEFAULT_STATE_PATH: &str = ".typo_state.json";
const LOG_ENV: &str = "TYPO_LOG";

#[derive(Serialize)]
struct StrandSummary {
    id: String,
    length: usize,
    enzymes: usize,
    sequence: String,
}

#[derive(Serialize)]
struct StateSummary {
    strand_count: usize,
    strands: Vec<StrandSummary>,
    parameters: EngineParameters,
}

#[derive(Serialize)]
struct FoldSummary {
    enzyme: String,
    first: String,
    last: String,
    preference: String,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  typo_cli --version\n  \
  typo_cli [--state PATH] capabilities\n  \
  typo_cli [--state PATH] state-summary\n  \
  typo_cli [--state PATH] op '<operation-json>'\n  \
  typo_cli [--state PATH] workflow '<workflow-json>'\n  \
  typo_cli enzymes STRAND\n  \
  typo_cli fold ENZYME\n  \
  typo_cli operate ENZYME STRAND [POS] [--trace]\n  \
  typo_cli replicate STRAND GENERATIONS\n\n  \
  Tip: pass @file.json instead of inline JSON; set {LOG_ENV}=debug for logs"
    );
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_json_arg(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).map_err(|e| format!("Could not read JSON file '{path}': {e}"))
    } else {
        Ok(value.to_string())
    }
}

fn load_state(path: &str) -> Result<ProjectState, String> {
    if std::path::Path::new(path).exists() {
        ProjectState::load_from_path(path).map_err(|e| e.to_string())
    } else {
        Ok(ProjectState::default())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn parse_global_state_arg(args: &[String]) -> (String, usize) {
    if args.len() >= 3 && args[1] == "--state" {
        return (args[2].clone(), 3);
    }
    (DEFAULT_STATE_PATH.to_string(), 1)
}

fn summarize_state(engine: &TypoEngine) -> StateSummary {
    let mut strands: Vec<StrandSummary> = engine
        .state()
        .strands
        .iter()
        .map(|(id, strand)| StrandSummary {
            id: id.to_string(),
            length: strand.len(),
            enzymes: strand.enzymes().len(),
            sequence: strand.to_string(),
        })
        .collect();
    strands.sort_by(|a, b| a.id.cmp(&b.id));

    StateSummary {
        strand_count: strands.len(),
        strands,
        parameters: engine.state().parameters.clone(),
    }
}

fn parse_strand(text: &str) -> Result<Strand, String> {
    Strand::from_sequence(text).map_err(|e| format!("Invalid strand '{text}': {e}"))
}

fn parse_enzyme(text: &str) -> Result<Enzyme, String> {
    text.parse()
        .map_err(|e| format!("Invalid enzyme '{text}': {e}"))
}

fn require<'a>(args: &'a [String], idx: usize, what: &str) -> Result<&'a str, String> {
    match args.get(idx) {
        Some(arg) => Ok(arg.as_str()),
        None => {
            usage();
            Err(format!("Missing {what}"))
        }
    }
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err("Missing command".to_string());
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let (state_path, cmd_idx) = parse_global_state_arg(&args);
    let command = require(&args, cmd_idx, "command")?;

    match command {
        "capabilities" => print_json(&TypoEngine::capabilities()),
        "state-summary" => {
            let engine = TypoEngine::from_state(load_state(&state_path)?);
            print_json(&summarize_state(&engine))
        }
        "op" => {
            let json = load_json_arg(require(&args, cmd_idx + 1, "operation JSON")?)?;
            let op: Operation =
                serde_json::from_str(&json).map_err(|e| format!("Invalid operation JSON: {e}"))?;

            let mut engine = TypoEngine::from_state(load_state(&state_path)?);
            let result = engine.apply(op).map_err(|e| e.to_string())?;
            engine
                .state()
                .save_to_path(&state_path)
                .map_err(|e| e.to_string())?;
            print_json(&result)
        }
        "workflow" => {
            let json = load_json_arg(require(&args, cmd_idx + 1, "workflow JSON")?)?;
            let workflow: Workflow =
                serde_json::from_str(&json).map_err(|e| format!("Invalid workflow JSON: {e}"))?;

            let mut engine = TypoEngine::from_state(load_state(&state_path)?);
            let results = engine.apply_workflow(workflow).map_err(|e| e.to_string())?;
            engine
                .state()
                .save_to_path(&state_path)
                .map_err(|e| e.to_string())?;
            print_json(&results)
        }
        "enzymes" => {
            let strand = parse_strand(require(&args, cmd_idx + 1, "strand")?)?;
            for enzyme in strand.enzymes() {
                println!("{enzyme}\t{}", enzyme.preference());
            }
            Ok(())
        }
        "fold" => {
            let enzyme = parse_enzyme(require(&args, cmd_idx + 1, "enzyme")?)?;
            let fold = enzyme.fold();
            print_json(&FoldSummary {
                enzyme: enzyme.to_string(),
                first: fold.first.to_string(),
                last: fold.last.to_string(),
                preference: enzyme.preference().to_string(),
            })
        }
        "operate" => {
            let enzyme = parse_enzyme(require(&args, cmd_idx + 1, "enzyme")?)?;
            let strand = parse_strand(require(&args, cmd_idx + 2, "strand")?)?;
            let with_trace = args.iter().any(|a| a == "--trace");
            let position = args
                .get(cmd_idx + 3)
                .filter(|a| a.as_str() != "--trace")
                .map(|a| {
                    a.parse::<usize>()
                        .map_err(|e| format!("Invalid position '{a}': {e}"))
                })
                .transpose()?;
            let runs = match position {
                Some(position) => vec![replication::run_at(&enzyme, &strand, position, with_trace)],
                None => replication::run_at_binding_sites(&enzyme, &strand, with_trace),
            };
            if runs.is_empty() {
                println!("{enzyme} finds no {} on {strand}", enzyme.preference());
            }
            for run in runs {
                println!("Start at {}:", run.position);
                if with_trace {
                    print!("{}", format_trace(&run.trace));
                }
                let products: Vec<String> = run.products.iter().map(|p| p.to_string()).collect();
                println!("Products: {}\n", products.join(" "));
            }
            Ok(())
        }
        "replicate" => {
            let strand = parse_strand(require(&args, cmd_idx + 1, "strand")?)?;
            let raw = require(&args, cmd_idx + 2, "generation count")?;
            let rounds: usize = raw
                .parse()
                .map_err(|e| format!("Invalid generation count '{raw}': {e}"))?;
            let limit = load_state(&state_path)?.parameters.max_pool_size;
            let evolution = Evolution::grow(vec![strand], rounds, limit).map_err(|e| e.to_string())?;
            for (n, tally) in evolution.tallies().iter().enumerate() {
                println!("Generation {n}:");
                for (strand, count) in tally {
                    println!("  {strand}: {count}");
                }
            }
            Ok(())
        }
        _ => {
            usage();
            Err(format!("Unknown command '{command}'"))
        }
    }
}
