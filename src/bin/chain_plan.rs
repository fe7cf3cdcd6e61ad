use std::env;

use chain_dp::{validate, ChainPlan, ChainPlanner, FillStep, Preset, Table};
use serde::Serialize;

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("chain_plan: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    #[cfg(feature = "tracing")]
    init_tracing();

    let dims = match &options.source {
        Source::Preset(preset) => preset.dims(),
        Source::Tokens(tokens) => match validate(tokens) {
            Ok(dims) => dims,
            Err(err) => {
                eprintln!("chain_plan: invalid dimensions: {err}");
                std::process::exit(2);
            }
        },
    };

    let planner = ChainPlanner::new();
    let (plan, steps) = if options.steps {
        let (plan, steps) = planner.plan_traced(&dims);
        (plan, Some(steps))
    } else {
        (planner.plan_dims(&dims), None)
    };

    if let Err(err) = options.format.write(&plan, steps.as_deref()) {
        eprintln!("chain_plan output error: {err}");
        std::process::exit(1);
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chain_dp=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

enum Source {
    Preset(Preset),
    Tokens(Vec<String>),
}

struct Options {
    source: Source,
    steps: bool,
    format: OutputFormat,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut preset = None;
        let mut tokens: Vec<String> = Vec::new();
        let mut steps = false;
        let mut format = OutputFormat::Text;

        while let Some(arg) = args.next() {
            let arg: String = arg.into();
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            } else if arg == "--steps" {
                steps = true;
            } else if let Some(value) = arg.strip_prefix("--format=") {
                format = OutputFormat::from_str(value)?;
            } else if arg == "--format" {
                let value: String = args
                    .next()
                    .ok_or_else(|| "missing value after --format".to_string())?
                    .into();
                format = OutputFormat::from_str(&value)?;
            } else if let Some(value) = arg.strip_prefix("--preset=") {
                preset = Some(value.parse::<Preset>()?);
            } else if arg == "--preset" {
                let value: String = args
                    .next()
                    .ok_or_else(|| "missing value after --preset".to_string())?
                    .into();
                preset = Some(value.parse::<Preset>()?);
            } else if arg.starts_with("--") {
                return Err(format!("unrecognized argument '{arg}'"));
            } else {
                tokens.extend(arg.split(',').map(str::to_string));
            }
        }

        let source = match (preset, tokens.is_empty()) {
            (Some(_), false) => {
                return Err("give either --preset or dimensions, not both".to_string())
            }
            (Some(p), true) => Source::Preset(p),
            (None, false) => Source::Tokens(tokens),
            (None, true) => return Err("no dimensions given".to_string()),
        };

        Ok(Self {
            source,
            steps,
            format,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: chain_plan [options] <dims>...

Dimensions are positive integers, comma- or space-separated:
n matrices need n+1 dimensions (A1 is d0 x d1, A2 is d1 x d2, ...).

Options:
  --preset <simple|medium|complex>   Use a built-in example chain
  --steps                            Also print the table fill trace
  --format <text|csv|json>           Output format (default: text)
  -h, --help                         Print this help message

Examples:
  chain_plan 10,20,30,40
  chain_plan --preset complex --steps
  chain_plan 10 30 5 60 --format json
"
        );
    }
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, plan: &ChainPlan, steps: Option<&[FillStep]>) -> Result<(), String> {
        match self {
            OutputFormat::Text => write_text(plan, steps),
            OutputFormat::Csv => write_csv(plan, steps),
            OutputFormat::Json => write_json(plan, steps),
        }
    }
}

fn write_text(plan: &ChainPlan, steps: Option<&[FillStep]>) -> Result<(), String> {
    println!("Matrices:");
    for m in &plan.matrices {
        println!("  {m}");
    }

    if let Some(steps) = steps {
        println!();
        println!("Fill order ({} steps):", steps.len());
        for (idx, step) in steps.iter().enumerate() {
            println!("[{}/{}] {step}", idx + 1, steps.len());
        }
    }

    println!();
    println!("Cost table:");
    print_table(&plan.cost);
    println!();
    println!("Split table:");
    print_table(&plan.split);
    println!();
    println!("Minimum scalar multiplications: {}", plan.min_cost());
    println!("Optimal parenthesization: {}", plan.expression());
    Ok(())
}

fn print_table<T: Copy + ToString>(table: &Table<T>) {
    let cells: Vec<Vec<String>> = table
        .rows()
        .map(|row| {
            row.iter()
                .map(|c| c.map_or_else(|| "-".to_string(), |v| v.to_string()))
                .collect()
        })
        .collect();
    let width = cells
        .iter()
        .flatten()
        .map(String::len)
        .max()
        .unwrap_or(1)
        .max(table.dim().to_string().len());

    let header: Vec<String> = (0..table.dim())
        .map(|j| format!("{:>width$}", j, width = width))
        .collect();
    println!("  {:>width$} | {}", "", header.join(" "), width = width);
    for (i, row) in cells.iter().enumerate() {
        let row: Vec<String> = row
            .iter()
            .map(|c| format!("{:>width$}", c, width = width))
            .collect();
        println!("  {:>width$} | {}", i, row.join(" "), width = width);
    }
}

fn write_csv(plan: &ChainPlan, steps: Option<&[FillStep]>) -> Result<(), String> {
    match steps {
        Some(steps) => {
            println!("i,j,k,left_cost,right_cost,pair_cost,total_cost,chosen");
            for step in steps {
                for c in &step.candidates {
                    println!(
                        "{},{},{},{},{},{},{},{}",
                        step.i,
                        step.j,
                        c.k,
                        c.left_cost,
                        c.right_cost,
                        c.pair_cost,
                        c.total_cost,
                        c.k == step.chosen_k
                    );
                }
            }
        }
        None => {
            println!("i,j,cost,split");
            let n = plan.num_matrices();
            for i in 0..n {
                for j in i..n {
                    println!(
                        "{},{},{},{}",
                        i,
                        j,
                        plan.cost.get(i, j).map(|v| v.to_string()).unwrap_or_default(),
                        plan.split.get(i, j).map(|v| v.to_string()).unwrap_or_default()
                    );
                }
            }
        }
    }
    Ok(())
}

// Serialized directly: costs above u64 do not fit a `serde_json::Value`.
#[derive(Serialize)]
struct JsonReport<'a> {
    plan: &'a ChainPlan,
    steps: Option<&'a [FillStep]>,
}

fn write_json(plan: &ChainPlan, steps: Option<&[FillStep]>) -> Result<(), String> {
    let text = serde_json::to_string_pretty(&JsonReport { plan, steps })
        .map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}
