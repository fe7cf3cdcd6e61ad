use std::collections::BTreeMap;
use std::env;
use std::time::Instant;

use chain_dp::{enumerate_steps, ChainPlanner, Cost, DimensionSequence};
use serde::Serialize;
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

const CHAIN_LENGTHS: &[usize] = &[8, 16, 32, 64, 128, 256, 384, 512];

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("scale_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("chain-dp Scaling Probe");
    eprintln!("{}", "=".repeat(80));
    eprintln!();
    eprintln!("Plans matrix chains of increasing length and checks:");
    eprintln!(
        "  • Correctness: planner, fill trace and a top-down baseline agree (up to {} matrices)",
        options.verify_limit
    );
    eprintln!("  • Performance: wall-clock time and RSS delta per chain length");
    eprintln!();
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut sys = System::new();
    let mut measurements = Vec::new();

    eprintln!("[1/3] Planning (cost + split tables, reconstruction)...");
    measurements.extend(run_plan(&options, &mut sys));
    eprintln!();

    eprintln!("[2/3] Enumerating fill steps...");
    measurements.extend(run_steps(&options, &mut sys));
    eprintln!();

    eprintln!("[3/3] Traced planning (one pass for plan and trace)...");
    measurements.extend(run_traced(&options, &mut sys));
    eprintln!();

    print_summary(&measurements, &options);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("scale_probe output error: {err}");
        std::process::exit(1);
    }
}

struct Options {
    format: OutputFormat,
    verify_limit: usize,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Csv;
        let mut verify_limit = 128usize;

        while let Some(arg) = args.next() {
            let arg: String = arg.into();
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            } else if let Some(value) = arg.strip_prefix("--format=") {
                format = OutputFormat::from_str(value)?;
            } else if arg == "--format" {
                let value: String = args
                    .next()
                    .ok_or_else(|| "missing value after --format".to_string())?
                    .into();
                format = OutputFormat::from_str(&value)?;
            } else if let Some(value) = arg.strip_prefix("--verify-limit=") {
                verify_limit = parse_limit(value)?;
            } else if arg == "--verify-limit" {
                let value: String = args
                    .next()
                    .ok_or_else(|| "missing value after --verify-limit".to_string())?
                    .into();
                verify_limit = parse_limit(&value)?;
            } else {
                return Err(format!("unrecognized argument '{arg}'"));
            }
        }

        Ok(Self {
            format,
            verify_limit,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --bin scale_probe [-- <options>]

Options:
  --format <csv|table|json>     Output format (default: csv)
  --verify-limit <N>            Largest chain (in matrices) checked against the baseline (default: 128)
  -h, --help                    Print this help message

Examples:
  cargo run --release --bin scale_probe
  cargo run --release --bin scale_probe -- --format table --verify-limit 64
"
        );
    }
}

fn parse_limit(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| "verify limit must be a positive integer".to_string())
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

#[derive(Clone, Serialize)]
struct Measurement {
    scenario: &'static str,
    matrices: usize,
    wall_s: f64,
    rss_delta_kib: u64,
    min_cost: Cost,
    verification: VerificationStatus,
    detail: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum VerificationStatus {
    NotChecked,
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotChecked => "not_checked",
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            VerificationStatus::Passed => "✓",
            VerificationStatus::Failed => "✗",
            VerificationStatus::NotChecked => "○",
        }
    }
}

struct Outcome {
    min_cost: Cost,
    status: VerificationStatus,
    detail: Option<String>,
}

fn run_plan(options: &Options, sys: &mut System) -> Vec<Measurement> {
    let planner = ChainPlanner::new();
    run_scenario("plan", sys, |n| {
        let dims = deterministic_dims(n);
        let plan = planner.plan_dims(&dims);
        let (status, detail) = if n <= options.verify_limit {
            compare("baseline", top_down_min_cost(&dims), plan.min_cost())
        } else {
            (VerificationStatus::NotChecked, None)
        };
        Outcome {
            min_cost: plan.min_cost(),
            status,
            detail,
        }
    })
}

fn run_steps(options: &Options, sys: &mut System) -> Vec<Measurement> {
    let planner = ChainPlanner::new();
    run_scenario("enumerate_steps", sys, |n| {
        let dims = deterministic_dims(n);
        let mut steps = enumerate_steps(&dims);
        let mut candidates = 0usize;
        for step in steps.by_ref() {
            candidates += step.candidates.len();
        }
        let cost = steps.into_cost_table();
        let min_cost = cost.get(0, n - 1).unwrap_or(0);

        let (status, detail) = if n <= options.verify_limit {
            let plan = planner.plan_dims(&dims);
            let expected_candidates = (n * n * n - n) / 6;
            if cost != plan.cost {
                (
                    VerificationStatus::Failed,
                    Some("fill trace table differs from planner table".to_string()),
                )
            } else if candidates != expected_candidates {
                (
                    VerificationStatus::Failed,
                    Some(format!(
                        "expected {expected_candidates} candidates, got {candidates}"
                    )),
                )
            } else {
                (VerificationStatus::Passed, None)
            }
        } else {
            (VerificationStatus::NotChecked, None)
        };
        Outcome {
            min_cost,
            status,
            detail,
        }
    })
}

fn run_traced(options: &Options, sys: &mut System) -> Vec<Measurement> {
    let planner = ChainPlanner::new();
    run_scenario("plan_traced", sys, |n| {
        let dims = deterministic_dims(n);
        let (plan, steps) = planner.plan_traced(&dims);
        let (status, detail) = if n <= options.verify_limit {
            let plain = planner.plan_dims(&dims);
            if plain != plan {
                (
                    VerificationStatus::Failed,
                    Some("traced plan differs from plain plan".to_string()),
                )
            } else if steps.len() != n * (n - 1) / 2 {
                (
                    VerificationStatus::Failed,
                    Some(format!("unexpected step count {}", steps.len())),
                )
            } else {
                (VerificationStatus::Passed, None)
            }
        } else {
            (VerificationStatus::NotChecked, None)
        };
        Outcome {
            min_cost: plan.min_cost(),
            status,
            detail,
        }
    })
}

fn run_scenario<F>(scenario: &'static str, sys: &mut System, mut run: F) -> Vec<Measurement>
where
    F: FnMut(usize) -> Outcome,
{
    let total = CHAIN_LENGTHS.len();
    CHAIN_LENGTHS
        .iter()
        .enumerate()
        .map(|(idx, &n)| {
            eprint!("      [{}/{}] {} matrices... ", idx + 1, total, n);
            let m = measure(scenario, n, sys, || run(n));
            eprintln!(
                "{} min_cost={}, time={:.3}s, status={}",
                m.verification.icon(),
                m.min_cost,
                m.wall_s,
                m.verification.label()
            );
            m
        })
        .collect()
}

fn compare(what: &str, expected: Cost, got: Cost) -> (VerificationStatus, Option<String>) {
    if expected == got {
        (VerificationStatus::Passed, None)
    } else {
        (
            VerificationStatus::Failed,
            Some(format!("{what}: expected {expected}, got {got}")),
        )
    }
}

fn print_summary(measurements: &[Measurement], options: &Options) {
    eprintln!("\n{}", "=".repeat(80));
    eprintln!("Summary");
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let count = |status: VerificationStatus| {
        measurements
            .iter()
            .filter(|m| m.verification == status)
            .count()
    };
    let passed = count(VerificationStatus::Passed);
    let failed = count(VerificationStatus::Failed);
    let not_checked = count(VerificationStatus::NotChecked);
    let total = measurements.len().max(1) as f64;

    eprintln!("Verification Results:");
    eprintln!("  Total runs: {}", measurements.len());
    eprintln!("  ✓ Passed: {} ({:.1}%)", passed, 100.0 * passed as f64 / total);
    eprintln!("  ✗ Failed: {} ({:.1}%)", failed, 100.0 * failed as f64 / total);
    eprintln!(
        "  ○ Not checked (> {} matrices): {} ({:.1}%)",
        options.verify_limit,
        not_checked,
        100.0 * not_checked as f64 / total
    );
    eprintln!();

    if failed > 0 {
        eprintln!("Failed Runs:");
        for m in measurements {
            if m.verification == VerificationStatus::Failed {
                eprintln!("  ✗ {} (n={})", m.scenario, m.matrices);
                if let Some(ref detail) = m.detail {
                    eprintln!("     Error: {}", detail);
                }
            }
        }
        eprintln!();
    }

    let mut by_scenario: BTreeMap<&str, Vec<&Measurement>> = BTreeMap::new();
    for m in measurements {
        by_scenario.entry(m.scenario).or_default().push(m);
    }

    eprintln!("Performance by Scenario:");
    for (scenario, ms) in &by_scenario {
        let max_time = ms.iter().map(|m| m.wall_s).fold(0.0, f64::max);
        let max_mem = ms.iter().map(|m| m.rss_delta_kib).max().unwrap_or(0);
        eprintln!("  {scenario}: runs={}, max_time={max_time:.3}s, max_rss_delta={max_mem} KiB", ms.len());

        // Doubling n should cost roughly 8x for an O(n³) fill.
        if let (Some(first), Some(last)) = (ms.first(), ms.last()) {
            if first.wall_s > 0.0 && first.matrices > 0 {
                let ratio = last.wall_s / first.wall_s;
                let cubic = (last.matrices as f64 / first.matrices as f64).powi(3);
                eprintln!("    scaling: {ratio:.1}x time for {cubic:.0}x n³");
            }
        }
    }
    eprintln!();

    eprintln!("{}", "=".repeat(80));
    if failed == 0 {
        eprintln!("✓ All verified runs passed.");
    } else {
        eprintln!("✗ {} run(s) failed. Please review the errors above.", failed);
    }
    eprintln!("{}", "=".repeat(80));
    eprintln!();
}

fn measure<F>(scenario: &'static str, matrices: usize, sys: &mut System, compute: F) -> Measurement
where
    F: FnOnce() -> Outcome,
{
    let before = rss_kib(sys);
    let start = Instant::now();
    let outcome = compute();
    let duration = start.elapsed();
    let after = rss_kib(sys);

    Measurement {
        scenario,
        matrices,
        wall_s: duration.as_secs_f64(),
        rss_delta_kib: after.saturating_sub(before),
        min_cost: outcome.min_cost,
        verification: outcome.status,
        detail: outcome.detail,
    }
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("scenario,matrices,wall_s,rss_delta_kib,min_cost,verification_status,verification_detail");
    for m in measurements {
        let detail = m
            .detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{:.3},{},{},{},\"{}\"",
            m.scenario,
            m.matrices,
            m.wall_s,
            m.rss_delta_kib,
            m.min_cost,
            m.verification.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    let col1 = measurements
        .iter()
        .map(|m| m.scenario.len())
        .fold("scenario".len(), usize::max);

    println!(
        "{:<col1$}  {:>8}  {:>10}  {:>14}  {:>20}  {:>12}  detail",
        "scenario", "matrices", "wall_s", "rss_delta_kib", "min_cost", "status",
    );
    println!(
        "{:-<col1$}  {:-<8}  {:-<10}  {:-<14}  {:-<20}  {:-<12}  {:-<12}",
        "", "", "", "", "", "", "",
    );
    for m in measurements {
        println!(
            "{:<col1$}  {:>8}  {:>10.3}  {:>14}  {:>20}  {:>12}  {}",
            m.scenario,
            m.matrices,
            m.wall_s,
            m.rss_delta_kib,
            m.min_cost,
            m.verification.label(),
            m.detail.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    let text = serde_json::to_string_pretty(measurements).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new().with_memory());
    if let Some(process) = get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        process.memory() / 1024
    } else {
        0
    }
}

/// Dimensions in `[5, 40]` following a fixed pattern, `n + 1` of them.
fn deterministic_dims(n: usize) -> DimensionSequence {
    let values = (0..=n).map(|i| ((i * 17 + 11) % 36 + 5) as i64);
    match DimensionSequence::from_values(values) {
        Ok(dims) => dims,
        Err(err) => unreachable!("generated dimensions are positive: {err}"),
    }
}

/// Memoized top-down evaluation of the recurrence, independent of the
/// bottom-up table fill.
fn top_down_min_cost(dims: &DimensionSequence) -> Cost {
    fn solve(p: &[u64], memo: &mut [Vec<Option<Cost>>], i: usize, j: usize) -> Cost {
        if i == j {
            return 0;
        }
        if let Some(v) = memo[i][j] {
            return v;
        }
        let mut best = Cost::MAX;
        for k in i..j {
            let join = Cost::from(p[i]) * Cost::from(p[k + 1]) * Cost::from(p[j + 1]);
            let cand = solve(p, memo, i, k) + solve(p, memo, k + 1, j) + join;
            best = best.min(cand);
        }
        memo[i][j] = Some(best);
        best
    }

    let n = dims.num_matrices();
    let mut memo = vec![vec![None; n]; n];
    solve(dims.as_slice(), &mut memo, 0, n - 1)
}
