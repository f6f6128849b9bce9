mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use logic::{LogicTester, PlayStyle, ScenarioResult, TestScenario, resolve_seed_inputs};
use shoes_game::{CareerId, GameConfig, GameEngine, TemplateNarrative};

#[derive(Debug, Parser)]
#[command(name = "shoes-tester", version = "0.1.0")]
#[command(about = "Automated QA for Step Into My Shoes - scripted players in every career world")]
struct Args {
    /// Careers to play (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    careers: String,

    /// Player styles (comma-separated: expert,novice,idle,chaos, or `all`)
    #[arg(long, default_value = "expert,novice,chaos")]
    policies: String,

    /// List all careers and exit
    #[arg(long)]
    list_careers: bool,

    /// Seeds to run (comma-separated numbers or replay codes such as DR-ORANGE42)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// JSON tuning overlay applied on top of the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_careers(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.careers, &args.policies)?;
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let config = load_config(args.config.as_deref())?;
    let engine = GameEngine::new(TemplateNarrative::new(seed_infos[0].seed), config)
        .context("invalid game configuration")?;

    let results = run_logic_scenarios(&args, &engine, &scenarios, &seed_infos);

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn maybe_list_careers(args: &Args) -> Result<bool> {
    if !args.list_careers {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available careers:")?;
    for career in CareerId::ALL {
        writeln!(
            output_target.writer(),
            "  {:12} {} - {}",
            career.as_str(),
            career.replay_prefix(),
            career.tagline()
        )?;
    }
    writeln!(output_target.writer(), "Player styles:")?;
    for style in PlayStyle::ALL {
        writeln!(output_target.writer(), "  {style}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "👟 Step Into My Shoes Automated Tester".bright_cyan().bold());
    println!("{}", "======================================".cyan());
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    GameConfig::from_json(&raw).with_context(|| format!("failed to load {}", path.display()))
}

fn expand_scenarios(careers_arg: &str, policies_arg: &str) -> Result<Vec<TestScenario>> {
    let careers = expand_all(careers_arg, &CareerId::ALL, |token| {
        token.parse::<CareerId>().map_err(anyhow::Error::from)
    })?;
    let styles = expand_all(policies_arg, &PlayStyle::ALL, |token| {
        token.parse::<PlayStyle>().map_err(anyhow::Error::msg)
    })?;

    let mut scenarios = Vec::with_capacity(careers.len() * styles.len());
    for career in &careers {
        for style in &styles {
            scenarios.push(TestScenario {
                career: *career,
                style: *style,
            });
        }
    }
    Ok(scenarios)
}

/// Parse a csv list where `all` stands for every value; duplicates are dropped.
fn expand_all<T, F>(arg: &str, every: &[T], parse: F) -> Result<Vec<T>>
where
    T: Copy + PartialEq,
    F: Fn(&str) -> Result<T>,
{
    let mut values: Vec<T> = Vec::new();
    for token in split_csv(arg) {
        let parsed = if token.eq_ignore_ascii_case("all") {
            every.to_vec()
        } else {
            vec![parse(&token)?]
        };
        for value in parsed {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }
    Ok(values)
}

fn run_logic_scenarios(
    args: &Args,
    engine: &GameEngine<TemplateNarrative>,
    scenarios: &[TestScenario],
    seed_infos: &[logic::SeedInfo],
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(engine, args.verbose);
    let mut results = Vec::new();

    for scenario in scenarios {
        let scenario_results = logic_tester.run_scenario(*scenario, seed_infos, args.iterations);
        if scenario_results.is_empty() {
            eprintln!(
                "⚠️  No seeds apply to scenario {}",
                scenario.name().yellow()
            );
        }
        results.extend(scenario_results);
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Step Into My Shoes Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
        }
    }

    let duration = start_time.elapsed();
    writeln!(&mut output_target)?;
    writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
