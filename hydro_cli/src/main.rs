//! # Hullform CLI
//!
//! Command-line front end over `hydro_core`: reads a JSON vessel case and
//! prints hydrostatics, GZ curves and criteria checks as text or JSON.
//!
//! ```text
//! hydro_cli sample --hull barge > barge.json
//! hydro_cli hydrostatics --case barge.json --draft 5
//! hydro_cli table --case barge.json --from 1 --to 9 --step 0.5 --json
//! hydro_cli gz --case barge.json --draft 5 --max 40
//! hydro_cli check --case barge.json --draft 5    # exit code 2 on failure
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hydro_core::case::VesselCase;
use hydro_core::case_io::{load_case, save_case, to_json};
use hydro_core::criteria::{check_intact_stability_with, CriteriaReport};
use hydro_core::errors::HydroResult;
use hydro_core::hydrostatics::{
    draft_range, hydrostatic_table, HydrostaticCalculator, HydrostaticResult, HydrostaticsEngine,
};
use hydro_core::interrupt::{Deadline, Interrupt, Never};
use hydro_core::loadcase::Loadcase;
use hydro_core::quantity::Quantity;
use hydro_core::stability::{compute_gz_curve_with, GzCurveInput, StabilityCurveResult};

/// Exit code when a criteria check runs but the vessel fails
const EXIT_CRITERIA_FAILED: u8 = 2;

/// Drafts per parallel chunk of the hydrostatic table
const TABLE_CHUNK_ROWS: usize = 16;

/// How a successfully executed command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    CriteriaFailed,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::CriteriaFailed => ExitCode::from(EXIT_CRITERIA_FAILED),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Hull hydrostatics and intact stability")]
struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hydrostatic properties at one draft.
    Hydrostatics {
        #[command(flatten)]
        case: CaseArgs,
        /// Draft above keel (m).
        #[arg(long)]
        draft: f64,
        /// Heel angle (deg).
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        heel: f64,
    },
    /// Upright hydrostatics over a range of drafts.
    Table {
        #[command(flatten)]
        case: CaseArgs,
        /// First draft (m).
        #[arg(long)]
        from: f64,
        /// Last draft (m), always included.
        #[arg(long)]
        to: f64,
        /// Draft increment (m).
        #[arg(long)]
        step: f64,
        /// Abandon the table after this many seconds.
        #[arg(long)]
        timeout: Option<f64>,
    },
    /// Righting-arm curve at one draft.
    Gz {
        #[command(flatten)]
        case: CaseArgs,
        /// Upright draft (m).
        #[arg(long)]
        draft: f64,
        /// First heel angle (deg); defaults to the case sweep.
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,
        /// Last heel angle (deg); defaults to the case sweep.
        #[arg(long)]
        max: Option<f64>,
        /// Heel increment (deg); defaults to the case sweep.
        #[arg(long)]
        step: Option<f64>,
        /// Abandon the sweep after this many seconds.
        #[arg(long)]
        timeout: Option<f64>,
    },
    /// Check the intact-stability criteria at one draft.
    Check {
        #[command(flatten)]
        case: CaseArgs,
        /// Upright draft (m).
        #[arg(long)]
        draft: f64,
    },
    /// Print (or save) a ready-to-edit case file for a benchmark hull.
    Sample {
        /// Benchmark hull.
        #[arg(long, value_enum, default_value_t = SampleHull::Barge)]
        hull: SampleHull,
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct CaseArgs {
    /// Vessel case file (JSON).
    #[arg(long = "case")]
    path: PathBuf,
    /// Override the case KG (m).
    #[arg(long)]
    kg: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SampleHull {
    Barge,
    Wigley,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    run(cli).map(ExitCode::from)
}

fn run(cli: Cli) -> Result<Outcome> {
    let json = cli.json;
    match cli.command {
        Command::Hydrostatics { case, draft, heel } => {
            handle_hydrostatics(&case, draft, heel, json)
        }
        Command::Table {
            case,
            from,
            to,
            step,
            timeout,
        } => handle_table(&case, from, to, step, timeout, json),
        Command::Gz {
            case,
            draft,
            min,
            max,
            step,
            timeout,
        } => handle_gz(&case, draft, min, max, step, timeout, json),
        Command::Check { case, draft } => handle_check(&case, draft, json),
        Command::Sample { hull, output } => handle_sample(hull, output.as_deref()),
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

// =============================================================================
// COMMAND HANDLERS
// =============================================================================

fn open_case(args: &CaseArgs) -> Result<(VesselCase, Loadcase)> {
    let case = load_case(&args.path)
        .with_context(|| format!("failed to load case {}", args.path.display()))?;
    let loadcase = match args.kg {
        Some(kg) => case.loadcase_with_kg(kg).context("invalid --kg override")?,
        None => case.loadcase,
    };
    info!(case = %case.name, kg_m = loadcase.kg_m, "case loaded");
    Ok((case, loadcase))
}

fn handle_hydrostatics(args: &CaseArgs, draft: f64, heel: f64, json: bool) -> Result<Outcome> {
    let (case, loadcase) = open_case(args)?;
    let engine: HydrostaticsEngine = HydrostaticsEngine::default();
    let hs = engine
        .compute_at_draft(&case.hull, Some(&loadcase), draft, heel)
        .with_context(|| format!("hydrostatics failed at draft {draft} m"))?;

    if json {
        print_json(&hs)?;
    } else {
        print_hydrostatics(&hs);
    }
    Ok(Outcome::Done)
}

fn handle_table(
    args: &CaseArgs,
    from: f64,
    to: f64,
    step: f64,
    timeout: Option<f64>,
    json: bool,
) -> Result<Outcome> {
    let (case, loadcase) = open_case(args)?;
    let drafts = draft_range(from, to, step).context("invalid draft range")?;
    let interrupt = interrupt_for(timeout)?;
    let rows = table_rows(&case, &loadcase, &drafts, &*interrupt)?;

    if json {
        print_json(&rows)?;
    } else {
        println!(
            "{:>8} {:>12} {:>12} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "T (m)", "V (m³)", "Δ (t)", "KB (m)", "LCB (m)", "BMt (m)", "GMt (m)", "TPC"
        );
        for row in &rows {
            println!(
                "{:>8.3} {:>12.2} {:>12} {:>8.3} {:>8} {:>8} {:>8} {:>8}",
                row.draft_m,
                row.volume_m3,
                fmt_quantity(&row.displacement_t, 1),
                row.kb_m,
                fmt_quantity(&row.lcb_m, 3),
                fmt_quantity(&row.bmt_m, 3),
                fmt_quantity(&row.gmt_m, 3),
                fmt_quantity(&row.tpc_t_per_cm, 2),
            );
        }
    }
    Ok(Outcome::Done)
}

#[allow(clippy::too_many_arguments)]
fn handle_gz(
    args: &CaseArgs,
    draft: f64,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    timeout: Option<f64>,
    json: bool,
) -> Result<Outcome> {
    let (case, loadcase) = open_case(args)?;
    let mut input = case.gz_input(draft);
    input.min_angle_deg = min.unwrap_or(input.min_angle_deg);
    input.max_angle_deg = max.unwrap_or(input.max_angle_deg);
    input.angle_step_deg = step.unwrap_or(input.angle_step_deg);

    let interrupt = interrupt_for(timeout)?;
    let curve = gz_curve(&case, &loadcase, &input, &*interrupt)?;

    if json {
        print_json(&curve)?;
    } else {
        print_curve(&curve);
    }
    Ok(Outcome::Done)
}

fn handle_check(args: &CaseArgs, draft: f64, json: bool) -> Result<Outcome> {
    let (case, loadcase) = open_case(args)?;
    let engine: HydrostaticsEngine = HydrostaticsEngine::default();
    let curve = gz_curve(&case, &loadcase, &case.gz_input(draft), &Never)?;
    let report = check_intact_stability_with(&curve, engine.integrator(), &case.settings.criteria)
        .context("criteria check failed")?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    info!(passed = report.all_criteria_passed, "{}", report.summary());

    if report.all_criteria_passed {
        Ok(Outcome::Done)
    } else {
        Ok(Outcome::CriteriaFailed)
    }
}

fn handle_sample(hull: SampleHull, output: Option<&Path>) -> Result<Outcome> {
    let case = match hull {
        SampleHull::Barge => VesselCase::sample_barge(),
        SampleHull::Wigley => VesselCase::sample_wigley(),
    }
    .context("failed to build sample hull")?;

    match output {
        Some(path) => {
            save_case(&case, path).with_context(|| format!("failed to write {}", path.display()))?;
            println!("Sample case written to {}", path.display());
        }
        None => println!("{}", to_json(&case)?),
    }
    Ok(Outcome::Done)
}

/// Hydrostatic table computed chunk by chunk on the rayon pool, rows in draft order.
fn table_rows<S: Interrupt + ?Sized>(
    case: &VesselCase,
    loadcase: &Loadcase,
    drafts: &[f64],
    interrupt: &S,
) -> Result<Vec<HydrostaticResult>> {
    let engine: HydrostaticsEngine = HydrostaticsEngine::default();
    let chunks = drafts
        .par_chunks(TABLE_CHUNK_ROWS)
        .map(|chunk| hydrostatic_table(&engine, &case.hull, Some(loadcase), chunk, interrupt))
        .collect::<HydroResult<Vec<_>>>()
        .context("hydrostatic table failed")?;
    Ok(chunks.into_iter().flatten().collect())
}

fn gz_curve<S: Interrupt + ?Sized>(
    case: &VesselCase,
    loadcase: &Loadcase,
    input: &GzCurveInput,
    interrupt: &S,
) -> Result<StabilityCurveResult> {
    let engine: HydrostaticsEngine = HydrostaticsEngine::default();
    compute_gz_curve_with(&engine, engine.integrator(), &case.hull, loadcase, input, interrupt)
        .with_context(|| format!("GZ sweep failed at draft {} m", input.draft_m))
}

fn interrupt_for(timeout_secs: Option<f64>) -> Result<Box<dyn Interrupt>> {
    match timeout_secs {
        None => Ok(Box::new(Never)),
        Some(secs) => {
            let timeout = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid --timeout {secs}"))?;
            Ok(Box::new(Deadline::after(timeout)))
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn fmt_quantity(q: &Quantity, precision: usize) -> String {
    match q {
        Quantity::Defined { value } => format!("{value:.precision$}"),
        Quantity::Undefined { .. } => "-".to_string(),
    }
}

fn fmt_quantity_long(q: &Quantity, precision: usize) -> String {
    match q {
        Quantity::Defined { value } => format!("{value:.precision$}"),
        Quantity::Undefined { reason } => format!("undefined ({reason})"),
    }
}

fn print_hydrostatics(hs: &HydrostaticResult) {
    println!("Draft                 {:.3} m", hs.draft_m);
    if hs.heel_deg != 0.0 {
        println!("Heel                  {:.2} deg", hs.heel_deg);
    }
    println!("Volume                {:.3} m³", hs.volume_m3);
    println!("Displacement          {} t", fmt_quantity_long(&hs.displacement_t, 2));
    println!("KB                    {:.4} m", hs.kb_m);
    println!("LCB                   {} m", fmt_quantity_long(&hs.lcb_m, 4));
    println!("TCB                   {:.4} m", hs.tcb_m);
    println!("Waterplane area       {:.3} m²", hs.waterplane_area_m2);
    println!("LCF                   {} m", fmt_quantity_long(&hs.lcf_m, 4));
    println!("BMt                   {} m", fmt_quantity_long(&hs.bmt_m, 4));
    println!("BMl                   {} m", fmt_quantity_long(&hs.bml_m, 4));
    println!("KMt                   {} m", fmt_quantity_long(&hs.kmt_m, 4));
    println!("KMl                   {} m", fmt_quantity_long(&hs.kml_m, 4));
    println!("GMt                   {} m", fmt_quantity_long(&hs.gmt_m, 4));
    println!("GMl                   {} m", fmt_quantity_long(&hs.gml_m, 4));
    println!("Cb                    {}", fmt_quantity_long(&hs.cb, 4));
    println!("Cp                    {}", fmt_quantity_long(&hs.cp, 4));
    println!("Cm                    {}", fmt_quantity_long(&hs.cm, 4));
    println!("Cwp                   {}", fmt_quantity_long(&hs.cwp, 4));
    println!("TPC                   {} t/cm", fmt_quantity_long(&hs.tpc_t_per_cm, 3));
    println!("MCT 1cm               {} t·m/cm", fmt_quantity_long(&hs.mct_tm_per_cm, 3));
}

fn print_curve(curve: &StabilityCurveResult) {
    println!("{:>8} {:>10}", "φ (deg)", "GZ (m)");
    for p in &curve.points {
        println!("{:>8.2} {:>10.4}", p.heel_deg, p.gz_m);
    }
    println!();
    println!("Initial GMt            {:.4} m", curve.initial_gmt_m);
    println!(
        "Max GZ                 {:.4} m at {:.2} deg",
        curve.max_gz_m, curve.angle_at_max_gz_deg
    );
    println!("Dynamic stability      {:.4} m·rad", curve.dynamic_stability_m_rad);
    if let Some(vanish) = curve.angle_of_vanishing_stability_deg {
        println!("Vanishing stability    {vanish:.2} deg");
    }
    if let Some(loll) = curve.condition.and_then(|c| c.angle_of_loll_deg) {
        println!("Angle of loll          {loll:.2} deg");
    }
}

fn print_report(report: &CriteriaReport) {
    for r in &report.results {
        println!(
            "[{}] {:<24} {:>9.4} >= {:<7} {}",
            if r.passed { "PASS" } else { "FAIL" },
            r.name,
            r.actual,
            r.required,
            r.unit
        );
    }
    println!();
    println!("{}", report.summary());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hydrostatics() {
        let cli = Cli::try_parse_from([
            "hydro_cli", "hydrostatics", "--case", "b.json", "--draft", "5", "--heel", "-10",
        ])
        .unwrap();
        match cli.command {
            Command::Hydrostatics { case, draft, heel } => {
                assert_eq!(case.path, PathBuf::from("b.json"));
                assert_eq!(case.kg, None);
                assert_eq!(draft, 5.0);
                assert_eq!(heel, -10.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_table_with_json_flag() {
        let cli = Cli::try_parse_from([
            "hydro_cli", "table", "--case", "b.json", "--from", "1", "--to", "9", "--step", "0.5",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Table { timeout: None, .. }));
    }

    #[test]
    fn test_parse_gz_defaults_to_case_sweep() {
        let cli = Cli::try_parse_from([
            "hydro_cli", "gz", "--case", "b.json", "--draft", "5", "--kg", "7.5",
        ])
        .unwrap();
        match cli.command {
            Command::Gz { case, min, max, step, .. } => {
                assert_eq!(case.kg, Some(7.5));
                assert!(min.is_none() && max.is_none() && step.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_sample_hull() {
        let cli = Cli::try_parse_from(["hydro_cli", "sample", "--hull", "wigley"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Sample { hull: SampleHull::Wigley, output: None }
        ));
        assert!(Cli::try_parse_from(["hydro_cli", "sample", "--hull", "yacht"]).is_err());
    }

    #[test]
    fn test_draft_is_required() {
        assert!(Cli::try_parse_from(["hydro_cli", "check", "--case", "b.json"]).is_err());
    }

    #[test]
    fn test_check_exit_codes() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("hydro_cli_check_{}.json", std::process::id()));
        save_case(&VesselCase::sample_barge().unwrap(), &path).unwrap();
        let path_str = path.to_string_lossy().to_string();

        let stable = Cli::try_parse_from([
            "hydro_cli", "check", "--case", &path_str, "--draft", "5", "--json",
        ])
        .unwrap();
        assert_eq!(run(stable).unwrap(), Outcome::Done);

        let tender = Cli::try_parse_from([
            "hydro_cli", "check", "--case", &path_str, "--draft", "5", "--kg", "12", "--json",
        ])
        .unwrap();
        assert_eq!(run(tender).unwrap(), Outcome::CriteriaFailed);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_quantity_formatting() {
        assert_eq!(fmt_quantity(&Quantity::defined(1.23456), 2), "1.23");
        let undefined = Quantity::undefined(hydro_core::quantity::UndefinedReason::ZeroVolume);
        assert_eq!(fmt_quantity(&undefined, 2), "-");
    }

    #[test]
    fn test_timeout_interrupt() {
        assert!(!interrupt_for(None).unwrap().is_interrupted());
        assert!(interrupt_for(Some(0.0)).unwrap().is_interrupted());
        assert!(interrupt_for(Some(-1.0)).is_err());
        // too far out for the clock: runs without a deadline
        assert!(!interrupt_for(Some(1e19)).unwrap().is_interrupted());
    }

    #[test]
    fn test_table_rows_keep_draft_order() {
        let case = VesselCase::sample_barge().unwrap();
        let drafts = draft_range(0.5, 9.5, 0.25).unwrap();
        assert!(drafts.len() > TABLE_CHUNK_ROWS);
        let rows = table_rows(&case, &case.loadcase, &drafts, &Never).unwrap();
        assert_eq!(rows.len(), drafts.len());
        for (row, draft) in rows.iter().zip(&drafts) {
            assert_eq!(row.draft_m, *draft);
        }
    }

    #[test]
    fn test_table_rows_cancelled() {
        let case = VesselCase::sample_barge().unwrap();
        let drafts = draft_range(0.5, 9.5, 0.25).unwrap();
        let expired = interrupt_for(Some(0.0)).unwrap();
        assert!(table_rows(&case, &case.loadcase, &drafts, &*expired).is_err());
    }
}
