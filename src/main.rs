//! Command-line front end for stacking simulated shear catalogs.
//!
//! ```bash
//! # Stack the catalogs of one list into a profile
//! halostack stack stacks/mxxl.m1.list stack.json mxxlsnap41_answers.json out/m1.csv
//!
//! # Write stack lists grouped by mass (and redshift for light cones)
//! halostack assign mxxlsnap41_answers.json stacks/
//!
//! # Print the configuration schema
//! halostack schema
//! ```

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use halostack::binning::BinEdges;
use halostack::config::{StackConfig, build_binning};
use halostack::io::{
    CatalogLoader, ProfileFormat, TextCatalogLoader, read_cosmology, read_stack_list, read_truth,
    write_assignments, write_binned_profile,
};
use halostack::stacking::{
    DEFAULT_MASS_EDGES, DEFAULT_REDSHIFT_EDGES, HaloIdPattern, ProfileAccumulator, SimulationKind,
    StackingDriver, assign_stacks,
};

#[derive(Parser, Debug)]
#[command(name = "halostack")]
#[command(about = "Stack weak-lensing shear profiles of simulated galaxy clusters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stack every catalog named in a stack list into one profile
    Stack {
        /// Text file whose first column lists catalog paths
        stack_list: PathBuf,
        /// JSON stacking configuration
        config: PathBuf,
        /// Answers file with the true halo masses (`<simulation>_answers.json`)
        answers: PathBuf,
        /// Output profile; overwritten if present
        output: PathBuf,
        /// Output format (csv, tsv, json); defaults to the output extension
        #[arg(short, long)]
        format: Option<ProfileFormat>,
        /// Directory that relative catalog paths are resolved against
        #[arg(long)]
        catalog_dir: Option<PathBuf>,
        /// Log progress after every catalog
        #[arg(short, long)]
        progress: bool,
    },

    /// Bin a single catalog with the configured binning policy
    Profile {
        catalog: PathBuf,
        config: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        format: Option<ProfileFormat>,
        /// Lens redshift for catalogs without a `zlens` comment
        #[arg(long)]
        z_lens: Option<f64>,
    },

    /// Group the halos of an answers file into stacks and write stack lists
    Assign {
        answers: PathBuf,
        outdir: PathBuf,
        /// Simulation family; inferred from the answers file name when absent
        #[arg(long)]
        simulation: Option<SimulationKind>,
        /// Catalog path template, `{id}` is replaced by the halo id
        #[arg(long)]
        template: Option<String>,
        /// File name prefix of the written lists; defaults to the simulation
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print the JSON Schema of the stacking configuration
    Schema,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn output_format(explicit: Option<ProfileFormat>, output: &Path) -> ProfileFormat {
    explicit
        .or_else(|| ProfileFormat::from_extension(output))
        .unwrap_or_default()
}

fn simulation_for(explicit: Option<SimulationKind>, answers: &Path) -> Option<SimulationKind> {
    explicit.or_else(|| SimulationKind::from_answer_file(answers))
}

fn run_stack(
    stack_list: &Path,
    config_path: &Path,
    answers: &Path,
    output: &Path,
    format: Option<ProfileFormat>,
    catalog_dir: Option<PathBuf>,
    progress: bool,
) -> Result<()> {
    let config = StackConfig::from_path(config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;
    let edges = config.stack_edges()?;

    let ids = match (&config.id_pattern, simulation_for(config.simulation, answers)) {
        (Some(pattern), _) => HaloIdPattern::new(pattern)?,
        (None, Some(kind)) => HaloIdPattern::for_simulation(kind)?,
        (None, None) => bail!(
            "no halo id pattern: set `simulation` or `id_pattern` in {}",
            config_path.display()
        ),
    };
    let Some(table) = &config.cosmology_table else {
        bail!("no `cosmology_table` in {}", config_path.display());
    };
    let cosmology = read_cosmology(table)
        .with_context(|| format!("reading cosmology table {}", table.display()))?;
    let truth =
        read_truth(answers).with_context(|| format!("reading answers {}", answers.display()))?;
    let identifiers = read_stack_list(stack_list)
        .with_context(|| format!("reading stack list {}", stack_list.display()))?;

    let mut loader = TextCatalogLoader::new();
    if let Some(dir) = catalog_dir {
        loader = loader.with_root(dir);
    }
    let accumulator = ProfileAccumulator::new(edges)
        .with_columns(config.binning.radial_column(), config.binning.shear_column());
    let mut driver = StackingDriver::new(
        accumulator,
        ids,
        Box::new(truth),
        Box::new(loader),
        Box::new(cosmology),
    );

    let reporter = if progress {
        let (tx, rx) = mpsc::channel();
        driver = driver.with_progress(tx);
        Some(thread::spawn(move || {
            for p in rx {
                info!("{p}");
            }
        }))
    } else {
        None
    };

    let fmt = output_format(format, output);
    let result = driver.run_to_file(&identifiers, output, fmt);
    drop(driver);
    if let Some(handle) = reporter {
        let _ = handle.join();
    }
    let profile = result.with_context(|| format!("stacking {}", stack_list.display()))?;
    info!(
        catalogs = profile.catalogs,
        objects = profile.total_objects(),
        "wrote {}",
        output.display()
    );
    Ok(())
}

fn run_profile(
    catalog: &Path,
    config_path: &Path,
    output: &Path,
    format: Option<ProfileFormat>,
    z_lens: Option<f64>,
) -> Result<()> {
    let config = StackConfig::from_path(config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;
    let mut loader = TextCatalogLoader::new();
    if let Some(z) = z_lens {
        loader = loader.with_default_z_lens(z);
    }
    let cat = loader
        .load(&catalog.to_string_lossy())
        .with_context(|| format!("reading catalog {}", catalog.display()))?;

    let policy = build_binning(config.binning)?;
    let profile = policy.bin(&cat)?;
    write_binned_profile(&profile, output, output_format(format, output))
        .with_context(|| format!("writing {}", output.display()))?;
    info!(
        policy = policy.name(),
        rows = cat.len(),
        bins = profile.len(),
        "wrote {}",
        output.display()
    );
    Ok(())
}

fn run_assign(
    answers: &Path,
    outdir: &Path,
    simulation: Option<SimulationKind>,
    template: Option<String>,
    prefix: Option<String>,
) -> Result<()> {
    let truth =
        read_truth(answers).with_context(|| format!("reading answers {}", answers.display()))?;
    let Some(kind) = simulation_for(simulation, answers) else {
        bail!(
            "cannot infer the simulation from {}; pass --simulation",
            answers.display()
        );
    };
    let template = match template.as_deref().or(kind.catalog_template()) {
        Some(t) => t.to_string(),
        None => bail!("{kind} catalogs have no default name; pass --template"),
    };

    let mass = BinEdges::from_edges(DEFAULT_MASS_EDGES.to_vec())?;
    let redshift = if kind.bins_by_redshift() {
        Some(BinEdges::from_edges(DEFAULT_REDSHIFT_EDGES.to_vec())?)
    } else {
        None
    };
    let stacks = assign_stacks(&truth, &mass, redshift.as_ref());

    let prefix = prefix.unwrap_or_else(|| kind.to_string());
    let lists = write_assignments(outdir, &prefix, &template, &stacks)
        .with_context(|| format!("writing stacks to {}", outdir.display()))?;
    for (stack, list) in stacks.iter().zip(&lists) {
        info!(
            halos = stack.halo_ids.len(),
            mean_m200 = stack.mean_m200,
            "{}",
            list.display()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Stack {
            stack_list,
            config,
            answers,
            output,
            format,
            catalog_dir,
            progress,
        } => run_stack(
            &stack_list,
            &config,
            &answers,
            &output,
            format,
            catalog_dir,
            progress,
        ),
        Command::Profile {
            catalog,
            config,
            output,
            format,
            z_lens,
        } => run_profile(&catalog, &config, &output, format, z_lens),
        Command::Assign {
            answers,
            outdir,
            simulation,
            template,
            prefix,
        } => run_assign(&answers, &outdir, simulation, template, prefix),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&StackConfig::schema())?);
            Ok(())
        }
    }
}
