use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use workout_core::*;

#[derive(Parser)]
#[command(name = "wkplan")]
#[command(about = "Structured workout export, validation and upload", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use a local JSON fixture file instead of the remote service
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every workout and write them as a plan file
    Export {
        /// Output plan file (defaults to plans.json in the plans directory)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Warn about exported steps that would not validate
        #[arg(long)]
        validate: bool,
    },

    /// Check a plan file and list every problem found
    Validate {
        /// Plan file to check
        file: PathBuf,
    },

    /// Rebuild a plan file into wire JSON without contacting the service
    Transform {
        /// Plan file to rebuild
        file: PathBuf,

        /// Write wire JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate a plan file, then create and schedule its workouts
    Upload {
        /// Plan file to upload
        file: PathBuf,

        /// Validate and preview only - nothing is sent
        #[arg(long)]
        dry_run: bool,

        /// Delete existing workouts with the same name first
        #[arg(long)]
        replace: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    workout_core::logging::init(cli.verbose);

    let config = Config::load()?;
    tracing::debug!("Plans directory: {:?}", config.data.plans_dir);

    match cli.command {
        Commands::Export { out, validate } => {
            let out = out.unwrap_or_else(|| config.data.plans_dir.join("plans.json"));
            cmd_export(cli.fixture.as_deref(), &config, &out, validate)
        }
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Transform { file, out } => cmd_transform(&file, out.as_deref()),
        Commands::Upload {
            file,
            dry_run,
            replace,
        } => cmd_upload(
            cli.fixture.as_deref(),
            &config,
            &file,
            UploadOptions {
                dry_run,
                replace_existing: replace || config.upload.replace_existing,
            },
        ),
    }
}

fn http_client(config: &Config) -> Result<HttpClient> {
    let url = config.backend_url()?;
    tracing::debug!("Using workout service at {}", url);
    Ok(HttpClient::new(url, config.backend_token()?))
}

fn cmd_export(fixture: Option<&Path>, config: &Config, out: &Path, validate: bool) -> Result<()> {
    let plans = match fixture {
        Some(path) => export_plans(&FixtureClient::load(path)?, validate)?,
        None => export_plans(&http_client(config)?, validate)?,
    };

    save_plan_file(out, &plans)?;

    println!("✓ Exported {} workouts", plans.len());
    println!("  Plan: {}", out.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<()> {
    let workouts = load_plan_file(file)?;
    let errors = validate_all(&workouts);

    if errors.is_empty() {
        println!("✓ {} workouts valid", workouts.len());
        return Ok(());
    }

    report_errors(&errors);
    Err(Error::InvalidPlan(errors))
}

fn cmd_transform(file: &Path, out: Option<&Path>) -> Result<()> {
    let plans = parse_workouts(load_plan_file(file)?)?;
    let wire: Vec<WireWorkout> = plans.iter().map(build_workout).collect();
    let json = serde_json::to_string_pretty(&wire)?;

    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json)?;
            println!("✓ Wrote {} workouts to {}", wire.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_upload(
    fixture: Option<&Path>,
    config: &Config,
    file: &Path,
    options: UploadOptions,
) -> Result<()> {
    let workouts = load_plan_file(file)?;

    let result = match fixture {
        Some(path) => {
            let mut client = FixtureClient::load(path)?;
            let report = upload_plans(&mut client, &workouts, options);
            if !options.dry_run && report.is_ok() {
                client.save(path)?;
                tracing::info!("Fixture {:?} updated", path);
            }
            report
        }
        None => upload_plans(&mut http_client(config)?, &workouts, options),
    };

    let report = match result {
        Ok(report) => report,
        Err(Error::InvalidPlan(errors)) => {
            report_errors(&errors);
            eprintln!("Nothing was uploaded.");
            return Err(Error::InvalidPlan(errors));
        }
        Err(e) => return Err(e),
    };

    if options.dry_run {
        for workout in &report.uploaded {
            println!("{}", serde_json::to_string_pretty(&workout.payload)?);
        }
        if !report.errors.is_empty() {
            report_errors(&report.errors);
        }
        println!(
            "\n[Dry run - {} workouts ready, nothing sent]",
            report.uploaded.len()
        );
        return Ok(());
    }

    for id in &report.replaced {
        println!("  Deleted existing workout {}", id);
    }
    for workout in &report.uploaded {
        let id = workout.workout_id.unwrap_or_default();
        let scheduled = if workout.scheduled { " (scheduled)" } else { "" };
        println!(
            "✓ Created '{}' as {}{}",
            workout.payload.workout_name, id, scheduled
        );
    }
    Ok(())
}

fn report_errors(errors: &[SchemaError]) {
    eprintln!("Plan validation errors:");
    for error in errors {
        eprintln!("  - {}", error);
    }
}
