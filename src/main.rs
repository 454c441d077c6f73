use clap::{Parser, Subcommand};
use photo_publish::config::{self, Settings};
use photo_publish::fixup::Fixer;
use photo_publish::imaging::RustBackend;
use photo_publish::report::LogReporter;
use photo_publish::vcs::{GitCli, NoVcs, Vcs};
use photo_publish::{actions, output, scan, workdirs};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "publish")]
#[command(about = "Keep photo previews and publish links in shape")]
#[command(long_about = "\
Keep photo previews and publish links in shape

Every date folder of the archive may hold a publish/ folder of symlinks to
the photos picked for publication. For each of them a 1024px wide
<name>_small.jpg preview is generated from the exported JPEG, and linked
into every service folder listed in settings.toml.

Archive layouts:

  2022-01-01/publish/            flat
  2022-01-01/a/publish/          split into letter sub-folders a..h
  01/2022-01-01/publish/         bucketed by month 01..12

Run 'publish gen-config' to print a documented settings.toml.")]
#[command(version)]
struct Cli {
    /// Settings file [default: <config dir>/publish/settings.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Archive root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile every workdir (default)
    Fixup,
    /// List sources that have no exported JPEG yet
    Missing,
    /// List preview links of a service not yet moved to published/
    Unpublished {
        /// Service folder name, as listed in settings.toml
        service: String,
    },
    /// Hardlink every source into <workdir>/.backup/
    Backup,
    /// Print a stock settings.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    let command = cli.command.unwrap_or(Command::Fixup);
    if let Command::GenConfig = command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let settings = config::load_settings(&config_path)?;

    match command {
        Command::Fixup => fixup_all(&cli.root, &settings)?,
        Command::Missing => {
            for workdir in workdirs::discover(&cli.root, &mut LogReporter)? {
                let snapshot = scan::scan(&workdir, &settings.services)?;
                output::print_paths(&actions::missing_large(&snapshot));
            }
        }
        Command::Unpublished { service } => {
            let service = settings.service(&service)?;
            for workdir in workdirs::discover(&cli.root, &mut LogReporter)? {
                let snapshot = scan::scan(&workdir, &settings.services)?;
                output::print_paths(&actions::not_published(&snapshot, service)?);
            }
        }
        Command::Backup => {
            let mut reporter = LogReporter;
            for workdir in workdirs::discover(&cli.root, &mut reporter)? {
                let snapshot = scan::scan(&workdir, &settings.services)?;
                actions::backup_sources(&snapshot, &mut reporter)?;
            }
        }
        Command::GenConfig => {}
    }

    Ok(())
}

fn fixup_all(root: &Path, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut vcs: Box<dyn Vcs> = if settings.git {
        Box::new(GitCli::new(root))
    } else {
        Box::new(NoVcs::default())
    };
    let backend = RustBackend::new();
    let mut reporter = LogReporter;

    for workdir in workdirs::discover(root, &mut reporter)? {
        let snapshot = scan::scan(&workdir, &settings.services)?;
        Fixer {
            backend: &backend,
            vcs: vcs.as_mut(),
            reporter: &mut reporter,
            preview: settings.preview_config(),
        }
        .run(&snapshot)?;
    }
    Ok(())
}

/// Log lines go to stderr so listings on stdout stay pipeable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
