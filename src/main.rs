use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use seedmap::seed::{find_seed, load_seed_list};
use seedmap::{
    Claim, ClaimStore, GenerationSettings, JsonClaimStore, MapError, MapSession, RenderMode,
    Rendered, SettingsOverrides, TerrainRenderer,
};

#[derive(Parser, Debug)]
#[command(name = "seedmap-cli")]
#[command(about = "Render seeded terrain maps with rivers and claim markers")]
struct Cli {
    /// Generation settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "seedmap=debug" (RUST_LOG wins when set)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a map and save it as PNG
    Render(RenderArgs),

    /// Print the biome at a map coordinate
    Classify {
        #[arg(short, long)]
        seed: String,

        #[arg(long, allow_negative_numbers = true)]
        x: i64,

        #[arg(long, allow_negative_numbers = true)]
        y: i64,

        #[command(flatten)]
        overrides: SettingsOverrides,
    },

    /// Claim a point on a map and report its biome
    Claim {
        #[arg(short, long)]
        seed: String,

        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Claims file
        #[arg(long, default_value = "claims.json")]
        claims: PathBuf,

        #[command(flatten)]
        overrides: SettingsOverrides,
    },

    /// List the entries of a seed list
    Seeds { file: PathBuf },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Seed text or number (random when omitted)
    #[arg(short, long)]
    seed: Option<String>,

    /// Seed list file to pick the seed from
    #[arg(long, requires = "pick")]
    seed_list: Option<PathBuf>,

    /// Name of the seed list entry to render
    #[arg(long, requires = "seed_list")]
    pick: Option<String>,

    /// Claims file overlaid in grid mode
    #[arg(long)]
    claims: Option<PathBuf>,

    /// Print a terminal preview and biome summary
    #[arg(long)]
    ascii: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "map.png")]
    output: PathBuf,

    #[command(flatten)]
    overrides: SettingsOverrides,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config: Option<&Path>) -> seedmap::Result<GenerationSettings> {
    match config {
        Some(path) => GenerationSettings::load(path),
        None => Ok(GenerationSettings::default()),
    }
}

fn open_session(
    mut settings: GenerationSettings,
    args: &RenderArgs,
) -> seedmap::Result<MapSession> {
    match (&args.seed_list, &args.pick) {
        (Some(list), Some(name)) => {
            let records = load_seed_list(list)?;
            let record = find_seed(&records, name)?;
            if let Some(w) = record.map_width {
                settings.width = w;
            }
            if let Some(h) = record.map_height {
                settings.height = h;
            }
            settings.apply_cli_overrides(&args.overrides);
            println!("Selected {}", record.label());
            MapSession::new(record.seed, settings)
        }
        _ => {
            settings.apply_cli_overrides(&args.overrides);
            MapSession::from_text(args.seed.as_deref(), settings)
        }
    }
}

fn render(settings: GenerationSettings, args: RenderArgs) -> seedmap::Result<()> {
    let session = open_session(settings, &args)?;

    println!(
        "Generating {}x{} map (Seed: {} -> {}, mode: {:?})",
        session.width(),
        session.height(),
        session.seed_text(),
        session.seed(),
        session.settings().mode
    );

    let rendered = match session.settings().mode {
        RenderMode::Raster => {
            if let Some(path) = &args.claims {
                tracing::warn!(path = %path.display(), "claims are only drawn in grid mode, ignoring");
            }
            let map = session.generate();
            if args.ascii {
                println!("\n{}", TerrainRenderer::ascii_preview(&map, 80));
                println!("{}", TerrainRenderer::summary(&map));
            }
            Rendered::Raster(TerrainRenderer::render_to_raster(&map))
        }
        RenderMode::Grid => {
            let store = args.claims.as_ref().map(JsonClaimStore::new);
            session.render(store.as_ref().map(|s| s as &dyn ClaimStore))
        }
    };

    let raster = rendered.into_raster(session.width(), session.height());
    raster.save_png(&args.output)?;
    println!("Map saved as: {}", args.output.display());
    Ok(())
}

fn classify(
    mut settings: GenerationSettings,
    seed: &str,
    x: i64,
    y: i64,
    overrides: &SettingsOverrides,
) -> seedmap::Result<()> {
    settings.apply_cli_overrides(overrides);
    let session = MapSession::from_text(Some(seed), settings)?;
    let biome = session.classify(x, y)?;
    println!("{}", biome.name());
    Ok(())
}

fn claim(
    mut settings: GenerationSettings,
    seed: &str,
    x: f64,
    y: f64,
    claims: PathBuf,
    overrides: &SettingsOverrides,
) -> seedmap::Result<()> {
    settings.apply_cli_overrides(overrides);
    let session = MapSession::from_text(Some(seed), settings)?;

    let mut store = JsonClaimStore::new(claims);
    store.add_claim(session.seed(), Claim::new(x, y))?;

    let (cx, cy) = (x.floor() as i64, y.floor() as i64);
    match session.classify(cx, cy) {
        Ok(biome) => println!("You claimed area at ({},{}) in {} biome", cx, cy, biome.name()),
        Err(MapError::OutOfBounds { .. }) => {
            println!("You claimed area at ({},{}) outside the map", cx, cy)
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

fn list_seeds(file: &Path) -> seedmap::Result<()> {
    for record in load_seed_list(file)? {
        println!("{}", record.label());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = load_settings(cli.config.as_deref()).and_then(|settings| match cli.command {
        Command::Render(args) => render(settings, args),
        Command::Classify {
            seed,
            x,
            y,
            overrides,
        } => classify(settings, &seed, x, y, &overrides),
        Command::Claim {
            seed,
            x,
            y,
            claims,
            overrides,
        } => claim(settings, &seed, x, y, claims, &overrides),
        Command::Seeds { file } => list_seeds(&file),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
