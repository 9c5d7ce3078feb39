use clap::{Parser, Subcommand};
use folio::contact::{ContactForm, Field, FormStatus};
use folio::relay::{EmailJsRelay, RelayError};
use folio::{config, generate, logger, output, scan, simulate};
use std::path::{Path, PathBuf};

/// Contact message fields for `folio send`.
#[derive(clap::Args, Clone)]
struct SendArgs {
    /// Sender's full name
    #[arg(long)]
    name: String,
    /// Sender's email address
    #[arg(long)]
    email: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    message: String,
}

/// Virtual viewport overrides for `folio simulate`.
#[derive(clap::Args, Clone)]
struct SimulateArgs {
    /// Viewport height in px (default from [simulation] config)
    #[arg(long)]
    viewport_height: Option<f64>,
    /// Scroll distance between frames in px
    #[arg(long)]
    step: Option<f64>,
}

fn version_string() -> &'static str {
    let on_tag = env!("FOLIO_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Single-page portfolio generator with scroll-triggered reveals")]
#[command(long_about = "\
Single-page portfolio generator with scroll-triggered reveals

Your content directory is the data source. Each TOML file fills one section
of the page; sections without content are left out of the page and the nav.

Content structure:

  content/
  ├── config.toml      # Site config (optional, merged over stock defaults)
  ├── profile.toml     # Hero banner (required)
  ├── about.toml       # Portrait and highlight figures
  ├── about.md         # About body (markdown)
  ├── skills.toml      # [[technical]] name/level, soft = [...]
  ├── projects.toml    # [[projects]]
  ├── experience.toml  # [[entries]]
  ├── contact.toml     # Channels, social links, response note
  └── assets/          # Copied verbatim to the output

The contact form posts to the relay configured under [relay]. The public key
can come from FOLIO_RELAY_PUBLIC_KEY instead of config.toml.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".folio-temp", global = true)]
    temp_dir: PathBuf,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the page from the scan manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Scroll a virtual viewport over the page and report reveals
    Simulate(SimulateArgs),
    /// Send one contact message through the configured relay
    Send(SendArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let generated = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&generated);
        }
        Command::Build => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let manifest_path = write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let generated = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&generated);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Simulate(args) => {
            let manifest = scan::scan(&cli.source)?;
            let mut sim_config = manifest.config.simulation.clone();
            if let Some(height) = args.viewport_height {
                sim_config.viewport_height = height;
            }
            if let Some(step) = args.step {
                sim_config.step = step;
            }
            if sim_config.viewport_height <= 0.0 || sim_config.step <= 0.0 {
                return Err("--viewport-height and --step must be positive".into());
            }
            let sim = simulate::simulate(&manifest, &sim_config);
            output::print_simulation(&sim);
        }
        Command::Send(args) => {
            let config = config::load_config(&cli.source)?;
            if config.relay.recipient.trim().is_empty() {
                return Err(RelayError::NotConfigured("recipient").into());
            }
            let relay = EmailJsRelay::new(&config.relay)?;

            let mut form = ContactForm::from_config(&config.relay);
            form.set_field(Field::Name, args.name);
            form.set_field(Field::Email, args.email);
            form.set_field(Field::Subject, args.subject);
            form.set_field(Field::Message, args.message);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let outcome = runtime.block_on(form.submit(&relay));
            output::print_send_outcome(&config.relay.recipient, &outcome, form.status());

            if outcome.is_err() || matches!(form.status(), FormStatus::Error(_)) {
                return Err("message was not sent".into());
            }
        }
    }

    Ok(())
}

/// Serialize the scan manifest into the temp directory.
fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&manifest_path, json)?;
    Ok(manifest_path)
}
