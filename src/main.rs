use clap::{Parser, Subcommand};
use postline::config::AppConfig;
use postline::error::{Error, Result};
use postline::renderer::PostRenderer;
use postline::storage::{self, FileStorage, ScheduleStorage};
use postline::{config, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "postline")]
#[command(about = "Scheduled submission of post series with navigation links")]
#[command(long_about = "\
Scheduled submission of post series with navigation links

The schedule is a TOML document describing an ordered series of posts:

  subreddit = \"anime\"

  [[posts]]
  name = \"episode_01\"
  submit_at = \"2026-01-03 17:00:00\"       # UTC
  title = \"Slow Start - Episode 1 Discussion\"
  body_template = \"episode_01.md\"         # relative to the schedule file

Post bodies are markdown with $name placeholders: $navigation_links expands
to previous/next links, and every sibling post can be referenced by its name
($episode_02 becomes a link once episode 2 is up, a marker before that).

Run 'postline gen-config' and 'postline gen-schedule' for documented
starting points.")]
#[command(version = version_string())]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "postline.toml", global = true)]
    config: PathBuf,

    /// Schedule file (overrides the configuration)
    #[arg(long, global = true)]
    schedule: Option<PathBuf>,

    /// Verbose tracing output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the configuration and the schedule without submitting
    Check,
    /// Render a post body locally and print it
    Preview {
        /// Name of the post to render
        name: String,
    },
    /// Print a stock postline.toml with all options documented
    GenConfig,
    /// Print a documented sample schedule
    GenSchedule,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(error) = run(&cli) {
        output::print_error(&error);
        std::process::exit(error.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Check => {
            let config = load_config(cli)?;
            let schedule = file_storage(&config)?.load()?;
            output::print_schedule(&schedule);
            println!("The schedule is valid.");
        }
        Command::Preview { name } => {
            let config = load_config(cli)?;
            let mut schedule = file_storage(&config)?.load()?;
            let index = schedule.position(name).ok_or_else(|| {
                Error::MissingPost(format!("No post named '{name}' in the schedule."))
            })?;

            let renderer = PostRenderer::new(&config.navigation, None);
            renderer.prepare_post(&mut schedule, index, false)?;

            let post = &schedule.posts[index];
            println!("{}", post);
            println!();
            if let Some(body) = &post.body_rendered {
                println!("{}", body);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenSchedule => {
            print!("{}", storage::sample_schedule_toml());
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(schedule) = &cli.schedule {
        config.storage.schedule_file = Some(schedule.display().to_string());
        config.storage.schedule_wiki_url = None;
    }
    config.validate()?;
    Ok(config)
}

/// Local commands work directly against the schedule file; a wiki-hosted
/// schedule needs an authorized client and is out of their reach.
fn file_storage(config: &AppConfig) -> Result<FileStorage> {
    match &config.storage.schedule_file {
        Some(path) => Ok(FileStorage::new(path)),
        None => Err(Error::MissingSchedule {
            message: "This command needs a local schedule file.".into(),
            hint: Some(
                "Set 'schedule_file' in the [storage] section or pass --schedule.".into(),
            ),
        }),
    }
}

fn init_tracing(debug: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if debug { "postline=debug" } else { "postline=warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
