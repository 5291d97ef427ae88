mod render;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use shared::formats;
use shared::{
    export_posts, get_default_export_dir, AmplifyError, Config, ContentExtractor, GeminiClient,
    InputKind, PostGenerator,
};
use std::io::{self as stdio, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "x-amplify")]
#[command(about = "Turn a URL or a raw idea into 10 X posts built around one thesis")]
struct Args {
    /// A URL to scrape or the idea itself. Read from stdin when omitted
    input: Option<String>,

    /// Number of regeneration attempts when posts contain em dashes
    #[arg(short, long)]
    retries: Option<u32>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Print only this format's post (e.g. hook, listicle), for piping to a clipboard tool
    #[arg(long, value_name = "FORMAT", conflicts_with = "export")]
    raw: Option<String>,

    /// Export all posts as JSON. Without a path, writes to the downloads directory
    #[arg(short, long, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    export: Option<String>,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n❌ {:#}", e);
            if let Some(hint) = e.downcast_ref::<AmplifyError>().and_then(|e| e.hint()) {
                eprintln!("💡 Tip: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,shared=debug,x_amplify=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(stdio::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    if let Some(key) = &args.raw {
        if !formats::is_known(key) {
            let keys: Vec<&str> = shared::FORMATS.iter().map(|f| f.key).collect();
            anyhow::bail!("Unknown format: {}. Use one of: {}", key, keys.join(", "));
        }
    }

    let mut config = Config::from_env()?;
    if let Some(retries) = args.retries {
        config.max_retries = retries;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    tracing::debug!(
        "Using {} with up to {} retries and a {:?} request timeout",
        config.model,
        config.max_retries,
        config.request_timeout
    );

    let user_input = match args.input {
        Some(input) => input,
        None => read_input()?,
    };
    if user_input.trim().is_empty() {
        anyhow::bail!("No input given. Paste a URL or describe your idea.");
    }

    let extractor = ContentExtractor::new()?;
    match shared::extractor::classify(&user_input) {
        InputKind::Url => eprintln!("🌐 URL detected. Will scrape and analyze content."),
        InputKind::Text => eprintln!("✍️  Text input detected. Will analyze directly."),
    }

    eprintln!("\n🔮 Analyzing your input...");
    let (kind, content) = extractor
        .classify_and_extract(&user_input)
        .await
        .context("Failed to parse input")?;

    eprintln!("⚡ Generating 10 posts... (this takes 10-20 seconds)");
    let generator = PostGenerator::new(GeminiClient::new(&config)?, &config);
    let generation = generator
        .generate_content(&user_input, kind, &content)
        .await?;

    if let Some(key) = &args.raw {
        let post = generation.posts.get(key).ok_or_else(|| {
            anyhow::anyhow!("The model did not produce a '{}' post this time", key)
        })?;
        println!("{}", post);
        return Ok(());
    }

    println!("\n{}", render::thesis_box(&generation.thesis));
    println!("📱 Your {} Posts\n", generation.posts.len());
    println!("{}", render::post_cards(&generation));

    let missing = generation.missing_formats();
    if !missing.is_empty() {
        eprintln!("⚠ Not generated this time: {}", missing.join(", "));
    }

    if let Some(path) = args.export {
        let path = if path.is_empty() {
            get_default_export_dir()?.join(shared::io::default_export_filename(Local::now()))
        } else {
            PathBuf::from(path)
        };
        let written = export_posts(&generation.posts, &path)?;
        eprintln!("\n💾 Exported to {}", written.display());
    }

    Ok(())
}

/// Read the idea from piped stdin, or prompt for it interactively.
fn read_input() -> Result<String> {
    let mut input = String::new();

    if stdio::stdin().is_terminal() {
        println!("💡 Your raw idea");
        println!("Paste a URL or describe your idea, then press Ctrl-D:\n");
        stdio::stdout().flush()?;
    }

    stdio::stdin().read_to_string(&mut input)?;
    Ok(input)
}
