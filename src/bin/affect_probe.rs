use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use avatar_affect_engine::{
    AffectEngine, EngineConfig, FortuneOutcome, InteractionRequest, Language,
};

#[derive(Parser, Debug)]
#[command(name = "affect-probe")]
#[command(about = "Run text through the avatar affect pipeline and print decisions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Session id the turns run under
    #[arg(short, long, default_value = "probe")]
    session: String,

    /// Character model name
    #[arg(short, long)]
    model: Option<String>,

    /// Context type (conversation, greeting, fortune_daily, ...)
    #[arg(short, long, default_value = "conversation")]
    context: String,

    /// Language hint: ko, en or ja
    #[arg(short, long)]
    language: Option<Language>,

    /// Fortune overall score (0-100) attached to every turn
    #[arg(long)]
    fortune_score: Option<u8>,

    /// Engine config TOML path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the selector RNG, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avatar_affect_engine=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let mut engine = AffectEngine::with_config(config);
    if let Some(seed) = args.seed {
        engine = engine.with_seed(seed);
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let mut request = InteractionRequest::new(&args.session, text).with_context(&args.context);
        if let Some(language) = args.language {
            request = request.with_language(language);
        }
        if let Some(model) = &args.model {
            request = request.with_model(model);
        }
        if let Some(score) = args.fortune_score {
            request = request.with_fortune(FortuneOutcome {
                fortune_type: args.context.clone(),
                overall_score: Some(score),
                category_scores: Default::default(),
            });
        }

        match engine.process(&request) {
            Ok(decision) => println!("{}", serde_json::to_string_pretty(&decision)?),
            Err(e) => eprintln!("turn failed: {}", e),
        }
    }

    Ok(())
}
