use anyhow::Result;
use clap::Parser;
use lecture_scribe::{
    find_language, session, supported_languages, Config, SimulatedProvider, TranscriptionSession,
    Utterance,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Live lecture transcription over a restartable recognition engine
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (without extension)
    #[arg(long, default_value = "config/lecture-scribe")]
    config: String,

    /// Language tag for recognition (overrides the config file)
    #[arg(long)]
    language: Option<String>,

    /// JSON script of utterances replayed by the simulated engine
    #[arg(long)]
    script: Option<PathBuf>,

    /// How long to record before stopping
    #[arg(long)]
    seconds: Option<u64>,

    /// Print the known language tags and exit
    #[arg(long)]
    list_languages: bool,

    /// Print the final transcript and stats as JSON
    #[arg(long)]
    json: bool,
}

fn demo_script() -> Vec<Utterance> {
    vec![
        Utterance::new("welcome to today's lecture"),
        Utterance {
            text: "we will cover sorting algorithms".to_string(),
            confidence: 0.62,
            alternatives: vec![lecture_scribe::Alternative::new(
                "we will cover sorting algorithm",
                0.41,
            )],
        },
        Utterance::new("starting with merge sort"),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.list_languages {
        for language in supported_languages() {
            println!("{}\t{}", language.code, language.name);
        }
        return Ok(());
    }

    let mut cfg = Config::load(&args.config)?;
    if let Some(language) = args.language {
        if find_language(&language).is_none() {
            warn!("Language {} is not in the common list; passing it through", language);
        }
        cfg.session.language = language;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Recognition language: {}", cfg.session.language);

    let script = match &args.script {
        Some(path) => Utterance::load_script(path)?,
        None => demo_script(),
    };

    let utterances = script.len() as u32;
    let provider = SimulatedProvider::new(script);

    // One pass per utterance, each followed by a restart
    let record_for = args.seconds.map(Duration::from_secs).unwrap_or_else(|| {
        (provider.pass_length() + cfg.session.restart.end_delay()) * utterances
            + Duration::from_secs(1)
    });

    let (mut transcription, events) =
        TranscriptionSession::new(cfg.session.clone(), Box::new(provider));

    transcription.on_transcript_update(|update| {
        if !update.transcript.interim.is_empty() {
            info!("… {}", update.transcript.interim);
        }
    });
    transcription.on_error(|kind| match kind.user_action() {
        Some(action) => warn!("{}", action),
        None => info!("Recognition hiccup: {}", kind),
    });

    let (handle, task) = session::spawn(transcription, events);

    handle.start().await?;
    tokio::time::sleep(record_for).await;
    let transcript = handle.stop().await?;
    let stats = handle.stats().await?;

    drop(handle);
    task.await?;

    if args.json {
        let output = serde_json::json!({
            "transcript": transcript,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", transcript.trim_end());
        info!(
            "{} segments, {} restarts, {} errors in {:.1}s",
            stats.segments_count, stats.restarts_count, stats.errors_count, stats.duration_secs
        );
    }

    Ok(())
}
