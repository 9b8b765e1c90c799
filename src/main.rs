use anyhow::Context;
use clap::{Parser, Subcommand};
use meeting_steward::adapters::services::asr::WhisperXService;
use meeting_steward::adapters::services::llm::OllamaService;
use meeting_steward::adapters::storage::SqliteStorage;
use meeting_steward::config::AppConfig;
use meeting_steward::pipeline::Pipeline;
use meeting_steward::ports::storage::StoragePort;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "steward", about = "Meeting analysis pipeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a meeting recording
    Audio {
        /// Path to the audio file (WAV)
        path: String,
        /// LLM model override
        #[arg(long)]
        model: Option<String>,
        /// Sampling temperature override
        #[arg(long)]
        temperature: Option<f32>,
    },
    /// Analyze a meeting transcript
    Text {
        /// Path to the transcript file
        path: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        temperature: Option<f32>,
    },
    /// Print a stored meeting as JSON
    Show {
        /// Meeting ID
        id: String,
    },
    /// List recent meetings, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

fn open_storage(config: &AppConfig) -> anyhow::Result<SqliteStorage> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create data directory {}", parent.display()))?;
    }
    let storage = SqliteStorage::new(config.db_path.clone()).context("open database")?;
    storage.run_migrations().context("run migrations")?;
    Ok(storage)
}

fn build_pipeline(config: &AppConfig, storage: Arc<SqliteStorage>) -> Pipeline {
    let llm = Arc::new(OllamaService::new(
        config.ollama_host.clone(),
        config.llm_timeout,
    ));
    let speech = Arc::new(WhisperXService::new(
        config.speech_host.clone(),
        config.speech_timeout,
    ));
    Pipeline::new(config.clone(), llm, speech, storage)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let storage = Arc::new(open_storage(&config)?);

    match cli.command {
        Command::Audio {
            path,
            model,
            temperature,
        } => {
            let pipeline = build_pipeline(&config, storage);
            let meeting = pipeline
                .run_from_audio(&path, model, temperature)
                .await
                .context("audio flow failed")?;
            println!("{}", serde_json::to_string_pretty(&meeting)?);
        }
        Command::Text {
            path,
            model,
            temperature,
        } => {
            let transcript = std::fs::read_to_string(&path)
                .with_context(|| format!("read transcript {}", path))?;
            let pipeline = build_pipeline(&config, storage);
            let meeting = pipeline
                .run_from_text(&transcript, model, temperature)
                .await
                .context("text flow failed")?;
            println!("{}", serde_json::to_string_pretty(&meeting)?);
        }
        Command::Show { id } => match storage.get_meeting(&id).await? {
            Some(meeting) => println!("{}", serde_json::to_string_pretty(&meeting)?),
            None => anyhow::bail!("no meeting with id {}", id),
        },
        Command::List { limit } => {
            let summaries = storage.list_meetings(limit).await?;
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }

    Ok(())
}
