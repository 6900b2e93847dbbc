//! bedrock-gate: classify a prompt, then retrieve passages and answer it.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use bedrock_gate::{Config, PipelineBuilder, PipelineOutcome};
use clap::Parser;
use tracing::debug;

/// Heavy-machinery question gate over Amazon Bedrock
#[derive(Parser)]
#[command(name = "bedrock-gate")]
#[command(version = bedrock_gate::PKG_VERSION)]
#[command(about = "Classify a prompt and answer it if it is about heavy machinery")]
struct Args {
    /// Prompt text (or omit to read from stdin)
    prompt: Option<String>,

    /// Config file (default: ~/.bedrock-gate/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model id used for classification and generation
    #[arg(short, long, env = "BEDROCK_MODEL_ID")]
    model: Option<String>,

    /// Knowledge base id
    #[arg(short, long, env = "BEDROCK_KB_ID")]
    kb_id: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Generation temperature, 0 to 1
    #[arg(long)]
    temperature: Option<f32>,

    /// Generation top_p, 0 to 1
    #[arg(long)]
    top_p: Option<f32>,

    /// Never fail: treat service errors as rejection / no passages / empty answer
    #[arg(long)]
    lenient: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialise tracing (default: info; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    debug!(version = %bedrock_gate::version::version_string(), "starting");

    let prompt = resolve_prompt(args.prompt)?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(region) = args.region {
        config.aws.region = region;
    }
    if let Some(model) = args.model {
        config.models.model_id = model;
    }
    if let Some(kb_id) = args.kb_id {
        config.knowledge_base.kb_id = Some(kb_id);
    }
    if let Some(temperature) = args.temperature {
        config.generation.temperature = temperature;
    }
    if let Some(top_p) = args.top_p {
        config.generation.top_p = top_p;
    }

    let pipeline = PipelineBuilder::from_config(&config)?.build()?;
    let outcome = if args.lenient {
        pipeline.run_lenient(&prompt).await
    } else {
        pipeline.run(&prompt).await?
    };

    Ok(report(&outcome))
}

fn report(outcome: &PipelineOutcome) -> ExitCode {
    match outcome {
        PipelineOutcome::Answered {
            category,
            passages,
            response,
        } => {
            println!("prompt classified as {category}: valid for heavy machinery");
            println!("knowledge base results:");
            for (i, passage) in passages.iter().enumerate() {
                match passage.score {
                    Some(score) => println!("  [{}] ({score:.3}) {}", i + 1, passage.text()),
                    None => println!("  [{}] {}", i + 1, passage.text()),
                }
            }
            println!("generated response:");
            println!("{response}");
            ExitCode::SUCCESS
        }
        PipelineOutcome::Rejected { category } => {
            println!("prompt classified as {category}: not Category E (heavy machinery)");
            ExitCode::from(2)
        }
        PipelineOutcome::Unclassified { reason } => {
            println!("prompt could not be classified ({reason}); rejected");
            ExitCode::from(2)
        }
    }
}

/// Prompt from the argument, else from piped stdin.
fn resolve_prompt(arg: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(prompt) = arg.filter(|p| !p.trim().is_empty()) {
        return Ok(prompt);
    }
    if io::stdin().is_terminal() {
        return Err("no prompt given (pass it as an argument or pipe it on stdin)".into());
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    let trimmed = buf.trim();
    if trimmed.is_empty() {
        return Err("empty prompt on stdin".into());
    }
    Ok(trimmed.to_string())
}
