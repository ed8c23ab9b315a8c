//! Command-line front end: ingest a text file, run the loop, print the trace.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use futures::{StreamExt, pin_mut};
use tracing::info;
use tracing_subscriber::EnvFilter;

use selfrag_core::WorkflowState;
use selfrag_grading::{AdequacyGrader, GroundednessGrader, LlmQueryRewriter, RagGenerator, RelevanceGrader};
use selfrag_index::{InMemoryIndex, TextSplitter};
use selfrag_llm::{BackendKind, UnifiedProvider};
use selfrag_workflow::{Workflow, WorkflowConfig, WorkflowEvent};

#[derive(Parser, Debug)]
#[command(name = "selfrag", about = "Ask questions against a document with self-corrective retrieval")]
struct Cli {
    /// The question to answer
    question: String,

    /// Plain-text document to ingest (pre-extracted; PDF parsing is out of scope)
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// Model backend: openai, anthropic, ollama, groq or mistral
    #[arg(long, default_value = "openai")]
    backend: BackendKind,

    /// Model name for the chosen backend
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Passages requested per retrieval
    #[arg(long, default_value_t = 4)]
    top_k: usize,

    /// Maximum executed steps before the run aborts
    #[arg(long, default_value_t = 12)]
    step_budget: u32,

    /// Per-call timeout for model calls, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Splitter chunk size in characters
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Splitter chunk overlap in characters
    #[arg(long, default_value_t = 200)]
    chunk_overlap: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let splitter = TextSplitter::new(cli.chunk_size, cli.chunk_overlap)?;
    let passages = splitter.split_into_passages(&text);
    if passages.is_empty() {
        bail!("{} contains no usable text", cli.file.display());
    }
    info!(passages = passages.len(), "built index");
    let index = Arc::new(InMemoryIndex::build(passages));

    let provider = Arc::new(UnifiedProvider::from_env(cli.backend, cli.model.clone())?);

    let config = WorkflowConfig {
        step_budget: cli.step_budget,
        retrieve_k: cli.top_k,
        per_call_timeout_ms: cli.timeout_ms,
    };
    let timeout = config.per_call_timeout();

    let workflow = Workflow::new(
        index,
        Arc::new(RelevanceGrader::new(provider.clone()).with_timeout(timeout)),
        Arc::new(GroundednessGrader::new(provider.clone()).with_timeout(timeout)),
        Arc::new(AdequacyGrader::new(provider.clone()).with_timeout(timeout)),
        Arc::new(LlmQueryRewriter::new(provider.clone()).with_timeout(timeout)),
        Arc::new(RagGenerator::new(provider).with_timeout(timeout)),
        config,
    )?;

    let stream = workflow.stream(cli.question);
    pin_mut!(stream);

    let mut outcome = None;
    while let Some(event) = stream.next().await {
        match event {
            Ok(WorkflowEvent::Transition(trace)) => match trace.state {
                WorkflowState::Retrieve => {
                    println!("[{:>2}] retrieving passages ({} found)", trace.step, trace.document_count)
                }
                WorkflowState::GradeDocuments => {
                    println!("[{:>2}] grading relevance ({} kept)", trace.step, trace.document_count)
                }
                WorkflowState::Generate => println!("[{:>2}] generating answer", trace.step),
                WorkflowState::TransformQuery => {
                    println!("[{:>2}] refining query to: {}", trace.step, trace.question)
                }
                _ => {}
            },
            Ok(WorkflowEvent::Completed(result)) => outcome = Some(result),
            Err(err) => bail!("run failed: {err}"),
        }
    }

    let Some(outcome) = outcome else {
        bail!("run produced no outcome");
    };

    println!();
    if outcome.accepted() {
        match outcome.answer {
            Some(answer) => println!("{answer}"),
            None => bail!("accepted run carried no answer"),
        }
    } else {
        println!(
            "No accepted answer within {} steps ({} rewrites, {} generations).",
            outcome.steps_taken, outcome.rewrite_count, outcome.generate_count
        );
        if let Some(answer) = outcome.answer {
            println!("Best attempt so far:\n\n{answer}");
        } else {
            println!("No answer could be produced from the document.");
        }
    }

    Ok(())
}
