mod display;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use poliscope_client::PolicyClient;
use poliscope_core::{present_decision, Session};

#[derive(Parser)]
#[command(name = "poliscope", version, about = "Ask questions about an insurance policy")]
struct Cli {
    /// Backend base URL.
    #[arg(
        long,
        env = "POLISCOPE_API_URL",
        default_value = "http://localhost:8888"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a policy and ask a single question.
    Ask {
        /// Policy document (PDF).
        policy: PathBuf,
        /// Free-text question about the policy.
        question: String,
    },
    /// Upload a policy, then ask questions interactively.
    Session {
        /// Policy document (PDF).
        policy: PathBuf,
    },
    /// Probe backend connectivity.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("poliscope v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let client = PolicyClient::new(cli.api_url);

    match cli.command {
        Command::Ask { policy, question } => {
            let mut session = upload(&client, &policy).await?;
            ask_one(&client, &mut session, &question).await;
            Ok(())
        }
        Command::Session { policy } => {
            let mut session = upload(&client, &policy).await?;
            run_session(&client, &mut session).await
        }
        Command::Health => {
            let health = client.health().await?;
            println!("backend status: {}", health.status);
            Ok(())
        }
    }
}

/// Upload the policy and return a session in `PolicyReady`.
async fn upload(client: &PolicyClient, policy: &Path) -> anyhow::Result<Session> {
    let bytes = std::fs::read(policy).with_context(|| format!("reading {}", policy.display()))?;
    let file_name = policy
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let message = client.upload_policy(&file_name, bytes).await?;
    let mut session = Session::new();
    session.policy_ingested();
    if !message.is_empty() {
        println!("{message}");
    }
    Ok(session)
}

/// Submit one question and print the outcome.
///
/// Local rejections and transport failures print their messages verbatim;
/// neither aborts the program.
async fn ask_one(client: &PolicyClient, session: &mut Session, question: &str) {
    let ticket = match session.submit(question) {
        Ok(ticket) => ticket,
        Err(rejection) => {
            println!("{rejection}");
            return;
        }
    };

    match client.ask(question).await {
        Ok(decision) => {
            if session.resolve(ticket, decision)
                && let Some(decision) = session.decision()
            {
                display::print_decision(&present_decision(decision));
            }
        }
        Err(failure) => {
            if session.fail(ticket, failure.to_string())
                && let Some(reason) = session.failure()
            {
                println!("Question failed: {reason}");
            }
        }
    }
}

/// Read questions from stdin until EOF or an exit word. One question is in
/// flight at a time; the loop awaits each answer before prompting again.
async fn run_session(client: &PolicyClient, session: &mut Session) -> anyhow::Result<()> {
    println!("Ask a question about the policy (\"exit\" to quit).");
    let stdin = io::stdin();
    loop {
        print!("? ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        ask_one(client, session, question).await;
    }
    Ok(())
}
