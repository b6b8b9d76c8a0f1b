//! calmtype - interactive shell for the typing mediation coordinator
//!
//! Simulates a host keyboard on the terminal: typed lines feed the buffer,
//! an empty line acts as a trigger point, and the risk banner and rewrite
//! suggestions are printed as they change.

use anyhow::Result;
use calmtype::api::MediationClient;
use calmtype::config::Config;
use calmtype::coordinator::{Coordinator, SessionEvent};
use calmtype::risk::RiskLevel;
use clap::Parser;
use std::io::BufRead;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "calmtype",
    about = "A caring typing companion that flags risky messages and offers calmer rewrites",
    version
)]
struct Args {
    /// Mediation service base URL (overrides config and CALMTYPE_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Rewrite tone: calm, friendly, or professional
    #[arg(long)]
    tone: Option<String>,

    /// Language hint: auto, en, fr, ar, or darija
    #[arg(long)]
    lang: Option<String>,

    /// Persist the effective settings to the config file
    #[arg(long)]
    save: bool,

    /// Check service health and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("calmtype=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(tone) = &args.tone {
        config.tone = tone.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if let Some(lang) = &args.lang {
        config.lang_hint = lang.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }

    if args.save {
        config.save()?;
        eprintln!("Settings saved to {}", Config::config_location());
    }

    let client = Arc::new(MediationClient::new(config.effective_base_url())?);

    if args.health {
        if client.check_health().await {
            println!("Mediation service is available ({})", client.base_url());
            return Ok(());
        }
        println!("Mediation service is unavailable ({})", client.base_url());
        std::process::exit(1);
    }

    eprintln!("calmtype interactive session ({})", client.base_url());
    eprintln!("  type a line to feed the buffer (debounced mediation)");
    eprintln!("  press enter on an empty line for a trigger point");
    eprintln!("  commands: /rewrite  /clear  /quit");
    eprintln!();

    // Stdin is blocking; read it on its own thread and hand lines to the
    // owning loop over a channel.
    let (line_tx, line_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    let mut coordinator = Coordinator::new(client, config);
    coordinator.start();

    let mut view = ViewState::default();
    loop {
        let now = Instant::now();
        coordinator.tick(now);
        coordinator.drain_messages(now);
        render_changes(&mut coordinator, &mut view);

        match line_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(line) => {
                let now = Instant::now();
                match line.trim() {
                    "/quit" => break,
                    "/clear" => coordinator.handle_event(SessionEvent::FieldReset, now),
                    "/rewrite" => coordinator.handle_event(SessionEvent::RewriteRequested, now),
                    "" => coordinator.handle_event(SessionEvent::TriggerPoint, now),
                    text => {
                        coordinator.handle_event(SessionEvent::TextCommitted(text.to_string()), now)
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    coordinator.stop();
    Ok(())
}

/// What was last printed, so the loop only reports changes.
#[derive(Default)]
struct ViewState {
    level: RiskLevel,
    banner_visible: bool,
    suggestion_ids: Vec<Uuid>,
    availability: Option<bool>,
}

fn render_changes(coordinator: &mut Coordinator, view: &mut ViewState) {
    if let Some(toast) = coordinator.take_toast() {
        println!("  ! {}", toast);
    }

    if view.availability != coordinator.availability() {
        view.availability = coordinator.availability();
        match view.availability {
            Some(true) => eprintln!("  (service online)"),
            Some(false) => eprintln!("  (service offline - local suggestions only)"),
            None => {}
        }
    }

    let level = coordinator.risk_state().level;
    let visible = coordinator.banner_visible();
    if level != view.level || visible != view.banner_visible {
        if visible {
            let explanation = coordinator.risk_state().explanation.clone();
            if explanation.is_empty() {
                println!("  [{}]", level.badge());
            } else {
                println!("  [{}] {}", level.badge(), explanation);
            }
        } else if view.banner_visible {
            println!("  [SAFE]");
        }
        view.level = level;
        view.banner_visible = visible;
    }

    let ids: Vec<Uuid> = coordinator.suggestions().iter().map(|s| s.id).collect();
    if ids != view.suggestion_ids {
        view.suggestion_ids = ids;
        for suggestion in coordinator.suggestions() {
            match &suggestion.reason {
                Some(reason) => println!(
                    "  > [{}] {} ({})",
                    suggestion.tag.label(),
                    suggestion.text,
                    reason
                ),
                None => println!("  > [{}] {}", suggestion.tag.label(), suggestion.text),
            }
        }
    }
}
