mod config;
mod render;

use crate::config::Config;
use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use interview_session::types::{SessionSignals, TurnStatus, UserProfile};
use interview_session::utils::SimulatedCamera;
use interview_session::{AccountMenu, PreviewSurface, SessionFrame, SessionShell};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::time::ChronoLocal;

const DEFAULT_QUESTIONS: [&str; 2] = [
    "Tell me about a project you are proud of.",
    "How do you handle disagreements within your team?",
];

/// Runs a scripted interview-practice session against a simulated camera.
#[derive(Parser)]
struct Cli {
    /// Question to ask; repeat for several. Two sample questions by default.
    #[arg(long = "question")]
    questions: Vec<String>,

    /// Make the simulated camera refuse access.
    #[arg(long)]
    deny_camera: bool,

    /// How long the simulated camera takes to open.
    #[arg(long, default_value_t = 250)]
    camera_latency_ms: u64,

    /// Frames to print while listening after each question.
    #[arg(long, default_value_t = 5)]
    ticks: u32,

    /// Signed-in user name. Leave out to run signed out.
    #[arg(long)]
    user: Option<String>,

    /// Email of the signed-in user.
    #[arg(long, requires = "user")]
    email: Option<String>,

    /// Print frames as JSON lines instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load application configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let questions: Vec<String> = if args.questions.is_empty() {
        DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
    } else {
        args.questions.clone()
    };

    let mut camera = SimulatedCamera::new().with_latency(Duration::from_millis(args.camera_latency_ms));
    if args.deny_camera {
        camera = camera.denying();
    }
    let camera = Arc::new(camera);
    let surface = Arc::new(PreviewSurface::new());

    let user = args
        .user
        .clone()
        .map(|name| UserProfile::new(name, args.email.clone().unwrap_or_default()));
    let menu = AccountMenu::new(
        user.clone(),
        || tracing::info!("sign-in requested"),
        || tracing::info!("sign-out requested"),
    );

    let session_config = config.session_config();
    let frame_interval = session_config.frame_interval;
    let mut shell = SessionShell::new(session_config, camera.clone(), surface.clone(), menu);
    let printer = Printer { json: args.json };

    tracing::info!("Starting practice session with {} question(s)", questions.len());
    let mut signals = SessionSignals {
        is_camera_on: true,
        user_name: user.map(|u| u.name),
        ..SessionSignals::default()
    };
    shell.apply(signals.clone());
    let phase = shell.capture().await_settled().await;
    tracing::info!("Camera settled: {:?}", phase);

    signals.is_active = true;
    signals.is_recording = true;
    for question in &questions {
        // Subscribe first so the restart itself is observed.
        let mut reveal = shell.reveal_updates();
        signals.question = question.clone();
        signals.is_speaking = true;
        signals.status = TurnStatus::Speaking;
        shell.apply(signals.clone());

        // A repeated question does not restart, so there may be nothing to wait for.
        if shell.reveal_state().is_complete() {
            printer.print(&shell.frame())?;
        } else {
            while let Some(state) = reveal.next().await {
                printer.print(&shell.frame())?;
                if state.is_complete() {
                    break;
                }
            }
        }

        signals.is_speaking = false;
        signals.status = TurnStatus::Listening;
        shell.apply(signals.clone());
        for _ in 0..args.ticks {
            tokio::time::sleep(frame_interval).await;
            printer.print(&shell.frame())?;
        }
    }

    signals.is_active = false;
    signals.is_recording = false;
    signals.is_camera_on = false;
    signals.status = TurnStatus::Idle;
    shell.apply(signals);
    printer.print(&shell.frame())?;
    drop(shell);

    let leaked = camera.live_streams();
    if leaked > 0 {
        tracing::error!("{} camera stream(s) still live after teardown", leaked);
    } else {
        tracing::info!(
            "Session finished; {} camera request(s), {} preview bind(s)",
            camera.requests(),
            surface.attach_count()
        );
    }
    Ok(())
}

struct Printer {
    json: bool,
}

impl Printer {
    fn print(&self, frame: &SessionFrame) -> Result<()> {
        if self.json {
            let line = serde_json::to_string(frame).context("Failed to serialize frame")?;
            println!("{line}");
        } else {
            println!("{}\n", render::render(frame));
        }
        Ok(())
    }
}
