//! civic-runner: headless runner for the complaint tracker core.
//!
//! Usage:
//!   civic-runner --db civic.db --data-dir ./data
//!   civic-runner --db civic.db --ipc-mode --scan-interval-secs 60
//!
//! Without --ipc-mode it runs the escalation scheduler until Ctrl-C.
//! With --ipc-mode it also reads one JSON command per stdin line and
//! answers with one JSON line on stdout.

use anyhow::Result;
use civic_core::{
    clock::SystemClock,
    complaint::NewComplaint,
    config::CivicConfig,
    engine::{CivicEngine, Transports},
    error::CivicError,
    escalation::ScanOutcome,
    push::PushHub,
    store::CivicStore,
    types::{Actor, Category, Role, Status},
    user::NewUser,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    RegisterUser { user: NewUser },
    CreateComplaint { actor: Actor, complaint: NewComplaint },
    SetStatus { actor: Actor, complaint_id: String, status: String },
    Upvote { actor: Actor, complaint_id: String },
    Feedback { actor: Actor, complaint_id: String, rating: u8, comment: Option<String> },
    Comment { actor: Actor, complaint_id: String, text: String },
    GetComplaint { complaint_id: String },
    ListComplaints { actor: Actor, status: Option<Status>, category: Option<Category> },
    Notifications { actor: Actor },
    MarkRead { actor: Actor, notification_id: String },
    MarkAllRead { actor: Actor },
    ListUsers { actor: Actor },
    GetSettings,
    UpsertSetting { actor: Actor, key: String, value: serde_json::Value },
    Scan,
    Analytics { actor: Actor },
    PublicStats,
    MapPoints,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "civic.db".to_string());
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "./data".to_string());

    let mut config = CivicConfig::load(&data_dir)?;
    config.escalation.interval_secs =
        parse_arg(&args, "--scan-interval-secs", config.escalation.interval_secs).max(1);

    if !ipc_mode {
        println!("civic-runner");
        println!("  db:            {db}");
        println!("  data_dir:      {data_dir}");
        println!("  scan interval: {}s", config.escalation.interval_secs);
        println!();
    }

    let store = CivicStore::open(&db)?;
    store.migrate()?;

    let hub = Arc::new(PushHub::new());
    let transports = Transports::logging(&config, hub);
    let engine = Arc::new(CivicEngine::build(
        Arc::new(store),
        config,
        Arc::new(SystemClock),
        transports,
    ));

    let scheduler = engine.start_scheduler();

    if ipc_mode {
        let ipc_engine = engine.clone();
        tokio::task::spawn_blocking(move || run_ipc_loop(&ipc_engine)).await??;
    } else {
        tokio::signal::ctrl_c().await?;
        log::info!("Ctrl-C received, stopping");
    }

    if let Some(handle) = scheduler {
        handle.shutdown().await;
    }
    if !ipc_mode {
        print_summary(&engine)?;
    }
    Ok(())
}

fn run_ipc_loop(engine: &CivicEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(engine, cmd) {
            Ok(value) => serde_json::json!({ "ok": value }),
            Err(e) => serde_json::json!({
                "error": e.to_string(),
                "kind": format!("{:?}", e.kind()),
            }),
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(engine: &CivicEngine, cmd: IpcCommand) -> Result<serde_json::Value, CivicError> {
    use serde_json::json;

    let value = match cmd {
        IpcCommand::RegisterUser { user } => json!(engine.users.register(user)?),
        IpcCommand::CreateComplaint { actor, complaint } => {
            json!(engine.complaints.create(&actor, complaint)?)
        }
        IpcCommand::SetStatus { actor, complaint_id, status } => {
            let change = engine.status.set_status(&complaint_id, &status, &actor)?;
            json!({
                "complaint": change.complaint,
                "notification_failures": change.delivery.failure_count(),
            })
        }
        IpcCommand::Upvote { actor, complaint_id } => {
            json!(engine.complaints.toggle_upvote(&complaint_id, &actor)?)
        }
        IpcCommand::Feedback { actor, complaint_id, rating, comment } => {
            json!(engine.complaints.submit_feedback(&complaint_id, &actor, rating, comment)?)
        }
        IpcCommand::Comment { actor, complaint_id, text } => {
            json!(engine.comments.add(&complaint_id, &actor, &text)?)
        }
        IpcCommand::GetComplaint { complaint_id } => {
            json!({
                "complaint": engine.complaints.get(&complaint_id)?,
                "comments": engine.comments.list(&complaint_id)?,
            })
        }
        IpcCommand::ListComplaints { actor, status, category } => {
            let list = if actor.role == Role::Admin {
                engine.complaints.list_all(&actor, status, category)?
            } else {
                engine.complaints.list_mine(&actor)?
            };
            json!({ "count": list.len(), "complaints": list })
        }
        IpcCommand::Notifications { actor } => json!(engine.inbox.list(&actor)?),
        IpcCommand::MarkRead { actor, notification_id } => {
            engine.inbox.mark_read(&notification_id, &actor)?;
            json!({ "read": notification_id })
        }
        IpcCommand::MarkAllRead { actor } => json!({ "updated": engine.inbox.mark_all_read(&actor)? }),
        IpcCommand::ListUsers { actor } => json!(engine.users.list(&actor)?),
        IpcCommand::GetSettings => json!(engine.settings.get_all()?),
        IpcCommand::UpsertSetting { actor, key, value } => {
            engine.settings.upsert(&actor, &key, value)?;
            json!({ "key": key })
        }
        IpcCommand::Scan => match engine.run_scan()? {
            ScanOutcome::Completed(report) => json!({
                "examined": report.examined,
                "escalated": report.escalated,
                "failed": report.failed.len(),
            }),
            ScanOutcome::Skipped => json!({ "skipped": true }),
        },
        IpcCommand::Analytics { actor } => json!(engine.analytics.analytics(&actor)?),
        IpcCommand::PublicStats => json!(engine.analytics.public_stats()?),
        IpcCommand::MapPoints => json!(engine.analytics.map_points()?),
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(value)
}

fn print_summary(engine: &CivicEngine) -> Result<()> {
    let stats = engine.analytics.public_stats()?;
    let escalated = engine.store.escalated_count()?;

    println!("=== SUMMARY ===");
    println!("  complaints:     {}", stats.total);
    println!("  resolved:       {}", stats.resolved);
    println!("  open:           {}", stats.pending);
    println!("  escalated:      {escalated}");
    for c in &stats.categories {
        println!("  {:<14}  {}", c.category.as_str(), c.count);
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
