mod events;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Parser as ClapParser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use events::AppEvent;
use opencore_console::app::{ApiEvent, App, Command};
use opencore_console::client::ApiClient;
use opencore_console::config::{self, Preferences};
use opencore_console::graph::layout::layout_tree;
use opencore_console::heartbeat::HEARTBEAT_INTERVAL;
use opencore_console::theme::Theme;

#[derive(ClapParser, Debug)]
#[command(name = "opencore-console", about = "Terminal client for the OpenCore agent swarm")]
struct Cli {
    /// Base URL of the OpenCore backend.
    #[arg(short, long, env = "OPENCORE_URL", default_value = config::DEFAULT_BASE_URL)]
    url: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Log file (defaults to the config directory).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Preferences file (defaults to the config directory).
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Start with this theme instead of the saved one.
    #[arg(long)]
    theme: Option<String>,

    /// Print the agent tree to stdout instead of launching the TUI.
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let runtime = Runtime::new().wrap_err("Failed to start async runtime")?;
    let client = ApiClient::new(&cli.url, Duration::from_secs(cli.timeout))?;

    if cli.dump {
        init_logging(None)?;
        return runtime.block_on(dump_tree(&client));
    }

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config::config_dir().join(config::LOG_FILE));
    init_logging(Some(&log_path))?;
    tracing::info!(url = %client.base_url(), "starting console");

    let prefs_path = cli
        .prefs
        .clone()
        .unwrap_or_else(|| config::config_dir().join(config::PREFS_FILE));
    let prefs = Preferences::load(&prefs_path);
    let mut app = App::new(prefs, Some(prefs_path));
    if let Some(id) = cli.theme.as_deref() {
        match Theme::from_id(id) {
            Some(theme) => app.theme = theme,
            None => tracing::warn!(theme = id, "unknown theme, keeping saved one"),
        }
    }

    // Launch TUI.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui(&mut terminal, &mut app, &client, &runtime);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .wrap_err_with(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ApiClient,
    runtime: &Runtime,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();

    events::spawn_input_reader(tx.clone());
    events::spawn_timer(tx.clone(), Duration::from_secs(1), || AppEvent::Tick);
    events::spawn_timer(tx.clone(), HEARTBEAT_INTERVAL, || AppEvent::HeartbeatDue);

    for cmd in app.startup_commands() {
        dispatch(cmd, app, client, runtime, &tx);
    }

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        let commands = match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(AppEvent::Key(key)) => app.handle_key(key),
            Ok(AppEvent::Mouse(mouse)) => {
                app.handle_mouse(mouse);
                Vec::new()
            }
            Ok(AppEvent::Tick) => {
                app.tick(Utc::now(), Instant::now());
                Vec::new()
            }
            Ok(AppEvent::HeartbeatDue) => vec![Command::FetchHeartbeat],
            Ok(AppEvent::Api(event)) => app.apply(event),
            Err(mpsc::RecvTimeoutError::Timeout) => Vec::new(),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        for cmd in commands {
            dispatch(cmd, app, client, runtime, &tx);
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("console closed");
    Ok(())
}

/// Run a command against the backend. Network work goes to the runtime and
/// reports back through the channel; nothing here blocks the UI thread.
fn dispatch(
    cmd: Command,
    app: &mut App,
    client: &ApiClient,
    runtime: &Runtime,
    tx: &mpsc::Sender<AppEvent>,
) {
    if let Command::Login(provider) = &cmd {
        app.login_started(provider, client.login_url(provider));
        return;
    }

    let client = client.clone();
    let tx = tx.clone();
    runtime.spawn(async move {
        let event = match cmd {
            Command::FetchAgents => ApiEvent::Agents(client.fetch_agents().await),
            Command::FetchHeartbeat => ApiEvent::Heartbeat(client.heartbeat().await),
            Command::TriggerHeartbeat => ApiEvent::HeartbeatTriggered(client.trigger_heartbeat().await),
            Command::Chat(request) => ApiEvent::Chat(client.chat(&request).await),
            Command::FetchConfig => ApiEvent::Config(client.get_config().await),
            Command::SaveConfig(payload) => ApiEvent::ConfigSaved(client.save_config(&payload).await),
            Command::FetchAuthStatus => ApiEvent::AuthStatus(client.auth_status().await),
            Command::Transcribe(path) => ApiEvent::Transcript(client.transcribe(&path).await),
            Command::Login(_) => return,
        };
        let _ = tx.send(AppEvent::Api(event));
    });
}

async fn dump_tree(client: &ApiClient) -> Result<()> {
    let graph = client
        .fetch_agents()
        .await
        .wrap_err_with(|| format!("Failed to fetch agents from {}", client.base_url()))?;
    let placed = layout_tree(&graph.nodes);

    println!(
        "Swarm at {} ({} agents, {} edges)",
        client.base_url(),
        graph.nodes.len(),
        graph.edges.len(),
    );
    println!();

    for p in &placed {
        let pad = "  ".repeat(p.level + 1);
        let parent = p.node.parent.as_deref().unwrap_or("-");
        print!(
            "{}{} [L{} x={:.0} y={:.0}] parent={}",
            pad, p.node.id, p.level, p.x, p.y, parent
        );
        if let Some(thought) = p.node.visible_thought() {
            print!("  \"{}\"", thought);
        }
        println!();
    }
    Ok(())
}
