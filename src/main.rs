//! Places TUI - search places by name prefix, page through the results

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use places::action::Action;
use places::api::{self, PlacesClient};
use places::components::{Component, PlacesLayout, PlacesView, PlacesViewProps};
use places::config::{self, ApiConfig, DEFAULT_TIMEOUT_SECS};
use places::effect::Effect;
use places::reducer::reducer;
use places::shortcut;
use places::state::{AppState, Focus, DEFAULT_COUNTRY, DEFAULT_PAGE_SIZE, SPINNER_TICK_MS};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

const FETCH_TASK: &str = "places";

/// Places TUI - paginated place search
#[derive(Parser, Debug)]
#[command(name = "places")]
#[command(about = "Search places by name prefix and page through the results")]
struct Args {
    /// Places endpoint
    #[arg(long, env = "API_BASE_URL")]
    api_base_url: Option<String>,

    /// Value of the host identifier header
    #[arg(long, env = "API_HOST_HEADER")]
    api_host: Option<String>,

    /// Value of the API key header
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Country filter sent with every search
    #[arg(long, env = "PLACES_COUNTRY", default_value = DEFAULT_COUNTRY)]
    country: String,

    /// Initial items per page (1-10)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Search to run on startup
    #[arg(long, short)]
    query: Option<String>,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PlacesComponentId {
    Search,
    Results,
    PageSize,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PlacesContext {
    Search,
    Results,
    PageSize,
}

impl EventRoutingState<PlacesComponentId, PlacesContext> for AppState {
    fn focused(&self) -> Option<PlacesComponentId> {
        match self.focus {
            Focus::Search => Some(PlacesComponentId::Search),
            Focus::Results => Some(PlacesComponentId::Results),
            Focus::PageSize => Some(PlacesComponentId::PageSize),
        }
    }

    fn modal(&self) -> Option<PlacesComponentId> {
        None
    }

    fn binding_context(&self, id: PlacesComponentId) -> PlacesContext {
        match id {
            PlacesComponentId::Search => PlacesContext::Search,
            PlacesComponentId::Results => PlacesContext::Results,
            PlacesComponentId::PageSize => PlacesContext::PageSize,
        }
    }

    fn default_context(&self) -> PlacesContext {
        PlacesContext::Search
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    dotenv::dotenv().ok();

    let Args {
        api_base_url,
        api_host,
        api_key,
        country,
        page_size,
        query,
        timeout_secs,
        log_file,
        debug: debug_args,
    } = Args::parse();

    if let Some(path) = log_file {
        init_logging(&path)?;
    }

    let api_config = ApiConfig::new(api_base_url, api_host, api_key, timeout_secs);
    info!(base_url = %api_config.base_url, %country, "starting places");
    let client = PlacesClient::new(api_config).map_err(io::Error::other)?;
    api::install_client(client).map_err(io::Error::other)?;

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let page_size = config::initial_page_size(page_size);
    let state = debug
        .load_state_or_else_async(move || async move {
            let state = AppState::new(country, page_size);
            let state = match query {
                Some(query) => state.with_query(query),
                None => state,
            };
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

struct PlacesUi {
    view: PlacesView,
}

impl PlacesUi {
    fn new() -> Self {
        Self {
            view: PlacesView::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PlacesComponentId>,
    ) {
        let layout = PlacesLayout::new(area);
        event_ctx.set_component_area(PlacesComponentId::Search, layout.search);
        event_ctx.set_component_area(PlacesComponentId::Results, layout.results);
        event_ctx.set_component_area(PlacesComponentId::PageSize, layout.page_size);

        let props = PlacesViewProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.view.render(frame, area, props);
    }

    fn respond(actions: Vec<Action>) -> HandlerResponse<Action> {
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        Self::respond(self.view.handle_search_event(event, state))
    }

    fn handle_results_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        Self::respond(self.view.handle_results_event(event, state))
    }

    fn handle_page_size_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        Self::respond(self.view.handle_page_size_event(event, state))
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PlacesUi::new()));
    // Handlers, including the global shortcut, live as long as the bus.
    let mut bus: EventBus<AppState, Action, PlacesComponentId, PlacesContext> = EventBus::new();
    let keybindings: Keybindings<PlacesContext> = Keybindings::new();

    let ui_search = Rc::clone(&ui);
    bus.register(PlacesComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_results = Rc::clone(&ui);
    bus.register(PlacesComponentId::Results, move |event, state| {
        ui_results
            .borrow_mut()
            .handle_results_event(&event.kind, state)
    });

    let ui_page_size = Rc::clone(&ui);
    bus.register(PlacesComponentId::PageSize, move |event, state| {
        ui_page_size
            .borrow_mut()
            .handle_page_size_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match &event.kind {
        // Re-render on terminal resize (no action needed, just redraw)
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        kind => match shortcut::global_action(kind) {
            Some(action) => HandlerResponse::action(action),
            None => HandlerResponse::ignored(),
        },
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchPlaces(query) => {
            // One task key: a newer fetch aborts the one in flight.
            ctx.tasks().spawn(FETCH_TASK, async move {
                let seq = query.seq;
                let fetched = match api::places_client() {
                    Ok(client) => client.fetch_places(&query).await,
                    Err(e) => Err(e),
                };
                match fetched {
                    Ok(results) => {
                        info!(
                            seq,
                            rows = results.records.len(),
                            total = results.total_count,
                            "places loaded"
                        );
                        Action::PlacesDidLoad { seq, results }
                    }
                    Err(e) => {
                        error!(seq, error = %e, "places fetch failed");
                        Action::PlacesDidError {
                            seq,
                            error: e.to_string(),
                        }
                    }
                }
            });
        }
        Effect::CancelFetch => {
            ctx.tasks().cancel(&TaskKey::new(FETCH_TASK));
        }
    }
}
