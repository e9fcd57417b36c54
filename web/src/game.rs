use crate::storage::LocalStorageStore;
use crate::utils::*;
use cardmatch_core as game;
use clap::{Args, ValueEnum};
use game::UserDataService;
use gloo::timers::callback::{Interval, Timeout};
use yew::prelude::*;

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ModeArg {
    Pairs,
    FindTheFruit,
}

impl From<ModeArg> for game::GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pairs => Self::PairMatch,
            ModeArg::FindTheFruit => Self::TargetHunt,
        }
    }
}

impl StorageKey for game::GameMode {
    const KEY: &'static str = "cardmatch:mode";
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCardState {
    Hidden,
    Up,
    Resolved,
}

impl ViewCardState {
    const fn class(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Up => "up",
            Self::Resolved => "resolved",
        }
    }
}

/// Face and styling of the card at `coords`.
fn card_view(state: &game::GameState, coords: game::Coord2) -> (ViewCardState, &str) {
    use game::CellState::*;

    let face = state.symbol_at(coords).unwrap_or(game::HIDDEN_FACE);
    let view_state = match state.cell_at(coords).unwrap_or_default() {
        Hidden => ViewCardState::Hidden,
        Revealed | PendingReset => ViewCardState::Up,
        Resolved => ViewCardState::Resolved,
    };
    (view_state, face)
}

/// Labelled figures shown above the board.
fn status_items(state: &game::GameState) -> Vec<(&'static str, String)> {
    let time = format!("{}s", state.elapsed_seconds());
    match state.mode() {
        game::GameMode::TargetHunt => vec![
            ("Find", state.target().unwrap_or(game::HIDDEN_FACE).to_string()),
            ("Score", state.score().to_string()),
            ("Attempts", state.attempts_left().to_string()),
            ("Time", time),
        ],
        game::GameMode::PairMatch => vec![
            ("Matched", state.correct_count().to_string()),
            ("Guesses", state.total_guesses().to_string()),
            ("Time", time),
        ],
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Select(game::Coord2),
    ResetDue(game::ResetTicket),
    Tick,
    NewGame,
    SwitchMode(game::GameMode),
    RecordResults,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    row: game::Coord,
    col: game::Coord,
    face: String,
    card_state: ViewCardState,
    #[prop_or_default]
    selectable: bool,
    callback: Callback<game::Coord2>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        row,
        col,
        face,
        card_state,
        selectable,
        callback,
    } = props.clone();

    let class = classes!(
        "card",
        card_state.class(),
        selectable.then_some("selectable")
    );

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) clicked", row, col);
        callback.emit((row, col));
    });

    html! {
        <td {class} {onclick}>{face}</td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Game to open with instead of the last one played
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    config: game::GameConfig,
    engine: Option<game::BoardEngine>,
    pending_resets: Vec<(game::ResetTicket, Timeout)>,
    users: UserDataService<LocalStorageStore>,
    _tick_interval: Interval,
}

impl GameView {
    fn start_engine(seed: u64, config: &game::GameConfig) -> Option<game::BoardEngine> {
        match game::BoardEngine::new(seed, config) {
            Ok(engine) => Some(engine),
            Err(err) => {
                log::error!("Could not start game: {}", err);
                None
            }
        }
    }

    fn new_game(&mut self) -> bool {
        // dropping a gloo timeout cancels it
        self.pending_resets.clear();

        match self.engine.as_mut() {
            Some(engine) => {
                if let Err(err) = engine.new_game(&self.config) {
                    log::error!("Could not start game: {}", err);
                    return false;
                }
            }
            None => self.engine = Self::start_engine(js_random_seed(), &self.config),
        }
        true
    }

    fn select(&mut self, ctx: &Context<Self>, coords: game::Coord2) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };

        match engine.select_cell(coords) {
            Ok(result) => {
                log::debug!("select {:?}: {:?}", coords, result);
                if let Some(ticket) = result.reset_ticket() {
                    self.schedule_reset(ctx, ticket.clone());
                }
                if result.ends_game() {
                    log::info!("Game over: {}", self.summary_text());
                }
                result.has_update()
            }
            Err(err) => {
                log::error!("Rejected selection {:?}: {}", coords, err);
                false
            }
        }
    }

    fn schedule_reset(&mut self, ctx: &Context<Self>, ticket: game::ResetTicket) {
        let link = ctx.link().clone();
        let delivered = ticket.clone();
        let timeout = Timeout::new(ticket.delay_ms(), move || {
            link.send_message(Msg::ResetDue(delivered))
        });
        self.pending_resets.push((ticket, timeout));
    }

    fn complete_reset(&mut self, ticket: game::ResetTicket) -> bool {
        self.pending_resets.retain(|(pending, _)| *pending != ticket);

        self.engine.as_mut().is_some_and(|engine| {
            matches!(engine.complete_reset(&ticket), game::ResetOutcome::Applied)
        })
    }

    fn record_results(&self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let Some(user_id) = self.users.user_id() else {
            log::warn!("No user id stored, results cannot be recorded");
            return;
        };

        let link = game::ResultsLink::new(user_id, engine.state().final_score());
        log::info!("Opening results page: {}", link);
        if let Err(err) = gloo::utils::window().location().set_href(&link.to_string()) {
            log::error!("Could not open results page: {:?}", err);
        }
    }

    fn summary_text(&self) -> String {
        self.engine
            .as_ref()
            .map(|engine| engine.state().summary().to_string())
            .unwrap_or_default()
    }

    fn is_game_over(&self) -> bool {
        self.engine.as_ref().is_some_and(|engine| engine.is_game_over())
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(game::TICK_INTERVAL_MS, move || link.send_message(Msg::Tick))
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mode = props
            .mode
            .map(game::GameMode::from)
            .unwrap_or_else(game::GameMode::local_or_default);
        let config = game::GameConfig::for_mode(mode);
        let seed = props.seed.unwrap_or_else(js_random_seed);

        Self {
            engine: Self::start_engine(seed, &config),
            config,
            pending_resets: Vec::new(),
            users: UserDataService::new(LocalStorageStore),
            _tick_interval: GameView::create_timer(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Select(coords) => self.select(ctx, coords),
            ResetDue(ticket) => self.complete_reset(ticket),
            Tick => match self.engine.as_mut() {
                Some(engine) if !engine.is_game_over() => {
                    engine.tick();
                    true
                }
                _ => false,
            },
            NewGame => self.new_game(),
            SwitchMode(mode) => {
                mode.local_save();
                if self.config.mode == mode {
                    return false;
                }
                self.config = game::GameConfig::for_mode(mode);
                self.new_game()
            }
            RecordResults => {
                self.record_results();
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let Some(state) = self.engine.as_ref().map(|engine| engine.state()) else {
            return html! {
                <div class="cardmatch">
                    <p>{"Could not start the game."}</p>
                </div>
            };
        };

        let (rows, cols) = state.size();
        let is_over = self.is_game_over();
        let can_record = !self.users.needs_registration();
        let summary = self.summary_text();

        let cb_new_game = ctx.link().callback(|_| NewGame);
        let cb_pairs = ctx
            .link()
            .callback(|_| SwitchMode(game::GameMode::PairMatch));
        let cb_hunt = ctx
            .link()
            .callback(|_| SwitchMode(game::GameMode::TargetHunt));
        let cb_record = ctx.link().callback(|_| RecordResults);

        html! {
            <div class="cardmatch">
                <nav>
                    <button onclick={cb_pairs}>{"Pairs"}</button>
                    <button onclick={cb_hunt}>{"Find the Fruit"}</button>
                </nav>
                <header>
                    {
                        for status_items(state).into_iter().map(|(label, value)| html! {
                            <aside>{format!("{}: {}", label, value)}</aside>
                        })
                    }
                    <aside>{format_for_counter(state.elapsed_seconds())}</aside>
                </header>
                <table class={(!is_over).then_some("playable")}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let coords = (row, col);
                                        let (card_state, face) = card_view(state, coords);
                                        let face = face.to_string();
                                        let selectable = state.can_select_at(coords);
                                        let callback = ctx.link().callback(Msg::Select);
                                        html! {
                                            <CardView {row} {col} {face} {card_state} {selectable} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <dialog open={is_over}>
                    <article>
                        <h2>{"Game Over"}</h2>
                        <p>{summary}</p>
                        <footer>
                            <button onclick={cb_new_game}>{"Play Again"}</button>
                            <button onclick={cb_record} disabled={!can_record}>{"Record the Results"}</button>
                        </footer>
                    </article>
                </dialog>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_state() -> game::GameState {
        let layout = game::BoardLayout::from_rows(
            game::GameMode::PairMatch,
            &[&["🍎", "🍌"], &["🍌", "🍎"]],
            None,
        )
        .unwrap();
        game::GameState::new(layout)
    }

    #[test]
    fn hidden_cards_show_placeholder_face() {
        let state = pair_state();
        assert_eq!(
            card_view(&state, (0, 0)),
            (ViewCardState::Hidden, game::HIDDEN_FACE)
        );
    }

    #[test]
    fn selected_and_matched_cards_show_their_symbol() {
        let mut state = pair_state();
        state.select_cell((0, 0)).unwrap();
        assert_eq!(card_view(&state, (0, 0)), (ViewCardState::Up, "🍎"));

        state.select_cell((1, 1)).unwrap();
        assert_eq!(card_view(&state, (1, 1)), (ViewCardState::Resolved, "🍎"));
    }

    #[test]
    fn hunt_status_names_the_target() {
        let layout = game::BoardLayout::from_rows(
            game::GameMode::TargetHunt,
            &[&["🍎", "🍌"], &["🍇", "🍉"]],
            Some("🍌"),
        )
        .unwrap();
        let state = game::GameState::new(layout);

        let items = status_items(&state);
        assert_eq!(items[0], ("Find", "🍌".to_string()));
        assert_eq!(items[2], ("Attempts", "2".to_string()));
    }

    #[test]
    fn mode_args_map_onto_game_modes() {
        assert_eq!(
            game::GameMode::from(ModeArg::FindTheFruit),
            game::GameMode::TargetHunt
        );
        assert_eq!(game::GameMode::from(ModeArg::Pairs), game::GameMode::PairMatch);
        assert_eq!(<game::GameMode as StorageKey>::KEY, "cardmatch:mode");
    }
}
