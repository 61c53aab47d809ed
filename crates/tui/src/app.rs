use nlq_core::examples::EXAMPLE_QUERIES;
use nlq_core::state::{self, Effect, Msg as ViewMsg, QueryEdit, SchemaFailurePolicy, ViewState};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const RESULTS_SCROLL_STEP: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Input,
    Examples,
    Schema,
}

impl Focus {
    pub(crate) fn next(self) -> Self {
        match self {
            Self::Input => Self::Examples,
            Self::Examples => Self::Schema,
            Self::Schema => Self::Input,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            Self::Input => Self::Schema,
            Self::Examples => Self::Input,
            Self::Schema => Self::Examples,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Input => "Query",
            Self::Examples => "Examples",
            Self::Schema => "Schema",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectionKey {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Msg {
    Quit,
    ToggleHelp,
    FocusNext,
    FocusPrevious,
    Activate,
    Navigate(DirectionKey),
    Char(char),
    Backspace,
    ClearInput,
    ScrollResults(DirectionKey),
    Tick,
}

#[derive(Debug, Clone)]
pub struct TuiSettings {
    pub backend_url: String,
    pub schema_policy: SchemaFailurePolicy,
}

#[derive(Debug)]
pub(crate) struct TuiApp {
    pub(crate) view: ViewState,
    pub(crate) focus: Focus,
    pub(crate) selected_example: usize,
    pub(crate) results_scroll: u16,
    pub(crate) show_help: bool,
    pub(crate) should_quit: bool,
    pub(crate) backend_url: String,
    spinner_frame: usize,
}

impl TuiApp {
    pub(crate) fn new(settings: TuiSettings) -> Self {
        Self {
            view: ViewState::new(settings.schema_policy),
            focus: Focus::Input,
            selected_example: 0,
            results_scroll: 0,
            show_help: false,
            should_quit: false,
            backend_url: settings.backend_url,
            spinner_frame: 0,
        }
    }

    pub(crate) fn handle(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Quit => {
                self.should_quit = true;
                None
            }
            Msg::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
            Msg::FocusNext => {
                self.focus = self.focus.next();
                None
            }
            Msg::FocusPrevious => {
                self.focus = self.focus.previous();
                None
            }
            Msg::Activate => self.activate(),
            Msg::Navigate(direction) => {
                if self.focus == Focus::Examples {
                    self.move_example_selection(direction);
                }
                None
            }
            Msg::Char(ch) => self.on_char(ch),
            Msg::Backspace => self.edit(QueryEdit::Backspace),
            Msg::ClearInput => self.edit(QueryEdit::Clear),
            Msg::ScrollResults(direction) => {
                self.results_scroll = match direction {
                    DirectionKey::Up => self.results_scroll.saturating_sub(RESULTS_SCROLL_STEP),
                    DirectionKey::Down => self.results_scroll.saturating_add(RESULTS_SCROLL_STEP),
                };
                None
            }
            Msg::Tick => {
                if self.view.is_loading() {
                    self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
                }
                None
            }
        }
    }

    /// Feeds a view message (user intent or backend completion) through the reducer.
    pub(crate) fn apply(&mut self, msg: ViewMsg) -> Option<Effect> {
        let effect = state::update(&mut self.view, msg);
        if matches!(effect, Some(Effect::SubmitQuery(_))) {
            self.results_scroll = 0;
            self.spinner_frame = 0;
        }
        effect
    }

    pub(crate) fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    fn activate(&mut self) -> Option<Effect> {
        match self.focus {
            Focus::Input => self.apply(ViewMsg::Submit),
            Focus::Examples => {
                self.focus = Focus::Input;
                self.apply(ViewMsg::SelectExample(self.selected_example))
            }
            Focus::Schema => self.apply(ViewMsg::LoadSchema),
        }
    }

    fn on_char(&mut self, ch: char) -> Option<Effect> {
        match self.focus {
            Focus::Input => self.edit(QueryEdit::Insert(ch)),
            Focus::Examples => {
                let index = ch.to_digit(10).and_then(|digit| digit.checked_sub(1))?;
                let index = usize::try_from(index).ok()?;
                if index < EXAMPLE_QUERIES.len() {
                    self.selected_example = index;
                }
                None
            }
            Focus::Schema => None,
        }
    }

    fn edit(&mut self, edit: QueryEdit) -> Option<Effect> {
        if self.focus == Focus::Input {
            self.apply(ViewMsg::Edit(edit))
        } else {
            None
        }
    }

    fn move_example_selection(&mut self, direction: DirectionKey) {
        self.selected_example = match direction {
            DirectionKey::Up => self.selected_example.saturating_sub(1),
            DirectionKey::Down => (self.selected_example + 1).min(EXAMPLE_QUERIES.len() - 1),
        };
    }
}
