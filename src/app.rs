use crate::config::Config;
use crate::event::AppEvent;
use crate::filter::{self, FilterResult};
use crate::github::types::UserProfile;
use crate::github::GitHubApi;
use crate::query::{Delivery, QueryController, Submission};
use crate::ui::{
    detail_panel::DetailPanel,
    help_panel::HelpPanel,
    input::{self, Action, InputMode},
    profile_header::{ProfileHeader, HEADER_HEIGHT},
    repo_list::RepoList,
    status_bar::StatusBar,
    toast::{Notification, Toast},
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct App {
    pub config: Config,
    pub controller: QueryController,
    tx: mpsc::UnboundedSender<AppEvent>,

    pub mode: InputMode,
    pub search_text: String,
    pub filter_text: String,

    pub profile: Option<UserProfile>,
    pub view: FilterResult,
    pub selected: usize,
    pub scroll: usize,

    pub show_detail: bool,
    pub show_help: bool,
    pub notification: Option<Notification>,
    pub spinner_frame: usize,

    debounce_seq: u64,
    debounce_task: Option<JoinHandle<()>>,

    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        api: Arc<dyn GitHubApi>,
        tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let controller = QueryController::new(api, tx.clone(), config.request_timeout());
        Self {
            config,
            controller,
            tx,
            mode: InputMode::Normal,
            search_text: String::new(),
            filter_text: String::new(),
            profile: None,
            view: FilterResult::default(),
            selected: 0,
            scroll: 0,
            show_detail: false,
            show_help: false,
            notification: None,
            spinner_frame: 0,
            debounce_seq: 0,
            debounce_task: None,
            should_quit: false,
        }
    }

    /// Looks up the configured user, if any. Never superseded unless the user types.
    pub fn start(&mut self) {
        if let Some(user) = self.config.initial_user.clone() {
            self.search_text = user;
            let query = self.search_text.clone();
            self.submit(&query);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => {
                let action = input::map_key(key, self.mode);
                self.handle_action(action);
            }
            AppEvent::Resize => {}
            AppEvent::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                if self.notification.as_ref().is_some_and(|n| n.is_expired()) {
                    self.notification = None;
                }
            }
            AppEvent::SearchDebounced(seq) => {
                if seq == self.debounce_seq && self.mode == InputMode::Search {
                    let query = self.search_text.clone();
                    self.submit(&query);
                }
            }
            AppEvent::Query(event) => {
                if let Some(delivery) = self.controller.resolve(event) {
                    self.apply_delivery(delivery);
                }
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveDown => {
                if self.selected + 1 < self.view.matches.len() {
                    self.selected += 1;
                }
            }
            Action::MoveUp => self.selected = self.selected.saturating_sub(1),
            Action::Top => self.selected = 0,
            Action::Bottom => self.selected = self.view.matches.len().saturating_sub(1),
            Action::StartSearch => {
                self.show_help = false;
                self.mode = InputMode::Search;
            }
            Action::StartFilter => {
                self.show_help = false;
                self.mode = InputMode::Filter;
            }
            Action::InputChar(c) => self.edit_input(|text| text.push(c)),
            Action::InputBackspace => self.edit_input(|text| {
                text.pop();
            }),
            Action::InputConfirm => {
                if self.mode == InputMode::Search {
                    self.cancel_debounce();
                    let query = self.search_text.clone();
                    self.submit(&query);
                }
                self.mode = InputMode::Normal;
            }
            Action::InputCancel => {
                match self.mode {
                    InputMode::Search => {
                        self.cancel_debounce();
                        self.search_text = self.controller.active_query().to_string();
                    }
                    InputMode::Filter => {
                        self.filter_text.clear();
                        self.refresh_view();
                    }
                    InputMode::Normal => {}
                }
                self.mode = InputMode::Normal;
            }
            Action::ToggleDetail => self.show_detail = !self.show_detail,
            Action::Refresh => {
                self.notification = None;
                if let Submission::Cleared = self.controller.resubmit() {
                    self.apply_delivery(Delivery::Cleared);
                }
            }
            Action::Reset => {
                self.cancel_debounce();
                self.controller.reset();
                self.search_text.clear();
                self.filter_text.clear();
                self.apply_delivery(Delivery::Cleared);
            }
            Action::Help => self.show_help = !self.show_help,
            Action::ClosePopup => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.show_detail = false;
                }
            }
            Action::None => {}
        }
    }

    fn edit_input(&mut self, edit: impl FnOnce(&mut String)) {
        match self.mode {
            InputMode::Search => {
                edit(&mut self.search_text);
                self.schedule_search();
            }
            InputMode::Filter => {
                edit(&mut self.filter_text);
                self.refresh_view();
            }
            InputMode::Normal => {}
        }
    }

    fn submit(&mut self, query: &str) {
        self.notification = None;
        match self.controller.submit_query(query) {
            Submission::Cleared => self.apply_delivery(Delivery::Cleared),
            Submission::Pending(id) => debug!(id, "lookup pending"),
        }
    }

    fn schedule_search(&mut self) {
        self.cancel_debounce();
        self.debounce_seq += 1;
        if self.config.debounce_ms == 0 {
            let query = self.search_text.clone();
            self.submit(&query);
            return;
        }
        let seq = self.debounce_seq;
        let delay = Duration::from_millis(self.config.debounce_ms);
        let tx = self.tx.clone();
        self.debounce_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::SearchDebounced(seq));
        }));
    }

    fn cancel_debounce(&mut self) {
        if let Some(task) = self.debounce_task.take() {
            task.abort();
        }
        self.debounce_seq += 1;
    }

    fn apply_delivery(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Loaded(result) => {
                self.profile = Some(result.user);
                self.selected = 0;
                self.scroll = 0;
            }
            Delivery::Failed(err) => {
                self.profile = None;
                self.notification = Some(Notification::for_error(
                    &err,
                    self.controller.active_query(),
                ));
            }
            Delivery::Cleared => {
                self.profile = None;
                self.show_detail = false;
            }
        }
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.view = filter::filter(self.controller.repositories(), &self.filter_text);
        if self.selected >= self.view.matches.len() {
            self.selected = self.view.matches.len().saturating_sub(1);
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(size);

        let header = ProfileHeader {
            profile: self.profile.as_ref(),
            total_repos: self.controller.repositories().len(),
            shown_repos: self.view.matches.len(),
        };
        frame.render_widget(header, main_chunks[0]);

        let with_detail = self.show_detail && self.selected < self.view.matches.len();
        let body_chunks = if with_detail {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(main_chunks[1])
        } else {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(1)])
                .split(main_chunks[1])
        };

        let list_height = body_chunks[0].height.saturating_sub(2) as usize;
        self.ensure_scroll_bounds(list_height);

        let list = RepoList {
            repos: &self.view.matches,
            query: &self.view.query,
            selected: self.selected,
            scroll: self.scroll,
            focused: self.mode != InputMode::Search,
            loading: self.controller.is_loading(),
        };
        frame.render_widget(list, body_chunks[0]);

        if let Some(repo) = self.view.matches.get(self.selected).filter(|_| with_detail) {
            let detail = DetailPanel {
                repo,
                query: &self.view.query,
            };
            frame.render_widget(detail, body_chunks[1]);
        }

        let status = StatusBar {
            mode: self.mode,
            search_text: &self.search_text,
            filter_text: &self.filter_text,
            active_query: self.controller.active_query(),
            loading: self.controller.is_loading(),
            spinner_frame: self.spinner_frame,
        };
        frame.render_widget(status, main_chunks[2]);

        if self.show_help {
            frame.render_widget(HelpPanel, size);
        }

        if let Some(ref notification) = self.notification {
            frame.render_widget(Toast { notification }, main_chunks[1]);
        }
    }

    fn ensure_scroll_bounds(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected >= self.scroll + visible_height {
            self.scroll = self.selected - visible_height + 1;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        }
    }
}
