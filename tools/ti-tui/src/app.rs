//! Application state management.

use crossterm::event::KeyCode;
use ti_core::{
    Completion, GatewayCall, HexBlob, InspectorConfig, InspectorResult, InspectorState, ViewMode,
};
use tracing::debug;

/// What typed characters currently feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Address,
    StageKey,
    StageValue { key: String },
    ReadValue,
    ReadProof,
}

impl InputMode {
    pub fn prompt(&self) -> Option<String> {
        match self {
            InputMode::Normal => None,
            InputMode::Address => Some("Address".to_string()),
            InputMode::StageKey => Some("Storage key".to_string()),
            InputMode::StageValue { key } => Some(format!("Value for {key}")),
            InputMode::ReadValue => Some("Read key".to_string()),
            InputMode::ReadProof => Some("Proof key".to_string()),
        }
    }
}

/// Terminal application around the inspector state.
pub struct App {
    /// Inspector session.
    pub state: InspectorState,

    /// Backend shown in the header.
    pub backend_url: String,

    /// Current input mode.
    pub mode: InputMode,

    /// Text typed in the current input mode.
    pub input: String,

    /// Highlighted row of the account list.
    pub account_cursor: usize,

    /// Highlighted row of the pending edits list.
    pub pending_cursor: usize,

    /// Last informational message.
    pub status: Option<String>,

    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &InspectorConfig) -> Self {
        Self {
            state: InspectorState::with_config(config),
            backend_url: config.backend_url.clone(),
            mode: InputMode::Normal,
            input: String::new(),
            account_cursor: 0,
            pending_cursor: 0,
            status: None,
            should_quit: false,
        }
    }

    /// Handle a key press. Returns the backend call to dispatch, if any.
    pub fn on_key(&mut self, code: KeyCode) -> Option<GatewayCall> {
        if self.mode == InputMode::Normal {
            self.on_normal_key(code)
        } else {
            self.on_input_key(code)
        }
    }

    fn on_normal_key(&mut self, code: KeyCode) -> Option<GatewayCall> {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('a') => self.enter(InputMode::Address),
            KeyCode::Char('s') => self.enter_if_selected(InputMode::StageKey),
            KeyCode::Char('g') => self.enter_if_selected(InputMode::ReadValue),
            KeyCode::Char('p') => self.enter_if_selected(InputMode::ReadProof),
            KeyCode::Up => {
                self.account_cursor = self.account_cursor.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                let last = self.state.accounts().len().saturating_sub(1);
                self.account_cursor = (self.account_cursor + 1).min(last);
                None
            }
            KeyCode::Left => {
                self.pending_cursor = self.pending_cursor.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                let last = self.pending_keys().len().saturating_sub(1);
                self.pending_cursor = (self.pending_cursor + 1).min(last);
                None
            }
            KeyCode::Enter => {
                let result = self.state.select_index(self.account_cursor);
                self.dispatch(result)
            }
            KeyCode::Char('x') => {
                self.unstage_highlighted();
                None
            }
            KeyCode::Char('c') => {
                let result = self.state.begin_commit_selected();
                if result.is_ok() {
                    self.status = Some("Committing...".to_string());
                }
                self.dispatch(result)
            }
            KeyCode::Char('t') => {
                self.switch_view(ViewMode::Text);
                None
            }
            KeyCode::Char('r') => {
                self.switch_view(ViewMode::Tree);
                None
            }
            KeyCode::Tab => {
                let mode = self.state.toggle_view();
                debug!(mode = %mode, "View toggled");
                None
            }
            _ => None,
        }
    }

    fn on_input_key(&mut self, code: KeyCode) -> Option<GatewayCall> {
        match code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.input.clear();
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            KeyCode::Enter => self.submit(),
            _ => None,
        }
    }

    /// Finish the current input.
    fn submit(&mut self) -> Option<GatewayCall> {
        let input = std::mem::take(&mut self.input);
        let input = input.trim();
        let mode = std::mem::replace(&mut self.mode, InputMode::Normal);

        match mode {
            InputMode::Normal => None,
            InputMode::Address => {
                let result = self.state.register(input);
                if result.is_ok() {
                    self.account_cursor = self.state.selected_index().unwrap_or(0);
                }
                self.dispatch(result)
            }
            InputMode::StageKey => match HexBlob::parse("key", input) {
                Ok(_) => {
                    self.mode = InputMode::StageValue {
                        key: input.to_string(),
                    };
                    None
                }
                Err(err) => {
                    self.status = Some(err.to_string());
                    None
                }
            },
            InputMode::StageValue { key } => {
                if self.state.stage_selected(&key, input).is_ok() {
                    self.status = Some(format!("Staged {key} = {input}"));
                }
                None
            }
            InputMode::ReadValue => {
                let result = self.with_selected(|state, account| state.begin_value_read(&account, input));
                self.dispatch(result)
            }
            InputMode::ReadProof => {
                let result = self.with_selected(|state, account| state.begin_proof_read(&account, input));
                self.dispatch(result)
            }
        }
    }

    /// Feed a finished backend call back into the state.
    pub fn on_completion(&mut self, completion: Completion) {
        let committed = match &completion {
            Completion::Commit { ticket, .. } => Some(ticket.account.clone()),
            _ => None,
        };
        let ok = self.state.apply(completion).is_ok();

        if let Some(account) = committed {
            self.status = Some(if ok {
                format!("Committed {}", account.short())
            } else {
                format!("Commit of {} failed; edits kept", account.short())
            });
        }
        let last = self.pending_keys().len().saturating_sub(1);
        self.pending_cursor = self.pending_cursor.min(last);
    }

    /// Staged keys of the selected account, in display order.
    pub fn pending_keys(&self) -> Vec<HexBlob> {
        self.state
            .selected()
            .map(|account| self.state.pending(account).into_keys().collect())
            .unwrap_or_default()
    }

    fn unstage_highlighted(&mut self) {
        let Some(account) = self.state.selected().cloned() else {
            return;
        };
        if let Some(key) = self.pending_keys().get(self.pending_cursor) {
            if self.state.unstage(&account, key.as_str()) {
                self.status = Some(format!("Unstaged {key}"));
            }
        }
        let last = self.pending_keys().len().saturating_sub(1);
        self.pending_cursor = self.pending_cursor.min(last);
    }

    fn switch_view(&mut self, mode: ViewMode) {
        if self.state.switch_view(mode) {
            debug!(mode = %mode, "View switched");
        }
    }

    fn enter(&mut self, mode: InputMode) -> Option<GatewayCall> {
        self.input.clear();
        self.mode = mode;
        None
    }

    fn enter_if_selected(&mut self, mode: InputMode) -> Option<GatewayCall> {
        if self.state.selected().is_some() {
            self.enter(mode)
        } else {
            self.status = Some("Select an account first".to_string());
            None
        }
    }

    fn with_selected<T>(
        &mut self,
        f: impl FnOnce(&mut InspectorState, ti_core::Address) -> InspectorResult<T>,
    ) -> InspectorResult<T> {
        let account = self
            .state
            .selected()
            .cloned()
            .ok_or(ti_core::InspectorError::NoAccountSelected)?;
        f(&mut self.state, account)
    }

    /// Errors are already recorded on the state for display.
    fn dispatch(&self, result: InspectorResult<GatewayCall>) -> Option<GatewayCall> {
        match result {
            Ok(call) => Some(call),
            Err(err) => {
                debug!(error = %err, "Action rejected");
                None
            }
        }
    }
}
