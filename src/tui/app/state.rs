use crate::betting::Action;
use crate::game::Phase;
use crate::seat::SeatId;
use crate::session::Session;
use crate::view::PublicState;
use std::time::{Duration, Instant};

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    ToggleHelp,
    ToggleHistory,
    HistoryUp,
    HistoryDown,
    NewHand,
    Fold,
    CheckCall,
    AmountOpen,
    AmountDigit(u8),
    AmountBackspace,
    AmountIncBb,
    AmountDecBb,
    AmountSubmit,
    AmountCancel,
}

#[non_exhaustive]
pub struct AppState {
    pub started: Instant,
    pub session: Session,
    help_open: bool,
    history_open: bool,
    history_offset: usize,
    amount_entry: Option<String>,
    amount_entry_error: Option<String>,
    notice: Option<String>,
    notice_at: Option<Instant>,
    halted: Option<String>,
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    const NOTICE_TTL: Duration = Duration::from_secs(3);

    pub fn new(session: Session) -> Self {
        Self {
            started: Instant::now(),
            session,
            help_open: false,
            history_open: false,
            history_offset: 0,
            amount_entry: None,
            amount_entry_error: None,
            notice: None,
            notice_at: None,
            halted: None,
        }
    }

    /// Snapshot for rendering; hidden hole cards are already masked.
    pub fn view(&self) -> PublicState {
        self.session.public_state()
    }

    fn user_to_act(&self) -> bool {
        self.halted.is_none() && self.session.hand().to_act() == Some(SeatId::User)
    }

    pub fn amount_entry_active(&self) -> bool {
        self.amount_entry.is_some()
    }

    pub fn amount_entry_text(&self) -> Option<&str> {
        self.amount_entry.as_deref()
    }

    pub fn amount_entry_error(&self) -> Option<&str> {
        self.amount_entry_error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Set once the engine reports a broken invariant; the table stops.
    pub fn halted(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    fn set_notice(&mut self, text: String) {
        self.notice = Some(text);
        self.notice_at = Some(Instant::now());
    }

    fn clear_notice(&mut self) {
        self.notice = None;
        self.notice_at = None;
    }

    fn submit(&mut self, action: Action) -> bool {
        if !self.user_to_act() {
            return false;
        }
        match self.session.submit_action(SeatId::User, action) {
            Ok(()) => {
                self.clear_notice();
                true
            }
            Err(e) => {
                self.set_notice(e.to_string());
                false
            }
        }
    }

    fn open_amount_entry(&mut self) -> bool {
        if !self.user_to_act() {
            return false;
        }
        let round = self.session.hand().round();
        let max = {
            let me = self.session.hand().seat(SeatId::User);
            me.chips() + me.current_bet()
        };
        self.amount_entry = Some(round.min_raise_to().min(max).to_string());
        self.amount_entry_error = None;
        true
    }

    fn amount_entry_backspace(&mut self) {
        if let Some(buf) = self.amount_entry.as_mut() {
            buf.pop();
        }
        self.amount_entry_error = None;
    }

    fn amount_entry_push_digit(&mut self, digit: u8) {
        if let Some(buf) = self.amount_entry.as_mut() {
            if buf.len() >= 12 {
                return;
            }
            buf.push(char::from(b'0' + digit));
        }
        self.amount_entry_error = None;
    }

    fn amount_entry_adjust_bb(&mut self, delta: i64) {
        let step = self.session.hand().big_blind().max(1) as i64;
        if let Some(buf) = self.amount_entry.as_mut() {
            let cur = buf.parse::<i64>().unwrap_or(0);
            *buf = (cur + delta * step).max(0).to_string();
        }
        self.amount_entry_error = None;
    }

    /// The engine does the real validation; this only catches typos early.
    fn amount_entry_submit(&mut self) -> bool {
        let Some(buf) = self.amount_entry.as_ref() else {
            return false;
        };
        let Ok(amount) = buf.parse::<u64>() else {
            self.amount_entry_error = Some("Invalid amount".to_string());
            return false;
        };
        if !self.user_to_act() {
            self.amount_entry_error = Some("Not your turn".to_string());
            return false;
        }
        match self.session.submit_action(SeatId::User, Action::RaiseTo(amount)) {
            Ok(()) => {
                self.amount_entry = None;
                self.amount_entry_error = None;
                self.clear_notice();
                true
            }
            Err(e) => {
                self.amount_entry_error = Some(e.to_string());
                false
            }
        }
    }

    fn amount_entry_cancel(&mut self) {
        self.amount_entry = None;
        self.amount_entry_error = None;
    }

    /// Returns true when the input changed the hand.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleHelp => {
                self.history_open = false;
                self.help_open = !self.help_open;
                false
            }
            InputAction::ToggleHistory => {
                self.help_open = false;
                if !self.history_open {
                    self.history_offset = 0;
                }
                self.history_open = !self.history_open;
                false
            }
            InputAction::HistoryUp => {
                if self.history_open {
                    let len = self.session.hand().history().len();
                    let max_offset = len.saturating_sub(Self::HISTORY_PAGE_SIZE);
                    self.history_offset = (self.history_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::HistoryDown => {
                if self.history_open && self.history_offset > 0 {
                    self.history_offset -= 1;
                }
                false
            }
            InputAction::NewHand => self.new_hand(),
            InputAction::Fold => self.submit(Action::Fold),
            InputAction::CheckCall => self.submit(Action::Call),
            InputAction::AmountOpen => self.open_amount_entry(),
            InputAction::AmountDigit(d) => {
                self.amount_entry_push_digit(d);
                false
            }
            InputAction::AmountBackspace => {
                self.amount_entry_backspace();
                false
            }
            InputAction::AmountIncBb => {
                self.amount_entry_adjust_bb(1);
                false
            }
            InputAction::AmountDecBb => {
                self.amount_entry_adjust_bb(-1);
                false
            }
            InputAction::AmountSubmit => self.amount_entry_submit(),
            InputAction::AmountCancel => {
                self.amount_entry_cancel();
                false
            }
        }
    }

    /// Deal a new hand. Abandons one still in progress.
    pub fn new_hand(&mut self) -> bool {
        if self.halted.is_some() {
            return false;
        }
        match self.session.start_new_hand() {
            Ok(()) => {
                self.history_offset = 0;
                self.amount_entry = None;
                self.clear_notice();
                true
            }
            Err(e) => {
                self.set_notice(e.to_string());
                false
            }
        }
    }

    /// Periodic work: apply provider replies, deal the next street once a
    /// round closes, and ask the next provider seat to act.
    pub fn tick(&mut self) {
        if let Some(at) = self.notice_at {
            if at.elapsed() >= Self::NOTICE_TTL {
                self.clear_notice();
            }
        }
        if self.halted.is_some() || self.session.hand().phase() == Phase::Init {
            return;
        }

        if let Err(e) = self.session.try_apply_decisions() {
            self.halted = Some(e.to_string());
            return;
        }
        if let Err(e) = self.session.advance_phase() {
            self.halted = Some(e.to_string());
            return;
        }
        self.session.request_decision();
    }
}
