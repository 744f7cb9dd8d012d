//! Chat widget state loop.
//!
//! `Widget` owns the conversation and talks to the outside world only through
//! the injected [`ConversationStore`], [`RelayTransport`] and [`View`]. The
//! browser script in `assets/widget.js` follows the same loop.

pub mod store;
pub mod transport;
pub mod view;

use log::{ debug, warn };

use crate::config::widget::WidgetConfig;
use crate::error::RelayError;
use crate::models::chat::{ RelayRequest, RelayResponse, Role, Turn };
use self::store::ConversationStore;
use self::transport::RelayTransport;
use self::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open,
}

/// A submission that passed validation and is waiting for the relay.
#[derive(Debug)]
pub struct PendingSubmit {
    pub request: RelayRequest,
    generation: u64,
}

#[derive(Debug)]
pub enum Submission {
    /// Blank input; nothing changed.
    Ignored,
    /// A reply is still awaited for this conversation.
    Busy,
    Pending(PendingSubmit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Busy,
    /// The conversation was reset while the reply was in flight.
    Discarded,
    Replied {
        reply: String,
        fallback: bool,
    },
}

/// Parses a stored conversation.
///
/// Turns are judged one by one: a user or model turn (`assistant` counts as
/// model) with non-empty text is kept, anything else is dropped on its own.
/// `None` when the list is unreadable or nothing survives.
pub fn parse_conversation(raw: &str) -> Option<Vec<Turn>> {
    let items: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
    let total = items.len();
    let turns: Vec<Turn> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Turn>(item).ok())
        .filter(|t| t.role != Role::System && !t.text.is_empty())
        .collect();
    if turns.len() < total {
        debug!("Dropped {} unusable stored turns", total - turns.len());
    }
    if turns.is_empty() { None } else { Some(turns) }
}

pub struct Widget<S, T, V> {
    config: WidgetConfig,
    conversation: Vec<Turn>,
    awaiting_reply: bool,
    generation: u64,
    panel: PanelState,
    store: S,
    transport: T,
    view: V,
}

impl<S, T, V> Widget<S, T, V> where S: ConversationStore, T: RelayTransport, V: View {
    /// Loads the persisted conversation (or the welcome turn) and draws it.
    pub fn initialize(config: WidgetConfig, store: S, transport: T, view: V) -> Self {
        let conversation = match store.read() {
            Some(raw) =>
                parse_conversation(&raw).unwrap_or_else(|| {
                    warn!("Stored conversation is unusable, starting fresh");
                    vec![config.welcome_turn()]
                }),
            None => vec![config.welcome_turn()],
        };

        let mut widget = Self {
            config,
            conversation,
            awaiting_reply: false,
            generation: 0,
            panel: PanelState::Closed,
            store,
            transport,
            view,
        };
        widget.render();
        widget
    }

    pub fn conversation(&self) -> &[Turn] {
        &self.conversation
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn toggle_panel(&mut self) {
        self.panel = match self.panel {
            PanelState::Closed => PanelState::Open,
            PanelState::Open => PanelState::Closed,
        };
    }

    pub fn close_panel(&mut self) {
        self.panel = PanelState::Closed;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn render(&mut self) {
        self.view.draw(&self.conversation);
    }

    pub fn persist(&mut self) {
        let result = serde_json
            ::to_string(&self.conversation)
            .map_err(Into::into)
            .and_then(|json| self.store.write(&json));
        if let Err(e) = result {
            warn!("Failed to persist conversation: {}", e);
        }
    }

    pub fn reset(&mut self) {
        self.conversation = vec![self.config.welcome_turn()];
        self.generation += 1;
        if self.awaiting_reply {
            self.awaiting_reply = false;
            self.view.set_typing(false);
        }
        if let Err(e) = self.store.remove() {
            warn!("Failed to clear stored conversation: {}", e);
        }
        self.render();
    }

    /// First half of a submit: validates, appends the user turn and shows the
    /// typing indicator. The returned request carries the system turn first.
    pub fn begin_submit(&mut self, text: &str) -> Submission {
        let text = text.trim();
        if text.is_empty() {
            return Submission::Ignored;
        }
        if self.awaiting_reply {
            debug!("Submit rejected, a reply is still awaited");
            return Submission::Busy;
        }

        self.conversation.push(Turn::user(text));
        self.render();
        self.awaiting_reply = true;
        self.view.set_typing(true);

        let mut messages = Vec::with_capacity(self.conversation.len() + 1);
        messages.push(self.config.system_turn());
        messages.extend(self.conversation.iter().cloned());

        Submission::Pending(PendingSubmit {
            request: RelayRequest { messages },
            generation: self.generation,
        })
    }

    /// Second half of a submit: appends the model turn, persists, redraws and
    /// hides the typing indicator.
    pub fn complete_submit(
        &mut self,
        pending: PendingSubmit,
        result: Result<RelayResponse, RelayError>
    ) -> SubmitOutcome {
        self.finish(pending.generation, result)
    }

    fn finish(&mut self, generation: u64, result: Result<RelayResponse, RelayError>) -> SubmitOutcome {
        if generation != self.generation || !self.awaiting_reply {
            debug!("Dropping reply for a conversation that was reset");
            return SubmitOutcome::Discarded;
        }

        let (reply, fallback) = match result {
            Ok(resp) if !resp.reply.trim().is_empty() => (resp.reply, false),
            Ok(_) => (self.config.fallback_reply.clone(), true),
            Err(e) => {
                warn!("Relay call failed: {}", e);
                (self.config.fallback_reply.clone(), true)
            }
        };

        self.conversation.push(Turn::model(reply.clone()));
        self.persist();
        self.render();
        self.awaiting_reply = false;
        self.view.set_typing(false);

        SubmitOutcome::Replied { reply, fallback }
    }

    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let pending = match self.begin_submit(text) {
            Submission::Ignored => {
                return SubmitOutcome::Ignored;
            }
            Submission::Busy => {
                return SubmitOutcome::Busy;
            }
            Submission::Pending(pending) => pending,
        };
        let PendingSubmit { request, generation } = pending;
        let in_flight = InFlight { widget: self, generation, armed: true };
        let result = in_flight.widget.transport.send(&request).await;
        in_flight.complete(result)
    }
}

/// Holds a submit that is waiting on the relay. Dropped before completing
/// (the submit future was cancelled), it finishes the turn with the fallback
/// reply so the widget is not left busy.
struct InFlight<'w, S, T, V> where S: ConversationStore, T: RelayTransport, V: View {
    widget: &'w mut Widget<S, T, V>,
    generation: u64,
    armed: bool,
}

impl<'w, S, T, V> InFlight<'w, S, T, V> where S: ConversationStore, T: RelayTransport, V: View {
    fn complete(mut self, result: Result<RelayResponse, RelayError>) -> SubmitOutcome {
        self.armed = false;
        self.widget.finish(self.generation, result)
    }
}

impl<'w, S, T, V> Drop for InFlight<'w, S, T, V> where S: ConversationStore, T: RelayTransport, V: View {
    fn drop(&mut self) {
        if self.armed {
            self.widget.finish(self.generation, Err(RelayError::Cancelled));
        }
    }
}
