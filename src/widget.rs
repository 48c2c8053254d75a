// src/widget.rs

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::ChatApi;
use crate::config::WidgetConfig;
use crate::constants::{
    EMPTY_REPLY_FALLBACK, GLYPH_EXPANDED, GLYPH_MINIMIZED, MINIMIZED_CLASS, MSG_CLASS,
    NETWORK_FALLBACK,
};
use crate::dom::{Dom, NodeId};
use crate::message::{Message, Sender};

/// Resolved handles for the five elements the widget binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub container: NodeId,
    pub body: NodeId,
    pub form: NodeId,
    pub input: NodeId,
    pub toggle: NodeId,
}

impl Bindings {
    fn lookup<D: Dom>(dom: &D, config: &WidgetConfig) -> Option<Bindings> {
        Some(Bindings {
            container: dom.element_by_id(&config.container_id)?,
            body: dom.element_by_id(&config.body_id)?,
            form: dom.element_by_id(&config.form_id)?,
            input: dom.element_by_id(&config.input_id)?,
            toggle: dom.element_by_id(&config.toggle_id)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Expanded,
    Minimized,
}

/// Whether a handled event may continue to enclosing handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Continue,
}

/// View-controller for the collapsible chat panel. Owns no state beyond what
/// is visible in the page tree it is bound to.
pub struct ChatWidget<D: Dom, C: ChatApi> {
    dom: D,
    api: C,
    config: WidgetConfig,
    bindings: Bindings,
}

impl<D: Dom, C: ChatApi> ChatWidget<D, C> {
    /// Binds the widget to the page. A page without the chat scaffolding is
    /// not an error; it simply yields no widget.
    pub fn mount(dom: D, api: C, config: WidgetConfig) -> Option<Self> {
        let bindings = Bindings::lookup(&dom, &config)?;
        Some(ChatWidget {
            dom,
            api,
            config,
            bindings,
        })
    }

    pub fn bindings(&self) -> Bindings {
        self.bindings
    }

    pub fn input_node(&self) -> NodeId {
        self.bindings.input
    }

    pub fn toggle_node(&self) -> NodeId {
        self.bindings.toggle
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn visibility(&self) -> Visibility {
        if self.dom.has_class(self.bindings.container, MINIMIZED_CLASS) {
            Visibility::Minimized
        } else {
            Visibility::Expanded
        }
    }

    pub fn toggle_glyph(&self) -> String {
        self.dom.text(self.bindings.toggle)
    }

    pub fn input_value(&self) -> String {
        self.dom.value(self.bindings.input)
    }

    /// The rendered messages in append order, paired with their nodes.
    pub fn transcript_nodes(&self) -> Vec<(NodeId, Message)> {
        self.dom
            .children(self.bindings.body)
            .into_iter()
            .filter_map(|node| {
                let sender = if self.dom.has_class(node, Sender::User.css_class()) {
                    Sender::User
                } else if self.dom.has_class(node, Sender::Bot.css_class()) {
                    Sender::Bot
                } else {
                    return None;
                };
                Some((
                    node,
                    Message {
                        sender,
                        text: self.dom.text(node),
                    },
                ))
            })
            .collect()
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.transcript_nodes()
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }

    /// Routes a click. Clicks on the toggle control flip visibility and are
    /// consumed so an enclosing "open chat" handler does not also fire.
    pub fn on_click(&mut self, target: NodeId) -> Propagation {
        if target == self.bindings.toggle {
            self.toggle();
            Propagation::Stop
        } else {
            Propagation::Continue
        }
    }

    /// Flips the minimized/expanded state and refreshes the toggle glyph.
    pub fn toggle(&mut self) -> Visibility {
        // The nearest ancestor carrying the container id wins; the handle
        // resolved at mount time is the fallback.
        let container = self
            .ancestor_container()
            .unwrap_or(self.bindings.container);
        let minimized = self.dom.toggle_class(container, MINIMIZED_CLASS);
        let glyph = if minimized {
            GLYPH_MINIMIZED
        } else {
            GLYPH_EXPANDED
        };
        self.dom.set_text(self.bindings.toggle, glyph);
        if minimized {
            Visibility::Minimized
        } else {
            Visibility::Expanded
        }
    }

    fn ancestor_container(&self) -> Option<NodeId> {
        let mut current = self.dom.parent(self.bindings.toggle);
        while let Some(node) = current {
            if self.dom.has_id(node, &self.config.container_id) {
                return Some(node);
            }
            current = self.dom.parent(node);
        }
        None
    }

    fn append_message(&mut self, message: &Message) {
        let body = self.bindings.body;
        self.dom
            .append_child(body, &[MSG_CLASS, message.sender.css_class()], &message.text);
        self.dom.scroll_to_bottom(body);
    }

    /// Renders the trimmed input as a user message and clears the field.
    /// Whitespace-only input yields nothing.
    fn take_input(&mut self) -> Option<String> {
        let text = self.input_value().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.append_message(&Message::user(text.clone()));
        let input = self.bindings.input;
        self.dom.set_value(input, "");
        Some(text)
    }
}

/// Reads the input field and relays its contents to the chat backend,
/// rendering whatever comes back. Failures never escape: they surface as a
/// fixed bot message in the transcript. The lock is released while the
/// request is in flight, so other submits and toggles may interleave.
pub async fn submit_message<D, C>(widget: Arc<Mutex<ChatWidget<D, C>>>)
where
    D: Dom + Send,
    C: ChatApi + Clone,
{
    let (text, api) = {
        let mut guard = widget.lock().await;
        let text = match guard.take_input() {
            Some(text) => text,
            None => return,
        };
        (text, guard.api.clone())
    };

    let reply = api.send(&text).await;

    let mut guard = widget.lock().await;
    match reply {
        Ok(Some(reply)) => guard.append_message(&Message::bot(reply)),
        Ok(None) => guard.append_message(&Message::bot(EMPTY_REPLY_FALLBACK)),
        Err(err) => {
            log::warn!("chat request failed: {}", err);
            guard.append_message(&Message::bot(NETWORK_FALLBACK));
        }
    }
}
