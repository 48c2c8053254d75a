// Element identifiers the widget binds to
pub const CONTAINER_ID: &str = "chatbox";
pub const BODY_ID: &str = "chat-body";
pub const FORM_ID: &str = "chat-form";
pub const INPUT_ID: &str = "chat-input";
pub const TOGGLE_ID: &str = "chat-toggle";

// Wire constants
pub const CHAT_API_PATH: &str = "/api/chat/";

// Visual state
pub const MINIMIZED_CLASS: &str = "minimized";
pub const MSG_CLASS: &str = "msg";
pub const GLYPH_MINIMIZED: &str = "+";
pub const GLYPH_EXPANDED: &str = "–";

// Fixed strings rendered in place of a usable reply
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, the assistant ran into a problem.";
pub const NETWORK_FALLBACK: &str =
    "Network error or the chat server is temporarily unavailable. Please try again later.";
