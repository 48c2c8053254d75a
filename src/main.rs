// src/main.rs

use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::sync::Mutex;

use chatbox::api::HttpChatApi;
use chatbox::config::{validate_config, WidgetConfig};
use chatbox::dom::PageDom;
use chatbox::tui::run_ui;
use chatbox::widget::ChatWidget;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let base_url =
        std::env::var("CHAT_SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

    let config = WidgetConfig::default();
    validate_config(&config).context("invalid widget configuration")?;

    let api = HttpChatApi::with_path(base_url, config.endpoint.clone());
    let page = PageDom::chat_page();

    let widget =
        ChatWidget::mount(page, api, config).context("page is missing the chat scaffolding")?;

    run_ui(Arc::new(Mutex::new(widget)))
        .await
        .map_err(|e| anyhow::anyhow!("terminal UI failed: {}", e))?;

    Ok(())
}
