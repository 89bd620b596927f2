//! Scripted walk through the booking page.
//!
//! Mounts the sample page, picks seats, searches, validates the signup form
//! and books, logging each step. Set `RUST_LOG=eventdesk_page=debug` to see
//! the component logs.

use anyhow::Context;
use chrono::Utc;
use eventdesk_core::environment::SystemClock;
use eventdesk_page::components::countdown::read_display;
use eventdesk_page::sample::sample_page_with_event;
use eventdesk_page::{
    BookingAction, FormAction, LoggingNavigator, PageAction, PageConfig, PageEnvironment,
    PageReducer, SearchAction, SeatAction,
};
use eventdesk_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo=info,eventdesk_page=info,eventdesk_runtime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PageConfig::from_env().context("loading page configuration")?;
    info!(?config, "Configuration loaded");

    let page = sample_page_with_event(Utc::now() + chrono::Duration::seconds(3));
    let environment = PageEnvironment::new(Arc::new(SystemClock), Arc::new(LoggingNavigator))
        .with_config(config);
    let store = Store::new(page.state, PageReducer::new(), environment);

    store.send(PageAction::Mounted).await?;

    for seat in &page.seats[..3] {
        store.send(SeatAction::Toggle { seat: *seat }.into()).await?;
    }
    let selected = store.state(|s| s.selected_seats_field()).await;
    info!(?selected, "Seats after three clicks with a limit of 2");

    store
        .send(SeatAction::QuantityChanged { value: "1".into() }.into())
        .await?;
    let selected = store.state(|s| s.selected_seats_field()).await;
    info!(?selected, "Seats after lowering the quantity");

    store
        .send(SearchAction::QueryChanged { query: "jazz".into() }.into())
        .await?;
    let visible = store
        .state(|s| {
            page.cards
                .iter()
                .filter(|card| s.document.element(**card).is_some_and(|e| !e.is_hidden()))
                .count()
        })
        .await;
    info!(visible, "Cards matching \"jazz\"");

    store
        .send(FormAction::Validate { form: page.signup_form }.into())
        .await?;
    let valid = store
        .state(|s| s.last_validation.as_ref().is_some_and(|r| r.is_valid()))
        .await;
    info!(valid, "Empty signup form validated");

    tokio::time::sleep(Duration::from_millis(4_200)).await;
    let countdown = store.state(|s| read_display(&s.document, page.countdown)).await;
    info!(?countdown, timers = store.active_timers(), "Countdown after the event start");

    let mut handle = store
        .send(BookingAction::Clicked { button: page.book_button }.into())
        .await?;
    handle.wait().await;
    let location = store.state(|s| s.location.clone()).await;
    info!(?location, "Booking finished");

    store.send(PageAction::Unmounted).await?;
    store
        .shutdown(Duration::from_secs(1))
        .await
        .context("shutting down page store")?;

    let toasts = store.state(|s| s.notifications.toasts().len()).await;
    info!(toasts, "Demo complete");
    Ok(())
}
