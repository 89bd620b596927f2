//! Countdown timers for `.event-countdown` hosts.
//!
//! Each host gets one [`CountdownTimer`] keyed by its [`NodeId`]. A running
//! timer owns one interval in the runtime, registered under
//! [`CountdownTimer::timer_id`]; every path out of `Running` (expiry, disposal,
//! host removal, unmount) returns the matching `Effect::Cancel`.
//!
//! The registry only remembers countdowns whose host is still in the page.
//! Once a host is removed its entry is dropped along with the interval.

use crate::actions::{CountdownAction, PageAction};
use crate::dom::{Document, ElementBuilder, NodeId};
use crate::environment::PageEnvironment;
use crate::hooks;
use crate::state::PageState;
use chrono::{DateTime, NaiveDateTime, Utc};
use eventdesk_core::{effect::Effect, effect::TimerId, every, reducer::Reducer, SmallVec};
use std::collections::BTreeMap;

/// Text shown once the target has passed
pub const STARTED_MESSAGE: &str = "This event has started!";

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a `data-event-date` value
///
/// Accepts RFC 3339, or a date and time without offset which is taken as UTC.
#[must_use]
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Time left until the target, split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    /// Whole days
    pub days: i64,
    /// Hours past the whole days
    pub hours: i64,
    /// Minutes past the whole hours
    pub minutes: i64,
    /// Seconds past the whole minutes
    pub seconds: i64,
}

impl Remaining {
    /// Split a millisecond distance, flooring every unit
    ///
    /// Negative distances clamp to zero.
    #[must_use]
    pub const fn from_millis(distance: i64) -> Self {
        let distance = if distance < 0 { 0 } else { distance };
        Self {
            days: distance / MS_PER_DAY,
            hours: (distance % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (distance % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (distance % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }
}

/// What a countdown host currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownDisplay {
    /// The four countdown items
    Remaining(Remaining),
    /// The started banner
    Started,
    /// Nothing rendered
    Empty,
}

/// Countdown lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    /// Interval running
    Running,
    /// Target reached
    Expired,
    /// Stopped before the target
    Disposed,
}

/// One countdown bound to a host element
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    /// Host element
    pub host: NodeId,
    /// Target timestamp
    pub target: DateTime<Utc>,
    /// Lifecycle phase
    pub phase: CountdownPhase,
    /// Number of renders so far
    pub renders: u32,
}

impl CountdownTimer {
    /// Interval key for the countdown hosted by `host`
    #[must_use]
    pub fn timer_id(host: NodeId) -> TimerId {
        TimerId::new(format!("countdown-{}-{}", host.index(), host.generation()))
    }

    /// Render the current remaining time into the host
    ///
    /// The four value nodes are rewritten in place once they exist. Returns
    /// `true` when the target has passed.
    fn render(&mut self, document: &mut Document, now: DateTime<Utc>) -> bool {
        let distance = (self.target - now).num_milliseconds();
        self.renders += 1;

        if distance < 0 {
            document.clear_children(self.host);
            document.append(
                self.host,
                ElementBuilder::new("div")
                    .class("alert alert-warning")
                    .text(STARTED_MESSAGE),
            );
            return true;
        }

        let remaining = Remaining::from_millis(distance);
        let values = document.select_within(self.host, |element| element.has_class("countdown-value"));
        if let [days, hours, minutes, seconds] = values.as_slice() {
            document.set_text(*days, &remaining.days.to_string());
            document.set_text(*hours, &remaining.hours.to_string());
            document.set_text(*minutes, &remaining.minutes.to_string());
            document.set_text(*seconds, &remaining.seconds.to_string());
            return false;
        }

        document.clear_children(self.host);
        let item = |value: i64, label: &str| {
            ElementBuilder::new("div")
                .class("countdown-item")
                .child(ElementBuilder::new("div").class("countdown-value").text(&value.to_string()))
                .child(ElementBuilder::new("div").class("countdown-label").text(label))
        };
        document.append(
            self.host,
            ElementBuilder::new("div")
                .class("countdown")
                .child(item(remaining.days, "Days"))
                .child(item(remaining.hours, "Hours"))
                .child(item(remaining.minutes, "Mins"))
                .child(item(remaining.seconds, "Secs")),
        );
        false
    }
}

/// Read back what a countdown host displays
#[must_use]
pub fn read_display(document: &Document, host: NodeId) -> CountdownDisplay {
    if document
        .select_within(host, |element| element.has_class("alert-warning"))
        .into_iter()
        .any(|alert| document.text_content(alert) == STARTED_MESSAGE)
    {
        return CountdownDisplay::Started;
    }

    let values: Vec<i64> = document
        .select_within(host, |element| element.has_class("countdown-value"))
        .into_iter()
        .filter_map(|node| document.text_content(node).trim().parse().ok())
        .collect();

    match values.as_slice() {
        [days, hours, minutes, seconds] => CountdownDisplay::Remaining(Remaining {
            days: *days,
            hours: *hours,
            minutes: *minutes,
            seconds: *seconds,
        }),
        _ => CountdownDisplay::Empty,
    }
}

/// Every countdown on the page, by host
#[derive(Debug, Clone, Default)]
pub struct CountdownRegistry {
    timers: BTreeMap<NodeId, CountdownTimer>,
}

impl CountdownRegistry {
    /// Countdown hosted by `host`
    #[must_use]
    pub fn get(&self, host: NodeId) -> Option<&CountdownTimer> {
        self.timers.get(&host)
    }

    /// Phase of the countdown hosted by `host`
    #[must_use]
    pub fn phase(&self, host: NodeId) -> Option<CountdownPhase> {
        self.get(host).map(|timer| timer.phase)
    }

    /// Hosts of running countdowns
    #[must_use]
    pub fn running(&self) -> Vec<NodeId> {
        self.timers
            .values()
            .filter(|timer| timer.phase == CountdownPhase::Running)
            .map(|timer| timer.host)
            .collect()
    }

    /// Number of countdowns whose host is still in the page
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no countdown is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Drop every countdown whose host left the page, cancelling the running ones
    fn forget_detached(&mut self, document: &Document) -> Vec<Effect<PageAction>> {
        let detached: Vec<NodeId> = self
            .timers
            .keys()
            .copied()
            .filter(|host| !document.is_connected(*host))
            .collect();

        detached
            .into_iter()
            .filter_map(|host| {
                let timer = self.timers.remove(&host)?;
                tracing::debug!(%host, renders = timer.renders, "Countdown host removed");
                (timer.phase == CountdownPhase::Running)
                    .then(|| Effect::Cancel(CountdownTimer::timer_id(host)))
            })
            .collect()
    }

    fn dispose(&mut self, host: NodeId) -> Option<Effect<PageAction>> {
        let timer = self.timers.get_mut(&host)?;
        if timer.phase != CountdownPhase::Running {
            return None;
        }
        timer.phase = CountdownPhase::Disposed;
        tracing::debug!(%host, renders = timer.renders, "Countdown disposed");
        Some(Effect::Cancel(CountdownTimer::timer_id(host)))
    }
}

/// Reducer for [`CountdownAction`]s and page lifecycle
#[derive(Debug, Clone, Copy, Default)]
pub struct CountdownReducer;

impl CountdownReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn start(state: &mut PageState, host: NodeId, env: &PageEnvironment) -> Option<Effect<PageAction>> {
        if state.countdowns.phase(host) == Some(CountdownPhase::Running) {
            tracing::debug!(%host, "Countdown already running");
            return None;
        }
        if !state.document.is_connected(host) {
            tracing::debug!(%host, "Countdown host not in page");
            return None;
        }

        let raw = state
            .document
            .element(host)
            .and_then(|element| element.attr(hooks::EVENT_DATE_ATTR))
            .unwrap_or_default();
        let Some(target) = parse_event_date(raw) else {
            tracing::warn!(%host, date = raw, "Unparseable event date; countdown not started");
            return None;
        };

        let mut timer = CountdownTimer {
            host,
            target,
            phase: CountdownPhase::Running,
            renders: 0,
        };
        let expired = timer.render(&mut state.document, env.clock.now());

        let effect = if expired {
            timer.phase = CountdownPhase::Expired;
            tracing::debug!(%host, "Countdown target already passed");
            None
        } else {
            tracing::debug!(%host, %target, "Countdown started");
            Some(every! {
                id: CountdownTimer::timer_id(host),
                period: env.config.countdown_period(),
                action: PageAction::Countdown(CountdownAction::Tick { host })
            })
        };
        state.countdowns.timers.insert(host, timer);
        effect
    }

    fn tick(state: &mut PageState, host: NodeId, env: &PageEnvironment) -> Option<Effect<PageAction>> {
        let PageState {
            document,
            countdowns,
            ..
        } = state;

        let Some(timer) = countdowns
            .timers
            .get_mut(&host)
            .filter(|timer| timer.phase == CountdownPhase::Running)
        else {
            tracing::trace!(%host, "Stale countdown tick");
            return Some(Effect::Cancel(CountdownTimer::timer_id(host)));
        };

        if !document.is_connected(host) {
            tracing::debug!(%host, renders = timer.renders, "Countdown host detached");
            countdowns.timers.remove(&host);
            return Some(Effect::Cancel(CountdownTimer::timer_id(host)));
        }

        if timer.render(document, env.clock.now()) {
            timer.phase = CountdownPhase::Expired;
            tracing::debug!(%host, renders = timer.renders, "Countdown expired");
            return Some(Effect::Cancel(CountdownTimer::timer_id(host)));
        }
        None
    }
}

impl Reducer for CountdownReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        match action {
            PageAction::Countdown(CountdownAction::Start { host }) => {
                Self::start(state, host, env).into_iter().collect()
            },
            PageAction::Countdown(CountdownAction::Tick { host }) => {
                Self::tick(state, host, env).into_iter().collect()
            },
            PageAction::Countdown(CountdownAction::Dispose { host }) => {
                state.countdowns.dispose(host).into_iter().collect()
            },
            PageAction::Mounted => state
                .document
                .elements_by_class(hooks::EVENT_COUNTDOWN)
                .into_iter()
                .filter_map(|host| Self::start(state, host, env))
                .collect(),
            PageAction::RemoveElement { .. } => {
                let PageState {
                    document,
                    countdowns,
                    ..
                } = state;
                countdowns.forget_detached(document).into_iter().collect()
            },
            PageAction::Unmounted => {
                let running = state.countdowns.running();
                running
                    .into_iter()
                    .filter_map(|host| state.countdowns.dispose(host))
                    .collect()
            },
            _ => SmallVec::new(),
        }
    }
}
