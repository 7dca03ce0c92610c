// Resolution options and polling configuration
//
// ResolveOptions travel to the resolver with every attempt and are serialized
// with the chain. FinderConfig and Urgency stay on the driver side and only
// shape the polling loop (deadline, cadence, dwell).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deadline for ordinary interactions
pub const FIND_TIMEOUT: Duration = Duration::from_secs(6);

/// Deadline for operations known to be slow
pub const SLOW_FIND_TIMEOUT: Duration = Duration::from_secs(90);

/// Deadline for exceptional operations
pub const AGONIZINGLY_SLOW_FIND_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// How long a successful outcome must persist before it is accepted
pub const DEFAULT_DWELL: Duration = Duration::from_millis(500);

/// Pause between consecutive resolution attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Environment flag enabling action description logging
pub const ENABLE_LOGS_ENV: &str = "ENABLE_LOGS";

/// Environment override for the poll interval, in milliseconds
pub const POLL_INTERVAL_ENV: &str = "SPOTTER_POLL_INTERVAL_MS";

/// Options that affect how the final constraint of a chain is matched.
///
/// `want_zero`, `enabled` and `disabled` apply to the last constraint only.
///
/// # Example
///
/// ```ignore
/// use spotter::ResolveOptions;
///
/// let options = ResolveOptions::builder()
///     .allow_unseen(true)
///     .enabled(true)
///     .build();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Skip the CSS visibility check
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_unseen: bool,
    /// Skip the occlusion check
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_covered: bool,
    /// Expect no match; success means confirmed absence
    #[serde(default, skip_serializing_if = "is_false")]
    pub want_zero: bool,
    /// Require the element and its ancestors to be enabled
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,
    /// Require the element or an ancestor to be disabled
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    /// `Some(true)`: scroll-only mode. `Some(false)`: no auto-scroll recovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<bool>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ResolveOptions {
    /// Create a new builder for ResolveOptions
    pub fn builder() -> ResolveOptionsBuilder {
        ResolveOptionsBuilder::default()
    }

    /// True when the resolver is in scroll-only mode
    pub fn is_scroll_mode(&self) -> bool {
        self.scroll == Some(true)
    }

    /// True when auto-scroll recovery may be attempted
    pub fn auto_scroll(&self) -> bool {
        self.scroll != Some(false)
    }

    /// True when a successful resolution yields `true` rather than an element
    pub fn expects_confirmation(&self) -> bool {
        self.want_zero || self.is_scroll_mode()
    }

    /// Overlays the set fields of `other` onto these options
    pub(crate) fn merged_with(mut self, other: &ResolveOptions) -> Self {
        self.allow_unseen |= other.allow_unseen;
        self.allow_covered |= other.allow_covered;
        self.want_zero |= other.want_zero;
        self.enabled |= other.enabled;
        self.disabled |= other.disabled;
        if other.scroll.is_some() {
            self.scroll = other.scroll;
        }
        self
    }
}

/// Builder for ResolveOptions
#[derive(Debug, Clone, Default)]
pub struct ResolveOptionsBuilder {
    options: ResolveOptions,
}

impl ResolveOptionsBuilder {
    /// Skip the hidden-by-style visibility check
    pub fn allow_unseen(mut self, allow: bool) -> Self {
        self.options.allow_unseen = allow;
        self
    }

    /// Accept elements covered by other elements
    pub fn allow_covered(mut self, allow: bool) -> Self {
        self.options.allow_covered = allow;
        self
    }

    /// Assert that no element matches
    pub fn want_zero(mut self, want_zero: bool) -> Self {
        self.options.want_zero = want_zero;
        self
    }

    /// Require an enabled element
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.options.enabled = enabled;
        self
    }

    /// Require a disabled element
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.options.disabled = disabled;
        self
    }

    /// Set scroll mode (`true`) or disable auto-scroll recovery (`false`)
    pub fn scroll(mut self, scroll: bool) -> Self {
        self.options.scroll = Some(scroll);
        self
    }

    /// Build the ResolveOptions
    pub fn build(self) -> ResolveOptions {
        self.options
    }
}

/// How long an action may wait for a stable outcome.
///
/// Urgency only selects the deadline; the polling algorithm is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Urgency {
    #[default]
    Regular,
    Slow,
    AgonizinglySlow,
}

impl Urgency {
    /// Prefix used in action descriptions
    pub fn description(&self) -> &'static str {
        match self {
            Urgency::Regular => "",
            Urgency::Slow => "slow.",
            Urgency::AgonizinglySlow => "agonizinglySlow.",
        }
    }
}

/// Driver-side polling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    pub regular_timeout: Duration,
    pub slow_timeout: Duration,
    pub agonizingly_slow_timeout: Duration,
    pub dwell: Duration,
    pub poll_interval: Duration,
    /// Log every action description at info level
    pub log_actions: bool,
    /// Class name of native input overlays that may intercept clicks
    pub input_overlay_class: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            regular_timeout: FIND_TIMEOUT,
            slow_timeout: SLOW_FIND_TIMEOUT,
            agonizingly_slow_timeout: AGONIZINGLY_SLOW_FIND_TIMEOUT,
            dwell: DEFAULT_DWELL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_actions: false,
            input_overlay_class: "mat-input-element".to_string(),
        }
    }
}

impl FinderConfig {
    /// Defaults adjusted by `ENABLE_LOGS` and `SPOTTER_POLL_INTERVAL_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(flag) = lookup(ENABLE_LOGS_ENV) {
            config.log_actions = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
        if let Some(ms) = lookup(POLL_INTERVAL_ENV) {
            match ms.trim().parse::<u64>() {
                Ok(ms) => config.poll_interval = Duration::from_millis(ms),
                Err(e) => tracing::warn!("Ignoring {}={:?}: {}", POLL_INTERVAL_ENV, ms, e),
            }
        }
        config
    }

    /// Deadline for the given urgency tier
    pub fn timeout(&self, urgency: Urgency) -> Duration {
        match urgency {
            Urgency::Regular => self.regular_timeout,
            Urgency::Slow => self.slow_timeout,
            Urgency::AgonizinglySlow => self.agonizingly_slow_timeout,
        }
    }

    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_regular_timeout(mut self, timeout: Duration) -> Self {
        self.regular_timeout = timeout;
        self
    }
}
