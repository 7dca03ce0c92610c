// Actions - fluent, retrying interactions built on the poller
//
// A `ChainedAction` accumulates positional context (`under("Cheese")`,
// `slow()`, `not()`) as an immutable value, then completes with a verb
// (`see`, `find`, `click`, ...). Every verb resolves its element through
// `poll_until_stable`, so it waits for the page to settle before acting.
//
// Example descriptions logged per action:
//
//   see("Sandwich Order Form")
//   not.slow.under("Cheese").see("American")
//   leftOf("Name").rightOf(css(.label)).click("Edit")

use crate::chain::{Chain, Position};
use crate::error::{Error, Result};
use crate::executor::RemoteExecutor;
use crate::locator::Locator;
use crate::options::{FinderConfig, ResolveOptions, Urgency};
use crate::outcome::Resolved;
use crate::poller::poll_until_stable;
use async_trait::async_trait;
use std::sync::Arc;

/// Suppresses the emulated context menu a long press opens in desktop browsers
const INSTALL_CONTEXT_MENU_OVERRIDE: &str = "\
    window.__spotterOriginalOnContextMenu = window.oncontextmenu;\
    window.oncontextmenu = () => false;";

const RESTORE_CONTEXT_MENU: &str = "\
    window.oncontextmenu = window.__spotterOriginalOnContextMenu;\
    delete window.__spotterOriginalOnContextMenu;";

/// Page interactions the action layer needs beyond resolution.
///
/// All element arguments are handles previously returned by
/// [`RemoteExecutor::execute`].
#[async_trait]
pub trait Driver: RemoteExecutor {
    /// Native click on the element
    ///
    /// When another element would receive the click, implementations return
    /// [`Error::ClickIntercepted`] with the driver's message.
    async fn click(&self, element: &Self::Handle) -> Result<()>;

    /// Moves the pointer over the element and clicks at that position,
    /// regardless of what is on top
    async fn move_and_click(&self, element: &Self::Handle) -> Result<()>;

    async fn tap(&self, element: &Self::Handle) -> Result<()>;

    async fn long_press(&self, element: &Self::Handle) -> Result<()>;

    /// Runs a script in the page and returns its JSON result
    async fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    /// Sends keystrokes to the currently focused element
    async fn type_into_active(&self, text: &str) -> Result<()>;
}

/// Accumulated context of a chained action.
///
/// `anchors` holds the constraints resolved before the action's own target;
/// `pending` is how that target relates to the last anchor.
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    anchors: Chain,
    pending: Option<Position>,
    urgency: Urgency,
    negated: bool,
}

impl ActionContext {
    /// Adds an anchor; the next locator must lie in `position` from it
    pub fn add_anchor(&self, position: Position, locator: impl Into<Locator>) -> Self {
        let anchors = match self.pending {
            None => Chain::global(locator),
            Some(previous) => self.anchors.then(previous, locator),
        };
        Self {
            anchors,
            pending: Some(position),
            ..self.clone()
        }
    }

    pub fn with_urgency(&self, urgency: Urgency) -> Self {
        Self {
            urgency,
            ..self.clone()
        }
    }

    pub fn with_negation(&self, negated: bool) -> Self {
        Self {
            negated,
            ..self.clone()
        }
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The full chain for a target found in the current context
    pub fn chain_for(&self, target: impl Into<Locator>) -> Chain {
        match self.pending {
            None => Chain::global(target),
            Some(position) => self.anchors.then(position, target),
        }
    }

    /// `not.` + urgency + one `position("anchor").` segment per anchor
    pub fn description(&self) -> String {
        let mut text = String::new();
        if self.negated {
            text.push_str("not.");
        }
        text.push_str(self.urgency.description());
        let anchors = self.anchors.to_vec();
        for (i, anchor) in anchors.iter().enumerate() {
            let position = anchors
                .get(i + 1)
                .map(|next| next.position)
                .or(self.pending)
                .unwrap_or(Position::Global);
            text.push_str(&format!("{}({}).", position, anchor.locator.pretty()));
        }
        text
    }
}

/// A fluent action over a [`Driver`].
///
/// Modifier methods return new values and never change the receiver, so a
/// partially built action can be reused:
///
/// ```ignore
/// let cheese = spotter.under("Cheese");
/// cheese.see("Provolone").await?;
/// cheese.not().see("American").await?;
/// spotter.right_of("Name").click(by::css("input")).await?;
/// ```
pub struct ChainedAction<D: Driver> {
    driver: Arc<D>,
    context: ActionContext,
    config: Arc<FinderConfig>,
}

impl<D: Driver> Clone for ChainedAction<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            context: self.context.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<D: Driver> ChainedAction<D> {
    /// Starts an empty action with configuration from the environment
    pub fn new(driver: Arc<D>) -> Self {
        Self::with_config(driver, FinderConfig::from_env())
    }

    pub fn with_config(driver: Arc<D>, config: FinderConfig) -> Self {
        Self {
            driver,
            context: ActionContext::default(),
            config: Arc::new(config),
        }
    }

    pub fn context(&self) -> &ActionContext {
        &self.context
    }

    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    fn with_context(&self, context: ActionContext) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            context,
            config: Arc::clone(&self.config),
        }
    }

    /// Target must be below the element found by `locator` and share its
    /// horizontal band
    pub fn under(&self, locator: impl Into<Locator>) -> Self {
        self.with_context(self.context.add_anchor(Position::Under, locator))
    }

    /// Target must be below the element found by `locator`
    pub fn below(&self, locator: impl Into<Locator>) -> Self {
        self.with_context(self.context.add_anchor(Position::Below, locator))
    }

    /// Target must be left of the element found by `locator`, in its row
    pub fn left_of(&self, locator: impl Into<Locator>) -> Self {
        self.with_context(self.context.add_anchor(Position::LeftOf, locator))
    }

    /// Target must be right of the element found by `locator`, in its row
    pub fn right_of(&self, locator: impl Into<Locator>) -> Self {
        self.with_context(self.context.add_anchor(Position::RightOf, locator))
    }

    /// Target must overlap the element found by `locator`
    pub fn inside(&self, locator: impl Into<Locator>) -> Self {
        self.with_context(self.context.add_anchor(Position::Inside, locator))
    }

    pub fn slow(&self) -> Self {
        self.with_context(self.context.with_urgency(Urgency::Slow))
    }

    pub fn agonizingly_slow(&self) -> Self {
        self.with_context(self.context.with_urgency(Urgency::AgonizinglySlow))
    }

    /// Negates `see`: the target must stay absent
    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> Self {
        self.with_context(self.context.with_negation(true))
    }

    fn timeout(&self) -> std::time::Duration {
        self.config.timeout(self.context.urgency)
    }

    fn log(&self, description: &str) {
        if self.config.log_actions {
            tracing::info!("{}", description);
        } else {
            tracing::debug!("{}", description);
        }
    }

    fn describe(&self, verb: &str, args: &str) -> String {
        format!("{}{}({})", self.context.description(), verb, args)
    }

    /// True once an element matching the context is stably visible, or, for a
    /// negated action, stably absent.
    ///
    /// # Errors
    ///
    /// [`Error::FindTimeout`] when that never happens before the deadline.
    pub async fn see(&self, locator: impl Into<Locator>, options: Option<ResolveOptions>) -> Result<bool> {
        let locator = locator.into();
        let args = match &options {
            Some(options) => format!("{}, {}", locator.pretty(), serde_json::to_string(options)?),
            None => locator.pretty(),
        };
        let description = self.describe("see", &args);
        self.log(&description);

        let base = ResolveOptions::builder().want_zero(self.context.negated).build();
        let options = match &options {
            Some(extra) => base.merged_with(extra),
            None => base,
        };
        poll_until_stable(
            self.driver.as_ref(),
            &self.context.chain_for(locator),
            self.timeout(),
            &description,
            &options,
            &self.config,
        )
        .await?;
        Ok(true)
    }

    /// The element matching the context, or `None` if none was found in time.
    ///
    /// Hidden elements count (`allow_unseen`). Errors other than the timeout
    /// are propagated.
    pub async fn find(&self, locator: impl Into<Locator>) -> Result<Option<D::Handle>> {
        let locator = locator.into();
        let description = self.describe("find", &locator.pretty());
        self.log(&description);

        match self.element(locator, &description).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_find_timeout() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Clicks the element matching the context.
    ///
    /// A click intercepted by a native input overlay is retried as a pointer
    /// move followed by a click at the element's position.
    pub async fn click(&self, locator: impl Into<Locator>) -> Result<()> {
        let locator = locator.into();
        let description = self.describe("click", &locator.pretty());
        self.log(&description);

        let element = self.element(locator, &description).await?;
        match self.driver.click(&element).await {
            Err(Error::ClickIntercepted(message))
                if message.contains(&self.config.input_overlay_class) =>
            {
                tracing::info!("Input element is blocking the click, retrying at the element's position");
                self.driver.move_and_click(&element).await
            }
            other => other,
        }
    }

    pub async fn tap(&self, locator: impl Into<Locator>) -> Result<()> {
        let locator = locator.into();
        let description = self.describe("tap", &locator.pretty());
        self.log(&description);

        let element = self.element(locator, &description).await?;
        self.driver.tap(&element).await
    }

    /// Long-presses the element matching the context.
    ///
    /// The page's context-menu handler is overridden for the duration of the
    /// press and restored afterwards, also when the press fails.
    pub async fn long_press(&self, locator: impl Into<Locator>) -> Result<()> {
        let locator = locator.into();
        let description = self.describe("longPress", &locator.pretty());
        self.log(&description);

        let element = self.element(locator, &description).await?;
        self.driver.execute_script(INSTALL_CONTEXT_MENU_OVERRIDE).await?;
        let pressed = self.driver.long_press(&element).await;
        let restored = self.driver.execute_script(RESTORE_CONTEXT_MENU).await;
        if let Err(e) = &restored {
            tracing::warn!("Failed to restore the context menu handler: {}", e);
        }
        pressed?;
        restored.map(|_| ())
    }

    /// Scrolls the single displayable match into view.
    ///
    /// Positional context does not apply; scrolling takes exactly one locator.
    pub async fn scroll_to(&self, locator: impl Into<Locator>) -> Result<()> {
        let locator = locator.into();
        let description = self.describe("scrollTo", &locator.pretty());
        self.log(&description);

        if self.context.pending.is_some() {
            return Err(Error::InvalidArgument(format!(
                "{}: scrolling does not take positional context",
                description
            )));
        }
        let options = ResolveOptions::builder().scroll(true).build();
        poll_until_stable(
            self.driver.as_ref(),
            &Chain::global(locator),
            self.timeout(),
            &description,
            &options,
            &self.config,
        )
        .await?;
        Ok(())
    }

    /// Types into whatever element has focus
    pub async fn type_text(&self, text: &str) -> Result<()> {
        let description = format!("type({})", text);
        self.log(&description);
        self.driver.type_into_active(text).await
    }

    async fn element(&self, locator: Locator, description: &str) -> Result<D::Handle> {
        if self.context.negated {
            return Err(Error::InvalidArgument(format!(
                "{}: not. can only be combined with see()",
                description
            )));
        }
        let options = ResolveOptions::builder().allow_unseen(true).build();
        let resolved = poll_until_stable(
            self.driver.as_ref(),
            &self.context.chain_for(locator),
            self.timeout(),
            description,
            &options,
            &self.config,
        )
        .await?;
        match resolved {
            Resolved::Element(element) => Ok(element),
            Resolved::Confirmed => Err(Error::UnexpectedOutcome(
                "an element was expected but absence was confirmed".to_string(),
            )),
        }
    }
}
