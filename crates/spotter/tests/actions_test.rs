// Integration tests for the action layer
//
// A recording driver runs resolution against a SnapshotDocument and logs
// every interaction, so the tests can check what was done to which element.
//
// Tests cover:
// - see / not.see / find with positional context
// - click with and without the input-overlay fallback
// - long press context-menu override, restored even when the press fails
// - tap, scroll_to and type_text
// - urgency tiers and negation misuse

mod common;

use async_trait::async_trait;
use parking_lot::Mutex;
use spotter::dom::snapshot::NodeId;
use spotter::dom::{Document, SnapshotDocument, SnapshotNode};
use spotter::{
    ChainedAction, DocumentExecutor, Driver, Error, FinderConfig, RemoteExecutor,
    ResolutionOutcome, ResolveOptions, ResolveRequest, by,
};
use std::sync::Arc;

struct RecordingDriver {
    executor: DocumentExecutor<SnapshotDocument>,
    log: Mutex<Vec<String>>,
    click_error: Option<String>,
    fail_long_press: bool,
}

impl RecordingDriver {
    fn new(doc: SnapshotDocument) -> Self {
        Self {
            executor: DocumentExecutor::new(Arc::new(doc)),
            log: Mutex::new(Vec::new()),
            click_error: None,
            fail_long_press: false,
        }
    }

    fn doc(&self) -> &SnapshotDocument {
        self.executor.document()
    }

    fn record(&self, entry: String) {
        self.log.lock().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    fn id_of(&self, element: &NodeId) -> String {
        self.doc().attribute(element, "id").unwrap_or_default()
    }
}

#[async_trait]
impl RemoteExecutor for RecordingDriver {
    type Handle = NodeId;

    async fn execute(&self, request: &ResolveRequest) -> spotter::Result<ResolutionOutcome<NodeId>> {
        self.executor.execute(request).await
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn click(&self, element: &NodeId) -> spotter::Result<()> {
        self.record(format!("click:{}", self.id_of(element)));
        match &self.click_error {
            Some(message) => Err(Error::ClickIntercepted(message.clone())),
            None => Ok(()),
        }
    }

    async fn move_and_click(&self, element: &NodeId) -> spotter::Result<()> {
        self.record(format!("move_and_click:{}", self.id_of(element)));
        Ok(())
    }

    async fn tap(&self, element: &NodeId) -> spotter::Result<()> {
        self.record(format!("tap:{}", self.id_of(element)));
        Ok(())
    }

    async fn long_press(&self, element: &NodeId) -> spotter::Result<()> {
        self.record(format!("long_press:{}", self.id_of(element)));
        if self.fail_long_press {
            return Err(Error::Execution("touch actions unsupported".to_string()));
        }
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> spotter::Result<serde_json::Value> {
        let kind = if script.contains("() => false") {
            "override_context_menu"
        } else {
            "restore_context_menu"
        };
        self.record(kind.to_string());
        Ok(serde_json::Value::Null)
    }

    async fn type_into_active(&self, text: &str) -> spotter::Result<()> {
        self.record(format!("type:{}", text));
        Ok(())
    }
}

fn action(driver: RecordingDriver) -> (Arc<RecordingDriver>, ChainedAction<RecordingDriver>) {
    common::init_tracing();
    let driver = Arc::new(driver);
    let action = ChainedAction::with_config(Arc::clone(&driver), FinderConfig::default());
    (driver, action)
}

fn input_page() -> SnapshotDocument {
    SnapshotDocument::new(common::body().children([
        SnapshotNode::new("label").id("label").text("Name").at(0.0, 0.0, 100.0, 20.0),
        SnapshotNode::new("input")
            .id("name")
            .class("mat-input-element")
            .at(120.0, 0.0, 200.0, 20.0),
        SnapshotNode::new("button").id("save").text("Save").at(0.0, 40.0, 80.0, 30.0),
        SnapshotNode::new("span").id("ghost").text("Ghost").opacity(0.0).at(0.0, 100.0, 80.0, 20.0),
    ]))
}

// ============================================================================
// see / find
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_see_with_positional_context() -> anyhow::Result<()> {
    let (_, spotter) = action(RecordingDriver::new(common::form_page()));

    assert!(spotter.inside("Form").see("Submit", None).await?);
    assert!(spotter.inside("Form").not().see("Delete", None).await?);

    let err = spotter
        .under("Form")
        .see("Submit", None)
        .await
        .expect_err("Submit is inside the form, not under it");
    assert!(err.to_string().starts_with("Failed to find under(\"Form\").see(\"Submit\"):"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_not_see_times_out_on_present_element() {
    let (_, spotter) = action(RecordingDriver::new(common::heading_page()));
    let err = spotter
        .not()
        .under("Form")
        .see("Submit", None)
        .await
        .expect_err("Submit is present");
    let message = err.to_string();
    assert!(message.starts_with("Failed to find not.under(\"Form\").see(\"Submit\"):"), "{}", message);
    assert!(message.contains("Found unwanted: Submit"), "{}", message);
}

#[tokio::test(start_paused = true)]
async fn test_see_with_options_in_description() {
    let (_, spotter) = action(RecordingDriver::new(input_page()));
    let options = ResolveOptions::builder().allow_unseen(true).build();
    let err = spotter
        .see("Nowhere", Some(options))
        .await
        .expect_err("no such element");
    assert!(
        err.to_string()
            .starts_with("Failed to find see(\"Nowhere\", {\"allowUnseen\":true}):")
    );
}

#[tokio::test(start_paused = true)]
async fn test_find_returns_none_on_timeout() -> anyhow::Result<()> {
    let (driver, spotter) = action(RecordingDriver::new(input_page()));

    assert_eq!(spotter.find("Missing").await?, None);
    // Transparent elements are found: find resolves with allow_unseen.
    assert_eq!(spotter.find("Ghost").await?, driver.doc().element_by_id("ghost"));
    assert_eq!(
        spotter.right_of("Name").find(by::css("input")).await?,
        driver.doc().element_by_id("name")
    );
    Ok(())
}

// ============================================================================
// click / tap / long press
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_click_resolves_then_clicks() -> anyhow::Result<()> {
    let (driver, spotter) = action(RecordingDriver::new(input_page()));
    spotter.under("Name").click("Save").await?;
    assert_eq!(driver.entries(), vec!["click:save"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_click_falls_back_when_input_overlay_intercepts() -> anyhow::Result<()> {
    let mut driver = RecordingDriver::new(input_page());
    driver.click_error = Some(
        "Other element would receive the click: <input class=\"mat-input-element\">".to_string(),
    );
    let (driver, spotter) = action(driver);

    spotter.right_of("Name").click(by::css("input")).await?;
    assert_eq!(driver.entries(), vec!["click:name", "move_and_click:name"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_other_interceptions_propagate() {
    let mut driver = RecordingDriver::new(input_page());
    driver.click_error = Some("Other element would receive the click: <div class=\"modal\">".to_string());
    let (driver, spotter) = action(driver);

    let err = spotter.click("Save").await.expect_err("intercepted");
    assert!(matches!(err, Error::ClickIntercepted(_)));
    assert_eq!(driver.entries(), vec!["click:save"]);
}

#[tokio::test(start_paused = true)]
async fn test_tap() -> anyhow::Result<()> {
    let (driver, spotter) = action(RecordingDriver::new(input_page()));
    spotter.tap("Save").await?;
    assert_eq!(driver.entries(), vec!["tap:save"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_long_press_overrides_and_restores_context_menu() -> anyhow::Result<()> {
    let (driver, spotter) = action(RecordingDriver::new(input_page()));
    spotter.long_press("Save").await?;
    assert_eq!(
        driver.entries(),
        vec!["override_context_menu", "long_press:save", "restore_context_menu"]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_long_press_restores_context_menu_on_failure() {
    let mut driver = RecordingDriver::new(input_page());
    driver.fail_long_press = true;
    let (driver, spotter) = action(driver);

    let err = spotter.long_press("Save").await.expect_err("press fails");
    assert!(err.to_string().contains("touch actions unsupported"));
    assert_eq!(
        driver.entries(),
        vec!["override_context_menu", "long_press:save", "restore_context_menu"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_element_never_reaches_the_driver() {
    let (driver, spotter) = action(RecordingDriver::new(input_page()));
    let err = spotter.long_press("Delete").await.expect_err("no such element");
    assert!(err.is_find_timeout());
    assert!(driver.entries().is_empty());
}

// ============================================================================
// scroll_to / type_text
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_scroll_to() -> anyhow::Result<()> {
    let doc = SnapshotDocument::new(SnapshotNode::new("body").at(0.0, 0.0, 1280.0, 5000.0).children([
        SnapshotNode::new("h2").text("Billing").at(0.0, 4000.0, 300.0, 30.0),
    ]));
    let (driver, spotter) = action(RecordingDriver::new(doc));

    spotter.scroll_to("Billing").await?;
    assert_eq!(driver.doc().scroll_offset(), (0.0, 4000.0));

    let err = spotter
        .under("Billing")
        .scroll_to("Total")
        .await
        .expect_err("scrolling takes one locator");
    assert!(matches!(err, Error::InvalidArgument(_)));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_type_text() -> anyhow::Result<()> {
    let (driver, spotter) = action(RecordingDriver::new(input_page()));
    spotter.right_of("Name").click(by::css("input")).await?;
    spotter.type_text("Ada").await?;
    assert_eq!(driver.entries(), vec!["click:name", "type:Ada"]);
    Ok(())
}

// ============================================================================
// Context modifiers
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_uses_longer_deadline() {
    let (_, spotter) = action(RecordingDriver::new(input_page()));
    let start = tokio::time::Instant::now();
    let err = spotter.slow().see("Missing", None).await.expect_err("missing");
    assert!(err.to_string().starts_with("Failed to find slow.see(\"Missing\"):"));
    assert!(start.elapsed() >= std::time::Duration::from_secs(90));
}

#[tokio::test(start_paused = true)]
async fn test_negation_only_applies_to_see() {
    let (driver, spotter) = action(RecordingDriver::new(input_page()));
    let err = spotter.not().click("Save").await.expect_err("not.click");
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(driver.entries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_prefix_is_reusable() -> anyhow::Result<()> {
    let (driver, spotter) = action(RecordingDriver::new(input_page()));
    let below_name = spotter.under("Name");
    below_name.click("Save").await?;
    assert!(below_name.not().see("Name", None).await?);
    assert_eq!(below_name.context().description(), "under(\"Name\").");
    assert_eq!(driver.entries(), vec!["click:save"]);
    Ok(())
}
