// Shared helpers for integration tests

#![allow(dead_code)]

use spotter::dom::{SnapshotDocument, SnapshotNode};
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a tracing subscriber once per test binary.
///
/// Filter with `RUST_LOG`, e.g. `RUST_LOG=spotter=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn body() -> SnapshotNode {
    SnapshotNode::new("body").at(0.0, 0.0, 1280.0, 720.0)
}

/// A container whose own text is "Form", holding a "Submit" button, with a
/// second "Submit" far below and outside it.
pub fn form_page() -> SnapshotDocument {
    SnapshotDocument::new(body().children([
        SnapshotNode::new("div")
            .id("form")
            .text("Form")
            .at(0.0, 0.0, 400.0, 200.0)
            .child(
                SnapshotNode::new("button")
                    .id("submit")
                    .text("Submit")
                    .at(20.0, 150.0, 80.0, 30.0),
            ),
        SnapshotNode::new("button")
            .id("submit-other")
            .text("Submit")
            .at(700.0, 500.0, 80.0, 30.0),
    ]))
}

/// A "Form" heading with one "Submit" button below it in its band.
pub fn heading_page() -> SnapshotDocument {
    SnapshotDocument::new(body().children([
        SnapshotNode::new("h2").id("title").text("Form").at(0.0, 0.0, 400.0, 30.0),
        SnapshotNode::new("button")
            .id("submit")
            .text("Submit")
            .at(20.0, 50.0, 80.0, 30.0),
    ]))
}

/// A dialog title with two "Cancel" buttons at the same distance below it.
pub fn dialog_page() -> SnapshotDocument {
    SnapshotDocument::new(body().children([
        SnapshotNode::new("h2").text("Dialog").at(0.0, 0.0, 600.0, 30.0),
        SnapshotNode::new("button")
            .id("cancel-left")
            .text("Cancel")
            .at(0.0, 50.0, 100.0, 30.0),
        SnapshotNode::new("button")
            .id("cancel-right")
            .text("Cancel")
            .at(300.0, 50.0, 100.0, 30.0),
    ]))
}
