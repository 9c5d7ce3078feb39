//! Browser tests for section reveal and the navigation shell.
//!
//! Run with: `cargo test --test browser_reveal -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/browser/generated")
}

fn ensure_fixtures_built() {
    static BUILT: OnceLock<()> = OnceLock::new();
    BUILT.get_or_init(|| {
        let bin = env!("CARGO_BIN_EXE_folio");
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        let output_dir = generated_dir();
        if output_dir.exists() {
            std::fs::remove_dir_all(&output_dir).expect("failed to clean output dir");
        }

        let status = Command::new(bin)
            .args([
                "build",
                "--source",
                root.join("fixtures/content").to_str().unwrap(),
                "--output",
                output_dir.to_str().unwrap(),
                "--temp-dir",
                root.join(".folio-browser-temp").to_str().unwrap(),
            ])
            .status()
            .expect("failed to run folio");
        assert!(status.success(), "fixture generation failed");
    });
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn load_index() -> Arc<Tab> {
    ensure_fixtures_built();
    let tab = browser().new_tab().unwrap();
    let file = generated_dir().join("index.html");
    assert!(file.exists(), "missing: {}", file.display());

    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval(tab: &Tab, js: &str) -> serde_json::Value {
    tab.evaluate(js, false)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned")
}

fn variant(tab: &Tab, section: &str) -> String {
    eval(
        tab,
        &format!("document.getElementById('{section}').getAttribute('data-variant')"),
    )
    .as_str()
    .expect("variant is not a string")
    .to_string()
}

fn scroll_to(tab: &Tab, js_offset: &str) {
    eval(tab, &format!("window.scrollTo(0, {js_offset}); true"));
    std::thread::sleep(Duration::from_millis(300));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn home_is_revealed_on_load() {
    let tab = load_index();
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(variant(&tab, "home"), "visible");
}

#[test]
#[ignore]
fn lower_sections_start_hidden() {
    let tab = load_index();
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(variant(&tab, "contact"), "hidden");
}

#[test]
#[ignore]
fn section_reveals_when_scrolled_into_view_and_stays() {
    let tab = load_index();
    scroll_to(&tab, "document.getElementById('projects').offsetTop");
    assert_eq!(variant(&tab, "projects"), "visible");

    scroll_to(&tab, "0");
    assert_eq!(variant(&tab, "projects"), "visible", "trigger-once latch");
}

#[test]
#[ignore]
fn nav_switches_style_past_threshold() {
    let tab = load_index();
    let scrolled = "document.getElementById('site-nav').classList.contains('scrolled')";
    assert_eq!(eval(&tab, scrolled), serde_json::Value::Bool(false));
    scroll_to(&tab, "200");
    assert_eq!(eval(&tab, scrolled), serde_json::Value::Bool(true));
    scroll_to(&tab, "0");
    assert_eq!(eval(&tab, scrolled), serde_json::Value::Bool(false));
}

#[test]
#[ignore]
fn nav_link_click_marks_active() {
    let tab = load_index();
    eval(
        &tab,
        "document.querySelector('.nav-links a[data-section=\"skills\"]').click(); true",
    );
    let active = eval(
        &tab,
        "document.querySelector('.nav-links a.active').getAttribute('data-section')",
    );
    assert_eq!(active.as_str(), Some("skills"));
}

#[test]
#[ignore]
fn contact_form_starts_idle_without_token() {
    let tab = load_index();
    let status = eval(
        &tab,
        "document.getElementById('contact-form').getAttribute('data-status')",
    );
    assert_eq!(status.as_str(), Some("idle"));
    let html = eval(&tab, "document.documentElement.outerHTML");
    assert!(!html.as_str().unwrap().contains("accessToken\":"));
}
