/*!
 * End-to-end runs through the controller with a scripted browser
 */

use std::fs;
use std::time::Duration;
use tokio::time::Instant;

use webslate::app_config::RenderWait;
use webslate::build_chunks;
use webslate::drivers::mock::{MockBehavior, MockEvent, MockLauncher};
use webslate::{Config, Controller};

use crate::common;

#[tokio::test]
async fn test_run_withShortText_shouldTranslateInOneChunk() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "Hello. World! How are you?").unwrap();
    let output = temp_dir.path().join("output.txt");

    let controller = Controller::with_config(common::fast_config_with_limit(100)).unwrap();
    let launcher = MockLauncher::working();
    let summary = controller.run(&launcher, &input, &output).await.unwrap();

    assert_eq!(summary.chunks, 1);
    assert_eq!(fs::read_to_string(&output).unwrap(), "<Hello. World! How are you?>");
    assert_eq!(launcher.typed(), vec!["Hello. World! How are you?"]);
    assert_eq!(launcher.launches(), 1);
    assert!(launcher.was_quit());
}

#[tokio::test]
async fn test_run_withLongText_shouldSubmitChunksInOrder() {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", common::sample_text()).unwrap();
    let output = temp_dir.path().join("out").join("result.txt");

    let controller = Controller::with_config(common::fast_config_with_limit(60)).unwrap();
    let launcher = MockLauncher::working();
    let summary = controller.run(&launcher, &input, &output).await.unwrap();

    let expected_chunks = build_chunks(common::sample_text(), 60);
    assert!(expected_chunks.len() > 1);
    assert_eq!(summary.chunks, expected_chunks.len());
    assert_eq!(launcher.typed(), expected_chunks);

    // Translations are concatenated without extra separators
    let expected_output: String = expected_chunks.iter().map(|c| format!("<{}>", c)).collect();
    assert_eq!(fs::read_to_string(&output).unwrap(), expected_output);
    assert_eq!(summary.output_chars, expected_output.chars().count());
}

#[tokio::test]
async fn test_run_shouldClearInputBetweenChunks() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "One. Two. Three.").unwrap();
    let output = temp_dir.path().join("output.txt");

    let controller = Controller::with_config(common::fast_config_with_limit(6)).unwrap();
    let launcher = MockLauncher::working();
    controller.run(&launcher, &input, &output).await.unwrap();

    let events = launcher.events();
    let typed = events.iter().filter(|e| matches!(e, MockEvent::Typed(_))).count();
    let cleared = events.iter().filter(|e| matches!(e, MockEvent::Cleared)).count();
    assert_eq!(typed, 3);
    assert_eq!(cleared, 3);

    // Each submission is followed by a read before the next clear
    let mut last_typed = None;
    for (index, event) in events.iter().enumerate() {
        match event {
            MockEvent::Typed(_) => last_typed = Some(index),
            MockEvent::Cleared => {
                let typed_at = last_typed.take().unwrap();
                assert!(events[typed_at..index].iter().any(|e| matches!(e, MockEvent::Read(_))));
            }
            _ => {}
        }
    }
    assert_eq!(fs::read_to_string(&output).unwrap(), "<One.>< Two.>< Three.>");
}

#[tokio::test]
async fn test_run_withEmptyInput_shouldSubmitSingleEmptyChunk() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "").unwrap();
    let output = temp_dir.path().join("output.txt");

    let controller = Controller::with_config(common::fast_config()).unwrap();
    let launcher = MockLauncher::working();
    let summary = controller.run(&launcher, &input, &output).await.unwrap();

    assert_eq!(summary.chunks, 1);
    assert_eq!(launcher.typed(), vec![String::new()]);
    assert_eq!(fs::read_to_string(&output).unwrap(), "<>");
}

#[tokio::test]
async fn test_run_shouldNavigateToLanguagePairUrl() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "Guten Tag.").unwrap();
    let output = temp_dir.path().join("output.txt");

    let config = Config {
        source_language: "de".to_string(),
        target_language: "en".to_string(),
        ..common::fast_config()
    };
    let controller = Controller::with_config(config).unwrap();
    let launcher = MockLauncher::working();
    controller.run(&launcher, &input, &output).await.unwrap();

    let events = launcher.events();
    assert_eq!(events[0], MockEvent::Launched { headless: true });
    assert_eq!(
        events[1],
        MockEvent::Navigated("https://www.deepl.com/en/translator#de/en/-".to_string())
    );
}

#[tokio::test]
async fn test_run_withPolledRenderWait_shouldWaitForOutput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "Slow. Page.").unwrap();
    let output = temp_dir.path().join("output.txt");

    let config = Config {
        render_wait: RenderWait::PollUntilStable {
            interval_ms: 1,
            timeout_secs: 5.0,
        },
        ..common::fast_config_with_limit(6)
    };
    let controller = Controller::with_config(config).unwrap();
    let launcher = MockLauncher::working().with_render_after_reads(3);
    controller.run(&launcher, &input, &output).await.unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "<Slow.>< Page.>");
}

#[tokio::test]
async fn test_run_withSlowInputElement_shouldKeepProbing() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "Hi.").unwrap();
    let output = temp_dir.path().join("output.txt");

    let config = Config {
        element_timeout_secs: 5.0,
        ..common::fast_config()
    };
    let controller = Controller::with_config(config).unwrap();
    let launcher = MockLauncher::new(MockBehavior::ReadyAfterProbes(1));
    controller.run(&launcher, &input, &output).await.unwrap();

    let probes = launcher.events().iter().filter(|e| matches!(e, MockEvent::Probed(_))).count();
    assert_eq!(probes, 2);
    assert_eq!(fs::read_to_string(&output).unwrap(), "<Hi.>");
}

#[tokio::test]
async fn test_run_withQuitFailure_shouldStillSucceed() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "Hello.").unwrap();
    let output = temp_dir.path().join("output.txt");

    let controller = Controller::with_config(common::fast_config()).unwrap();
    let launcher = MockLauncher::new(MockBehavior::FailOnQuit);
    controller.run(&launcher, &input, &output).await.unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "<Hello.>");
}

#[tokio::test]
async fn test_run_withVisibleBrowser_shouldLaunchHeaded() {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "Hello.").unwrap();
    let output = temp_dir.path().join("output.txt");

    let mut config = common::fast_config();
    config.browser.headless = false;
    config.verbose = true;
    let controller = Controller::with_config(config).unwrap();
    let launcher = MockLauncher::working();
    controller.run(&launcher, &input, &output).await.unwrap();

    assert_eq!(launcher.events()[0], MockEvent::Launched { headless: false });
}

#[tokio::test]
async fn test_probe_shouldReturnPageSourcePreviewAndQuit() {
    let controller = Controller::with_config(common::fast_config()).unwrap();
    let launcher = MockLauncher::working();

    let preview = controller.probe(&launcher).await.unwrap();

    assert!(preview.starts_with("<html>"));
    assert!(preview.chars().count() <= 300);
    assert!(launcher.was_quit());
    assert!(launcher.typed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_run_withDefaultDelays_shouldSettleOnceAndWaitAfterEachChunk() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "input.txt", "One. Two.").unwrap();
    let output = temp_dir.path().join("output.txt");

    let config = Config {
        char_limit: 6,
        ..Config::default()
    };
    let controller = Controller::with_config(config).unwrap();
    let launcher = MockLauncher::working();

    let started = Instant::now();
    let summary = controller.run(&launcher, &input, &output).await.unwrap();
    let elapsed = started.elapsed();

    // 12 s after navigation, then 12 s after each of the two submissions
    assert_eq!(summary.chunks, 2);
    assert!(elapsed >= Duration::from_secs(36), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(36_100), "{:?}", elapsed);
    assert_eq!(fs::read_to_string(&output).unwrap(), "<One.>< Two.>");
}

#[tokio::test(start_paused = true)]
async fn test_probe_shouldOpenBareTranslatorUrlWithoutSettling() {
    let config = Config::default();
    let translator_url = config.translator_url.clone();
    let controller = Controller::with_config(config).unwrap();
    let launcher = MockLauncher::working();

    let started = Instant::now();
    controller.probe(&launcher).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(launcher.events()[1], MockEvent::Navigated(translator_url));
}
