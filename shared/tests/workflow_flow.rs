use shared::progress::{CEILING_PERCENT, COMPLETE_PERCENT, TICK_INTERVAL_MS};
use shared::{IncomingFile, Phase, RunError, TickHandle, UpscaledImage, Workflow, WorkflowError};
use std::cell::RefCell;
use std::rc::Rc;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01";

/// Records every tick source ever started and whether it is still running.
#[derive(Clone, Default)]
struct Clock {
    tickers: Rc<RefCell<Vec<bool>>>,
}

impl Clock {
    fn ticker(&self) -> Ticker {
        let mut tickers = self.tickers.borrow_mut();
        tickers.push(true);
        Ticker {
            index: tickers.len() - 1,
            tickers: self.tickers.clone(),
        }
    }

    fn running(&self) -> usize {
        self.tickers.borrow().iter().filter(|running| **running).count()
    }
}

struct Ticker {
    index: usize,
    tickers: Rc<RefCell<Vec<bool>>>,
}

impl TickHandle for Ticker {
    fn cancel(self) {
        self.tickers.borrow_mut()[self.index] = false;
    }
}

fn file(name: &str, mime: &str) -> IncomingFile<Vec<u8>> {
    IncomingFile {
        handle: vec![1, 2, 3],
        name: name.into(),
        mime_type: mime.into(),
        size: 3,
    }
}

#[test]
fn full_upscale_session() {
    let clock = Clock::default();
    let mut workflow: Workflow<Vec<u8>, Ticker> = Workflow::new();

    // 1. Catalog arrives; first entry becomes the default
    workflow.load_catalog(vec!["EDSR_x2".into(), "EDSR_x3".into(), "EDSR_x4".into()]);
    assert_eq!(workflow.selected_model(), "EDSR_x2");

    // 2. Several selections, only the last image is kept
    let rejected = workflow.select_files(vec![file("notes.txt", "text/plain")]);
    assert_eq!(
        rejected,
        Err(WorkflowError::NoImageSelected { skipped: vec!["notes.txt".into()] })
    );
    workflow.select_files(vec![file("a.png", "image/png")]).unwrap();
    let accepted = workflow
        .select_files(vec![file("b.webp", "image/webp"), file("c.jpg", "image/jpeg")])
        .unwrap();
    assert!(accepted.skipped.is_empty());
    assert_eq!(workflow.selection().unwrap().name, "c.jpg");
    assert!(workflow.attach_preview(accepted.id, "data:image/jpeg;base64,AA==".into()));

    // 3. First run fails with a server error
    let run = workflow.begin_run(0.0, |_| clock.ticker()).unwrap();
    assert_eq!(run.model, "EDSR_x2");
    for _ in 0..40 {
        workflow.tick(run.id);
    }
    assert_eq!(workflow.phase(), Phase::Processing);
    workflow.complete_run(run.id, 4_000.0, Err(RunError::Status(500)));
    assert_eq!(workflow.error(), Some("Server error: 500"));
    assert_eq!(workflow.progress(), 0.0);
    assert_eq!(clock.running(), 0);

    // 4. User retries with another model and succeeds
    workflow.select_model("EDSR_x4").unwrap();
    assert!(workflow.error().is_none());

    let start = 10_000.0;
    let run = workflow.begin_run(start, |_| clock.ticker()).unwrap();
    assert_eq!(run.model, "EDSR_x4");
    assert_eq!(clock.running(), 1);

    // Simulated 60 seconds of ticks: the value creeps toward but never reaches completion
    let ticks = 60_000 / TICK_INTERVAL_MS;
    let mut last = workflow.progress();
    for _ in 0..ticks {
        workflow.tick(run.id);
        assert!(workflow.progress() >= last);
        last = workflow.progress();
    }
    assert!(last <= CEILING_PERCENT);

    let image = UpscaledImage::from_bytes(PNG_BYTES, Some("image/png")).unwrap();
    assert!(workflow.complete_run(run.id, start + 45_200.0, Ok(image)));
    assert_eq!(workflow.phase(), Phase::Succeeded);
    assert_eq!(workflow.progress(), COMPLETE_PERCENT);
    assert_eq!(workflow.progress_percent(), 100);
    assert_eq!(workflow.elapsed_seconds(), 45);
    assert!(!workflow.result().unwrap().data_uri.is_empty());
    assert_eq!(clock.running(), 0);
    assert_eq!(clock.tickers.borrow().len(), 2);
}

#[test]
fn response_for_replaced_run_is_ignored() {
    let clock = Clock::default();
    let mut workflow: Workflow<Vec<u8>, Ticker> = Workflow::new();
    workflow.select_files(vec![file("a.png", "image/png")]).unwrap();

    let first = workflow.begin_run(0.0, |_| clock.ticker()).unwrap();
    workflow.complete_run(first.id, 10.0, Err(RunError::Transport("offline".into())));
    let second = workflow.begin_run(20.0, |_| clock.ticker()).unwrap();

    // A duplicate completion of the first run must not touch the second one.
    assert!(!workflow.complete_run(first.id, 30.0, Err(RunError::Status(500))));
    assert_eq!(workflow.phase(), Phase::Uploading);
    assert_eq!(workflow.active_run(), Some(second.id));
    assert_eq!(clock.running(), 1);

    workflow.teardown();
    assert_eq!(clock.running(), 0);
}
