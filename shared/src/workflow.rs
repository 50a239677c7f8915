//! Upload-and-process workflow.
//!
//! One [`Workflow`] value owns everything a single upscale screen needs: the
//! model catalog, the selected file, the run phase, simulated progress and the
//! outcome. Platform code feeds it events (files picked, ticks, responses) and
//! renders from its getters. Every asynchronous message carries an identifier,
//! so a tick or response belonging to a finished or abandoned run is ignored
//! and the real response always has the last word over the simulation.

use crate::image_data::{DecodeError, UpscaledImage};
use crate::intake::{IncomingFile, SelectedFile, SelectionId, pick_last_image};
use crate::progress::{self, SimulatedProgress};
use derive_more::Display;
use thiserror::Error;
use uuid::Uuid;

/// Model used until the catalog has been fetched.
pub const DEFAULT_MODEL: &str = "EDSR_x2";

/// A repeating tick source owned by the workflow for the duration of a run.
pub trait TickHandle {
    /// Stops the tick source. Called exactly once per handle.
    fn cancel(self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub struct RunId(Uuid);

impl RunId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Idle,
    Uploading,
    Processing,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Uploading | Phase::Processing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

/// Operations the workflow refuses in its current state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("An upscale run is already in progress")]
    RunInFlight,
    #[error("No image selected")]
    NoFileSelected,
    #[error("Unknown model: {0}")]
    UnknownModel(String),
    #[error("No valid image selected (skipped: {})", .skipped.join(", "))]
    NoImageSelected { skipped: Vec<String> },
}

/// Why a run failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Server error: {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Failed to decode upscaled image: {0}")]
    Decode(#[from] DecodeError),
}

/// Everything the platform needs to issue the request of a freshly started run.
#[derive(Debug, Clone)]
pub struct RunTicket<F> {
    pub id: RunId,
    pub file: F,
    pub file_name: String,
    pub model: String,
}

/// An accepted selection and the names of any non-images dropped from the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub id: SelectionId,
    pub skipped: Vec<String>,
}

struct ActiveRun<T: TickHandle> {
    id: RunId,
    started_at_ms: f64,
    simulator: SimulatedProgress,
    ticker: T,
}

impl<T: TickHandle> ActiveRun<T> {
    fn stop(self) -> (RunId, f64) {
        self.ticker.cancel();
        (self.id, self.started_at_ms)
    }
}

pub struct Workflow<F, T: TickHandle> {
    catalog: Vec<String>,
    selected_model: String,
    selection: Option<SelectedFile<F>>,
    phase: Phase,
    progress: f64,
    result: Option<UpscaledImage>,
    error: Option<String>,
    elapsed_seconds: u64,
    active: Option<ActiveRun<T>>,
}

impl<F, T: TickHandle> Default for Workflow<F, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, T: TickHandle> Workflow<F, T> {
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            selected_model: DEFAULT_MODEL.to_string(),
            selection: None,
            phase: Phase::Idle,
            progress: progress::RESET_PERCENT,
            result: None,
            error: None,
            elapsed_seconds: 0,
            active: None,
        }
    }

    // Catalog

    /// Stores a fetched catalog and selects its first entry.
    ///
    /// An empty list leaves catalog and selection untouched. Returns whether the catalog changed.
    pub fn load_catalog(&mut self, models: Vec<String>) -> bool {
        let Some(first) = models.first().cloned() else {
            log::warn!("Model catalog is empty");
            return false;
        };

        log::info!("Loaded {} models, default {}", models.len(), first);
        self.catalog = models;
        if !self.phase.is_in_flight() && self.selected_model != first {
            self.selected_model = first;
            self.clear_outcome();
        }
        true
    }

    /// Switches model. Returns `Ok(false)` when the model was already selected.
    pub fn select_model(&mut self, model: &str) -> Result<bool, WorkflowError> {
        self.ensure_not_in_flight()?;
        if !self.catalog.iter().any(|m| m == model) {
            return Err(WorkflowError::UnknownModel(model.to_string()));
        }
        if self.selected_model == model {
            return Ok(false);
        }

        self.selected_model = model.to_string();
        self.clear_outcome();
        Ok(true)
    }

    // Intake

    /// Replaces the selection with the last image of `files`.
    pub fn select_files(&mut self, files: Vec<IncomingFile<F>>) -> Result<Accepted, WorkflowError> {
        self.ensure_not_in_flight()?;

        let picked = pick_last_image(files);
        let Some(file) = picked.file else {
            return Err(WorkflowError::NoImageSelected {
                skipped: picked.skipped,
            });
        };

        log::info!("Selected {} ({} bytes, {})", file.name, file.size, file.mime_type);
        let id = file.id;
        self.selection = Some(file);
        self.clear_outcome();

        Ok(Accepted {
            id,
            skipped: picked.skipped,
        })
    }

    /// Attaches a rendered preview if `id` still names the current selection.
    pub fn attach_preview(&mut self, id: SelectionId, data_uri: String) -> bool {
        match self.selection.as_mut() {
            Some(file) if file.id == id => {
                file.preview = Some(data_uri);
                true
            }
            _ => {
                log::debug!("Discarding preview for replaced selection {}", id);
                false
            }
        }
    }

    /// Clears the selection and everything derived from it.
    pub fn remove_file(&mut self) -> Result<bool, WorkflowError> {
        self.ensure_not_in_flight()?;
        if self.selection.take().is_none() {
            return Ok(false);
        }
        self.clear_outcome();
        Ok(true)
    }

    pub fn dismiss_error(&mut self) -> bool {
        if self.error.take().is_none() {
            return false;
        }
        if self.phase == Phase::Failed {
            self.phase = Phase::Idle;
        }
        true
    }

    // Runs

    pub fn can_submit(&self) -> bool {
        self.selection.is_some() && !self.phase.is_in_flight()
    }

    /// Starts a run. Any previous tick source is cancelled before `start_ticker` is called.
    pub fn begin_run(
        &mut self,
        now_ms: f64,
        start_ticker: impl FnOnce(RunId) -> T,
    ) -> Result<RunTicket<F>, WorkflowError>
    where
        F: Clone,
    {
        self.ensure_not_in_flight()?;
        let Some(file) = self.selection.as_ref() else {
            return Err(WorkflowError::NoFileSelected);
        };
        let ticket = RunTicket {
            id: RunId::new(),
            file: file.handle.clone(),
            file_name: file.name.clone(),
            model: self.selected_model.clone(),
        };

        if let Some(stale) = self.active.take() {
            stale.stop();
        }

        let simulator = SimulatedProgress::start();
        self.phase = Phase::Uploading;
        self.progress = simulator.value();
        self.result = None;
        self.error = None;
        self.active = Some(ActiveRun {
            id: ticket.id,
            started_at_ms: now_ms,
            simulator,
            ticker: start_ticker(ticket.id),
        });

        log::info!("Run {} started: {} with {}", ticket.id, ticket.file_name, ticket.model);
        Ok(ticket)
    }

    /// Advances the simulated progress of run `id`. Returns whether anything changed.
    pub fn tick(&mut self, id: RunId) -> bool {
        let Some(run) = self.active.as_mut().filter(|run| run.id == id) else {
            log::debug!("Ignoring tick for inactive run {}", id);
            return false;
        };

        let before = self.progress;
        self.progress = run.simulator.advance();
        if self.phase == Phase::Uploading && !run.simulator.is_uploading() {
            self.phase = Phase::Processing;
            return true;
        }
        self.progress != before
    }

    /// Applies the real outcome of run `id`. Returns whether it was applied.
    pub fn complete_run(
        &mut self,
        id: RunId,
        finished_at_ms: f64,
        outcome: Result<UpscaledImage, RunError>,
    ) -> bool {
        if self.active.as_ref().is_none_or(|run| run.id != id) {
            log::debug!("Ignoring outcome of inactive run {}", id);
            return false;
        }
        let Some(run) = self.active.take() else {
            return false;
        };
        let (id, started_at_ms) = run.stop();

        match outcome {
            Ok(image) => {
                self.elapsed_seconds = elapsed_seconds(started_at_ms, finished_at_ms);
                log::info!(
                    "Run {} succeeded in {}s ({} bytes, {})",
                    id,
                    self.elapsed_seconds,
                    image.byte_len,
                    image.mime_type
                );
                self.phase = Phase::Succeeded;
                self.progress = progress::COMPLETE_PERCENT;
                self.result = Some(image);
                self.error = None;
            }
            Err(e) => {
                log::error!("Run {} failed: {}", id, e);
                self.phase = Phase::Failed;
                self.progress = progress::RESET_PERCENT;
                self.result = None;
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Releases the tick source of any active run. Later ticks and outcomes are ignored.
    pub fn teardown(&mut self) {
        if let Some(run) = self.active.take() {
            let (id, _) = run.stop();
            log::info!("Run {} abandoned on teardown", id);
        }
    }

    // Accessors

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    pub fn selection(&self) -> Option<&SelectedFile<F>> {
        self.selection.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while the simulated upload stage lasts.
    pub fn is_uploading(&self) -> bool {
        self.phase == Phase::Uploading
    }

    /// True for the whole run, upload stage included.
    pub fn is_processing(&self) -> bool {
        self.phase.is_in_flight()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn progress_percent(&self) -> u8 {
        progress::display_percent(self.progress)
    }

    pub fn result(&self) -> Option<&UpscaledImage> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.active.as_ref().map(|run| run.id)
    }

    fn ensure_not_in_flight(&self) -> Result<(), WorkflowError> {
        if self.phase.is_in_flight() {
            Err(WorkflowError::RunInFlight)
        } else {
            Ok(())
        }
    }

    fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
        self.progress = progress::RESET_PERCENT;
        if self.phase.is_terminal() {
            self.phase = Phase::Idle;
        }
    }
}

impl<F, T: TickHandle> Drop for Workflow<F, T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn elapsed_seconds(started_at_ms: f64, finished_at_ms: f64) -> u64 {
    ((finished_at_ms - started_at_ms) / 1000.0).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[derive(Clone, Default)]
    struct Timers {
        started: Rc<Cell<u32>>,
        cancelled: Rc<Cell<u32>>,
    }

    impl Timers {
        fn live(&self) -> u32 {
            self.started.get() - self.cancelled.get()
        }

        fn start(&self) -> impl FnOnce(RunId) -> FakeTicker + '_ {
            move |_| {
                self.started.set(self.started.get() + 1);
                FakeTicker(self.cancelled.clone())
            }
        }
    }

    struct FakeTicker(Rc<Cell<u32>>);

    impl TickHandle for FakeTicker {
        fn cancel(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    type TestWorkflow = Workflow<&'static str, FakeTicker>;

    fn image(name: &str) -> IncomingFile<&'static str> {
        IncomingFile {
            handle: "blob",
            name: name.into(),
            mime_type: "image/png".into(),
            size: 1024,
        }
    }

    fn png() -> UpscaledImage {
        UpscaledImage::from_bytes(PNG_BYTES, Some("image/png")).unwrap()
    }

    fn ready_workflow() -> TestWorkflow {
        let mut workflow = TestWorkflow::new();
        workflow.load_catalog(vec!["EDSR_x2".into(), "EDSR_x4".into()]);
        workflow.select_files(vec![image("cat.png")]).unwrap();
        workflow
    }

    #[test]
    fn catalog_selects_first_model() {
        let mut workflow = TestWorkflow::new();
        assert_eq!(workflow.selected_model(), DEFAULT_MODEL);
        assert!(workflow.load_catalog(vec!["EDSR_x2".into(), "EDSR_x4".into()]));
        assert_eq!(workflow.selected_model(), "EDSR_x2");

        let mut workflow = TestWorkflow::new();
        workflow.load_catalog(vec!["EDSR_x4".into(), "EDSR_x2".into()]);
        assert_eq!(workflow.selected_model(), "EDSR_x4");
    }

    #[test]
    fn empty_catalog_keeps_default() {
        let mut workflow = TestWorkflow::new();
        assert!(!workflow.load_catalog(Vec::new()));
        assert!(workflow.catalog().is_empty());
        assert_eq!(workflow.selected_model(), DEFAULT_MODEL);
        assert_eq!(
            workflow.select_model("EDSR_x2"),
            Err(WorkflowError::UnknownModel("EDSR_x2".into()))
        );
    }

    #[test]
    fn double_submission_is_rejected() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();

        workflow.begin_run(0.0, timers.start()).unwrap();
        let second = workflow.begin_run(10.0, timers.start());

        assert!(matches!(second, Err(WorkflowError::RunInFlight)));
        assert_eq!(timers.started.get(), 1);
        assert_eq!(timers.live(), 1);
        assert!(!workflow.can_submit());
    }

    #[test]
    fn repeated_clicks_keep_the_first_run() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();

        let first = workflow.begin_run(0.0, timers.start()).unwrap().id;
        for click in 1..5 {
            assert_eq!(
                workflow.begin_run(click as f64 * 50.0, timers.start()).err(),
                Some(WorkflowError::RunInFlight)
            );
        }

        assert_eq!(workflow.active_run(), Some(first));
        assert_eq!(timers.started.get(), 1);
        assert!(workflow.tick(first));
        assert!(workflow.complete_run(first, 2_000.0, Ok(png())));
        assert_eq!(workflow.phase(), Phase::Succeeded);
        assert_eq!(timers.live(), 0);
    }

    #[test]
    fn submission_requires_a_file() {
        let timers = Timers::default();
        let mut workflow = TestWorkflow::new();
        assert!(matches!(
            workflow.begin_run(0.0, timers.start()),
            Err(WorkflowError::NoFileSelected)
        ));
        assert_eq!(timers.started.get(), 0);
    }

    #[test]
    fn ticket_carries_file_and_model() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        workflow.select_model("EDSR_x4").unwrap();

        let ticket = workflow.begin_run(0.0, timers.start()).unwrap();
        assert_eq!(ticket.file_name, "cat.png");
        assert_eq!(ticket.model, "EDSR_x4");
        assert_eq!(workflow.active_run(), Some(ticket.id));
        assert_eq!(workflow.phase(), Phase::Uploading);
        assert_eq!(workflow.progress(), progress::START_PERCENT);
    }

    #[test]
    fn phase_moves_to_processing_at_threshold() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(0.0, timers.start()).unwrap().id;

        while workflow.progress() < progress::UPLOAD_PHASE_THRESHOLD {
            assert!(workflow.is_uploading());
            assert!(workflow.tick(run));
        }
        assert_eq!(workflow.phase(), Phase::Processing);
        assert!(!workflow.is_uploading());
        assert!(workflow.is_processing());
    }

    #[test]
    fn success_is_authoritative_over_simulation() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(1_000.0, timers.start()).unwrap().id;

        let mut last = workflow.progress();
        for _ in 0..50 {
            workflow.tick(run);
            assert!(workflow.progress() >= last);
            last = workflow.progress();
        }

        assert!(workflow.complete_run(run, 32_600.0, Ok(png())));
        assert_eq!(workflow.phase(), Phase::Succeeded);
        assert_eq!(workflow.progress(), progress::COMPLETE_PERCENT);
        assert_eq!(workflow.elapsed_seconds(), 32);
        assert!(workflow.error().is_none());
        assert!(workflow.result().unwrap().data_uri.starts_with("data:image/png;base64,"));
        assert_eq!(timers.live(), 0);

        // A tick that was already queued when the response landed changes nothing.
        assert!(!workflow.tick(run));
        assert_eq!(workflow.progress(), progress::COMPLETE_PERCENT);
    }

    #[test]
    fn server_error_resets_run() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(0.0, timers.start()).unwrap().id;
        for _ in 0..30 {
            workflow.tick(run);
        }

        assert!(workflow.complete_run(run, 500.0, Err(RunError::Status(500))));
        assert_eq!(workflow.phase(), Phase::Failed);
        assert!(workflow.error().unwrap().contains("500"));
        assert_eq!(workflow.progress(), 0.0);
        assert!(!workflow.is_uploading());
        assert!(!workflow.is_processing());
        assert!(workflow.result().is_none());
        assert_eq!(timers.live(), 0);
        assert!(workflow.can_submit());
    }

    #[test]
    fn decode_failure_is_a_run_failure() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(0.0, timers.start()).unwrap().id;

        let err = UpscaledImage::from_bytes(&[], None).unwrap_err();
        workflow.complete_run(run, 10.0, Err(err.into()));
        assert_eq!(workflow.phase(), Phase::Failed);
        assert!(workflow.error().unwrap().contains("decode"));
    }

    #[test]
    fn elapsed_time_never_negative() {
        assert_eq!(elapsed_seconds(5_000.0, 4_000.0), 0);
        assert_eq!(elapsed_seconds(0.0, 1_499.0), 1);
        assert_eq!(elapsed_seconds(0.0, 1_500.0), 2);
    }

    #[test]
    fn new_file_after_success_returns_to_idle() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(0.0, timers.start()).unwrap().id;
        workflow.complete_run(run, 100.0, Ok(png()));

        workflow.select_files(vec![image("dog.png")]).unwrap();
        assert_eq!(workflow.phase(), Phase::Idle);
        assert!(workflow.result().is_none());
        assert!(workflow.error().is_none());
        assert_eq!(workflow.progress(), 0.0);
        assert_eq!(workflow.selection().unwrap().name, "dog.png");
    }

    #[test]
    fn new_model_after_failure_returns_to_idle() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(0.0, timers.start()).unwrap().id;
        workflow.complete_run(run, 100.0, Err(RunError::Transport("offline".into())));

        assert_eq!(workflow.select_model("EDSR_x4"), Ok(true));
        assert_eq!(workflow.phase(), Phase::Idle);
        assert!(workflow.error().is_none());
        assert_eq!(workflow.select_model("EDSR_x4"), Ok(false));
    }

    #[test]
    fn intake_and_model_are_locked_during_run() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        workflow.begin_run(0.0, timers.start()).unwrap();

        assert_eq!(
            workflow.select_files(vec![image("dog.png")]),
            Err(WorkflowError::RunInFlight)
        );
        assert_eq!(workflow.select_model("EDSR_x4"), Err(WorkflowError::RunInFlight));
        assert_eq!(workflow.remove_file(), Err(WorkflowError::RunInFlight));
        assert_eq!(workflow.selection().unwrap().name, "cat.png");
    }

    #[test]
    fn stale_preview_is_discarded() {
        let mut workflow = TestWorkflow::new();
        let first = workflow.select_files(vec![image("a.png")]).unwrap().id;
        let second = workflow.select_files(vec![image("b.png")]).unwrap().id;

        assert!(!workflow.attach_preview(first, "data:image/png;base64,AAAA".into()));
        assert!(workflow.attach_preview(second, "data:image/png;base64,BBBB".into()));
        assert_eq!(
            workflow.selection().unwrap().preview.as_deref(),
            Some("data:image/png;base64,BBBB")
        );
    }

    #[test]
    fn removing_file_clears_everything() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(0.0, timers.start()).unwrap().id;
        workflow.complete_run(run, 100.0, Err(RunError::Status(502)));

        assert_eq!(workflow.remove_file(), Ok(true));
        assert!(workflow.selection().is_none());
        assert!(workflow.error().is_none());
        assert_eq!(workflow.phase(), Phase::Idle);
        assert!(!workflow.can_submit());
        assert_eq!(workflow.remove_file(), Ok(false));
    }

    #[test]
    fn dismissing_error_returns_to_idle() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(0.0, timers.start()).unwrap().id;
        workflow.complete_run(run, 100.0, Err(RunError::Status(500)));

        assert!(workflow.dismiss_error());
        assert_eq!(workflow.phase(), Phase::Idle);
        assert!(!workflow.dismiss_error());
    }

    #[test]
    fn teardown_releases_timer_and_freezes_state() {
        let timers = Timers::default();
        let mut workflow = ready_workflow();
        let run = workflow.begin_run(0.0, timers.start()).unwrap().id;
        workflow.tick(run);
        let frozen = workflow.progress();

        workflow.teardown();
        assert_eq!(timers.live(), 0);
        assert!(workflow.active_run().is_none());
        assert!(!workflow.tick(run));
        assert!(!workflow.complete_run(run, 50.0, Ok(png())));
        assert_eq!(workflow.progress(), frozen);
        assert!(workflow.result().is_none());
    }

    #[test]
    fn dropping_workflow_cancels_timer() {
        let timers = Timers::default();
        {
            let mut workflow = ready_workflow();
            workflow.begin_run(0.0, timers.start()).unwrap();
            assert_eq!(timers.live(), 1);
        }
        assert_eq!(timers.live(), 0);
    }
}
