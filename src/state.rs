//! Generation state for one flipbook editing session.
//!
//! [`FlipbookState`] owns the input text and everything derived from it:
//! line states, issues, printable entries and the loading flag. Editing the
//! text revalidates immediately; [`FlipbookState::generate`] additionally
//! resolves metadata for every valid line.
//!
//! A generation pass moves through `validating → resolving → settled`. Only
//! one pass is current at a time. Starting a new pass, or changing the text,
//! cancels the current one, and a cancelled pass ends without touching any
//! state. Each pass is identified by its own `Arc`, compared by pointer, so a
//! pass that settles late can never mistake a newer pass's bookkeeping for
//! its own.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    resolution::{resolve_entries, sort_issues},
    spotify::{ScannableCodes, TrackResolver},
    types::{GenerationSnapshot, Issue, LineState, LineStatus, RenderInfo},
    validation::evaluate_lines,
};

pub const EXAMPLE_INPUT: &str = "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC,This one reminds me of our hike in Lauterbrunnen
https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp,For when we need a dance break in the kitchen
https://open.spotify.com/track/7lPN2DXiMsVn7XUKtOW1CS,Play this on long train rides
https://open.spotify.com/track/1cTZMwcBJT0Ka3UJPXOeeN,Sunday morning coffee soundtrack
https://open.spotify.com/track/2takcwOaAZWiXQijPHIx7B,Night drive anthem
https://open.spotify.com/track/0VjIjW4GlUZAMYd2vXMi3b,Save this for your big wins";

/// One generation pass. Owned by the `generate` call that created it.
#[derive(Debug, Default)]
struct Pass {
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct Inner {
    snapshot: GenerationSnapshot,
    in_flight: Option<Arc<Pass>>,
}

impl Inner {
    fn revalidate(&mut self) {
        let evaluation = evaluate_lines(&self.snapshot.input_text);
        self.snapshot.line_states = evaluation.line_states;
        self.snapshot.issues = sorted(evaluation.issues);
    }

    fn cancel_in_flight(&mut self) {
        if let Some(pass) = self.in_flight.take() {
            pass.cancel.cancel();
            self.snapshot.is_loading = false;
        }
    }

    fn is_current(&self, pass: &Arc<Pass>) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, pass))
    }

    /// Clears the loading bookkeeping, but only if it still belongs to `pass`.
    fn finish(&mut self, pass: &Arc<Pass>) {
        if self.is_current(pass) {
            self.in_flight = None;
            self.snapshot.is_loading = false;
        }
    }

    /// Ends `pass` without a result. Its lines were marked `Resolving`, so
    /// they are validated again to drop that status.
    fn abandon(&mut self, pass: &Arc<Pass>) {
        if self.is_current(pass) {
            self.revalidate();
            self.finish(pass);
        }
    }
}

/// Abandons its pass on every exit from `generate` that did not commit,
/// including the `generate` future being dropped while lookups are pending.
struct PassGuard<'a> {
    state: &'a FlipbookState,
    pass: Arc<Pass>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.state.inner.lock().abandon(&self.pass);
    }
}

/// The state controller for one editing session.
pub struct FlipbookState {
    resolver: Arc<dyn TrackResolver>,
    scannable: ScannableCodes,
    inner: Mutex<Inner>,
}

impl FlipbookState {
    /// Creates a session pre-filled with [`EXAMPLE_INPUT`].
    pub fn new(resolver: Arc<dyn TrackResolver>, scannable: ScannableCodes) -> Self {
        Self::with_input(resolver, scannable, EXAMPLE_INPUT)
    }

    pub fn with_input(
        resolver: Arc<dyn TrackResolver>,
        scannable: ScannableCodes,
        input_text: impl Into<String>,
    ) -> Self {
        let mut inner = Inner::default();
        inner.snapshot.input_text = input_text.into();
        inner.revalidate();

        Self {
            resolver,
            scannable,
            inner: Mutex::new(inner),
        }
    }

    /// Replaces the input text and revalidates it.
    ///
    /// Setting the current text again does nothing. Otherwise any pass in
    /// flight is cancelled. Entries of the last generation stay in place
    /// until the next `generate`; `is_stale` reports that they no longer
    /// match the text.
    pub fn set_input_text(&self, text: &str) {
        let mut inner = self.inner.lock();
        if inner.snapshot.input_text == text {
            return;
        }

        inner.cancel_in_flight();
        inner.snapshot.input_text = text.to_string();
        inner.revalidate();
    }

    /// Validates the current text and resolves every valid line.
    ///
    /// Supersedes any pass already in flight. When this pass is itself
    /// superseded before its lookups settle, it returns without changing
    /// entries, line states, issues or the loading flag.
    pub async fn generate(&self) {
        let (pass, text, evaluation) = {
            let mut inner = self.inner.lock();
            inner.cancel_in_flight();

            let pass = Arc::new(Pass::default());
            inner.in_flight = Some(Arc::clone(&pass));
            inner.snapshot.is_loading = true;

            let text = inner.snapshot.input_text.clone();
            let mut evaluation = evaluate_lines(&text);
            for state in evaluation.line_states.iter_mut() {
                if state.status == LineStatus::Unvalidated {
                    state.status = LineStatus::Resolving;
                }
            }

            inner.snapshot.line_states = evaluation.line_states.clone();
            inner.snapshot.issues = sorted(evaluation.issues.clone());

            if evaluation.valid_entries.is_empty() {
                inner.snapshot.entries.clear();
                inner.snapshot.last_generated_text = Some(text);
                inner.finish(&pass);
                return;
            }

            (pass, text, evaluation)
        };

        let _guard = PassGuard {
            state: self,
            pass: Arc::clone(&pass),
        };

        let outcome = resolve_entries(
            self.resolver.as_ref(),
            &self.scannable,
            &evaluation,
            &pass.cancel,
        )
        .await;

        let Some(outcome) = outcome else {
            return;
        };

        let mut inner = self.inner.lock();
        if pass.cancel.is_cancelled() || !inner.is_current(&pass) {
            return;
        }

        inner.snapshot.entries = outcome.entries;
        inner.snapshot.line_states = outcome.line_states;
        inner.snapshot.issues = sorted(outcome.issues);
        inner.snapshot.last_generated_text = Some(text);
        inner.finish(&pass);
    }

    /// A copy of the whole session state, taken under one lock.
    pub fn snapshot(&self) -> GenerationSnapshot {
        self.inner.lock().snapshot.clone()
    }

    /// The text as last set, which may differ from the generated text.
    pub fn input_text(&self) -> String {
        self.inner.lock().snapshot.input_text.clone()
    }

    /// The text of the last settled pass, `None` before the first one.
    pub fn last_generated_text(&self) -> Option<String> {
        self.inner.lock().snapshot.last_generated_text.clone()
    }

    /// Cards of the last settled pass, in line order.
    pub fn entries(&self) -> Vec<RenderInfo> {
        self.inner.lock().snapshot.entries.clone()
    }

    pub fn line_states(&self) -> Vec<LineState> {
        self.inner.lock().snapshot.line_states.clone()
    }

    /// Issues sorted by line number.
    pub fn issues(&self) -> Vec<Issue> {
        self.inner.lock().snapshot.issues.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().snapshot.is_loading
    }

    /// `true` once the text differs from the last generated text.
    pub fn is_stale(&self) -> bool {
        self.inner.lock().snapshot.is_stale()
    }

    /// Number of non-blank lines.
    pub fn line_count(&self) -> usize {
        self.inner.lock().snapshot.line_count()
    }

    /// Lines without an issue. A degraded line has a warning and is not
    /// counted here.
    pub fn valid_line_count(&self) -> usize {
        self.inner.lock().snapshot.valid_line_count()
    }

    pub fn issue_line_count(&self) -> usize {
        self.inner.lock().snapshot.issue_line_count()
    }
}

fn sorted(mut issues: Vec<Issue>) -> Vec<Issue> {
    sort_issues(&mut issues);
    issues
}
