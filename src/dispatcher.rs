use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::client::BackendClient;
use crate::api::models::ScrapeForm;
use crate::api::response::ScrapeResponse;
use crate::config::RenderMode;
use crate::error::{ErrorKind, PresenterError, Result};
use crate::render::Renderer;
use crate::view::View;

pub const EMPTY_URL_MESSAGE: &str = "Please enter a URL or select a website";

/// What a submission ended up showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Cards were rendered for this many records.
    Rendered(usize),
    /// The payload was shown as pretty-printed JSON.
    Raw,
    /// The backend succeeded but returned no records.
    Empty,
    /// An error was shown on the view.
    Failed(ErrorKind),
}

/// Sends the scrape form to the backend and routes the answer to the view.
#[derive(Debug)]
pub struct Dispatcher {
    client: BackendClient,
    renderer: Renderer,
    mode: RenderMode,
    in_flight: AtomicBool,
}

impl Dispatcher {
    pub fn new(client: BackendClient, renderer: Renderer, mode: RenderMode) -> Self {
        Dispatcher {
            client,
            renderer,
            mode,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Handles one form submission.
    ///
    /// Blank input is rejected before any request is made, as is a submission
    /// while another one is still running. Otherwise the view is put in its
    /// loading state for the duration of the request and restored on every
    /// exit path, including when the returned future is dropped early.
    pub async fn submit<V: View + ?Sized>(&self, view: &mut V, form: &ScrapeForm) -> SubmitOutcome {
        let url = form.url.trim();
        if url.is_empty() {
            return fail(view, PresenterError::Validation(EMPTY_URL_MESSAGE.to_string()));
        }

        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            warn!(url, "Submission ignored while a request is in flight");
            return fail(view, PresenterError::Busy);
        };

        let mut view = LoadingView::enter(view);
        let form = ScrapeForm {
            url: url.to_string(),
            scraper_type: form.scraper_type,
        };

        match self.dispatch(&mut *view, &form).await {
            Ok(outcome) => outcome,
            Err(e) => fail(&mut *view, e),
        }
    }

    async fn dispatch<V: View + ?Sized>(&self, view: &mut V, form: &ScrapeForm) -> Result<SubmitOutcome> {
        info!(url = %form.url, scraper_type = ?form.scraper_type, "Submitting scrape request");
        let reply = self.client.scrape(form).await?;

        let Some(body) = reply.body else {
            return Err(PresenterError::Transport(format!("HTTP {}", reply.http_status)));
        };
        if !body.is_object() {
            return Err(PresenterError::Transport(
                "Response body is not a JSON object".to_string(),
            ));
        }
        let response = ScrapeResponse::deserialize(&body)?;

        if !reply.http_status.is_success() || !response.is_success() {
            return Err(PresenterError::Application(response.failure_message()));
        }

        let outcome = match self.mode {
            RenderMode::Cards => {
                let records = response.records()?;
                match self.renderer.render(view, &records) {
                    0 => SubmitOutcome::Empty,
                    n => SubmitOutcome::Rendered(n),
                }
            }
            // Raw output never decodes records, so any item shape prints.
            RenderMode::RawJson => {
                if response.has_no_raw_records() {
                    self.renderer.render(view, &[]);
                    SubmitOutcome::Empty
                } else {
                    let data = response.data.unwrap_or(Value::Null);
                    self.renderer.render_raw(view, &data);
                    SubmitOutcome::Raw
                }
            }
        };

        info!(url = %form.url, ?outcome, "Scrape request finished");
        Ok(outcome)
    }
}

fn fail<V: View + ?Sized>(view: &mut V, err: PresenterError) -> SubmitOutcome {
    error!(error = %err, "Scrape request failed");
    view.show_error(&err.user_message());
    SubmitOutcome::Failed(err.kind())
}

/// Holds the in-flight flag; cleared on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Puts the view into its loading state and restores it on drop.
struct LoadingView<'a, V: View + ?Sized>(&'a mut V);

impl<'a, V: View + ?Sized> LoadingView<'a, V> {
    fn enter(view: &'a mut V) -> Self {
        view.set_submit_enabled(false);
        view.set_loading(true);
        view.clear_results();
        view.clear_error();
        view.set_export_controls_visible(false);
        LoadingView(view)
    }
}

impl<V: View + ?Sized> Deref for LoadingView<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        self.0
    }
}

impl<V: View + ?Sized> DerefMut for LoadingView<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        self.0
    }
}

impl<V: View + ?Sized> Drop for LoadingView<'_, V> {
    fn drop(&mut self) {
        self.0.set_loading(false);
        self.0.set_submit_enabled(true);
    }
}
