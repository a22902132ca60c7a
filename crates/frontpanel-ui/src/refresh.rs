//! Background redraw while the foreground waits on the knob.
//!
//! The refresh thread borrows the display mutably for as long as it runs and is
//! always joined before [`refresh_until_event`] returns, so the caller can never
//! write to the LCD while a refresh is still in flight.

use std::{
    sync::atomic::Ordering,
    thread::{self, ScopedJoinHandle},
    time::Duration,
};

use crate::{
    cancel::{check_cancel, new_flag, CancelFlag},
    display::{center, Display, Line, LINE_WIDTH},
    error::{PanelError, Result},
    input::{KnobEvent, KnobFeed},
};

#[derive(Debug)]
pub struct RefreshOutcome {
    pub event: KnobEvent,
    /// `Ok` if the refresh was still healthy when it was stopped.
    pub refresh: Result<()>,
}

/// How often the foreground checks on the worker while waiting for the knob.
const WORKER_POLL: Duration = Duration::from_millis(100);

/// Run `redraw` in a loop on a worker thread until the knob produces an event.
///
/// `redraw` paints one frame and sleeps its own cadence through the supplied
/// flag. A transient sensor error ends the loop early and leaves a notice on the
/// display; the event wait continues so the user can acknowledge it. Any other
/// worker error is returned as soon as the worker stops, without waiting for
/// the knob.
pub fn refresh_until_event<F>(
    display: &mut Display,
    knob: &KnobFeed,
    redraw: F,
) -> Result<RefreshOutcome>
where
    F: FnMut(&mut Display, &CancelFlag) -> Result<()> + Send,
{
    let cancel = new_flag();

    thread::scope(|scope| -> Result<RefreshOutcome> {
        let cancel_ref = &cancel;
        let mut worker = Some(scope.spawn(move || refresh_loop(display, cancel_ref, redraw)));
        let mut refresh = Ok(());

        let event = loop {
            if worker.as_ref().is_some_and(|handle| handle.is_finished()) {
                if let Some(handle) = worker.take() {
                    refresh = fatal_or(join_worker(handle))?;
                }
            }
            if worker.is_none() {
                break knob.next_event();
            }
            if let Some(event) = knob.wait_event(WORKER_POLL) {
                break event;
            }
        };

        cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = worker {
            refresh = fatal_or(join_worker(handle))?;
        }
        Ok(RefreshOutcome {
            event: event?,
            refresh,
        })
    })
}

fn join_worker(handle: ScopedJoinHandle<'_, Result<()>>) -> Result<()> {
    match handle.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Pass transient outcomes through as a value; anything else becomes the error.
fn fatal_or(refresh: Result<()>) -> Result<Result<()>> {
    match refresh {
        Err(err) if !err.is_transient() => {
            tracing::error!("Display refresh failed: {err}");
            Err(err)
        }
        other => Ok(other),
    }
}

fn refresh_loop<F>(display: &mut Display, cancel: &CancelFlag, mut redraw: F) -> Result<()>
where
    F: FnMut(&mut Display, &CancelFlag) -> Result<()>,
{
    let result = loop {
        if let Err(err) = check_cancel(Some(cancel)).and_then(|_| redraw(display, cancel)) {
            break err;
        }
    };

    match result {
        PanelError::Cancelled => Ok(()),
        err if err.is_transient() => {
            tracing::warn!("Stopping refresh: {err}");
            display.write_line(&center(" Sensor unavailable ", LINE_WIDTH, '-'), Line::Top)?;
            display.write_line("Press to return to menu", Line::Bottom)?;
            Err(err)
        }
        err => Err(err),
    }
}
