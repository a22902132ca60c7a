use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::Duration,
};

use frontpanel_logging::targets::T_DEVICE;

use crate::{
    config::KnobCodes,
    error::{PanelError, Result},
};

/// Offset of the event code inside a knob report.
pub const EVENT_OFFSET: usize = 2;
/// Reports are 6 bytes; read with room to spare so a longer report is not split.
const REPORT_BUF: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobEvent {
    Pressed,
    Right,
    Left,
}

/// Anything that can block until the user does something with the knob.
pub trait KnobSource: Send {
    fn next_event(&mut self) -> Result<KnobEvent>;
}

pub fn decode_report(report: &[u8], codes: &KnobCodes) -> Option<KnobEvent> {
    let code = *report.get(EVENT_OFFSET)?;
    if code == codes.press {
        Some(KnobEvent::Pressed)
    } else if code == codes.right {
        Some(KnobEvent::Right)
    } else if code == codes.left {
        Some(KnobEvent::Left)
    } else {
        None
    }
}

/// Knob on a hidraw node. Reads block until the device produces a report.
pub struct HidKnob<R = File> {
    path: PathBuf,
    reader: R,
    codes: KnobCodes,
}

impl HidKnob {
    pub fn open(path: &Path, codes: KnobCodes) -> Result<Self> {
        let file = File::open(path).map_err(|err| PanelError::device(path, err))?;
        Ok(Self::from_reader(path, file, codes))
    }
}

impl<R: Read> HidKnob<R> {
    /// `path` only labels errors and logs.
    pub fn from_reader(path: impl Into<PathBuf>, reader: R, codes: KnobCodes) -> Self {
        Self {
            path: path.into(),
            reader,
            codes,
        }
    }
}

impl<R: Read + Send> KnobSource for HidKnob<R> {
    /// Reports with an unknown code (key release, idle) are skipped.
    fn next_event(&mut self) -> Result<KnobEvent> {
        let mut buf = [0u8; REPORT_BUF];
        loop {
            let n = self
                .reader
                .read(&mut buf)
                .map_err(|err| PanelError::device(&self.path, err))?;
            if n == 0 {
                return Err(PanelError::device(
                    &self.path,
                    io::Error::from(io::ErrorKind::UnexpectedEof),
                ));
            }
            match decode_report(&buf[..n], &self.codes) {
                Some(event) => {
                    tracing::debug!(target: T_DEVICE, ?event, "knob");
                    return Ok(event);
                }
                None => {
                    tracing::trace!(target: T_DEVICE, report = ?&buf[..n], "ignored knob report");
                }
            }
        }
    }
}

/// Knob events read on their own thread, so a screen can wait on the knob and
/// on its background refresh at the same time.
///
/// The reader hands over one event at a time and stops after the first error.
pub struct KnobFeed {
    events: Receiver<Result<KnobEvent>>,
}

impl KnobFeed {
    pub fn spawn(mut source: Box<dyn KnobSource>) -> Result<Self> {
        let (tx, events) = mpsc::sync_channel(0);
        thread::Builder::new()
            .name("knob-reader".into())
            .spawn(move || loop {
                let event = source.next_event();
                let failed = event.is_err();
                if tx.send(event).is_err() || failed {
                    return;
                }
            })
            .map_err(|err| PanelError::device("knob-reader", err))?;
        Ok(Self { events })
    }

    /// Block until the next event.
    pub fn next_event(&self) -> Result<KnobEvent> {
        self.events.recv().unwrap_or_else(|_| Err(reader_stopped()))
    }

    /// Like [`next_event`](Self::next_event) but gives up after `timeout`.
    pub fn wait_event(&self, timeout: Duration) -> Option<Result<KnobEvent>> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(reader_stopped())),
        }
    }
}

fn reader_stopped() -> PanelError {
    PanelError::device(
        "knob-reader",
        io::Error::new(io::ErrorKind::BrokenPipe, "knob reader stopped"),
    )
}
