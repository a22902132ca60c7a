use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use crate::error::{PanelError, Result};

pub type CancelFlag = Arc<AtomicBool>;

pub fn new_flag() -> CancelFlag {
    Arc::new(AtomicBool::new(false))
}

pub fn check_cancel(cancel: Option<&CancelFlag>) -> Result<()> {
    if let Some(flag) = cancel {
        if flag.load(Ordering::Relaxed) {
            return Err(PanelError::Cancelled);
        }
    }
    Ok(())
}

/// Sleep for `duration`, waking every 100ms to honour `cancel`.
pub fn cancel_sleep(cancel: Option<&CancelFlag>, duration: Duration) -> Result<()> {
    if duration.is_zero() {
        return check_cancel(cancel);
    }

    let start = Instant::now();
    let tick = Duration::from_millis(100);
    while start.elapsed() < duration {
        check_cancel(cancel)?;
        let remaining = duration.saturating_sub(start.elapsed());
        std::thread::sleep(tick.min(remaining));
    }
    check_cancel(cancel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flag_never_cancels() {
        assert!(check_cancel(None).is_ok());
        assert!(cancel_sleep(None, Duration::from_millis(5)).is_ok());
    }

    #[test]
    fn raised_flag_cuts_sleep_short() {
        let flag = new_flag();
        flag.store(true, Ordering::Relaxed);
        let start = Instant::now();
        let res = cancel_sleep(Some(&flag), Duration::from_secs(30));
        assert!(matches!(res, Err(PanelError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
