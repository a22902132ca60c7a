use std::thread;

use crate::{
    display::Line,
    error::Result,
    input::KnobEvent,
    system::PowerAction,
    ui::{confirm::Confirm, layout},
};

use super::state::App;

impl App {
    /// Ask before rebooting or powering off. Only a press on `Yes` runs anything.
    pub(crate) fn confirm_power(&mut self, action: PowerAction) -> Result<()> {
        self.display
            .write_line(&layout::power_prompt(action), Line::Top)?;
        let mut choice = Confirm::default();

        loop {
            self.display.write_line(&choice.row(), Line::Bottom)?;
            match self.knob.next_event()? {
                KnobEvent::Right | KnobEvent::Left => choice = choice.toggled(),
                KnobEvent::Pressed => {
                    if choice == Confirm::Yes {
                        self.execute_power(action)?;
                    } else {
                        tracing::info!(?action, "Cancelled from panel");
                    }
                    return Ok(());
                }
            }
        }
    }

    fn execute_power(&mut self, action: PowerAction) -> Result<()> {
        self.display.clear()?;
        self.display
            .write_line(&layout::power_status(action), Line::Top)?;

        let argv = match action {
            PowerAction::Reboot => &self.config.commands.reboot,
            PowerAction::Shutdown => &self.config.commands.shutdown,
        };
        tracing::warn!(?action, ?argv, "Power action requested from panel");
        match self.commands.run(argv) {
            Ok(out) if out.success => {}
            Ok(_) => tracing::error!(?action, "Power command exited with failure"),
            Err(err) => tracing::error!(?action, "Power command failed: {err}"),
        }

        // If we are still alive after this the command did not take; go back to the menu.
        let grace = self.config.timing.grace_period();
        thread::sleep(grace);
        tracing::warn!(
            ?action,
            "System still running {}s after power command",
            grace.as_secs()
        );
        Ok(())
    }
}
