use std::time::Duration;

use crate::{
    cancel::CancelFlag,
    display::{center, Display, Line, LINE_WIDTH},
    error::Result,
    input::KnobEvent,
    menu::Cursor,
    refresh::refresh_until_event,
    sensors::SensorReader,
    ui::layout,
};

use super::state::App;

impl App {
    /// Live throughput for one interface at a time; the knob steps through them.
    pub(crate) fn interface_stats(&mut self) -> Result<()> {
        let interfaces = match self.sensors.list_interfaces() {
            Ok(list) => list,
            Err(err) if err.is_transient() => {
                tracing::warn!("Cannot list interfaces: {err}");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        if interfaces.is_empty() {
            return self.no_interfaces();
        }

        let mut cursor = Cursor::new(interfaces.len());
        let interval = self.config.timing.rate_interval();
        loop {
            let iface = interfaces[cursor.selection].as_str();
            tracing::debug!(iface, "Showing interface");
            self.display.clear()?;

            let sensors = &self.sensors;
            let outcome = refresh_until_event(
                &mut self.display,
                &self.knob,
                |display, cancel| draw_interface(display, sensors, iface, interval, cancel),
            )?;

            if let Err(err) = outcome.refresh {
                tracing::warn!("Leaving interface statistics: {err}");
                return Ok(());
            }
            match outcome.event {
                KnobEvent::Pressed => return Ok(()),
                KnobEvent::Right => cursor.move_right(),
                KnobEvent::Left => cursor.move_left(),
            }
        }
    }

    fn no_interfaces(&mut self) -> Result<()> {
        self.display.show(
            &center(" No interfaces found ", LINE_WIDTH, '-'),
            "Press to return to menu",
        )?;
        while self.knob.next_event()? != KnobEvent::Pressed {}
        Ok(())
    }
}

fn draw_interface(
    display: &mut Display,
    sensors: &SensorReader,
    iface: &str,
    interval: Duration,
    cancel: &CancelFlag,
) -> Result<()> {
    let mac = sensors.read_mac_address(iface)?;
    let link = sensors.read_link_state(iface);
    display.write_line(&layout::interface_header(iface, &mac, link), Line::Top)?;

    // The two-sample measurement is what paces this screen.
    let rates = sensors.read_interface_rates(iface, interval, Some(cancel))?;
    display.write_line(&layout::rate_line(&rates), Line::Bottom)
}
