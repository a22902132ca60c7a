use std::time::Duration;

use crate::{
    cancel::{cancel_sleep, CancelFlag},
    display::Display,
    error::Result,
    input::KnobEvent,
    refresh::refresh_until_event,
    sensors::SensorReader,
    ui::layout,
};

use super::state::App;

impl App {
    pub(crate) fn system_health(&mut self) -> Result<()> {
        self.display.clear()?;
        let interval = self.config.timing.health_interval();

        loop {
            let sensors = &self.sensors;
            let outcome = refresh_until_event(
                &mut self.display,
                &self.knob,
                |display, cancel| draw_health(display, sensors, interval, cancel),
            )?;

            if let Err(err) = outcome.refresh {
                tracing::warn!("Leaving system health: {err}");
                return Ok(());
            }
            if outcome.event == KnobEvent::Pressed {
                return Ok(());
            }
        }
    }
}

fn draw_health(
    display: &mut Display,
    sensors: &SensorReader,
    interval: Duration,
    cancel: &CancelFlag,
) -> Result<()> {
    let load = sensors.read_load_average()?;
    let temp = sensors.read_temperature()?;
    let fan = sensors.read_fan_duty()?;
    display.show(&layout::load_line(&load), &layout::thermal_line(temp, fan))?;
    cancel_sleep(Some(cancel), interval)
}
