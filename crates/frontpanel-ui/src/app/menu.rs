use crate::{
    display::Line,
    error::Result,
    input::KnobEvent,
    menu::MenuItem,
    system::{query_version, PowerAction},
    ui::layout,
};

use super::state::App;

impl App {
    /// Drive the menu until a device error ends it. Reboot or shutdown normally
    /// ends the process first.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Front panel menu started");
        loop {
            self.step()?;
        }
    }

    /// One pass of the menu: redraw, wait for the knob, act on it.
    pub fn step(&mut self) -> Result<()> {
        let version = query_version(self.commands.as_mut(), &self.config.commands.version);
        self.display
            .write_line(&layout::menu_banner(&version), Line::Top)?;
        self.display
            .write_line(&layout::menu_item(self.menu.current().label()), Line::Bottom)?;

        match self.knob.next_event()? {
            KnobEvent::Pressed => self.open(self.menu.current()),
            KnobEvent::Right => {
                self.menu.move_right();
                Ok(())
            }
            KnobEvent::Left => {
                self.menu.move_left();
                Ok(())
            }
        }
    }

    pub fn open(&mut self, item: MenuItem) -> Result<()> {
        let span = tracing::info_span!("screen", item = item.label());
        let _guard = span.enter();
        tracing::info!("Opening screen");
        match item {
            MenuItem::InterfaceStatistics => self.interface_stats(),
            MenuItem::SystemHealth => self.system_health(),
            MenuItem::RebootSystem => self.confirm_power(PowerAction::Reboot),
            MenuItem::ShutdownSystem => self.confirm_power(PowerAction::Shutdown),
        }
    }
}
