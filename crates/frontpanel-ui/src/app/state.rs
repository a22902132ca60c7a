use crate::{
    config::PanelConfig,
    display::Display,
    error::Result,
    input::{HidKnob, KnobFeed, KnobSource},
    menu::MenuState,
    sensors::SensorReader,
    system::{CommandRunner, SystemRunner},
};

pub struct App {
    pub(crate) display: Display,
    pub(crate) knob: KnobFeed,
    pub(crate) sensors: SensorReader,
    pub(crate) commands: Box<dyn CommandRunner>,
    pub(crate) config: PanelConfig,
    pub(crate) menu: MenuState,
}

impl App {
    /// Open the configured LCD and knob devices.
    pub fn new(config: PanelConfig) -> Result<Self> {
        let display = Display::open(&config.devices.display);
        let knob = HidKnob::open(&config.devices.knob, config.knob)?;
        Self::with_parts(config, display, Box::new(knob), Box::new(SystemRunner))
    }

    /// Starts the knob reader thread for `knob`.
    pub fn with_parts(
        config: PanelConfig,
        display: Display,
        knob: Box<dyn KnobSource>,
        commands: Box<dyn CommandRunner>,
    ) -> Result<Self> {
        let sensors = SensorReader::new(config.sensors.clone(), config.fan.clone());
        Ok(Self {
            display,
            knob: KnobFeed::spawn(knob)?,
            sensors,
            commands,
            config,
            menu: MenuState::new(),
        })
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }
}
