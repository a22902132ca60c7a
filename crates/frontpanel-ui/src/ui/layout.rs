//! Text for each screen, kept apart from the I/O so it can be checked column by column.

use crate::{
    display::{center, LINE_WIDTH, SELECTION_MARKER},
    sensors::{LinkState, LoadAverage, RateSample},
    system::PowerAction,
    units::format_rate,
};

pub fn menu_banner(version: &str) -> String {
    center(&format!(" {version} "), LINE_WIDTH, '-')
}

pub fn menu_item(label: &str) -> String {
    format!("{SELECTION_MARKER} {label}")
}

pub fn interface_header(iface: &str, mac: &str, link: LinkState) -> String {
    format!("{iface} - {mac} - {link}")
}

/// `RX: 976.56kbit/s, TX: 12bit/s` with the RX column held at 13 characters
/// so TX does not jump around between refreshes.
pub fn rate_line(sample: &RateSample) -> String {
    let rx = format!("{},", format_rate(sample.rx_bps));
    let tx = format_rate(sample.tx_bps);
    format!("RX: {rx:<13} TX: {tx}")
}

pub fn load_line(load: &LoadAverage) -> String {
    format!(
        "CPU Load: {:.2} {:.2} {:.2}",
        load.one, load.five, load.fifteen
    )
}

pub fn thermal_line(temp_c: f64, fan_percent: f64) -> String {
    format!("Temp: {temp_c:.1}c, Fan: {fan_percent:.1}%")
}

pub fn power_prompt(action: PowerAction) -> String {
    center(action.prompt(), LINE_WIDTH, '-')
}

pub fn power_status(action: PowerAction) -> String {
    center(action.status(), LINE_WIDTH, '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_fills_the_line() {
        let banner = menu_banner("VyOS 1.1.8");
        assert_eq!(banner.len(), LINE_WIDTH);
        assert!(banner.starts_with("-------------- VyOS 1.1.8 "));
        assert!(banner.ends_with('-'));
    }

    #[test]
    fn menu_item_has_marker() {
        assert_eq!(menu_item("System Health"), "\x0B System Health");
    }

    #[test]
    fn header_and_rates() {
        assert_eq!(
            interface_header("eth0", "00:0d:b9:00:00:01", LinkState::Up),
            "eth0 - 00:0d:b9:00:00:01 - UP"
        );
        let line = rate_line(&RateSample {
            rx_bps: 1_000_000.0,
            tx_bps: 8.0,
        });
        assert_eq!(line, "RX: 976.56kbit/s, TX: 8bit/s");

        let idle = rate_line(&RateSample {
            rx_bps: 0.0,
            tx_bps: 0.0,
        });
        assert_eq!(idle, "RX: 0bit/s,       TX: 0bit/s");
    }

    #[test]
    fn health_lines() {
        let load = LoadAverage {
            one: 0.5,
            five: 0.25,
            fifteen: 1.0,
        };
        assert_eq!(load_line(&load), "CPU Load: 0.50 0.25 1.00");
        assert_eq!(thermal_line(45.5, 20.0), "Temp: 45.5c, Fan: 20.0%");
    }

    #[test]
    fn power_text() {
        let prompt = power_prompt(PowerAction::Shutdown);
        assert_eq!(prompt.len(), LINE_WIDTH);
        assert!(prompt.contains(" System will shut down. Confirm? "));
        assert_eq!(
            power_status(PowerAction::Reboot),
            "-------------- REBOOTING ---------------"
        );
    }
}
