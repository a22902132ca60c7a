//! Two-line, 40-column character LCD behind a HID report interface.
//!
//! Every write is one packet: an 8 byte preamble that picks the line, then
//! exactly [`LINE_WIDTH`] bytes of text.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use frontpanel_logging::targets::T_DEVICE;

use crate::error::{PanelError, Result};

pub const LINE_WIDTH: usize = 40;
pub const PREAMBLE_LEN: usize = 8;
pub const PACKET_LEN: usize = PREAMBLE_LEN + LINE_WIDTH;

/// Glyph the LCD draws as a right-pointing arrow.
pub const SELECTION_MARKER: char = '\x0B';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Top,
    Bottom,
}

impl Line {
    fn select_byte(self) -> u8 {
        match self {
            Line::Top => 0x00,
            Line::Bottom => 0x01,
        }
    }
}

/// Where finished packets go. The real panel is a character device; tests record.
pub trait PanelSink: Send {
    fn send(&mut self, packet: &[u8]) -> Result<()>;
}

/// Opens the device for every packet, the way the firmware expects one report per open.
pub struct DeviceSink {
    path: PathBuf,
}

impl DeviceSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PanelSink for DeviceSink {
    fn send(&mut self, packet: &[u8]) -> Result<()> {
        let mut dev = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|err| PanelError::device(&self.path, err))?;
        dev.write_all(packet)
            .map_err(|err| PanelError::device(&self.path, err))
    }
}

pub struct Display {
    sink: Box<dyn PanelSink>,
}

impl Display {
    pub fn new(sink: Box<dyn PanelSink>) -> Self {
        Self { sink }
    }

    pub fn open(path: &Path) -> Self {
        Self::new(Box::new(DeviceSink::new(path)))
    }

    pub fn write_line(&mut self, text: &str, line: Line) -> Result<()> {
        let packet = encode_packet(text, line);
        tracing::trace!(target: T_DEVICE, ?line, text, "lcd write");
        self.sink.send(&packet)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.write_line("", Line::Top)?;
        self.write_line("", Line::Bottom)
    }

    pub fn show(&mut self, top: &str, bottom: &str) -> Result<()> {
        self.write_line(top, Line::Top)?;
        self.write_line(bottom, Line::Bottom)
    }
}

/// Build the packet for one line. Text past 40 characters is cut off, shorter text
/// is padded with spaces, and anything outside ASCII becomes `?`.
pub fn encode_packet(text: &str, line: Line) -> [u8; PACKET_LEN] {
    let mut packet = [b' '; PACKET_LEN];
    packet[..PREAMBLE_LEN].copy_from_slice(&[
        0x02,
        0x00,
        0x00,
        line.select_byte(),
        LINE_WIDTH as u8,
        0x00,
        0x00,
        0x00,
    ]);
    for (slot, ch) in packet[PREAMBLE_LEN..].iter_mut().zip(text.chars()) {
        *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
    packet
}

/// Center `text` in `width` columns using `fill`; odd padding puts the extra column
/// on the right. Text already at or over `width` is returned unchanged.
pub fn center(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = width - len;
    let left = pad / 2;
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(fill).take(left));
    out.push_str(text);
    out.extend(std::iter::repeat(fill).take(pad - left));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Vec<u8>>>>);

    impl PanelSink for Recorder {
        fn send(&mut self, packet: &[u8]) -> Result<()> {
            self.0.lock().unwrap().push(packet.to_vec());
            Ok(())
        }
    }

    #[test]
    fn preamble_selects_line() {
        let top = encode_packet("hi", Line::Top);
        let bottom = encode_packet("hi", Line::Bottom);
        assert_eq!(&top[..8], &[0x02, 0x00, 0x00, 0x00, 0x28, 0x00, 0x00, 0x00]);
        assert_eq!(&bottom[..8], &[0x02, 0x00, 0x00, 0x01, 0x28, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn short_text_is_space_padded_to_forty() {
        let packet = encode_packet("eth0", Line::Top);
        let body = &packet[PREAMBLE_LEN..];
        assert_eq!(body.len(), LINE_WIDTH);
        assert_eq!(&body[..4], b"eth0");
        assert!(body[4..].iter().all(|b| *b == b' '));
    }

    #[test]
    fn long_text_is_truncated() {
        let text = "x".repeat(55);
        let packet = encode_packet(&text, Line::Bottom);
        assert_eq!(packet.len(), PACKET_LEN);
        assert!(packet[PREAMBLE_LEN..].iter().all(|b| *b == b'x'));
    }

    #[test]
    fn marker_passes_through_and_unicode_is_replaced() {
        let packet = encode_packet("\x0B 45°c", Line::Bottom);
        assert_eq!(packet[PREAMBLE_LEN], 0x0B);
        assert_eq!(&packet[PREAMBLE_LEN + 1..PREAMBLE_LEN + 6], b" 45?c");
    }

    #[test]
    fn clear_blanks_both_lines() {
        let recorder = Recorder::default();
        let mut display = Display::new(Box::new(recorder.clone()));
        display.clear().unwrap();

        let packets = recorder.0.lock().unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0][3], 0x00);
        assert_eq!(packets[1][3], 0x01);
        assert!(packets
            .iter()
            .all(|p| p[PREAMBLE_LEN..].iter().all(|b| *b == b' ')));
    }

    #[test]
    fn center_matches_banner_layout() {
        assert_eq!(center(" REBOOTING ", 21, '-'), "----- REBOOTING -----");
        assert_eq!(center("ab", 5, '*'), "*ab**");
        assert_eq!(center("toolong", 3, '-'), "toolong");
        assert_eq!(center("[No]  Yes ", LINE_WIDTH, ' ').len(), LINE_WIDTH);
    }

    #[test]
    fn missing_device_is_a_device_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = Display::open(&dir.path().join("hidraw9"));
        let err = display.write_line("x", Line::Top).unwrap_err();
        assert!(matches!(err, PanelError::Device { .. }));
    }
}
