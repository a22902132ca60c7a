#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    InterfaceStatistics,
    SystemHealth,
    RebootSystem,
    ShutdownSystem,
}

impl MenuItem {
    pub const ALL: [Self; 4] = [
        Self::InterfaceStatistics,
        Self::SystemHealth,
        Self::RebootSystem,
        Self::ShutdownSystem,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::InterfaceStatistics => "Interface Statistics",
            Self::SystemHealth => "System Health",
            Self::RebootSystem => "Reboot System",
            Self::ShutdownSystem => "Shut down System",
        }
    }
}

/// Cursor over a fixed list; both directions wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub selection: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Self { selection: 0, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn move_left(&mut self) {
        if self.len == 0 {
            self.selection = 0;
            return;
        }
        if self.selection == 0 {
            self.selection = self.len - 1;
        } else {
            self.selection -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.len == 0 {
            self.selection = 0;
            return;
        }
        self.selection = (self.selection + 1) % self.len;
    }
}

pub struct MenuState {
    cursor: Cursor,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            cursor: Cursor::new(MenuItem::ALL.len()),
        }
    }

    pub fn current(&self) -> MenuItem {
        MenuItem::ALL[self.cursor.selection]
    }

    pub fn selection(&self) -> usize {
        self.cursor.selection
    }

    pub fn move_left(&mut self) {
        self.cursor.move_left();
    }

    pub fn move_right(&mut self) {
        self.cursor.move_right();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_interface_statistics() {
        let menu = MenuState::new();
        assert_eq!(menu.selection(), 0);
        assert_eq!(menu.current(), MenuItem::InterfaceStatistics);
    }

    #[test]
    fn left_from_first_wraps_to_last() {
        let mut menu = MenuState::new();
        menu.move_left();
        assert_eq!(menu.selection(), 3);
        assert_eq!(menu.current(), MenuItem::ShutdownSystem);
    }

    #[test]
    fn right_from_last_wraps_to_first() {
        let mut menu = MenuState::new();
        for _ in 0..3 {
            menu.move_right();
        }
        assert_eq!(menu.current(), MenuItem::ShutdownSystem);
        menu.move_right();
        assert_eq!(menu.current(), MenuItem::InterfaceStatistics);
    }

    #[test]
    fn full_turn_returns_home() {
        let mut cursor = Cursor::new(7);
        for _ in 0..7 {
            cursor.move_right();
        }
        assert_eq!(cursor.selection, 0);
        for _ in 0..14 {
            cursor.move_left();
        }
        assert_eq!(cursor.selection, 0);
    }

    #[test]
    fn empty_cursor_stays_put() {
        let mut cursor = Cursor::new(0);
        cursor.move_left();
        cursor.move_right();
        assert_eq!(cursor.selection, 0);
        assert!(cursor.is_empty());
    }

    #[test]
    fn labels() {
        let labels: Vec<_> = MenuItem::ALL.iter().map(|item| item.label()).collect();
        assert_eq!(
            labels,
            [
                "Interface Statistics",
                "System Health",
                "Reboot System",
                "Shut down System"
            ]
        );
    }
}
