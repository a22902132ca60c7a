use crate::display::{center, LINE_WIDTH};

/// Yes/No toggle shown under a destructive prompt. Starts on `No`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Confirm {
    #[default]
    No,
    Yes,
}

impl Confirm {
    /// The knob only has two positions to choose from, so either direction flips.
    pub fn toggled(self) -> Self {
        match self {
            Confirm::No => Confirm::Yes,
            Confirm::Yes => Confirm::No,
        }
    }

    pub fn row(self) -> String {
        let row = match self {
            Confirm::No => "[No]  Yes ",
            Confirm::Yes => " No  [Yes]",
        };
        center(row, LINE_WIDTH, ' ')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_no_and_alternates() {
        let mut choice = Confirm::default();
        assert_eq!(choice, Confirm::No);
        let mut seen = Vec::new();
        for _ in 0..4 {
            choice = choice.toggled();
            seen.push(choice);
        }
        assert_eq!(
            seen,
            vec![Confirm::Yes, Confirm::No, Confirm::Yes, Confirm::No]
        );
    }

    #[test]
    fn rows_are_centered_and_bracket_the_choice() {
        let no = Confirm::No.row();
        let yes = Confirm::Yes.row();
        assert_eq!(no.len(), LINE_WIDTH);
        assert_eq!(no.trim(), "[No]  Yes");
        assert_eq!(yes.trim(), "No  [Yes]");
        assert_eq!(no.find('['), Some(15));
    }
}
