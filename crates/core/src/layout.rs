//! Named board layouts: a start position plus the rules for winning on it.

use once_cell::sync::Lazy;

use crate::{board::Board, error::LayoutError};

/// Name of the layout played when nothing else is configured.
pub const DEFAULT_LAYOUT: &str = "english";

const ENGLISH_START: &str = "
  ***
  ***
*******
***o***
*******
  ***
  ***
";

const ENGLISH_TARGET: &str = "
  ooo
  ooo
ooooooo
ooo*ooo
ooooooo
  ooo
  ooo
";

const EUROPEAN_START: &str = "
  ***
 *****
***o***
*******
*******
 *****
  ***
";

static BUILTIN_LAYOUTS: Lazy<Vec<Layout>> = Lazy::new(|| {
    vec![
        Layout::parse("english", ENGLISH_START, Some(ENGLISH_TARGET), Some(18))
            .expect("invalid english layout"),
        Layout::parse("european", EUROPEAN_START, None, None).expect("invalid european layout"),
    ]
});

/// A playable board together with its win condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    name: String,
    start: Board,
    target: Option<Board>,
    minimum_moves: Option<u32>,
}

impl Layout {
    /// Assemble a layout, checking that the target shares the start board's shape.
    pub fn new(
        name: impl Into<String>,
        start: Board,
        target: Option<Board>,
        minimum_moves: Option<u32>,
    ) -> Result<Self, LayoutError> {
        let name = name.into();
        if let Some(target) = &target {
            if !target.same_shape(&start) {
                return Err(LayoutError::TargetShapeMismatch(name));
            }
        }
        Ok(Self {
            name,
            start,
            target,
            minimum_moves,
        })
    }

    /// Build a layout from start and optional target text.
    pub fn parse(
        name: impl Into<String>,
        start: &str,
        target: Option<&str>,
        minimum_moves: Option<u32>,
    ) -> Result<Self, LayoutError> {
        let name = name.into();
        let start = Board::from_layout(start).map_err(|source| LayoutError::InvalidStart {
            name: name.clone(),
            source,
        })?;
        let target = target
            .map(Board::from_layout)
            .transpose()
            .map_err(|source| LayoutError::InvalidTarget {
                name: name.clone(),
                source,
            })?;
        Self::new(name, start, target, minimum_moves)
    }

    /// Look up one of the bundled layouts by name (case-insensitive).
    pub fn builtin(name: &str) -> Result<Self, LayoutError> {
        BUILTIN_LAYOUTS
            .iter()
            .find(|layout| layout.name.eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| LayoutError::Unknown(name.to_string()))
    }

    /// Names of the bundled layouts.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_LAYOUTS.iter().map(|layout| layout.name.as_str())
    }

    /// Identifier used in configuration and save files.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starting position; games begin from a copy of it.
    pub fn start(&self) -> &Board {
        &self.start
    }

    /// Winning position, when the layout defines one.
    pub fn target(&self) -> Option<&Board> {
        self.target.as_ref()
    }

    /// Fewest jumps a genuine solution can take, when known.
    pub fn minimum_moves(&self) -> Option<u32> {
        self.minimum_moves
    }

    /// Whether `board` satisfies this layout's win condition.
    ///
    /// Layouts with a target pattern win on an exact match; the others win when a
    /// single peg remains anywhere.
    pub fn is_won(&self, board: &Board) -> bool {
        match &self.target {
            Some(target) => target == board,
            None => board.peg_count() == 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Coord};

    #[test]
    fn english_board_matches_standard_cross() {
        let layout = Layout::builtin("English").expect("built-in");
        assert_eq!(layout.name(), "english");
        assert_eq!(layout.start().peg_count(), 32);
        assert_eq!(layout.start().get(Coord::new(3, 3)), Some(Cell::Hole));
        assert_eq!(layout.minimum_moves(), Some(18));
        let target = layout.target().expect("english has a target");
        assert_eq!(target.peg_count(), 1);
        assert_eq!(target.get(Coord::new(3, 3)), Some(Cell::Peg));
    }

    #[test]
    fn european_board_uses_last_peg_rule() {
        let layout = Layout::builtin("european").expect("built-in");
        assert_eq!(layout.start().playable_count(), 37);
        assert_eq!(layout.start().peg_count(), 36);
        assert!(layout.target().is_none());

        let lone = Board::from_layout("oo*\nooo").expect("layout parses");
        let bare = Layout::new("bare", lone.clone(), None, None).expect("valid");
        assert!(bare.is_won(&lone));
    }

    #[test]
    fn target_must_share_shape() {
        let err = Layout::parse("odd", "***\n***", Some("ooo\n-o*"), None).unwrap_err();
        assert_eq!(err, LayoutError::TargetShapeMismatch("odd".to_string()));
    }

    #[test]
    fn unknown_layout_is_reported() {
        assert_eq!(
            Layout::builtin("triangle").unwrap_err(),
            LayoutError::Unknown("triangle".to_string())
        );
        assert_eq!(
            Layout::builtin_names().collect::<Vec<_>>(),
            vec!["english", "european"]
        );
    }

    #[test]
    fn bad_target_text_names_the_layout() {
        let err = Layout::parse("custom", "***", Some("*#*"), None).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidTarget { name, .. } if name == "custom"));
    }
}
