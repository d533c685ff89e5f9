//! Board error types.

/// Error raised by a board operation.
///
/// Rule failures leave the board satisfying all invariants; the
/// second-card variants of `NoCardAtPosition` and `CardControlledByOther`
/// have already released the player's first card as a side effect.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// The targeted cell is empty.
    #[display("no card at {},{}", row, col)]
    NoCardAtPosition {
        /// Row of the targeted cell.
        row: usize,
        /// Column of the targeted cell.
        col: usize,
    },

    /// The second-card target is controlled by another player, or the
    /// second flip targeted the player's own first card.
    #[display("card at {},{} is already controlled", row, col)]
    CardControlledByOther {
        /// Row of the targeted cell.
        row: usize,
        /// Column of the targeted cell.
        col: usize,
    },

    /// Row or column out of range.
    #[display("coordinates {},{} are outside the board", row, col)]
    InvalidCoordinates {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The player ID violates the accepted alphabet.
    #[display("invalid player id {:?}", _0)]
    InvalidPlayerId(String),

    /// A map transform produced an empty or whitespace-containing value.
    #[display("transform produced invalid card value {:?}", _0)]
    InvalidMappedValue(String),
}

impl std::error::Error for BoardError {}

/// Error raised while reading a board file.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ParseError {
    /// The file could not be read.
    #[display("cannot read board file: {}", _0)]
    Read(String),

    /// The first line is not `ROWSxCOLS`.
    #[display("line 1: malformed header {:?}", _0)]
    Header(String),

    /// The header declares a dimension of zero, or one too large to index.
    #[display("line 1: unusable dimensions {}x{}", rows, cols)]
    Dimensions {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
    },

    /// A blank line appeared before the last card.
    #[display("line {}: blank line inside the card list", _0)]
    BlankLine(usize),

    /// A card line is not a single run of non-whitespace characters.
    #[display("line {}: malformed card {:?}", line, found)]
    Card {
        /// 1-based line number.
        line: usize,
        /// Offending line content.
        found: String,
    },

    /// The file holds fewer card lines than the header promises.
    #[display("expected {} cards, found {}", expected, found)]
    CardCount {
        /// `rows * cols` from the header.
        expected: usize,
        /// Card lines actually present.
        found: usize,
    },

    /// Non-blank content after the last card.
    #[display("line {}: unexpected content after the last card", _0)]
    Trailing(usize),
}

impl std::error::Error for ParseError {}
