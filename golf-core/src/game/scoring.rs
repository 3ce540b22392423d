//! Golf names for a hole result.

use std::fmt;

/// Result of a hole relative to par.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTerm {
    HoleInOne,
    Albatross,
    Eagle,
    Birdie,
    Par,
    Bogey,
    DoubleBogey,
    TripleBogey,
    /// Anything worse than a triple bogey, named by its stroke count
    Strokes(u32),
}

/// Name the result of holing out in `strokes` on a hole with `par`.
pub fn score_term(strokes: u32, par: u32) -> ScoreTerm {
    if strokes == 1 {
        return ScoreTerm::HoleInOne;
    }
    match i64::from(strokes) - i64::from(par) {
        d if d <= -3 => ScoreTerm::Albatross,
        -2 => ScoreTerm::Eagle,
        -1 => ScoreTerm::Birdie,
        0 => ScoreTerm::Par,
        1 => ScoreTerm::Bogey,
        2 => ScoreTerm::DoubleBogey,
        3 => ScoreTerm::TripleBogey,
        _ => ScoreTerm::Strokes(strokes),
    }
}

impl fmt::Display for ScoreTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTerm::HoleInOne => write!(f, "hole in one"),
            ScoreTerm::Albatross => write!(f, "albatross"),
            ScoreTerm::Eagle => write!(f, "eagle"),
            ScoreTerm::Birdie => write!(f, "birdie"),
            ScoreTerm::Par => write!(f, "par"),
            ScoreTerm::Bogey => write!(f, "bogey"),
            ScoreTerm::DoubleBogey => write!(f, "double bogey"),
            ScoreTerm::TripleBogey => write!(f, "triple bogey"),
            ScoreTerm::Strokes(n) => write!(f, "{} strokes", n),
        }
    }
}
