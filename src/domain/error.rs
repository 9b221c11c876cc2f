use thiserror::Error;

/// Placement rejected because the target cell lies outside the grid.
///
/// This is the only fallible operation in the core: a step never fails, and
/// boundary neighbors inside a step are clamped rather than reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
pub struct OutOfBounds {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_cell() {
        let err = OutOfBounds { x: 9, y: 3, width: 5, height: 5 };
        let msg = format!("{err}");
        assert!(msg.contains("(9, 3)"));
        assert!(msg.contains("5x5"));
    }
}
