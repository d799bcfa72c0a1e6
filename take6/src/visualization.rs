use crate::{Board, MAX_ROW_LEN};

/// Draws the rows as a box, with the bull heads of each row on the right.
///
/// ```text
///   ╭──────────────────────╮
/// 1 │  12  17   ·   ·   ·  │  2 🐮
/// ```
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = 4 * MAX_ROW_LEN + 2;
        writeln!(f, "  ╭{}╮", "─".repeat(width))?;
        for (row_idx, row) in self.rows().iter().enumerate() {
            write!(f, "{} │", row_idx + 1)?;
            for slot in 0..MAX_ROW_LEN {
                match row.get(slot) {
                    Some(card) => write!(f, " {:>3}", card.number())?,
                    None => write!(f, "   ·")?,
                }
            }
            writeln!(f, "  │ {:>2} 🐮", row.penalty())?;
        }
        write!(f, "  ╰{}╯", "─".repeat(width))
    }
}
