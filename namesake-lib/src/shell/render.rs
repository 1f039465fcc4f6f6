use std::io::{self, Write};

use crate::search::QueryResponse;

const WIDTH: usize = 50;
const TABLE_WIDTH: usize = 35;

/// Write a query response as a report block.
///
/// ```text
/// ==================================================
/// Input Name: Alise
/// ==================================================
///
/// BEST MATCH:
///    Name: Alice
///    Similarity Score: 50.0%
///
/// ALL MATCHES:
/// Rank   Name            Score
/// -----------------------------------
/// 1      Alice           50.0%
/// 2      Alicia          44.72%
///
/// ==================================================
/// ```
pub fn render_response<W: Write>(out: &mut W, response: &QueryResponse) -> io::Result<()> {
    let rule = "=".repeat(WIDTH);

    writeln!(out, "\n{rule}")?;
    writeln!(out, "Input Name: {}", response.input_name)?;
    writeln!(out, "{rule}\n")?;

    match &response.best_match {
        Some(best) => {
            writeln!(out, "BEST MATCH:")?;
            writeln!(out, "   Name: {}", best.name)?;
            writeln!(out, "   Similarity Score: {}%\n", format_score(best.score))?;

            writeln!(out, "ALL MATCHES:")?;
            writeln!(out, "{:<6} {:<15} {}", "Rank", "Name", "Score")?;
            writeln!(out, "{}", "-".repeat(TABLE_WIDTH))?;
            for (rank, m) in response.all_matches.iter().enumerate() {
                writeln!(out, "{:<6} {:<15} {}%", rank + 1, m.name, format_score(m.score))?;
            }
        }
        None => writeln!(out, "No matches found.")?,
    }

    writeln!(out, "\n{rule}\n")
}

/// Whole percentages keep one decimal (`50.0`), others print as stored.
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}
