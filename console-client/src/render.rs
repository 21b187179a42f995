use tictactoe_engine::{GameSnapshot, Mark};

/// Text frame for one snapshot: mode, board, status and scores.
pub fn render(snapshot: &GameSnapshot) -> String {
    let winning_cells: Vec<usize> = snapshot
        .winning_line
        .map(|line| line.cells.to_vec())
        .unwrap_or_default();

    let rows: Vec<String> = snapshot
        .board
        .cells()
        .chunks(3)
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(column, mark)| {
                    let index = row * 3 + column;
                    let symbol = match mark {
                        Mark::Empty => (index + 1).to_string(),
                        mark => mark.to_string(),
                    };
                    if winning_cells.contains(&index) {
                        format!("[{}]", symbol)
                    } else {
                        format!(" {} ", symbol)
                    }
                })
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect();

    format!(
        "\nMode: {}\n{}\n{}\nX: {}  O: {}  Draws: {}",
        snapshot.mode,
        rows.join("\n---+---+---\n"),
        snapshot.status_line(),
        snapshot.scores.x_wins,
        snapshot.scores.o_wins,
        snapshot.scores.draws
    )
}
