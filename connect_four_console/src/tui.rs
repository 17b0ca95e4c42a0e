use console::Style;
use itertools::Itertools;


pub const NUM_COLUMNS: u32 = 7;
pub const NUM_ROWS: u32 = 6;

// Local picture of the board. Purely a rendering cache: whatever the server says was placed is
// drawn, no rules are checked.
pub struct BoardView {
    // Indexed by [column][row], row 0 being the bottom.
    cells: Vec<Vec<Option<usize>>>,
    // Player IDs in order of first appearance. Position defines the color.
    players: Vec<String>,
}

impl BoardView {
    pub fn new() -> Self {
        BoardView {
            cells: vec![vec![None; NUM_ROWS as usize]; NUM_COLUMNS as usize],
            players: Vec::new(),
        }
    }

    pub fn place(&mut self, player: &str, column: u32, row: u32) -> Result<(), String> {
        if column >= NUM_COLUMNS || row >= NUM_ROWS {
            return Err(format!("Placement ({column}, {row}) is outside of the board"));
        }
        let player_idx = match self.players.iter().position(|p| p == player) {
            Some(idx) => idx,
            None => {
                self.players.push(player.to_owned());
                self.players.len() - 1
            }
        };
        self.cells[column as usize][row as usize] = Some(player_idx);
        Ok(())
    }

    pub fn player_at(&self, column: u32, row: u32) -> Option<&str> {
        let idx = (*self.cells.get(column as usize)?.get(row as usize)?)?;
        Some(self.players[idx].as_str())
    }
}

fn player_style(player_idx: usize) -> Style {
    match player_idx {
        0 => Style::new().red().bold(),
        1 => Style::new().yellow().bold(),
        _ => Style::new().white().bold(),
    }
}

fn render_cell(cell: Option<usize>) -> String {
    match cell {
        Some(idx) => format!(" {} ", player_style(idx).apply_to('●')),
        None => format!(" {} ", Style::new().dim().apply_to('·')),
    }
}

pub fn render_board(board: &BoardView) -> String {
    let header = (1..=NUM_COLUMNS).map(|col| format!(" {col} ")).join("");
    let rows = (0..NUM_ROWS)
        .rev()
        .map(|row| {
            (0..NUM_COLUMNS)
                .map(|col| render_cell(board.cells[col as usize][row as usize]))
                .join("")
        })
        .join("\n");
    let legend = board
        .players
        .iter()
        .enumerate()
        .map(|(idx, player)| format!("{} player {}", player_style(idx).apply_to('●'), player))
        .join("   ");
    format!("{header}\n{rows}\n{legend}")
}

// Everything the terminal shows besides the board.
pub struct ConsoleView {
    pub board: BoardView,
    pub join_link: Option<String>,
    pub notice: Option<String>,
    pub status: String,
}

impl ConsoleView {
    pub fn new() -> Self {
        ConsoleView {
            board: BoardView::new(),
            join_link: None,
            notice: None,
            status: "Connecting...".to_owned(),
        }
    }
}

pub fn render_view(view: &ConsoleView) -> String {
    let mut lines = vec![render_board(&view.board), String::new()];
    if let Some(link) = &view.join_link {
        lines.push(format!("Join link: {}", Style::new().underlined().apply_to(link)));
    }
    if let Some(notice) = &view.notice {
        lines.push(Style::new().magenta().apply_to(notice).to_string());
    }
    lines.push(Style::new().dim().apply_to(&view.status).to_string());
    lines.push(format!("Press 1-{NUM_COLUMNS} to drop a piece, q to quit."));
    lines.join("\n")
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plain(s: String) -> String { console::strip_ansi_codes(&s).into_owned() }

    #[test]
    fn empty_board() {
        assert_eq!(
            plain(render_board(&BoardView::new())),
            [
                " 1  2  3  4  5  6  7 ",
                " ·  ·  ·  ·  ·  ·  · ",
                " ·  ·  ·  ·  ·  ·  · ",
                " ·  ·  ·  ·  ·  ·  · ",
                " ·  ·  ·  ·  ·  ·  · ",
                " ·  ·  ·  ·  ·  ·  · ",
                " ·  ·  ·  ·  ·  ·  · ",
                "",
            ]
            .join("\n")
        );
    }

    #[test]
    fn pieces_stack_from_the_bottom() {
        let mut board = BoardView::new();
        board.place("red", 0, 0).unwrap();
        board.place("yellow", 0, 1).unwrap();
        board.place("red", 6, 0).unwrap();
        let rendered = plain(render_board(&board));
        let lines = rendered.lines().collect_vec();
        assert_eq!(lines[5], " ●  ·  ·  ·  ·  ·  · ");
        assert_eq!(lines[6], " ●  ·  ·  ·  ·  ·  ● ");
        assert_eq!(lines[7], "● player red   ● player yellow");
        assert_eq!(board.player_at(0, 1), Some("yellow"));
        assert_eq!(board.player_at(6, 0), Some("red"));
        assert_eq!(board.player_at(6, 1), None);
    }

    #[test]
    fn placement_outside_is_rejected() {
        let mut board = BoardView::new();
        assert!(board.place("1", NUM_COLUMNS, 0).is_err());
        assert!(board.place("1", 0, NUM_ROWS).is_err());
        assert_eq!(board.player_at(NUM_COLUMNS, 0), None);
    }

    #[test]
    fn view_shows_link_and_notice() {
        let mut view = ConsoleView::new();
        view.join_link = Some("197.163.56.124:8000/?join=abc123".to_owned());
        view.notice = Some("Player 2 wins!".to_owned());
        let rendered = plain(render_view(&view));
        assert!(rendered.contains("Join link: 197.163.56.124:8000/?join=abc123"));
        assert!(rendered.contains("Player 2 wins!"));
        assert!(rendered.ends_with("Press 1-7 to drop a piece, q to quit."));
    }
}
