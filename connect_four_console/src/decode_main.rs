use std::io::{self, BufRead, Write};

use connect_four_client::event::ServerEvent;


// Same decoding as the client, minus the UI: handy for checking what a server actually sends.
pub fn run() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut num_errors = 0;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match ServerEvent::from_json(line) {
            Ok(event) => writeln!(stdout, "{:?}", event)?,
            Err(err) => {
                num_errors += 1;
                writeln!(stdout, "ERROR: {}", err)?;
            }
        }
    }
    if num_errors > 0 {
        log::warn!("{num_errors} message(s) failed to decode");
    }
    Ok(())
}
