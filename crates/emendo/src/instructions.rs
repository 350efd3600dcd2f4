use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Usage instructions shown before the full-screen editor starts.
pub const INSTRUCTIONS: &str = r#"# Editor Instructions

## 1. Viewing/Editing:
- Use arrow keys to move cursor
- Type directly to edit text
- Ctrl+A: Move to start of line
- Ctrl+E: Move to end of line
- Ctrl+K: Cut from cursor to end of line
- Ctrl+Y: Paste previously cut text
- Ctrl+W: Cut word before cursor
- Ctrl+U: Cut from start of line to cursor
- Ctrl+B: Move cursor back one word
- Ctrl+F: Move cursor forward one word

## 2. Saving/Exiting:
- Ctrl+S: Save changes and continue
- Ctrl+C: Cancel and use original code

## 3. Requirements:
- Terminal must support ANSI escape sequences
- Must be running in an interactive terminal
- Not supported in basic terminals or when piped

Press Enter to continue to the editor...
"#;

/// Print the rendered instructions and block until the user presses Enter.
pub fn show() -> Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", mdterm::render(INSTRUCTIONS))?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
