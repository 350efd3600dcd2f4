use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::cmp;
use std::io;
use std::time::Duration;

use crate::buffer::Buffer;
use crate::config::Config;
use crate::highlight::Highlighter;

/// How the modal editing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Save,
    Cancel,
}

/// Run the full-screen editor over `initial`.
///
/// Returns the saved contents, or `None` when the session was cancelled.
/// The terminal is restored on every exit path.
pub fn edit_rich(initial: &str, config: &Config) -> Result<Option<String>> {
    let mut buffer = Buffer::from_text(initial);
    buffer.set_tab_config(config.editor.tab_size, config.editor.use_spaces);
    let highlighter = Highlighter::new(&config.theme.syntax_theme, &config.editor.language);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut buffer, &highlighter, config);

    if let Err(e) = restore_terminal() {
        log::warn!("Failed to restore terminal: {}", e);
    }

    Ok(match res? {
        Exit::Save => {
            log::info!("Editor session saved ({} lines)", buffer.line_count());
            Some(buffer.content())
        }
        Exit::Cancel => {
            log::info!("Editor session cancelled");
            None
        }
    })
}

/// Restore terminal to normal state. Also called from the binary's panic hook.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    // Attempt to show cursor, but don't fail if it errors
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    buffer: &mut Buffer,
    highlighter: &Highlighter,
    config: &Config,
) -> Result<Exit> {
    loop {
        terminal.draw(|f| draw(f, buffer, highlighter, config))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(exit) = handle_key(buffer, key) {
                        return Ok(exit);
                    }
                }
                Event::Resize(_, _) => {
                    // Redrawn with the new size on the next iteration.
                }
                _ => {}
            }
        }
    }
}

/// Translate a key event into buffer edits. Returns how the session should
/// end when the key is one of the exit bindings.
pub fn handle_key(buffer: &mut Buffer, key: KeyEvent) -> Option<Exit> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => return Some(Exit::Save),
            KeyCode::Char('c') => return Some(Exit::Cancel),
            KeyCode::Char('a') => buffer.move_to_line_start(),
            KeyCode::Char('e') => buffer.move_to_line_end(),
            KeyCode::Char('b') => buffer.move_word_backward(),
            KeyCode::Char('f') => buffer.move_word_forward(),
            KeyCode::Char('k') => buffer.kill_to_line_end(),
            KeyCode::Char('u') => buffer.kill_to_line_start(),
            KeyCode::Char('w') => buffer.kill_word_backward(),
            KeyCode::Char('y') => buffer.yank(),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char(c) => buffer.insert_char(c),
        KeyCode::Enter => buffer.insert_newline(),
        KeyCode::Tab => buffer.insert_tab(),
        KeyCode::Backspace => buffer.delete_backward(),
        KeyCode::Delete => buffer.delete_forward(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Up => buffer.move_up(),
        KeyCode::Down => buffer.move_down(),
        KeyCode::Home => buffer.move_to_line_start(),
        KeyCode::End => buffer.move_to_line_end(),
        KeyCode::PageUp => buffer.page_up(),
        KeyCode::PageDown => buffer.page_down(),
        _ => {}
    }
    None
}

fn draw(f: &mut Frame, buffer: &mut Buffer, highlighter: &Highlighter, config: &Config) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Hint bar
            Constraint::Min(0),    // Editor area
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    draw_hint_bar(f, chunks[0]);
    draw_editor(f, buffer, highlighter, config, chunks[1]);
    draw_status_bar(f, buffer, chunks[2]);
}

fn draw_hint_bar(f: &mut Frame, area: Rect) {
    let hint = Paragraph::new("Press Ctrl+S to save, Ctrl+C to cancel").style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(hint, area);
}

fn draw_editor(
    f: &mut Frame,
    buffer: &mut Buffer,
    highlighter: &Highlighter,
    config: &Config,
    area: Rect,
) {
    buffer.set_viewport_height(area.height as usize);

    let content_area = if config.editor.line_numbers {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(5), // Line numbers
                Constraint::Min(0),    // Content
            ])
            .split(area);
        draw_line_numbers(f, buffer, chunks[0]);
        chunks[1]
    } else {
        area
    };

    let lines = buffer.viewport_lines();
    let highlighted = highlighter.highlight_lines(&lines);
    f.render_widget(Paragraph::new(highlighted), content_area);

    // Place the terminal cursor on the buffer cursor.
    let (line, _) = buffer.cursor();
    let row = line.saturating_sub(buffer.viewport_offset());
    let col = cmp::min(
        buffer.cursor_display_col(),
        content_area.width.saturating_sub(1) as usize,
    );
    f.set_cursor(content_area.x + col as u16, content_area.y + row as u16);
}

fn draw_line_numbers(f: &mut Frame, buffer: &Buffer, area: Rect) {
    let start = buffer.viewport_offset();
    let visible = cmp::min(
        area.height as usize,
        buffer.line_count().saturating_sub(start),
    );
    let numbers: Vec<Line> = (0..visible)
        .map(|i| Line::from(format!("{:4} ", start + i + 1)))
        .collect();
    let widget = Paragraph::new(numbers).style(Style::default().fg(Color::DarkGray));
    f.render_widget(widget, area);
}

fn draw_status_bar(f: &mut Frame, buffer: &Buffer, area: Rect) {
    let (line, col) = buffer.cursor();
    let modified = if buffer.is_modified() {
        " [Modified]"
    } else {
        ""
    };
    let status = format!(
        "Ln {}, Col {}  {} lines{}",
        line + 1,
        col + 1,
        buffer.line_count(),
        modified
    );
    let widget = Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));
    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_save_binding() {
        let mut buffer = Buffer::from_text("text");
        assert_eq!(handle_key(&mut buffer, ctrl('s')), Some(Exit::Save));
    }

    #[test]
    fn test_cancel_binding() {
        let mut buffer = Buffer::from_text("text");
        assert_eq!(handle_key(&mut buffer, ctrl('c')), Some(Exit::Cancel));
    }

    #[test]
    fn test_save_with_unchanged_buffer_keeps_content() {
        let mut buffer = Buffer::from_text("def main():\n    pass\n");
        let exit = handle_key(&mut buffer, ctrl('s'));
        assert_eq!(exit, Some(Exit::Save));
        assert_eq!(buffer.content(), "def main():\n    pass\n");
    }

    #[test]
    fn test_typing_inserts_text() {
        let mut buffer = Buffer::from_text("");
        assert_eq!(handle_key(&mut buffer, plain(KeyCode::Char('h'))), None);
        assert_eq!(handle_key(&mut buffer, plain(KeyCode::Char('i'))), None);
        assert_eq!(handle_key(&mut buffer, plain(KeyCode::Enter)), None);
        assert_eq!(buffer.content(), "hi\n");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut buffer = Buffer::from_text("abc");
        handle_key(&mut buffer, plain(KeyCode::Right));
        handle_key(&mut buffer, plain(KeyCode::Backspace));
        assert_eq!(buffer.content(), "bc");
        handle_key(&mut buffer, plain(KeyCode::Delete));
        assert_eq!(buffer.content(), "c");
    }

    #[test]
    fn test_kill_and_yank_sequence() {
        let mut buffer = Buffer::from_text("hello world");
        handle_key(&mut buffer, ctrl('e'));
        handle_key(&mut buffer, ctrl('w')); // cut "world"
        assert_eq!(buffer.content(), "hello ");
        handle_key(&mut buffer, ctrl('y')); // paste it back
        assert_eq!(buffer.content(), "hello world");
    }

    #[test]
    fn test_line_start_end_bindings() {
        let mut buffer = Buffer::from_text("hello");
        handle_key(&mut buffer, ctrl('e'));
        assert_eq!(buffer.cursor(), (0, 5));
        handle_key(&mut buffer, ctrl('a'));
        assert_eq!(buffer.cursor(), (0, 0));
    }

    #[test]
    fn test_word_motion_bindings() {
        let mut buffer = Buffer::from_text("foo bar");
        handle_key(&mut buffer, ctrl('f'));
        assert_eq!(buffer.cursor(), (0, 3));
        handle_key(&mut buffer, ctrl('b'));
        assert_eq!(buffer.cursor(), (0, 0));
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut buffer = Buffer::from_text("abc");
        assert_eq!(handle_key(&mut buffer, ctrl('q')), None);
        assert_eq!(handle_key(&mut buffer, plain(KeyCode::Esc)), None);
        assert_eq!(buffer.content(), "abc");
        assert!(!buffer.is_modified());
    }
}
