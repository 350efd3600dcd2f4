use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Syntax highlighter resolved once per editing session: the theme and the
/// language are fixed at construction.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    syntax_name: String,
}

impl Highlighter {
    pub fn new(theme_name: &str, language: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();

        let theme = theme_set
            .themes
            .get(theme_name)
            .cloned()
            .or_else(|| theme_set.themes.get(FALLBACK_THEME).cloned())
            .unwrap_or_else(|| theme_set.themes.values().next().cloned().unwrap());

        // Accept a full name ("Python"), a short token ("py"), or an
        // extension; anything unknown highlights as plain text.
        let syntax_name = syntax_set
            .find_syntax_by_name(language)
            .or_else(|| syntax_set.find_syntax_by_token(language))
            .or_else(|| syntax_set.find_syntax_by_extension(language))
            .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
            .name
            .clone();

        Self {
            syntax_set,
            theme,
            syntax_name,
        }
    }

    pub fn syntax_name(&self) -> &str {
        &self.syntax_name
    }

    pub fn highlight_lines(&self, lines: &[String]) -> Vec<Line<'static>> {
        let syntax = self
            .syntax_set
            .find_syntax_by_name(&self.syntax_name)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        lines
            .iter()
            .map(|line| {
                let line_no_nl = line.trim_end_matches('\n');
                let regions = highlighter
                    .highlight_line(line_no_nl, &self.syntax_set)
                    .unwrap_or_else(|_| vec![(SynStyle::default(), line_no_nl)]);

                let spans: Vec<Span> = regions
                    .into_iter()
                    .map(|(style, text)| Span::styled(text.to_string(), to_ratatui_style(style)))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn to_ratatui_style(style: SynStyle) -> Style {
    let fg = style.foreground;
    let bg = style.background;
    let mut s = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if !(bg.r == 0 && bg.g == 0 && bg.b == 0) {
        s = s.bg(Color::Rgb(bg.r, bg.g, bg.b));
    }
    s
}
