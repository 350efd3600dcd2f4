#[cfg(test)]
mod unit_tests {
    use super::super::*;

    #[test]
    fn test_heading_is_styled() {
        let out = render::render("# Editor Instructions");
        assert!(out.contains("Editor Instructions"));
        assert!(out.contains("\u{1b}["));
    }

    #[test]
    fn test_bullet_list_markers() {
        let out = render::render("- first\n- second");
        assert!(out.contains("• first"));
        assert!(out.contains("• second"));
    }

    #[test]
    fn test_ordered_list_numbering() {
        let out = render::render("1. one\n2. two\n3. three");
        assert!(out.contains("1. one"));
        assert!(out.contains("2. two"));
        assert!(out.contains("3. three"));
    }

    #[test]
    fn test_inline_code_keeps_literal() {
        let out = render::render("Press `Ctrl+S` to save");
        assert!(out.contains("Ctrl+S"));
        assert!(out.contains("to save"));
    }

    #[test]
    fn test_code_block_is_indented() {
        let out = render::render("```\nlet x = 1;\n```");
        assert!(out.contains("let x = 1;"));
        assert!(out.lines().any(|l| l.starts_with("    ")));
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let out = render::render("first paragraph\n\nsecond paragraph");
        assert!(out.contains("first paragraph\n\nsecond paragraph"));
    }

    #[test]
    fn test_block_quote_prefix() {
        let out = render::render("> quoted text");
        assert!(out.contains("│ quoted text"));
    }

    #[test]
    fn test_ends_with_single_newline() {
        let out = render::render("# Title\n\nbody\n");
        assert!(out.ends_with('\n'));
        assert!(!out.ends_with("\n\n"));
    }
}
