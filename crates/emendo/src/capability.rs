use crossterm::tty::IsTty;

/// Result of probing whether the environment can host the full-screen editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub supported: bool,
    pub reason: Option<String>,
}

impl Capability {
    fn supported() -> Self {
        Self {
            supported: true,
            reason: None,
        }
    }

    fn unsupported(reason: &str) -> Self {
        Self {
            supported: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Check whether the terminal supports the full-screen editor.
pub fn detect() -> Capability {
    let term = std::env::var("TERM").ok();
    evaluate(std::io::stdout().is_tty(), term.as_deref())
}

pub(crate) fn evaluate(stdout_is_tty: bool, term: Option<&str>) -> Capability {
    if !stdout_is_tty {
        return Capability::unsupported("Not running in a terminal");
    }

    // A dumb terminal cannot handle the escape sequences the editor emits.
    if term == Some("dumb") {
        return Capability::unsupported("Terminal does not support required features");
    }

    Capability::supported()
}
