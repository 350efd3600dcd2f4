use crate::capability::{self, Capability};
use crate::config::Config;
use crate::fallback;
use crate::instructions;
use crate::screen;

/// Edit `initial` interactively, preferring the full-screen editor and
/// falling back to the external editor when the terminal cannot host it.
///
/// Always returns some text: the edited contents, or `initial` unchanged on
/// cancellation, interruption, or error.
pub fn edit_code(initial: &str, config: &Config) -> String {
    dispatch(initial, capability::detect(), config)
}

fn dispatch(initial: &str, cap: Capability, config: &Config) -> String {
    if !cap.supported {
        let reason = cap
            .reason
            .unwrap_or_else(|| "Unsupported terminal".to_string());
        eprintln!("Warning: {}", reason);
        eprintln!("Falling back to basic text editor...");
        log::warn!("Full-screen editor unavailable: {}", reason);

        return match fallback::edit_basic(initial, config) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Warning: basic editor failed: {:#}", e);
                log::error!("Basic editor failed: {:#}", e);
                initial.to_string()
            }
        };
    }

    if config.editor.show_instructions {
        if let Err(e) = instructions::show() {
            log::warn!("Failed to show instructions: {}", e);
        }
    }
    println!("\nStarting code editor...");

    match screen::edit_rich(initial, config) {
        Ok(Some(text)) => text,
        Ok(None) => {
            log::info!("Edit cancelled, keeping original text");
            initial.to_string()
        }
        Err(e) => {
            eprintln!("Warning: editor failed: {:#}", e);
            log::error!("Full-screen editor failed: {:#}", e);
            initial.to_string()
        }
    }
}
