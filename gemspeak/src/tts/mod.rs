pub mod api;
pub mod gemini;
pub mod synth;

/// The text sent to the model: the speaking style, then the script.
pub fn compose_prompt(style: &str, script: &str) -> String {
    format!("{}: {}", style, script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_then_script() {
        assert_eq!(
            compose_prompt("Calm and friendly tone", "Hello there."),
            "Calm and friendly tone: Hello there."
        );
    }
}
