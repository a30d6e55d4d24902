pub const TYPO_DISPLAY_VERSION: &str = env!("TYPO_DISPLAY_VERSION");
pub const TYPO_BUILD_N: &str = env!("TYPO_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "Typogenetics {}\nBuild {}\nEnzymes, strands and self-replication",
        TYPO_DISPLAY_VERSION, TYPO_BUILD_N
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_text_names_build() {
        let text = version_cli_text();
        assert!(text.starts_with("Typogenetics "));
        assert!(text.contains(TYPO_BUILD_N));
    }
}
