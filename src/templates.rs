pub const JOKE_PROMPT_MD: &str = include_str!("../prompts/joke_prompt.md");
pub const README_HEADER_MD: &str = include_str!("../templates/readme_header.md");
