pub const SUMMARY_SYSTEM: &str = include_str!("../data/prompts/summary_system.txt");
pub const SUMMARY_USER: &str = include_str!("../data/prompts/summary_user.txt");
pub const BATTLEMAP_IMAGE: &str = include_str!("../data/prompts/battlemap_image.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
