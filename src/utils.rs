// src/utils.rs

/// Trim a free-text parameter; blank input means "not set".
pub fn normalize_search(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Append `skill` unless it is blank or already present (case-insensitive).
/// Insertion order is preserved.
pub fn add_skill(skills: &mut Vec<String>, skill: &str) -> bool {
    let skill = skill.trim();
    if skill.is_empty() || skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
        return false;
    }
    skills.push(skill.to_string());
    true
}

pub fn remove_skill(skills: &mut Vec<String>, skill: &str) -> bool {
    let before = skills.len();
    skills.retain(|s| !s.eq_ignore_ascii_case(skill.trim()));
    skills.len() != before
}

/// Mask everything but the first and last characters of a token for logs.
pub fn redact_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
