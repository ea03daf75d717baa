pub const FIELD_PATH_DELIMITER: &str = ".";
pub const ROOT_PATH: &str = "";

pub fn format_object_path(parent: &str, name: &str) -> String {
    format!("{parent}{FIELD_PATH_DELIMITER}{name}")
}

pub fn format_index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Caller-declared paths may omit the leading delimiter (`name.city`).
pub fn normalize_path(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with(FIELD_PATH_DELIMITER) || raw.starts_with('[') {
        raw.to_string()
    } else {
        format!("{FIELD_PATH_DELIMITER}{raw}")
    }
}
