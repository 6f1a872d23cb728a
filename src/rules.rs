use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::Category;

/// Extension rules, matched against lowercase extensions with the leading dot.
pub const EXTENSION_RULES: &[(&str, Category)] = &[
    (".py", Category::CodeProjects),
    (".java", Category::CodeProjects),
    (".cpp", Category::CodeProjects),
    (".c", Category::CodeProjects),
    (".h", Category::CodeProjects),
    (".hpp", Category::CodeProjects),
    (".js", Category::CodeProjects),
    (".ts", Category::CodeProjects),
    (".ipynb", Category::CodeProjects),
    (".jpg", Category::PhotosImages),
    (".jpeg", Category::PhotosImages),
    (".png", Category::PhotosImages),
    (".heic", Category::PhotosImages),
    (".gif", Category::PhotosImages),
    (".tif", Category::PhotosImages),
    (".tiff", Category::PhotosImages),
    (".mov", Category::VideosMedia),
    (".mp4", Category::VideosMedia),
    (".mkv", Category::VideosMedia),
    (".avi", Category::VideosMedia),
    (".mp3", Category::MusicAudio),
    (".wav", Category::MusicAudio),
    (".flac", Category::MusicAudio),
    (".m4a", Category::MusicAudio),
    (".zip", Category::ArchivesInstallers),
    (".tar", Category::ArchivesInstallers),
    (".tar.gz", Category::ArchivesInstallers),
    (".tgz", Category::ArchivesInstallers),
    (".rar", Category::ArchivesInstallers),
    (".dmg", Category::ArchivesInstallers),
    (".pkg", Category::ArchivesInstallers),
    (".exe", Category::ArchivesInstallers),
    (".pdf", Category::DocumentsMisc),
    (".doc", Category::DocumentsMisc),
    (".docx", Category::DocumentsMisc),
    (".ppt", Category::DocumentsMisc),
    (".pptx", Category::DocumentsMisc),
    (".xls", Category::DocumentsMisc),
    (".xlsx", Category::DocumentsMisc),
    (".txt", Category::DocumentsMisc),
    (".md", Category::DocumentsMisc),
    (".tmp", Category::TrashOrTemp),
    (".log", Category::TrashOrTemp),
    (".ds_store", Category::TrashOrTemp),
];

fn rule_table() -> &'static HashMap<&'static str, Category> {
    static TABLE: OnceLock<HashMap<&'static str, Category>> = OnceLock::new();
    TABLE.get_or_init(|| EXTENSION_RULES.iter().copied().collect())
}

/// Category for a lowercase extension, or `None` when no rule applies.
pub fn match_extension(extension: &str) -> Option<Category> {
    rule_table().get(extension).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(match_extension(".pdf"), Some(Category::DocumentsMisc));
        assert_eq!(match_extension(".jpg"), Some(Category::PhotosImages));
        assert_eq!(match_extension(".tar.gz"), Some(Category::ArchivesInstallers));
        assert_eq!(match_extension(".ds_store"), Some(Category::TrashOrTemp));
        assert_eq!(match_extension(".flac"), Some(Category::MusicAudio));
    }

    #[test]
    fn test_unknown_extensions_are_not_errors() {
        assert_eq!(match_extension(".csv"), None);
        assert_eq!(match_extension(""), None);
        // Lookup is on already-lowercased input.
        assert_eq!(match_extension(".PDF"), None);
    }

    #[test]
    fn test_rules_never_produce_fallback() {
        assert!(EXTENSION_RULES
            .iter()
            .all(|(_, category)| !category.is_fallback()));
    }

    #[test]
    fn test_rule_extensions_are_unique() {
        assert_eq!(rule_table().len(), EXTENSION_RULES.len());
    }
}
