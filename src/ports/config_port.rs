//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    /// Comma-separated values with surrounding whitespace and empty entries
    /// removed. `None` when the key is absent.
    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        self.get_string(section, key).map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }
}
