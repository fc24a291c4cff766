/// Controls how JSON Schema documents are loaded and compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaConfig {
    /// When true, object schemas reject additional properties unless they
    /// declare `additionalProperties` themselves.
    pub strict_mode: bool,
    /// Maximum bytes allowed per schema file.
    pub max_schema_file_size: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            max_schema_file_size: 256 * 1024,
        }
    }
}
