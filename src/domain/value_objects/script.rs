//! Remote script template run after a successful SCP upload.

/// Placeholder replaced by the absolute remote path of the uploaded file
pub const DESTINATION_PLACEHOLDER: &str = "{destination}";

/// Command template such as `gzip {destination}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate(String);

impl ScriptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Substitute every placeholder with `remote_file`, verbatim.
    pub fn render(&self, remote_file: &str) -> String {
        self.0.replace(DESTINATION_PLACEHOLDER, remote_file)
    }
}

/// Join a remote directory and a file name with POSIX separators.
///
/// An empty directory means the remote login directory, so the bare name is
/// returned.
pub fn remote_join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return name.to_string();
    }
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
