use std::path::{self, Path};

/// Renders a path for messages, resolving it as far as the filesystem allows.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        self.canonicalize()
            .or_else(|_| path::absolute(self))
            .map_or_else(
                |_| self.display().to_string(),
                |resolved| resolved.display().to_string(),
            )
    }
}
