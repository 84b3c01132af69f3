use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a route manifest compile.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A segment contains a character the router reserves for its own syntax.
    #[error("Route segment \"{segment}\" for \"{route_id}\" cannot contain \"{character}\".")]
    ReservedCharacter {
        /// Offending segment (raw form, or semantic form for `/`).
        segment: String,
        /// Route id being tokenized.
        route_id: String,
        /// The reserved character that was found.
        character: char,
    },
    /// A route module resolves to the id reserved for the root route.
    #[error("Route module \"{file}\" resolves to the root route id \"{route_id}\"; rename it so it does not shadow the root route.")]
    RootRouteIdTaken {
        /// Reserved id.
        route_id: String,
        /// Offending module, relative to the app directory.
        file: String,
    },
    /// The app directory has no `root` route module.
    #[error("Could not find a root route module in the app directory: {}", app_directory.display())]
    MissingRootRoute {
        /// App directory that was searched.
        app_directory: PathBuf,
    },
    /// The routes directory does not exist.
    #[error("Could not find the routes directory: {}. Did you forget to create it?", path.display())]
    MissingRoutesDirectory {
        /// Expected routes directory.
        path: PathBuf,
    },
    /// An ignore pattern is not a valid glob.
    #[error("Invalid ignore pattern \"{pattern}\": {source}")]
    InvalidIgnorePattern {
        /// Pattern as supplied by the caller.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },
    /// Directory traversal failed.
    #[error("Failed to read routes directory: {0}")]
    Walk(#[from] walkdir::Error),
    /// IO error while inspecting the app directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RouteError {
    /// Create a reserved character error
    pub fn reserved_character(
        segment: impl Into<String>,
        route_id: impl Into<String>,
        character: char,
    ) -> Self {
        Self::ReservedCharacter {
            segment: segment.into(),
            route_id: route_id.into(),
            character,
        }
    }
}

/// A non-fatal collision found while assembling the manifest.
///
/// The first entry of `files` is the route that was kept; every other
/// entry was excluded from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteConflict {
    /// Several files derive the same route id.
    RouteIdCollision {
        /// Shared route id.
        route_id: String,
        /// App-relative files, winner first.
        files: Vec<String>,
    },
    /// Several routes resolve to the same URL path.
    RoutePathCollision {
        /// Shared absolute path (without leading slash).
        path: String,
        /// App-relative files, winner first.
        files: Vec<String>,
    },
}

impl RouteConflict {
    /// Files involved in the collision, winner first.
    pub fn files(&self) -> &[String] {
        match self {
            RouteConflict::RouteIdCollision { files, .. } => files,
            RouteConflict::RoutePathCollision { files, .. } => files,
        }
    }

    /// The file that was kept in the manifest.
    pub fn winner(&self) -> Option<&str> {
        self.files().first().map(String::as_str)
    }

    /// Files that were dropped from the manifest.
    pub fn losers(&self) -> &[String] {
        self.files().get(1..).unwrap_or_default()
    }

    /// Short machine-readable kind (`route_id` or `route_path`).
    pub fn kind(&self) -> &'static str {
        match self {
            RouteConflict::RouteIdCollision { .. } => "route_id",
            RouteConflict::RoutePathCollision { .. } => "route_path",
        }
    }

    /// Route id or path the files collided on.
    pub fn key(&self) -> &str {
        match self {
            RouteConflict::RouteIdCollision { route_id, .. } => route_id,
            RouteConflict::RoutePathCollision { path, .. } => path,
        }
    }

    pub(crate) fn push_file(&mut self, file: String) {
        match self {
            RouteConflict::RouteIdCollision { files, .. } => files.push(file),
            RouteConflict::RoutePathCollision { files, .. } => files.push(file),
        }
    }
}

impl std::fmt::Display for RouteConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteConflict::RouteIdCollision { route_id, .. } => {
                writeln!(f, "⚠️ Route ID Collision: \"{}\"", route_id)?;
                writeln!(f)?;
                writeln!(
                    f,
                    "The following routes all define the same Route ID, only the first one will be used"
                )?;
            }
            RouteConflict::RoutePathCollision { path, .. } => {
                writeln!(f, "⚠️ Route Path Collision: \"/{}\"", path)?;
                writeln!(f)?;
                writeln!(
                    f,
                    "The following routes all define the same URL, only the first one will be used"
                )?;
            }
        }
        writeln!(f)?;
        if let Some(winner) = self.winner() {
            writeln!(f, "🟢 {}", winner)?;
        }
        for loser in self.losers() {
            writeln!(f, "⭕️ {}", loser)?;
        }
        Ok(())
    }
}

/// Collection of collisions reported by one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileDiagnostics {
    /// Collisions in the order they were reported.
    pub conflicts: Vec<RouteConflict>,
}

impl CompileDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collision to the collection
    pub fn add_conflict(&mut self, conflict: RouteConflict) {
        self.conflicts.push(conflict);
    }

    /// Check if any collision was reported
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Route id collisions only
    pub fn route_id_conflicts(&self) -> impl Iterator<Item = &RouteConflict> {
        self.conflicts
            .iter()
            .filter(|c| matches!(c, RouteConflict::RouteIdCollision { .. }))
    }

    /// Route path collisions only
    pub fn route_path_conflicts(&self) -> impl Iterator<Item = &RouteConflict> {
        self.conflicts
            .iter()
            .filter(|c| matches!(c, RouteConflict::RoutePathCollision { .. }))
    }

    /// Get total count of all collisions
    pub fn count(&self) -> usize {
        self.conflicts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_character_message_names_segment_id_and_char() {
        let err = RouteError::reserved_character("a:b", "posts.a:b", ':');
        insta::assert_snapshot!(err.to_string(), @r#"Route segment "a:b" for "posts.a:b" cannot contain ":"."#);
    }

    #[test]
    fn path_collision_lists_winner_then_losers() {
        let conflict = RouteConflict::RoutePathCollision {
            path: "blog".to_string(),
            files: vec![
                "routes/blog.route.tsx".to_string(),
                "routes/blog/blog.route.tsx".to_string(),
            ],
        };
        assert_eq!(conflict.winner(), Some("routes/blog.route.tsx"));
        assert_eq!(conflict.losers(), ["routes/blog/blog.route.tsx".to_string()]);
        insta::assert_snapshot!(conflict.to_string(), @r#"
        ⚠️ Route Path Collision: "/blog"

        The following routes all define the same URL, only the first one will be used

        🟢 routes/blog.route.tsx
        ⭕️ routes/blog/blog.route.tsx
        "#);
    }

    #[test]
    fn id_collision_message() {
        let conflict = RouteConflict::RouteIdCollision {
            route_id: "about".to_string(),
            files: vec![
                "routes/about.route.tsx".to_string(),
                "routes/legacy/about.route.tsx".to_string(),
                "routes/old/about.route.tsx".to_string(),
            ],
        };
        assert_eq!(conflict.kind(), "route_id");
        assert_eq!(conflict.key(), "about");
        assert_eq!(conflict.losers().len(), 2);
        insta::assert_snapshot!(conflict.to_string(), @r#"
        ⚠️ Route ID Collision: "about"

        The following routes all define the same Route ID, only the first one will be used

        🟢 routes/about.route.tsx
        ⭕️ routes/legacy/about.route.tsx
        ⭕️ routes/old/about.route.tsx
        "#);
    }

    #[test]
    fn diagnostics_split_by_kind() {
        let mut diagnostics = CompileDiagnostics::new();
        assert!(!diagnostics.has_conflicts());
        diagnostics.add_conflict(RouteConflict::RouteIdCollision {
            route_id: "a".into(),
            files: vec!["x".into(), "y".into()],
        });
        diagnostics.add_conflict(RouteConflict::RoutePathCollision {
            path: "a".into(),
            files: vec!["x".into(), "z".into()],
        });
        assert!(diagnostics.has_conflicts());
        assert_eq!(diagnostics.count(), 2);
        assert_eq!(diagnostics.route_id_conflicts().count(), 1);
        assert_eq!(diagnostics.route_path_conflicts().count(), 1);
    }
}
