//! Error types for hotspot-uv.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`HotspotError`].
pub type Result<T> = std::result::Result<T, HotspotError>;

/// Errors that can occur while matching and aligning UV islands.
#[derive(Error, Debug)]
pub enum HotspotError {
    /// An operation received zero points or components.
    #[error("no {what} to process")]
    EmptyInput {
        /// What was missing (points, components, faces, ...).
        what: &'static str,
    },

    /// A 4-point island is not an axis-aligned rectangle.
    #[error("{item} is not an axis-aligned rectangle")]
    NotARectangle {
        /// Identifier of the offending face or island.
        item: String,
    },

    /// A bounding box has zero extent where a scale factor is required.
    #[error("{item} has a degenerate span ({width} x {height})")]
    DegenerateSpan {
        /// Identifier of the offending item.
        item: String,
        /// Width of the offending bounding box.
        width: f64,
        /// Height of the offending bounding box.
        height: f64,
    },

    /// No hotspot could be selected for an item.
    #[error("no matching hotspot for {item}")]
    NoMatchFound {
        /// Identifier of the item.
        item: String,
    },

    /// A library entry is missing its UV data or has the wrong shape.
    #[error("malformed library entry '{key}': {reason}")]
    MalformedLibraryEntry {
        /// The entry key in the library file.
        key: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// The hotspot library holds no usable hotspots.
    #[error("hotspot library contains no usable hotspots")]
    NoUsableHotspots,

    /// One or more faces failed validation during capture.
    #[error("{} face(s) failed rectangle validation: {}", faces.len(), faces.join(", "))]
    CaptureFailed {
        /// Labels of every face that failed.
        faces: Vec<String>,
    },

    /// A flattened coordinate list has an odd number of values.
    #[error("flattened UV list has an odd number of values ({count})")]
    OddCoordinateCount {
        /// Number of values received.
        count: usize,
    },

    /// The number of UV points does not match the number of components.
    #[error("{components} components but {points} UV points")]
    ComponentCountMismatch {
        /// Number of component identifiers.
        components: usize,
        /// Number of UV points.
        points: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error loading data from a file.
    #[error("failed to load {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving data to a file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl HotspotError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        HotspotError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Replace the item identifier on per-item errors.
    ///
    /// Lower-level routines only know they were handed "an island"; the
    /// orchestrator knows which shell or face that was.
    pub fn with_item(self, label: impl Into<String>) -> Self {
        match self {
            HotspotError::NotARectangle { .. } => HotspotError::NotARectangle { item: label.into() },
            HotspotError::DegenerateSpan { width, height, .. } => HotspotError::DegenerateSpan {
                item: label.into(),
                width,
                height,
            },
            HotspotError::NoMatchFound { .. } => HotspotError::NoMatchFound { item: label.into() },
            other => other,
        }
    }

    /// Short machine-friendly tag for the failure kind.
    ///
    /// Used in per-item summaries so callers can group failures.
    pub fn reason_tag(&self) -> &'static str {
        match self {
            HotspotError::EmptyInput { .. } => "empty-input",
            HotspotError::NotARectangle { .. } => "not-a-rectangle",
            HotspotError::DegenerateSpan { .. } => "degenerate-span",
            HotspotError::NoMatchFound { .. } => "no-match-found",
            HotspotError::MalformedLibraryEntry { .. } => "malformed-library-entry",
            HotspotError::NoUsableHotspots => "no-usable-hotspots",
            HotspotError::CaptureFailed { .. } => "capture-failed",
            HotspotError::OddCoordinateCount { .. } => "odd-coordinate-count",
            HotspotError::ComponentCountMismatch { .. } => "component-count-mismatch",
            HotspotError::Io(_) => "io",
            HotspotError::Json(_) => "json",
            HotspotError::LoadError { .. } => "load",
            HotspotError::SaveError { .. } => "save",
            HotspotError::InvalidParameter { .. } => "invalid-parameter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_failed_message_lists_faces() {
        let err = HotspotError::CaptureFailed {
            faces: vec!["plane.f[1]".to_string(), "plane.f[4]".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "2 face(s) failed rectangle validation: plane.f[1], plane.f[4]"
        );
        assert_eq!(err.reason_tag(), "capture-failed");
    }

    #[test]
    fn test_invalid_param() {
        let err = HotspotError::invalid_param("tolerance", -1.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter: tolerance = -1 (must be positive)"
        );
    }
}
