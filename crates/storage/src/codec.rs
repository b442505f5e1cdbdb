//! JSON encoding of the persisted progress record.
//!
//! Decoding reads the `version` tag first and dispatches to the matching
//! schema. Adding a schema means adding a `PersistedProgress` variant and its
//! upgrade step into the current `CourseProgress`.

use serde_json::Value;
use thiserror::Error;

use course_core::model::CourseProgress;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("malformed progress record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("progress record has no schema version")]
    MissingVersion,

    #[error("unsupported progress schema version: {0}")]
    UnsupportedVersion(u64),
}

/// Every schema version this build can read.
#[derive(Debug)]
enum PersistedProgress {
    V1(CourseProgress),
}

impl PersistedProgress {
    fn parse(raw: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(raw)?;
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(CodecError::MissingVersion)?;

        match version {
            1 => Ok(Self::V1(serde_json::from_value(value)?)),
            other => Err(CodecError::UnsupportedVersion(other)),
        }
    }

    fn into_current(self) -> CourseProgress {
        match self {
            Self::V1(progress) => progress,
        }
    }
}

/// Serialize a record for storage.
///
/// # Errors
///
/// Returns `CodecError::Json` if serialization fails.
pub fn encode_progress(progress: &CourseProgress) -> Result<String, CodecError> {
    Ok(serde_json::to_string(progress)?)
}

/// Parse a stored record, upgrading older schemas to the current one.
///
/// # Errors
///
/// Returns `CodecError` for malformed JSON, a missing version tag, or a schema
/// version this build does not know.
pub fn decode_progress(raw: &str) -> Result<CourseProgress, CodecError> {
    PersistedProgress::parse(raw).map(PersistedProgress::into_current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::time::fixed_now;

    const LEGACY_BLOB: &str = r#"{
        "version": 1,
        "startedAt": "2024-03-01T09:00:00.000Z",
        "lastActiveAt": "2024-03-02T10:30:00.000Z",
        "currentModule": 1,
        "xp": 80,
        "streak": { "current": 2, "lastActiveDate": "2024-03-02", "longest": 2 },
        "modules": {
            "module-1": {
                "started": true,
                "startedAt": "2024-03-01T09:00:00.000Z",
                "completedAt": null,
                "sectionsRead": ["section-1-1", "section-1-2"],
                "totalSections": 5,
                "quiz": {
                    "completed": false,
                    "score": 1,
                    "totalQuestions": 3,
                    "attempts": 2,
                    "bestScore": 1,
                    "questionResults": {
                        "q1-1": { "correct": true, "selectedAnswer": "a", "attempts": 2 }
                    }
                }
            }
        },
        "badges": ["streak-3"],
        "quizHistory": [
            {
                "moduleId": "module-1",
                "questionId": "q1-1",
                "selectedAnswer": "a",
                "correct": true,
                "timestamp": "2024-03-01T09:05:00.000Z",
                "attemptNumber": 2
            }
        ]
    }"#;

    #[test]
    fn decodes_browser_era_record() {
        let progress = decode_progress(LEGACY_BLOB).unwrap();
        assert_eq!(progress.xp, 80);
        assert_eq!(progress.streak.current, 2);
        let module = progress.module("module-1").unwrap();
        assert_eq!(module.sections_read.len(), 2);
        assert!(module.quiz.question_results["q1-1"].correct);
        assert_eq!(progress.quiz_history.len(), 1);
        assert!(progress.has_badge("streak-3"));
    }

    #[test]
    fn encoded_record_decodes_to_the_same_value() {
        let mut progress = CourseProgress::new(fixed_now());
        progress.xp = 42;
        progress.badges.insert("speed-demon".into());
        let raw = encode_progress(&progress).unwrap();
        assert_eq!(decode_progress(&raw).unwrap(), progress);
    }

    #[test]
    fn rejects_other_versions() {
        let raw = LEGACY_BLOB.replacen("\"version\": 1", "\"version\": 2", 1);
        assert!(matches!(
            decode_progress(&raw),
            Err(CodecError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn rejects_missing_version_and_garbage() {
        assert!(matches!(
            decode_progress(r#"{"xp": 3}"#),
            Err(CodecError::MissingVersion)
        ));
        assert!(matches!(
            decode_progress("not json"),
            Err(CodecError::Json(_))
        ));
        assert!(matches!(
            decode_progress(r#"{"version": 1, "xp": "lots"}"#),
            Err(CodecError::Json(_))
        ));
    }
}
