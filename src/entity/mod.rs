//! Database entity models for student-roster.
//!
//! These are the Sea-ORM entity definitions for the four tables the service
//! persists. Every piece of shared state (teachers, students, session tokens
//! and the audit trail) lives in these tables; nothing is cached in process.

/// Registered teachers and their salted password hashes.
pub mod teacher;

/// Roster rows, unique on `(name, subject)`.
pub mod student;

/// Bearer tokens issued at login.
pub mod session_token;

/// Append-only record of every student mutation.
pub mod audit_log;
