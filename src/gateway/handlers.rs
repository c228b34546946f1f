use axum::body::Bytes;
use axum::extract::State;
use axum::{Extension, Json};
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::error::{Error, Result};
use crate::AuthContext;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let payload = parse_body(&body)?;
    let username = str_field(&payload, "username");
    let password = str_field(&payload, "password");
    let name = str_field(&payload, "name");

    state.credentials.register(username, password, name).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Teacher {} registered successfully", username.trim()),
    })))
}

pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let payload = parse_body(&body)?;
    let username = str_field(&payload, "username").trim();
    let password = str_field(&payload, "password");

    if username.is_empty() || password.is_empty() {
        return Err(Error::validation("Username and password required"));
    }

    let teacher = state
        .credentials
        .verify(username, password)
        .await?
        .ok_or(Error::InvalidCredentials)?;

    let issued = state.sessions.issue(teacher.id).await?;
    info!(teacher_id = teacher.id, "teacher logged in");

    Ok(Json(json!({
        "token": issued.token,
        "expires_at": issued.expires_at.to_rfc3339(),
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>> {
    state.sessions.revoke(&ctx.session).await?;
    info!(teacher_id = ctx.teacher.id, "teacher logged out");

    Ok(Json(json!({
        "success": true,
        "message": "Logged out successfully",
    })))
}

pub async fn list_students(
    State(state): State<AppState>,
    Extension(_ctx): Extension<AuthContext>,
) -> Result<Json<Value>> {
    let students = state.roster.list().await?;

    Ok(Json(json!({
        "count": students.len(),
        "students": students,
    })))
}

pub async fn add_student(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    body: Bytes,
) -> Result<Json<Value>> {
    let payload = parse_body(&body)?;
    let name = str_field(&payload, "name");
    let subject = str_field(&payload, "subject");
    let marks = int_field(&payload, "marks")
        .ok_or_else(|| Error::validation("Marks must be a number"))
        .and_then(marks_value)?;

    let outcome = state
        .roster
        .add_or_accumulate(name, subject, marks, ctx.teacher.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "action": outcome.action,
        "student_id": outcome.student_id,
    })))
}

pub async fn update_marks(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    body: Bytes,
) -> Result<Json<Value>> {
    let payload = parse_body(&body)?;
    let (Some(student_id), Some(marks)) = (
        int_field(&payload, "student_id").and_then(id_value),
        int_field(&payload, "marks"),
    ) else {
        return Err(Error::validation("invalid input"));
    };

    let student = state
        .roster
        .set_marks(student_id, marks_value(marks)?, ctx.teacher.id)
        .await?;

    Ok(Json(json!({
        "ok": true,
        "student_id": student.id,
        "marks": student.marks,
    })))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    body: Bytes,
) -> Result<Json<Value>> {
    let payload = parse_body(&body)?;
    let student_id = int_field(&payload, "student_id")
        .and_then(id_value)
        .ok_or_else(|| Error::validation("Invalid student_id"))?;

    state.roster.delete(student_id, ctx.teacher.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Student deleted",
    })))
}

fn parse_body(body: &[u8]) -> Result<Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        _ => Err(Error::validation("Invalid JSON payload")),
    }
}

/// String field, or `""` when absent or not a string.
fn str_field<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Integer field given either as a JSON integer or a decimal string.
fn int_field(payload: &Value, key: &str) -> Option<i64> {
    match payload.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn id_value(raw: i64) -> Option<i32> {
    i32::try_from(raw).ok()
}

// Anything outside i32 is out of range anyway; let the roster report it
fn marks_value(raw: i64) -> Result<i32> {
    i32::try_from(raw).map_err(|_| Error::validation("Marks should be between 0 and 100"))
}
