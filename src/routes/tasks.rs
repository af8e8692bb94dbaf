use crate::{
    auth::{guard, AuthenticatedUser},
    error::AppError,
    models::{SortOrder, Task, TaskInput, TaskPatch, TaskQuery, TaskSort, TaskStatusFilter, TaskUpdate},
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str =
    "id, user_id, title, description, priority, completed, created_at, updated_at, completed_at";

/// Lists the tasks in the requested user's list.
///
/// The caller must be that user; the ownership guard rejects any other
/// authenticated caller with 403 before storage is touched. Supports
/// `status` (all/pending/completed), `sort_by` (created_at/priority/title),
/// and `order` (asc/desc) query parameters.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query_params: web::Query<TaskQuery>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let owner = guard::authorize(auth.user().id, path.into_inner())?;

    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
    match query_params.status.unwrap_or(TaskStatusFilter::All) {
        TaskStatusFilter::All => {}
        TaskStatusFilter::Pending => sql.push_str(" AND completed = false"),
        TaskStatusFilter::Completed => sql.push_str(" AND completed = true"),
    }

    // Sort column and direction come from a closed enum, never from raw input.
    let column = match query_params.sort_by.unwrap_or(TaskSort::CreatedAt) {
        TaskSort::CreatedAt => "created_at",
        TaskSort::Priority => "priority",
        TaskSort::Title => "title",
    };
    let direction = match query_params.order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    sql.push_str(&format!(" ORDER BY {} {}", column, direction));

    let tasks = sqlx::query_as::<_, Task>(&sql)
        .bind(owner)
        .fetch_all(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task in the requested user's list.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let owner = guard::authorize(auth.user().id, path.into_inner())?;
    let task = Task::new(task_data.into_inner(), owner);

    let created = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (id, user_id, title, description, priority, completed, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task.id)
    .bind(task.user_id)
    .bind(task.title)
    .bind(task.description)
    .bind(task.priority)
    .bind(task.completed)
    .bind(task.created_at)
    .bind(task.updated_at)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(created))
}

/// Retrieves a single task by id from the requested user's list.
#[get("/{task_id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, Uuid)>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    let owner = guard::authorize(auth.user().id, user_id)?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(owner)
    .fetch_optional(&**pool)
    .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("task not found".into())),
    }
}

/// Replaces a task's editable fields.
///
/// `completed_at` tracks the `completed` flag: set on completion, cleared on
/// reopening, left alone otherwise.
#[put("/{task_id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, Uuid)>,
    task_data: web::Json<TaskUpdate>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let (user_id, task_id) = path.into_inner();
    let owner = guard::authorize(auth.user().id, user_id)?;

    let updated = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET title = $1, description = $2, priority = $3, completed = $4, \
         updated_at = now(), \
         completed_at = CASE \
             WHEN $4 AND NOT completed THEN now() \
             WHEN NOT $4 THEN NULL \
             ELSE completed_at END \
         WHERE id = $5 AND user_id = $6 RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_data.priority)
    .bind(task_data.completed)
    .bind(task_id)
    .bind(owner)
    .fetch_optional(&**pool)
    .await?;

    match updated {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("task not found".into())),
    }
}

/// Applies a partial update: only the provided fields change.
///
/// `completed_at` follows `completed` exactly as in the full update.
#[patch("/{task_id}")]
pub async fn patch_task(
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, Uuid)>,
    task_data: web::Json<TaskPatch>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let (user_id, task_id) = path.into_inner();
    let owner = guard::authorize(auth.user().id, user_id)?;

    let patched = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET \
         title = COALESCE($1, title), \
         description = COALESCE($2, description), \
         priority = COALESCE($3, priority), \
         completed = COALESCE($4, completed), \
         updated_at = now(), \
         completed_at = CASE \
             WHEN COALESCE($4, completed) AND NOT completed THEN now() \
             WHEN NOT COALESCE($4, completed) THEN NULL \
             ELSE completed_at END \
         WHERE id = $5 AND user_id = $6 RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_data.priority)
    .bind(task_data.completed)
    .bind(task_id)
    .bind(owner)
    .fetch_optional(&**pool)
    .await?;

    match patched {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("task not found".into())),
    }
}

/// Flips a task's completion state.
#[patch("/{task_id}/toggle")]
pub async fn toggle_task(
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, Uuid)>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    let owner = guard::authorize(auth.user().id, user_id)?;

    let toggled = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET completed = NOT completed, \
         completed_at = CASE WHEN completed THEN NULL ELSE now() END, \
         updated_at = now() \
         WHERE id = $1 AND user_id = $2 RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(owner)
    .fetch_optional(&**pool)
    .await?;

    match toggled {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("task not found".into())),
    }
}

/// Deletes a task from the requested user's list.
#[delete("/{task_id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, Uuid)>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    let owner = guard::authorize(auth.user().id, user_id)?;

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(owner)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
