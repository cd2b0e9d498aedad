//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! POST   /api/users        {"name":"Ada Lovelace","email":"ada@example.com"}
//! PUT    /api/users/{id}   {"name":"Ada King"}
//! DELETE /api/users/{id}
//! ```
//!
//! Each handler asks the rate limiter first, then parses its input, then
//! calls the service. Bodies are read by [`read_json`] inside the handler so
//! a throttled or mis-addressed request is rejected before its body is
//! looked at.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::rate_limit::Operation;
use crate::domain::user_service::INVALID_ID;
use crate::domain::{Error, User, UserId, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::body::{MAX_BODY_BYTES, read_json};
use crate::inbound::http::rate_limit::admit;
use crate::inbound::http::state::HttpState;

const MISSING_FIELDS: &str = "Invalid data. Required: name, email";
const NO_DATA: &str = "No data provided";

/// Response body for `POST /api/users`.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: UserId,
    pub message: &'static str,
    pub user: User,
}

/// Response body for update and delete.
#[derive(Debug, Serialize)]
pub struct Acknowledgement {
    pub message: &'static str,
    pub id: UserId,
}

/// Parse a path segment into a [`UserId`].
///
/// Anything other than a positive integer is rejected with `Invalid ID`.
///
/// # Examples
/// ```
/// use userdesk::inbound::http::users::parse_user_id;
///
/// assert_eq!(parse_user_id("12").expect("valid id").get(), 12);
/// assert!(parse_user_id("0").is_err());
/// assert!(parse_user_id("-3").is_err());
/// assert!(parse_user_id("abc").is_err());
/// ```
pub fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    raw.parse::<i64>()
        .ok()
        .and_then(|value| UserId::new(value).ok())
        .ok_or_else(|| Error::invalid_request(INVALID_ID))
}

/// Text of a JSON field; non-string values read as empty so validation
/// rejects them.
fn field_text(value: &Value) -> String {
    value.as_str().map(str::to_owned).unwrap_or_default()
}

fn non_empty_object(body: Value) -> Option<Map<String, Value>> {
    match body {
        Value::Object(map) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// List all users, newest first.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use userdesk::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<User>>> {
    admit(&state, &req, Operation::ListUsers).await?;
    let users = state.users.list().await?;
    Ok(web::Json(users))
}

/// Fetch one user.
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    admit(&state, &req, Operation::GetUser).await?;
    let id = parse_user_id(&path)?;
    let user = state.users.get(id).await?;
    Ok(web::Json(user))
}

/// Create a user. Both `name` and `email` keys are required.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    admit(&state, &req, Operation::CreateUser).await?;
    let (name, email) = match read_json(payload, MAX_BODY_BYTES).await? {
        Some(Value::Object(map)) => match (map.get("name"), map.get("email")) {
            (Some(name), Some(email)) => (field_text(name), field_text(email)),
            _ => return Err(Error::invalid_request(MISSING_FIELDS)),
        },
        _ => return Err(Error::invalid_request(MISSING_FIELDS)),
    };

    let user = state.users.create(&name, &email).await?;
    Ok(HttpResponse::Created().json(CreatedUser {
        id: user.id(),
        message: "User created successfully",
        user,
    }))
}

/// Partially update a user. Unrecognised keys are ignored.
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Payload,
) -> ApiResult<web::Json<Acknowledgement>> {
    admit(&state, &req, Operation::UpdateUser).await?;
    let id = parse_user_id(&path)?;
    let body = read_json(payload, MAX_BODY_BYTES)
        .await?
        .and_then(non_empty_object)
        .ok_or_else(|| Error::invalid_request(NO_DATA))?;

    let patch = UserPatch {
        name: body.get("name").map(field_text),
        email: body.get("email").map(field_text),
    };
    state.users.update(id, patch).await?;
    Ok(web::Json(Acknowledgement {
        message: "User updated successfully",
        id,
    }))
}

/// Delete a user.
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<web::Json<Acknowledgement>> {
    admit(&state, &req, Operation::DeleteUser).await?;
    let id = parse_user_id(&path)?;
    state.users.delete(id).await?;
    Ok(web::Json(Acknowledgement {
        message: "User deleted successfully",
        id,
    }))
}
