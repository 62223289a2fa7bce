use rocket::{Request, catch, serde::json::Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorMessage {
    error: String,
    status: u16,
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "Invalid request parameters.".into(),
        status: 400
    })
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "The requested resource was not found.".into(),
        status: 404
    })
}

#[catch(422)]
pub fn unprocessable(req: &Request) -> Json<ErrorMessage> {
    let error_msg = match req.uri().path().segments().last() {
        Some("stance") => "Expected a JSON body like {\"stance\": \"left\"}.",
        _ => "The request body could not be understood."
    };

    Json(ErrorMessage {
        error: error_msg.into(),
        status: 422
    })
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "An internal server error occurred.".into(),
        status: 500
    })
}

#[catch(503)]
pub fn unavailable(_req: &Request) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        error: "Stance storage is unavailable. Your vote was not recorded.".into(),
        status: 503
    })
}
