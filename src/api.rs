use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::types::{Routine, WorkoutRecord};

const API_BASE: &str = "/api/v1";

#[derive(Serialize, Debug)]
pub struct CreateWorkoutRequest {
    pub exercise_id: i64,
    pub reps: u32,
    pub set: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

/// One row of the social feed: a peer's logged set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SocialEntry {
    pub id: i64,
    pub user_name: String,
    pub exercise_name: String,
    pub reps: u32,
    pub set: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    pub date: String,
}

fn get_headers() -> Result<Headers, JsValue> {
    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    Ok(headers)
}

fn create_request_init(method: &str, body: Option<&str>, headers: &Headers) -> RequestInit {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(b) = body {
        opts.set_body(&JsValue::from_str(b));
    }
    opts.set_headers(&JsValue::from(headers));
    opts
}

async fn fetch_response(method: &str, url: &str, body: Option<&str>) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let headers = get_headers()?;
    let opts = create_request_init(method, body, &headers);
    let request = Request::new_with_str_and_init(url, &opts)?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;
    Ok(resp)
}

async fn response_json(resp: &Response) -> Result<JsValue, JsValue> {
    JsFuture::from(resp.json()?).await
}

/// Record one logged set. The error is surfaced to the workout form
/// as a retryable message; nothing advances until this resolves.
pub async fn create_workout(req: &CreateWorkoutRequest) -> Result<WorkoutRecord, String> {
    let body = serde_json::to_string(req).map_err(|e| e.to_string())?;
    let url = format!("{}/workouts", API_BASE);

    let resp = fetch_response("POST", &url, Some(&body))
        .await
        .map_err(|_| "Could not reach the server".to_string())?;
    if !resp.ok() {
        return Err(format!("Saving the set failed (HTTP {})", resp.status()));
    }

    let json = response_json(&resp).await.map_err(|_| "Invalid server response".to_string())?;
    serde_wasm_bindgen::from_value(json).map_err(|_| "Invalid server response".to_string())
}

/// Workout rows recorded server-side for one date.
pub async fn list_workouts_for_date(date: &str) -> Result<Vec<WorkoutRecord>, JsValue> {
    let url = format!("{}/workouts?date={}", API_BASE, date);
    let resp = fetch_response("GET", &url, None).await?;
    if !resp.ok() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }
    let json = response_json(&resp).await?;
    let rows: Vec<WorkoutRecord> = serde_wasm_bindgen::from_value(json)?;
    Ok(rows)
}

pub async fn fetch_routines() -> Result<Vec<Routine>, JsValue> {
    let url = format!("{}/routines", API_BASE);
    let resp = fetch_response("GET", &url, None).await?;
    if !resp.ok() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }
    let json = response_json(&resp).await?;
    let routines: Vec<Routine> = serde_wasm_bindgen::from_value(json)?;
    Ok(routines)
}

/// A deleted routine comes back as `Ok(None)` so a stale session can
/// degrade to "no active routine" instead of erroring.
pub async fn fetch_routine(id: i64) -> Result<Option<Routine>, JsValue> {
    let url = format!("{}/routines/{}", API_BASE, id);
    let resp = fetch_response("GET", &url, None).await?;
    if resp.status() == 404 {
        return Ok(None);
    }
    if !resp.ok() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }
    let json = response_json(&resp).await?;
    let routine: Routine = serde_wasm_bindgen::from_value(json)?;
    Ok(Some(routine))
}

pub async fn fetch_social_feed() -> Result<Vec<SocialEntry>, JsValue> {
    let url = format!("{}/social", API_BASE);
    let resp = fetch_response("GET", &url, None).await?;
    if !resp.ok() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }
    let json = response_json(&resp).await?;
    let entries: Vec<SocialEntry> = serde_wasm_bindgen::from_value(json)?;
    Ok(entries)
}
