use chrono::NaiveDate;
use uuid::Uuid;

use super::error::err;
use super::types::Request;

// Param extraction. Each helper returns the parsed value or a ready
// error response so handlers can early-return via match.

pub fn require_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    match req.params.get(key).and_then(|v| v.as_str()) {
        Some(v) => Ok(v.to_string()),
        None => Err(err(
            &req.id,
            "bad_params",
            format!("missing params.{key}"),
            None,
        )),
    }
}

pub fn require_f64(req: &Request, key: &str) -> Result<f64, serde_json::Value> {
    match req.params.get(key).and_then(|v| v.as_f64()) {
        Some(v) => Ok(v),
        None => Err(err(
            &req.id,
            "bad_params",
            format!("missing params.{key}"),
            None,
        )),
    }
}

pub fn optional_f64(req: &Request, key: &str) -> Result<Option<f64>, serde_json::Value> {
    match req.params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => match v.as_f64() {
            Some(n) => Ok(Some(n)),
            None => Err(err(
                &req.id,
                "bad_params",
                format!("params.{key} must be a number or null"),
                None,
            )),
        },
    }
}

pub fn require_uuid(req: &Request, key: &str) -> Result<Uuid, serde_json::Value> {
    let raw = require_str(req, key)?;
    Uuid::parse_str(&raw).map_err(|_| {
        err(
            &req.id,
            "bad_params",
            format!("params.{key} is not a valid id"),
            None,
        )
    })
}

fn parse_date(req: &Request, key: &str, raw: &str) -> Result<NaiveDate, serde_json::Value> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        err(
            &req.id,
            "bad_params",
            format!("params.{key} must be a YYYY-MM-DD date"),
            None,
        )
    })
}

pub fn require_date(req: &Request, key: &str) -> Result<NaiveDate, serde_json::Value> {
    let raw = require_str(req, key)?;
    parse_date(req, key, &raw)
}

pub fn optional_date(req: &Request, key: &str) -> Result<Option<NaiveDate>, serde_json::Value> {
    match req.params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => match v.as_str() {
            Some(raw) => parse_date(req, key, raw).map(Some),
            None => Err(err(
                &req.id,
                "bad_params",
                format!("params.{key} must be a YYYY-MM-DD date or null"),
                None,
            )),
        },
    }
}
