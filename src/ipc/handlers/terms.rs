use serde_json::json;

use crate::engine::Term;
use crate::ipc::error::{err, ok, validation};
use crate::ipc::helpers::{optional_date, optional_f64, require_date, require_f64, require_str, require_uuid};
use crate::ipc::types::{AppState, Request};

fn term_row(term: &Term) -> serde_json::Value {
    json!({
        "termId": term.id().to_string(),
        "title": term.title(),
        "startDate": term.start_date().map(|d| d.to_string()),
        "endDate": term.end_date().map(|d| d.to_string()),
        "currentGpa": term.current_gpa(),
        "goalGpa": term.goal_gpa(),
        "courseCount": term.course_count(),
    })
}

fn handle_terms_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let title = match require_str(req, "title") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let start_date = match optional_date(req, "startDate") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let end_date = match optional_date(req, "endDate") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let current_gpa = match optional_f64(req, "currentGpa") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let goal_gpa = match optional_f64(req, "goalGpa") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match Term::new(&title, start_date, end_date, current_gpa, goal_gpa) {
        Ok(term) => {
            let term_id = state.registry.insert_term(term);
            ok(&req.id, json!({ "termId": term_id.to_string() }))
        }
        Err(e) => validation(&req.id, e),
    }
}

fn handle_terms_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut terms: Vec<serde_json::Value> = state.registry.terms().map(term_row).collect();
    terms.sort_by(|a, b| a["title"].as_str().cmp(&b["title"].as_str()));
    ok(&req.id, json!({ "terms": terms }))
}

fn handle_terms_rename(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let title = match require_str(req, "title") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };

    match term.set_title(&title) {
        Ok(()) => ok(&req.id, term_row(term)),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_terms_set_start_date(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let date = match require_date(req, "date") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };

    match term.set_start_date(date) {
        Ok(()) => ok(&req.id, term_row(term)),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_terms_set_end_date(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let date = match require_date(req, "date") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };

    match term.set_end_date(date) {
        Ok(()) => ok(&req.id, term_row(term)),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_terms_set_current_gpa(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let gpa = match require_f64(req, "gpa") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };

    match term.set_current_gpa(gpa) {
        Ok(()) => ok(&req.id, term_row(term)),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_terms_set_goal_gpa(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let gpa = match require_f64(req, "gpa") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(term) = state.registry.term_mut(term_id) else {
        return err(&req.id, "not_found", "term not found", None);
    };

    match term.set_goal_gpa(gpa) {
        Ok(()) => ok(&req.id, term_row(term)),
        Err(e) => validation(&req.id, e),
    }
}

fn handle_terms_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term_id = match require_uuid(req, "termId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.registry.remove_term(term_id) {
        Some(_) => ok(&req.id, json!({ "termId": term_id.to_string() })),
        None => err(&req.id, "not_found", "term not found", None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "terms.create" => Some(handle_terms_create(state, req)),
        "terms.list" => Some(handle_terms_list(state, req)),
        "terms.rename" => Some(handle_terms_rename(state, req)),
        "terms.setStartDate" => Some(handle_terms_set_start_date(state, req)),
        "terms.setEndDate" => Some(handle_terms_set_end_date(state, req)),
        "terms.setCurrentGpa" => Some(handle_terms_set_current_gpa(state, req)),
        "terms.setGoalGpa" => Some(handle_terms_set_goal_gpa(state, req)),
        "terms.delete" => Some(handle_terms_delete(state, req)),
        _ => None,
    }
}
